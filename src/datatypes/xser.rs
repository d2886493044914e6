// ABOUTME: Extra services (XSer) sub-encoding embedded in submit and deliver operations
// ABOUTME: Builds the outbound tag/length/value chain and walks inbound chains into a tag map

use super::MessageType;
use crate::charset::to_hex;
use std::collections::HashMap;

/// User data header tag
pub const UDH_TAG: &str = "01";
/// Data coding scheme tag
pub const DCS_TAG: &str = "02";
/// Billing identifier tag
pub const BILLING_ID_TAG: &str = "0C";

/// UDH tag, 6 octets: IEI concatenated message (00), IE length 3
const CONCAT_HEADER: &str = "0106050003";
/// Urgency indicator: normal
const URGENCY_NORMAL: &str = "060101";
/// Acknowledgment request: delivery acknowledgment
const ACK_REQUEST_DELIVERY: &str = "070101";

/// Concatenation data carried by a UDH extra service
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Concatenation {
    pub reference: u8,
    pub total: u8,
    pub part: u8,
}

impl Concatenation {
    /// Read the trailing reference/total/part octets of a UDH value
    pub fn from_udh(udh: &str) -> Option<Self> {
        let len = udh.len();
        if len < 6 || !udh.is_ascii() {
            return None;
        }
        let octet = |start: usize| u8::from_str_radix(&udh[start..start + 2], 16).ok();
        Some(Concatenation {
            reference: octet(len - 6)?,
            total: octet(len - 4)?,
            part: octet(len - 2)?,
        })
    }
}

/// Concatenation header, empty for single part messages
pub fn concat_header(reference: u8, total: u8, part: u8) -> String {
    if total <= 1 {
        return String::new();
    }
    format!("{CONCAT_HEADER}{reference:02X}{total:02X}{part:02X}")
}

/// Billing identifier block, empty when no billing id is configured
pub fn billing_id(billing_id: &str) -> String {
    if billing_id.is_empty() {
        return String::new();
    }
    format!(
        "{BILLING_ID_TAG}{:02X}{}",
        billing_id.len(),
        to_hex(billing_id.as_bytes())
    )
}

/// Full extra services value for one submit segment
pub fn build(billing: &str, message_type: MessageType, reference: u8, total: u8, part: u8) -> String {
    let mut xser = String::from(message_type.dcs_xser());
    xser.push_str(&concat_header(reference, total, part));
    xser.push_str(&billing_id(billing));
    xser.push_str(URGENCY_NORMAL);
    xser.push_str(ACK_REQUEST_DELIVERY);
    xser
}

/// Walk `(type:2, length:2, value:length*2)` triplets.
///
/// A chain that cannot be walked to the end yields an empty map; callers
/// treat it the same as a chain without the tag they look for.
pub fn parse(xser: &str) -> HashMap<String, String> {
    let mut services = HashMap::new();
    if !xser.is_ascii() {
        return services;
    }

    let mut rest = xser;
    while !rest.is_empty() {
        if rest.len() < 4 {
            return HashMap::new();
        }
        let (tag, tail) = rest.split_at(2);
        let (len, tail) = tail.split_at(2);
        let Ok(len) = usize::from_str_radix(len, 16) else {
            return HashMap::new();
        };
        if tail.len() < len * 2 {
            return HashMap::new();
        }
        let (value, tail) = tail.split_at(len * 2);
        services.insert(tag.to_string(), value.to_string());
        rest = tail;
    }

    services
}
