use super::MessageType;
use crate::charset::{CharsetError, encode_7bit, encode_ucs2, pack_septets, to_hex};

/// Notification request: delivery notification wanted
const NOTIFICATION_REQUESTED: &str = "1";
/// Notification type: delivery notification
const NOTIFICATION_TYPE_DN: &str = "1";
/// Message class
const MESSAGE_CLASS: &str = "1";
/// Originator type of address: alphanumeric
const OADC_ALPHANUMERIC: &str = "5039";

/// Submit short message operation (51)
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Submit {
    pub adc: String,
    pub oadc: String,
    pub ac: String,
    pub nrq: String,
    pub nadc: String,
    pub nt: String,
    pub npid: String,
    pub lrq: String,
    pub lrad: String,
    pub lpid: String,
    pub dd: String,
    pub ddt: String,
    pub vp: String,
    pub rpid: String,
    pub scts: String,
    pub dst: String,
    pub rsn: String,
    pub dscts: String,
    pub mt: String,
    pub nb: String,
    pub msg: String,
    pub mms: String,
    pub pr: String,
    pub dcs: String,
    pub mcls: String,
    pub rpi: String,
    pub cpg: String,
    pub rply: String,
    pub otoa: String,
    pub hplmn: String,
    pub xser: String,
    pub res4: String,
    pub res5: String,
}

impl Submit {
    /// Build the submit for one segment of an outbound message.
    ///
    /// `sender` is sent as an alphanumeric originator and must be GSM
    /// representable, as must `text` when `message_type` is alphanumeric.
    pub fn new(
        sender: &str,
        receiver: &str,
        text: &str,
        message_type: MessageType,
        xser: String,
    ) -> Result<Self, CharsetError> {
        let msg = match message_type {
            MessageType::AlphaNumeric => to_hex(&encode_7bit(text)?),
            MessageType::Transparent => to_hex(&encode_ucs2(text)),
        };

        Ok(Submit {
            adc: receiver.to_string(),
            oadc: mask_sender(sender)?,
            nrq: NOTIFICATION_REQUESTED.to_string(),
            nt: NOTIFICATION_TYPE_DN.to_string(),
            mt: message_type.as_str().to_string(),
            nb: (msg.len() * 4).to_string(),
            msg,
            mcls: MESSAGE_CLASS.to_string(),
            otoa: OADC_ALPHANUMERIC.to_string(),
            xser,
            ..Default::default()
        })
    }

    pub fn fields(&self) -> [&str; 33] {
        [
            &self.adc, &self.oadc, &self.ac, &self.nrq, &self.nadc, &self.nt, &self.npid,
            &self.lrq, &self.lrad, &self.lpid, &self.dd, &self.ddt, &self.vp, &self.rpid,
            &self.scts, &self.dst, &self.rsn, &self.dscts, &self.mt, &self.nb, &self.msg,
            &self.mms, &self.pr, &self.dcs, &self.mcls, &self.rpi, &self.cpg, &self.rply,
            &self.otoa, &self.hplmn, &self.xser, &self.res4, &self.res5,
        ]
    }
}

/// Encode an alphanumeric originator: packed GSM septets prefixed by their
/// length in semi-octets, as uppercase hex.
pub fn mask_sender(sender: &str) -> Result<String, CharsetError> {
    let packed = pack_septets(&encode_7bit(sender)?);
    let mut masked = Vec::with_capacity(packed.len() + 1);
    masked.push((packed.len() * 2) as u8);
    masked.extend_from_slice(&packed);
    Ok(to_hex(&masked))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_frame;
    use crate::datatypes::{Operation, xser};

    #[test]
    fn test_mask_sender() {
        assert_eq!(mask_sender("Voyager").unwrap(), "0ED6773E7C2ECB1B");
        assert_eq!(mask_sender("test").unwrap(), "08F4F29C0E");
    }

    #[test]
    fn test_mask_sender_rejects_non_gsm() {
        assert_eq!(
            mask_sender("Тест"),
            Err(CharsetError::Unrepresentable('Т'))
        );
    }

    #[test]
    fn test_submit_frame() {
        let message_type = MessageType::AlphaNumeric;
        let submit = Submit::new(
            "Voyager",
            "09495696599",
            "Hello world",
            message_type,
            xser::build("", message_type, 0, 1, 1),
        )
        .unwrap();

        let frame = encode_frame("01", &Operation::Submit(Box::new(submit)));
        assert_eq!(
            frame.as_ref(),
            &b"\x0201/00126/O/51/09495696599/0ED6773E7C2ECB1B//1//1/////////////3/88/48656C6C6F20776F726C64////1////5039//020100060101070101///47\x03"[..]
        );
    }

    #[test]
    fn test_submit_frame_lowercase_text() {
        let message_type = MessageType::AlphaNumeric;
        let submit = Submit::new(
            "test",
            "09191234567",
            "hello world",
            message_type,
            xser::build("", message_type, 0, 1, 1),
        )
        .unwrap();

        let frame = encode_frame("00", &Operation::Submit(Box::new(submit)));
        assert_eq!(
            frame.as_ref(),
            &b"\x0200/00120/O/51/09191234567/08F4F29C0E//1//1/////////////3/88/68656C6C6F20776F726C64////1////5039//020100060101070101///B7\x03"[..]
        );
    }

    #[test]
    fn test_submit_transparent_payload() {
        let submit = Submit::new(
            "Voyager",
            "09495696599",
            "日本",
            MessageType::Transparent,
            String::new(),
        )
        .unwrap();
        assert_eq!(submit.msg, "65E5672C");
        assert_eq!(submit.nb, "32");
        assert_eq!(submit.mt, "4");
    }
}
