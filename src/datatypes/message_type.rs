// ABOUTME: Message type (MT) and data coding scheme values carried by submit and deliver operations
// ABOUTME: Picks the on-air alphabet for outbound text and interprets the DCS of inbound messages

use crate::charset::is_gsm_alpha;
use std::fmt;

/// Message type field (MT) of a submit operation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// GSM 7-bit default alphabet
    AlphaNumeric,
    /// UCS-2 transparent data
    Transparent,
}

impl MessageType {
    /// Select the alphabet able to carry `text`
    pub fn classify(text: &str) -> Self {
        if is_gsm_alpha(text) {
            MessageType::AlphaNumeric
        } else {
            MessageType::Transparent
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::AlphaNumeric => "3",
            MessageType::Transparent => "4",
        }
    }

    /// Data coding scheme extra service announcing this alphabet
    pub fn dcs_xser(&self) -> &'static str {
        match self {
            MessageType::AlphaNumeric => "020100",
            MessageType::Transparent => "020108",
        }
    }

    pub fn data_coding(&self) -> DataCoding {
        match self {
            MessageType::AlphaNumeric => DataCoding::Gsm7,
            MessageType::Transparent => DataCoding::Ucs2,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data coding scheme announced by the DCS extra service of an inbound message
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum DataCoding {
    /// `00`: unpacked GSM septets, hex encoded
    Gsm7,
    /// `08`: UTF-16BE, hex encoded
    Ucs2,
    /// Anything else, including a missing DCS
    #[default]
    Unspecified,
    Other(String),
}

impl DataCoding {
    pub fn from_xser(value: Option<&str>) -> Self {
        match value {
            Some("00") => DataCoding::Gsm7,
            Some("08") => DataCoding::Ucs2,
            Some(other) => DataCoding::Other(other.to_string()),
            None => DataCoding::Unspecified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(MessageType::classify("Hello world"), MessageType::AlphaNumeric);
        assert_eq!(MessageType::classify("price: 10€ [net]"), MessageType::AlphaNumeric);
        assert_eq!(MessageType::classify("こんにちは"), MessageType::Transparent);
        assert_eq!(MessageType::classify("smile 😀"), MessageType::Transparent);
    }

    #[test]
    fn test_dcs_values() {
        assert_eq!(MessageType::AlphaNumeric.dcs_xser(), "020100");
        assert_eq!(MessageType::Transparent.dcs_xser(), "020108");
        assert_eq!(DataCoding::from_xser(Some("00")), DataCoding::Gsm7);
        assert_eq!(DataCoding::from_xser(Some("08")), DataCoding::Ucs2);
        assert_eq!(
            DataCoding::from_xser(Some("04")),
            DataCoding::Other("04".to_string())
        );
        assert_eq!(DataCoding::from_xser(None), DataCoding::Unspecified);
    }
}
