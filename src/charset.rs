// ABOUTME: GSM 03.38 default alphabet and UCS-2 conversions used for on-air message payloads
// ABOUTME: Provides septet encoding, septet packing, UTF-16BE encoding and tolerant hex parsing

use thiserror::Error;

/// GSM 7-bit default alphabet, indexed by septet value.
///
/// Index 0x1B is the escape to the extension table and never maps to a
/// printable character.
const GSM7_BASIC: [char; 128] = [
    '@', '£', '$', '¥', 'è', 'é', 'ù', 'ì', 'ò', 'Ç', '\n', 'Ø', 'ø', '\r', 'Å', 'å', //
    'Δ', '_', 'Φ', 'Γ', 'Λ', 'Ω', 'Π', 'Ψ', 'Σ', 'Θ', 'Ξ', '\x1b', 'Æ', 'æ', 'ß', 'É', //
    ' ', '!', '"', '#', '¤', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/', //
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', ':', ';', '<', '=', '>', '?', //
    '¡', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', //
    'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'Ä', 'Ö', 'Ñ', 'Ü', '§', //
    '¿', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', //
    'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'ä', 'ö', 'ñ', 'ü', 'à', //
];

/// GSM 7-bit extension table (septet following ESC, character)
const GSM7_EXTENSION: [(u8, char); 10] = [
    (0x0A, '\x0C'),
    (0x14, '^'),
    (0x28, '{'),
    (0x29, '}'),
    (0x2F, '\\'),
    (0x3C, '['),
    (0x3D, '~'),
    (0x3E, ']'),
    (0x40, '|'),
    (0x65, '€'),
];

const ESCAPE: u8 = 0x1B;
const CARRIAGE_RETURN: u8 = 0x0D;

/// Errors raised while converting between text and on-air representations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CharsetError {
    #[error("character {0:?} is not in the GSM 7-bit alphabet")]
    Unrepresentable(char),

    #[error("UCS-2 payload has odd length {0}")]
    OddLength(usize),

    #[error("invalid hex payload: {0}")]
    InvalidHex(String),
}

fn basic_septet(ch: char) -> Option<u8> {
    if ch == '\x1b' {
        return None;
    }
    GSM7_BASIC.iter().position(|&c| c == ch).map(|pos| pos as u8)
}

fn extension_septet(ch: char) -> Option<u8> {
    GSM7_EXTENSION
        .iter()
        .find(|&&(_, c)| c == ch)
        .map(|&(code, _)| code)
}

/// Number of septets `ch` occupies in the default alphabet, or `None` when
/// it cannot be represented at all.
pub fn septet_len(ch: char) -> Option<usize> {
    if basic_septet(ch).is_some() {
        Some(1)
    } else if extension_septet(ch).is_some() {
        Some(2)
    } else {
        None
    }
}

/// Returns true when every character of `text` is representable in the GSM
/// 7-bit alphabet (basic table or extension table).
pub fn is_gsm_alpha(text: &str) -> bool {
    text.chars().all(|ch| septet_len(ch).is_some())
}

/// Encode text to unpacked GSM septets, one septet per byte.
///
/// Extension characters expand to an ESC septet followed by their code.
pub fn encode_7bit(text: &str) -> Result<Vec<u8>, CharsetError> {
    let mut septets = Vec::with_capacity(text.len());
    for ch in text.chars() {
        if let Some(code) = basic_septet(ch) {
            septets.push(code);
        } else if let Some(code) = extension_septet(ch) {
            septets.push(ESCAPE);
            septets.push(code);
        } else {
            return Err(CharsetError::Unrepresentable(ch));
        }
    }
    Ok(septets)
}

/// Decode unpacked GSM septets back to text.
///
/// Unknown extension codes are dropped, matching how handsets render them.
pub fn decode_7bit(septets: &[u8]) -> String {
    let mut result = String::with_capacity(septets.len());
    let mut escape = false;

    for &septet in septets {
        let septet = septet & 0x7F;
        if escape {
            escape = false;
            if let Some(&(_, ch)) = GSM7_EXTENSION.iter().find(|&&(c, _)| c == septet) {
                result.push(ch);
            }
        } else if septet == ESCAPE {
            escape = true;
        } else {
            result.push(GSM7_BASIC[septet as usize]);
        }
    }

    result
}

/// Pack 7-bit values into octets, least significant bits first.
///
/// When the last octet would carry seven spare bits they are filled with a
/// CR septet so receivers do not read a trailing `@`.
pub fn pack_septets(septets: &[u8]) -> Vec<u8> {
    let mut packed = Vec::with_capacity(septets.len() * 7 / 8 + 1);
    let mut bits_pending = 0u16;
    let mut pending_bits = 0u8;

    for &septet in septets {
        bits_pending |= ((septet & 0x7F) as u16) << pending_bits;
        pending_bits += 7;

        while pending_bits >= 8 {
            packed.push((bits_pending & 0xFF) as u8);
            bits_pending >>= 8;
            pending_bits -= 8;
        }
    }

    if pending_bits == 1 {
        bits_pending |= (CARRIAGE_RETURN as u16) << 1;
    }
    if pending_bits > 0 {
        packed.push((bits_pending & 0xFF) as u8);
    }

    packed
}

/// Encode text as UCS-2 big-endian code units (UTF-16BE, surrogate pairs kept).
pub fn encode_ucs2(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(|unit| unit.to_be_bytes()).collect()
}

/// Decode UCS-2 big-endian bytes back to text. Unpaired surrogates become
/// U+FFFD.
pub fn decode_ucs2(data: &[u8]) -> Result<String, CharsetError> {
    if data.len() % 2 != 0 {
        return Err(CharsetError::OddLength(data.len()));
    }

    let units = data
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));

    Ok(char::decode_utf16(units)
        .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect())
}

/// Parse a hex string that may carry an odd number of digits.
///
/// A dangling final digit is read as the high nibble of one last byte.
pub fn parse_odd_hex(input: &str) -> Result<Vec<u8>, CharsetError> {
    let decoded = if input.len() % 2 == 0 {
        hex::decode(input)
    } else {
        hex::decode(format!("{input}0"))
    };
    decoded.map_err(|e| CharsetError::InvalidHex(e.to_string()))
}

/// Render bytes as uppercase hex, the representation used on the wire.
pub fn to_hex(data: &[u8]) -> String {
    hex::encode_upper(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_gsm_alpha() {
        assert!(is_gsm_alpha("hello world"));
        assert!(is_gsm_alpha("price: 5€ [promo]"));
        assert!(!is_gsm_alpha("hello 世界"));
        assert!(!is_gsm_alpha("\x1b"));
    }

    #[test]
    fn test_encode_7bit_hello_world() {
        let septets = encode_7bit("Hello world").unwrap();
        assert_eq!(to_hex(&septets), "48656C6C6F20776F726C64");
    }

    #[test]
    fn test_encode_7bit_extension_characters() {
        let septets = encode_7bit("€").unwrap();
        assert_eq!(septets, vec![0x1B, 0x65]);
        assert_eq!(decode_7bit(&septets), "€");
    }

    #[test]
    fn test_encode_7bit_rejects_unicode() {
        assert_eq!(encode_7bit("a世"), Err(CharsetError::Unrepresentable('世')));
    }

    #[test]
    fn test_pack_septets_sender_mask() {
        let packed = pack_septets(&encode_7bit("Voyager").unwrap());
        assert_eq!(to_hex(&packed), "D6773E7C2ECB1B");

        let packed = pack_septets(&encode_7bit("test").unwrap());
        assert_eq!(to_hex(&packed), "F4F29C0E");
    }

    #[test]
    fn test_ucs2_round_trip_with_surrogates() {
        assert_eq!(to_hex(&encode_ucs2("😃")), "D83DDE03");
        assert_eq!(to_hex(&encode_ucs2("a")), "0061");
        assert_eq!(decode_ucs2(&hex::decode("D83DDE03").unwrap()).unwrap(), "😃");
    }

    #[test]
    fn test_decode_ucs2_odd_length() {
        assert_eq!(decode_ucs2(&[0x00]), Err(CharsetError::OddLength(1)));
    }

    #[test]
    fn test_parse_odd_hex() {
        assert_eq!(parse_odd_hex("414").unwrap(), vec![0x41, 0x40]);
        assert_eq!(parse_odd_hex("4142").unwrap(), vec![0x41, 0x42]);
        assert!(parse_odd_hex("ZZ").is_err());
    }
}
