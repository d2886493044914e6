// ABOUTME: Splits outbound text into segments that fit one submit each
// ABOUTME: Leaves room for the concatenation header and never splits a character across segments

use crate::charset::septet_len;
use crate::datatypes::MessageType;

/// Septets available to a single part GSM message
pub const GSM_MAX_SINGLE_PART: usize = 160;
/// Septets available once a 6 octet UDH is present (6 * 8/7, rounded up)
pub const GSM_MAX_MULTI_PART: usize = 153;
/// UTF-16 code units available to a single part UCS-2 message
pub const UCS2_MAX_SINGLE_PART: usize = 70;
/// UTF-16 code units available once a 6 octet UDH is present
pub const UCS2_MAX_MULTI_PART: usize = 64;

/// Outbound text split into on-air segments
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segments {
    pub message_type: MessageType,
    pub parts: Vec<String>,
}

impl Segments {
    pub fn is_multipart(&self) -> bool {
        self.parts.len() > 1
    }
}

/// Classify `text` and split it into segments for its alphabet
pub fn segment(text: &str) -> Segments {
    let message_type = MessageType::classify(text);
    let parts = match message_type {
        MessageType::AlphaNumeric => split_by_budget(
            text,
            GSM_MAX_SINGLE_PART,
            GSM_MAX_MULTI_PART,
            |ch| septet_len(ch).unwrap_or(1),
        ),
        MessageType::Transparent => split_by_budget(
            text,
            UCS2_MAX_SINGLE_PART,
            UCS2_MAX_MULTI_PART,
            char::len_utf16,
        ),
    };

    Segments {
        message_type,
        parts,
    }
}

/// Split `text` so no part costs more than `multi` units, unless the whole
/// text fits in `single`. Characters are never divided between parts.
fn split_by_budget(text: &str, single: usize, multi: usize, cost: impl Fn(char) -> usize) -> Vec<String> {
    let total: usize = text.chars().map(&cost).sum();
    if total <= single {
        return vec![text.to_string()];
    }

    let mut parts = Vec::with_capacity(total / multi + 1);
    let mut current = String::new();
    let mut used = 0;

    for ch in text.chars() {
        let units = cost(ch);
        if used + units > multi && !current.is_empty() {
            parts.push(std::mem::take(&mut current));
            used = 0;
        }
        current.push(ch);
        used += units;
    }

    if !current.is_empty() {
        parts.push(current);
    }

    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAGUEIS: &str = "Did you ever hear the tragedy of Darth Plagueis The Wise? I thought not. It's not a story the Jedi would tell you. It's a Sith legend. Darth Plagueis was a Dark Lord of the Sith, so powerful and so wise he could use the Force to influence the midichlorians to create life... He had such a knowledge of the dark side that he could even keep the ones he cared about from dying. The dark side of the Force is a pathway to many abilities some consider to be unnatural. He became so powerful... the only thing he was afraid of was losing his power, which eventually, of course, he did. Unfortunately, he taught his apprentice everything he knew, then his apprentice killed him in his sleep. Ironic. He could save others from death, but not himself.";

    #[test]
    fn test_short_gsm_message_is_single_part() {
        let segments = segment("Hello world");
        assert_eq!(segments.message_type, MessageType::AlphaNumeric);
        assert_eq!(segments.parts, vec!["Hello world"]);
        assert!(!segments.is_multipart());
    }

    #[test]
    fn test_gsm_boundary() {
        let exact = "a".repeat(160);
        assert_eq!(segment(&exact).parts.len(), 1);

        let over = "a".repeat(161);
        let parts = segment(&over).parts;
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].len(), 153);
        assert_eq!(parts[1].len(), 8);
    }

    #[test]
    fn test_gsm_multipart() {
        let segments = segment(PLAGUEIS);
        assert_eq!(segments.message_type, MessageType::AlphaNumeric);
        assert_eq!(segments.parts.len(), 5);
        assert_eq!(
            segments.parts[0],
            "Did you ever hear the tragedy of Darth Plagueis The Wise? I thought not. It's not a story the Jedi would tell you. It's a Sith legend. Darth Plagueis was"
        );
        assert_eq!(
            segments.parts[4],
            "prentice everything he knew, then his apprentice killed him in his sleep. Ironic. He could save others from death, but not himself."
        );
        assert_eq!(segments.parts.concat(), PLAGUEIS);
    }

    #[test]
    fn test_gsm_escape_pair_not_split() {
        let text = format!("{}€{}", "a".repeat(152), "b".repeat(20));
        let parts = segment(&text).parts;
        assert_eq!(parts[0], "a".repeat(152));
        assert!(parts[1].starts_with('€'));
        assert_eq!(parts.concat(), text);
        for part in &parts {
            let septets: usize = part.chars().filter_map(septet_len).sum();
            assert!(septets <= GSM_MAX_MULTI_PART);
        }
    }

    #[test]
    fn test_ucs2_single_part() {
        let text = "日".repeat(70);
        let segments = segment(&text);
        assert_eq!(segments.message_type, MessageType::Transparent);
        assert_eq!(segments.parts.len(), 1);
    }

    #[test]
    fn test_ucs2_surrogate_pairs_not_split() {
        let text = "👌👀👌👀👌👀👌👀👌👀 good shit go౦ԁ sHit👌 thats ✔ some good👌👌shit right👌👌there👌👌👌 right✔there ✔✔if i do ƽaү so my self 💯 i say so 💯 thats what im talking about";
        let segments = segment(text);
        assert_eq!(segments.message_type, MessageType::Transparent);
        assert!(segments.is_multipart());
        assert_eq!(segments.parts.concat(), text);

        for part in &segments.parts {
            let units: usize = part.chars().map(char::len_utf16).sum();
            assert!(units <= UCS2_MAX_MULTI_PART);
            let encoded: Vec<u16> = part.encode_utf16().collect();
            assert!(char::decode_utf16(encoded).all(|unit| unit.is_ok()));
        }
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(segment("").parts, vec![""]);
    }
}
