// UCP/EMI Codec - Separates wire framing from the operation models
//
// Every frame on the wire has the same shape:
//
//   STX TRN/LEN/O|R/OT/field_1/.../field_n/CHECKSUM ETX
//
// Operations only describe their ordered field list; this module owns the
// reference, length and checksum bookkeeping around them.

use crate::datatypes::Operation;
use crate::frame::Frame;
use bytes::{BufMut, Bytes, BytesMut};
use num_enum::TryFromPrimitive;
use std::fmt;
use thiserror::Error;

/// Start of a frame
pub const STX: u8 = 0x02;

/// End of a frame
pub const ETX: u8 = 0x03;

/// Field separator
pub const DELIMITER: u8 = b'/';

/// Bytes of a frame that are not operation data:
///
/// ```text
/// +--------------------------------------------------------------------------+
/// | X | X | / | X | X | X | X | X | / | X | / | X | X | / | DATA | / | X | X |
/// | 1 | 2 | 3 | 4 | 5 | 6 | 7 | 8 | 9 | 10| 11| 12| 13| 14|      | 15| 16| 17|
/// +--------------------------------------------------------------------------+
/// ```
pub const PDU_LEN_MINUS_DATA: usize = 17;

/// Minimum number of fields a decoded frame must carry (TRN, LEN, O/R, OT)
pub const MIN_FIELDS: usize = 4;

/// Operation codes understood by this client
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpCode {
    Alert = 31,
    SubmitShortMessage = 51,
    DeliveryShortMessage = 52,
    DeliveryNotification = 53,
    SessionManagement = 60,
}

impl OpCode {
    /// Parse the two digit code carried in a frame
    pub fn parse(code: &str) -> Option<Self> {
        if code.len() != 2 {
            return None;
        }
        code.parse::<u8>().ok().and_then(|c| OpCode::try_from(c).ok())
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", *self as u8)
    }
}

/// Whether a frame is an operation or the result of one
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpType {
    Operation,
    Result,
}

impl OpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpType::Operation => "O",
            OpType::Result => "R",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "O" => Some(OpType::Operation),
            "R" => Some(OpType::Result),
            _ => None,
        }
    }
}

/// Codec errors with enough context to log a dropped frame
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Malformed packet: {0}")]
    MalformedPacket(String),

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Field '{field}' validation failed: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Compute the checksum of a UCP packet: the low byte of the sum of all
/// bytes, as two uppercase hex digits.
pub fn checksum(data: &[u8]) -> String {
    let sum = data.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    format!("{sum:02X}")
}

/// Build a frame from its raw parts.
///
/// `fields` are joined by the delimiter; the length and checksum are derived
/// from them. This is the single place the wire layout is produced.
pub fn encode_raw(reference: &str, op_type: OpType, code: OpCode, fields: &[&str]) -> Bytes {
    let joined = fields.join("/");
    let length = PDU_LEN_MINUS_DATA + joined.len();

    let mut body = BytesMut::with_capacity(length);
    body.put_slice(reference.as_bytes());
    body.put_u8(DELIMITER);
    body.put_slice(format!("{length:05}").as_bytes());
    body.put_u8(DELIMITER);
    body.put_slice(op_type.as_str().as_bytes());
    body.put_u8(DELIMITER);
    body.put_slice(code.to_string().as_bytes());
    body.put_u8(DELIMITER);
    body.put_slice(joined.as_bytes());
    body.put_u8(DELIMITER);

    let sum = checksum(&body);

    let mut buf = BytesMut::with_capacity(body.len() + sum.len() + 2);
    buf.put_u8(STX);
    buf.put_slice(&body);
    buf.put_slice(sum.as_bytes());
    buf.put_u8(ETX);
    buf.freeze()
}

/// Encode an operation under the given transaction reference
pub fn encode_frame(reference: &str, operation: &Operation) -> Bytes {
    encode_raw(
        reference,
        operation.op_type(),
        operation.code(),
        &operation.fields(),
    )
}

fn strip_markers(raw: &[u8]) -> &[u8] {
    let start = raw
        .iter()
        .position(|&b| b != STX && b != ETX)
        .unwrap_or(raw.len());
    let end = raw
        .iter()
        .rposition(|&b| b != STX && b != ETX)
        .map_or(start, |pos| pos + 1);
    &raw[start..end]
}

/// Decode a raw frame into its ordered field list.
///
/// The checksum is not verified here; see [`verify_checksum`].
pub fn decode_frame(raw: &[u8]) -> Result<Frame, CodecError> {
    let body = std::str::from_utf8(strip_markers(raw))
        .map_err(|e| CodecError::MalformedPacket(format!("invalid UTF-8: {e}")))?;

    let fields: Vec<String> = body.split('/').map(str::to_owned).collect();
    if fields.len() < MIN_FIELDS {
        return Err(CodecError::MalformedPacket(format!(
            "expected at least {MIN_FIELDS} fields, got {}",
            fields.len()
        )));
    }

    Ok(Frame::new(fields))
}

/// Recompute the checksum of a raw frame and compare it with the transmitted one
pub fn verify_checksum(raw: &[u8]) -> Result<(), CodecError> {
    let body = strip_markers(raw);
    let split = body
        .iter()
        .rposition(|&b| b == DELIMITER)
        .ok_or_else(|| CodecError::MalformedPacket("missing checksum delimiter".to_string()))?;

    let (covered, transmitted) = body.split_at(split + 1);
    let expected = checksum(covered);
    let actual = String::from_utf8_lossy(transmitted).to_string();

    if expected.eq_ignore_ascii_case(&actual) {
        Ok(())
    } else {
        Err(CodecError::ChecksumMismatch { expected, actual })
    }
}
