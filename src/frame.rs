//! Decoded UCP frame
//!
//! A [`Frame`] is the ordered field list of one inbound packet, with the
//! start/end markers stripped. The header occupies the first four positions
//! (transaction reference, length, O/R, operation code) and the checksum the
//! last one; everything in between is operation data.

use crate::codec::{CodecError, MIN_FIELDS, OpCode, OpType};

/// Position of the transaction reference
pub const REFERENCE_INDEX: usize = 0;
/// Position of the O/R marker
pub const OP_TYPE_INDEX: usize = 2;
/// Position of the operation code
pub const OP_CODE_INDEX: usize = 3;
/// Position of the ACK/NACK marker in result frames
pub const ACK_INDEX: usize = 4;
/// Distance of the error code from the end of a NACK
const ERR_CODE_OFFSET: usize = 3;
/// Distance of the error message from the end of a NACK
const ERR_MSG_OFFSET: usize = 2;

/// Positive acknowledgment marker
pub const POSITIVE_ACK: &str = "A";
/// Negative acknowledgment marker
pub const NEGATIVE_ACK: &str = "N";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    fields: Vec<String>,
}

impl Frame {
    /// Wrap an already split field list. Callers guarantee at least
    /// [`MIN_FIELDS`] entries; [`crate::codec::decode_frame`] enforces it.
    pub(crate) fn new(fields: Vec<String>) -> Self {
        debug_assert!(fields.len() >= MIN_FIELDS);
        Frame { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Fetch a field that the operation layout requires
    pub fn require(&self, index: usize, name: &'static str) -> Result<&str, CodecError> {
        self.field(index).ok_or_else(|| {
            CodecError::MalformedPacket(format!(
                "missing field '{name}' at index {index} (frame has {} fields)",
                self.fields.len()
            ))
        })
    }

    /// Fetch an operation data field; the trailing checksum never counts
    pub fn data_field(&self, index: usize, name: &'static str) -> Result<&str, CodecError> {
        if index + 1 >= self.fields.len() {
            return Err(CodecError::MalformedPacket(format!(
                "missing field '{name}' at index {index} (frame has {} fields)",
                self.fields.len()
            )));
        }
        Ok(&self.fields[index])
    }

    pub fn reference(&self) -> &str {
        &self.fields[REFERENCE_INDEX]
    }

    pub fn op_type(&self) -> Option<OpType> {
        OpType::parse(&self.fields[OP_TYPE_INDEX])
    }

    /// The operation code as transmitted, even when unknown
    pub fn code(&self) -> &str {
        &self.fields[OP_CODE_INDEX]
    }

    pub fn op_code(&self) -> Option<OpCode> {
        OpCode::parse(self.code())
    }

    /// Operation data: everything between the header and the checksum
    pub fn data(&self) -> &[String] {
        let end = self.fields.len().saturating_sub(1).max(MIN_FIELDS);
        &self.fields[MIN_FIELDS..end]
    }

    pub fn is_positive_ack(&self) -> bool {
        self.field(ACK_INDEX) == Some(POSITIVE_ACK)
    }

    pub fn is_negative_ack(&self) -> bool {
        self.field(ACK_INDEX) == Some(NEGATIVE_ACK)
    }

    /// Error code and message carried by a NACK
    pub fn nack_details(&self) -> Option<(&str, &str)> {
        let len = self.fields.len();
        if len < ERR_CODE_OFFSET + ACK_INDEX + 1 {
            return None;
        }
        Some((
            &self.fields[len - ERR_CODE_OFFSET],
            &self.fields[len - ERR_MSG_OFFSET],
        ))
    }
}
