use crate::codec::{CodecError, OpCode};
use crate::frame::{Frame, NEGATIVE_ACK, POSITIVE_ACK};

/// Acknowledgment sent back for an inbound delivery (52) or delivery
/// notification (53).
#[derive(Clone, Debug, PartialEq)]
pub enum Ack {
    Positive {
        modified_validity_period: String,
        system_message: String,
    },
    Negative {
        error_code: String,
        system_message: String,
    },
}

impl Ack {
    pub fn positive(system_message: impl Into<String>) -> Self {
        Ack::Positive {
            modified_validity_period: String::new(),
            system_message: system_message.into(),
        }
    }

    pub fn negative(error_code: impl Into<String>, system_message: impl Into<String>) -> Self {
        Ack::Negative {
            error_code: error_code.into(),
            system_message: system_message.into(),
        }
    }

    pub fn fields(&self) -> [&str; 3] {
        match self {
            Ack::Positive {
                modified_validity_period,
                system_message,
            } => [POSITIVE_ACK, modified_validity_period.as_str(), system_message.as_str()],
            Ack::Negative {
                error_code,
                system_message,
            } => [NEGATIVE_ACK, error_code.as_str(), system_message.as_str()],
        }
    }
}

/// SMSC answer to one of our operations
#[derive(Clone, Debug, PartialEq)]
pub enum AckResponse {
    Positive(Frame),
    Negative { code: String, message: String },
}

impl AckResponse {
    /// Interpret a result frame for `expected` carrying at least `min_fields`
    /// fields.
    pub fn from_frame(frame: Frame, expected: OpCode, min_fields: usize) -> Result<Self, CodecError> {
        if frame.len() < min_fields {
            return Err(CodecError::MalformedPacket(format!(
                "{expected:?} response has {} fields, expected at least {min_fields}",
                frame.len()
            )));
        }

        if frame.op_code() != Some(expected) {
            return Err(CodecError::UnknownOperation(format!(
                "expected {expected} response, got {}",
                frame.code()
            )));
        }

        if frame.is_positive_ack() {
            return Ok(AckResponse::Positive(frame));
        }

        let (code, message) = frame.nack_details().ok_or_else(|| {
            CodecError::MalformedPacket("negative ack without error code".to_string())
        })?;

        Ok(AckResponse::Negative {
            code: code.to_string(),
            message: message.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_frame, encode_frame};
    use crate::datatypes::Operation;

    #[test]
    fn test_delivery_notification_ack() {
        let frame = encode_frame("03", &Operation::DeliveryNotifAck(Ack::positive("")));
        assert_eq!(frame.as_ref(), b"\x0203/00020/R/53/A///99\x03");
    }

    #[test]
    fn test_delivery_sm_ack() {
        let frame = encode_frame(
            "26",
            &Operation::DeliverySmAck(Ack::positive("2371:121017010208")),
        );
        assert_eq!(frame.as_ref(), b"\x0226/00037/R/52/A//2371:121017010208/03\x03");
    }

    #[test]
    fn test_session_response_authenticated() {
        let frame = decode_frame(b"\x0200/00037/R/60/A/BIND AUTHENTICATED/6D\x03").unwrap();
        let response = AckResponse::from_frame(frame, OpCode::SessionManagement, 6).unwrap();
        assert!(matches!(response, AckResponse::Positive(_)));
    }

    #[test]
    fn test_session_response_nack() {
        let frame = decode_frame(b"\x0200/00022/R/60/N/01/checksum error/04\x03").unwrap();
        let response = AckResponse::from_frame(frame, OpCode::SessionManagement, 6).unwrap();
        assert_eq!(
            response,
            AckResponse::Negative {
                code: "01".to_string(),
                message: "checksum error".to_string(),
            }
        );
    }

    #[test]
    fn test_session_response_wrong_operation() {
        let frame = decode_frame(b"\x0204/00024/R/31/A/0003/5D\x03").unwrap();
        assert!(matches!(
            AckResponse::from_frame(frame, OpCode::SessionManagement, 6),
            Err(CodecError::UnknownOperation(_))
        ));
    }
}
