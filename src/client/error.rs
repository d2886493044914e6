// ABOUTME: UCP client error types covering transport, framing, SMSC rejections and timeouts
// ABOUTME: SendError keeps the message ids collected before a multi-part send failed

use crate::charset::CharsetError;
use crate::codec::CodecError;
use std::io;
use thiserror::Error;

/// Error code reported when the SMSC does not answer in time
pub const TIMEOUT_CODE: &str = "010";
/// Error message reported when the SMSC does not answer in time
pub const TIMEOUT_MESSAGE: &str = "Network time-out";

/// Error type for UCP client operations
#[derive(Debug, Error)]
pub enum UcpError {
    /// I/O error during network operations (connection, read, write)
    #[error("Connection error: {0}")]
    Connection(#[from] io::Error),

    /// Inbound frame could not be decoded
    #[error("Malformed frame: {0}")]
    Malformed(#[from] CodecError),

    /// Negative acknowledgment from the SMSC
    #[error("Protocol error {code}: {message}")]
    Protocol { code: String, message: String },

    /// No response within the configured window
    #[error("Protocol error 010: Network time-out")]
    Timeout,

    /// Connection closed while waiting for a response
    #[error("Connection closed unexpectedly")]
    ConnectionClosed,

    /// Client not in correct state for operation
    #[error("Invalid client state: {0}")]
    InvalidState(String),

    /// Text cannot be carried by the selected alphabet
    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl UcpError {
    /// SMSC error code, or the fixed timeout code
    pub fn code(&self) -> Option<&str> {
        match self {
            UcpError::Protocol { code, .. } => Some(code),
            UcpError::Timeout => Some(TIMEOUT_CODE),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, UcpError::Timeout)
    }
}

impl From<CharsetError> for UcpError {
    fn from(err: CharsetError) -> Self {
        UcpError::Encoding(err.to_string())
    }
}

/// Result type alias for UCP operations
pub type UcpResult<T> = Result<T, UcpError>;

/// Failure of a send, with the ids of the segments accepted before it
#[derive(Debug, Error)]
#[error("{source}")]
pub struct SendError {
    pub message_ids: Vec<String>,
    #[source]
    pub source: UcpError,
}

impl SendError {
    pub fn new(message_ids: Vec<String>, source: UcpError) -> Self {
        SendError {
            message_ids,
            source,
        }
    }
}

impl From<UcpError> for SendError {
    fn from(source: UcpError) -> Self {
        SendError::new(Vec::new(), source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let nack = UcpError::Protocol {
            code: "02".to_string(),
            message: "syntax error".to_string(),
        };
        assert_eq!(nack.code(), Some("02"));
        assert_eq!(nack.to_string(), "Protocol error 02: syntax error");

        assert_eq!(UcpError::Timeout.code(), Some("010"));
        assert_eq!(
            UcpError::Timeout.to_string(),
            "Protocol error 010: Network time-out"
        );
        assert_eq!(UcpError::ConnectionClosed.code(), None);
    }

    #[test]
    fn test_send_error_keeps_partial_ids() {
        let err = SendError::new(vec!["1:2".to_string()], UcpError::Timeout);
        assert_eq!(err.message_ids, vec!["1:2"]);
        assert!(err.source.is_timeout());
    }
}
