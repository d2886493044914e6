// ABOUTME: Supporting types for UCP client operations: login credentials and inbound message parts
// ABOUTME: DeliverMsgPart flows through the mobile originated pipeline from classification to callback

use crate::datatypes::DataCoding;
use crate::datatypes::xser::Concatenation;

/// Login credentials for the session management operation
#[derive(Clone, Default)]
pub struct Credentials {
    /// SMSC user, also the originator of keep-alive alerts
    pub user: String,
    pub password: String,
    /// Passed through to the handlers untouched
    pub access_code: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            access_code: String::new(),
        }
    }

    pub fn with_access_code(mut self, access_code: impl Into<String>) -> Self {
        self.access_code = access_code.into();
        self
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("access_code", &self.access_code)
            .finish()
    }
}

/// Key grouping the fragments of one concatenated message
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReassemblyKey {
    pub sender: String,
    pub receiver: String,
    pub concat_ref: u8,
}

/// One mobile originated fragment, or a whole message once reassembled
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct DeliverMsgPart {
    /// 1-based part number, 0 for single part messages
    pub current_part: u8,
    /// Number of parts, 0 for single part messages
    pub total_parts: u8,
    pub concat_ref: u8,
    pub sender: String,
    pub receiver: String,
    /// On-air payload, hex encoded
    pub message: String,
    pub message_id: String,
    pub data_coding: DataCoding,
}

impl DeliverMsgPart {
    pub fn with_concatenation(mut self, concat: Concatenation) -> Self {
        self.concat_ref = concat.reference;
        self.total_parts = concat.total;
        self.current_part = concat.part;
        self
    }

    pub fn key(&self) -> ReassemblyKey {
        ReassemblyKey {
            sender: self.sender.clone(),
            receiver: self.receiver.clone(),
            concat_ref: self.concat_ref,
        }
    }

    pub fn is_multipart(&self) -> bool {
        self.total_parts > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials = Credentials::new("emi_client", "secret").with_access_code("2371");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("emi_client"));
        assert!(debug.contains("2371"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_part_key() {
        let part = DeliverMsgPart {
            sender: "09191234567".to_string(),
            receiver: "2371".to_string(),
            ..Default::default()
        }
        .with_concatenation(Concatenation {
            reference: 0x6D,
            total: 5,
            part: 1,
        });

        assert!(part.is_multipart());
        assert_eq!(
            part.key(),
            ReassemblyKey {
                sender: "09191234567".to_string(),
                receiver: "2371".to_string(),
                concat_ref: 0x6D,
            }
        );
    }
}
