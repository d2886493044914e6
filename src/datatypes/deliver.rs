use crate::codec::CodecError;
use crate::frame::{Frame, REFERENCE_INDEX};

const DR_SENDER_INDEX: usize = 4;
const DR_RECEIVER_INDEX: usize = 5;
const DR_SCTS_INDEX: usize = 18;
const DR_MESSAGE_INDEX: usize = 24;

const MO_RECEIVER_INDEX: usize = 4;
const MO_SENDER_INDEX: usize = 5;
const MO_SCTS_INDEX: usize = 18;
const MO_MESSAGE_INDEX: usize = 24;
const MO_XSER_INDEX: usize = 34;

/// Delivery notification operation (53) received from the SMSC
#[derive(Clone, Debug, PartialEq)]
pub struct DeliveryNotification {
    pub reference: String,
    pub sender: String,
    pub receiver: String,
    /// Service centre time stamp of the original submit
    pub scts: String,
    /// Notification text, hex encoded
    pub message: String,
}

impl DeliveryNotification {
    pub fn from_frame(frame: &Frame) -> Result<Self, CodecError> {
        Ok(DeliveryNotification {
            reference: frame.require(REFERENCE_INDEX, "TRN")?.to_string(),
            sender: frame.data_field(DR_SENDER_INDEX, "AdC")?.to_string(),
            receiver: frame.data_field(DR_RECEIVER_INDEX, "OAdC")?.to_string(),
            scts: frame.data_field(DR_SCTS_INDEX, "SCTS")?.to_string(),
            message: frame.data_field(DR_MESSAGE_INDEX, "Msg")?.to_string(),
        })
    }

    /// Identifier of the submitted message this notification reports on
    pub fn message_id(&self) -> String {
        format!("{}:{}", self.receiver, self.scts)
    }

    /// Notification text; falls back to the raw field when it is not hex
    pub fn text(&self) -> String {
        match hex::decode(&self.message) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(_) => self.message.clone(),
        }
    }
}

/// Delivery short message operation (52): a mobile originated message
#[derive(Clone, Debug, PartialEq)]
pub struct DeliverShortMessage {
    pub reference: String,
    pub sender: String,
    pub receiver: String,
    pub scts: String,
    /// On-air payload, hex encoded
    pub message: String,
    pub xser: String,
}

impl DeliverShortMessage {
    pub fn from_frame(frame: &Frame) -> Result<Self, CodecError> {
        Ok(DeliverShortMessage {
            reference: frame.require(REFERENCE_INDEX, "TRN")?.to_string(),
            receiver: frame.data_field(MO_RECEIVER_INDEX, "AdC")?.to_string(),
            sender: frame.data_field(MO_SENDER_INDEX, "OAdC")?.to_string(),
            scts: frame.data_field(MO_SCTS_INDEX, "SCTS")?.to_string(),
            message: frame.data_field(MO_MESSAGE_INDEX, "Msg")?.to_string(),
            xser: frame.data_field(MO_XSER_INDEX, "Xser")?.to_string(),
        })
    }

    /// System message returned in the acknowledgment
    pub fn ack_message(&self) -> String {
        format!("{}:{}", self.receiver, self.scts)
    }

    /// Identifier handed to the short message handler
    pub fn message_id(&self) -> String {
        format!("{}:{}", self.sender, self.scts)
    }
}
