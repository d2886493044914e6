mod ack;
mod alert;
mod deliver;
mod message_type;
mod session;
mod submit;
pub mod xser;

pub use ack::{Ack, AckResponse};
pub use alert::Alert;
pub use deliver::{DeliverShortMessage, DeliveryNotification};
pub use message_type::{DataCoding, MessageType};
pub use session::Session;
pub use submit::{Submit, mask_sender};

use crate::codec::{OpCode, OpType};

/// Every operation this client puts on the wire.
///
/// Each variant serialises to a fixed, ordered field list; reordering those
/// fields breaks interoperability with the SMSC.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    Session(Session),
    Alert(Alert),
    Submit(Box<Submit>),
    DeliverySmAck(Ack),
    DeliveryNotifAck(Ack),
}

impl Operation {
    pub fn code(&self) -> OpCode {
        match self {
            Operation::Session(_) => OpCode::SessionManagement,
            Operation::Alert(_) => OpCode::Alert,
            Operation::Submit(_) => OpCode::SubmitShortMessage,
            Operation::DeliverySmAck(_) => OpCode::DeliveryShortMessage,
            Operation::DeliveryNotifAck(_) => OpCode::DeliveryNotification,
        }
    }

    pub fn op_type(&self) -> OpType {
        match self {
            Operation::Session(_) | Operation::Alert(_) | Operation::Submit(_) => {
                OpType::Operation
            }
            Operation::DeliverySmAck(_) | Operation::DeliveryNotifAck(_) => OpType::Result,
        }
    }

    pub fn fields(&self) -> Vec<&str> {
        match self {
            Operation::Session(session) => session.fields().to_vec(),
            Operation::Alert(alert) => alert.fields().to_vec(),
            Operation::Submit(submit) => submit.fields().to_vec(),
            Operation::DeliverySmAck(ack) | Operation::DeliveryNotifAck(ack) => {
                ack.fields().to_vec()
            }
        }
    }
}
