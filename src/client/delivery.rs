// ABOUTME: Delivery notification and mobile originated message tasks with their acknowledgments
// ABOUTME: Classifies inbound messages as single or multi-part and decodes payloads for the handlers

use super::default::Shared;
use super::handler::Handler;
use super::types::DeliverMsgPart;
use crate::charset::{decode_7bit, decode_ucs2, parse_odd_hex};
use crate::datatypes::xser::{self, Concatenation, DCS_TAG, UDH_TAG};
use crate::datatypes::{
    Ack, DataCoding, DeliverShortMessage, DeliveryNotification, Operation,
};
use crate::frame::Frame;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Acknowledge delivery notifications and hand them to `handler`
pub(crate) async fn run_notifications(
    shared: Arc<Shared>,
    mut frames: mpsc::Receiver<Frame>,
    handler: Arc<dyn Handler>,
    token: CancellationToken,
) {
    loop {
        let frame = tokio::select! {
            _ = token.cancelled() => break,
            frame = frames.recv() => match frame {
                Some(frame) => frame,
                None => break,
            },
        };

        let notification = match DeliveryNotification::from_frame(&frame) {
            Ok(notification) => notification,
            Err(e) => {
                warn!("dropping delivery notification: {}", e);
                continue;
            }
        };

        let message_id = notification.message_id();
        let ack = Operation::DeliveryNotifAck(Ack::positive(message_id.as_str()));
        if let Err(e) = shared.write_operation(&notification.reference, &ack).await {
            warn!("error writing delivery notification ack: {}", e);
        }

        handler.handle(
            &notification.sender,
            &notification.receiver,
            &message_id,
            &notification.text(),
            &shared.access_code,
        );
    }

    debug!("delivery notification task terminated");
}

/// Acknowledge a mobile originated message and turn it into a fragment.
///
/// Returns `None` when the frame does not carry a delivery layout.
async fn classify(shared: &Shared, frame: &Frame) -> Option<DeliverMsgPart> {
    let mo = match DeliverShortMessage::from_frame(frame) {
        Ok(mo) => mo,
        Err(e) => {
            warn!("dropping delivery short message: {}", e);
            return None;
        }
    };

    let ack = Operation::DeliverySmAck(Ack::positive(mo.ack_message()));
    if let Err(e) = shared.write_operation(&mo.reference, &ack).await {
        warn!("error writing delivery short message ack: {}", e);
    }

    let services = xser::parse(&mo.xser);
    let part = DeliverMsgPart {
        message_id: mo.message_id(),
        data_coding: DataCoding::from_xser(services.get(DCS_TAG).map(String::as_str)),
        sender: mo.sender,
        receiver: mo.receiver,
        message: mo.message,
        ..Default::default()
    };

    let Some(udh) = services.get(UDH_TAG) else {
        return Some(part);
    };
    match Concatenation::from_udh(udh) {
        Some(concat) => Some(part.with_concatenation(concat)),
        None => {
            warn!("unreadable concatenation header {:?}, treating as single part", udh);
            Some(part)
        }
    }
}

/// Stage A of the mobile originated pipeline: acknowledge and route to
/// reassembly (`parts`) or straight to the handler stage (`complete`).
pub(crate) async fn run_messages(
    shared: Arc<Shared>,
    mut frames: mpsc::Receiver<Frame>,
    parts: mpsc::Sender<DeliverMsgPart>,
    complete: mpsc::Sender<DeliverMsgPart>,
    token: CancellationToken,
) {
    loop {
        let frame = tokio::select! {
            _ = token.cancelled() => break,
            frame = frames.recv() => match frame {
                Some(frame) => frame,
                None => break,
            },
        };

        let Some(part) = classify(&shared, &frame).await else {
            continue;
        };

        let next = if part.total_parts > 0 { &parts } else { &complete };
        tokio::select! {
            _ = token.cancelled() => break,
            sent = next.send(part) => if sent.is_err() { break },
        }
    }

    debug!("delivery short message task terminated");
}

/// Stage C of the mobile originated pipeline: decode and hand to `handler`
pub(crate) async fn run_complete(
    mut complete: mpsc::Receiver<DeliverMsgPart>,
    handler: Arc<dyn Handler>,
    access_code: String,
    token: CancellationToken,
) {
    loop {
        let message = tokio::select! {
            _ = token.cancelled() => break,
            message = complete.recv() => match message {
                Some(message) => message,
                None => break,
            },
        };

        handler.handle(
            &message.sender,
            &message.receiver,
            &message.message_id,
            &decode_payload(&message.message, &message.data_coding),
            &access_code,
        );
    }

    debug!("complete delivery short message task terminated");
}

/// Turn an on-air payload back into text according to its data coding.
///
/// Payloads that do not decode are handed over as received.
pub fn decode_payload(payload: &str, data_coding: &DataCoding) -> String {
    let decoded = match data_coding {
        DataCoding::Gsm7 => parse_odd_hex(payload).map(|septets| decode_7bit(&septets)),
        DataCoding::Ucs2 => parse_odd_hex(payload).and_then(|bytes| decode_ucs2(&bytes)),
        DataCoding::Unspecified | DataCoding::Other(_) => {
            return match hex::decode(payload) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(_) => payload.to_string(),
            };
        }
    };

    decoded.unwrap_or_else(|e| {
        warn!("undecodable payload {:?}: {}", payload, e);
        payload.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_gsm_payload() {
        assert_eq!(decode_payload("48656C6C6F", &DataCoding::Gsm7), "Hello");
        // odd digit count is tolerated
        assert_eq!(decode_payload("41414", &DataCoding::Gsm7), "AA¡");
        // ESC + 0x65 is the euro sign
        assert_eq!(decode_payload("1B65", &DataCoding::Gsm7), "€");
    }

    #[test]
    fn test_decode_ucs2_payload() {
        assert_eq!(decode_payload("65E5672C", &DataCoding::Ucs2), "日本");
        assert_eq!(decode_payload("D83DDC4C", &DataCoding::Ucs2), "👌");
    }

    #[test]
    fn test_decode_unknown_coding() {
        assert_eq!(decode_payload("6869", &DataCoding::Unspecified), "hi");
        assert_eq!(
            decode_payload("6869", &DataCoding::Other("04".to_string())),
            "hi"
        );
        assert_eq!(decode_payload("plain", &DataCoding::Unspecified), "plain");
    }

    #[test]
    fn test_decode_failure_returns_raw() {
        assert_eq!(decode_payload("ZZ", &DataCoding::Gsm7), "ZZ");
        assert_eq!(decode_payload("65E567", &DataCoding::Ucs2), "65E567");
    }
}
