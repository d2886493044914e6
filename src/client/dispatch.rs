// ABOUTME: Inbound dispatcher owning the read half and routing frames to per-purpose mailboxes
// ABOUTME: Malformed or unknown frames are logged and dropped; end of stream stops the task

use crate::codec::{OpCode, decode_frame, verify_checksum};
use crate::connection::FrameReader;
use crate::frame::Frame;
use std::io;
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Single slot mailboxes fed by the dispatcher
pub(crate) struct Mailboxes {
    pub submit_responses: mpsc::Sender<Frame>,
    pub notifications: mpsc::Sender<Frame>,
    pub messages: mpsc::Sender<Frame>,
}

fn is_disconnect(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::UnexpectedEof
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::NotConnected
    )
}

/// Read frames until end of stream or cancellation.
///
/// A full mailbox blocks the dispatcher until its consumer catches up.
pub(crate) async fn run<R>(
    mut reader: FrameReader<R>,
    mailboxes: Mailboxes,
    check_sums: bool,
    token: CancellationToken,
) where
    R: AsyncRead + Unpin,
{
    loop {
        let read = tokio::select! {
            _ = token.cancelled() => break,
            read = reader.read_frame() => read,
        };

        let raw = match read {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("read EOF");
                break;
            }
            Err(e) if is_disconnect(&e) => {
                debug!("connection lost: {}", e);
                break;
            }
            Err(e) => {
                warn!("read error: {}", e);
                continue;
            }
        };

        if check_sums {
            if let Err(e) = verify_checksum(&raw) {
                warn!("dropping frame {:?}: {}", String::from_utf8_lossy(&raw), e);
                continue;
            }
        }

        let frame = match decode_frame(&raw) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("dropping frame {:?}: {}", String::from_utf8_lossy(&raw), e);
                continue;
            }
        };

        let mailbox = match frame.op_code() {
            Some(OpCode::SubmitShortMessage) => {
                debug!("submit response: {:?}", frame.fields());
                &mailboxes.submit_responses
            }
            Some(OpCode::DeliveryNotification) => {
                debug!("delivery notification: {:?}", frame.fields());
                &mailboxes.notifications
            }
            Some(OpCode::DeliveryShortMessage) => {
                debug!("delivery short message: {:?}", frame.fields());
                &mailboxes.messages
            }
            Some(OpCode::Alert) => {
                debug!("alert: {:?}", frame.fields());
                continue;
            }
            _ => {
                warn!("unknown operation type: {:?}", frame.fields());
                continue;
            }
        };

        tokio::select! {
            _ = token.cancelled() => break,
            sent = mailbox.send(frame) => {
                if let Err(e) = sent {
                    debug!("mailbox closed, dropping {:?}", e.0.fields());
                }
            }
        }
    }

    debug!("dispatcher terminated");
}
