// ABOUTME: UCP client engine: login, rate-limited correlated sends and the long-running session tasks
// ABOUTME: One client owns one SMSC connection; close is idempotent and waits for every task to finish

use super::builder::ClientOptions;
use super::dispatch::{self, Mailboxes};
use super::error::{SendError, UcpError, UcpResult};
use super::flow_control::RateLimiter;
use super::keepalive::{self, KeepAliveStats, KeepAliveStatus};
use super::reference::ReferenceAllocator;
use super::{delivery, reassembly};
use crate::codec::{MIN_FIELDS, OpCode, decode_frame, encode_frame, verify_checksum};
use crate::connection::{FrameReader, FrameWriter};
use crate::datatypes::{AckResponse, Operation, Session, Submit, xser};
use crate::frame::Frame;
use crate::segment::segment;
use rand::Rng;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, PoisonError};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc};
use tokio::time::{Instant, timeout, timeout_at};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, trace, warn};

/// Fields a session management response carries at minimum
const OPEN_SESSION_RESP_MIN_LEN: usize = 6;
/// Position of the message identifier in a positive submit response
const SUBMIT_ID_INDEX: usize = 6;
/// Concatenation references are drawn from `0..MAX_CONCAT_REF`
const MAX_CONCAT_REF: u8 = 100;

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;
type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Connection state shared by the client and its tasks
pub(crate) struct Shared {
    writer: Mutex<FrameWriter<BoxedWriter>>,
    pub(crate) references: ReferenceAllocator,
    pub(crate) user: String,
    pub(crate) access_code: String,
    tps: AtomicU32,
    billing_id: std::sync::Mutex<String>,
    pub(crate) keep_alive: KeepAliveStats,
    // Cancelled by close; aborts writes stuck on a peer that stopped reading.
    closing: CancellationToken,
}

impl Shared {
    /// Encode `operation` and write it as one flushed unit
    pub(crate) async fn write_operation(&self, reference: &str, operation: &Operation) -> io::Result<()> {
        let frame = encode_frame(reference, operation);
        match operation {
            // keep credentials out of the logs
            Operation::Session(_) => debug!("writing login frame (reference {})", reference),
            _ => debug!("writing frame: {:?}", String::from_utf8_lossy(&frame)),
        }

        let write = async {
            let mut writer = self.writer.lock().await;
            writer.write_frame(&frame).await
        };

        tokio::select! {
            biased;
            _ = self.closing.cancelled() => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "connection closed",
            )),
            written = write => written,
        }
    }

    /// Shut the write side down. Callers cancel `closing` first so a blocked
    /// writer releases the lock.
    async fn shutdown(&self) -> io::Result<()> {
        self.writer.lock().await.shutdown().await
    }
}

/// Send-side state; holding its lock serialises sends on the connection
struct SendState {
    limiter: RateLimiter,
    responses: mpsc::Receiver<Frame>,
}

/// UCP client bound to one SMSC connection
///
/// Created logged in by [`UcpClient::connect`]. Keep-alive alerts, delivery
/// notifications and mobile originated messages are handled by background
/// tasks until [`UcpClient::close`] is called or the SMSC hangs up.
pub struct UcpClient {
    shared: Arc<Shared>,
    send_state: Mutex<SendState>,
    timeout: Duration,
    token: CancellationToken,
    tracker: TaskTracker,
    closed: AtomicBool,
}

impl UcpClient {
    /// Dial `options.addr`, log in and start the session tasks
    pub async fn connect(options: ClientOptions) -> UcpResult<Self> {
        let socket = TcpStream::connect(&options.addr).await?;
        debug!("connected to {}", options.addr);
        Self::connect_with(socket, options).await
    }

    /// Log in over an already established stream and start the session tasks.
    ///
    /// `options.addr` is not used.
    pub async fn connect_with<S>(stream: S, options: ClientOptions) -> UcpResult<Self>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (read_half, write_half) = tokio::io::split(stream);
        let mut reader = FrameReader::new(Box::new(read_half) as BoxedReader);
        let writer = FrameWriter::new(Box::new(write_half) as BoxedWriter);

        let options = options.normalized();
        let token = CancellationToken::new();
        let shared = Arc::new(Shared {
            writer: Mutex::new(writer),
            references: ReferenceAllocator::new(),
            user: options.credentials.user.clone(),
            access_code: options.credentials.access_code.clone(),
            tps: AtomicU32::new(options.tps),
            billing_id: std::sync::Mutex::new(options.billing_id.clone()),
            keep_alive: KeepAliveStats::default(),
            closing: token.clone(),
        });

        login(&shared, &mut reader, &options).await?;

        let tracker = TaskTracker::new();

        let (submit_tx, submit_rx) = mpsc::channel(1);
        let (notification_tx, notification_rx) = mpsc::channel(1);
        let (message_tx, message_rx) = mpsc::channel(1);
        let (part_tx, part_rx) = mpsc::channel(1);
        let (complete_tx, complete_rx) = mpsc::channel(1);

        tracker.spawn(keepalive::run(
            Arc::clone(&shared),
            options.keep_alive,
            token.clone(),
        ));
        tracker.spawn(dispatch::run(
            reader,
            Mailboxes {
                submit_responses: submit_tx,
                notifications: notification_tx,
                messages: message_tx,
            },
            options.verify_checksum,
            token.clone(),
        ));
        tracker.spawn(delivery::run_notifications(
            Arc::clone(&shared),
            notification_rx,
            Arc::clone(&options.delivery_handler),
            token.clone(),
        ));
        tracker.spawn(delivery::run_messages(
            Arc::clone(&shared),
            message_rx,
            part_tx,
            complete_tx.clone(),
            token.clone(),
        ));
        tracker.spawn(reassembly::run(
            part_rx,
            complete_tx,
            options.reassembly_ttl,
            options.reassembly_sweep_interval,
            token.clone(),
        ));
        tracker.spawn(delivery::run_complete(
            complete_rx,
            Arc::clone(&options.short_message_handler),
            shared.access_code.clone(),
            token.clone(),
        ));

        Ok(UcpClient {
            shared,
            send_state: Mutex::new(SendState {
                limiter: RateLimiter::new(options.tps),
                responses: submit_rx,
            }),
            timeout: options.timeout,
            token,
            tracker,
            closed: AtomicBool::new(false),
        })
    }

    /// Send `text` from `sender` to `receiver`, split into as many parts as
    /// needed.
    ///
    /// Returns one SMSC message id per part. On failure the error carries
    /// the ids of the parts accepted before it.
    pub async fn send(&self, sender: &str, receiver: &str, text: &str) -> Result<Vec<String>, SendError> {
        if self.is_closed() {
            return Err(UcpError::InvalidState("client is closed".to_string()).into());
        }

        let mut state = self.send_state.lock().await;

        let segments = segment(text);
        let total = u8::try_from(segments.parts.len()).map_err(|_| {
            UcpError::Encoding(format!(
                "message needs {} parts, at most 255 fit",
                segments.parts.len()
            ))
        })?;
        let concat_ref = rand::thread_rng().gen_range(0..MAX_CONCAT_REF);
        let billing_id = self.billing_id();
        state.limiter.set_rate(self.tps());

        let mut message_ids = Vec::with_capacity(segments.parts.len());
        for (part, chunk) in (1..=total).zip(&segments.parts) {
            let xser = xser::build(&billing_id, segments.message_type, concat_ref, total, part);
            let submit = match Submit::new(sender, receiver, chunk, segments.message_type, xser) {
                Ok(submit) => submit,
                Err(e) => return Err(SendError::new(message_ids, e.into())),
            };
            let reference = self.shared.references.next().to_string();

            state.limiter.acquire().await;
            let operation = Operation::Submit(Box::new(submit));
            if let Err(e) = self.shared.write_operation(&reference, &operation).await {
                warn!("error writing submit: {}", e);
                return Err(SendError::new(message_ids, e.into()));
            }

            match await_response(&mut state.responses, &reference, self.timeout).await {
                Ok(id) => message_ids.push(id),
                Err(e) => return Err(SendError::new(message_ids, e)),
            }
        }

        Ok(message_ids)
    }

    /// Stop every session task and close the connection.
    ///
    /// Safe to call more than once and from several tasks at the same time;
    /// every call returns once all tasks have finished.
    pub async fn close(&self) {
        debug!("closing client");
        self.token.cancel();

        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!("closing connection");
            if let Err(e) = self.shared.shutdown().await {
                debug!("error shutting down connection: {}", e);
            }
        }

        self.tracker.close();
        self.tracker.wait().await;
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire) || self.token.is_cancelled()
    }

    /// Submit rate (messages per second)
    pub fn tps(&self) -> u32 {
        self.shared.tps.load(Ordering::Relaxed)
    }

    /// Change the submit rate; applies from the next send
    pub fn set_tps(&self, tps: u32) {
        self.shared.tps.store(tps, Ordering::Relaxed);
    }

    pub fn billing_id(&self) -> String {
        self.shared
            .billing_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Change the billing identifier; applies from the next send
    pub fn set_billing_id(&self, billing_id: impl Into<String>) {
        *self
            .shared
            .billing_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = billing_id.into();
    }

    pub fn keep_alive_status(&self) -> KeepAliveStatus {
        self.shared.keep_alive.status()
    }
}

impl Drop for UcpClient {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Send the session management operation and wait for the SMSC verdict
async fn login(shared: &Shared, reader: &mut FrameReader<BoxedReader>, options: &ClientOptions) -> UcpResult<()> {
    let credentials = &options.credentials;
    let reference = shared.references.next().to_string();
    let session = Operation::Session(Session::login(&credentials.user, &credentials.password));
    shared.write_operation(&reference, &session).await?;

    let raw = match timeout(options.timeout, reader.read_frame()).await {
        Ok(read) => read?.ok_or(UcpError::ConnectionClosed)?,
        Err(_) => {
            warn!("no login response within {:?}", options.timeout);
            return Err(UcpError::Timeout);
        }
    };
    trace!("login response: {:?}", String::from_utf8_lossy(&raw));

    if options.verify_checksum {
        verify_checksum(&raw)?;
    }

    match AckResponse::from_frame(decode_frame(&raw)?, OpCode::SessionManagement, OPEN_SESSION_RESP_MIN_LEN)? {
        AckResponse::Positive(_) => {
            info!("logged in as {}", credentials.user);
            Ok(())
        }
        AckResponse::Negative { code, message } => {
            warn!("login rejected, code: {} message: {}", code, message);
            Err(UcpError::Protocol { code, message })
        }
    }
}

/// Wait for the submit response carrying `reference`.
///
/// Responses for other references are stale answers to earlier sends and
/// are discarded without extending the deadline.
async fn await_response(
    responses: &mut mpsc::Receiver<Frame>,
    reference: &str,
    window: Duration,
) -> UcpResult<String> {
    let deadline = Instant::now() + window;

    loop {
        let frame = match timeout_at(deadline, responses.recv()).await {
            Ok(Some(frame)) => frame,
            Ok(None) => return Err(UcpError::ConnectionClosed),
            Err(_) => {
                warn!("send timeout (reference {})", reference);
                return Err(UcpError::Timeout);
            }
        };

        if frame.reference() != reference {
            warn!(
                "discarding submit response for reference {} while waiting for {}",
                frame.reference(),
                reference
            );
            continue;
        }

        return match AckResponse::from_frame(frame, OpCode::SubmitShortMessage, MIN_FIELDS)? {
            AckResponse::Positive(frame) => {
                Ok(frame.data_field(SUBMIT_ID_INDEX, "message id")?.to_string())
            }
            AckResponse::Negative { code, message } => {
                warn!("negative ack, code: {} message: {}", code, message);
                Err(UcpError::Protocol { code, message })
            }
        };
    }
}
