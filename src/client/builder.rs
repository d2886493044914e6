// ABOUTME: Client options and builder for connecting UCP clients with sensible defaults
// ABOUTME: Zero rates or durations fall back to defaults; handlers default to printing to the console

use crate::client::default::UcpClient;
use crate::client::error::UcpResult;
use crate::client::handler::{DefaultHandler, Handler};
use crate::client::types::Credentials;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default submit rate (transactions per second)
pub const DEFAULT_TPS: u32 = 10;
/// Default interval between keep-alive alerts
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(30);
/// Default window for the SMSC to answer a submit
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
/// Default lifetime of an incomplete multi-part message
pub const DEFAULT_REASSEMBLY_TTL: Duration = Duration::from_secs(600);
/// Default interval between sweeps for stale multi-part messages
pub const DEFAULT_REASSEMBLY_SWEEP: Duration = Duration::from_secs(30);

/// Connection settings for a [`UcpClient`]
///
/// # Example
///
/// ```rust,no_run
/// use ucp::client::ClientOptions;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ClientOptions::new("127.0.0.1:8080", "emi_client", "password")
///     .with_access_code("2371")
///     .with_tps(20)
///     .with_timeout(Duration::from_secs(10))
///     .with_short_message_handler(|sender: &str, _: &str, id: &str, text: &str, _: &str| {
///         println!("{id} from {sender}: {text}");
///     })
///     .connect()
///     .await?;
///
/// client.send("Voyager", "09191234567", "Hello world").await?;
/// client.close().await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ClientOptions {
    /// `host:port` of the SMSC
    pub addr: String,
    pub credentials: Credentials,
    /// Submit rate (messages per second); zero means the default
    pub tps: u32,
    /// Interval between keep-alive alerts; zero means the default
    pub keep_alive: Duration,
    /// Window for the SMSC to answer a submit or the login; zero means the default
    pub timeout: Duration,
    /// Billing identifier attached to every submit, empty for none
    pub billing_id: String,
    pub delivery_handler: Arc<dyn Handler>,
    pub short_message_handler: Arc<dyn Handler>,
    /// Recompute and check the checksum of inbound frames
    pub verify_checksum: bool,
    /// Lifetime of an incomplete multi-part message; `None` keeps it forever
    pub reassembly_ttl: Option<Duration>,
    /// How often incomplete multi-part messages are checked for expiry;
    /// zero means the default
    pub reassembly_sweep_interval: Duration,
}

impl ClientOptions {
    pub fn new(addr: impl Into<String>, user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            credentials: Credentials::new(user, password),
            tps: DEFAULT_TPS,
            keep_alive: DEFAULT_KEEP_ALIVE,
            timeout: DEFAULT_TIMEOUT,
            billing_id: String::new(),
            delivery_handler: Arc::new(DefaultHandler),
            short_message_handler: Arc::new(DefaultHandler),
            verify_checksum: false,
            reassembly_ttl: Some(DEFAULT_REASSEMBLY_TTL),
            reassembly_sweep_interval: DEFAULT_REASSEMBLY_SWEEP,
        }
    }

    pub fn with_access_code(mut self, access_code: impl Into<String>) -> Self {
        self.credentials.access_code = access_code.into();
        self
    }

    /// Zero falls back to the default rate
    pub fn with_tps(mut self, tps: u32) -> Self {
        self.tps = if tps == 0 { DEFAULT_TPS } else { tps };
        self
    }

    /// Zero falls back to the default interval
    pub fn with_keep_alive(mut self, keep_alive: Duration) -> Self {
        self.keep_alive = if keep_alive.is_zero() {
            DEFAULT_KEEP_ALIVE
        } else {
            keep_alive
        };
        self
    }

    /// Zero falls back to the default timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = if timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            timeout
        };
        self
    }

    pub fn with_billing_id(mut self, billing_id: impl Into<String>) -> Self {
        self.billing_id = billing_id.into();
        self
    }

    /// Handler for delivery notifications (delivery receipts)
    pub fn with_delivery_handler(mut self, handler: impl Handler) -> Self {
        self.delivery_handler = Arc::new(handler);
        self
    }

    /// Handler for mobile originated messages
    pub fn with_short_message_handler(mut self, handler: impl Handler) -> Self {
        self.short_message_handler = Arc::new(handler);
        self
    }

    pub fn with_verify_checksum(mut self, verify: bool) -> Self {
        self.verify_checksum = verify;
        self
    }

    pub fn with_reassembly_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.reassembly_ttl = ttl;
        self
    }

    pub fn with_reassembly_sweep_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.reassembly_sweep_interval = interval;
        }
        self
    }

    /// Apply the zero-means-default rules to fields set directly
    pub(crate) fn normalized(self) -> Self {
        let sweep = self.reassembly_sweep_interval;
        let (tps, keep_alive, timeout) = (self.tps, self.keep_alive, self.timeout);
        self.with_tps(tps)
            .with_keep_alive(keep_alive)
            .with_timeout(timeout)
            .with_reassembly_sweep_interval(if sweep.is_zero() {
                DEFAULT_REASSEMBLY_SWEEP
            } else {
                sweep
            })
    }

    /// Dial the SMSC and log in with these options
    pub async fn connect(self) -> UcpResult<UcpClient> {
        UcpClient::connect(self).await
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("addr", &self.addr)
            .field("credentials", &self.credentials)
            .field("tps", &self.tps)
            .field("keep_alive", &self.keep_alive)
            .field("timeout", &self.timeout)
            .field("billing_id", &self.billing_id)
            .field("verify_checksum", &self.verify_checksum)
            .field("reassembly_ttl", &self.reassembly_ttl)
            .field("reassembly_sweep_interval", &self.reassembly_sweep_interval)
            .finish_non_exhaustive()
    }
}

/// Convenience constructors for connected clients
pub struct ClientBuilder;

impl ClientBuilder {
    /// Connect with default settings
    pub async fn quick(
        addr: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> UcpResult<UcpClient> {
        ClientOptions::new(addr, user, password).connect().await
    }

    /// Connect with the given options
    pub async fn client(options: ClientOptions) -> UcpResult<UcpClient> {
        options.connect().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ClientOptions::new("127.0.0.1:8080", "emi_client", "password");
        assert_eq!(options.tps, 10);
        assert_eq!(options.keep_alive, Duration::from_secs(30));
        assert_eq!(options.timeout, Duration::from_secs(5));
        assert!(!options.verify_checksum);
        assert_eq!(options.reassembly_ttl, Some(Duration::from_secs(600)));
        assert!(options.billing_id.is_empty());
        assert!(options.credentials.access_code.is_empty());
    }

    #[test]
    fn test_zero_values_fall_back_to_defaults() {
        let options = ClientOptions::new("127.0.0.1:8080", "emi_client", "password")
            .with_tps(0)
            .with_keep_alive(Duration::ZERO)
            .with_timeout(Duration::ZERO);
        assert_eq!(options.tps, DEFAULT_TPS);
        assert_eq!(options.keep_alive, DEFAULT_KEEP_ALIVE);
        assert_eq!(options.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_directly_assigned_zeroes_are_normalized() {
        let mut options = ClientOptions::new("127.0.0.1:8080", "emi_client", "password");
        options.tps = 0;
        options.keep_alive = Duration::ZERO;
        options.timeout = Duration::ZERO;
        options.reassembly_sweep_interval = Duration::ZERO;

        let options = options.normalized();
        assert_eq!(options.tps, DEFAULT_TPS);
        assert_eq!(options.keep_alive, DEFAULT_KEEP_ALIVE);
        assert_eq!(options.timeout, DEFAULT_TIMEOUT);
        assert_eq!(options.reassembly_sweep_interval, DEFAULT_REASSEMBLY_SWEEP);
    }

    #[test]
    fn test_normalized_keeps_explicit_values() {
        let options = ClientOptions::new("127.0.0.1:8080", "emi_client", "password")
            .with_tps(3)
            .with_keep_alive(Duration::from_secs(7))
            .with_reassembly_sweep_interval(Duration::from_secs(2))
            .normalized();
        assert_eq!(options.tps, 3);
        assert_eq!(options.keep_alive, Duration::from_secs(7));
        assert_eq!(options.reassembly_sweep_interval, Duration::from_secs(2));
    }

    #[test]
    fn test_builder_overrides() {
        let options = ClientOptions::new("127.0.0.1:8080", "emi_client", "password")
            .with_tps(50)
            .with_access_code("2371")
            .with_billing_id("01000001C123000210")
            .with_verify_checksum(true)
            .with_reassembly_ttl(None);
        assert_eq!(options.tps, 50);
        assert_eq!(options.credentials.access_code, "2371");
        assert_eq!(options.billing_id, "01000001C123000210");
        assert!(options.verify_checksum);
        assert_eq!(options.reassembly_ttl, None);
    }

    #[test]
    fn test_debug_redacts_password() {
        let options = ClientOptions::new("127.0.0.1:8080", "emi_client", "hunter2");
        let debug = format!("{options:?}");
        assert!(debug.contains("emi_client"));
        assert!(!debug.contains("hunter2"));
    }
}
