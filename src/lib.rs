pub mod charset;
pub mod client;
pub mod codec;
pub mod connection;
pub mod datatypes;
pub mod frame;
pub mod segment;


// Re-export codec types for direct access
pub use codec::{CodecError, OpCode, OpType, decode_frame, encode_frame};
pub use frame::Frame;

// Re-export the main client API for easy access
pub use client::{
    ClientBuilder, ClientOptions, Credentials, Handler, SendError, UcpClient, UcpError, UcpResult,
};

/// Boxed error for applications that mix this crate's errors with others.
///
/// The library itself returns typed errors ([`UcpError`], [`CodecError`],
/// [`charset::CharsetError`]); this alias is for callers such as the demos.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// A specialized `Result` type for UCP applications.
///
/// # Examples
///
/// ```rust,no_run
/// use ucp::client::ClientOptions;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> ucp::Result<()> {
///     let client = ClientOptions::new("127.0.0.1:8080", "emi_client", "password")
///         .with_tps(5)
///         .with_timeout(Duration::from_secs(10))
///         .with_billing_id("ACME")
///         .connect()
///         .await?;
///
///     match client.send("Sender", "09191234567", "Hello world").await {
///         Ok(ids) => println!("accepted as {ids:?}"),
///         Err(e) => println!("failed after {:?}: {e}", e.message_ids),
///     }
///
///     client.close().await;
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;
