// ABOUTME: UCP client module: connection engine, options, handlers and the inbound pipelines
// ABOUTME: Exports the client, its builder, error types and the callback seam

//! UCP Client Module
//!
//! A single [`UcpClient`] owns one logged-in SMSC connection:
//!
//! * **Correlated sends** - one submit in flight at a time, matched to its
//!   response by transaction reference
//! * **Automatic segmentation** - long texts are split and sent as
//!   concatenated parts
//! * **Rate limiting** - submits are paced to the configured rate
//! * **Keep-alive** - alert operations hold the session open
//! * **Inbound traffic** - delivery notifications and mobile originated
//!   messages are acknowledged, reassembled and passed to [`Handler`]s
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ucp::client::ClientBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ClientBuilder::quick("127.0.0.1:8080", "emi_client", "password").await?;
//!
//! let ids = client.send("Sender", "09191234567", "Hello world").await?;
//! println!("accepted as {ids:?}");
//!
//! client.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Receiving
//!
//! ```rust,no_run
//! use ucp::client::ClientOptions;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ClientOptions::new("127.0.0.1:8080", "emi_client", "password")
//!     .with_access_code("2371")
//!     .with_short_message_handler(|sender: &str, _: &str, id: &str, text: &str, _: &str| {
//!         println!("{sender} says {text} ({id})");
//!     })
//!     .connect()
//!     .await?;
//! # client.close().await;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod default;
pub mod delivery;
mod dispatch;
pub mod error;
pub mod flow_control;
pub mod handler;
pub mod keepalive;
pub mod reassembly;
pub mod reference;
pub mod types;

pub use builder::{ClientBuilder, ClientOptions};
pub use default::UcpClient;
pub use delivery::decode_payload;
pub use error::{SendError, UcpError, UcpResult};
pub use handler::{DefaultHandler, Handler};
pub use keepalive::KeepAliveStatus;
pub use reassembly::{ReassemblyStats, Reassembler};
pub use types::{Credentials, DeliverMsgPart, ReassemblyKey};
