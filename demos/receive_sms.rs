// ABOUTME: Long-running example that stays logged in and prints delivery receipts and inbound SMS
// ABOUTME: Demonstrates closure handlers, keep-alive status and shutdown on Ctrl-C

use argh::FromArgs;
use std::error::Error;
use std::time::Duration;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;
use ucp::client::ClientOptions;

/// Receive delivery notifications and mobile originated messages
#[derive(FromArgs)]
struct CliArgs {
    /// whether or not to enable debugging
    #[argh(switch, short = 'd')]
    debugging: bool,

    /// the login user
    #[argh(option, short = 'u')]
    user: String,

    /// the login password
    #[argh(option)]
    password: String,

    /// the SMSC address (default: localhost:8080)
    #[argh(option)]
    addr: Option<String>,

    /// access code passed to the handlers
    #[argh(option)]
    access_code: Option<String>,

    /// keep-alive period in seconds (default: 30)
    #[argh(option)]
    keep_alive: Option<u64>,

    /// verify the checksum of every inbound frame
    #[argh(switch)]
    verify_checksum: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = argh::from_env();

    let level = if cli_args.debugging {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let addr = cli_args
        .addr
        .unwrap_or_else(|| "localhost:8080".to_owned());

    let client = ClientOptions::new(addr, cli_args.user, cli_args.password)
        .with_access_code(cli_args.access_code.unwrap_or_default())
        .with_keep_alive(Duration::from_secs(cli_args.keep_alive.unwrap_or_default()))
        .with_verify_checksum(cli_args.verify_checksum)
        .with_delivery_handler(
            |sender: &str, receiver: &str, id: &str, message: &str, _: &str| {
                println!("DR {id}: {sender} -> {receiver}: {message}");
            },
        )
        .with_short_message_handler(
            |sender: &str, receiver: &str, id: &str, message: &str, access_code: &str| {
                println!("MO {id} [{access_code}]: {sender} -> {receiver}: {message}");
            },
        )
        .connect()
        .await?;

    info!("logged in, waiting for traffic (Ctrl-C to stop)");

    let mut status = tokio::time::interval(Duration::from_secs(60));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = status.tick() => {
                let keep_alive = client.keep_alive_status();
                if keep_alive.consecutive_failures >= 3 {
                    warn!("keep-alive failing, connection is gone");
                    break;
                }
                info!(
                    "keep-alive: {} pings, {} consecutive failures",
                    keep_alive.total_pings, keep_alive.consecutive_failures
                );
            }
        }
    }

    client.close().await;
    info!("closed");
    Ok(())
}
