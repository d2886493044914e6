// ABOUTME: Example application sending one SMS through a UCP SMSC and printing the message ids
// ABOUTME: Shows ClientOptions for connecting, logging in and closing the client

use argh::FromArgs;
use std::error::Error;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use ucp::client::ClientOptions;

/// Send a single (possibly multi-part) SMS through a UCP SMSC
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

    /// the hostname or IP address of the SMSC (default: localhost)
    #[argh(option)]
    host: Option<String>,

    /// the port to use when connecting to the SMSC (default: 8080)
    #[argh(option, short = 'p')]
    port: Option<u16>,

    /// the message to send
    #[argh(option, short = 'm')]
    message: String,

    /// the recipient telephone number
    #[argh(option, short = 't')]
    to: String,

    /// the sender shown on the handset
    #[argh(option, short = 'f')]
    from: String,

    /// billing identifier attached to every part
    #[argh(option)]
    billing_id: Option<String>,

    /// messages per second (default: 10)
    #[argh(option)]
    tps: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = argh::from_env();

    let level = if cli_args.debugging {
        Level::TRACE
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let host = cli_args.host.unwrap_or_else(|| "localhost".to_owned());
    let port = cli_args.port.unwrap_or(8080);

    let client = ClientOptions::new(format!("{host}:{port}"), cli_args.user, cli_args.password)
        .with_billing_id(cli_args.billing_id.unwrap_or_default())
        .with_tps(cli_args.tps.unwrap_or_default())
        .with_timeout(Duration::from_secs(10))
        .connect()
        .await
        .map_err(|e| {
            eprintln!("Connection/login failed: {e}");
            e
        })?;

    let result = client
        .send(&cli_args.from, &cli_args.to, &cli_args.message)
        .await;
    client.close().await;

    match result {
        Ok(ids) => {
            for id in ids {
                println!("Message accepted with ID: {id}");
            }
            Ok(())
        }
        Err(e) => {
            for id in &e.message_ids {
                println!("Part accepted with ID: {id}");
            }
            eprintln!("Send failed: {e}");
            Err(e.into())
        }
    }
}
