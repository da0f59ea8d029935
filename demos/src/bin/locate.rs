//! Resolves a SIP URI against the system DNS and prints the hops to try.
//!
//! ```text
//! cargo run -p demos --bin locate -- "sips:alice@example.com" --transports TLS,TCP
//! ```

use std::error::Error;
use std::sync::Arc;

use clap::Parser;
use sip_locator::{Locator, Uri};
use tracing::Level;
use util::DnsResolver;

/// Locate the SIP servers of a URI (RFC 3263).
#[derive(Debug, Parser)]
#[command(name = "locate")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// The SIP or SIPS URI to locate, e.g. `sip:alice@example.com`.
    uri: Uri,

    /// Supported transports, most preferred first.
    #[arg(long, value_delimiter = ',', default_values_t = vec!["UDP".to_string(), "TCP".to_string(), "TLS".to_string()])]
    transports: Vec<String>,

    /// Query SRV records at the NAPTR replacement first.
    #[arg(long)]
    follow_replacement: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::result::Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_env_filter("sip_locator=debug,util=debug")
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .init();

    let cli = Cli::parse();

    let locator = Locator::builder(Arc::new(DnsResolver::from_system_conf()?))
        .with_supported_transports(&cli.transports)
        .with_naptr_replacement(cli.follow_replacement)
        .build()?;

    for hop in locator.locate(&cli.uri).await? {
        println!("{hop}");
    }

    Ok(())
}
