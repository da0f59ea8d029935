//! # sip-locator
//!
//! Locating SIP servers (RFC 3263).
//!
//! Turns a SIP or SIPS URI into the ordered list of [`Hop`]s (address, port,
//! transport) a request should be sent to, following NAPTR, SRV and A/AAAA
//! records. The DNS itself is reached through the [`dns::Resolve`] trait.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use sip_locator::dns::{ServiceRecord, StaticResolver};
//! use sip_locator::{Locator, Transport};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> sip_locator::Result<()> {
//! let resolver = StaticResolver::new()
//!     .with_service_records("_sips._tcp.example.com.", [ServiceRecord::new(0, 0, "sip1.example.com", 5061)])
//!     .with_address_records("sip1.example.com", ["203.0.113.5".parse().unwrap()]);
//!
//! let locator = Locator::new(Arc::new(resolver), ["TLS"])?;
//! let hops = locator.locate(&"sips:bob@example.com".parse()?).await?;
//!
//! assert_eq!(hops[0].to_string(), "203.0.113.5:5061/TLS");
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod dns;
pub mod host;
pub mod locator;
pub mod naptr;
pub mod srv;
pub mod transport;
pub mod uri;

pub(crate) mod error;
mod hop;

pub use error::{Error, Result};
pub use hop::Hop;
pub use locator::Locator;
pub use srv::{RandomSource, ThreadRngSource};
pub use transport::Transport;
pub use uri::{Scheme, Uri};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
