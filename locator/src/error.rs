use thiserror::Error;

use crate::transport::Transport;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned when locating a SIP server.
///
/// `UnknownScheme`, `UnknownTransport`, `NotUpgradable` and
/// `UnrecognizedNaptrService` are raised while validating the input, before
/// any DNS query. `NoTransportAvailable` and `NoHopsResolved` are raised only
/// once every fallback has been tried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown scheme: {0}")]
    UnknownScheme(String),

    #[error("Unknown transport: {0}")]
    UnknownTransport(String),

    #[error("Cannot upgrade {0}")]
    NotUpgradable(Transport),

    #[error("Unrecognized NAPTR service: {0}")]
    UnrecognizedNaptrService(String),

    #[error("No supported transport found for {0}")]
    NoTransportAvailable(String),

    #[error("No hops resolved for {0}")]
    NoHopsResolved(String),

    #[error("Invalid URI: {0}")]
    InvalidUri(String),
}
