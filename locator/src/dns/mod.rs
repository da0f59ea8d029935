//! The resolution collaborator.
//!
//! The locator never talks to the network itself; it asks a [`Resolve`]
//! implementation for records. [`StaticResolver`] answers from memory,
//! [`util::DnsResolver`] from the DNS.

mod hickory;
mod memory;

pub use memory::{Query, StaticResolver};

use std::net::IpAddr;

use async_trait::async_trait;
use thiserror::Error;
use util::ArcStr;

/// The result of a collaborator lookup.
pub type LookupResult<T> = std::result::Result<Vec<T>, LookupError>;

/// A failure reported by the collaborator.
///
/// The locator treats both variants exactly like an empty answer: the next
/// fallback is tried and the failure is only logged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("No records found for {0}")]
    NoRecords(String),

    #[error("Lookup of {name} failed: {reason}")]
    Failed { name: String, reason: String },
}

/// A NAPTR-derived pointer record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerRecord {
    /// Lower orders are consumed first.
    pub order: u16,
    /// Breaks ties between records of the same order, lower first.
    pub preference: u16,
    /// The service field, e.g. `SIP+D2U`.
    pub service: ArcStr,
    /// The replacement domain.
    pub replacement: ArcStr,
}

impl PointerRecord {
    /// Creates a pointer record.
    pub fn new(order: u16, preference: u16, service: &str, replacement: &str) -> Self {
        Self {
            order,
            preference,
            service: service.into(),
            replacement: replacement.into(),
        }
    }
}

/// A SRV-derived service record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRecord {
    /// Lower priorities are tried first.
    pub priority: u16,
    /// Relative likelihood of being tried first within the same priority.
    pub weight: u16,
    /// The host offering the service.
    pub target: ArcStr,
    /// The port the service listens on.
    pub port: u16,
}

impl ServiceRecord {
    /// Creates a service record.
    pub fn new(priority: u16, weight: u16, target: &str, port: u16) -> Self {
        Self {
            priority,
            weight,
            target: target.into(),
            port,
        }
    }
}

/// Lookups the locator needs from the DNS.
#[async_trait]
pub trait Resolve: Send + Sync {
    /// Returns the pointer records of `domain`. With `secure_only` set, only
    /// records advertising a secure transport are expected, but callers
    /// filter again.
    async fn lookup_pointer_records(&self, domain: &str, secure_only: bool) -> LookupResult<PointerRecord>;

    /// Returns the service records at `service`, e.g. `_sip._udp.example.com.`,
    /// in no particular order.
    async fn lookup_service_records(&self, service: &str) -> LookupResult<ServiceRecord>;

    /// Returns the A and AAAA records of `host`.
    async fn lookup_address_records(&self, host: &str) -> LookupResult<IpAddr>;
}

/// Returns `true` if the NAPTR service field advertises a secure transport
/// (`SIPS+...`), ignoring case.
pub(crate) fn is_secure_service(service: &str) -> bool {
    service
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("SIPS+"))
}

/// Unwraps a lookup result, logging and discarding failures.
pub(crate) fn records_or_empty<T>(result: LookupResult<T>) -> Vec<T> {
    match result {
        Ok(records) => records,
        Err(LookupError::NoRecords(name)) => {
            log::debug!("No records found for \"{}\"", name);
            Vec::new()
        }
        Err(err) => {
            log::warn!("{}, trying next fallback", err);
            Vec::new()
        }
    }
}
