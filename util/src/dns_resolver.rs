//! DNS resolve with the `DnsResolver` type.

use std::io;
use std::net::IpAddr;

use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::rr::{RData, RecordType};
use hickory_resolver::{ResolveError, TokioResolver};

pub use hickory_resolver::config::ResolverConfig;

use crate::ArcStr;

/// A NAPTR record as returned by the DNS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaptrRecord {
    /// The order field, lower is tried first.
    pub order: u16,
    /// The preference field, breaks ties within the same order.
    pub preference: u16,
    /// The flags field (`s`, `a`, `u` or `p`).
    pub flags: ArcStr,
    /// The services field, e.g. `SIPS+D2T`.
    pub services: ArcStr,
    /// The replacement domain.
    pub replacement: ArcStr,
}

/// A SRV record as returned by the DNS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvRecord {
    /// The priority, lower is more preferred.
    pub priority: u16,
    /// The relative weight within the same priority.
    pub weight: u16,
    /// The port the service listens on.
    pub port: u16,
    /// The target host name.
    pub target: ArcStr,
}

/// A DNS resolver backed by [hickory-dns](https://github.com/hickory-dns/hickory-dns).
///
/// Answers that carry no records are reported as an empty list, every other
/// failure as an [`io::Error`].
pub struct DnsResolver {
    dns_resolver: TokioResolver,
}

impl DnsResolver {
    /// Creates a resolver from the system configuration (`/etc/resolv.conf`
    /// on unix).
    pub fn from_system_conf() -> io::Result<Self> {
        let dns_resolver = TokioResolver::builder_tokio()
            .map_err(|err| io::Error::other(format!("Failed to read system DNS config: {}", err)))?
            .build();

        Ok(Self { dns_resolver })
    }

    /// Creates a resolver that queries the name servers of `config`.
    pub fn with_config(config: ResolverConfig) -> Self {
        let dns_resolver =
            TokioResolver::builder_with_config(config, TokioConnectionProvider::default()).build();

        Self { dns_resolver }
    }

    /// Resolve all the A and AAAA records of `host`.
    pub async fn resolve_all(&self, host: &str) -> io::Result<Vec<IpAddr>> {
        log::trace!("A/AAAA lookup for \"{}\"", host);

        let Some(lookup) = filter_no_records(self.dns_resolver.lookup_ip(host).await)
            .map_err(|err| io::Error::other(format!("Failed to lookup dns: {}", err)))?
        else {
            return Ok(Vec::new());
        };

        Ok(lookup.iter().collect())
    }

    /// Lookup the NAPTR records of `domain`, in the order the server sent them.
    pub async fn lookup_naptr(&self, domain: &str) -> io::Result<Vec<NaptrRecord>> {
        log::trace!("NAPTR lookup for \"{}\"", domain);

        let Some(lookup) = filter_no_records(self.dns_resolver.lookup(domain, RecordType::NAPTR).await)
            .map_err(|err| io::Error::other(format!("Failed to lookup NAPTR: {}", err)))?
        else {
            return Ok(Vec::new());
        };

        let records = lookup
            .record_iter()
            .filter_map(|record| match record.data() {
                RData::NAPTR(naptr) => Some(NaptrRecord {
                    order: naptr.order(),
                    preference: naptr.preference(),
                    flags: String::from_utf8_lossy(naptr.flags()).into_owned().into(),
                    services: String::from_utf8_lossy(naptr.services()).into_owned().into(),
                    replacement: naptr.replacement().to_utf8().into(),
                }),
                other => {
                    log::warn!("Unexpected record in NAPTR answer: {:?}", other);
                    None
                }
            })
            .collect();

        Ok(records)
    }

    /// Lookup the SRV records at the service identifier `name`.
    pub async fn lookup_srv(&self, name: &str) -> io::Result<Vec<SrvRecord>> {
        log::trace!("SRV lookup for \"{}\"", name);

        let Some(lookup) = filter_no_records(self.dns_resolver.srv_lookup(name).await)
            .map_err(|err| io::Error::other(format!("Failed to lookup SRV: {}", err)))?
        else {
            return Ok(Vec::new());
        };

        let records = lookup
            .iter()
            .map(|srv| SrvRecord {
                priority: srv.priority(),
                weight: srv.weight(),
                port: srv.port(),
                target: srv.target().to_utf8().into(),
            })
            .collect();

        Ok(records)
    }
}

/// Turns a "no records found" error into `Ok(None)`.
fn filter_no_records<T>(result: Result<T, ResolveError>) -> Result<Option<T>, ResolveError> {
    match result {
        Ok(t) => Ok(Some(t)),
        Err(err) if err.proto().is_some_and(|p| p.is_no_records_found()) => Ok(None),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;

    #[tokio::test]
    async fn test_resolve_ip_literal_without_network() {
        let resolver = DnsResolver::with_config(ResolverConfig::default());

        let addrs = resolver.resolve_all("192.0.2.1").await.unwrap();

        assert_eq!(addrs, vec![IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1))]);
    }
}
