use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use util::ArcStr;

use super::{LookupError, LookupResult, PointerRecord, Resolve, ServiceRecord};

/// A lookup received by a [`StaticResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// NAPTR lookup of a domain.
    Pointer(String),
    /// SRV lookup of a service identifier.
    Service(String),
    /// A/AAAA lookup of a host.
    Address(String),
}

/// Resolver that answers from canned record sets.
///
/// Every query is recorded, so callers can check which lookups a resolution
/// performed.
///
/// # Examples
///
/// ```
/// use sip_locator::dns::{ServiceRecord, StaticResolver};
///
/// let resolver = StaticResolver::new()
///     .with_service_records("_sips._tcp.example.com.", [ServiceRecord::new(0, 0, "sip1.example.com.", 5061)])
///     .with_address_records("sip1.example.com.", ["203.0.113.5".parse().unwrap()]);
///
/// assert!(resolver.queries().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct StaticResolver {
    pointers: HashMap<ArcStr, Vec<PointerRecord>>,
    services: HashMap<ArcStr, Vec<ServiceRecord>>,
    addresses: HashMap<ArcStr, Vec<IpAddr>>,
    failing: HashSet<ArcStr>,
    queries: Mutex<Vec<Query>>,
}

impl StaticResolver {
    /// Creates a resolver with no records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds pointer records for `domain`.
    pub fn with_pointer_records<I>(mut self, domain: &str, records: I) -> Self
    where
        I: IntoIterator<Item = PointerRecord>,
    {
        self.pointers.entry(domain.into()).or_default().extend(records);
        self
    }

    /// Adds service records at the service identifier `service`.
    pub fn with_service_records<I>(mut self, service: &str, records: I) -> Self
    where
        I: IntoIterator<Item = ServiceRecord>,
    {
        self.services.entry(service.into()).or_default().extend(records);
        self
    }

    /// Adds addresses for `host`.
    pub fn with_address_records<I>(mut self, host: &str, addrs: I) -> Self
    where
        I: IntoIterator<Item = IpAddr>,
    {
        self.addresses.entry(host.into()).or_default().extend(addrs);
        self
    }

    /// Makes every lookup of `name` fail as if the server timed out.
    pub fn with_failure(mut self, name: &str) -> Self {
        self.failing.insert(name.into());
        self
    }

    /// Returns the queries received so far, oldest first.
    pub fn queries(&self) -> Vec<Query> {
        self.queries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn answer<T: Clone>(&self, query: Query, name: &str, table: &HashMap<ArcStr, Vec<T>>) -> LookupResult<T> {
        self.queries.lock().unwrap_or_else(PoisonError::into_inner).push(query);

        if self.failing.contains(name) {
            return Err(LookupError::Failed {
                name: name.to_string(),
                reason: "timed out".to_string(),
            });
        }

        table
            .get(name)
            .cloned()
            .ok_or_else(|| LookupError::NoRecords(name.to_string()))
    }
}

#[async_trait]
impl Resolve for StaticResolver {
    async fn lookup_pointer_records(&self, domain: &str, secure_only: bool) -> LookupResult<PointerRecord> {
        let mut records = self.answer(Query::Pointer(domain.to_string()), domain, &self.pointers)?;
        if secure_only {
            records.retain(|record| super::is_secure_service(&record.service));
        }

        Ok(records)
    }

    async fn lookup_service_records(&self, service: &str) -> LookupResult<ServiceRecord> {
        self.answer(Query::Service(service.to_string()), service, &self.services)
    }

    async fn lookup_address_records(&self, host: &str) -> LookupResult<IpAddr> {
        self.answer(Query::Address(host.to_string()), host, &self.addresses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_answers_and_records_queries() {
        let resolver = StaticResolver::new()
            .with_pointer_records(
                "example.com.",
                [
                    PointerRecord::new(1, 1, "SIP+D2U", "_sip._udp.example.com."),
                    PointerRecord::new(1, 2, "SIPS+D2T", "_sips._tcp.example.com."),
                ],
            )
            .with_failure("down.example.com.");

        let all = resolver.lookup_pointer_records("example.com.", false).await.unwrap();
        let secure = resolver.lookup_pointer_records("example.com.", true).await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(secure.len(), 1);
        assert_eq!(secure[0].service, "SIPS+D2T");

        assert_matches!(
            resolver.lookup_address_records("missing.example.com.").await,
            Err(LookupError::NoRecords(_))
        );
        assert_matches!(
            resolver.lookup_address_records("down.example.com.").await,
            Err(LookupError::Failed { .. })
        );

        assert_eq!(
            resolver.queries(),
            vec![
                Query::Pointer("example.com.".into()),
                Query::Pointer("example.com.".into()),
                Query::Address("missing.example.com.".into()),
                Query::Address("down.example.com.".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_secure_only_ignores_service_case() {
        let resolver = StaticResolver::new().with_pointer_records(
            "example.com.",
            [
                PointerRecord::new(1, 1, "sips+d2t", "_sips._tcp.example.com."),
                PointerRecord::new(1, 2, "sip+d2t", "_sip._tcp.example.com."),
            ],
        );

        let secure = resolver.lookup_pointer_records("example.com.", true).await.unwrap();

        assert_eq!(secure, vec![PointerRecord::new(1, 1, "sips+d2t", "_sips._tcp.example.com.")]);
    }
}
