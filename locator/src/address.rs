//! Address resolution step.

use std::net::IpAddr;

use crate::dns::{self, Resolve};
use crate::host;

/// Returns the addresses of `host`, in the order the resolver gave them.
///
/// A numeric host is converted without asking the resolver.
pub async fn lookup_addresses(resolver: &dyn Resolve, host: &str) -> Vec<IpAddr> {
    if host::is_numeric(host) {
        return match host::to_ip_addr(host) {
            Some(addr) => vec![addr],
            None => {
                log::warn!("Numeric host \"{}\" is not a valid address", host);
                Vec::new()
            }
        };
    }

    let addrs = dns::records_or_empty(resolver.lookup_address_records(host).await);
    log::debug!("Got {} A/AAAA records for \"{}\"", addrs.len(), host);

    addrs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::{Query, StaticResolver};

    #[tokio::test]
    async fn test_numeric_hosts_skip_resolver() {
        let resolver = StaticResolver::new();

        assert_eq!(
            lookup_addresses(&resolver, "192.0.2.1").await,
            vec!["192.0.2.1".parse::<IpAddr>().unwrap()]
        );
        assert_eq!(
            lookup_addresses(&resolver, "[2001:db8::1]").await,
            vec!["2001:db8::1".parse::<IpAddr>().unwrap()]
        );
        assert!(lookup_addresses(&resolver, "300.1.1.1").await.is_empty());
        assert!(resolver.queries().is_empty());
    }

    #[tokio::test]
    async fn test_resolver_order_is_kept() {
        let addrs: Vec<IpAddr> = vec![
            "2001:db8::5".parse().unwrap(),
            "203.0.113.5".parse().unwrap(),
            "203.0.113.6".parse().unwrap(),
        ];
        let resolver = StaticResolver::new().with_address_records("sip1.example.com.", addrs.clone());

        assert_eq!(lookup_addresses(&resolver, "sip1.example.com.").await, addrs);
        assert_eq!(resolver.queries(), vec![Query::Address("sip1.example.com.".into())]);
    }

    #[tokio::test]
    async fn test_failure_is_empty() {
        let resolver = StaticResolver::new().with_failure("sip1.example.com.");

        assert!(lookup_addresses(&resolver, "sip1.example.com.").await.is_empty());
    }
}
