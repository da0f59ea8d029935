//! NAPTR resolution step (RFC 3263, section 4.1).

use crate::dns::{self, PointerRecord, Resolve};
use crate::transport::Transport;

/// A pointer record whose service field names a SIP transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pointer {
    pub transport: Transport,
    pub record: PointerRecord,
}

/// Looks up the pointer records of `domain` and returns those advertising a
/// SIP transport, ascending by order then preference.
///
/// Records sharing order and preference keep the order the resolver gave
/// them. With `secure` set only `TLS` and `TLS-SCTP` records are kept.
pub async fn lookup_pointers(resolver: &dyn Resolve, domain: &str, secure: bool) -> Vec<Pointer> {
    let records = dns::records_or_empty(resolver.lookup_pointer_records(domain, secure).await);
    log::debug!("Got {} NAPTR records for \"{}\"", records.len(), domain);

    let mut pointers = select_pointers(records, secure);
    pointers.sort_by_key(|p| (p.record.order, p.record.preference));

    pointers
}

fn select_pointers(records: Vec<PointerRecord>, secure: bool) -> Vec<Pointer> {
    records
        .into_iter()
        .filter_map(|record| match Transport::from_naptr_service(&record.service) {
            Ok(transport) if secure && !transport.is_secure() => {
                log::debug!("Dropping insecure NAPTR service {}", record.service);
                None
            }
            Ok(transport) => Some(Pointer { transport, record }),
            Err(err) => {
                log::debug!("{}, skipping record", err);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::StaticResolver;

    const DOMAIN: &str = "example.com.";

    fn transports(pointers: &[Pointer]) -> Vec<Transport> {
        pointers.iter().map(|p| p.transport).collect()
    }

    #[tokio::test]
    async fn test_sorted_by_order_then_preference() {
        let resolver = StaticResolver::new().with_pointer_records(
            DOMAIN,
            [
                PointerRecord::new(2, 1, "SIP+D2U", "_sip._udp.example.com."),
                PointerRecord::new(1, 20, "SIP+D2S", "_sip._sctp.example.com."),
                PointerRecord::new(1, 10, "SIP+D2T", "_sip._tcp.example.com."),
            ],
        );

        let pointers = lookup_pointers(&resolver, DOMAIN, false).await;

        assert_eq!(transports(&pointers), [Transport::Tcp, Transport::Sctp, Transport::Udp]);
    }

    #[tokio::test]
    async fn test_ties_keep_input_order() {
        let resolver = StaticResolver::new().with_pointer_records(
            DOMAIN,
            [
                PointerRecord::new(10, 10, "SIP+D2U", "_sip._udp.example.com."),
                PointerRecord::new(10, 10, "SIP+D2T", "_sip._tcp.example.com."),
                PointerRecord::new(10, 10, "SIP+D2S", "_sip._sctp.example.com."),
            ],
        );

        let pointers = lookup_pointers(&resolver, DOMAIN, false).await;

        assert_eq!(transports(&pointers), [Transport::Udp, Transport::Tcp, Transport::Sctp]);
    }

    #[tokio::test]
    async fn test_unrecognized_services_are_dropped() {
        let resolver = StaticResolver::new().with_pointer_records(
            DOMAIN,
            [
                PointerRecord::new(1, 1, "E2U+sip", "!^.*$!sip:info@example.com!"),
                PointerRecord::new(2, 1, "SIP+D2W", "_sip._ws.example.com."),
                PointerRecord::new(3, 1, "SIP+D2U", "_sip._udp.example.com."),
            ],
        );

        let pointers = lookup_pointers(&resolver, DOMAIN, false).await;

        assert_eq!(transports(&pointers), [Transport::Udp]);
        assert_eq!(pointers[0].record.replacement, "_sip._udp.example.com.");
    }

    #[test]
    fn test_secure_keeps_only_secure_transports() {
        let records = vec![
            PointerRecord::new(1, 1, "SIP+D2T", "_sip._tcp.example.com."),
            PointerRecord::new(2, 1, "SIPS+D2S", "_sips._sctp.example.com."),
            PointerRecord::new(3, 1, "SIPS+D2T", "_sips._tcp.example.com."),
        ];

        let pointers = select_pointers(records, true);

        assert_eq!(transports(&pointers), [Transport::TlsSctp, Transport::Tls]);
    }

    #[tokio::test]
    async fn test_empty_and_failed_lookups() {
        let resolver = StaticResolver::new().with_failure("down.example.com.");

        assert!(lookup_pointers(&resolver, DOMAIN, false).await.is_empty());
        assert!(lookup_pointers(&resolver, "down.example.com.", true).await.is_empty());
    }
}
