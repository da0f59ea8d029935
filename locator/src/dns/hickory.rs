use std::io;
use std::net::IpAddr;

use async_trait::async_trait;
use util::DnsResolver;

use super::{LookupError, LookupResult, PointerRecord, Resolve, ServiceRecord};

fn failed(name: &str, err: io::Error) -> LookupError {
    LookupError::Failed {
        name: name.to_string(),
        reason: err.to_string(),
    }
}

#[async_trait]
impl Resolve for DnsResolver {
    async fn lookup_pointer_records(&self, domain: &str, secure_only: bool) -> LookupResult<PointerRecord> {
        let records = self.lookup_naptr(domain).await.map_err(|err| failed(domain, err))?;

        let records = records
            .into_iter()
            // Only terminal "s" records point at SRV names.
            .filter(|naptr| {
                let terminal = naptr.flags.eq_ignore_ascii_case("s");
                if !terminal {
                    log::debug!("Skipping NAPTR {} with flags \"{}\"", naptr.services, naptr.flags);
                }
                terminal
            })
            .filter(|naptr| !secure_only || super::is_secure_service(&naptr.services))
            .map(|naptr| PointerRecord {
                order: naptr.order,
                preference: naptr.preference,
                service: naptr.services,
                replacement: naptr.replacement,
            })
            .collect();

        Ok(records)
    }

    async fn lookup_service_records(&self, service: &str) -> LookupResult<ServiceRecord> {
        let records = self.lookup_srv(service).await.map_err(|err| failed(service, err))?;

        Ok(records
            .into_iter()
            .map(|srv| ServiceRecord {
                priority: srv.priority,
                weight: srv.weight,
                target: srv.target,
                port: srv.port,
            })
            .collect())
    }

    async fn lookup_address_records(&self, host: &str) -> LookupResult<IpAddr> {
        self.resolve_all(host).await.map_err(|err| failed(host, err))
    }
}
