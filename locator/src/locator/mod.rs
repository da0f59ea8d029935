//! SIP server location (RFC 3263, section 4).

pub mod builder;

pub use builder::Builder;

use std::fmt;
use std::sync::Arc;

use futures_util::future;
use itertools::Itertools;
use util::ArcStr;

use crate::dns::{Resolve, ServiceRecord};
use crate::error::{Error, Result};
use crate::hop::Hop;
use crate::srv::RandomSource;
use crate::transport::Transport;
use crate::uri::{Scheme, Uri};
use crate::{address, host, naptr, srv};

struct Inner {
    /// The collaborator answering DNS lookups.
    resolver: Arc<dyn Resolve>,
    /// The transports the caller can use, most preferred first.
    transports: Box<[Transport]>,
    /// Draws for the SRV weighted selection.
    random: Arc<dyn RandomSource>,
    /// Whether SRV lookups start at the NAPTR replacement.
    follow_naptr_replacement: bool,
}

/// A host, port and transport waiting for address resolution.
#[derive(Debug, Clone)]
struct Target {
    host: ArcStr,
    port: u16,
    transport: Transport,
}

/// The transport picked for a name and what was learned picking it.
struct Selection {
    transport: Transport,
    /// SRV records already fetched for `transport`.
    services: Option<Vec<ServiceRecord>>,
    /// Replacement of the NAPTR record that named `transport`.
    replacement: Option<ArcStr>,
}

#[derive(Clone)]
/// Resolves SIP URIs into the ordered list of hops to try.
///
/// A locator holds no per-request state: it can be cloned cheaply and used
/// from many tasks at once.
///
/// # Examples
///
/// ```
/// # use std::sync::Arc;
/// use sip_locator::{Locator, Transport, dns::StaticResolver};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let locator = Locator::builder(Arc::new(StaticResolver::new()))
///     .with_supported_transports(["UDP", "TCP"])
///     .build()
///     .unwrap();
///
/// let hops = locator.locate(&"sip:alice@192.0.2.1".parse().unwrap()).await.unwrap();
///
/// assert_eq!(hops.len(), 1);
/// assert_eq!(hops[0].port(), 5060);
/// assert_eq!(hops[0].transport(), Transport::Udp);
/// # }
/// ```
pub struct Locator(Arc<Inner>);

impl Locator {
    /// Returns a builder to create a `Locator` querying `resolver`.
    pub fn builder(resolver: Arc<dyn Resolve>) -> Builder {
        Builder::new(resolver)
    }

    /// Creates a locator supporting `transports`, most preferred first.
    pub fn new<I, T>(resolver: Arc<dyn Resolve>, transports: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Builder::new(resolver).with_supported_transports(transports).build()
    }

    /// Returns the supported transports, most preferred first.
    pub fn supported_transports(&self) -> &[Transport] {
        &self.0.transports
    }

    /// Returns the hops to try for `uri`, most preferred first.
    ///
    /// The scheme and the `transport` parameter are checked before any
    /// lookup. Lookups returning nothing, or failing, move on to the next
    /// fallback; only when every fallback is exhausted does this fail, with
    /// [`Error::NoTransportAvailable`] or [`Error::NoHopsResolved`].
    pub async fn locate(&self, uri: &Uri) -> Result<Vec<Hop>> {
        log::debug!("Locating {}", uri);

        let scheme: Scheme = uri.scheme().parse()?;
        let explicit = uri
            .transport_param()
            .map(|name| name.parse::<Transport>())
            .transpose()?;
        let target = uri.target();

        let targets = if host::is_numeric(target) {
            let transport = match explicit {
                Some(transport) => transport,
                None => scheme.default_transport()?,
            };
            let port = uri.port().unwrap_or(transport.default_port());
            log::debug!("{} is numeric, no lookup needed", target);

            vec![Target {
                host: target.into(),
                port,
                transport,
            }]
        } else if let Some(port) = uri.port() {
            let transport = match explicit {
                Some(transport) => transport,
                None => scheme.default_transport()?,
            };
            log::debug!("{} has explicit port {}, skipping NAPTR and SRV", target, port);

            vec![Target {
                host: target.into(),
                port,
                transport,
            }]
        } else {
            self.resolve_name(target, scheme, explicit).await?
        };

        let hops = self.expand(targets).await;
        if hops.is_empty() {
            return Err(Error::NoHopsResolved(target.to_string()));
        }
        log::debug!("Located {}: [{}]", uri, hops.iter().join(", "));

        Ok(hops)
    }

    /// Picks the transport for `target` and turns its SRV records into
    /// targets, falling back to `target` itself at the default port.
    async fn resolve_name(&self, target: &str, scheme: Scheme, explicit: Option<Transport>) -> Result<Vec<Target>> {
        let selection = match explicit {
            Some(transport) => Selection {
                transport,
                services: None,
                replacement: None,
            },
            None => self.select_transport(target, scheme == Scheme::Sips).await?,
        };
        let transport = selection.transport;
        log::debug!("Selected {} for {}", transport, target);

        let services = match selection.services {
            Some(services) => services,
            None => self.lookup_services(target, transport, selection.replacement).await,
        };

        if services.is_empty() {
            log::debug!("No SRV records for {}, using {}:{}", target, target, transport.default_port());
            return Ok(vec![Target {
                host: target.into(),
                port: transport.default_port(),
                transport,
            }]);
        }

        Ok(services
            .into_iter()
            .map(|srv| Target {
                host: srv.target,
                port: srv.port,
                transport,
            })
            .collect())
    }

    /// Picks the first NAPTR transport the caller supports, or else the first
    /// supported transport with SRV records.
    async fn select_transport(&self, target: &str, secure: bool) -> Result<Selection> {
        let pointers = naptr::lookup_pointers(self.0.resolver.as_ref(), target, secure).await;

        if let Some(pointer) = pointers.into_iter().find(|p| self.0.transports.contains(&p.transport)) {
            return Ok(Selection {
                transport: pointer.transport,
                services: None,
                replacement: Some(pointer.record.replacement),
            });
        }
        log::debug!("No usable NAPTR records for {}, trying SRV", target);

        for &transport in self.0.transports.iter() {
            let services =
                srv::lookup_services(self.0.resolver.as_ref(), self.0.random.as_ref(), transport, target).await;
            if !services.is_empty() {
                return Ok(Selection {
                    transport,
                    services: Some(services),
                    replacement: None,
                });
            }
        }

        Err(Error::NoTransportAvailable(target.to_string()))
    }

    async fn lookup_services(&self, target: &str, transport: Transport, replacement: Option<ArcStr>) -> Vec<ServiceRecord> {
        let resolver = self.0.resolver.as_ref();
        let random = self.0.random.as_ref();

        if self.0.follow_naptr_replacement {
            if let Some(replacement) = replacement.filter(|r| !r.is_empty() && *r != ".") {
                let services = srv::lookup_services_at(resolver, random, &replacement).await;
                if !services.is_empty() {
                    return services;
                }
                log::debug!("No SRV records at replacement {}", replacement);
            }
        }

        srv::lookup_services(resolver, random, transport, target).await
    }

    /// Resolves every target, keeping target order then address order.
    /// Targets without addresses are skipped.
    async fn expand(&self, targets: Vec<Target>) -> Vec<Hop> {
        let resolver = self.0.resolver.as_ref();
        let lookups = targets.iter().map(|t| address::lookup_addresses(resolver, &t.host));
        let addresses = future::join_all(lookups).await;

        targets
            .iter()
            .zip(addresses)
            .flat_map(|(target, addrs)| {
                if addrs.is_empty() {
                    log::debug!("No addresses for {}, skipping", target.host);
                }
                addrs
                    .into_iter()
                    .map(move |addr| Hop::new(addr, target.port, target.transport))
            })
            .collect()
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locator")
            .field("transports", &self.0.transports)
            .field("follow_naptr_replacement", &self.0.follow_naptr_replacement)
            .finish_non_exhaustive()
    }
}
