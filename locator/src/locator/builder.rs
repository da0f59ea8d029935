use std::sync::Arc;

use itertools::Itertools;

use super::{Inner, Locator};
use crate::dns::Resolve;
use crate::srv::{RandomSource, ThreadRngSource};
use crate::transport::Transport;
use crate::Result;

/// Builder for creating a new [`Locator`].
pub struct Builder {
    resolver: Arc<dyn Resolve>,
    transports: Vec<String>,
    random: Arc<dyn RandomSource>,
    follow_naptr_replacement: bool,
}

impl Builder {
    /// Creates a builder whose locator will query `resolver`.
    ///
    /// Every standards-defined transport is supported until
    /// [`Builder::with_supported_transports`] says otherwise.
    pub fn new(resolver: Arc<dyn Resolve>) -> Self {
        Builder {
            resolver,
            transports: Transport::ALL.iter().map(|t| t.to_string()).collect(),
            random: Arc::new(ThreadRngSource),
            follow_naptr_replacement: false,
        }
    }

    /// Sets the transports the caller can use, most preferred first.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use sip_locator::{Locator, dns::StaticResolver};
    /// let locator = Locator::builder(Arc::new(StaticResolver::new()))
    ///     .with_supported_transports(["TLS", "tcp"])
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(locator.supported_transports().len(), 2);
    /// ```
    pub fn with_supported_transports<I, T>(mut self, transports: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.transports = transports.into_iter().map(|t| t.as_ref().to_string()).collect();

        self
    }

    /// Sets the source of the SRV weighted selection draws.
    pub fn with_random_source(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Arc::new(random);

        self
    }

    /// Queries SRV records at the replacement of the selected NAPTR record
    /// before the target itself.
    pub fn with_naptr_replacement(mut self, follow: bool) -> Self {
        self.follow_naptr_replacement = follow;

        self
    }

    /// Finalize the Builder into a `Locator`.
    ///
    /// Fails with [`Error::UnknownTransport`](crate::Error::UnknownTransport)
    /// if a supported transport is not a standards-defined one. Repeated
    /// transports are kept at their first position.
    pub fn build(self) -> Result<Locator> {
        let transports: Vec<Transport> = self
            .transports
            .iter()
            .map(|name| name.parse::<Transport>())
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .unique()
            .collect();

        log::debug!("Supported transports ({})", transports.iter().join(", "));

        Ok(Locator(Arc::new(Inner {
            resolver: self.resolver,
            transports: transports.into_boxed_slice(),
            random: self.random,
            follow_naptr_replacement: self.follow_naptr_replacement,
        })))
    }
}
