//! Transport rules.
//!
//! The standards-defined SIP transports and the static knowledge attached to
//! them: default ports, the secure counterpart of a transport, the NAPTR
//! service fields and the SRV service identifiers.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::uri::Scheme;

const TP_UDP: &str = "UDP";
const TP_TCP: &str = "TCP";
const TP_TLS: &str = "TLS";
const TP_SCTP: &str = "SCTP";
const TP_TLS_SCTP: &str = "TLS-SCTP";

const PORT_SIP: u16 = 5060;
const PORT_SIPS: u16 = 5061;

/// NAPTR service field to transport table (RFC 3263, section 4.1).
const NAPTR_SERVICES: [(&str, Transport); 5] = [
    ("SIP+D2T", Transport::Tcp),
    ("SIPS+D2T", Transport::Tls),
    ("SIP+D2U", Transport::Udp),
    ("SIP+D2S", Transport::Sctp),
    ("SIPS+D2S", Transport::TlsSctp),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// An SIP Transport Type.
pub enum Transport {
    /// `UDP` transport.
    Udp,
    /// `TCP` transport.
    Tcp,
    /// `TLS` transport.
    Tls,
    /// `SCTP` transport.
    Sctp,
    /// `TLS-SCTP` transport.
    TlsSctp,
}

impl Transport {
    /// Every standards-defined transport.
    pub const ALL: [Transport; 5] = [
        Transport::Udp,
        Transport::Tcp,
        Transport::Tls,
        Transport::Sctp,
        Transport::TlsSctp,
    ];

    /// Returns the transport string representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Transport::Udp => TP_UDP,
            Transport::Tcp => TP_TCP,
            Transport::Tls => TP_TLS,
            Transport::Sctp => TP_SCTP,
            Transport::TlsSctp => TP_TLS_SCTP,
        }
    }

    /// Returns `true` for the transports running over TLS.
    #[inline]
    pub const fn is_secure(&self) -> bool {
        matches!(self, Transport::Tls | Transport::TlsSctp)
    }

    /// Returns the default port number associated with the transport protocol.
    ///
    /// - `TLS` and `TLS-SCTP` use port `5061`.
    /// - `UDP`, `TCP` and `SCTP` use port `5060`.
    #[inline]
    pub const fn default_port(&self) -> u16 {
        if self.is_secure() { PORT_SIPS } else { PORT_SIP }
    }

    /// Returns the secure counterpart of this transport.
    ///
    /// `TCP` upgrades to `TLS` and `SCTP` to `TLS-SCTP`, any other transport
    /// fails with [`Error::NotUpgradable`].
    pub fn upgrade(&self) -> Result<Transport> {
        match self {
            Transport::Tcp => Ok(Transport::Tls),
            Transport::Sctp => Ok(Transport::TlsSctp),
            other => Err(Error::NotUpgradable(*other)),
        }
    }

    /// Maps a NAPTR service field to its transport.
    ///
    /// The match is exact, `sip+d2t` is not recognized.
    pub fn from_naptr_service(service: &str) -> Result<Transport> {
        NAPTR_SERVICES
            .iter()
            .find(|(name, _)| *name == service)
            .map(|(_, transport)| *transport)
            .ok_or_else(|| Error::UnrecognizedNaptrService(service.to_string()))
    }

    /// Returns the NAPTR service field that advertises this transport.
    pub fn naptr_service(&self) -> &'static str {
        NAPTR_SERVICES
            .iter()
            .find(|(_, transport)| transport == self)
            .map(|(name, _)| *name)
            .unwrap_or_default()
    }

    /// Returns the SRV service identifier of this transport in `domain`.
    ///
    /// The identifier is always an absolute name: a trailing `.` is added to
    /// `domain` when it has none.
    ///
    /// # Examples
    ///
    /// ```
    /// use sip_locator::Transport;
    ///
    /// assert_eq!(Transport::Tls.service_identifier("example.com."), "_sips._tcp.example.com.");
    /// assert_eq!(Transport::Udp.service_identifier("example.com"), "_sip._udp.example.com.");
    /// ```
    pub fn service_identifier(&self, domain: &str) -> String {
        let proto = match self {
            Transport::Tls | Transport::Tcp => "_tcp",
            Transport::TlsSctp | Transport::Sctp => "_sctp",
            Transport::Udp => "_udp",
        };
        let service = if self.as_str().starts_with(TP_TLS) { "_sips" } else { "_sip" };

        let root = if domain.ends_with('.') { "" } else { "." };

        format!("{service}.{proto}.{domain}{root}")
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transport {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Transport::ALL
            .into_iter()
            .find(|transport| transport.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownTransport(s.to_string()))
    }
}

/// Returns `true` if `name` is one of the standards-defined transports,
/// ignoring case.
pub fn is_known_transport(name: &str) -> bool {
    let known = name.parse::<Transport>().is_ok();
    log::trace!("is_known_transport({}): {}", name, known);

    known
}

/// Returns the default port of the transport called `name`.
pub fn default_port_for(name: &str) -> Result<u16> {
    Ok(name.parse::<Transport>()?.default_port())
}

/// Returns the secure counterpart of the transport called `name`.
pub fn upgrade_transport(name: &str) -> Result<Transport> {
    name.parse::<Transport>()?.upgrade()
}

/// Returns the transport used by default for the URI scheme called `scheme`.
pub fn default_transport_for_scheme(scheme: &str) -> Result<Transport> {
    scheme.parse::<Scheme>()?.default_transport()
}

/// Maps a NAPTR service field to its transport.
pub fn transport_for_naptr_service(service: &str) -> Result<Transport> {
    Transport::from_naptr_service(service)
}

/// Returns the SRV service identifier of the transport called `name` in
/// `domain`.
pub fn service_identifier(name: &str, domain: &str) -> Result<String> {
    Ok(name.parse::<Transport>()?.service_identifier(domain))
}
