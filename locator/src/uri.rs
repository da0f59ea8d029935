//! SIP URI components used for server location.

use std::fmt;
use std::str::FromStr;

use util::ArcStr;

use crate::error::{Error, Result};
use crate::transport::Transport;

const SCHEME_SIP: &str = "sip";
const SCHEME_SIPS: &str = "sips";

#[derive(Debug, PartialEq, Eq, Clone, Default, Copy)]
/// A SIP URI scheme, either `sip` or `sips`.
pub enum Scheme {
    #[default]
    /// An Sip uri scheme.
    Sip,
    /// An Sips uri scheme.
    Sips,
}

impl Scheme {
    /// Returns the scheme string representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Scheme::Sip => SCHEME_SIP,
            Scheme::Sips => SCHEME_SIPS,
        }
    }

    /// Returns the transport used when the URI has no `transport` parameter.
    ///
    /// `sip` defaults to `UDP`, `sips` to the secure counterpart of `TCP`.
    pub fn default_transport(&self) -> Result<Transport> {
        match self {
            Scheme::Sip => Ok(Transport::Udp),
            Scheme::Sips => Transport::Tcp.upgrade(),
        }
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case(SCHEME_SIP) {
            Ok(Scheme::Sip)
        } else if s.eq_ignore_ascii_case(SCHEME_SIPS) {
            Ok(Scheme::Sips)
        } else {
            Err(Error::UnknownScheme(s.to_string()))
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parts of a SIP URI that drive server location.
///
/// The scheme and the `transport` parameter are kept as written; they are
/// validated when the URI is located, so a URI with an unknown scheme can be
/// built or parsed but never located.
///
/// # Examples
///
/// ```
/// use sip_locator::Uri;
///
/// let uri: Uri = "sips:bob@example.com;maddr=192.0.2.7".parse().unwrap();
///
/// assert_eq!(uri.scheme(), "sips");
/// assert_eq!(uri.host(), "example.com");
/// assert_eq!(uri.target(), "192.0.2.7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uri {
    scheme: ArcStr,
    host: ArcStr,
    port: Option<u16>,
    transport_param: Option<ArcStr>,
    maddr_param: Option<ArcStr>,
}

impl Uri {
    /// Returns a builder for a URI with the given `scheme` and `host`.
    pub fn builder(scheme: &str, host: &str) -> UriBuilder {
        UriBuilder {
            uri: Uri {
                scheme: scheme.into(),
                host: host.into(),
                port: None,
                transport_param: None,
                maddr_param: None,
            },
        }
    }

    /// Returns the scheme as written.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns the host part.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the explicit port.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Returns the `transport` parameter.
    pub fn transport_param(&self) -> Option<&str> {
        self.transport_param.as_deref()
    }

    /// Returns the `maddr` parameter.
    pub fn maddr_param(&self) -> Option<&str> {
        self.maddr_param.as_deref()
    }

    /// Returns the host to resolve: the `maddr` parameter if present,
    /// otherwise the host part.
    pub fn target(&self) -> &str {
        self.maddr_param.as_deref().unwrap_or(&self.host)
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scheme, self.host)?;

        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        if let Some(maddr) = &self.maddr_param {
            write!(f, ";maddr={}", maddr)?;
        }
        if let Some(transport) = &self.transport_param {
            write!(f, ";transport={}", transport)?;
        }

        Ok(())
    }
}

impl FromStr for Uri {
    type Err = Error;

    /// Extracts the scheme, host, port, `transport` and `maddr` from a URI.
    ///
    /// User info, other parameters and headers are skipped.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidUri(format!("{s}: {reason}"));

        let (scheme, rest) = s.split_once(':').ok_or_else(|| invalid("missing scheme"))?;
        if scheme.is_empty() {
            return Err(invalid("missing scheme"));
        }

        let rest = rest.split_once('?').map_or(rest, |(uri, _headers)| uri);
        let rest = rest.rsplit_once('@').map_or(rest, |(_userinfo, hp)| hp);
        let (hostport, params) = rest.split_once(';').unwrap_or((rest, ""));

        let (host, port) = match hostport.strip_prefix('[') {
            Some(v6) => {
                let end = v6.find(']').ok_or_else(|| invalid("unterminated IPv6 reference"))?;
                let (host, after) = hostport.split_at(end + 2);
                let port = match after {
                    "" => None,
                    p => Some(p.strip_prefix(':').ok_or_else(|| invalid("garbage after host"))?),
                };
                (host, port)
            }
            None => match hostport.split_once(':') {
                Some((host, port)) => (host, Some(port)),
                None => (hostport, None),
            },
        };

        if host.is_empty() {
            return Err(invalid("missing host"));
        }
        let port = port
            .map(|p| p.parse::<u16>().map_err(|_| invalid("invalid port")))
            .transpose()?;

        let mut builder = Uri::builder(scheme, host);
        if let Some(port) = port {
            builder = builder.port(port);
        }
        for param in params.split(';') {
            let (name, value) = param.split_once('=').unwrap_or((param, ""));
            if name.eq_ignore_ascii_case("transport") {
                builder = builder.transport_param(value);
            } else if name.eq_ignore_ascii_case("maddr") {
                builder = builder.maddr_param(value);
            }
        }

        Ok(builder.get())
    }
}

/// Builder for creating a new [`Uri`].
pub struct UriBuilder {
    uri: Uri,
}

impl UriBuilder {
    /// Sets the explicit port.
    pub fn port(mut self, port: u16) -> Self {
        self.uri.port = Some(port);
        self
    }

    /// Sets the `transport` parameter.
    pub fn transport_param(mut self, param: &str) -> Self {
        self.uri.transport_param = Some(param.into());
        self
    }

    /// Sets the `maddr` parameter.
    pub fn maddr_param(mut self, param: &str) -> Self {
        self.uri.maddr_param = Some(param.into());
        self
    }

    /// Finalize the builder into a `Uri`.
    pub fn get(self) -> Uri {
        self.uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_uri() {
        let uri: Uri = "sip:alice@192.0.2.1".parse().unwrap();

        assert_eq!(uri.scheme(), "sip");
        assert_eq!(uri.host(), "192.0.2.1");
        assert_eq!(uri.port(), None);
        assert_eq!(uri.transport_param(), None);
        assert_eq!(uri.maddr_param(), None);
        assert_eq!(uri.target(), "192.0.2.1");
    }

    #[test]
    fn test_parse_port_and_params() {
        let uri: Uri = "sips:bob:secret@example.com:5071;lr;Transport=tcp;maddr=proxy.example.net?subject=x"
            .parse()
            .unwrap();

        assert_eq!(uri.scheme(), "sips");
        assert_eq!(uri.host(), "example.com");
        assert_eq!(uri.port(), Some(5071));
        assert_eq!(uri.transport_param(), Some("tcp"));
        assert_eq!(uri.maddr_param(), Some("proxy.example.net"));
        assert_eq!(uri.target(), "proxy.example.net");
    }

    #[test]
    fn test_parse_ipv6_reference() {
        let uri: Uri = "sip:[2001:db8::10]:5070".parse().unwrap();
        assert_eq!(uri.host(), "[2001:db8::10]");
        assert_eq!(uri.port(), Some(5070));

        let uri: Uri = "sip:carol@[::1];transport=udp".parse().unwrap();
        assert_eq!(uri.host(), "[::1]");
        assert_eq!(uri.port(), None);
        assert_eq!(uri.transport_param(), Some("udp"));
    }

    #[test]
    fn test_unknown_scheme_is_kept() {
        let uri: Uri = "foo:bar@example.com".parse().unwrap();

        assert_eq!(uri.scheme(), "foo");
        assert_matches!(uri.scheme().parse::<Scheme>(), Err(Error::UnknownScheme(_)));
    }

    #[test]
    fn test_invalid_uris() {
        assert_matches!("example.com".parse::<Uri>(), Err(Error::InvalidUri(_)));
        assert_matches!("sip:".parse::<Uri>(), Err(Error::InvalidUri(_)));
        assert_matches!("sip:alice@".parse::<Uri>(), Err(Error::InvalidUri(_)));
        assert_matches!("sip:example.com:70000".parse::<Uri>(), Err(Error::InvalidUri(_)));
        assert_matches!("sip:[::1".parse::<Uri>(), Err(Error::InvalidUri(_)));
        assert_matches!("sip:[::1]x".parse::<Uri>(), Err(Error::InvalidUri(_)));
    }

    #[test]
    fn test_builder_and_display() {
        let uri = Uri::builder("sip", "example.com")
            .port(5080)
            .transport_param("tcp")
            .maddr_param("10.0.0.1")
            .get();

        assert_eq!(uri.to_string(), "sip:example.com:5080;maddr=10.0.0.1;transport=tcp");
        assert_eq!(uri.to_string().parse::<Uri>(), Ok(uri));
    }

    #[test]
    fn test_scheme_default_transport() {
        assert_eq!(Scheme::Sip.default_transport(), Ok(Transport::Udp));
        assert_eq!(Scheme::Sips.default_transport(), Ok(Transport::Tls));
        assert_eq!("SIP".parse::<Scheme>(), Ok(Scheme::Sip));
    }
}
