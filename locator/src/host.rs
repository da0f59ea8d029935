//! Host classification.
//!
//! Tells numeric hosts from DNS names using the `IPv4address` and
//! `IPv6reference` productions of the SIP URI grammar (RFC 3261, section
//! 25.1). The grammar does not range-check the numbers, so `999.1.1.1` is
//! numeric here.

use std::net::IpAddr;

/// Returns `true` if `host` is four dot separated groups of 1 to 3 digits.
pub fn is_ipv4_literal(host: &str) -> bool {
    let mut groups = 0;
    for group in host.split('.') {
        groups += 1;
        if groups > 4 || group.is_empty() || group.len() > 3 {
            return false;
        }
        if !group.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
    }
    let matches = groups == 4;
    log::trace!("is_ipv4_literal({}): {}", host, matches);

    matches
}

/// Returns `true` if `host` is an IPv6 address surrounded by square brackets.
///
/// ```text
/// IPv6reference  =  "[" IPv6address "]"
/// IPv6address    =  hexpart [ ":" IPv4address ]
/// hexpart        =  hexseq / hexseq "::" [ hexseq ] / "::" [ hexseq ]
/// hexseq         =  hex4 *( ":" hex4)
/// hex4           =  1*4HEXDIG
/// ```
pub fn is_ipv6_reference(host: &str) -> bool {
    let matches = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .is_some_and(is_ipv6_address);
    log::trace!("is_ipv6_reference({}): {}", host, matches);

    matches
}

/// Returns `true` if `host` is an IPv4 literal or an IPv6 reference.
pub fn is_numeric(host: &str) -> bool {
    is_ipv4_literal(host) || is_ipv6_reference(host)
}

/// Converts a numeric host to an address, dropping the brackets of an IPv6
/// reference. Returns `None` for names and for literals out of range.
pub fn to_ip_addr(host: &str) -> Option<IpAddr> {
    let literal = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);

    literal.parse().ok()
}

fn is_ipv6_address(addr: &str) -> bool {
    // An IPv4 tail can only follow the last colon.
    if addr.contains('.') {
        return match addr.rsplit_once(':') {
            Some((hexpart, ipv4)) => is_hexpart(hexpart) && is_ipv4_literal(ipv4),
            None => false,
        };
    }

    is_hexpart(addr)
}

fn is_hexpart(part: &str) -> bool {
    match part.split_once("::") {
        Some((head, tail)) => {
            (head.is_empty() || is_hexseq(head)) && (tail.is_empty() || is_hexseq(tail))
        }
        None => is_hexseq(part),
    }
}

fn is_hexseq(seq: &str) -> bool {
    seq.split(':').all(is_hex4)
}

fn is_hex4(group: &str) -> bool {
    (1..=4).contains(&group.len()) && group.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_literals() {
        assert!(is_ipv4_literal("192.0.2.1"));
        assert!(is_ipv4_literal("0.0.0.0"));
        assert!(is_ipv4_literal("999.999.999.999"));

        assert!(!is_ipv4_literal("192.0.2"));
        assert!(!is_ipv4_literal("192.0.2.1.5"));
        assert!(!is_ipv4_literal("1921.0.2.1"));
        assert!(!is_ipv4_literal("192.0.2."));
        assert!(!is_ipv4_literal("a.b.c.d"));
        assert!(!is_ipv4_literal("example.com"));
        assert!(!is_ipv4_literal(""));
    }

    #[test]
    fn test_ipv6_references() {
        assert!(is_ipv6_reference("[::1]"));
        assert!(is_ipv6_reference("[::]"));
        assert!(is_ipv6_reference("[2001:db8::10]"));
        assert!(is_ipv6_reference("[2001:DB8:0:0:8:800:200C:417A]"));
        assert!(is_ipv6_reference("[fe80::]"));
        assert!(is_ipv6_reference("[::ffff:192.0.2.1]"));
        assert!(is_ipv6_reference("[1:2:3:4:5:6:192.0.2.1]"));

        assert!(!is_ipv6_reference("::1"));
        assert!(!is_ipv6_reference("[::1"));
        assert!(!is_ipv6_reference("[]"));
        assert!(!is_ipv6_reference("[1::2::3]"));
        assert!(!is_ipv6_reference("[12345::1]"));
        assert!(!is_ipv6_reference("[g::1]"));
        assert!(!is_ipv6_reference("[:1]"));
        assert!(!is_ipv6_reference("[1:]"));
        assert!(!is_ipv6_reference("[::192.0.2.1]"));
        assert!(!is_ipv6_reference("[example.com]"));
    }

    #[test]
    fn test_is_numeric() {
        assert!(is_numeric("203.0.113.5"));
        assert!(is_numeric("[2001:db8::1]"));
        assert!(!is_numeric("sip1.example.com."));
        assert!(!is_numeric("2001:db8::1"));
    }

    #[test]
    fn test_to_ip_addr() {
        assert_eq!(to_ip_addr("192.0.2.1"), Some("192.0.2.1".parse().unwrap()));
        assert_eq!(to_ip_addr("[::1]"), Some("::1".parse().unwrap()));
        assert_eq!(to_ip_addr("999.1.1.1"), None);
        assert_eq!(to_ip_addr("example.com"), None);
    }
}
