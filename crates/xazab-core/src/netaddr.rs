//! Literal network address checks used when deciding whether a peer or
//! server address points back at this machine.

use std::net::{Ipv4Addr, Ipv6Addr};

const LOCALHOST_NAMES: [&str; 2] = ["localhost", "localhost."];

pub fn is_ip_address(text: &str) -> bool {
    parse_ipv4_lenient(text).is_some() || text.parse::<Ipv6Addr>().is_ok()
}

/// Dotted-quad IPv4 parser that, unlike `Ipv4Addr::from_str`, tolerates
/// zero-padded octets such as `127.000.000.001`.
pub fn parse_ipv4_lenient(text: &str) -> Option<Ipv4Addr> {
    let mut octets = [0_u8; 4];
    let mut groups = text.split('.');

    for octet in octets.iter_mut() {
        let group = groups.next()?;
        if group.is_empty() || group.len() > 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *octet = group.parse::<u8>().ok()?;
    }

    if groups.next().is_some() {
        return None;
    }
    Some(Ipv4Addr::from(octets))
}

/// Loopback literals and the `localhost` hostname. An IPv6 literal may be
/// wrapped in one pair of brackets, as it appears in URLs.
pub fn is_private_net_address(text: &str) -> bool {
    let host = text
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(text);

    if let Some(ipv4) = parse_ipv4_lenient(host) {
        return ipv4.is_loopback();
    }
    if let Ok(ipv6) = host.parse::<Ipv6Addr>() {
        return ipv6 == Ipv6Addr::LOCALHOST;
    }
    LOCALHOST_NAMES.contains(&host)
}
