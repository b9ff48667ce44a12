use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IP_RULE_REGEX: Regex = Regex::new(
        r"^(?:\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}(?:/\d{1,2})?|\[[0-9a-fA-F:]+\](?:/\d{1,3})?)$"
    )
    .unwrap();
    static ref PURE_IPV4_REGEX: Regex = Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}$").unwrap();
    /// `method:password@host:port`
    pub static ref SS_LEGACY_REGEX: Regex = Regex::new(r"^(.+?):(.*)@(.+?):(\d+)$").unwrap();
}

/// Whether a routing rule token addresses IPs rather than domains
///
/// Matches dotted quads, bracketed IPv6 literals (both with an optional CIDR
/// suffix) and anything already prefixed with `geoip:`.
pub fn is_ip_rule(rule: &str) -> bool {
    rule.starts_with("geoip:") || IP_RULE_REGEX.is_match(rule)
}

/// Whether the string is a bare IPv4 address
pub fn is_pure_ip_address(s: &str) -> bool {
    PURE_IPV4_REGEX.is_match(s)
}
