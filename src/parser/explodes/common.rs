use log::debug;

use super::{socks, ss, trojan, vless, vmess};
use crate::models::{EConfigType, ServerConfig};
use crate::parser::types::{ParseError, ParseOptions};
use crate::utils::url::{parse_query, url_decode, QueryMap};

/// Parse a share link with default [`ParseOptions`].
pub fn parse(link: &str) -> Result<ServerConfig, ParseError> {
    parse_with(link, &ParseOptions::default())
}

/// Parse a share link into a [`ServerConfig`]
///
/// The scheme prefix picks the parser; unknown schemes are rejected without
/// looking at the rest of the link.
pub fn parse_with(link: &str, options: &ParseOptions) -> Result<ServerConfig, ParseError> {
    let result = explode(link.trim(), options);
    if let Err(err) = &result {
        debug!("Rejected share link: {}", err);
    }
    result
}

fn explode(link: &str, options: &ParseOptions) -> Result<ServerConfig, ParseError> {
    if link.is_empty() {
        return Err(ParseError::Empty);
    }

    let config_type = EConfigType::from_link(link).ok_or_else(|| {
        let scheme = link.split_once("://").map_or(link, |(scheme, _)| scheme);
        ParseError::UnknownScheme(scheme.to_string())
    })?;
    let body = &link[config_type.scheme().len()..];

    match config_type {
        EConfigType::Vmess => vmess::explode_vmess(body, options),
        EConfigType::Vless => vless::explode_vless(body, options),
        EConfigType::Shadowsocks => ss::explode_ss(body),
        EConfigType::Socks => socks::explode_socks(body),
        EConfigType::Trojan => trojan::explode_trojan(body, options),
        EConfigType::Custom | EConfigType::Wireguard => {
            Err(ParseError::Unsupported(config_type))
        }
    }
}

/// Split off a `#remark` fragment, URL-decoding it
pub(crate) fn split_fragment(s: &str) -> (&str, String) {
    match s.split_once('#') {
        Some((rest, fragment)) => (rest, url_decode(fragment)),
        None => (s, String::new()),
    }
}

/// Split off a `?query` and parse it
pub(crate) fn split_query(s: &str) -> (&str, QueryMap) {
    match s.split_once('?') {
        Some((rest, query)) => (rest, parse_query(query)),
        None => (s, QueryMap::new()),
    }
}

/// Look up a query parameter as `&str`
pub(crate) fn param<'a>(params: &'a QueryMap, key: &str) -> Option<&'a str> {
    params.get(key).map(String::as_str)
}
