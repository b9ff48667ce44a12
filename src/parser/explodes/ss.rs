use super::common::split_fragment;
use crate::models::{EConfigType, ServerConfig};
use crate::parser::types::ParseError;
use crate::utils::base64::base64_decode;
use crate::utils::matcher::SS_LEGACY_REGEX;
use crate::utils::string::to_int;

/// Parse the part of a Shadowsocks link after `ss://`
///
/// Accepted shapes, both resolving to `method:password@host:port`:
/// * `base64(method:password)@host:port[#remark]`
/// * `base64(method:password@host:port)[#remark]`
///
/// SIP002 links carrying a query (plugins) do not match and are rejected.
pub fn explode_ss(body: &str) -> Result<ServerConfig, ParseError> {
    let (rest, remarks) = split_fragment(body);

    let decoded = match rest.find('@') {
        Some(at) => format!("{}{}", base64_decode(&rest[..at]), &rest[at..]),
        None => base64_decode(rest),
    };

    let caps = SS_LEGACY_REGEX.captures(&decoded).ok_or_else(|| {
        ParseError::InvalidFormat("shadowsocks link is not method:password@host:port".to_string())
    })?;

    let mut config = ServerConfig::create(EConfigType::Shadowsocks);
    config.remarks = remarks;
    let server = config
        .outbound_bean
        .as_mut()
        .and_then(|outbound| outbound.settings.servers_mut())
        .ok_or(ParseError::MissingField("servers"))?;
    server.method = caps[1].to_string();
    server.password = caps[2].to_string();
    server.address = caps[3].to_string();
    server.port = to_int(&caps[4]);

    Ok(config)
}
