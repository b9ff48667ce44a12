use super::common::{param, split_fragment, split_query};
use super::vless::transport_params;
use crate::models::{EConfigType, ServerConfig, TLS};
use crate::parser::types::{ParseError, ParseOptions};
use crate::utils::string::split_host_port;
use crate::utils::url::url_decode;

/// Parse the part of a Trojan link after `trojan://`
/// Format: password@host:port[?query][#remark]
///
/// Trojan always runs over TLS unless the query names another `security`.
pub fn explode_trojan(body: &str, options: &ParseOptions) -> Result<ServerConfig, ParseError> {
    let (rest, remarks) = split_fragment(body);
    let (rest, params) = split_query(rest);

    let (password, host_port) = rest
        .rsplit_once('@')
        .ok_or_else(|| ParseError::InvalidFormat("trojan link has no '@'".to_string()))?;
    let password = url_decode(password);
    if password.is_empty() {
        return Err(ParseError::MissingField("password"));
    }
    let (host, port) = split_host_port(host_port.trim_end_matches('/'))
        .ok_or_else(|| ParseError::InvalidFormat(format!("no port in '{}'", host_port)))?;
    if host.is_empty() {
        return Err(ParseError::MissingField("address"));
    }
    if port == 0 {
        return Err(ParseError::InvalidFormat(format!("invalid port in '{}'", host_port)));
    }

    let mut config = ServerConfig::create(EConfigType::Trojan);
    config.remarks = remarks;
    let outbound = config
        .outbound_bean
        .as_mut()
        .ok_or(ParseError::MissingField("outbound"))?;

    let server = outbound
        .settings
        .servers_mut()
        .ok_or(ParseError::MissingField("servers"))?;
    server.address = host;
    server.port = port;
    server.password = password;
    server.flow = param(&params, "flow").unwrap_or_default().to_string();

    let stream = &mut outbound.stream_settings;
    let sni = stream.populate_transport_settings(
        param(&params, "type").unwrap_or("tcp"),
        &transport_params(&params),
    );
    let sni = param(&params, "sni").map_or(sni, str::to_string);
    stream.populate_tls_settings(
        param(&params, "security").unwrap_or(TLS),
        options.allow_insecure,
        &sni,
        param(&params, "fp").unwrap_or_default(),
        param(&params, "alpn").unwrap_or_default(),
    );

    Ok(config)
}
