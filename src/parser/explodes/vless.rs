use super::common::{param, split_fragment, split_query};
use crate::models::{EConfigType, ServerConfig, TransportParams, DEFAULT_ENCRYPTION};
use crate::parser::types::{ParseError, ParseOptions};
use crate::utils::string::split_host_port;
use crate::utils::url::QueryMap;

/// Transport parameters shared by the vless and trojan query formats
pub(crate) fn transport_params(params: &QueryMap) -> TransportParams<'_> {
    TransportParams {
        header_type: param(params, "headerType"),
        host: param(params, "host"),
        path: param(params, "path"),
        seed: param(params, "seed"),
        quic_security: param(params, "quicSecurity"),
        key: param(params, "key"),
        mode: param(params, "mode"),
        service_name: param(params, "serviceName"),
    }
}

/// Parse the part of a VLESS link after `vless://`
/// Format: uuid@host:port[?query][#remark]
///
/// The port is taken after the last `:`, so bracketed IPv6 hosts keep their
/// brackets in the address.
pub fn explode_vless(body: &str, options: &ParseOptions) -> Result<ServerConfig, ParseError> {
    let (rest, remarks) = split_fragment(body);
    let (rest, params) = split_query(rest);

    let (user_id, host_port) = rest
        .split_once('@')
        .ok_or_else(|| ParseError::InvalidFormat("vless link has no '@'".to_string()))?;
    if user_id.is_empty() {
        return Err(ParseError::MissingField("id"));
    }
    let (host, port) = split_host_port(host_port)
        .ok_or_else(|| ParseError::InvalidFormat(format!("no port in '{}'", host_port)))?;
    if host.is_empty() {
        return Err(ParseError::MissingField("address"));
    }

    let mut config = ServerConfig::create(EConfigType::Vless);
    config.remarks = remarks;
    let outbound = config
        .outbound_bean
        .as_mut()
        .ok_or(ParseError::MissingField("outbound"))?;

    let vnext = outbound
        .settings
        .vnext_mut()
        .ok_or(ParseError::MissingField("vnext"))?;
    vnext.address = host;
    vnext.port = port;
    let user = vnext
        .users
        .first_mut()
        .ok_or(ParseError::MissingField("users"))?;
    user.id = user_id.to_string();
    user.encryption = param(&params, "encryption")
        .unwrap_or(DEFAULT_ENCRYPTION)
        .to_string();
    user.flow = param(&params, "flow").unwrap_or_default().to_string();

    let stream = &mut outbound.stream_settings;
    let sni = stream.populate_transport_settings(
        param(&params, "type").unwrap_or("tcp"),
        &transport_params(&params),
    );
    let sni = param(&params, "sni").map_or(sni, str::to_string);
    stream.populate_tls_settings(
        param(&params, "security").unwrap_or_default(),
        options.allow_insecure,
        &sni,
        param(&params, "fp").unwrap_or_default(),
        param(&params, "alpn").unwrap_or_default(),
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OutboundSettings, VnextServerBean};

    fn first_vnext(config: &ServerConfig) -> &VnextServerBean {
        match &config.outbound_bean.as_ref().unwrap().settings {
            OutboundSettings::Vnext(vnext) => &vnext[0],
            OutboundSettings::Servers(_) => panic!("vless must use vnext"),
        }
    }

    #[test]
    fn test_explode_vless_plain() {
        let config = explode_vless(
            "af180fee-d7d8-4d34-de6e-b92dbc682005@146.235.231.101:35104?encryption=none&security=none&type=tcp&headerType=none#lv",
            &ParseOptions::default(),
        )
        .unwrap();

        assert_eq!(config.config_type, EConfigType::Vless);
        assert_eq!(config.remarks, "lv");
        let vnext = first_vnext(&config);
        assert_eq!(vnext.address, "146.235.231.101");
        assert_eq!(vnext.port, 35104);
        assert_eq!(vnext.users[0].id, "af180fee-d7d8-4d34-de6e-b92dbc682005");
        assert_eq!(vnext.users[0].encryption, "none");
        let stream = &config.outbound_bean.as_ref().unwrap().stream_settings;
        assert!(stream.tls_settings.is_none());
        assert!(stream.security.is_none());
    }

    #[test]
    fn test_explode_vless_tls_sni_falls_back_to_host() {
        let config = explode_vless(
            "uuid@example.com:443?type=ws&host=cdn.example.com&path=%2Fws&security=tls&flow=xtls-rprx-vision&alpn=h2%2Chttp%2F1.1",
            &ParseOptions {
                allow_insecure: true,
            },
        )
        .unwrap();

        let vnext = first_vnext(&config);
        assert_eq!(vnext.users[0].flow, "xtls-rprx-vision");
        let stream = &config.outbound_bean.as_ref().unwrap().stream_settings;
        assert_eq!(stream.network.as_deref(), Some("ws"));
        assert_eq!(stream.ws_settings.as_ref().unwrap().path, "/ws");
        let tls = stream.tls_settings.as_ref().unwrap();
        assert_eq!(tls.server_name.as_deref(), Some("cdn.example.com"));
        assert_eq!(tls.allow_insecure, Some(true));
        assert_eq!(
            tls.alpn,
            Some(vec!["h2".to_string(), "http/1.1".to_string()])
        );
    }

    #[test]
    fn test_explode_vless_explicit_sni_wins() {
        let config = explode_vless(
            "uuid@example.com:443?security=tls&host=h.example.com&sni=s.example.com",
            &ParseOptions::default(),
        )
        .unwrap();
        let stream = &config.outbound_bean.as_ref().unwrap().stream_settings;
        assert_eq!(stream.network.as_deref(), Some("tcp"));
        assert_eq!(
            stream.tls_settings.as_ref().unwrap().server_name.as_deref(),
            Some("s.example.com")
        );
    }

    #[test]
    fn test_explode_vless_bracketed_ipv6() {
        let config = explode_vless("uuid@[2001:db8::1]:8443", &ParseOptions::default()).unwrap();
        let vnext = first_vnext(&config);
        assert_eq!(vnext.address, "[2001:db8::1]");
        assert_eq!(vnext.port, 8443);
    }

    #[test]
    fn test_explode_vless_rejects_missing_parts() {
        assert!(explode_vless("example.com:443", &ParseOptions::default()).is_err());
        assert!(explode_vless("uuid@example.com", &ParseOptions::default()).is_err());
        assert!(explode_vless("@example.com:443", &ParseOptions::default()).is_err());
    }
}
