use v2rayconf::models::{EConfigType, OutboundSettings, ServerConfig};
use v2rayconf::utils::base64::base64_encode;
use v2rayconf::{parse, parse_with, ParseError, ParseOptions};

#[cfg(test)]
mod parse_link_tests {
    use super::*;

    fn outbound_settings(config: &ServerConfig) -> &OutboundSettings {
        &config.outbound_bean.as_ref().unwrap().settings
    }

    #[test]
    fn test_empty_and_unknown_links_fail() {
        assert!(matches!(parse(""), Err(ParseError::Empty)));
        assert!(matches!(
            parse("unknown://x"),
            Err(ParseError::UnknownScheme(ref scheme)) if scheme == "unknown"
        ));
        // Scheme matching is case-sensitive
        assert!(parse("VLESS://id@example.com:443").is_err());
    }

    #[test]
    fn test_vless_literal() {
        let config = parse("vless://af180fee-d7d8-4d34-de6e-b92dbc682005@146.235.231.101:35104?encryption=none&security=none&type=tcp&headerType=none#lv").unwrap();

        assert_eq!(config.config_type, EConfigType::Vless);
        assert_eq!(config.remarks, "lv");
        assert_eq!(config.config_version, 3);
        match outbound_settings(&config) {
            OutboundSettings::Vnext(vnext) => {
                assert_eq!(vnext[0].address, "146.235.231.101");
                assert_eq!(vnext[0].port, 35104);
                assert_eq!(vnext[0].users[0].id, "af180fee-d7d8-4d34-de6e-b92dbc682005");
                assert_eq!(vnext[0].users[0].encryption, "none");
            }
            OutboundSettings::Servers(_) => panic!("expected vnext"),
        }
        let stream = &config.outbound_bean.as_ref().unwrap().stream_settings;
        assert!(stream.tls_settings.is_none());
    }

    #[test]
    fn test_shadowsocks_literal() {
        let link = format!(
            "ss://{}@example.com:8388#MyNode",
            base64_encode("aes-256-gcm:mypassword")
        );
        let config = parse(&link).unwrap();

        assert_eq!(config.config_type, EConfigType::Shadowsocks);
        assert_eq!(config.remarks, "MyNode");
        match outbound_settings(&config) {
            OutboundSettings::Servers(servers) => {
                assert_eq!(servers[0].method, "aes-256-gcm");
                assert_eq!(servers[0].password, "mypassword");
                assert_eq!(servers[0].address, "example.com");
                assert_eq!(servers[0].port, 8388);
            }
            OutboundSettings::Vnext(_) => panic!("expected servers"),
        }
    }

    #[test]
    fn test_vmess_link() {
        let payload = r#"{"v":"2","ps":"vm","add":"vm.example.com","port":"8443","id":"5783a3e7-e373-51cd-8642-c83782b807c5","aid":"0","net":"grpc","path":"svc","tls":"tls"}"#;
        let config = parse(&format!("vmess://{}", base64_encode(payload))).unwrap();

        assert_eq!(config.config_type, EConfigType::Vmess);
        assert_eq!(config.domain().as_deref(), Some("vm.example.com:8443"));
        let stream = &config.outbound_bean.as_ref().unwrap().stream_settings;
        assert_eq!(stream.network.as_deref(), Some("grpc"));
        assert_eq!(stream.security.as_deref(), Some("tls"));
    }

    #[test]
    fn test_trojan_and_socks_links() {
        let trojan = parse("trojan://pw@t.example.com:443?sni=s.example.com#tr").unwrap();
        assert_eq!(trojan.config_type, EConfigType::Trojan);
        assert_eq!(trojan.outbound_bean.as_ref().unwrap().protocol, "trojan");

        let socks = parse(&format!(
            "socks://{}@127.0.0.1:1080",
            base64_encode("user:pass")
        ))
        .unwrap();
        assert_eq!(socks.config_type, EConfigType::Socks);
        assert_eq!(socks.domain().as_deref(), Some("127.0.0.1:1080"));
    }

    #[test]
    fn test_wireguard_is_recognized_but_unsupported() {
        assert!(matches!(
            parse("wireguard://key@example.com:51820"),
            Err(ParseError::Unsupported(EConfigType::Wireguard))
        ));
    }

    #[test]
    fn test_allow_insecure_option() {
        let link = "vless://id@example.com:443?security=tls&sni=example.com";
        let strict = parse(link).unwrap();
        let lax = parse_with(link, &ParseOptions { allow_insecure: true }).unwrap();

        let tls = |config: &ServerConfig| {
            config
                .outbound_bean
                .as_ref()
                .unwrap()
                .stream_settings
                .tls_settings
                .as_ref()
                .unwrap()
                .allow_insecure
        };
        assert_eq!(tls(&strict), Some(false));
        assert_eq!(tls(&lax), Some(true));
    }

    #[test]
    fn test_parsed_server_serializes_camel_case() {
        let config = parse("vless://id@example.com:443#x").unwrap();
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["configType"], "VLESS");
        assert_eq!(value["outboundBean"]["protocol"], "vless");
        assert_eq!(
            value["outboundBean"]["settings"]["vnext"][0]["users"][0]["level"],
            8
        );
        assert!(value["outboundBean"]["settings"]["vnext"][0]["users"][0]
            .get("flow")
            .is_none());
    }
}
