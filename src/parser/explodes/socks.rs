use super::common::split_fragment;
use crate::models::{EConfigType, ServerConfig, SocksUserBean};
use crate::parser::types::ParseError;
use crate::utils::base64::base64_decode;
use crate::utils::string::split_host_port;

/// Split `host:port`, accepting it only when both parts are usable
fn usable_host_port(s: &str) -> Option<(String, u16)> {
    split_host_port(s.trim_end_matches('/')).filter(|(host, port)| !host.is_empty() && *port != 0)
}

/// Parse the part of a SOCKS link after `socks://`
///
/// Accepted shapes:
/// * `base64(user:pass)@host:port[#remark]`
/// * `host:port[#remark]`
/// * `base64(user:pass@host:port)[#remark]` or `base64(host:port)[#remark]`
pub fn explode_socks(body: &str) -> Result<ServerConfig, ParseError> {
    let (rest, remarks) = split_fragment(body);

    let (credentials, authority) = match rest.rsplit_once('@') {
        Some((user_info, authority)) => (Some(base64_decode(user_info)), authority.to_string()),
        None if usable_host_port(rest).is_some() => (None, rest.to_string()),
        None => {
            let decoded = base64_decode(rest);
            match decoded.rsplit_once('@') {
                Some((user_info, authority)) => {
                    (Some(user_info.to_string()), authority.to_string())
                }
                None => (None, decoded),
            }
        }
    };

    let (host, port) = usable_host_port(&authority)
        .ok_or_else(|| ParseError::InvalidFormat(format!("no host:port in '{}'", authority)))?;

    let mut config = ServerConfig::create(EConfigType::Socks);
    config.remarks = remarks;
    let server = config
        .outbound_bean
        .as_mut()
        .and_then(|outbound| outbound.settings.servers_mut())
        .ok_or(ParseError::MissingField("servers"))?;
    server.address = host;
    server.port = port;

    if let Some(credentials) = credentials {
        let (user, pass) = credentials
            .split_once(':')
            .unwrap_or((credentials.as_str(), ""));
        if !user.is_empty() {
            server.users = Some(vec![SocksUserBean {
                user: user.to_string(),
                pass: pass.to_string(),
                level: 0,
            }]);
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OutboundSettings, ServerObjectBean};
    use crate::utils::base64::base64_encode;

    fn first_server(config: &ServerConfig) -> &ServerObjectBean {
        match &config.outbound_bean.as_ref().unwrap().settings {
            OutboundSettings::Servers(servers) => &servers[0],
            OutboundSettings::Vnext(_) => panic!("socks must use servers"),
        }
    }

    #[test]
    fn test_explode_socks_with_credentials() {
        let body = format!("{}@127.0.0.1:1080#local", base64_encode("alice:s3cret"));
        let config = explode_socks(&body).unwrap();

        assert_eq!(config.config_type, EConfigType::Socks);
        assert_eq!(config.remarks, "local");
        let server = first_server(&config);
        assert_eq!(server.address, "127.0.0.1");
        assert_eq!(server.port, 1080);
        let users = server.users.as_ref().unwrap();
        assert_eq!(users[0].user, "alice");
        assert_eq!(users[0].pass, "s3cret");
    }

    #[test]
    fn test_explode_socks_plain_authority() {
        let config = explode_socks("proxy.example.com:1080").unwrap();
        let server = first_server(&config);
        assert_eq!(server.address, "proxy.example.com");
        assert_eq!(server.port, 1080);
        assert!(server.users.is_none());
    }

    #[test]
    fn test_explode_socks_fully_encoded() {
        let config = explode_socks(&base64_encode("bob:pw@10.0.0.1:7890")).unwrap();
        let server = first_server(&config);
        assert_eq!(server.address, "10.0.0.1");
        assert_eq!(server.port, 7890);
        assert_eq!(server.users.as_ref().unwrap()[0].user, "bob");
    }

    #[test]
    fn test_explode_socks_rejects_missing_port() {
        assert!(explode_socks("proxy.example.com").is_err());
        assert!(explode_socks("").is_err());
    }
}
