use std::collections::BTreeMap;

use log::debug;
use serde_json::{json, Value};

use super::inbound::{LOOPBACK, WILDCARD};
use super::routing::split_user_rules;
use super::{GenError, TAG_AGENT, TAG_DIRECT};
use crate::models::{Dns, DnsServerObject, FullConfig, Inbound, RoutingRule};
use crate::settings::GeneratorSettings;
use crate::utils::matcher::is_pure_ip_address;

pub const TAG_DNS_IN: &str = "dns-in";
pub const TAG_DNS_OUT: &str = "dns-out";
const DNS_PORT: u16 = 53;

/// Domains resolved by the domestic DNS server: user direct domains, plus
/// the mainland site list when routing bypasses mainland.
fn domestic_domains(settings: &GeneratorSettings) -> Vec<String> {
    let (mut domains, _) = split_user_rules(&settings.user_routing_direct);
    if settings.routing_mode.bypasses_mainland() {
        domains.push("geosite:cn".to_string());
    }
    domains
}

fn port_53_rule(servers: Vec<String>, tag: &str) -> Option<RoutingRule> {
    if servers.is_empty() {
        return None;
    }
    let mut rule = RoutingRule::to_outbound(tag);
    rule.ip = Some(servers);
    rule.port = Some(DNS_PORT.to_string());
    Some(rule)
}

/// Fill the `dns` block and the rules that keep DNS traffic on the right
/// outbound.
pub fn apply_dns(config: &mut FullConfig, settings: &GeneratorSettings) -> Result<(), GenError> {
    let dns = config.dns.get_or_insert_with(Dns::default);
    dns.hosts
        .get_or_insert_with(BTreeMap::new)
        .insert("domain:googleapis.cn".to_string(), "googleapis.com".to_string());

    let mut servers: Vec<Value> = Vec::new();
    if settings.fake_dns_enabled {
        servers.push(Value::String("fakedns".to_string()));
    }
    servers.extend(settings.remote_dns.iter().cloned().map(Value::String));

    let domains = domestic_domains(settings);
    let use_domestic = !domains.is_empty();
    if use_domestic {
        let domestic = DnsServerObject {
            address: settings.primary_domestic_dns().to_string(),
            port: DNS_PORT,
            domains: Some(domains),
            expect_ips: settings
                .routing_mode
                .bypasses_mainland()
                .then(|| vec!["geoip:cn".to_string()]),
        };
        servers.push(serde_json::to_value(&domestic).map_err(GenError::Serialize)?);
    }
    debug!("DNS servers: {}", servers.len());
    dns.servers = Some(servers);

    // Ahead of the port-53 rules, which would otherwise catch dns-in traffic.
    if settings.local_dns_enabled {
        apply_local_dns(config, settings);
    }

    let remote_ips: Vec<String> = settings
        .remote_dns
        .iter()
        .filter(|server| is_pure_ip_address(server))
        .cloned()
        .collect();
    if let Some(rule) = port_53_rule(remote_ips, TAG_AGENT) {
        config.routing.rules.push(rule);
    }
    if use_domestic && is_pure_ip_address(settings.primary_domestic_dns()) {
        if let Some(rule) =
            port_53_rule(vec![settings.primary_domestic_dns().to_string()], TAG_DIRECT)
        {
            config.routing.rules.push(rule);
        }
    }
    Ok(())
}

/// Local DNS listener forwarding to the first remote server through the
/// engine's DNS outbound.
fn apply_local_dns(config: &mut FullConfig, settings: &GeneratorSettings) {
    let listen = if settings.proxy_sharing {
        WILDCARD
    } else {
        LOOPBACK
    };
    config.inbounds.push(Inbound {
        tag: TAG_DNS_IN.to_string(),
        port: settings.local_dns_port,
        listen: listen.to_string(),
        protocol: "dokodemo-door".to_string(),
        settings: Some(json!({
            "address": settings.primary_remote_dns(),
            "port": DNS_PORT,
            "network": "tcp,udp",
        })),
        sniffing: None,
    });
    config
        .outbounds
        .push(json!({"protocol": "dns", "tag": TAG_DNS_OUT}));

    let mut rule = RoutingRule::to_outbound(TAG_DNS_OUT);
    rule.inbound_tag = Some(vec![TAG_DNS_IN.to_string()]);
    config.routing.rules.push(rule);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::template::load_base_template;
    use crate::settings::ERoutingMode;

    fn with_dns(settings: &GeneratorSettings) -> FullConfig {
        let mut config = load_base_template().unwrap();
        apply_dns(&mut config, settings).unwrap();
        config
    }

    #[test]
    fn test_default_dns() {
        let config = with_dns(&GeneratorSettings::default());
        let dns = config.dns.as_ref().unwrap();
        assert_eq!(
            dns.hosts.as_ref().unwrap().get("domain:googleapis.cn").map(String::as_str),
            Some("googleapis.com")
        );
        assert_eq!(
            dns.servers.as_ref().unwrap(),
            &vec![json!("1.1.1.1"), json!("8.8.8.8")]
        );
        assert_eq!(config.routing.rules.len(), 1);
        let rule = &config.routing.rules[0];
        assert_eq!(rule.outbound_tag.as_deref(), Some("proxy"));
        assert_eq!(rule.port.as_deref(), Some("53"));
    }

    #[test]
    fn test_fakedns_listed_first() {
        let config = with_dns(&GeneratorSettings {
            fake_dns_enabled: true,
            ..GeneratorSettings::default()
        });
        assert_eq!(config.dns.unwrap().servers.unwrap()[0], json!("fakedns"));
    }

    #[test]
    fn test_domestic_server_when_bypassing_mainland() {
        let config = with_dns(&GeneratorSettings {
            routing_mode: ERoutingMode::BypassMainland,
            user_routing_direct: "example.cn,10.0.0.0/8".to_string(),
            ..GeneratorSettings::default()
        });
        let servers = config.dns.as_ref().unwrap().servers.clone().unwrap();
        assert_eq!(
            servers[2],
            json!({
                "address": "223.5.5.5",
                "port": 53,
                "domains": ["example.cn", "geosite:cn"],
                "expectIPs": ["geoip:cn"],
            })
        );
        let direct = &config.routing.rules[1];
        assert_eq!(direct.outbound_tag.as_deref(), Some("direct"));
        assert_eq!(direct.ip, Some(vec!["223.5.5.5".to_string()]));
    }

    #[test]
    fn test_direct_domains_without_mainland_bypass() {
        let config = with_dns(&GeneratorSettings {
            user_routing_direct: "intranet.example".to_string(),
            ..GeneratorSettings::default()
        });
        let servers = config.dns.unwrap().servers.unwrap();
        assert!(servers[2].get("expectIPs").is_none());
        assert_eq!(servers[2]["domains"], json!(["intranet.example"]));
    }

    #[test]
    fn test_doh_remote_gets_no_port_rule() {
        let config = with_dns(&GeneratorSettings {
            remote_dns: vec!["https://dns.google/dns-query".to_string()],
            ..GeneratorSettings::default()
        });
        assert!(config.routing.rules.is_empty());
    }

    #[test]
    fn test_local_dns() {
        let config = with_dns(&GeneratorSettings {
            local_dns_enabled: true,
            local_dns_port: 5353,
            ..GeneratorSettings::default()
        });
        let inbound = config.inbounds.last().unwrap();
        assert_eq!(inbound.tag, "dns-in");
        assert_eq!(inbound.port, 5353);
        assert_eq!(inbound.protocol, "dokodemo-door");
        assert_eq!(
            inbound.settings,
            Some(json!({"address": "1.1.1.1", "port": 53, "network": "tcp,udp"}))
        );
        assert_eq!(
            config.outbounds.last().unwrap(),
            &json!({"protocol": "dns", "tag": "dns-out"})
        );
        let rules = &config.routing.rules;
        assert_eq!(rules[0].inbound_tag, Some(vec!["dns-in".to_string()]));
        assert_eq!(rules[0].outbound_tag.as_deref(), Some("dns-out"));
        assert_eq!(rules[1].outbound_tag.as_deref(), Some("proxy"));
        assert_eq!(rules[1].port.as_deref(), Some("53"));
    }
}
