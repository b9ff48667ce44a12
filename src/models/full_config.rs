//! Complete engine configuration document
//!
//! Deserialized from the embedded base template, mutated by the generator
//! passes and serialized once. Optional sections are omitted from the output
//! rather than written as `null`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const FAKEDNS_IP_POOL: &str = "198.18.0.0/15";
pub const FAKEDNS_POOL_SIZE: u32 = 65535;

fn default_loglevel() -> String {
    "warning".to_string()
}

fn default_listen() -> String {
    "127.0.0.1".to_string()
}

fn default_rule_type() -> String {
    "field".to_string()
}

fn default_domain_strategy() -> String {
    "IPIfNonMatch".to_string()
}

fn default_dns_port() -> u16 {
    53
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullConfig {
    pub log: Log,
    pub inbounds: Vec<Inbound>,
    pub outbounds: Vec<Value>,
    pub routing: Routing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<Dns>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fakedns: Option<Vec<Fakedns>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Log {
    #[serde(default = "default_loglevel")]
    pub loglevel: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sniffing {
    pub enabled: bool,
    #[serde(default)]
    pub dest_override: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inbound {
    pub tag: String,
    pub port: u16,
    #[serde(default = "default_listen")]
    pub listen: String,
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sniffing: Option<Sniffing>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingRule {
    #[serde(rename = "type", default = "default_rule_type")]
    pub rule_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbound_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inbound_tag: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
}

impl RoutingRule {
    /// Empty `field` rule sending matches to `outbound_tag`.
    pub fn to_outbound(outbound_tag: &str) -> Self {
        RoutingRule {
            rule_type: default_rule_type(),
            outbound_tag: Some(outbound_tag.to_string()),
            inbound_tag: None,
            ip: None,
            domain: None,
            port: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routing {
    #[serde(default = "default_domain_strategy")]
    pub domain_strategy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_matcher: Option<String>,
    #[serde(default)]
    pub rules: Vec<RoutingRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsServerObject {
    pub address: String,
    #[serde(default = "default_dns_port")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domains: Option<Vec<String>>,
    #[serde(rename = "expectIPs", default, skip_serializing_if = "Option::is_none")]
    pub expect_ips: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dns {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<BTreeMap<String, String>>,
    /// Plain server addresses (strings) or [`DnsServerObject`]s.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fakedns {
    pub ip_pool: String,
    pub pool_size: u32,
}

impl Default for Fakedns {
    fn default() -> Self {
        Fakedns {
            ip_pool: FAKEDNS_IP_POOL.to_string(),
            pool_size: FAKEDNS_POOL_SIZE,
        }
    }
}
