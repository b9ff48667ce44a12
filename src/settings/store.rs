//! Key-value preference storage
//!
//! Hosts persist [`GeneratorSettings`] in whatever storage they already
//! have (shared preferences, local storage, a file). Values are always
//! strings; malformed values fall back to the defaults when loading.

use std::collections::HashMap;
use std::str::FromStr;

use log::warn;

use super::generator_settings::{ERoutingMode, GeneratorSettings};
use crate::utils::string::split_csv;

pub const PREF_LOG_LEVEL: &str = "pref_log_level";
pub const PREF_SOCKS_PORT: &str = "pref_socks_port";
pub const PREF_HTTP_PORT: &str = "pref_http_port";
pub const PREF_LOCAL_DNS_PORT: &str = "pref_local_dns_port";
pub const PREF_PROXY_SHARING: &str = "pref_proxy_sharing_enabled";
pub const PREF_FAKE_DNS_ENABLED: &str = "pref_fake_dns_enabled";
pub const PREF_SNIFFING_ENABLED: &str = "pref_sniffing_enabled";
pub const PREF_LOCAL_DNS_ENABLED: &str = "pref_local_dns_enabled";
pub const PREF_SPEED_ENABLED: &str = "pref_speed_enabled";
pub const PREF_ROUTING_DOMAIN_STRATEGY: &str = "pref_routing_domain_strategy";
pub const PREF_ROUTING_MODE: &str = "pref_routing_mode";
pub const PREF_ROUTING_AGENT: &str = "pref_routing_agent";
pub const PREF_ROUTING_DIRECT: &str = "pref_routing_direct";
pub const PREF_ROUTING_BLOCKED: &str = "pref_routing_blocked";
pub const PREF_REMOTE_DNS: &str = "pref_remote_dns";
pub const PREF_DOMESTIC_DNS: &str = "pref_domestic_dns";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-process store, mostly useful for tests and the CLI
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

fn load_parsed<S, T>(store: &S, key: &str, default: T) -> T
where
    S: KeyValueStore + ?Sized,
    T: FromStr,
{
    match store.get(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring malformed value '{}' for {}", raw, key);
            default
        }),
        None => default,
    }
}

fn load_string<S: KeyValueStore + ?Sized>(store: &S, key: &str, default: String) -> String {
    store.get(key).unwrap_or(default)
}

fn load_list<S: KeyValueStore + ?Sized>(store: &S, key: &str, default: Vec<String>) -> Vec<String> {
    match store.get(key).map(|raw| split_csv(&raw)) {
        Some(list) if !list.is_empty() => list,
        _ => default,
    }
}

impl GeneratorSettings {
    /// Read every preference from `store`, keeping defaults for missing keys.
    pub fn load_from<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let defaults = GeneratorSettings::default();
        let routing_mode = match store.get(PREF_ROUTING_MODE) {
            Some(raw) => ERoutingMode::parse(&raw).unwrap_or_else(|| {
                warn!("Ignoring unknown routing mode '{}'", raw);
                defaults.routing_mode
            }),
            None => defaults.routing_mode,
        };

        GeneratorSettings {
            log_level: load_string(store, PREF_LOG_LEVEL, defaults.log_level),
            socks_port: load_parsed(store, PREF_SOCKS_PORT, defaults.socks_port),
            http_port: load_parsed(store, PREF_HTTP_PORT, defaults.http_port),
            local_dns_port: load_parsed(store, PREF_LOCAL_DNS_PORT, defaults.local_dns_port),
            proxy_sharing: load_parsed(store, PREF_PROXY_SHARING, defaults.proxy_sharing),
            fake_dns_enabled: load_parsed(store, PREF_FAKE_DNS_ENABLED, defaults.fake_dns_enabled),
            sniffing_enabled: load_parsed(store, PREF_SNIFFING_ENABLED, defaults.sniffing_enabled),
            local_dns_enabled: load_parsed(
                store,
                PREF_LOCAL_DNS_ENABLED,
                defaults.local_dns_enabled,
            ),
            speed_enabled: load_parsed(store, PREF_SPEED_ENABLED, defaults.speed_enabled),
            routing_domain_strategy: load_string(
                store,
                PREF_ROUTING_DOMAIN_STRATEGY,
                defaults.routing_domain_strategy,
            ),
            routing_mode,
            user_routing_agent: load_string(store, PREF_ROUTING_AGENT, defaults.user_routing_agent),
            user_routing_direct: load_string(
                store,
                PREF_ROUTING_DIRECT,
                defaults.user_routing_direct,
            ),
            user_routing_blocked: load_string(
                store,
                PREF_ROUTING_BLOCKED,
                defaults.user_routing_blocked,
            ),
            remote_dns: load_list(store, PREF_REMOTE_DNS, defaults.remote_dns),
            domestic_dns: load_list(store, PREF_DOMESTIC_DNS, defaults.domestic_dns),
        }
    }

    /// Write every preference to `store`.
    pub fn save_to<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        store.set(PREF_LOG_LEVEL, &self.log_level);
        store.set(PREF_SOCKS_PORT, &self.socks_port.to_string());
        store.set(PREF_HTTP_PORT, &self.http_port.to_string());
        store.set(PREF_LOCAL_DNS_PORT, &self.local_dns_port.to_string());
        store.set(PREF_PROXY_SHARING, &self.proxy_sharing.to_string());
        store.set(PREF_FAKE_DNS_ENABLED, &self.fake_dns_enabled.to_string());
        store.set(PREF_SNIFFING_ENABLED, &self.sniffing_enabled.to_string());
        store.set(PREF_LOCAL_DNS_ENABLED, &self.local_dns_enabled.to_string());
        store.set(PREF_SPEED_ENABLED, &self.speed_enabled.to_string());
        store.set(PREF_ROUTING_DOMAIN_STRATEGY, &self.routing_domain_strategy);
        store.set(PREF_ROUTING_MODE, &self.routing_mode.index().to_string());
        store.set(PREF_ROUTING_AGENT, &self.user_routing_agent);
        store.set(PREF_ROUTING_DIRECT, &self.user_routing_direct);
        store.set(PREF_ROUTING_BLOCKED, &self.user_routing_blocked);
        store.set(PREF_REMOTE_DNS, &self.remote_dns.join(","));
        store.set(PREF_DOMESTIC_DNS, &self.domestic_dns.join(","));
    }
}
