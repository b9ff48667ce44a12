use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PORT_SOCKS: u16 = 10808;
pub const PORT_HTTP: u16 = 10809;
pub const PORT_LOCAL_DNS: u16 = 10853;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Unsupported settings format: {0}")]
    UnsupportedFormat(String),
}

/// Preset routing behaviour applied after the user rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ERoutingMode {
    #[default]
    GlobalProxy,
    BypassLan,
    BypassMainland,
    BypassLanMainland,
    GlobalDirect,
}

impl ERoutingMode {
    pub const ALL: [ERoutingMode; 5] = [
        ERoutingMode::GlobalProxy,
        ERoutingMode::BypassLan,
        ERoutingMode::BypassMainland,
        ERoutingMode::BypassLanMainland,
        ERoutingMode::GlobalDirect,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ERoutingMode::GlobalProxy => "GLOBAL_PROXY",
            ERoutingMode::BypassLan => "BYPASS_LAN",
            ERoutingMode::BypassMainland => "BYPASS_MAINLAND",
            ERoutingMode::BypassLanMainland => "BYPASS_LAN_MAINLAND",
            ERoutingMode::GlobalDirect => "GLOBAL_DIRECT",
        }
    }

    /// Position in the preference list, as persisted by the store
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Accepts either the stored index ("2") or the mode name.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Ok(index) = value.parse::<usize>() {
            return Self::from_index(index);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(value))
    }

    pub fn bypasses_mainland(self) -> bool {
        matches!(
            self,
            ERoutingMode::BypassMainland | ERoutingMode::BypassLanMainland
        )
    }

    pub fn bypasses_lan(self) -> bool {
        matches!(
            self,
            ERoutingMode::BypassLan | ERoutingMode::BypassLanMainland
        )
    }
}

impl fmt::Display for ERoutingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warning".to_string()
}

fn default_socks_port() -> u16 {
    PORT_SOCKS
}

fn default_http_port() -> u16 {
    PORT_HTTP
}

fn default_local_dns_port() -> u16 {
    PORT_LOCAL_DNS
}

fn default_domain_strategy() -> String {
    "IPIfNonMatch".to_string()
}

fn default_remote_dns() -> Vec<String> {
    vec!["1.1.1.1".to_string(), "8.8.8.8".to_string()]
}

fn default_domestic_dns() -> Vec<String> {
    vec!["223.5.5.5".to_string(), "119.29.29.29".to_string()]
}

/// User preferences consumed by the config generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_socks_port")]
    pub socks_port: u16,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default = "default_local_dns_port")]
    pub local_dns_port: u16,
    pub proxy_sharing: bool,
    pub fake_dns_enabled: bool,
    #[serde(default = "default_true")]
    pub sniffing_enabled: bool,
    pub local_dns_enabled: bool,
    #[serde(default = "default_true")]
    pub speed_enabled: bool,
    #[serde(default = "default_domain_strategy")]
    pub routing_domain_strategy: String,
    pub routing_mode: ERoutingMode,
    /// Comma-separated domains/IPs routed through the proxy
    pub user_routing_agent: String,
    pub user_routing_direct: String,
    pub user_routing_blocked: String,
    #[serde(default = "default_remote_dns")]
    pub remote_dns: Vec<String>,
    #[serde(default = "default_domestic_dns")]
    pub domestic_dns: Vec<String>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        GeneratorSettings {
            log_level: default_log_level(),
            socks_port: default_socks_port(),
            http_port: default_http_port(),
            local_dns_port: default_local_dns_port(),
            proxy_sharing: false,
            fake_dns_enabled: false,
            sniffing_enabled: true,
            local_dns_enabled: false,
            speed_enabled: true,
            routing_domain_strategy: default_domain_strategy(),
            routing_mode: ERoutingMode::default(),
            user_routing_agent: String::new(),
            user_routing_direct: String::new(),
            user_routing_blocked: String::new(),
            remote_dns: default_remote_dns(),
            domestic_dns: default_domestic_dns(),
        }
    }
}

impl GeneratorSettings {
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, SettingsError> {
        // An empty YAML document deserializes as unit, not as a map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load settings from a `.toml`, `.yaml` or `.yml` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "toml" => Self::from_toml_str(&content),
            "yaml" | "yml" => Self::from_yaml_str(&content),
            _ => Err(SettingsError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// First remote DNS server, the one forwarded to by the local DNS inbound
    pub fn primary_remote_dns(&self) -> &str {
        self.remote_dns.first().map_or("1.1.1.1", String::as_str)
    }

    pub fn primary_domestic_dns(&self) -> &str {
        self.domestic_dns.first().map_or("223.5.5.5", String::as_str)
    }
}
