//! Parsed server model
//!
//! A [`ServerConfig`] is what a share link turns into: display metadata plus
//! the engine outbound that reaches the server.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::outbound::{
    OutboundBean, OutboundSettings, ServerObjectBean, StreamSettings, VnextServerBean,
    VnextUserBean,
};

pub const CONFIG_VERSION: u32 = 3;

/// Kind of server a config describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EConfigType {
    Vmess = 1,
    Custom = 2,
    Shadowsocks = 3,
    Socks = 4,
    Vless = 5,
    Trojan = 6,
    Wireguard = 7,
}

impl EConfigType {
    /// Share-link scheme, including the `://` separator.
    pub fn scheme(self) -> &'static str {
        match self {
            EConfigType::Vmess => "vmess://",
            EConfigType::Custom => "",
            EConfigType::Shadowsocks => "ss://",
            EConfigType::Socks => "socks://",
            EConfigType::Vless => "vless://",
            EConfigType::Trojan => "trojan://",
            EConfigType::Wireguard => "wireguard://",
        }
    }

    /// Outbound protocol tag understood by the engine.
    pub fn protocol(self) -> Option<&'static str> {
        match self {
            EConfigType::Vmess => Some("vmess"),
            EConfigType::Shadowsocks => Some("shadowsocks"),
            EConfigType::Socks => Some("socks"),
            EConfigType::Vless => Some("vless"),
            EConfigType::Trojan => Some("trojan"),
            EConfigType::Custom | EConfigType::Wireguard => None,
        }
    }

    /// Match a link against the scheme table, case-sensitively.
    pub fn from_link(link: &str) -> Option<EConfigType> {
        [
            EConfigType::Vmess,
            EConfigType::Vless,
            EConfigType::Shadowsocks,
            EConfigType::Socks,
            EConfigType::Trojan,
            EConfigType::Wireguard,
        ]
        .into_iter()
        .find(|kind| link.starts_with(kind.scheme()))
    }
}

impl fmt::Display for EConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EConfigType::Vmess => "VMESS",
            EConfigType::Custom => "CUSTOM",
            EConfigType::Shadowsocks => "SHADOWSOCKS",
            EConfigType::Socks => "SOCKS",
            EConfigType::Vless => "VLESS",
            EConfigType::Trojan => "TROJAN",
            EConfigType::Wireguard => "WIREGUARD",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub config_version: u32,
    pub config_type: EConfigType,
    pub subscription_id: String,
    /// Creation time in epoch milliseconds.
    pub added_time: i64,
    pub remarks: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbound_bean: Option<OutboundBean>,
}

impl ServerConfig {
    /// Build an empty config of the given kind.
    ///
    /// vmess and vless get one `vnext` server holding one default user;
    /// shadowsocks, socks and trojan get one `servers` entry. Custom and
    /// WireGuard configs carry no outbound.
    pub fn create(config_type: EConfigType) -> Self {
        let settings = match config_type {
            EConfigType::Vmess | EConfigType::Vless => Some(OutboundSettings::Vnext(vec![
                VnextServerBean {
                    users: vec![VnextUserBean::default()],
                    ..Default::default()
                },
            ])),
            EConfigType::Shadowsocks | EConfigType::Socks | EConfigType::Trojan => Some(
                OutboundSettings::Servers(vec![ServerObjectBean::default()]),
            ),
            EConfigType::Custom | EConfigType::Wireguard => None,
        };

        let outbound_bean = match (config_type.protocol(), settings) {
            (Some(protocol), Some(settings)) => Some(OutboundBean {
                protocol: protocol.to_string(),
                settings,
                stream_settings: StreamSettings::default(),
                tag: None,
            }),
            _ => None,
        };

        ServerConfig {
            config_version: CONFIG_VERSION,
            config_type,
            subscription_id: String::new(),
            added_time: now_millis(),
            remarks: String::new(),
            outbound_bean,
        }
    }

    /// `address:port` of the first server, used as the engine's domain hint.
    pub fn domain(&self) -> Option<String> {
        let settings = &self.outbound_bean.as_ref()?.settings;
        Some(format!("{}:{}", settings.address()?, settings.port()?))
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
