//! Outbound definitions
//!
//! These mirror the engine's outbound JSON schema so that an [`OutboundBean`]
//! serializes directly into the `outbounds` array of a generated config.

use serde::{Deserialize, Serialize};

use crate::utils::string::split_csv;

pub const DEFAULT_SECURITY: &str = "auto";
pub const DEFAULT_ENCRYPTION: &str = "none";
pub const DEFAULT_LEVEL: u32 = 8;
pub const TLS: &str = "tls";

fn default_security() -> String {
    DEFAULT_SECURITY.to_string()
}

fn default_encryption() -> String {
    DEFAULT_ENCRYPTION.to_string()
}

fn default_level() -> u32 {
    DEFAULT_LEVEL
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundBean {
    pub protocol: String,
    pub settings: OutboundSettings,
    #[serde(default)]
    pub stream_settings: StreamSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// Server list of an outbound.
///
/// vmess and vless describe their servers as `vnext`; shadowsocks, socks and
/// trojan use `servers`. Serializes to `{"vnext": [...]}` or
/// `{"servers": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutboundSettings {
    Vnext(Vec<VnextServerBean>),
    Servers(Vec<ServerObjectBean>),
}

impl OutboundSettings {
    pub fn vnext_mut(&mut self) -> Option<&mut VnextServerBean> {
        match self {
            OutboundSettings::Vnext(vnext) => vnext.first_mut(),
            OutboundSettings::Servers(_) => None,
        }
    }

    pub fn servers_mut(&mut self) -> Option<&mut ServerObjectBean> {
        match self {
            OutboundSettings::Servers(servers) => servers.first_mut(),
            OutboundSettings::Vnext(_) => None,
        }
    }

    /// Address of the first server, whichever list is populated
    pub fn address(&self) -> Option<&str> {
        match self {
            OutboundSettings::Vnext(vnext) => vnext.first().map(|s| s.address.as_str()),
            OutboundSettings::Servers(servers) => servers.first().map(|s| s.address.as_str()),
        }
    }

    /// Port of the first server, whichever list is populated
    pub fn port(&self) -> Option<u16> {
        match self {
            OutboundSettings::Vnext(vnext) => vnext.first().map(|s| s.port),
            OutboundSettings::Servers(servers) => servers.first().map(|s| s.port),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VnextServerBean {
    pub address: String,
    pub port: u16,
    pub users: Vec<VnextUserBean>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VnextUserBean {
    pub id: String,
    #[serde(default)]
    pub alter_id: u32,
    #[serde(default = "default_security")]
    pub security: String,
    #[serde(default = "default_encryption")]
    pub encryption: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub flow: String,
    #[serde(default = "default_level")]
    pub level: u32,
}

impl Default for VnextUserBean {
    fn default() -> Self {
        VnextUserBean {
            id: String::new(),
            alter_id: 0,
            security: default_security(),
            encryption: default_encryption(),
            flow: String::new(),
            level: DEFAULT_LEVEL,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocksUserBean {
    pub user: String,
    pub pass: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerObjectBean {
    pub address: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub method: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<SocksUserBean>>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub flow: String,
    #[serde(default = "default_level")]
    pub level: u32,
}

impl Default for ServerObjectBean {
    fn default() -> Self {
        ServerObjectBean {
            address: String::new(),
            port: 0,
            method: String::new(),
            password: String::new(),
            users: None,
            flow: String::new(),
            level: DEFAULT_LEVEL,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TlsSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_insecure: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpn: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderType {
    #[serde(rename = "type")]
    pub header_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostHeaders {
    #[serde(rename = "Host")]
    pub host: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TcpRequest {
    pub headers: HostHeaders,
    pub path: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TcpHeader {
    #[serde(rename = "type")]
    pub header_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<TcpRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TcpSettings {
    pub header: TcpHeader,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KcpSettings {
    pub header: HeaderType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WsHeaders {
    #[serde(rename = "Host", default, skip_serializing_if = "String::is_empty")]
    pub host: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WsSettings {
    pub path: String,
    pub headers: WsHeaders,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpSettings {
    pub host: Vec<String>,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuicSettings {
    pub security: String,
    pub key: String,
    pub header: HeaderType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrpcSettings {
    pub service_name: String,
    pub multi_mode: bool,
}

/// Transport parameters carried by a share link, keyed the way vless query
/// strings name them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransportParams<'a> {
    pub header_type: Option<&'a str>,
    pub host: Option<&'a str>,
    pub path: Option<&'a str>,
    pub seed: Option<&'a str>,
    pub quic_security: Option<&'a str>,
    pub key: Option<&'a str>,
    pub mode: Option<&'a str>,
    pub service_name: Option<&'a str>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_settings: Option<TlsSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_settings: Option<TcpSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kcp_settings: Option<KcpSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ws_settings: Option<WsSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_settings: Option<HttpSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quic_settings: Option<QuicSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grpc_settings: Option<GrpcSettings>,
}

impl StreamSettings {
    /// Record the transport and fill its settings block.
    ///
    /// Returns the SNI candidate implied by the transport: the `host`
    /// parameter when present, otherwise an empty string.
    pub fn populate_transport_settings(
        &mut self,
        network: &str,
        params: &TransportParams<'_>,
    ) -> String {
        self.network = Some(network.to_string());
        let host = params.host.unwrap_or_default();
        let path = params.path.unwrap_or_default();

        match network {
            "tcp" => {
                if params.header_type == Some("http") {
                    let request = if host.is_empty() && path.is_empty() {
                        None
                    } else {
                        Some(TcpRequest {
                            headers: HostHeaders {
                                host: split_csv(host),
                            },
                            path: split_csv(path),
                        })
                    };
                    self.tcp_settings = Some(TcpSettings {
                        header: TcpHeader {
                            header_type: "http".to_string(),
                            request,
                        },
                    });
                }
            }
            "kcp" => {
                self.kcp_settings = Some(KcpSettings {
                    header: HeaderType {
                        header_type: params.header_type.unwrap_or("none").to_string(),
                    },
                    seed: params.seed.filter(|s| !s.is_empty()).map(str::to_string),
                });
            }
            "ws" => {
                self.ws_settings = Some(WsSettings {
                    path: params.path.unwrap_or("/").to_string(),
                    headers: WsHeaders {
                        host: host.to_string(),
                    },
                });
            }
            "h2" | "http" => {
                self.http_settings = Some(HttpSettings {
                    host: split_csv(host),
                    path: params.path.unwrap_or("/").to_string(),
                });
            }
            "quic" => {
                self.quic_settings = Some(QuicSettings {
                    security: params.quic_security.unwrap_or("none").to_string(),
                    key: params.key.unwrap_or_default().to_string(),
                    header: HeaderType {
                        header_type: params.header_type.unwrap_or("none").to_string(),
                    },
                });
            }
            "grpc" => {
                self.grpc_settings = Some(GrpcSettings {
                    service_name: params.service_name.unwrap_or_default().to_string(),
                    multi_mode: params.mode == Some("multi"),
                });
            }
            _ => {}
        }

        host.to_string()
    }

    /// Enable TLS when `security` is `"tls"`; any other value leaves both
    /// `security` and `tls_settings` untouched.
    pub fn populate_tls_settings(
        &mut self,
        security: &str,
        allow_insecure: bool,
        sni: &str,
        fingerprint: &str,
        alpn: &str,
    ) {
        if security != TLS {
            return;
        }

        self.security = Some(TLS.to_string());
        self.tls_settings = Some(TlsSettings {
            allow_insecure: Some(allow_insecure),
            server_name: (!sni.is_empty()).then(|| sni.to_string()),
            fingerprint: (!fingerprint.is_empty()).then(|| fingerprint.to_string()),
            alpn: (!alpn.is_empty()).then(|| split_csv(alpn)),
        });
    }
}
