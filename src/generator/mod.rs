//! Engine configuration generator
//!
//! Turns a parsed [`ServerConfig`] and the user's [`GeneratorSettings`] into
//! the JSON document the v2ray/xray engine starts from. The embedded base
//! template is parsed fresh on every call and mutated in a fixed order of
//! passes, so identical inputs always produce identical output.

pub mod dns;
pub mod fakedns;
pub mod inbound;
pub mod routing;
pub mod template;

use log::debug;
use serde_json::{json, Value};
use thiserror::Error;

use crate::models::{EConfigType, ServerConfig};
use crate::settings::GeneratorSettings;

pub use template::{load_base_template, BASE_TEMPLATE_VERSION};

pub const TAG_AGENT: &str = "proxy";
pub const TAG_DIRECT: &str = "direct";
pub const TAG_BLOCKED: &str = "block";

#[derive(Error, Debug)]
pub enum GenError {
    #[error("Custom configs carry their own engine document")]
    CustomConfig,

    #[error("Server has no outbound")]
    MissingOutbound,

    #[error("Base template error: {0}")]
    Template(#[source] serde_json::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl GenError {
    /// `{"error": "..."}` payload for hosts that expect a JSON document back
    /// even when generation fails.
    pub fn diagnostic_json(&self) -> String {
        json!({ "error": self.to_string() }).to_string()
    }
}

/// Build the full engine configuration for `server`.
pub fn generate(server: &ServerConfig, settings: &GeneratorSettings) -> Result<String, GenError> {
    if server.config_type == EConfigType::Custom {
        return Err(GenError::CustomConfig);
    }
    let outbound = server
        .outbound_bean
        .as_ref()
        .ok_or(GenError::MissingOutbound)?;

    let mut config = load_base_template()?;
    config.log.loglevel = settings.log_level.clone();

    inbound::apply_inbounds(&mut config, settings);

    let mut proxy = serde_json::to_value(outbound).map_err(GenError::Serialize)?;
    if let Value::Object(object) = &mut proxy {
        object.insert("tag".to_string(), Value::String(TAG_AGENT.to_string()));
    }
    config.outbounds.insert(0, proxy);

    dns::apply_dns(&mut config, settings)?;
    routing::apply_routing(&mut config, settings);
    fakedns::apply_fakedns(&mut config, settings);

    if !settings.speed_enabled {
        config.stats = None;
        config.policy = None;
    }

    debug!(
        "Generated {} config for '{}' with {} outbounds (template v{})",
        server.config_type,
        server.remarks,
        config.outbounds.len(),
        BASE_TEMPLATE_VERSION
    );
    serde_json::to_string_pretty(&config).map_err(GenError::Serialize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    const VLESS: &str = "vless://af180fee-d7d8-4d34-de6e-b92dbc682005@146.235.231.101:35104?encryption=none&security=none&type=tcp&headerType=none#lv";

    #[test]
    fn test_custom_config_is_rejected() {
        let server = ServerConfig::create(EConfigType::Custom);
        let err = generate(&server, &GeneratorSettings::default()).unwrap_err();
        assert!(matches!(err, GenError::CustomConfig));
        let payload: Value = serde_json::from_str(&err.diagnostic_json()).unwrap();
        assert!(payload["error"].as_str().unwrap().contains("Custom"));
    }

    #[test]
    fn test_missing_outbound() {
        let mut server = parse(VLESS).unwrap();
        server.outbound_bean = None;
        assert!(matches!(
            generate(&server, &GeneratorSettings::default()),
            Err(GenError::MissingOutbound)
        ));
    }

    #[test]
    fn test_proxy_outbound_first_and_tagged() {
        let server = parse(VLESS).unwrap();
        let json = generate(&server, &GeneratorSettings::default()).unwrap();
        let doc: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(doc["outbounds"][0]["tag"], "proxy");
        assert_eq!(doc["outbounds"][0]["protocol"], "vless");
        assert_eq!(
            doc["outbounds"][0]["settings"]["vnext"][0]["address"],
            "146.235.231.101"
        );
        assert_eq!(doc["outbounds"][1]["tag"], "direct");
        assert!(json.starts_with("{\n  \""));
    }

    #[test]
    fn test_speed_disabled_drops_stats_and_policy() {
        let server = parse(VLESS).unwrap();
        let settings = GeneratorSettings {
            speed_enabled: false,
            ..GeneratorSettings::default()
        };
        let doc: Value = serde_json::from_str(&generate(&server, &settings).unwrap()).unwrap();
        assert!(doc.get("stats").is_none());
        assert!(doc.get("policy").is_none());
        assert!(doc.get("fakedns").is_none());
    }
}
