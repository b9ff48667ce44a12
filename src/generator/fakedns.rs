use serde_json::{Map, Value};

use crate::models::{Fakedns, FullConfig};
use crate::settings::GeneratorSettings;

const FREEDOM: &str = "freedom";

/// Install the fake DNS pool and make direct outbounds resolve locally.
pub fn apply_fakedns(config: &mut FullConfig, settings: &GeneratorSettings) {
    if !settings.fake_dns_enabled {
        return;
    }
    config.fakedns = Some(vec![Fakedns::default()]);

    for outbound in config.outbounds.iter_mut() {
        let Some(object) = outbound.as_object_mut() else {
            continue;
        };
        if object.get("protocol").and_then(Value::as_str) != Some(FREEDOM) {
            continue;
        }
        let outbound_settings = object
            .entry("settings")
            .or_insert_with(|| Value::Object(Map::new()));
        if !outbound_settings.is_object() {
            *outbound_settings = Value::Object(Map::new());
        }
        if let Some(outbound_settings) = outbound_settings.as_object_mut() {
            outbound_settings.insert(
                "domainStrategy".to_string(),
                Value::String("UseIP".to_string()),
            );
        }
    }
}
