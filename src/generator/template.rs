use super::GenError;
use crate::models::FullConfig;

/// Bumped whenever `templates/v2ray_base.json` changes shape.
pub const BASE_TEMPLATE_VERSION: u32 = 1;

pub const BASE_TEMPLATE: &str = include_str!("templates/v2ray_base.json");

/// Parse a fresh copy of the embedded base document.
pub fn load_base_template() -> Result<FullConfig, GenError> {
    serde_json::from_str(BASE_TEMPLATE).map_err(GenError::Template)
}
