//! Generator preferences
//!
//! Settings can come from a TOML/YAML file or from a host-provided
//! key-value store.

pub mod generator_settings;
pub mod store;

pub use generator_settings::{ERoutingMode, GeneratorSettings, SettingsError};
pub use store::{KeyValueStore, MemoryStore};
