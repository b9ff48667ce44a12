pub mod engine;
pub mod generator;
pub mod models;
pub mod parser;
pub mod settings;
pub mod utils;

// Re-export the main entry points for easier access
pub use engine::{launch, EngineError, EngineHooks, ProxyEngine};
pub use generator::{generate, GenError};
pub use models::{EConfigType, ServerConfig};
pub use parser::{parse, parse_with, ParseError, ParseOptions};

// Re-export configuration types
pub use settings::{ERoutingMode, GeneratorSettings, KeyValueStore, MemoryStore};
