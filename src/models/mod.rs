//! Core data models for the application
//!
//! This module contains the data structures shared by the link parser and the
//! config generator, separated from the logic that operates on them.
//!
//! # Usage
//!
//! ```rust
//! use v2rayconf::models::{EConfigType, ServerConfig};
//!
//! let mut config = ServerConfig::create(EConfigType::Shadowsocks);
//! if let Some(server) = config
//!     .outbound_bean
//!     .as_mut()
//!     .and_then(|outbound| outbound.settings.servers_mut())
//! {
//!     server.address = "example.com".to_string();
//!     server.port = 8388;
//! }
//! assert_eq!(config.domain().as_deref(), Some("example.com:8388"));
//! ```

pub mod full_config;
pub mod outbound;
pub mod server_config;

pub use full_config::*;
pub use outbound::*;
pub use server_config::*;
