//! Boundary to the native proxy engine
//!
//! The engine itself (libv2ray / xray-core) lives outside this crate. Hosts
//! wire it in by implementing [`ProxyEngine`], and receive its platform
//! callbacks through an [`EngineHooks`] implementation they register on it.
//! Nothing here supervises the engine process; [`launch`] only hands it a
//! freshly generated configuration.

use log::{info, warn};
use thiserror::Error;

use crate::generator::{generate, GenError};
use crate::parser::{parse, ParseError};
use crate::settings::GeneratorSettings;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Generate error: {0}")]
    Generate(#[from] GenError),

    #[error("Engine error: {0}")]
    Engine(String),
}

/// Callbacks the engine invokes on the host platform.
///
/// Return codes follow the engine's convention: `0` for success.
pub trait EngineHooks: Send + Sync {
    /// Bring up the tunnel device with the given engine-side parameters.
    fn setup(&self, params: &str) -> i64;
    fn prepare(&self) -> i64;
    fn shutdown(&self) -> i64;
    /// Exclude a socket from the tunnel. Returns whether it was protected.
    fn protect(&self, fd: i64) -> bool;
    fn emit_status(&self, code: i64, message: &str) -> i64;
}

/// Handle to one running instance inside the engine
pub type PointHandle = i32;

pub trait ProxyEngine {
    fn set_hooks(&mut self, hooks: Box<dyn EngineHooks>);

    /// Allocate a new instance and return its handle.
    fn create_point(&mut self, async_dns: bool) -> PointHandle;

    /// Start an instance. An empty string means success, anything else is
    /// the engine's error message.
    fn start(
        &mut self,
        handle: PointHandle,
        prefer_ipv6: bool,
        domain: &str,
        config_json: &str,
    ) -> String;

    fn stop(&mut self, handle: PointHandle) -> String;

    /// Traffic counter for an outbound `tag` in `direction` ("uplink" or
    /// "downlink").
    fn query_stats(&self, handle: PointHandle, tag: &str, direction: &str) -> i64;

    /// Round-trip time to `url` in milliseconds, negative on failure.
    fn measure_delay(&self, handle: PointHandle, url: &str) -> i64;
}

/// A started engine instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launched {
    pub handle: PointHandle,
    /// `address:port` of the server the proxy outbound points at
    pub domain: String,
}

/// Parse `link`, generate its configuration and start it on `engine`.
pub fn launch<E: ProxyEngine + ?Sized>(
    engine: &mut E,
    link: &str,
    settings: &GeneratorSettings,
) -> Result<Launched, EngineError> {
    let server = parse(link)?;
    let config_json = generate(&server, settings)?;
    let domain = server.domain().unwrap_or_default();

    let handle = engine.create_point(false);
    info!("Starting '{}' ({}) on point {}", server.remarks, domain, handle);
    let result = engine.start(handle, false, &domain, &config_json);
    if !result.is_empty() {
        warn!("Engine refused point {}: {}", handle, result);
        return Err(EngineError::Engine(result));
    }

    Ok(Launched { handle, domain })
}

/// Stop a launched instance, surfacing the engine's error message if any.
pub fn halt<E: ProxyEngine + ?Sized>(engine: &mut E, launched: &Launched) -> Result<(), EngineError> {
    let result = engine.stop(launched.handle);
    if result.is_empty() {
        Ok(())
    } else {
        Err(EngineError::Engine(result))
    }
}
