use thiserror::Error;

use crate::models::EConfigType;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("empty link")]
    Empty,

    #[error("unknown link scheme: {0}")]
    UnknownScheme(String),

    #[error("{0} links are not supported")]
    Unsupported(EConfigType),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("malformed link: {0}")]
    InvalidFormat(String),

    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Caller preferences applied while parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Written into `tlsSettings.allowInsecure` of TLS-enabled links.
    pub allow_insecure: bool,
}
