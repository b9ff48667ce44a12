pub mod base64;
pub mod matcher;
pub mod string;
pub mod url;

// Re-export common utilities
pub use self::base64::{base64_decode, base64_encode};
pub use self::url::{parse_query, url_decode, QueryMap};
