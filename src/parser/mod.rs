pub mod explodes;
pub mod types;

pub use explodes::common::{parse, parse_with};
pub use types::{ParseError, ParseOptions};
