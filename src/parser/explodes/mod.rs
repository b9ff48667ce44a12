pub mod common;
pub mod socks;
pub mod ss;
pub mod trojan;
pub mod vless;
pub mod vmess;
