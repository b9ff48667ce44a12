//! String utility functions for text processing

use std::str::FromStr;

/// Parse the leading integer of a string, falling back to the type's default
///
/// Leading whitespace and an optional sign are accepted and everything after
/// the digits is ignored, so `"443/"` yields `443`. Input with no leading
/// digits, or a value that does not fit `T`, yields `T::default()`.
///
/// # Arguments
///
/// * `s` - The string to parse
pub fn to_int<T: FromStr + Default>(s: &str) -> T {
    let s = s.trim_start();
    let end = s
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+')))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    s[..end].parse().unwrap_or_default()
}

/// Split a comma-separated list, trimming entries and dropping empty ones
pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split `host:port` at the last colon
///
/// Returns `None` when there is no colon at all. The port is parsed
/// leniently, see [`to_int`].
pub fn split_host_port(s: &str) -> Option<(String, u16)> {
    let (host, port) = s.rsplit_once(':')?;
    Some((host.to_string(), to_int(port)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_int() {
        assert_eq!(to_int::<i32>("42"), 42);
        assert_eq!(to_int::<i32>("  -7"), -7);
        assert_eq!(to_int::<u16>("443/"), 443);
        assert_eq!(to_int::<u16>("abc"), 0);
        assert_eq!(to_int::<u16>("70000"), 0);
        assert_eq!(to_int::<i32>(""), 0);
    }

    #[test]
    fn test_split_csv() {
        assert_eq!(split_csv(" h2 , http/1.1,,"), vec!["h2", "http/1.1"]);
        assert!(split_csv("").is_empty());
    }

    #[test]
    fn test_split_host_port() {
        assert_eq!(
            split_host_port("example.com:8388"),
            Some(("example.com".to_string(), 8388))
        );
        assert_eq!(
            split_host_port("[::1]:443"),
            Some(("[::1]".to_string(), 443))
        );
        assert_eq!(split_host_port("example.com"), None);
    }
}
