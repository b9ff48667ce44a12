//! URL encoding/decoding utilities

use linked_hash_map::LinkedHashMap;
use url::form_urlencoded;

/// Query parameters of a share link, in the order they appear.
pub type QueryMap = LinkedHashMap<String, String>;

/// Decodes a URL-encoded string
///
/// `+` is read as a space and malformed escapes are kept verbatim, so
/// decoding never fails.
///
/// # Examples
/// ```
/// use v2rayconf::utils::url::url_decode;
///
/// assert_eq!(url_decode("Hello%20World%21"), "Hello World!");
/// assert_eq!(url_decode("a+b%zz"), "a b%zz");
/// ```
pub fn url_decode(input: &str) -> String {
    let plus_as_space = input.replace('+', " ");
    let decoded = urlencoding::decode_binary(plus_as_space.as_bytes());
    String::from_utf8_lossy(&decoded).into_owned()
}

/// Parses a `k1=v1&k2=v2` query string into a flat map
///
/// Values are URL-decoded. Pairs with an empty value are dropped and a later
/// duplicate key overwrites the earlier value.
pub fn parse_query(query: &str) -> QueryMap {
    let mut params = QueryMap::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if value.is_empty() {
            continue;
        }
        params.insert(key.into_owned(), value.into_owned());
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_decode_utf8() {
        assert_eq!(url_decode("%E6%B5%8B%E8%AF%95"), "测试");
    }

    #[test]
    fn test_parse_query_later_key_wins() {
        let params = parse_query("type=ws&path=%2Fray&type=grpc&empty=");
        assert_eq!(params.get("type").map(String::as_str), Some("grpc"));
        assert_eq!(params.get("path").map(String::as_str), Some("/ray"));
        assert!(params.get("empty").is_none());
    }

    #[test]
    fn test_parse_query_keeps_insertion_order() {
        let params = parse_query("security=tls&sni=a.com&alpn=h2%2Chttp%2F1.1");
        let keys: Vec<&str> = params.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["security", "sni", "alpn"]);
        assert_eq!(params["alpn"], "h2,http/1.1");
    }
}
