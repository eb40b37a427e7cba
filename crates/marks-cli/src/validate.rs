//! URL validation

use url::Url;

/// Check that a string is a well-formed http(s) URL with a host
pub fn is_valid_bookmark_url(input: &str) -> bool {
    match Url::parse(input) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(is_valid_bookmark_url("https://example.com"));
        assert!(is_valid_bookmark_url("http://example.com/path"));
        assert!(is_valid_bookmark_url("https://example.com:8080/path?query=value"));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(!is_valid_bookmark_url("not_a_url"));
        assert!(!is_valid_bookmark_url("example.com"));
        assert!(!is_valid_bookmark_url(""));
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(!is_valid_bookmark_url("ftp://example.com"));
        assert!(!is_valid_bookmark_url("file:///etc/passwd"));
    }
}
