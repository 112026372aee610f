//! Setting value validation.

use regex::Regex;
use std::sync::LazyLock;

static RE_HTTP_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/?#]+[^\s]*$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "SERVER_PORT" => validate_int_range(value, 1, 65535)?,
        "MAX_UPLOAD_BYTES" => validate_int_range(value, 1, 100 * 1024 * 1024)?,
        "LOGO_FETCH_TIMEOUT_SECS" => validate_int_range(value, 1, 60)?,
        "PUBLIC_BASE_URL" => {
            if !value.is_empty() && !RE_HTTP_URL.is_match(value) {
                return Err("must be an http(s) URL".into());
            }
        }
        "BLOB_API_URL" => {
            if !RE_HTTP_URL.is_match(value) {
                return Err("must be an http(s) URL".into());
            }
        }
        "UPLOADS_DIR" | "DEFAULT_LOGO_URL" => {
            if value.trim().is_empty() {
                return Err("must not be empty".into());
            }
        }
        // Boolean settings
        k if is_boolean_setting(k) => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn is_boolean_setting(key: &str) -> bool {
    matches!(key, "COMPOSITING_ENABLED")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_boolean() {
        assert!(validate_setting("COMPOSITING_ENABLED", "true").is_ok());
        assert!(validate_setting("COMPOSITING_ENABLED", "false").is_ok());
        assert!(validate_setting("COMPOSITING_ENABLED", "yes").is_err());
    }

    #[test]
    fn test_valid_port() {
        assert!(validate_setting("SERVER_PORT", "3000").is_ok());
        assert!(validate_setting("SERVER_PORT", "0").is_err());
        assert!(validate_setting("SERVER_PORT", "70000").is_err());
        assert!(validate_setting("SERVER_PORT", "http").is_err());
    }

    #[test]
    fn test_valid_urls() {
        assert!(validate_setting("PUBLIC_BASE_URL", "").is_ok()); // empty is ok
        assert!(validate_setting("PUBLIC_BASE_URL", "https://qr.example.com").is_ok());
        assert!(validate_setting("PUBLIC_BASE_URL", "http://localhost:3000/").is_ok());
        assert!(validate_setting("PUBLIC_BASE_URL", "ftp://example.com").is_err());
        assert!(validate_setting("PUBLIC_BASE_URL", "https://").is_err());
        assert!(validate_setting("BLOB_API_URL", "").is_err());
    }

    #[test]
    fn test_valid_timeout() {
        assert!(validate_setting("LOGO_FETCH_TIMEOUT_SECS", "1").is_ok());
        assert!(validate_setting("LOGO_FETCH_TIMEOUT_SECS", "60").is_ok());
        assert!(validate_setting("LOGO_FETCH_TIMEOUT_SECS", "0").is_err());
        assert!(validate_setting("LOGO_FETCH_TIMEOUT_SECS", "61").is_err());
    }

    #[test]
    fn test_unknown_key_is_accepted() {
        assert!(validate_setting("SOMETHING_ELSE", "anything").is_ok());
    }
}
