//! Runtime application configuration loaded from the environment.

use std::path::PathBuf;
use std::time::Duration;

use qr_composer::ComposerConfig;

use super::defaults::{DEFAULT_SETTINGS, aliases};
use super::validation::validate_setting;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub public_base_url: String,
    pub uploads_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub default_logo_url: String,
    pub compositing_enabled: bool,
    pub logo_fetch_timeout: Duration,
    pub blob_token: String,
    pub blob_api_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    /// Load configuration from environment variables over the defaults.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Missing or empty values take the default; invalid values are logged
    /// and replaced by the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let g = |key: &str| -> String { resolve(&lookup, key) };

        Self {
            server_port: parse_or(&g("SERVER_PORT"), 3000),
            public_base_url: g("PUBLIC_BASE_URL").trim_end_matches('/').to_string(),
            uploads_dir: PathBuf::from(g("UPLOADS_DIR")),
            max_upload_bytes: parse_or(&g("MAX_UPLOAD_BYTES"), 10 * 1024 * 1024),
            default_logo_url: g("DEFAULT_LOGO_URL"),
            compositing_enabled: g("COMPOSITING_ENABLED") == "true",
            logo_fetch_timeout: Duration::from_secs(parse_or(&g("LOGO_FETCH_TIMEOUT_SECS"), 5)),
            blob_token: g("BLOB_READ_WRITE_TOKEN"),
            blob_api_url: g("BLOB_API_URL"),
        }
    }

    pub fn composer_config(&self) -> ComposerConfig {
        ComposerConfig {
            default_logo: self.default_logo_url.clone(),
            logo_timeout: self.logo_fetch_timeout,
        }
    }

    pub fn blob_enabled(&self) -> bool {
        !self.blob_token.is_empty()
    }
}

fn resolve(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> String {
    let default = DEFAULT_SETTINGS.get(key).map_or("", |d| d.default);

    let mut candidates = vec![key];
    candidates.extend_from_slice(aliases(key));
    let value = candidates
        .into_iter()
        .filter_map(|k| lookup(k))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty());

    match value {
        Some(v) => match validate_setting(key, &v) {
            Ok(()) => v,
            Err(e) => {
                tracing::warn!("Invalid value for {key}: {e}; using default");
                default.to_string()
            }
        },
        None => default.to_string(),
    }
}

fn parse_or<T: std::str::FromStr>(s: &str, default: T) -> T {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}
