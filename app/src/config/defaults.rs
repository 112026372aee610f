//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

use qr_composer::DEFAULT_LOGO_URL;

type DefTuple = (&'static str, &'static str, bool, &'static str);

const DEFS: &[DefTuple] = &[
    ("SERVER_PORT", "3000", false, "HTTP listen port"),
    (
        "PUBLIC_BASE_URL",
        "",
        false,
        "Base URL used in upload links (derived from the Host header when empty)",
    ),
    ("UPLOADS_DIR", "public/uploads", false, "Directory for uploaded files"),
    ("MAX_UPLOAD_BYTES", "10485760", false, "Maximum upload size in bytes"),
    ("DEFAULT_LOGO_URL", DEFAULT_LOGO_URL, false, "Logo used when a request names none"),
    ("COMPOSITING_ENABLED", "true", false, "Draw the logo badge on generated codes"),
    ("LOGO_FETCH_TIMEOUT_SECS", "5", false, "Upper bound on a single logo load"),
    ("BLOB_READ_WRITE_TOKEN", "", true, "Token for signed blob uploads"),
    (
        "BLOB_API_URL",
        "https://api.vercel.com/v2/blobs",
        false,
        "Endpoint that mints signed upload URLs",
    ),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub secret: bool,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, secret, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    secret,
                    description,
                },
            )
        })
        .collect()
});

/// Legacy environment names accepted for a key, checked after the key itself.
pub fn aliases(key: &str) -> &'static [&'static str] {
    match key {
        "SERVER_PORT" => &["PORT"],
        "BLOB_READ_WRITE_TOKEN" => &["VERCEL_BLOB_READ_WRITE_TOKEN"],
        _ => &[],
    }
}

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}
