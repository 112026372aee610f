//! Configuration management: defaults, validation, loading from the environment.

pub mod app_config;
pub mod defaults;
pub mod validation;

pub use app_config::AppConfig;

use defaults::DEFAULT_SETTINGS;

/// A setting as reported at startup, secrets masked.
#[derive(Debug, Clone)]
pub struct SettingInfo {
    pub key: String,
    pub value: String,
    pub secret: bool,
    pub description: String,
}

/// Describe every known setting with its effective value from `lookup`.
pub fn describe_settings(lookup: impl Fn(&str) -> Option<String>) -> Vec<SettingInfo> {
    let mut infos: Vec<SettingInfo> = DEFAULT_SETTINGS
        .values()
        .map(|def| {
            let value = lookup(def.key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| def.default.to_string());
            let value = if def.secret && !value.is_empty() {
                "********".to_string()
            } else {
                value
            };
            SettingInfo {
                key: def.key.to_string(),
                value,
                secret: def.secret,
                description: def.description.to_string(),
            }
        })
        .collect();
    infos.sort_by(|a, b| a.key.cmp(&b.key));
    infos
}
