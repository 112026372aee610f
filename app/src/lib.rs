pub mod app;
pub mod config;
pub mod server;
pub mod services;

use config::{AppConfig, describe_settings};

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// Load `.env`, build the runtime config and prepare the upload directory.
pub fn init_foundation() -> Result<AppConfig, anyhow::Error> {
    load_dotenv();

    let config = AppConfig::load();
    std::fs::create_dir_all(&config.uploads_dir)?;
    tracing::info!("Uploads stored in {}", config.uploads_dir.display());

    for setting in describe_settings(|key| std::env::var(key).ok()) {
        tracing::debug!(key = %setting.key, value = %setting.value, "{}", setting.description);
    }
    if !config.blob_enabled() {
        tracing::info!("No blob token configured, direct blob uploads disabled");
    }
    if !config.compositing_enabled {
        tracing::warn!("Image compositing disabled, QR codes will be returned without logo");
    }

    tracing::info!("Settings loaded (port={})", config.server_port);
    Ok(config)
}
