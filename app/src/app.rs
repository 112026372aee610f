use std::sync::Arc;

use qr_composer::QrComposer;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::services::blob::BlobUploadService;
use crate::services::storage::UploadStore;

/// Application shared state accessible from axum handlers.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    config: AppConfig,
    composer: QrComposer,
    uploads: UploadStore,
    blob: BlobUploadService,
    /// Cancelled to stop the HTTP server
    shutdown_token: CancellationToken,
}

impl SharedState {
    /// Build the services described by `config`.
    pub fn new(config: AppConfig) -> Result<Self, anyhow::Error> {
        let composer = QrComposer::with_defaults(config.composer_config())?;
        let uploads = UploadStore::new(config.uploads_dir.clone(), config.max_upload_bytes);
        let blob = BlobUploadService::new(config.blob_api_url.clone(), config.blob_token.clone())?;

        Ok(Self {
            inner: Arc::new(SharedStateInner {
                config,
                composer,
                uploads,
                blob,
                shutdown_token: CancellationToken::new(),
            }),
        })
    }

    pub fn server_port(&self) -> u16 {
        self.inner.config.server_port
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn composer(&self) -> &QrComposer {
        &self.inner.composer
    }

    pub fn uploads(&self) -> &UploadStore {
        &self.inner.uploads
    }

    pub fn blob(&self) -> &BlobUploadService {
        &self.inner.blob
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.shutdown_token
    }
}
