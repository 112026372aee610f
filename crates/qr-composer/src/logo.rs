//! Logo loading from HTTP(S) URLs, local files and `data:` URIs.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use base64::Engine as _;
use image::DynamicImage;
use reqwest::Client;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum LogoError {
    #[error("Logo request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Logo request returned HTTP {0}")]
    Status(u16),

    #[error("Logo file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logo decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Invalid logo data URI")]
    InvalidDataUri,

    #[error("Logo load timed out after {0:?}")]
    Timeout(Duration),

    #[error("Logo response exceeds {0} bytes")]
    TooLarge(usize),

    #[error("Local logo paths are only accepted for the default logo")]
    LocalPathNotAllowed,
}

/// Upper bound on a fetched logo body.
pub const MAX_LOGO_BYTES: usize = 5 * 1024 * 1024;

/// Something that can resolve a logo reference into an image.
pub trait LogoSource: Send + Sync {
    fn load(
        &self,
        reference: &str,
    ) -> impl Future<Output = Result<DynamicImage, LogoError>> + Send;
}

/// Where a logo reference points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoRef<'a> {
    Http(&'a str),
    File(PathBuf),
    DataUri(&'a str),
}

impl<'a> LogoRef<'a> {
    pub fn parse(reference: &'a str) -> Self {
        let lower = reference.get(..8).unwrap_or(reference).to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            LogoRef::Http(reference)
        } else if lower.starts_with("data:") {
            LogoRef::DataUri(reference)
        } else if lower.starts_with("file://") {
            LogoRef::File(PathBuf::from(&reference["file://".len()..]))
        } else {
            LogoRef::File(PathBuf::from(reference))
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, LogoRef::File(_))
    }
}

/// Default [`LogoSource`]: HTTP fetch with a bounded client, plus files and data URIs.
#[derive(Clone)]
pub struct LogoLoader {
    http: Client,
    max_bytes: usize,
}

impl LogoLoader {
    pub fn new(timeout: Duration) -> Result<Self, LogoError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            max_bytes: MAX_LOGO_BYTES,
        })
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, LogoError> {
        let mut resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(LogoError::Status(resp.status().as_u16()));
        }
        if resp
            .content_length()
            .is_some_and(|len| len > self.max_bytes as u64)
        {
            return Err(LogoError::TooLarge(self.max_bytes));
        }

        let mut body = Vec::new();
        while let Some(chunk) = resp.chunk().await? {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(LogoError::TooLarge(self.max_bytes));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

impl LogoSource for LogoLoader {
    async fn load(&self, reference: &str) -> Result<DynamicImage, LogoError> {
        let bytes = match LogoRef::parse(reference) {
            LogoRef::Http(url) => {
                debug!(url, "Fetching logo");
                self.fetch(url).await?
            }
            LogoRef::File(path) => {
                debug!(path = %path.display(), "Reading logo file");
                tokio::fs::read(&path).await?
            }
            LogoRef::DataUri(uri) => decode_data_uri(uri)?,
        };
        Ok(image::load_from_memory(&bytes)?)
    }
}

/// Decode the payload of a base64 `data:` URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, LogoError> {
    let (header, payload) = uri.split_once(',').ok_or(LogoError::InvalidDataUri)?;
    if !header.ends_with(";base64") {
        return Err(LogoError::InvalidDataUri);
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|_| LogoError::InvalidDataUri)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{png_data_uri, solid_png};
    use image::Rgba;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    /// Answer a single HTTP request with `head` followed by `body`.
    async fn serve_once(head: String, body: Vec<u8>) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(&body).await;
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}/logo.png")
    }

    fn loader() -> LogoLoader {
        LogoLoader::new(Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn parse_classifies_references() {
        assert_eq!(
            LogoRef::parse("https://example.com/logo.png"),
            LogoRef::Http("https://example.com/logo.png")
        );
        assert_eq!(
            LogoRef::parse("HTTP://example.com/logo.png"),
            LogoRef::Http("HTTP://example.com/logo.png")
        );
        assert_eq!(
            LogoRef::parse("file:///tmp/logo.png"),
            LogoRef::File(PathBuf::from("/tmp/logo.png"))
        );
        assert_eq!(
            LogoRef::parse("assets/logo.png"),
            LogoRef::File(PathBuf::from("assets/logo.png"))
        );
        assert_eq!(
            LogoRef::parse("FILE:///tmp/logo.png"),
            LogoRef::File(PathBuf::from("/tmp/logo.png"))
        );
        assert!(LogoRef::parse("/etc/passwd").is_local());
        assert!(!LogoRef::parse("https://example.com/logo.png").is_local());
        assert_eq!(
            LogoRef::parse("data:image/png;base64,AAAA"),
            LogoRef::DataUri("data:image/png;base64,AAAA")
        );
    }

    #[test]
    fn decode_data_uri_rejects_non_base64() {
        assert!(matches!(
            decode_data_uri("data:image/png,raw"),
            Err(LogoError::InvalidDataUri)
        ));
        assert!(matches!(
            decode_data_uri("data:image/png;base64"),
            Err(LogoError::InvalidDataUri)
        ));
        assert!(matches!(
            decode_data_uri("data:image/png;base64,***"),
            Err(LogoError::InvalidDataUri)
        ));
    }

    #[tokio::test]
    async fn loads_logo_from_data_uri() {
        let uri = png_data_uri(Rgba([10, 20, 30, 255]), 16);
        let img = loader().load(&uri).await.unwrap();
        assert_eq!(img.width(), 16);
        assert_eq!(img.to_rgba8().get_pixel(3, 3), &Rgba([10, 20, 30, 255]));
    }

    #[tokio::test]
    async fn loads_logo_from_file() {
        let path = std::env::temp_dir().join(format!("logo-{}.png", uuid::Uuid::new_v4()));
        std::fs::write(&path, solid_png(Rgba([1, 2, 3, 255]), 12)).unwrap();

        let plain = loader().load(path.to_str().unwrap()).await.unwrap();
        assert_eq!(plain.width(), 12);

        let url = format!("file://{}", path.display());
        let via_url = loader().load(&url).await.unwrap();
        assert_eq!(via_url.height(), 12);

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join(format!("missing-{}.png", uuid::Uuid::new_v4()));
        let err = loader().load(path.to_str().unwrap()).await.unwrap_err();
        assert!(matches!(err, LogoError::Io(_)));
    }

    #[tokio::test]
    async fn garbage_bytes_are_decode_error() {
        let path = std::env::temp_dir().join(format!("garbage-{}.png", uuid::Uuid::new_v4()));
        std::fs::write(&path, b"definitely not a png").unwrap();

        let err = loader().load(path.to_str().unwrap()).await.unwrap_err();
        assert!(matches!(err, LogoError::Decode(_)));

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn unreachable_host_is_http_error() {
        let err = loader()
            .load("https://bad.invalid/logo.png")
            .await
            .unwrap_err();
        assert!(matches!(err, LogoError::Http(_)));
    }

    #[tokio::test]
    async fn fetches_logo_over_http() {
        let png = solid_png(Rgba([5, 6, 7, 255]), 20);
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: {}\r\n\r\n",
            png.len()
        );
        let url = serve_once(head, png).await;

        let img = loader().load(&url).await.unwrap();
        assert_eq!(img.width(), 20);
    }

    #[tokio::test]
    async fn declared_oversized_body_is_rejected() {
        let head = "HTTP/1.1 200 OK\r\nContent-Length: 4096\r\n\r\n".to_string();
        let url = serve_once(head, vec![0u8; 4096]).await;

        let err = loader().with_max_bytes(1024).load(&url).await.unwrap_err();
        assert!(matches!(err, LogoError::TooLarge(1024)));
    }

    #[tokio::test]
    async fn undeclared_oversized_body_is_cut_off() {
        let head = "HTTP/1.1 200 OK\r\nConnection: close\r\n\r\n".to_string();
        let url = serve_once(head, vec![0u8; 4096]).await;

        let err = loader().with_max_bytes(1024).load(&url).await.unwrap_err();
        assert!(matches!(err, LogoError::TooLarge(1024)));
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let head = "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n".to_string();
        let url = serve_once(head, Vec::new()).await;

        let err = loader().load(&url).await.unwrap_err();
        assert!(matches!(err, LogoError::Status(404)));
    }
}
