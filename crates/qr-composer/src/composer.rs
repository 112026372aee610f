//! The QR composer: plain code, badged code, and the fallbacks between them.

use std::fmt;
use std::io::Cursor;
use std::time::Duration;

use base64::Engine as _;
use image::{DynamicImage, ImageFormat, RgbaImage};
use qrcode::types::QrError;
use tracing::{info, warn};

use crate::compose::{self, BadgeGeometry};
use crate::logo::{LogoError, LogoLoader, LogoRef, LogoSource};
use crate::qr::{self, RenderOptions};

/// Placeholder logo used when the caller does not name one.
pub const DEFAULT_LOGO_URL: &str = "https://via.placeholder.com/150/4F46E5/ffffff?text=LOGO";

const DEFAULT_LOGO_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("QR encode error: {0}")]
    Encode(#[from] QrError),

    #[error("PNG encode error: {0}")]
    Png(#[from] image::ImageError),

    #[error("Logo loader setup failed: {0}")]
    LogoSetup(#[from] LogoError),
}

/// Composer settings.
///
/// `default_logo` defaults to [`DEFAULT_LOGO_URL`]; `logo_timeout` bounds a
/// single logo load and defaults to five seconds.
#[derive(Debug, Clone)]
pub struct ComposerConfig {
    pub default_logo: String,
    pub logo_timeout: Duration,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            default_logo: DEFAULT_LOGO_URL.to_string(),
            logo_timeout: DEFAULT_LOGO_TIMEOUT,
        }
    }
}

/// Why the badge is missing from a returned code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    CompositingUnavailable,
    /// Carries the load error for callers and logs; the note never includes it.
    LogoUnavailable(String),
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degradation::CompositingUnavailable => write!(
                f,
                "image compositing not available, returned plain QR without embedded logo"
            ),
            Degradation::LogoUnavailable(_) => write!(
                f,
                "logo could not be loaded, returned plain QR without embedded logo"
            ),
        }
    }
}

/// An encoded PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrImage {
    png: Vec<u8>,
    width: u32,
}

impl QrImage {
    fn encode(canvas: &RgbaImage) -> Result<Self, ComposeError> {
        let mut png = Vec::new();
        canvas.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(Self {
            png,
            width: canvas.width(),
        })
    }

    pub fn as_png(&self) -> &[u8] {
        &self.png
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn to_data_uri(&self) -> String {
        let b64 = base64::engine::general_purpose::STANDARD.encode(&self.png);
        format!("data:image/png;base64,{b64}")
    }
}

/// Outcome of [`QrComposer::compose`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Composition {
    /// The logo badge was drawn.
    Composed(QrImage),
    /// A plain, still scannable code.
    Degraded { image: QrImage, reason: Degradation },
}

impl Composition {
    pub fn image(&self) -> &QrImage {
        match self {
            Composition::Composed(image) | Composition::Degraded { image, .. } => image,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Composition::Degraded { .. })
    }

    pub fn degradation(&self) -> Option<&Degradation> {
        match self {
            Composition::Composed(_) => None,
            Composition::Degraded { reason, .. } => Some(reason),
        }
    }

    /// Human-readable note for degraded output.
    pub fn note(&self) -> Option<String> {
        self.degradation().map(ToString::to_string)
    }
}

/// Renders QR codes, badged with a logo when compositing is available.
pub struct QrComposer<L = LogoLoader> {
    config: ComposerConfig,
    options: RenderOptions,
    logos: L,
}

impl QrComposer<LogoLoader> {
    /// Composer backed by the network/file [`LogoLoader`].
    pub fn with_defaults(config: ComposerConfig) -> Result<Self, ComposeError> {
        let logos = LogoLoader::new(config.logo_timeout)?;
        Ok(Self::new(config, logos))
    }
}

impl<L: LogoSource> QrComposer<L> {
    pub fn new(config: ComposerConfig, logos: L) -> Self {
        Self {
            config,
            options: RenderOptions::default(),
            logos,
        }
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render `url` as a QR code.
    ///
    /// Fails only on an empty `url` or when the payload cannot be encoded.
    /// A missing compositing capability or an unloadable logo yields
    /// [`Composition::Degraded`] instead of an error. A caller-supplied
    /// `logo_ref` must be an http(s) URL or a `data:` URI; local paths are
    /// only read for the configured default logo.
    pub async fn compose(
        &self,
        url: &str,
        logo_ref: Option<&str>,
        compositing_available: bool,
    ) -> Result<Composition, ComposeError> {
        if url.is_empty() {
            return Err(ComposeError::InvalidInput("URL is required"));
        }

        let code = qr::encode(url, self.options.ec_level)?;
        let mut canvas = qr::rasterize(&code, &self.options);

        if !compositing_available {
            info!("Compositing not available, returning plain QR");
            return Ok(Composition::Degraded {
                image: QrImage::encode(&canvas)?,
                reason: Degradation::CompositingUnavailable,
            });
        }

        let requested = logo_ref.filter(|r| !r.trim().is_empty());
        let loaded = match requested {
            Some(r) if LogoRef::parse(r).is_local() => Err(LogoError::LocalPathNotAllowed),
            Some(r) => self.load_logo(r).await,
            None => self.load_logo(&self.config.default_logo).await,
        };
        let reference = requested.unwrap_or(self.config.default_logo.as_str());

        match loaded {
            Ok(logo) => {
                let geometry = BadgeGeometry::for_canvas(canvas.width(), &self.options);
                compose::draw_badge(&mut canvas, &logo, &geometry, &self.options);
                Ok(Composition::Composed(QrImage::encode(&canvas)?))
            }
            Err(e) => {
                warn!(logo = reference, "Logo loading failed, continuing without logo: {e}");
                Ok(Composition::Degraded {
                    image: QrImage::encode(&canvas)?,
                    reason: Degradation::LogoUnavailable(e.to_string()),
                })
            }
        }
    }

    async fn load_logo(&self, reference: &str) -> Result<DynamicImage, LogoError> {
        let timeout = self.config.logo_timeout;
        tokio::time::timeout(timeout, self.logos.load(reference))
            .await
            .map_err(|_| LogoError::Timeout(timeout))?
    }
}
