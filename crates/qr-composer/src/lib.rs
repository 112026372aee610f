//! QR code generation with an optional brand logo badge.
//!
//! Encodes a payload at error-correction level H, rasterizes it onto a
//! fixed-width canvas and, when image compositing is available, draws a
//! circular logo badge at the center. Logo or compositing failures never
//! fail the call; they produce a plain code tagged with a [`Degradation`].

pub mod compose;
pub mod composer;
pub mod logo;
pub mod qr;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenience
pub use composer::{
    ComposeError, Composition, ComposerConfig, Degradation, QrComposer, QrImage,
    DEFAULT_LOGO_URL,
};
pub use logo::{LogoError, LogoLoader, LogoSource};
pub use qr::RenderOptions;
