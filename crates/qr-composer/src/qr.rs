//! QR encoding and rasterization onto a fixed-width RGBA canvas.

use image::{Rgba, RgbaImage};
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode};
use tracing::debug;

/// Output width in pixels.
pub const DEFAULT_WIDTH: u32 = 400;

/// Quiet zone around the symbol, in modules.
pub const QUIET_ZONE: u32 = 2;

pub const DARK: Rgba<u8> = Rgba([0x1F, 0x29, 0x37, 0xFF]);
pub const LIGHT: Rgba<u8> = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);
pub const ACCENT: Rgba<u8> = Rgba([0x4F, 0x46, 0xE5, 0xFF]);

/// Render settings shared by the plain and the badged code.
///
/// `logo_ratio` and `badge_scale` bound how much of the symbol the badge
/// hides. At the defaults the badge covers under 5% of the canvas, well
/// inside what level H can recover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub ec_level: EcLevel,
    pub width: u32,
    pub margin: u32,
    pub dark: Rgba<u8>,
    pub light: Rgba<u8>,
    pub accent: Rgba<u8>,
    /// Stroke width of the ring around the badge.
    pub border_width: u32,
    /// Logo diameter as a fraction of the canvas width.
    pub logo_ratio: f32,
    /// Badge diameter as a multiple of the logo diameter.
    pub badge_scale: f32,
    /// Corner radius of the logo clip mask.
    pub corner_radius: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            ec_level: EcLevel::H,
            width: DEFAULT_WIDTH,
            margin: QUIET_ZONE,
            dark: DARK,
            light: LIGHT,
            accent: ACCENT,
            border_width: 4,
            logo_ratio: 0.2,
            badge_scale: 1.2,
            corner_radius: 8,
        }
    }
}

/// Encode `data` into a QR symbol at the given error-correction level.
pub fn encode(data: &str, ec_level: EcLevel) -> Result<QrCode, QrError> {
    QrCode::with_error_correction_level(data.as_bytes(), ec_level)
}

/// Rasterize a QR symbol into a square canvas exactly `opts.width` pixels wide.
///
/// Pixels map onto modules proportionally, so modules may differ by one
/// pixel in size. The canvas grows to one pixel per module if `opts.width`
/// is smaller than the symbol plus its quiet zone.
pub fn rasterize(code: &QrCode, opts: &RenderOptions) -> RgbaImage {
    let modules = code.to_colors();
    let module_count = code.width() as u32;
    let total = module_count + opts.margin * 2;
    let width = opts.width.max(total);

    debug!(module_count, width, "Rasterizing QR code");

    let mut img = RgbaImage::from_pixel(width, width, opts.light);

    for y in 0..width {
        let Some(my) = module_index(y, width, total, opts.margin, module_count) else {
            continue;
        };
        for x in 0..width {
            let Some(mx) = module_index(x, width, total, opts.margin, module_count) else {
                continue;
            };
            if modules[(my * module_count + mx) as usize] == Color::Dark {
                img.put_pixel(x, y, opts.dark);
            }
        }
    }

    img
}

/// Map a pixel coordinate to a module coordinate, `None` inside the quiet zone.
fn module_index(px: u32, width: u32, total: u32, margin: u32, module_count: u32) -> Option<u32> {
    let idx = px * total / width;
    if idx < margin || idx >= margin + module_count {
        return None;
    }
    Some(idx - margin)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module_center(module: u32, width: u32, total: u32) -> u32 {
        ((module as f32 + 0.5) * width as f32 / total as f32) as u32
    }

    #[test]
    fn rasterize_produces_exact_width() {
        let code = encode("https://example.com/doc.pdf", EcLevel::H).unwrap();
        let img = rasterize(&code, &RenderOptions::default());
        assert_eq!(img.dimensions(), (400, 400));
    }

    #[test]
    fn quiet_zone_is_light() {
        let opts = RenderOptions::default();
        let code = encode("hello", opts.ec_level).unwrap();
        let img = rasterize(&code, &opts);
        for i in 0..img.width() {
            assert_eq!(*img.get_pixel(i, 0), LIGHT);
            assert_eq!(*img.get_pixel(0, i), LIGHT);
            assert_eq!(*img.get_pixel(i, img.height() - 1), LIGHT);
        }
    }

    #[test]
    fn finder_pattern_corner_is_dark() {
        let opts = RenderOptions::default();
        let code = encode("hello", opts.ec_level).unwrap();
        let total = code.width() as u32 + opts.margin * 2;
        let img = rasterize(&code, &opts);

        let c = module_center(opts.margin, img.width(), total);
        assert_eq!(*img.get_pixel(c, c), DARK);
        // Second ring of the finder pattern is light.
        let c1 = module_center(opts.margin + 1, img.width(), total);
        assert_eq!(*img.get_pixel(c1, c1), LIGHT);
    }

    #[test]
    fn tiny_width_grows_to_symbol_size() {
        let opts = RenderOptions {
            width: 10,
            ..RenderOptions::default()
        };
        let code = encode("hello", opts.ec_level).unwrap();
        let img = rasterize(&code, &opts);
        assert_eq!(img.width(), code.width() as u32 + opts.margin * 2);
    }

    #[test]
    fn only_palette_colors_are_used() {
        let opts = RenderOptions::default();
        let code = encode("palette check", opts.ec_level).unwrap();
        let img = rasterize(&code, &opts);
        assert!(img.pixels().all(|p| *p == DARK || *p == LIGHT));
    }
}
