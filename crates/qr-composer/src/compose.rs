//! Logo badge composition: background disc, accent ring and a clipped logo.

use std::f32::consts::PI;

use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;
use tracing::debug;

use crate::qr::RenderOptions;

/// Pixel geometry of the badge on a square canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadgeGeometry {
    /// Canvas midpoint (both axes).
    pub center: i32,
    /// Side of the square the logo is scaled into.
    pub logo_size: u32,
    /// Top-left corner of the logo square (both axes).
    pub logo_origin: u32,
    /// Radius of the background disc.
    pub badge_radius: f32,
    pub border_width: u32,
}

impl BadgeGeometry {
    pub fn for_canvas(width: u32, opts: &RenderOptions) -> Self {
        let logo = width as f32 * opts.logo_ratio;
        let logo_size = (logo.round() as u32).min(width);
        Self {
            center: (width / 2) as i32,
            logo_size,
            logo_origin: (width - logo_size) / 2,
            badge_radius: logo * opts.badge_scale / 2.0,
            border_width: opts.border_width,
        }
    }

    /// Fraction of the canvas hidden by the badge, ring included.
    pub fn occluded_fraction(&self, width: u32) -> f32 {
        let outer = self.badge_radius + self.border_width as f32 / 2.0;
        PI * outer * outer / (width as f32 * width as f32)
    }
}

/// Draw the full badge centered on `canvas`.
pub fn draw_badge(
    canvas: &mut RgbaImage,
    logo: &DynamicImage,
    geometry: &BadgeGeometry,
    opts: &RenderOptions,
) {
    debug!(
        logo_size = geometry.logo_size,
        badge_radius = geometry.badge_radius,
        "Drawing logo badge"
    );

    let center = (geometry.center, geometry.center);
    draw_filled_circle_mut(
        canvas,
        center,
        geometry.badge_radius.round() as i32,
        opts.light,
    );
    draw_ring(
        canvas,
        center,
        geometry.badge_radius,
        geometry.border_width as f32,
        opts.accent,
    );

    let size = geometry.logo_size;
    if size == 0 {
        return;
    }
    let resized = logo.resize_exact(size, size, FilterType::Lanczos3);
    let radius = opts.corner_radius as f32;
    overlay_clipped(
        canvas,
        &resized,
        geometry.logo_origin,
        geometry.logo_origin,
        |x, y| rounded_rect_contains(x, y, size, radius),
    );
}

/// Stroke a ring of `stroke` pixels centered on the circle of `radius`.
pub fn draw_ring(
    canvas: &mut RgbaImage,
    center: (i32, i32),
    radius: f32,
    stroke: f32,
    color: Rgba<u8>,
) {
    let half = stroke / 2.0;
    let reach = (radius + half).ceil() as i32;
    let (cx, cy) = center;

    for y in (cy - reach).max(0)..=(cy + reach) {
        for x in (cx - reach).max(0)..=(cx + reach) {
            if x as u32 >= canvas.width() || y as u32 >= canvas.height() {
                continue;
            }
            let dx = (x - cx) as f32;
            let dy = (y - cy) as f32;
            let distance = (dx * dx + dy * dy).sqrt();
            if (distance - radius).abs() <= half {
                canvas.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Whether pixel `(x, y)` of a `size` square lies inside its rounded-corner mask.
pub fn rounded_rect_contains(x: u32, y: u32, size: u32, radius: f32) -> bool {
    let size = size as f32;
    let radius = radius.min(size / 2.0);
    let px = x as f32 + 0.5;
    let py = y as f32 + 0.5;
    if px > size || py > size {
        return false;
    }
    let nearest_x = px.clamp(radius, size - radius);
    let nearest_y = py.clamp(radius, size - radius);
    let dx = px - nearest_x;
    let dy = py - nearest_y;
    dx * dx + dy * dy <= radius * radius
}

/// Alpha-composite `top` onto `base` at the given position, skipping
/// pixels rejected by `clip` (in `top` coordinates).
pub fn overlay_clipped(
    base: &mut RgbaImage,
    top: &DynamicImage,
    x: u32,
    y: u32,
    clip: impl Fn(u32, u32) -> bool,
) {
    let top_rgba = top.to_rgba8();
    for (dx, dy, pixel) in top_rgba.enumerate_pixels() {
        if !clip(dx, dy) {
            continue;
        }
        let target_x = x + dx;
        let target_y = y + dy;
        if target_x < base.width() && target_y < base.height() {
            let alpha = pixel[3] as f32 / 255.0;
            if alpha > 0.99 {
                base.put_pixel(target_x, target_y, *pixel);
            } else if alpha > 0.01 {
                let bg = base.get_pixel(target_x, target_y);
                let blended = blend_pixel(bg, pixel, alpha);
                base.put_pixel(target_x, target_y, blended);
            }
        }
    }
}

fn blend_pixel(bg: &Rgba<u8>, fg: &Rgba<u8>, alpha: f32) -> Rgba<u8> {
    let inv = 1.0 - alpha;
    Rgba([
        (fg[0] as f32 * alpha + bg[0] as f32 * inv) as u8,
        (fg[1] as f32 * alpha + bg[1] as f32 * inv) as u8,
        (fg[2] as f32 * alpha + bg[2] as f32 * inv) as u8,
        255,
    ])
}
