//! Pixel-exact resampling and conversions to and from tiny-skia pixmaps.
//!
//! [`render`] is the only place raster data changes size. Every exported icon
//! and every padded draw in the compositor goes through it, so the output
//! dimensions are always exactly the integers asked for.

use image::imageops::{self, FilterType};
use image::{Rgba, Rgba32FImage, RgbaImage};
use resvg::tiny_skia::{ColorU8, IntSize, Pixmap};

// ============================================================================
// Resampling
// ============================================================================

/// Renders `image` into a new buffer of exactly `width` x `height` pixels.
///
/// The image is stretched to fill the target using Lanczos3 resampling on
/// premultiplied alpha, so transparent edges do not bleed dark fringes.
/// Background pixels start fully transparent. A zero-area source produces an
/// all-transparent buffer of the requested size.
pub fn render(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if width == 0 || height == 0 || image.width() == 0 || image.height() == 0 {
        return RgbaImage::new(width, height);
    }

    if image.dimensions() == (width, height) {
        return image.clone();
    }

    let premultiplied = premultiply(image);
    let resized = imageops::resize(&premultiplied, width, height, FilterType::Lanczos3);
    demultiply(&resized)
}

fn premultiply(image: &RgbaImage) -> Rgba32FImage {
    let mut out = Rgba32FImage::new(image.width(), image.height());
    for (src, dst) in image.pixels().zip(out.pixels_mut()) {
        let a = src[3] as f32 / 255.0;
        dst.0 = [
            src[0] as f32 / 255.0 * a,
            src[1] as f32 / 255.0 * a,
            src[2] as f32 / 255.0 * a,
            a,
        ];
    }
    out
}

fn demultiply(image: &Rgba32FImage) -> RgbaImage {
    let mut out = RgbaImage::new(image.width(), image.height());
    for (src, dst) in image.pixels().zip(out.pixels_mut()) {
        let a = src[3].clamp(0.0, 1.0);
        let alpha = (a * 255.0).round() as u8;
        if alpha == 0 {
            dst.0 = [0, 0, 0, 0];
            continue;
        }
        let channel = |c: f32| ((c / a).clamp(0.0, 1.0) * 255.0).round() as u8;
        dst.0 = [channel(src[0]), channel(src[1]), channel(src[2]), alpha];
    }
    out
}

// ============================================================================
// Pixmap Conversion
// ============================================================================

/// Copies a straight-alpha RGBA image into a premultiplied tiny-skia pixmap.
///
/// Returns `None` for zero-area images.
pub fn rgba_to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(image.width(), image.height())?;
    let mut data = Vec::with_capacity(image.as_raw().len());
    for pixel in image.pixels() {
        let [r, g, b, a] = pixel.0;
        let premultiplied = ColorU8::from_rgba(r, g, b, a).premultiply();
        data.extend_from_slice(&[
            premultiplied.red(),
            premultiplied.green(),
            premultiplied.blue(),
            premultiplied.alpha(),
        ]);
    }
    Pixmap::from_vec(data, size)
}

/// Converts a tiny-skia pixmap back to a straight-alpha RGBA image.
pub fn pixmap_to_rgba(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (src, dst) in pixmap.pixels().iter().zip(img.pixels_mut()) {
        // tiny_skia stores premultiplied alpha
        let (r, g, b, a) = unpremultiply(src.red(), src.green(), src.blue(), src.alpha());
        *dst = Rgba([r, g, b, a]);
    }
    img
}

/// Unpremultiplies a premultiplied alpha pixel.
fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}
