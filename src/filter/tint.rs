//! Constant-color tint.

use image::RgbaImage;

use crate::params::Color;

/// Tints `image` with `color`, blended by `intensity`.
///
/// The tint layer is composited "atop" the image, so it only covers pixels the
/// image already covers and alpha is preserved. The tinted result is then mixed
/// with the untinted image using `intensity` (clamped to 0-1) as a uniform mask:
/// 0 returns the input unchanged, 1 returns the fully tinted image.
pub fn apply_tint(image: &RgbaImage, color: Color, intensity: f32) -> RgbaImage {
    let intensity = if intensity.is_nan() {
        0.0
    } else {
        intensity.clamp(0.0, 1.0)
    };
    if intensity == 0.0 {
        return image.clone();
    }

    let tint_alpha = color.a as f32 / 255.0;
    let tint = [color.r as f32, color.g as f32, color.b as f32];

    let mut result = image.clone();
    for pixel in result.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        if a == 0 {
            continue;
        }

        let source = [r as f32, g as f32, b as f32];
        let mut out = [0u8; 3];
        for i in 0..3 {
            // Source-atop keeps the destination alpha.
            let atop = tint[i] * tint_alpha + source[i] * (1.0 - tint_alpha);
            let mixed = source[i] * (1.0 - intensity) + atop * intensity;
            out[i] = mixed.round().clamp(0.0, 255.0) as u8;
        }

        pixel.0 = [out[0], out[1], out[2], a];
    }

    result
}
