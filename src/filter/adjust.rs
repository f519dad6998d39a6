//! Brightness, contrast, saturation and hue adjustments.

use image::RgbaImage;
use palette::{Hsl, IntoColor, Srgb};

use crate::params::Adjustments;

/// Rec. 709 luma weights.
const LUMA: [f32; 3] = [0.2125, 0.7154, 0.0721];

/// Applies the color adjustments in order: brightness, contrast, saturation, hue.
///
/// Each stage is skipped when its value is `0.0`. With every value neutral the
/// result is an exact copy of the input. Values are clamped to their documented
/// ranges first. Alpha is never modified.
///
/// - brightness adds its value to every channel
/// - contrast scales around mid-gray by `1 + contrast`
/// - saturation scales away from luma by `1 + saturation`
/// - hue rotates by `hue * pi` radians
pub fn apply_adjustments(image: &RgbaImage, adjustments: &Adjustments) -> RgbaImage {
    let adjustments = adjustments.clamped();
    if adjustments.is_neutral() {
        return image.clone();
    }

    let Adjustments {
        brightness,
        contrast,
        saturation,
        hue,
    } = adjustments;
    let contrast_factor = 1.0 + contrast;
    let saturation_factor = 1.0 + saturation;
    let hue_degrees = (hue * std::f32::consts::PI).to_degrees();

    let mut result = image.clone();
    for pixel in result.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        if a == 0 {
            continue; // Skip fully transparent pixels
        }

        let mut rgb = [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0];

        if brightness != 0.0 {
            rgb = rgb.map(|c| (c + brightness).clamp(0.0, 1.0));
        }

        if contrast != 0.0 {
            rgb = rgb.map(|c| ((c - 0.5) * contrast_factor + 0.5).clamp(0.0, 1.0));
        }

        if saturation != 0.0 {
            let luma = rgb[0] * LUMA[0] + rgb[1] * LUMA[1] + rgb[2] * LUMA[2];
            rgb = rgb.map(|c| (luma + (c - luma) * saturation_factor).clamp(0.0, 1.0));
        }

        if hue != 0.0 {
            rgb = rotate_hue(rgb, hue_degrees);
        }

        pixel.0 = [
            (rgb[0] * 255.0).round() as u8,
            (rgb[1] * 255.0).round() as u8,
            (rgb[2] * 255.0).round() as u8,
            a,
        ];
    }

    result
}

fn rotate_hue([r, g, b]: [f32; 3], degrees: f32) -> [f32; 3] {
    let mut hsl: Hsl = Srgb::new(r, g, b).into_color();
    hsl.hue += degrees;
    let rotated: Srgb = hsl.into_color();
    [
        rotated.red.clamp(0.0, 1.0),
        rotated.green.clamp(0.0, 1.0),
        rotated.blue.clamp(0.0, 1.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(4, 4, Rgba(rgba))
    }

    #[test]
    fn neutral_is_identity() {
        let img = RgbaImage::from_fn(8, 8, |x, y| Rgba([x as u8 * 30, y as u8 * 30, 90, 200]));
        assert_eq!(apply_adjustments(&img, &Adjustments::default()), img);
    }

    #[test]
    fn brightness_is_additive() {
        let img = solid([100, 100, 100, 255]);
        let out = apply_adjustments(
            &img,
            &Adjustments {
                brightness: 0.2,
                ..Adjustments::default()
            },
        );
        // 100/255 + 0.2 = 0.592 -> 151
        assert_eq!(out.get_pixel(0, 0).0, [151, 151, 151, 255]);
    }

    #[test]
    fn contrast_pivots_on_mid_gray() {
        let img = solid([200, 55, 128, 255]);
        let out = apply_adjustments(
            &img,
            &Adjustments {
                contrast: 0.5,
                ..Adjustments::default()
            },
        );
        let p = out.get_pixel(0, 0).0;
        assert!(p[0] > 200, "bright channel should get brighter");
        assert!(p[1] < 55, "dark channel should get darker");
        assert!((p[2] as i32 - 128).abs() <= 1, "mid gray should stay put");
    }

    #[test]
    fn full_desaturation_is_gray() {
        let img = solid([255, 0, 0, 255]);
        let out = apply_adjustments(
            &img,
            &Adjustments {
                saturation: -1.0,
                ..Adjustments::default()
            },
        );
        let p = out.get_pixel(0, 0).0;
        assert_eq!(p[0], p[1]);
        assert_eq!(p[1], p[2]);
    }

    #[test]
    fn hue_rotates_by_fraction_of_pi() {
        // 0.5 * pi = 90 degrees: red (0) moves to chartreuse (90)
        let img = solid([255, 0, 0, 255]);
        let out = apply_adjustments(
            &img,
            &Adjustments {
                hue: 0.5,
                ..Adjustments::default()
            },
        );
        let p = out.get_pixel(0, 0).0;
        assert!(p[1] > p[0], "green should dominate after a 90 degree rotation");
        assert!(p[1] > p[2]);
    }

    #[test]
    fn alpha_is_untouched() {
        let img = solid([10, 20, 30, 77]);
        let out = apply_adjustments(
            &img,
            &Adjustments {
                brightness: 0.3,
                contrast: 0.1,
                saturation: 0.4,
                hue: -0.2,
            },
        );
        assert!(out.pixels().all(|p| p[3] == 77));
    }

    #[test]
    fn transparent_pixels_are_skipped() {
        let img = solid([12, 34, 56, 0]);
        let out = apply_adjustments(
            &img,
            &Adjustments {
                brightness: 0.5,
                ..Adjustments::default()
            },
        );
        assert_eq!(out, img);
    }
}
