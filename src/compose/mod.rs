//! Shape, background, border and text compositing.
//!
//! # Stage Order
//!
//! ```text
//! filtered image
//!     │
//!     ▼
//! ┌────────────┐
//! │ Background │ ◄── fills the whole canvas, never clipped
//! └─────┬──────┘
//!       ▼
//! ┌────────────┐
//! │ Shape clip │ ◄── circle / rounded mask inside the padded rect
//! └─────┬──────┘
//!       ▼
//! ┌────────────┐
//! │   Image    │ ◄── stretched into the padded rect through the mask
//! └─────┬──────┘
//!       ▼
//! ┌────────────┐
//! │   Border   │ ◄── stroked on the shape outline, on top of the image
//! └─────┬──────┘
//!       ▼
//! ┌────────────┐
//! │  Overlay   │ ◄── text label, drawn last and never clipped
//! └────────────┘
//! ```
//!
//! Padding and corner radius are percentages of the shorter canvas side, so
//! one parameter set looks the same at every export size.

pub mod shape;
pub mod text;

use image::RgbaImage;
use resvg::tiny_skia::{Paint, Pixmap, PixmapPaint, Stroke, Transform};

use crate::params::{
    BackgroundSettings, BorderSettings, OverlaySettings, ShapeKind, ShapeSettings,
};
use crate::raster::{RectF, SizePx};
use crate::render::{pixmap_to_rgba, render, rgba_to_pixmap};

/// Composites `image` onto a canvas of the same size.
///
/// When no stage is active the input is returned unchanged.
pub fn compose(
    image: &RgbaImage,
    shape: &ShapeSettings,
    padding_percent: f32,
    background: &BackgroundSettings,
    border: &BorderSettings,
    overlay: &OverlaySettings,
) -> RgbaImage {
    let size = SizePx::new(image.width(), image.height());
    if size.is_empty() {
        return image.clone();
    }

    let padding_percent = padding_percent.clamp(0.0, 100.0);
    let passthrough = shape.kind == ShapeKind::Square
        && padding_percent == 0.0
        && !background.enabled
        && !border.enabled
        && overlay.resolved_text().is_none();
    if passthrough {
        return image.clone();
    }

    let Some(mut canvas) = Pixmap::new(size.width, size.height) else {
        return image.clone();
    };

    let min_side = size.min_side() as f32;
    let padding_px = padding_percent / 100.0 * min_side;
    let corner_radius_px = shape.corner_radius_percent() / 100.0 * min_side;

    if background.enabled {
        canvas.fill(background.color.to_skia());
    }

    let padded = RectF::from_size(size).inset(padding_px);
    let mask = shape::clip_mask(shape.kind, &padded, corner_radius_px, size.width, size.height);

    draw_image(&mut canvas, image, &padded, mask.as_ref());

    if border.enabled {
        let width = border.width_px();
        let inset = padded.inset(width / 2.0);
        if let Some(path) = shape::outline(shape.kind, &inset, corner_radius_px) {
            let mut paint = Paint::default();
            paint.set_color(border.color.to_skia());
            paint.anti_alias = true;
            let stroke = Stroke {
                width,
                ..Stroke::default()
            };
            canvas.stroke_path(&path, &paint, &stroke, Transform::identity(), mask.as_ref());
        }
    }

    text::draw_overlay(&mut canvas, overlay);

    pixmap_to_rgba(&canvas)
}

/// Draws `image` stretched into `rect`, snapped to whole pixels.
fn draw_image(
    canvas: &mut Pixmap,
    image: &RgbaImage,
    rect: &RectF,
    mask: Option<&resvg::tiny_skia::Mask>,
) {
    let x = rect.x.round() as i32;
    let y = rect.y.round() as i32;
    let width = (rect.right().round() as i32 - x).max(0) as u32;
    let height = (rect.bottom().round() as i32 - y).max(0) as u32;

    let scaled = render(image, width, height);
    let Some(layer) = rgba_to_pixmap(&scaled) else {
        return;
    };

    canvas.draw_pixmap(
        x,
        y,
        layer.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        mask,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Color;
    use image::Rgba;

    const RED: [u8; 4] = [255, 0, 0, 255];

    fn red(size: u32) -> RgbaImage {
        RgbaImage::from_pixel(size, size, Rgba(RED))
    }

    fn shape(kind: ShapeKind) -> ShapeSettings {
        ShapeSettings {
            kind,
            ..ShapeSettings::default()
        }
    }

    #[test]
    fn defaults_pass_through() {
        let img = RgbaImage::from_fn(9, 9, |x, y| Rgba([x as u8, y as u8, 3, 100]));
        let out = compose(
            &img,
            &ShapeSettings::default(),
            0.0,
            &BackgroundSettings::default(),
            &BorderSettings::default(),
            &OverlaySettings::default(),
        );
        assert_eq!(out, img);
    }

    #[test]
    fn circle_clips_corners_keeps_center() {
        let out = compose(
            &red(64),
            &shape(ShapeKind::Circle),
            0.0,
            &BackgroundSettings::default(),
            &BorderSettings::default(),
            &OverlaySettings::default(),
        );
        assert_eq!(out.dimensions(), (64, 64));
        assert_eq!(out.get_pixel(0, 0)[3], 0);
        assert_eq!(out.get_pixel(63, 0)[3], 0);
        assert_eq!(out.get_pixel(32, 32).0, RED);
    }

    #[test]
    fn background_is_not_clipped() {
        let background = BackgroundSettings {
            enabled: true,
            color: Color::WHITE,
        };
        let out = compose(
            &red(64),
            &shape(ShapeKind::Circle),
            0.0,
            &background,
            &BorderSettings::default(),
            &OverlaySettings::default(),
        );
        assert_eq!(out.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(out.get_pixel(32, 32).0, RED);
    }

    #[test]
    fn padding_is_percentage_of_canvas() {
        // 25% of 100px leaves a 25px transparent margin.
        let out = compose(
            &red(100),
            &ShapeSettings::default(),
            25.0,
            &BackgroundSettings::default(),
            &BorderSettings::default(),
            &OverlaySettings::default(),
        );
        assert_eq!(out.get_pixel(10, 50)[3], 0);
        assert_eq!(out.get_pixel(24, 24)[3], 0);
        assert_eq!(out.get_pixel(25, 25).0, RED);
        assert_eq!(out.get_pixel(50, 50).0, RED);
        assert_eq!(out.get_pixel(74, 74).0, RED);
        assert_eq!(out.get_pixel(75, 75)[3], 0);

        // Same parameters scale with the canvas.
        let small = compose(
            &red(20),
            &ShapeSettings::default(),
            25.0,
            &BackgroundSettings::default(),
            &BorderSettings::default(),
            &OverlaySettings::default(),
        );
        assert_eq!(small.get_pixel(4, 4)[3], 0);
        assert_eq!(small.get_pixel(5, 5).0, RED);
    }

    #[test]
    fn border_sits_on_the_edge() {
        let border = BorderSettings {
            enabled: true,
            width_px: 4.0,
            color: Color::rgb(0, 0, 255),
        };
        let out = compose(
            &red(64),
            &ShapeSettings::default(),
            0.0,
            &BackgroundSettings::default(),
            &border,
            &OverlaySettings::default(),
        );
        assert_eq!(out.get_pixel(1, 32).0, [0, 0, 255, 255]);
        assert_eq!(out.get_pixel(32, 62).0, [0, 0, 255, 255]);
        assert_eq!(out.get_pixel(32, 32).0, RED);
    }

    #[test]
    fn padding_past_center_leaves_background_only() {
        let background = BackgroundSettings {
            enabled: true,
            color: Color::BLACK,
        };
        let out = compose(
            &red(10),
            &ShapeSettings::default(),
            60.0,
            &background,
            &BorderSettings::default(),
            &OverlaySettings::default(),
        );
        assert!(out.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn circle_border_follows_the_outline() {
        let border = BorderSettings {
            enabled: true,
            width_px: 4.0,
            color: Color::rgb(0, 0, 255),
        };
        let out = compose(
            &red(64),
            &shape(ShapeKind::Circle),
            0.0,
            &BackgroundSettings::default(),
            &border,
            &OverlaySettings::default(),
        );
        let edge = out.get_pixel(1, 32).0;
        assert!(edge[2] > 200 && edge[0] < 50, "{edge:?}");
        let top = out.get_pixel(32, 1).0;
        assert!(top[2] > 200 && top[0] < 50, "{top:?}");
        assert_eq!(out.get_pixel(0, 0)[3], 0);
        assert_eq!(out.get_pixel(32, 32).0, RED);
    }

    #[test]
    fn rounded_border_follows_the_outline() {
        let border = BorderSettings {
            enabled: true,
            width_px: 4.0,
            color: Color::rgb(0, 0, 255),
        };
        let out = compose(
            &red(100),
            &shape(ShapeKind::Rounded),
            0.0,
            &BackgroundSettings::default(),
            &border,
            &OverlaySettings::default(),
        );
        let top = out.get_pixel(50, 1).0;
        assert!(top[2] > 200 && top[0] < 50, "{top:?}");
        let left = out.get_pixel(1, 50).0;
        assert!(left[2] > 200 && left[0] < 50, "{left:?}");
        // Outside the 20px corner arc.
        assert_eq!(out.get_pixel(0, 0)[3], 0);
        assert_eq!(out.get_pixel(3, 3)[3], 0);
        assert_eq!(out.get_pixel(50, 50).0, RED);
    }

    fn label(vertical_position: f32) -> OverlaySettings {
        OverlaySettings {
            kind: crate::params::OverlayKind::Beta,
            color: Color::WHITE,
            font_size: 40.0,
            rotation_degrees: 0.0,
            vertical_position,
            opacity: 1.0,
            ..OverlaySettings::default()
        }
    }

    /// Count and centroid of pixels matching `painted`.
    fn painted_centroid(
        image: &RgbaImage,
        painted: impl Fn(&Rgba<u8>) -> bool,
    ) -> (usize, f32, f32) {
        let (mut count, mut sx, mut sy) = (0usize, 0.0f32, 0.0f32);
        for (x, y, pixel) in image.enumerate_pixels() {
            if painted(pixel) {
                count += 1;
                sx += x as f32;
                sy += y as f32;
            }
        }
        if count == 0 {
            return (0, 0.0, 0.0);
        }
        (count, sx / count as f32, sy / count as f32)
    }

    #[test]
    fn overlay_paints_label_at_center() {
        if text::font_database().is_none() {
            return;
        }
        let out = compose(
            &RgbaImage::new(200, 200),
            &ShapeSettings::default(),
            0.0,
            &BackgroundSettings::default(),
            &BorderSettings::default(),
            &label(0.5),
        );
        let (count, cx, cy) = painted_centroid(&out, |p| p[3] > 0);
        assert!(count > 100, "overlay painted {count} pixels");
        assert!((cx - 100.0).abs() < 20.0, "centroid x {cx}");
        assert!((cy - 100.0).abs() < 20.0, "centroid y {cy}");
    }

    #[test]
    fn overlay_vertical_position_moves_label_up() {
        if text::font_database().is_none() {
            return;
        }
        let out = compose(
            &RgbaImage::new(200, 200),
            &ShapeSettings::default(),
            0.0,
            &BackgroundSettings::default(),
            &BorderSettings::default(),
            &label(0.25),
        );
        let (count, cx, cy) = painted_centroid(&out, |p| p[3] > 0);
        assert!(count > 100, "overlay painted {count} pixels");
        assert!(cy < 100.0, "centroid y {cy}");
        assert!((cy - 50.0).abs() < 20.0, "centroid y {cy}");
        assert!((cx - 100.0).abs() < 20.0, "centroid x {cx}");
    }

    #[test]
    fn overlay_is_not_clipped_by_shape() {
        if text::font_database().is_none() {
            return;
        }
        // The inscribed circle covers rows 150..250; the label sits at row 40.
        let overlay = OverlaySettings {
            font_size: 24.0,
            ..label(0.1)
        };
        let out = compose(
            &RgbaImage::from_pixel(100, 400, Rgba(RED)),
            &shape(ShapeKind::Circle),
            0.0,
            &BackgroundSettings::default(),
            &BorderSettings::default(),
            &overlay,
        );
        let outside_circle = out
            .enumerate_pixels()
            .filter(|(_, y, p)| *y < 100 && p[3] > 0)
            .count();
        assert!(outside_circle > 50, "label clipped: {outside_circle} pixels");
        assert_eq!(out.get_pixel(0, 399)[3], 0);
    }

    #[test]
    fn overlay_is_drawn_over_the_border() {
        if text::font_database().is_none() {
            return;
        }
        let border = BorderSettings {
            enabled: true,
            width_px: 15.0,
            color: Color::rgb(0, 0, 255),
        };
        // Label centered on row 8, inside the 15px top border band.
        let out = compose(
            &RgbaImage::new(200, 200),
            &ShapeSettings::default(),
            0.0,
            &BackgroundSettings::default(),
            &border,
            &label(0.04),
        );
        let over_border = out
            .enumerate_pixels()
            .filter(|(x, y, p)| *y < 15 && (40..160).contains(x) && p[0] > 200)
            .count();
        assert!(over_border > 20, "label hidden by border: {over_border} pixels");
        // Border still visible where there is no label.
        assert_eq!(out.get_pixel(5, 100).0, [0, 0, 255, 255]);
    }
}
