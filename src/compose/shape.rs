//! Shape outlines and clip masks.

use resvg::tiny_skia::{FillRule, Mask, Path, PathBuilder, Transform};

use crate::params::ShapeKind;
use crate::raster::RectF;

/// Control point distance for approximating a quarter circle with a cubic.
const KAPPA: f32 = 0.552_284_8;

/// Builds the outline of `kind` inside `rect`.
///
/// Circles are inscribed in `rect` (radius is half its shorter side, centered).
/// Rounded rectangles clamp `corner_radius` to half the shorter side. Returns
/// `None` when `rect` has no area.
pub fn outline(kind: ShapeKind, rect: &RectF, corner_radius: f32) -> Option<Path> {
    if rect.is_empty() {
        return None;
    }

    match kind {
        ShapeKind::Square => Some(PathBuilder::from_rect(rect.to_skia()?)),
        ShapeKind::Circle => {
            let (cx, cy) = rect.center();
            PathBuilder::from_circle(cx, cy, rect.min_side() / 2.0)
        }
        ShapeKind::Rounded => rounded_rect(rect, corner_radius),
    }
}

/// Builds an anti-aliased clip mask for `kind`, or `None` for squares.
///
/// Squares never clip. Anything drawn through the mask is limited to the
/// shape's interior.
pub fn clip_mask(
    kind: ShapeKind,
    rect: &RectF,
    corner_radius: f32,
    width: u32,
    height: u32,
) -> Option<Mask> {
    if kind == ShapeKind::Square {
        return None;
    }

    let mut mask = Mask::new(width, height)?;
    // An empty outline clips everything away.
    if let Some(path) = outline(kind, rect, corner_radius) {
        mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
    }
    Some(mask)
}

fn rounded_rect(rect: &RectF, corner_radius: f32) -> Option<Path> {
    let r = corner_radius.min(rect.min_side() / 2.0).max(0.0);
    if r == 0.0 {
        return Some(PathBuilder::from_rect(rect.to_skia()?));
    }

    let k = r * KAPPA;
    let (l, t, rt, b) = (rect.x, rect.y, rect.right(), rect.bottom());

    let mut pb = PathBuilder::new();
    pb.move_to(l + r, t);
    pb.line_to(rt - r, t);
    pb.cubic_to(rt - r + k, t, rt, t + r - k, rt, t + r);
    pb.line_to(rt, b - r);
    pb.cubic_to(rt, b - r + k, rt - r + k, b, rt - r, b);
    pb.line_to(l + r, b);
    pb.cubic_to(l + r - k, b, l, b - r + k, l, b - r);
    pb.line_to(l, t + r);
    pb.cubic_to(l, t + r - k, l + r - k, t, l + r, t);
    pb.close();
    pb.finish()
}
