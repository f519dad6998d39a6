//! Color filters applied before compositing.
//!
//! Two stages run in a fixed order:
//! 1. [`apply_adjustments`] - brightness, contrast, saturation, then hue
//! 2. [`apply_tint`] - constant-color tint blended by intensity
//!
//! Each stage returns a new image and leaves its input untouched. A stage whose
//! parameters are neutral returns an exact copy.

pub mod adjust;
pub mod tint;

pub use adjust::apply_adjustments;
pub use tint::apply_tint;

use image::RgbaImage;

use crate::params::{Adjustments, TintSettings};

/// Runs the whole filter chain: adjustments, then tint when enabled.
pub fn apply_filters(image: &RgbaImage, adjustments: &Adjustments, tint: &TintSettings) -> RgbaImage {
    let adjusted = apply_adjustments(image, adjustments);
    if tint.enabled {
        apply_tint(&adjusted, tint.color, tint.intensity)
    } else {
        adjusted
    }
}
