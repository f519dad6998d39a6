//! Raster and geometry types used by the pipeline.
//!
//! [`SourceImage`] is the imported image the user edits. The pipeline only
//! ever reads it; every edit is rendered into a fresh buffer.

use std::path::Path;

use image::RgbaImage;

use crate::error::{Error, Result};

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The shorter side, used as the base for percentage parameters.
    pub fn min_side(&self) -> u32 {
        self.width.min(self.height)
    }
}

/// A rectangle in floating point canvas coordinates (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectF {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Creates a rectangle covering a whole canvas.
    pub fn from_size(size: SizePx) -> Self {
        Self::new(0.0, 0.0, size.width as f32, size.height as f32)
    }

    /// Shrinks the rectangle by `amount` on every side.
    ///
    /// Insetting past the center collapses the rectangle to zero area.
    pub fn inset(&self, amount: f32) -> Self {
        let width = (self.width - amount * 2.0).max(0.0);
        let height = (self.height - amount * 2.0).max(0.0);
        Self::new(self.x + amount, self.y + amount, width, height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Converts to a tiny-skia rectangle, `None` when the area is empty.
    pub fn to_skia(&self) -> Option<resvg::tiny_skia::Rect> {
        if self.is_empty() {
            return None;
        }
        resvg::tiny_skia::Rect::from_xywh(self.x, self.y, self.width, self.height)
    }
}

/// The user's imported image, decoded to straight-alpha RGBA8.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    data: RgbaImage,
}

impl SourceImage {
    /// Wraps an already decoded buffer.
    pub fn new(data: RgbaImage) -> Self {
        Self { data }
    }

    /// Decodes any format the `image` crate understands.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)?;
        let data = decoded.to_rgba8();
        log::debug!("decoded source image {}x{}", data.width(), data.height());
        Ok(Self { data })
    }

    /// Reads and decodes an image file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| Error::from_io(path, e))?;
        Self::from_bytes(&bytes)
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.data
    }

    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.data.width(), self.data.height())
    }
}
