//! The edit pipeline and its per-session state machine.
//!
//! [`EditPipeline::apply`] is a pure function from (source, parameters) to the
//! edited image. [`EditSession`] holds the original source next to the current
//! parameters and always re-derives the edited image from the original, so
//! repeated edits never compound.
//!
//! # States
//!
//! ```text
//!            apply_changes (params differ)
//! Unedited ─────────────────────────────────► Dirty
//!    ▲                                          │
//!    └──────────── reset / load_new_source ─────┘
//! ```

use image::RgbaImage;

use crate::compose::compose;
use crate::filter::apply_filters;
use crate::params::EditParameters;
use crate::raster::SourceImage;

// ============================================================================
// EditPipeline
// ============================================================================

/// Filter chain followed by the compositor.
pub struct EditPipeline;

impl EditPipeline {
    /// Renders `source` with `params` applied.
    ///
    /// Stages run in a fixed order: adjustments, tint, then shape, background,
    /// border and overlay compositing. Default parameters return an exact copy
    /// of `source`.
    pub fn apply(source: &RgbaImage, params: &EditParameters) -> RgbaImage {
        let filtered = apply_filters(source, &params.adjustments, &params.tint);
        compose(
            &filtered,
            &params.shape,
            params.padding_percent(),
            &params.background,
            &params.border,
            &params.overlay,
        )
    }
}

// ============================================================================
// EditSession
// ============================================================================

/// Whether the edited image differs from the source by user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditState {
    /// Parameters are at their defaults and the edited image is the source.
    #[default]
    Unedited,
    /// At least one parameter change has been applied since the last reset.
    Dirty,
}

/// The original image, the current parameters and the derived edited image.
///
/// The source is never modified.
#[derive(Debug, Clone)]
pub struct EditSession {
    source: SourceImage,
    params: EditParameters,
    edited: RgbaImage,
    state: EditState,
}

impl EditSession {
    /// Starts a session on `source` with default parameters.
    pub fn new(source: SourceImage) -> Self {
        let edited = source.pixels().clone();
        Self {
            source,
            params: EditParameters::default(),
            edited,
            state: EditState::Unedited,
        }
    }

    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    pub fn params(&self) -> &EditParameters {
        &self.params
    }

    pub fn edited(&self) -> &RgbaImage {
        &self.edited
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    /// Applies a new parameter set, recomputing from the original source.
    ///
    /// Returns true if the parameters changed and the image was recomputed.
    pub fn apply_changes(&mut self, params: EditParameters) -> bool {
        if params == self.params {
            return false;
        }

        self.edited = EditPipeline::apply(self.source.pixels(), &params);
        self.params = params;
        self.state = EditState::Dirty;
        true
    }

    /// Replaces the source image and resets everything to defaults.
    pub fn load_new_source(&mut self, source: SourceImage) {
        *self = Self::new(source);
    }

    /// Clears parameters to defaults and restores the edited image to the source.
    pub fn reset(&mut self) {
        self.params = EditParameters::default();
        self.edited = self.source.pixels().clone();
        self.state = EditState::Unedited;
    }
}
