//! iconsmith: edit one source image and export every app icon size.
//!
//! This crate turns a single raster plus a set of cosmetic edits (color
//! adjustments, tint, shape mask, padding, background, border, text label)
//! into exact-size PNGs for iOS, macOS, watchOS, Android and the Web, along
//! with the manifests each platform expects.
//!
//! # Example
//!
//! ```no_run
//! use iconsmith::{
//!     EditParameters, IconSession, PlatformSelection, ShapeKind, ShapeSettings,
//! };
//!
//! # async fn run() -> iconsmith::Result<()> {
//! let mut session = IconSession::new();
//! session.load_source("logo.png")?;
//!
//! // Every edit is computed from the original image.
//! session.apply_changes(EditParameters::new().with_shape(ShapeSettings {
//!     kind: ShapeKind::Circle,
//!     ..ShapeSettings::default()
//! }))?;
//!
//! session.set_selection(PlatformSelection::all().with_unified_apple(true));
//! session.set_output_root("out");
//! let report = session.generate_icons().await?;
//! println!("icons written to {}", report.output_folder.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Pure Pipeline
//!
//! Without a session, [`EditPipeline::apply`] maps a source and a parameter
//! set to the edited image, and [`render`] resizes to an exact pixel size:
//!
//! ```
//! use iconsmith::{render, EditParameters, EditPipeline};
//! use image::{Rgba, RgbaImage};
//!
//! let source = RgbaImage::from_pixel(64, 64, Rgba([255, 0, 0, 255]));
//! let edited = EditPipeline::apply(&source, &EditParameters::default());
//! assert_eq!(edited, source);
//!
//! let icon = render(&edited, 29, 29);
//! assert_eq!(icon.dimensions(), (29, 29));
//! ```

mod compose;
mod debounce;
mod error;
mod export;
mod filter;
mod manifest;
mod params;
mod pipeline;
mod platform;
mod preferences;
mod raster;
mod render;
mod session;

pub use compose::compose;
pub use debounce::{Debouncer, COLOR_DEBOUNCE, TEXT_DEBOUNCE};
pub use error::{Error, Result};
pub use export::{
    export_platform, export_unified_apple, ExportJob, ExportReport, FailedFile, PlatformExport,
    PlatformSelection, WrittenIcon, RUN_FOLDER_PREFIX,
};
pub use filter::{apply_adjustments, apply_filters, apply_tint};
pub use manifest::{
    write_manifest, CatalogInfo, ContentsJson, IconFileReference, ManifestTarget, WebManifest,
    WebManifestIcon, CONTENTS_JSON, WEB_MANIFEST_JSON,
};
pub use params::{
    Adjustments, BackgroundSettings, BorderSettings, Color, EditParameters, OverlayKind,
    OverlaySettings, ShapeKind, ShapeSettings, TintSettings,
};
pub use pipeline::{EditPipeline, EditSession, EditState};
pub use platform::{IconMeta, IconSpec, Platform, UNIFIED_APPLE_FOLDER};
pub use preferences::PersistedPreferences;
pub use raster::{RectF, SizePx, SourceImage};
pub use render::render;
pub use session::{GenerationStatus, IconSession};
