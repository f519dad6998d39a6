//! Error types shared by the edit pipeline and the export engine.
//!
//! Validation failures are raised before any filesystem work starts.
//! Filesystem failures are classified so that permission problems can be
//! reported with an actionable message. Failures of a single icon file during
//! export are not errors at this level; they are collected in
//! [`ExportReport::failed`](crate::ExportReport).

use std::io;
use std::path::{Path, PathBuf};

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the crate can surface to a caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The export was requested with every platform toggle off.
    #[error("select at least one platform before generating icons")]
    NoPlatformSelected,

    /// The export was requested before a source image was loaded.
    #[error("load a source image before generating icons")]
    NoSourceImage,

    /// An export job is already running for this session.
    #[error("an icon export is already in progress")]
    JobInFlight,

    /// The source bytes could not be decoded into an RGBA raster.
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// A color string was not `#RRGGBB` or `#RRGGBBAA`.
    #[error("invalid color {0:?}, expected #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),

    /// The output location is not writable by the current user.
    #[error("permission denied writing to {}, choose a different folder", path.display())]
    PermissionDenied { path: PathBuf },

    /// Any other filesystem failure.
    #[error("file system error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// PNG encoding failed for one output file.
    #[error("could not encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A manifest or preferences document could not be (de)serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The background export worker stopped before reporting a result.
    #[error("export worker failed: {0}")]
    Worker(String),
}

impl Error {
    /// Wraps an I/O error, singling out permission problems.
    pub fn from_io(path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match source.kind() {
            io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem => {
                Self::PermissionDenied { path }
            }
            _ => Self::Io { path, source },
        }
    }

    /// Returns true for errors rejected before any work began.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NoPlatformSelected | Self::NoSourceImage | Self::JobInFlight
        )
    }
}
