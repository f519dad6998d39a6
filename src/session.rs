//! One editing session: a source image, its edits, the platform selection and
//! the state of the current or last export.
//!
//! Export is launched with a snapshot of the edited image, so edits made
//! while a job runs never reach that job. Only one job may be in flight.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::{Error, Result};
use crate::export::{ExportJob, ExportReport, PlatformSelection};
use crate::params::EditParameters;
use crate::pipeline::{EditSession, EditState};
use crate::preferences::PersistedPreferences;
use crate::raster::SourceImage;

/// Flags describing the export lifecycle.
#[derive(Debug, Clone, Default)]
pub struct GenerationStatus {
    pub is_generating: bool,
    pub generation_complete: bool,
    pub output_folder: Option<PathBuf>,
    pub last_report: Option<ExportReport>,
}

impl GenerationStatus {
    fn record(&mut self, result: &Result<ExportReport>) {
        self.is_generating = false;
        match result {
            Ok(report) => {
                self.generation_complete = true;
                self.output_folder = Some(report.output_folder.clone());
                self.last_report = Some(report.clone());
            }
            Err(err) => {
                log::warn!("icon generation failed: {err}");
                self.generation_complete = false;
            }
        }
    }
}

/// Clears `is_generating` if the generation future is dropped mid-flight.
struct InFlight<'a>(&'a mut GenerationStatus);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.is_generating = false;
    }
}

#[derive(Debug, Clone, Default)]
pub struct IconSession {
    edit: Option<EditSession>,
    selection: PlatformSelection,
    output_root: Option<PathBuf>,
    status: GenerationStatus,
}

impl IconSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session from saved preferences.
    pub fn with_preferences(preferences: &PersistedPreferences) -> Self {
        Self {
            selection: preferences.selection,
            output_root: preferences.last_output_folder.clone(),
            ..Self::default()
        }
    }

    /// Snapshot of what should be persisted for the next session.
    pub fn preferences(&self) -> PersistedPreferences {
        PersistedPreferences {
            selection: self.selection,
            last_output_folder: self.output_root.clone(),
        }
    }

    // ------------------------------------------------------------------------
    // Source and edits
    // ------------------------------------------------------------------------

    /// Decodes and loads the image at `path`.
    ///
    /// On failure the current source and edits are left untouched.
    pub fn load_source(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let source = SourceImage::open(path)?;
        self.set_source(source);
        Ok(())
    }

    /// Decodes and loads an encoded image from memory.
    pub fn load_source_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let source = SourceImage::from_bytes(bytes)?;
        self.set_source(source);
        Ok(())
    }

    /// Replaces the source and resets every parameter.
    pub fn set_source(&mut self, source: SourceImage) {
        log::debug!(
            "loaded {}x{} source image",
            source.dimensions().width,
            source.dimensions().height
        );
        match &mut self.edit {
            Some(edit) => edit.load_new_source(source),
            None => self.edit = Some(EditSession::new(source)),
        }
        self.status.generation_complete = false;
    }

    pub fn has_source(&self) -> bool {
        self.edit.is_some()
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.edit.as_ref().map(EditSession::source)
    }

    pub fn edited_image(&self) -> Option<&RgbaImage> {
        self.edit.as_ref().map(EditSession::edited)
    }

    pub fn params(&self) -> Option<&EditParameters> {
        self.edit.as_ref().map(EditSession::params)
    }

    pub fn edit_state(&self) -> Option<EditState> {
        self.edit.as_ref().map(EditSession::state)
    }

    /// Recomputes the edited image from the source with `params`.
    ///
    /// Returns whether anything changed.
    pub fn apply_changes(&mut self, params: EditParameters) -> Result<bool> {
        let edit = self.edit.as_mut().ok_or(Error::NoSourceImage)?;
        Ok(edit.apply_changes(params))
    }

    /// Restores default parameters. Does nothing without a source.
    pub fn reset(&mut self) {
        if let Some(edit) = &mut self.edit {
            edit.reset();
        }
    }

    // ------------------------------------------------------------------------
    // Export configuration
    // ------------------------------------------------------------------------

    pub fn selection(&self) -> &PlatformSelection {
        &self.selection
    }

    pub fn set_selection(&mut self, selection: PlatformSelection) {
        self.selection = selection;
    }

    /// The chosen output root, or the system temporary directory.
    pub fn output_root(&self) -> PathBuf {
        self.output_root
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    pub fn set_output_root(&mut self, root: impl Into<PathBuf>) {
        self.output_root = Some(root.into());
    }

    pub fn status(&self) -> &GenerationStatus {
        &self.status
    }

    // ------------------------------------------------------------------------
    // Generation
    // ------------------------------------------------------------------------

    /// Validates the request and snapshots it into a job.
    ///
    /// Fails without touching the filesystem or the status flags when a job is
    /// already running, no source is loaded, or no platform is selected.
    pub fn start_generation(&mut self) -> Result<ExportJob> {
        if self.status.is_generating {
            return Err(Error::JobInFlight);
        }
        let image = self.edited_image().ok_or(Error::NoSourceImage)?.clone();
        let job = ExportJob::new(image, self.output_root(), self.selection)?;

        self.status.is_generating = true;
        self.status.generation_complete = false;
        Ok(job)
    }

    /// Records the outcome of a job started with [`start_generation`](Self::start_generation).
    pub fn finish_generation(&mut self, result: &Result<ExportReport>) {
        self.status.record(result);
    }

    /// Validates, runs the export on a worker thread and records the result.
    ///
    /// Dropping the future before it completes releases the session for a new
    /// job; the worker already started still finishes writing its own folder.
    pub async fn generate_icons(&mut self) -> Result<ExportReport> {
        let job = self.start_generation()?;
        let in_flight = InFlight(&mut self.status);
        let result = job.run_on_worker().await;
        in_flight.0.record(&result);
        result
    }
}
