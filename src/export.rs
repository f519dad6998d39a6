//! Exact-size PNG export for every selected platform.
//!
//! # Layout
//!
//! ```text
//! <root>/AppIcons-<unix ts>/
//!     iOS/      iPhone_20pt@2x.png ... Contents.json
//!     macOS/    icon_16x16.png ... Contents.json
//!     watchOS/  AppIcon24x24@2x.png ... Contents.json
//!     Apple/    (unified mode: the three above in one folder, one Contents.json)
//!     Android/  mipmap-mdpi/ic_launcher.png ... ic_launcher-playstore.png
//!     Web/      favicon-16x16.png ... manifest.json
//! ```
//!
//! Export is best effort: a file that fails to encode or write is logged,
//! recorded in [`ExportReport::failed`] and skipped. Only failing to create
//! the run folder aborts the job.

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::manifest::{write_manifest, ManifestTarget};
use crate::platform::{IconSpec, Platform, UNIFIED_APPLE_FOLDER};
use crate::render::render;

/// Prefix of the per-run output folder.
pub const RUN_FOLDER_PREFIX: &str = "AppIcons-";

// ============================================================================
// Results
// ============================================================================

/// A PNG that was written successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenIcon {
    pub spec: IconSpec,
    pub path: PathBuf,
}

/// A file that was skipped, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of exporting one platform (or the unified Apple folder).
#[derive(Debug, Clone, Default)]
pub struct PlatformExport {
    pub folder: PathBuf,
    pub written: Vec<WrittenIcon>,
    pub manifest: Option<PathBuf>,
    pub failed: Vec<FailedFile>,
}

/// Outcome of a whole export job.
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    /// The `AppIcons-<ts>` folder created for this run.
    pub output_folder: PathBuf,
    pub written: Vec<WrittenIcon>,
    pub manifests: Vec<PathBuf>,
    pub failed: Vec<FailedFile>,
}

impl ExportReport {
    /// True when no file was skipped.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    fn absorb(&mut self, export: PlatformExport) {
        self.written.extend(export.written);
        self.manifests.extend(export.manifest);
        self.failed.extend(export.failed);
    }
}

// ============================================================================
// Platform export
// ============================================================================

/// Renders every icon of `platform` into `<root>/<platform folder>/` and
/// writes its manifest.
pub fn export_platform(image: &RgbaImage, platform: Platform, root: &Path) -> PlatformExport {
    let folder = root.join(platform.folder_name());
    let export = write_icons(image, platform.icons().iter(), folder);
    finish(export, ManifestTarget::Platform(platform))
}

/// Renders the icons of every Apple platform in `platforms` into one shared
/// `<root>/Apple/` folder with a single manifest.
///
/// Non-Apple platforms in `platforms` are ignored. Icons keep their table
/// order, iOS first, then macOS, then watchOS.
pub fn export_unified_apple(image: &RgbaImage, platforms: &[Platform], root: &Path) -> PlatformExport {
    let folder = root.join(UNIFIED_APPLE_FOLDER);
    let specs = Platform::ALL
        .iter()
        .filter(|p| p.is_apple() && platforms.contains(*p))
        .flat_map(|p| p.icons().iter());
    let export = write_icons(image, specs, folder);
    finish(export, ManifestTarget::UnifiedApple)
}

fn write_icons<'a>(
    image: &RgbaImage,
    specs: impl Iterator<Item = &'a IconSpec>,
    folder: PathBuf,
) -> PlatformExport {
    let mut export = PlatformExport {
        folder,
        ..PlatformExport::default()
    };
    // Several entries share a pixel size; render each size once.
    let mut rendered: HashMap<u32, RgbaImage> = HashMap::new();

    for spec in specs {
        let path = export.folder.join(spec.filename);
        let icon = rendered
            .entry(spec.pixel_size)
            .or_insert_with(|| render(image, spec.pixel_size, spec.pixel_size));

        match write_png(icon, &path) {
            Ok(()) => {
                log::debug!("wrote {}x{} {}", spec.pixel_size, spec.pixel_size, path.display());
                export.written.push(WrittenIcon { spec: *spec, path });
            }
            Err(err) => {
                log::warn!("skipping {}: {err}", path.display());
                export.failed.push(FailedFile {
                    path,
                    reason: err.to_string(),
                });
            }
        }
    }

    export
}

fn finish(mut export: PlatformExport, target: ManifestTarget) -> PlatformExport {
    match write_manifest(target, &export.written, &export.folder) {
        Ok(manifest) => export.manifest = manifest,
        Err(err) => {
            log::warn!("manifest for {} not written: {err}", export.folder.display());
            export.failed.push(FailedFile {
                path: export.folder.clone(),
                reason: err.to_string(),
            });
        }
    }
    export
}

/// Encodes `image` as PNG and writes it, creating parent folders.
fn write_png(image: &RgbaImage, path: &Path) -> Result<()> {
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Png)
        .map_err(|source| Error::Encode {
            path: path.to_path_buf(),
            source,
        })?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::from_io(parent, e))?;
    }
    fs::write(path, bytes.into_inner()).map_err(|e| Error::from_io(path, e))
}

// ============================================================================
// Job
// ============================================================================

/// Which platforms an export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlatformSelection {
    pub ios: bool,
    pub macos: bool,
    pub watchos: bool,
    pub android: bool,
    pub web: bool,
    /// Route iOS, macOS and watchOS into one shared `Apple/` folder.
    pub unified_apple: bool,
}

impl Default for PlatformSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl PlatformSelection {
    /// Every platform selected, separate Apple folders.
    pub fn all() -> Self {
        Self {
            ios: true,
            macos: true,
            watchos: true,
            android: true,
            web: true,
            unified_apple: false,
        }
    }

    /// Nothing selected.
    pub fn none() -> Self {
        Self {
            ios: false,
            macos: false,
            watchos: false,
            android: false,
            web: false,
            unified_apple: false,
        }
    }

    /// Selects exactly `platforms`.
    pub fn only(platforms: &[Platform]) -> Self {
        let mut selection = Self::none();
        for platform in platforms {
            selection.set(*platform, true);
        }
        selection
    }

    pub fn with_unified_apple(mut self, unified: bool) -> Self {
        self.unified_apple = unified;
        self
    }

    pub fn is_selected(&self, platform: Platform) -> bool {
        match platform {
            Platform::Ios => self.ios,
            Platform::MacOs => self.macos,
            Platform::WatchOs => self.watchos,
            Platform::Android => self.android,
            Platform::Web => self.web,
        }
    }

    pub fn set(&mut self, platform: Platform, selected: bool) {
        match platform {
            Platform::Ios => self.ios = selected,
            Platform::MacOs => self.macos = selected,
            Platform::WatchOs => self.watchos = selected,
            Platform::Android => self.android = selected,
            Platform::Web => self.web = selected,
        }
    }

    /// The selected platforms in export order.
    pub fn platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|p| self.is_selected(*p))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms().is_empty()
    }
}

/// An immutable snapshot of everything one export run needs.
#[derive(Debug, Clone)]
pub struct ExportJob {
    image: RgbaImage,
    output_root: PathBuf,
    selection: PlatformSelection,
}

impl ExportJob {
    /// Validates the request. No filesystem work happens here.
    pub fn new(image: RgbaImage, output_root: impl Into<PathBuf>, selection: PlatformSelection) -> Result<Self> {
        if selection.is_empty() {
            return Err(Error::NoPlatformSelected);
        }
        Ok(Self {
            image,
            output_root: output_root.into(),
            selection,
        })
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn selection(&self) -> &PlatformSelection {
        &self.selection
    }

    /// Runs the export on the current thread.
    pub fn run(&self) -> Result<ExportReport> {
        let platforms = self.selection.platforms();
        let output_folder = create_run_folder(&self.output_root)?;
        log::info!(
            "exporting {} platform(s) to {}",
            platforms.len(),
            output_folder.display()
        );

        let mut report = ExportReport {
            output_folder,
            ..ExportReport::default()
        };

        let unified = self.selection.unified_apple && platforms.iter().any(Platform::is_apple);
        if unified {
            let apple = export_unified_apple(&self.image, &platforms, &report.output_folder);
            report.absorb(apple);
        }
        for platform in platforms {
            if unified && platform.is_apple() {
                continue;
            }
            let export = export_platform(&self.image, platform, &report.output_folder);
            report.absorb(export);
        }

        log::info!(
            "export finished: {} written, {} skipped",
            report.written.len(),
            report.failed.len()
        );
        Ok(report)
    }

    /// Runs the export on tokio's blocking pool and waits for the report.
    pub async fn run_on_worker(self) -> Result<ExportReport> {
        tokio::task::spawn_blocking(move || self.run())
            .await
            .map_err(|e| Error::Worker(e.to_string()))?
    }
}

/// Creates a fresh `AppIcons-<ts>` folder under `root`.
///
/// A numeric suffix is appended if a folder with the same timestamp already
/// exists, so two runs never share a folder.
fn create_run_folder(root: &Path) -> Result<PathBuf> {
    fs::create_dir_all(root).map_err(|e| Error::from_io(root, e))?;

    let base = format!("{RUN_FOLDER_PREFIX}{}", chrono::Utc::now().timestamp());
    let mut candidate = root.join(&base);
    let mut suffix = 2;
    loop {
        match fs::create_dir(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                candidate = root.join(format!("{base}-{suffix}"));
                suffix += 1;
            }
            Err(e) => return Err(Error::from_io(&candidate, e)),
        }
    }
}
