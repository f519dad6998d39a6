//! Manifest documents written next to exported icons.
//!
//! Manifests are built from the list of files an export actually wrote, never
//! from the static tables directly, so a skipped file is also absent from the
//! manifest. Every run writes fresh documents; nothing is merged with a
//! previous run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::export::WrittenIcon;
use crate::platform::{IconMeta, Platform};

/// File name of the Apple asset catalog manifest.
pub const CONTENTS_JSON: &str = "Contents.json";
/// File name of the web app manifest.
pub const WEB_MANIFEST_JSON: &str = "manifest.json";

const AUTHOR: &str = "iconsmith";
const CATALOG_VERSION: u32 = 1;

// ============================================================================
// Apple asset catalog
// ============================================================================

/// One `images` entry of a `Contents.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconFileReference {
    pub filename: String,
    pub idiom: String,
    pub scale: String,
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogInfo {
    pub author: String,
    pub version: u32,
}

impl Default for CatalogInfo {
    fn default() -> Self {
        Self {
            author: AUTHOR.to_string(),
            version: CATALOG_VERSION,
        }
    }
}

/// An asset catalog `Contents.json` document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentsJson {
    pub images: Vec<IconFileReference>,
    pub info: CatalogInfo,
}

impl ContentsJson {
    /// Builds the catalog from written icons, keeping their order.
    ///
    /// Icons without Apple metadata are ignored.
    pub fn from_written(written: &[WrittenIcon]) -> Self {
        let images = written
            .iter()
            .filter_map(|icon| match icon.spec.meta {
                IconMeta::Apple { idiom, scale, size } => Some(IconFileReference {
                    filename: icon.spec.filename.to_string(),
                    idiom: idiom.to_string(),
                    scale: scale.to_string(),
                    size: size.to_string(),
                }),
                _ => None,
            })
            .collect();

        Self {
            images,
            info: CatalogInfo::default(),
        }
    }
}

// ============================================================================
// Web app manifest
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebManifestIcon {
    pub src: String,
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// A minimal web app manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebManifest {
    pub name: String,
    pub short_name: String,
    pub icons: Vec<WebManifestIcon>,
    pub theme_color: String,
    pub background_color: String,
    pub display: String,
}

impl WebManifest {
    /// Builds the manifest from written icons flagged for it, keeping order.
    pub fn from_written(written: &[WrittenIcon]) -> Self {
        let icons = written
            .iter()
            .filter(|icon| icon.spec.meta == IconMeta::WebManifest)
            .map(|icon| WebManifestIcon {
                src: icon.spec.filename.to_string(),
                sizes: format!("{0}x{0}", icon.spec.pixel_size),
                mime_type: "image/png".to_string(),
            })
            .collect();

        Self {
            name: "My App".to_string(),
            short_name: "App".to_string(),
            icons,
            theme_color: "#ffffff".to_string(),
            background_color: "#ffffff".to_string(),
            display: "standalone".to_string(),
        }
    }
}

// ============================================================================
// Writing
// ============================================================================

/// What a manifest describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestTarget {
    /// A single platform folder.
    Platform(Platform),
    /// The shared `Apple/` folder of a unified export.
    UnifiedApple,
}

/// Writes the manifest for `target` into `folder`.
///
/// Returns the manifest path, or `None` for platforms without a manifest
/// (Android).
pub fn write_manifest(
    target: ManifestTarget,
    written: &[WrittenIcon],
    folder: &Path,
) -> Result<Option<PathBuf>> {
    let (file_name, value) = match target {
        ManifestTarget::Platform(Platform::Android) => return Ok(None),
        ManifestTarget::Platform(Platform::Web) => (
            WEB_MANIFEST_JSON,
            serde_json::to_value(WebManifest::from_written(written))?,
        ),
        ManifestTarget::Platform(_) | ManifestTarget::UnifiedApple => (
            CONTENTS_JSON,
            serde_json::to_value(ContentsJson::from_written(written))?,
        ),
    };

    // Round-tripping through `Value` sorts object keys.
    let mut bytes = serde_json::to_vec_pretty(&value)?;
    bytes.push(b'\n');

    fs::create_dir_all(folder).map_err(|e| Error::from_io(folder, e))?;
    let path = folder.join(file_name);
    fs::write(&path, bytes).map_err(|e| Error::from_io(&path, e))?;

    log::debug!("wrote manifest {}", path.display());
    Ok(Some(path))
}
