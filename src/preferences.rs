//! Settings that outlive a session.
//!
//! Preferences are a plain value loaded at startup and handed to the session;
//! the caller decides when and where to write them back.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::export::PlatformSelection;

/// Platform toggles and the last output folder.
///
/// Edit parameters are not persisted: every loaded source starts from the
/// defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistedPreferences {
    pub selection: PlatformSelection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_output_folder: Option<PathBuf>,
}

impl PersistedPreferences {
    /// Reads preferences from `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no preferences at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(Error::from_io(path, e)),
        }
    }

    /// Writes preferences to `path` as pretty JSON, creating parent folders.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::from_io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| Error::from_io(path, e))
    }
}
