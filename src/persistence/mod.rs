//! Save/load persistence with backup rotation
//!
//! Features:
//! - Versioned JSON envelope
//! - Backup rotation (tmp → save, old save → backup)
//! - Corruption detection and recovery from the backup

pub mod envelope;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use envelope::{Envelope, SAVE_VERSION};

use crate::error::PersistError;

/// `path` with `suffix` appended to the file name
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

pub fn backup_path(path: &Path) -> PathBuf {
    sibling(path, ".bak")
}

fn tmp_path(path: &Path) -> PathBuf {
    sibling(path, ".tmp")
}

/// Write `payload` to `path`, keeping the previous file as a backup
pub fn save<T: Serialize>(path: &Path, payload: &T) -> Result<(), PersistError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let json = Envelope::new(payload, crate::now_millis()).to_json()?;
    let tmp = tmp_path(path);
    fs::write(&tmp, json)?;

    if path.exists() {
        fs::rename(path, backup_path(path))?;
    }
    fs::rename(&tmp, path)?;
    log::debug!("Saved {}", path.display());
    Ok(())
}

fn read_envelope<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PersistError> {
    match fs::read_to_string(path) {
        Ok(json) => Ok(Some(Envelope::<T>::from_json(&json)?.payload)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Load a payload from `path`.
///
/// Returns `Ok(None)` when neither the file nor its backup exists. A corrupt
/// main file falls back to the backup; a newer format version does not.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PersistError> {
    let main_err = match read_envelope(path) {
        Ok(Some(payload)) => return Ok(Some(payload)),
        Ok(None) => None,
        Err(e @ PersistError::UnsupportedVersion { .. }) => return Err(e),
        Err(e) => {
            log::warn!("Save {} unreadable ({}), trying backup", path.display(), e);
            Some(e)
        }
    };

    let backup = backup_path(path);
    match read_envelope(&backup) {
        Ok(Some(payload)) => {
            log::warn!("Recovered from backup {}", backup.display());
            Ok(Some(payload))
        }
        Ok(None) => main_err.map_or(Ok(None), Err),
        Err(backup_err) => Err(main_err.unwrap_or(backup_err)),
    }
}

/// Remove a save and its backup
pub fn remove(path: &Path) -> Result<(), PersistError> {
    for p in [path.to_path_buf(), backup_path(path)] {
        match fs::remove_file(&p) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
