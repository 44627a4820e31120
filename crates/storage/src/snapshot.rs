//! On-disk snapshot of a store
//!
//! A snapshot is the full key/value map encoded as MessagePack. Writes go to
//! a sibling temp file that is then renamed over the target, so a crash
//! mid-write leaves the previous snapshot intact.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use stowage_core::{Error, Result, StoreValue};
use tracing::debug;

/// Read a snapshot file
///
/// A missing file is an empty store, not an error.
///
/// # Errors
///
/// Returns `Error::Io` if the file exists but cannot be read, and
/// `Error::Persistence` if its contents do not decode.
pub fn read_snapshot(path: &Path) -> Result<HashMap<String, StoreValue>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(target: "stowage::store", path = %path.display(), "No snapshot yet");
            return Ok(HashMap::new());
        }
        Err(e) => return Err(e.into()),
    };
    let entries: HashMap<String, StoreValue> = rmp_serde::from_slice(&bytes).map_err(|e| {
        Error::Persistence(format!(
            "Corrupt snapshot '{}': {}",
            path.display(),
            e
        ))
    })?;
    debug!(target: "stowage::store", path = %path.display(), keys = entries.len(), "Snapshot loaded");
    Ok(entries)
}

/// Atomically replace the snapshot at `path` with `entries`
pub fn write_snapshot(path: &Path, entries: &HashMap<String, StoreValue>) -> Result<()> {
    let bytes = rmp_serde::to_vec(entries)
        .map_err(|e| Error::Persistence(format!("Failed to encode snapshot: {}", e)))?;
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    let tmp = temp_path(path);
    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, path)?;
    debug!(target: "stowage::store", path = %path.display(), keys = entries.len(), "Snapshot written");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
