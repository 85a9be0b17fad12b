//! Whole-file JSON persistence for the catalog snapshot
//!
//! Every write replaces the file: serialize to `<file>.tmp`, fsync, rename over
//! the target. An exclusive `fs2` lock on `<file>.lock` serializes writers
//! across processes sharing the same data file.

use super::types::Catalog;
use crate::error::AppError;
use fs2::FileExt;
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed catalog file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize catalog: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<PersistError> for AppError {
    fn from(err: PersistError) -> Self {
        AppError::Persistence(err.to_string())
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> PersistError + '_ {
    move |source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Sibling path with a suffix appended to the file name
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("catalog"));
    name.push(suffix);
    path.with_file_name(name)
}

/// Read the snapshot; `Ok(None)` when the file does not exist
pub fn load(path: &Path) -> Result<Option<Catalog>, PersistError> {
    if !path.exists() {
        return Ok(None);
    }

    let data = fs::read_to_string(path).map_err(io_err(path))?;
    let catalog = serde_json::from_str(&data).map_err(|source| PersistError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Loaded catalog snapshot from {}", path.display());
    Ok(Some(catalog))
}

/// Atomically replace the snapshot file with `catalog`
pub fn write_atomic(path: &Path, catalog: &Catalog) -> Result<(), PersistError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
    }

    let data = serde_json::to_string_pretty(catalog)?;
    let tmp_path = sibling(path, ".tmp");
    let lock_path = sibling(path, ".lock");

    let lock_file = fs::File::create(&lock_path).map_err(io_err(&lock_path))?;
    lock_file.lock_exclusive().map_err(io_err(&lock_path))?;

    let result = write_and_rename(&tmp_path, path, data.as_bytes());

    // Lock is also dropped with the file handle
    let _ = lock_file.unlock();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_and_rename(tmp_path: &Path, path: &Path, data: &[u8]) -> Result<(), PersistError> {
    let mut tmp = fs::File::create(tmp_path).map_err(io_err(tmp_path))?;
    tmp.write_all(data).map_err(io_err(tmp_path))?;
    tmp.sync_all().map_err(io_err(tmp_path))?;
    drop(tmp);

    fs::rename(tmp_path, path).map_err(io_err(path))?;
    debug!("Wrote catalog snapshot to {}", path.display());
    Ok(())
}
