//! Snapshot medium backed by a file on the host.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use gauge_common::config::SnapshotMedium;
use gauge_common::StorageError;
use log::error;

/// Stores the configuration snapshot in a single file.
///
/// A missing file reads as empty, so the first run starts from defaults.
#[derive(Debug)]
pub struct FileMedium {
    path: PathBuf,
}

impl FileMedium {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    pub fn path(&self) -> &PathBuf { &self.path }
}

impl SnapshotMedium for FileMedium {
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> Result<usize, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(0),
            Err(err) => {
                error!("Reading {}: {err}", self.path.display());
                return Err(StorageError::Medium);
            }
        };
        if bytes.len() > buf.len() {
            return Err(StorageError::Corrupted);
        }
        buf[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }

    fn write(
        &mut self,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        fs::write(&self.path, bytes).map_err(|err| {
            error!("Writing {}: {err}", self.path.display());
            StorageError::Medium
        })
    }
}
