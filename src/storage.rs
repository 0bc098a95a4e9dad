//! Local persistence for the planned trip.
//!
//! The dashboard reads one record written by the trip form:
//!
//! ```text
//! <root>/
//!   trip.json    # {"startLocation": ..., "destination": ...}
//! ```
//!
//! Saving always fully replaces the previous record. A missing or
//! malformed file is a valid "no trip planned" state, never an error.

use std::{fs, io, path::PathBuf};

use crate::model::Trip;

/// File name standing in for the single fixed storage key.
const TRIP_FILE: &str = "trip.json";

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// Local file-based storage for the trip record.
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Creates a new storage instance rooted at the given directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Returns the default storage root: `~/.greenwave/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".greenwave"))
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Persists the trip, replacing any previous record.
    pub fn save_trip(&self, trip: &Trip) -> Result<()> {
        let json = serde_json::to_string_pretty(trip)?;
        fs::write(self.trip_path(), json)?;
        Ok(())
    }

    /// Loads the stored trip, if one exists.
    ///
    /// A missing file means no trip has been planned. A file that fails
    /// to parse is treated the same way — the record has no schema
    /// version, so anything unreadable counts as absent.
    pub fn load_trip(&self) -> Result<Option<Trip>> {
        let path = self.trip_path();
        let json = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&json) {
            Ok(trip) => Ok(Some(trip)),
            Err(e) => {
                tracing::warn!("discarding unreadable trip record at {}: {e}", path.display());
                Ok(None)
            }
        }
    }

    fn trip_path(&self) -> PathBuf {
        self.root.join(TRIP_FILE)
    }
}
