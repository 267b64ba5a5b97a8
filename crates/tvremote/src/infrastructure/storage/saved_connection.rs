//! Single-record JSON store for the remembered pairing.
//!
//! Every successful connect overwrites the file wholesale.  A missing file and
//! a file that no longer parses are both treated as "nothing saved": the worst
//! outcome of a corrupt record is one extra approval prompt on the TV.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;
use tvremote_core::SavedConnection;

/// Error type for saved connection persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error accessing saved connection at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize saved connection: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// File-backed holder of the one [`SavedConnection`].
#[derive(Debug, Clone)]
pub struct SavedConnectionStore {
    path: PathBuf,
}

impl SavedConnectionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the saved record, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] for read failures other than "not found".
    /// Unparseable content is logged and reported as `Ok(None)`.
    pub fn load(&self) -> Result<Option<SavedConnection>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_str(&content) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!("ignoring unreadable saved connection at {}: {e}", self.path.display());
                Ok(None)
            }
        }
    }

    /// Replaces the saved record with `record`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory or file cannot be written.
    pub fn save(&self, record: &SavedConnection) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(record)?;
        std::fs::write(&self.path, content).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
