//! Error types for the mapping store.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the mapping store.
///
/// `InvalidFormat` and `EmptyStore` are recoverable, user-facing conditions.
/// `Io` covers every backing-store failure other than "file does not exist yet".
#[derive(Debug, Error)]
pub enum StoreError {
    /// Raw "add" input could not be split into a token and a character.
    #[error("invalid mapping format '{input}': expected '<token> <character>'")]
    InvalidFormat { input: String },

    /// Delete-last requested while the mapping holds no entries.
    #[error("no mappings to delete")]
    EmptyStore,

    /// Backing store could not be read or written.
    #[error("mapping store {path} unavailable: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn invalid_format(input: &str) -> Self {
        Self::InvalidFormat {
            input: input.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for conditions a front end should report and carry on from.
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::InvalidFormat { .. } | Self::EmptyStore)
    }
}

/// Result type for mapping store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
