//! Store configuration: where mappings and the translation history live.

use std::path::PathBuf;

/// Default backing store, relative to the working directory.
pub const DEFAULT_MAPPINGS_PATH: &str = "textas.txt";
/// Default audit trail, relative to the working directory.
pub const DEFAULT_HISTORY_PATH: &str = "translations.txt";

/// Paths used by a [`MappingStore`](crate::MappingStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Backing store file, one `<token> <character>` per line.
    pub mappings_path: PathBuf,
    /// Translation audit trail. `None` disables it.
    pub history_path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            mappings_path: PathBuf::from(DEFAULT_MAPPINGS_PATH),
            history_path: Some(PathBuf::from(DEFAULT_HISTORY_PATH)),
        }
    }
}

impl StoreConfig {
    /// Config for the given mappings file, with no history.
    #[must_use]
    pub fn new(mappings_path: impl Into<PathBuf>) -> Self {
        Self {
            mappings_path: mappings_path.into(),
            history_path: None,
        }
    }

    #[must_use]
    pub fn with_mappings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.mappings_path = path.into();
        self
    }

    #[must_use]
    pub fn with_history_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn without_history(mut self) -> Self {
        self.history_path = None;
        self
    }
}
