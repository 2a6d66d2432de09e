use crate::config::StoreConfig;
use crate::core::converter;
use crate::core::mapping::Mapping;
use crate::core::types::{Character, Direction, Token, Translation, TranslationRecord};
use crate::error::Result;
use crate::history::TranslationHistory;
use crate::persistence::{load_mappings, parse_mapping_input, save_mappings};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

// The mapping store owns the in-memory mapping and its backing file.
// One lock guards both: every mutation is applied to a copy, written to
// disk and only then committed, all while the lock is held.
pub struct MappingStore {
    mapping: Mutex<Mapping>,
    mappings_path: PathBuf,
    history: Option<TranslationHistory>,
}

impl MappingStore {
    /// Loads the backing store named in `config`, or starts empty if it does not exist.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let mapping = load_mappings(&config.mappings_path)?;
        tracing::info!(
            path = %config.mappings_path.display(),
            entries = mapping.len(),
            "mapping store opened"
        );
        Ok(Self {
            mapping: Mutex::new(mapping),
            mappings_path: config.mappings_path.clone(),
            history: config.history_path.clone().map(TranslationHistory::new),
        })
    }

    pub fn mappings_path(&self) -> &Path {
        &self.mappings_path
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// A read-only copy of the current mapping.
    pub fn snapshot(&self) -> Mapping {
        self.lock().clone()
    }

    /// Re-reads the backing file, discarding the in-memory state.
    pub fn reload(&self) -> Result<usize> {
        let mut guard = self.lock();
        *guard = load_mappings(&self.mappings_path)?;
        Ok(guard.len())
    }

    /// Parses `raw` as `<token> <character>` and stores it, last write wins.
    pub fn add_mapping(&self, raw: &str) -> Result<(Token, Character)> {
        let (token, character) = parse_mapping_input(raw)?;
        self.mutate(|mapping| {
            if let Some(previous) = mapping.insert(token.clone(), character.clone()) {
                tracing::debug!(%token, %previous, "replacing existing mapping");
            }
            Ok(())
        })?;
        tracing::info!(%token, %character, "mapping added");
        Ok((token, character))
    }

    /// Removes the most recently added association and returns it.
    pub fn delete_last_mapping(&self) -> Result<(Token, Character)> {
        let removed = self.mutate(Mapping::delete_last)?;
        tracing::info!(token = %removed.0, character = %removed.1, "last mapping deleted");
        Ok(removed)
    }

    /// Translates `text` against the current mapping and records it in the history.
    ///
    /// Never fails: unmapped units become placeholders and are counted in
    /// the result. A history write failure is logged and otherwise ignored.
    pub fn translate(&self, direction: Direction, text: &str) -> Translation {
        let translation = {
            let guard = self.lock();
            converter::translate(direction, text, &guard)
        };

        if translation.has_unknowns() {
            tracing::debug!(%direction, unknown = translation.unknown_count, "untranslatable units");
        }

        if let Some(history) = &self.history {
            let record = TranslationRecord {
                input: text.to_string(),
                output: translation.output.clone(),
            };
            if let Err(e) = history.append(&record) {
                tracing::warn!(path = %history.path().display(), error = %e, "could not append translation history");
            }
        }
        translation
    }

    fn mutate<T>(&self, op: impl FnOnce(&mut Mapping) -> Result<T>) -> Result<T> {
        let mut guard = self.lock();
        let mut next = guard.clone();
        let value = op(&mut next)?;
        save_mappings(&next, &self.mappings_path)?;
        *guard = next;
        Ok(value)
    }

    fn lock(&self) -> MutexGuard<'_, Mapping> {
        // The mapping is only replaced wholesale, so a poisoned lock still holds a consistent value.
        self.mapping.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use std::fs;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> MappingStore {
        MappingStore::open(&StoreConfig::new(dir.path().join("textas.txt"))).unwrap()
    }

    #[test]
    fn test_add_persists_immediately() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.add_mapping("|-| h").unwrap();
        store.add_mapping("| i").unwrap();

        let contents = fs::read_to_string(store.mappings_path()).unwrap();
        assert_eq!(contents, "|-| h\n| i\n");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_invalid_add_leaves_store_untouched() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let err = store.add_mapping("tokenonly").unwrap_err();
        assert!(matches!(err, StoreError::InvalidFormat { .. }));
        assert!(store.is_empty());
        assert!(!store.mappings_path().exists());
    }

    #[test]
    fn test_delete_last_on_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(matches!(store.delete_last_mapping(), Err(StoreError::EmptyStore)));
    }

    #[test]
    fn test_failed_save_keeps_memory_unchanged() {
        let dir = TempDir::new().unwrap();
        // A directory at the target path makes the rename fail.
        let path = dir.path().join("textas.txt");
        fs::create_dir(&path).unwrap();
        let store = MappingStore {
            mapping: Mutex::new(Mapping::new()),
            mappings_path: path,
            history: None,
        };

        assert!(matches!(store.add_mapping("ABC a"), Err(StoreError::Io { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn test_translate_writes_history() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::new(dir.path().join("textas.txt"))
            .with_history_path(dir.path().join("translations.txt"));
        let store = MappingStore::open(&config).unwrap();
        store.add_mapping("ABC a").unwrap();

        let result = store.translate(Direction::CharToToken, "a");
        assert_eq!(result.output, "ABC");

        let history = fs::read_to_string(dir.path().join("translations.txt")).unwrap();
        assert_eq!(history, "Input: a\nOutput: ABC\n\n");
    }

    #[test]
    fn test_translate_survives_broken_history() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::new(dir.path().join("textas.txt")).with_history_path(dir.path());
        let store = MappingStore::open(&config).unwrap();

        let result = store.translate(Direction::TokenToChar, "ZZZ");
        assert_eq!(result.output, "Unknown ASCII ");
        assert_eq!(result.unknown_count, 1);
    }
}
