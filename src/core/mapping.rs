// --- File: src/core/mapping.rs
use crate::core::types::{Character, Token};
use crate::error::{Result, StoreError};
use std::collections::HashMap;

/// An insertion-ordered set of token -> character associations.
///
/// Keys are unique. Order only matters for `delete_last` and for the order
/// lines are written back to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    entries: Vec<(Token, Character)>,
    /// key -> position in `entries`
    index: HashMap<Token, usize>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// O(1) lookup of the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Associations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(token, character)| (token.as_str(), character.as_str()))
    }

    /// The association `delete_last` would remove.
    pub fn last(&self) -> Option<(&str, &str)> {
        self.entries
            .last()
            .map(|(token, character)| (token.as_str(), character.as_str()))
    }

    /// Sets `mapping[token] = character`, last write wins.
    ///
    /// An existing token is moved to the end, so re-adding a token makes it
    /// the next candidate for `delete_last`. Returns the replaced value.
    pub fn insert(
        &mut self,
        token: impl Into<Token>,
        character: impl Into<Character>,
    ) -> Option<Character> {
        let token = token.into();
        let character = character.into();

        let previous = match self.index.get(&token) {
            Some(&pos) => {
                let (_, old) = self.entries.remove(pos);
                self.reindex_from(pos);
                Some(old)
            }
            None => None,
        };

        self.index.insert(token.clone(), self.entries.len());
        self.entries.push((token, character));
        previous
    }

    /// Removes the most recently inserted association.
    pub fn delete_last(&mut self) -> Result<(Token, Character)> {
        let (token, character) = self.entries.pop().ok_or(StoreError::EmptyStore)?;
        self.index.remove(&token);
        Ok((token, character))
    }

    /// Builds the character -> token view used for reverse lookups.
    ///
    /// When several tokens share a character, the one appearing last in
    /// insertion order wins.
    pub fn invert(&self) -> Mapping {
        let mut inverse = Mapping::new();
        for (token, character) in &self.entries {
            inverse.insert(character.clone(), token.clone());
        }
        inverse
    }

    fn reindex_from(&mut self, start: usize) {
        for (pos, (key, _)) in self.entries.iter().enumerate().skip(start) {
            if let Some(slot) = self.index.get_mut(key) {
                *slot = pos;
            }
        }
    }
}

impl<K: Into<Token>, V: Into<Character>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (token, character) in iter {
            mapping.insert(token, character);
        }
        mapping
    }
}
