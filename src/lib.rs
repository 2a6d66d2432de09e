// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod history;
pub mod logging;
pub mod persistence;
pub mod protocol;

pub use crate::config::StoreConfig;
pub use crate::core::converter::{characters_to_tokens, tokens_to_characters};
pub use crate::core::engine::MappingStore;
pub use crate::core::mapping::Mapping;
pub use crate::core::types::{Character, Direction, Token, Translation, TranslationRecord};
pub use crate::error::{Result, StoreError};
pub use crate::persistence::{load_mappings, parse_mapping_input, save_mappings};
