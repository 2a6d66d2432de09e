// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The code-side representation of a character. May contain internal spaces.
pub type Token = String;

/// The plain-text side of an association, conventionally a single letter.
pub type Character = String;

/// Which way a block of text is translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Plain text in, one token per input character out.
    #[default]
    CharToToken,
    /// Whitespace-separated tokens in, plain text out.
    TokenToChar,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CharToToken => f.write_str("char-to-token"),
            Self::TokenToChar => f.write_str("token-to-char"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "char-to-token" | "letters-to-ascii" => Ok(Self::CharToToken),
            "token-to-char" | "ascii-to-letters" => Ok(Self::TokenToChar),
            other => Err(format!("unknown direction '{other}'")),
        }
    }
}

/// Output of a translation plus the number of units that had no association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub output: String,
    pub unknown_count: usize,
}

impl Translation {
    #[must_use]
    pub fn has_unknowns(&self) -> bool {
        self.unknown_count > 0
    }
}

/// One entry of the audit trail. Written, never read back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRecord {
    pub input: String,
    pub output: String,
}
