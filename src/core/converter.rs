use crate::core::mapping::Mapping;
use crate::core::types::{Direction, Translation};

/// Emitted for an input character with no token.
pub const UNKNOWN_CHARACTER: &str = "Unknown character";
/// Emitted for an input token with no character. The trailing space is part of the placeholder.
pub const UNKNOWN_TOKEN: &str = "Unknown ASCII ";
/// Written after every token in char-to-token output.
pub const TOKEN_SEPARATOR: &str = "\n\n";

/// Translates plain text into tokens, one lookup per character.
///
/// Input is lowercased first. Every character is looked up, whitespace
/// included, so an unmapped space yields a placeholder like any other
/// character. `character_to_token` is the inverted mapping.
pub fn characters_to_tokens(text: &str, character_to_token: &Mapping) -> Translation {
    let lowered = text.to_lowercase();
    let mut output = String::new();
    let mut unknown_count = 0;
    let mut buf = [0u8; 4];

    for c in lowered.chars() {
        match character_to_token.get(c.encode_utf8(&mut buf)) {
            Some(token) => output.push_str(token),
            None => {
                output.push_str(UNKNOWN_CHARACTER);
                unknown_count += 1;
            }
        }
        output.push_str(TOKEN_SEPARATOR);
    }

    if output.ends_with(TOKEN_SEPARATOR) {
        output.truncate(output.len() - TOKEN_SEPARATOR.len());
    }

    Translation {
        output,
        unknown_count,
    }
}

/// Translates whitespace-separated tokens back into plain text.
///
/// Any run of whitespace is one delimiter. Mapped characters are
/// concatenated with no separator; tokens are matched exactly, without
/// case folding.
pub fn tokens_to_characters(text: &str, token_to_character: &Mapping) -> Translation {
    let mut output = String::new();
    let mut unknown_count = 0;

    for token in text.split_whitespace() {
        match token_to_character.get(token) {
            Some(character) => output.push_str(character),
            None => {
                output.push_str(UNKNOWN_TOKEN);
                unknown_count += 1;
            }
        }
    }

    Translation {
        output,
        unknown_count,
    }
}

/// Dispatches on `direction`. The inverse is only built when needed.
pub fn translate(direction: Direction, text: &str, mapping: &Mapping) -> Translation {
    match direction {
        Direction::CharToToken => characters_to_tokens(text, &mapping.invert()),
        Direction::TokenToChar => tokens_to_characters(text, mapping),
    }
}
