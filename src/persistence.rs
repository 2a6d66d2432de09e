// File: src/persistence.rs
use crate::core::mapping::Mapping;
use crate::core::types::{Character, Token};
use crate::error::{Result, StoreError};
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Splits one persisted line on its last space.
///
/// Returns `None` for lines that carry no association: no space at all, or
/// an empty token or character once trimmed.
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let (token, character) = line.rsplit_once(' ')?;
    let token = token.trim();
    let character = character.trim();
    if token.is_empty() || character.is_empty() {
        return None;
    }
    Some((token, character))
}

/// Parses the persisted text form, skipping malformed lines.
pub fn parse_mappings(contents: &str) -> Mapping {
    let mut mapping = Mapping::new();
    let mut skipped = 0usize;
    for line in contents.lines() {
        match parse_line(line) {
            Some((token, character)) => {
                mapping.insert(token, character);
            }
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::debug!(skipped, "skipped lines without a mapping");
    }
    mapping
}

/// Rejects an entry whose `<token> <character>` line would not parse back
/// to the same pair.
fn check_representable(token: &str, character: &str) -> Result<()> {
    let representable = !token.is_empty()
        && !character.is_empty()
        && token.trim() == token
        && !token.contains(['\n', '\r'])
        && !character.contains(char::is_whitespace);
    if representable {
        Ok(())
    } else {
        Err(StoreError::invalid_format(&format!("{token} {character}")))
    }
}

/// Renders a mapping as `<token> <character>` lines in insertion order.
pub fn render_mappings(mapping: &Mapping) -> String {
    let mut out = String::new();
    for (token, character) in mapping.iter() {
        out.push_str(token);
        out.push(' ');
        out.push_str(character);
        out.push('\n');
    }
    out
}

/// Loads mappings from `path`. A missing file is an empty mapping.
pub fn load_mappings(path: &Path) -> Result<Mapping> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "mapping file absent, starting empty");
            return Ok(Mapping::new());
        }
        Err(e) => return Err(StoreError::io(path, e)),
    };

    let mapping = parse_mappings(&contents);
    tracing::debug!(path = %path.display(), entries = mapping.len(), "loaded mappings");
    Ok(mapping)
}

/// Rewrites `path` with the whole mapping.
///
/// Writes go to a temp file in the same directory which is then renamed
/// over the target, so readers never see a half-written file. An existing
/// target keeps its permissions. Entries that would not load back unchanged
/// fail with `InvalidFormat` before anything is written.
pub fn save_mappings(mapping: &Mapping, path: &Path) -> Result<()> {
    for (token, character) in mapping.iter() {
        check_representable(token, character)?;
    }

    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir).map_err(|e| StoreError::io(parent_dir, e))?;

    let temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| StoreError::io(path, e))?;
    {
        let mut writer = BufWriter::new(&temp_file);
        writer
            .write_all(render_mappings(mapping).as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|e| StoreError::io(path, e))?;
    }
    if let Ok(metadata) = fs::metadata(path) {
        temp_file
            .as_file()
            .set_permissions(metadata.permissions())
            .map_err(|e| StoreError::io(path, e))?;
    }

    temp_file
        .persist(path)
        .map_err(|e| StoreError::io(path, e.error))?;
    tracing::debug!(path = %path.display(), entries = mapping.len(), "saved mappings");
    Ok(())
}

/// Splits raw "add" input into a token and a character on the last whitespace.
pub fn parse_mapping_input(raw: &str) -> Result<(Token, Character)> {
    let trimmed = raw.trim();
    let (token, character) = trimmed
        .rsplit_once(char::is_whitespace)
        .ok_or_else(|| StoreError::invalid_format(raw))?;
    let token = token.trim();
    let character = character.trim();

    check_representable(token, character).map_err(|_| StoreError::invalid_format(raw))?;
    Ok((token.to_string(), character.to_string()))
}
