//! Integration tests for the mapping store and translator.

use std::fs;
use std::sync::Arc;
use std::thread;

use tempfile::TempDir;
use translator_core::{
    characters_to_tokens, load_mappings, save_mappings, tokens_to_characters, Direction, Mapping,
    MappingStore, StoreConfig, StoreError,
};

fn open_store(dir: &TempDir) -> MappingStore {
    MappingStore::open(&StoreConfig::new(dir.path().join("textas.txt"))).unwrap()
}

fn sample_mapping() -> Mapping {
    [
        ("|-|", "h"),
        ("|_| |_|", "w"),
        ("/-\\", "a"),
        ("[]", "o"),
    ]
    .into_iter()
    .collect()
}

#[test]
fn save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("textas.txt");
    let mapping = sample_mapping();

    save_mappings(&mapping, &path).unwrap();
    let loaded = load_mappings(&path).unwrap();

    assert_eq!(loaded, mapping);
    assert_eq!(
        loaded.iter().collect::<Vec<_>>(),
        mapping.iter().collect::<Vec<_>>()
    );
}

#[test]
fn reload_without_writes_is_stable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("textas.txt");
    fs::write(&path, "|-| h\nnot-a-mapping\n[] o\n").unwrap();

    assert_eq!(load_mappings(&path).unwrap(), load_mappings(&path).unwrap());
}

#[test]
fn malformed_lines_are_skipped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("textas.txt");
    fs::write(&path, "nospace\n|-| h\n\n").unwrap();

    let mapping = load_mappings(&path).unwrap();
    assert_eq!(mapping.len(), 1);
    assert!(!mapping.contains("nospace"));
    assert_eq!(mapping.get("|-|"), Some("h"));
}

#[test]
fn single_unit_round_trip_through_store() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store.add_mapping("ABC a").unwrap();

    let m = store.snapshot();
    assert_eq!(characters_to_tokens("a", &m.invert()).output, "ABC");
    assert_eq!(tokens_to_characters("ABC", &m).output, "a");

    assert_eq!(store.translate(Direction::CharToToken, "a").output, "ABC");
    assert_eq!(store.translate(Direction::TokenToChar, "ABC").output, "a");
}

#[test]
fn unknown_units_on_empty_mapping() {
    let empty = Mapping::new();

    let result = characters_to_tokens("z", &empty);
    assert_eq!((result.output.as_str(), result.unknown_count), ("Unknown character", 1));

    let result = tokens_to_characters("ZZZ", &empty);
    assert_eq!((result.output.as_str(), result.unknown_count), ("Unknown ASCII ", 1));
}

#[test]
fn char_to_token_lowercases_input() {
    let inverse: Mapping = [("a", "X")].into_iter().collect();
    assert_eq!(characters_to_tokens("A", &inverse), characters_to_tokens("a", &inverse));
}

#[test]
fn delete_last_follows_insertion_order() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    assert!(matches!(store.delete_last_mapping(), Err(StoreError::EmptyStore)));

    for raw in ["A 1", "B 2", "C 3"] {
        store.add_mapping(raw).unwrap();
    }
    let removed = store.delete_last_mapping().unwrap();
    assert_eq!(removed, ("C".to_string(), "3".to_string()));

    let remaining: Vec<_> = store
        .snapshot()
        .iter()
        .map(|(token, _)| token.to_string())
        .collect();
    assert_eq!(remaining, vec!["A", "B"]);
    assert_eq!(fs::read_to_string(store.mappings_path()).unwrap(), "A 1\nB 2\n");
}

#[test]
fn add_without_whitespace_is_rejected() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    assert!(matches!(
        store.add_mapping("tokenonly"),
        Err(StoreError::InvalidFormat { .. })
    ));
}

#[test]
fn whitespace_cannot_be_mapped() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    assert!(matches!(
        store.add_mapping("/  "),
        Err(StoreError::InvalidFormat { .. })
    ));
    assert!(store.is_empty());

    let result = store.translate(Direction::CharToToken, " ");
    assert_eq!((result.output.as_str(), result.unknown_count), ("Unknown character", 1));
}

#[cfg(unix)]
#[test]
fn add_keeps_mapping_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store.add_mapping("|-| h").unwrap();
    fs::set_permissions(store.mappings_path(), fs::Permissions::from_mode(0o644)).unwrap();

    store.add_mapping("| i").unwrap();
    store.delete_last_mapping().unwrap();

    let mode = fs::metadata(store.mappings_path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o644);
}

#[test]
fn re_adding_a_token_replaces_and_moves_it_last() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store.add_mapping("A 1").unwrap();
    store.add_mapping("B 2").unwrap();
    store.add_mapping("A 9").unwrap();

    assert_eq!(fs::read_to_string(store.mappings_path()).unwrap(), "B 2\nA 9\n");
    assert_eq!(
        store.delete_last_mapping().unwrap(),
        ("A".to_string(), "9".to_string())
    );
}

#[test]
fn mutations_survive_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = open_store(&dir);
        store.add_mapping("|_| |_| w").unwrap();
        store.add_mapping("|-| h").unwrap();
    }

    let store = open_store(&dir);
    assert_eq!(store.len(), 2);
    assert_eq!(store.translate(Direction::CharToToken, "wh").output, "|_| |_|\n\n|-|");
}

#[test]
fn reload_picks_up_external_edits() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store.add_mapping("|-| h").unwrap();

    fs::write(store.mappings_path(), "[] o\n/-\\ a\n").unwrap();
    assert_eq!(store.reload().unwrap(), 2);
    assert_eq!(store.translate(Direction::TokenToChar, "[] /-\\").output, "oa");
}

#[test]
fn history_records_every_translation() {
    let dir = TempDir::new().unwrap();
    let history_path = dir.path().join("translations.txt");
    let config = StoreConfig::new(dir.path().join("textas.txt")).with_history_path(&history_path);
    let store = MappingStore::open(&config).unwrap();
    store.add_mapping("|-| h").unwrap();

    store.translate(Direction::CharToToken, "h");
    store.translate(Direction::TokenToChar, "|-| ?");

    let history = fs::read_to_string(&history_path).unwrap();
    assert_eq!(
        history,
        "Input: h\nOutput: |-|\n\nInput: |-| ?\nOutput: hUnknown ASCII \n\n"
    );
}

#[test]
fn concurrent_adds_are_all_persisted() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(open_store(&dir));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for j in 0..5 {
                    store.add_mapping(&format!("T{i}_{j} c{i}")).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len(), 40);
    let on_disk = load_mappings(store.mappings_path()).unwrap();
    assert_eq!(on_disk, store.snapshot());
}
