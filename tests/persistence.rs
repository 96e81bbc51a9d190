use stock_table::{Error, StockTable};

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("stock_table_test_{}.json", name))
}

#[test]
fn save_then_load_roundtrip() {
    let path = temp_path("roundtrip");
    let _ = std::fs::remove_file(&path);

    let table = StockTable::new();
    table.add("apple", 7).unwrap();
    table.add("banana", -2).unwrap();
    table.add("cherry", 40).unwrap();
    table.save(&path).unwrap();

    let fresh = StockTable::new();
    fresh.load(&path).unwrap();
    let mut got = fresh.iter();
    got.sort();
    let mut want = table.iter();
    want.sort();
    assert_eq!(got, want);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn saved_file_is_flat_object() {
    let path = temp_path("flat");
    let _ = std::fs::remove_file(&path);

    let table = StockTable::new();
    table.add("apple", 7).unwrap();
    table.add("banana", 3).unwrap();
    table.save(&path).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert_eq!(raw, r#"{"apple":7,"banana":3}"#);
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["apple"], 7);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn load_replaces_whole_mapping() {
    let path = temp_path("replace");
    std::fs::write(&path, r#"{"pear": 2, "plum": 9}"#).unwrap();

    let table = StockTable::new();
    table.add("apple", 10).unwrap();
    table.load(&path).unwrap();

    assert!(!table.contains("apple"));
    assert_eq!(table.get_quantity("pear").unwrap(), 2);
    assert_eq!(table.get_quantity("plum").unwrap(), 9);
    assert_eq!(table.len(), 2);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn load_missing_file_fails() {
    let path = temp_path("does_not_exist");
    let _ = std::fs::remove_file(&path);
    let table = StockTable::new();
    assert!(matches!(table.load(&path), Err(Error::Io(_))));
}

#[test]
fn load_invalid_json_fails_and_keeps_state() {
    let path = temp_path("invalid");
    std::fs::write(&path, "{ apple: ").unwrap();

    let table = StockTable::new();
    table.add("apple", 1).unwrap();
    assert!(matches!(table.load(&path), Err(Error::Deserialize(_))));
    assert_eq!(table.get_quantity("apple").unwrap(), 1);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn load_rejects_non_integer_quantities() {
    let path = temp_path("strings");
    std::fs::write(&path, r#"{"apple": "ten"}"#).unwrap();
    let table = StockTable::new();
    assert!(matches!(table.load(&path), Err(Error::Deserialize(_))));
    assert!(table.is_empty());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn load_rejects_empty_item_id() {
    let path = temp_path("empty_key");
    std::fs::write(&path, r#"{"": 4}"#).unwrap();
    let table = StockTable::new();
    assert!(table.load(&path).is_err());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn save_into_missing_directory_fails() {
    let dir = std::env::temp_dir().join("stock_table_test_no_such_dir");
    let _ = std::fs::remove_dir_all(&dir);
    let table = StockTable::new();
    table.add("apple", 1).unwrap();
    assert!(matches!(
        table.save(dir.join("inventory.json")),
        Err(Error::Io(_))
    ));
}

#[test]
fn save_overwrites_and_leaves_no_temp_file() {
    let path = temp_path("overwrite");
    std::fs::write(&path, r#"{"old": 1, "stale": 2}"#).unwrap();

    let table = StockTable::new();
    table.add("fresh", 3).unwrap();
    table.save(&path).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"{"fresh":3}"#);
    assert!(!path.with_extension("json.tmp").exists());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn empty_table_saves_empty_object() {
    let path = temp_path("empty_save");
    let table = StockTable::new();
    table.save(&path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");

    let fresh = StockTable::new();
    fresh.load(&path).unwrap();
    assert!(fresh.is_empty());
    let _ = std::fs::remove_file(&path);
}

// ---- bound tables -----------------------------------------------------------

#[test]
fn open_missing_file_creates_empty() {
    let path = temp_path("open_missing");
    let _ = std::fs::remove_file(&path);
    let table = StockTable::open(&path).unwrap();
    assert!(table.is_empty());
    assert_eq!(table.path(), Some(path.as_path()));
}

#[test]
fn open_empty_file_creates_empty() {
    let path = temp_path("open_blank");
    std::fs::write(&path, "").unwrap();
    let table = StockTable::open(&path).unwrap();
    assert!(table.is_empty());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn open_corrupt_file_fails() {
    let path = temp_path("open_corrupt");
    std::fs::write(&path, "[1, 2, 3]").unwrap();
    assert!(matches!(StockTable::open(&path), Err(Error::Deserialize(_))));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn flush_and_reopen() {
    let path = temp_path("flush_reopen");
    let _ = std::fs::remove_file(&path);
    {
        let table = StockTable::open(&path).unwrap();
        table.add("apple", 10).unwrap();
        table.remove("apple", 3).unwrap();
        table.flush().unwrap();
    }
    let table = StockTable::open(&path).unwrap();
    assert_eq!(table.get_quantity("apple").unwrap(), 7);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn pretty_output_is_indented() {
    let path = temp_path("pretty");
    let _ = std::fs::remove_file(&path);
    let table = StockTable::builder().path(&path).pretty(true).build().unwrap();
    table.add("apple", 1).unwrap();
    table.flush().unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains('\n'));
    assert!(raw.contains("  \"apple\": 1"));
    let _ = std::fs::remove_file(&path);
}
