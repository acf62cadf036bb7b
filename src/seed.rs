// Seed-file loading: JSON array, JSONL, or YAML

use crate::item::Checkable;
use eyre::{Context, Result, eyre};
use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

/// Seed file formats, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedFormat {
    Json,
    JsonLines,
    Yaml,
}

impl SeedFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Ok(SeedFormat::Json),
            Some("jsonl") | Some("ndjson") => Ok(SeedFormat::JsonLines),
            Some("yaml") | Some("yml") => Ok(SeedFormat::Yaml),
            other => Err(eyre!(
                "Unsupported seed file extension {:?} for {} (expected json, jsonl, ndjson, yaml, yml)",
                other,
                path.display()
            )),
        }
    }
}

/// Read the initial items for a checklist from a file
pub fn load_items<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let format = SeedFormat::from_path(path)?;

    let items = match format {
        SeedFormat::Json => {
            let content = fs::read_to_string(path).context("Failed to read seed file")?;
            serde_json::from_str(&content).context("Failed to parse JSON seed file")?
        }
        SeedFormat::Yaml => {
            let content = fs::read_to_string(path).context("Failed to read seed file")?;
            serde_yaml::from_str(&content).context("Failed to parse YAML seed file")?
        }
        SeedFormat::JsonLines => read_jsonl(path)?,
    };

    Ok(items)
}

/// Read one item per line, skipping blank and malformed lines
fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).context("Failed to open JSONL seed file")?;
    let reader = BufReader::new(file);
    let mut items = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!(
                    file = ?path,
                    line = line_num + 1,
                    error = ?e,
                    "Failed to read line, skipping"
                );
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str(&line) {
            Ok(item) => items.push(item),
            Err(e) => {
                warn!(
                    file = ?path,
                    line = line_num + 1,
                    error = ?e,
                    "Failed to parse JSON, skipping"
                );
            }
        }
    }

    info!(file = ?path, count = items.len(), "Loaded items from JSONL");

    Ok(items)
}

/// Warn about ids that repeat an earlier item; returns how many repeats there are
///
/// The store keeps duplicates and always acts on the first one, so later
/// copies can never be updated by id.
pub fn warn_duplicate_ids<T: Checkable>(items: &[T]) -> usize {
    let mut duplicates = 0;

    for (idx, item) in items.iter().enumerate() {
        if let Some(first) = items[..idx].iter().position(|earlier| earlier.id() == item.id()) {
            warn!(
                id = ?item.id(),
                position = idx,
                first_position = first,
                "Duplicate item id; only the first occurrence is addressable"
            );
            duplicates += 1;
        }
    }

    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{CheckItem, ItemId};
    use serde_json::{Map, Value};
    use std::io::Write;
    use tempfile::TempDir;

    type Entry = CheckItem<ItemId, Map<String, Value>>;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(SeedFormat::from_path(Path::new("a.json")).unwrap(), SeedFormat::Json);
        assert_eq!(SeedFormat::from_path(Path::new("a.jsonl")).unwrap(), SeedFormat::JsonLines);
        assert_eq!(SeedFormat::from_path(Path::new("a.ndjson")).unwrap(), SeedFormat::JsonLines);
        assert_eq!(SeedFormat::from_path(Path::new("a.yml")).unwrap(), SeedFormat::Yaml);
        assert!(SeedFormat::from_path(Path::new("a.csv")).is_err());
        assert!(SeedFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_load_json_array() {
        let temp = TempDir::new().unwrap();
        let path = write_file(
            &temp,
            "todos.json",
            r#"[{"id": 1, "text": "Check email", "checked": false}, {"id": 2, "text": "Prepare meeting", "checked": true}]"#,
        );

        let items: Vec<Entry> = load_items(&path).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, ItemId::Int(1));
        assert_eq!(items[1].checked, Some(true));
        assert_eq!(items[0].data.get("text"), Some(&Value::from("Check email")));
    }

    #[test]
    fn test_load_jsonl_skips_bad_lines() {
        let temp = TempDir::new().unwrap();
        let path = write_file(
            &temp,
            "products.jsonl",
            "{\"id\": \"p1\", \"name\": \"Laptop\", \"price\": 1200000}\n\nnot json\n{\"id\": \"p2\", \"name\": \"Phone\"}\n",
        );

        let items: Vec<Entry> = load_items(&path).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, ItemId::from("p1"));
        assert_eq!(items[1].id, ItemId::from("p2"));
        assert_eq!(items[0].checked, None);
    }

    #[test]
    fn test_load_yaml() {
        let temp = TempDir::new().unwrap();
        let path = write_file(
            &temp,
            "todos.yaml",
            "- id: 1\n  text: Lunch\n  checked: true\n- id: b\n  text: Report\n",
        );

        let items: Vec<Entry> = load_items(&path).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].checked, Some(true));
        assert_eq!(items[1].id, ItemId::from("b"));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let result: Result<Vec<Entry>> = load_items(&temp.path().join("missing.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_warn_duplicate_ids() {
        let items = vec![
            Entry::new(ItemId::Int(1), None, Map::new()),
            Entry::new(ItemId::Int(2), None, Map::new()),
            Entry::new(ItemId::Int(1), Some(true), Map::new()),
        ];

        assert_eq!(warn_duplicate_ids(&items), 1);
        assert_eq!(warn_duplicate_ids(&items[..2]), 0);
    }
}
