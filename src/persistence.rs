// File: src/persistence.rs
use crate::core::index::InMemoryIndex;
use crate::core::types::WordSenseKey;
use crate::error::Result;
use indexmap::IndexMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes an index snapshot atomically: into a temp file beside the target,
/// then persisted over it.
pub fn save_snapshot(index: &InMemoryIndex, path: &Path) -> Result<()> {
    let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let writer = BufWriter::new(&temp_file);
        bincode::serialize_into(writer, index)?;
    }
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub fn load_snapshot(path: &Path) -> Result<InMemoryIndex> {
    let reader = BufReader::new(File::open(path)?);
    let mut index: InMemoryIndex = bincode::deserialize_from(reader)?;
    index.reindex();
    Ok(index)
}

/// Reads a JSON object mapping raw keys to vectors, keeping file order.
pub fn import_json(path: &Path) -> Result<InMemoryIndex> {
    let reader = BufReader::new(File::open(path)?);
    let table: IndexMap<String, Vec<f32>> = serde_json::from_reader(reader)?;
    let mut index = InMemoryIndex::new();
    for (raw, vector) in table {
        index.add(WordSenseKey::parse(&raw)?, vector)?;
    }
    Ok(index)
}

/// Loads `.json` vector tables and binary snapshots alike.
pub fn load_index(path: &Path) -> Result<InMemoryIndex> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => import_json(path),
        _ => load_snapshot(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::index::VectorSpaceIndex;
    use std::io::Write;

    #[test]
    fn it_restores_a_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("vectors.bin");
        let index = InMemoryIndex::from_entries([
            ("cat|NOUN", vec![1.0, 0.0]),
            ("New_York|GPE", vec![0.0, 1.0]),
        ])
        .unwrap()
        .with_cache_limit(100);

        save_snapshot(&index, &path).unwrap();
        let restored = load_index(&path).unwrap();

        assert_eq!(restored.len(), 2);
        assert!(restored.exists(&WordSenseKey::new("New_York", "GPE")));
        assert_eq!(restored.neighbor_cache_limit(), Some(100));
        assert_eq!(
            restored.vector(&WordSenseKey::new("cat", "NOUN")),
            Some(&[1.0, 0.0][..])
        );
    }

    #[test]
    fn it_imports_json_tables_in_file_order() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{ "zebra|NOUN": [1.0, 0.0], "apple|NOUN": [0.0, 1.0] }}"#).unwrap();

        let index = load_index(file.path()).unwrap();
        let keys: Vec<String> = index.keys().map(|k| k.to_key()).collect();
        assert_eq!(keys, vec!["zebra|NOUN", "apple|NOUN"]);
    }

    #[test]
    fn it_rejects_malformed_keys_on_import() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{ "zebra": [1.0] }}"#).unwrap();
        assert!(import_json(file.path()).is_err());
    }
}
