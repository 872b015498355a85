//! Union of sharded VIA region files.

use anyhow::{Context, Result};
use log::debug;
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

fn load_object(path: &Path) -> Result<Map<String, Value>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open JSON file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Expected a JSON object in {}", path.display()))
}

/// Right-biased union of top-level keys: a later file overwrites the value of
/// a key an earlier file already defined, keeping that key's position.
pub fn merge_objects<I>(objects: I) -> Map<String, Value>
where
    I: IntoIterator<Item = Map<String, Value>>,
{
    let mut merged = Map::new();
    for object in objects {
        for (key, value) in object {
            if merged.insert(key.clone(), value).is_some() {
                debug!("'{key}' overwritten by a later file");
            }
        }
    }
    merged
}

/// Loads every source in order, merges them and writes the result to `dest`.
///
/// Returns the number of keys in the merged document.
pub fn merge_files(sources: &[PathBuf], dest: &Path) -> Result<usize> {
    let objects = sources
        .iter()
        .map(|path| load_object(path))
        .collect::<Result<Vec<_>>>()?;
    let merged = merge_objects(objects);

    let content = serde_json::to_string_pretty(&merged)?;
    fs::write(dest, content)
        .with_context(|| format!("Failed to write merged file: {}", dest.display()))?;
    Ok(merged.len())
}
