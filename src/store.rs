//! Whole-file JSON persistence: one ordered array per dataset, read and
//! written wholesale.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub fn load<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse dataset {}", path.display()))
}

pub fn save<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let raw = serde_json::to_string(records)?;
    std::fs::write(path, raw)
        .with_context(|| format!("failed to write dataset {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Item;

    #[test]
    fn roundtrip_preserves_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("json").join("data.json");

        let mut a = Item::stub(1, "Linen Cloth", "inv_fabric_linen_01");
        a.quality = Some("Common".into());
        let b = Item::stub(2, "Wool Cloth", "inv_fabric_wool_01");
        let records = vec![a, b];

        save(&path, &records).unwrap();
        let loaded: Vec<Item> = load(&path).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load::<Item>(&dir.path().join("nope.json")).is_err());
    }
}
