//! Dataset files: a schema and the records that go with it.
//!
//! A dataset is YAML (`.yaml`, `.yml`) or JSON (anything else):
//!
//! ```yaml
//! config:
//!   membership: enumerable_only
//! models:
//!   - name: auth.user
//!     fields:
//!       - {name: username, type: text, suggestable: true}
//! records:
//!   auth.user:
//!     - {id: 1, username: tema}
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use seekql::{ModelDescription, Registry, SchemaConfig};
use seekql_memory::{load, MemoryStore, RawRecords};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dataset {
    #[serde(default)]
    pub config: SchemaConfig,
    pub models: Vec<ModelDescription>,
    #[serde(default)]
    pub records: RawRecords,
}

/// A dataset turned into a registry and a populated store.
#[derive(Debug)]
pub struct Loaded {
    pub registry: Registry,
    pub store: MemoryStore,
}

impl Dataset {
    /// Reads a dataset, picking the parser by file extension.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read dataset {}", path.display()))?;
        let dataset = if is_yaml(path) {
            serde_yaml::from_str(&text)
                .with_context(|| format!("invalid YAML dataset {}", path.display()))?
        } else {
            serde_json::from_str(&text)
                .with_context(|| format!("invalid JSON dataset {}", path.display()))?
        };
        Ok(dataset)
    }

    /// Builds the registry and loads the records into a store.
    pub fn load(self) -> Result<Loaded> {
        let registry = Registry::builder()
            .config(self.config)
            .models(self.models)
            .build()
            .context("invalid schema")?;
        let store = load(&registry, &self.records).context("invalid records")?;
        debug!(models = registry.models().count(), "dataset loaded");
        Ok(Loaded { registry, store })
    }
}

/// Reads and loads the dataset at `path`.
pub fn open(path: &Path) -> Result<Loaded> {
    Dataset::read(path)?.load()
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_by_extension() {
        assert!(is_yaml(Path::new("books.yaml")));
        assert!(is_yaml(Path::new("books.yml")));
        assert!(!is_yaml(Path::new("books.json")));
        assert!(!is_yaml(Path::new("books")));
    }

    #[test]
    fn parses_yaml_dataset() {
        let text = r#"
config:
  default_page_size: 10
models:
  - name: auth.user
    fields:
      - {name: username, type: text, suggestable: true}
records:
  auth.user:
    - {id: 1, username: tema}
"#;
        let dataset: Dataset = serde_yaml::from_str(text).unwrap();
        assert_eq!(dataset.config.default_page_size, 10);
        let loaded = dataset.load().unwrap();
        assert_eq!(loaded.store.len("auth.user"), 1);
    }

    #[test]
    fn rejects_bad_schema() {
        let text = r#"{"models": [{"name": "a", "fields": [{"name": "r", "type": "relation", "target": "b"}]}]}"#;
        let dataset: Dataset = serde_json::from_str(text).unwrap();
        let err = dataset.load().unwrap_err();
        assert!(format!("{err:#}").contains("invalid schema"));
    }
}
