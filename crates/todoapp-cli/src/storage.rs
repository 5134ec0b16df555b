use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tempfile::NamedTempFile;
use todoapp_core::session::{KeyValueStorage, StorageError};
use tracing::debug;

/// Session values kept as one JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> anyhow::Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&text)
            .with_context(|| format!("failed parsing {}", self.path.display()))
    }

    fn save(&self, values: &BTreeMap<String, String>) -> anyhow::Result<()> {
        debug!(file = %self.path.display(), keys = values.len(), "saving session file");

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

        // NamedTempFile is created with mode 0600 on unix.
        let mut temp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut temp, values)?;
        temp.flush()?;
        temp.persist(&self.path)
            .map_err(|err| anyhow!("failed to persist {}: {}", self.path.display(), err))?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.load()
            .map(|values| values.get(key).cloned())
            .map_err(|err| StorageError::Unavailable(format!("{err:#}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self
            .load()
            .map_err(|err| StorageError::Unavailable(format!("{err:#}")))?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
            .map_err(|err| StorageError::Write(format!("{err:#}")))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let (mut values, readable) = match self.load() {
            Ok(values) => (values, true),
            // unreadable contents are overwritten
            Err(_) => (BTreeMap::new(), false),
        };
        if values.remove(key).is_none() && readable {
            return Ok(());
        }
        self.save(&values)
            .map_err(|err| StorageError::Write(format!("{err:#}")))
    }
}
