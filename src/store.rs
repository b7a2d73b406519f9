//! Key-value persistence for user settings and the last edited document.
//!
//! The core never persists anything on its own; callers decide when to save.

use crate::config::SettingsLayer;
use crate::error::{Result, SlidesError};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const SETTINGS_KEY: &str = "settings";
pub const DOCUMENT_KEY: &str = "document";

pub trait PersistenceStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PersistenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stores each key as a file under `root`. The directory is created on the
/// first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(SlidesError::Store(format!("invalid key: {key:?}")));
        }
        Ok(self.root.join(key))
    }
}

impl PersistenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root)?;
        fs::write(path, value)?;
        Ok(())
    }
}

/// Load persisted settings. Missing, unreadable or malformed data yields the
/// empty layer, so built-in defaults apply.
pub fn load_settings<S: PersistenceStore + ?Sized>(store: &S) -> SettingsLayer {
    match store.get(SETTINGS_KEY) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(error = %err, "malformed settings; using defaults");
                SettingsLayer::default()
            }
        },
        Ok(None) => {
            debug!("no saved settings");
            SettingsLayer::default()
        }
        Err(err) => {
            warn!(error = %err, "settings unreadable; using defaults");
            SettingsLayer::default()
        }
    }
}

pub fn save_settings<S: PersistenceStore + ?Sized>(
    store: &mut S,
    settings: &SettingsLayer,
) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    store.set(SETTINGS_KEY, &json)
}

pub fn load_document<S: PersistenceStore + ?Sized>(store: &S) -> Result<Option<String>> {
    store.get(DOCUMENT_KEY)
}

pub fn save_document<S: PersistenceStore + ?Sized>(store: &mut S, text: &str) -> Result<()> {
    store.set(DOCUMENT_KEY, text)
}
