//! Tiny key/value persistence for the last searched city.

use anyhow::{Context, Result};
use std::{
    collections::{BTreeMap, HashMap},
    fmt::Debug,
    fs,
    path::PathBuf,
};

use crate::config::project_dirs;

pub const LAST_CITY_KEY: &str = "last_searched_city";

pub trait MemoStore: Send + Debug {
    fn get(&self, key: &str) -> Option<String>;

    /// Overwrites any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryMemoStore {
    entries: HashMap<String, String>,
}

impl MemoStore for InMemoryMemoStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// TOML string map in the platform data directory.
#[derive(Debug)]
pub struct FileMemoStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileMemoStore {
    pub fn open_default() -> Result<Self> {
        let path = project_dirs()?.data_dir().join("memo.toml");
        Self::open(path)
    }

    /// Reads existing entries; a missing file starts empty.
    pub fn open(path: PathBuf) -> Result<Self> {
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read memo file: {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse memo file: {}", path.display()))?
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, entries })
    }
}

impl MemoStore for FileMemoStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_owned(), value.to_owned());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create memo directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string(&self.entries).context("Failed to serialize memo")?;
        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write memo file: {}", self.path.display()))
    }
}
