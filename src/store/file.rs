use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::{namespaced, PreferenceStore};
use crate::prelude::*;

/// Every origin's preferences, keyed by origin and then by namespaced key.
type Origins = BTreeMap<String, BTreeMap<String, String>>;

/// TOML-backed store scoped to a single origin.
///
/// The file holds one table per origin; a store only ever reads and writes its own.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    origin: String,
    namespace: String,
    origins: RwLock<Origins>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is treated as empty and created on the first `set`.
    pub fn open(path: impl Into<PathBuf>, origin: impl Into<String>, namespace: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let origins = load(&path)?;

        Ok(Self {
            path,
            origin: origin.into(),
            namespace: namespace.into(),
            origins: RwLock::new(origins),
        })
    }

    pub fn from_config(config: &Config, origin: impl Into<String>) -> Result<Self> {
        Self::open(config.store_path(), origin, &config.store.namespace)
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str, default: &str) -> String {
        self.origins
            .read()
            .unwrap()
            .get(&self.origin)
            .and_then(|values| values.get(&namespaced(&self.namespace, key)))
            .cloned()
            .unwrap_or_else(|| default.to_owned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut origins = self.origins.write().unwrap();

        origins
            .entry(self.origin.clone())
            .or_default()
            .insert(namespaced(&self.namespace, key), value.to_owned());

        save(&self.path, &origins)?;
        debug!("Stored {key} = \"{value}\" for origin {}.", self.origin);
        Ok(())
    }
}

fn load(path: &Path) -> Result<Origins> {
    if !path.exists() {
        return Ok(Origins::new());
    }

    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Could not read preference store {path:?}."))?;

    toml::from_str(&raw)
        .wrap_err_with(|| format!("Preference store {path:?} is not valid TOML."))
        .suggestion("The store only holds preferences - deleting it resets them to their defaults.")
}

fn save(path: &Path, origins: &Origins) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("Could not create directory {parent:?}."))?;
    }

    let raw = toml::to_string(origins)?;

    std::fs::write(path, raw)
        .wrap_err_with(|| format!("Could not write preference store {path:?}."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".wiki-gh/preferences.toml");

        let store = FileStore::open(&path, "https://www.steamgifts.com", "GHWSGI").unwrap();
        assert_eq!(store.get("mode", "html"), "html");
        store.set("mode", "markdown").unwrap();

        let reopened = FileStore::open(&path, "https://www.steamgifts.com", "GHWSGI").unwrap();
        assert_eq!(reopened.get("mode", "html"), "markdown");
    }

    #[test]
    fn origins_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");

        FileStore::open(&path, "https://a.example", "GHWSGI")
            .unwrap()
            .set("mode", "markdown")
            .unwrap();

        let other = FileStore::open(&path, "https://b.example", "GHWSGI").unwrap();
        assert_eq!(other.get("mode", "html"), "html");

        other.set("mode", "html").unwrap();
        let first = FileStore::open(&path, "https://a.example", "GHWSGI").unwrap();
        assert_eq!(first.get("mode", "html"), "markdown");
    }

    #[test]
    fn namespaced_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");

        FileStore::open(&path, FILE_ORIGIN, "GHWSGI")
            .unwrap()
            .set("mode", "markdown")
            .unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("GHWSGI.mode"));

        let foreign = FileStore::open(&path, FILE_ORIGIN, "OTHER").unwrap();
        assert_eq!(foreign.get("mode", "html"), "html");
    }

    #[test]
    fn corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        assert!(FileStore::open(&path, FILE_ORIGIN, "GHWSGI").is_err());
    }
}
