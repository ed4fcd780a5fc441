//! Persistent key-value preferences.
//!
//! Only one preference exists today (the render mode), but stores are plain string maps
//! and never interpret what they hold. Keys are prefixed with a namespace so they can't
//! collide with anything else sharing the store.

mod file;
#[cfg(test)]
mod memory;

pub use file::FileStore;
#[cfg(test)]
pub use memory::MemoryStore;

use crate::prelude::*;
use crate::render::Mode;

pub trait PreferenceStore: Send + Sync {
    /// Returns the stored value for `key`, or `default` if nothing is stored.
    fn get(&self, key: &str, default: &str) -> String;
    /// Overwrites the stored value for `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

fn namespaced(namespace: &str, key: &str) -> String {
    format!("{namespace}.{key}")
}

/// Reads the stored render mode, falling back to the default for missing or unknown values.
pub fn read_mode(store: &dyn PreferenceStore) -> Mode {
    let value = store.get(MODE_KEY, Mode::default().as_str());
    Mode::from_preference(&value)
}

pub fn write_mode(store: &dyn PreferenceStore, mode: Mode) -> Result<()> {
    store.set(MODE_KEY, mode.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let store = MemoryStore::new(DEFAULT_NAMESPACE);

        store.set("mode", "markdown").unwrap();
        assert_eq!(store.get("mode", "html"), "markdown");
    }

    #[test]
    fn mode_default() {
        let store = MemoryStore::new(DEFAULT_NAMESPACE);
        assert_eq!(read_mode(&store), Mode::Html);
    }

    #[test]
    fn foreign_mode_value() {
        let store = MemoryStore::new(DEFAULT_NAMESPACE);

        store.set(MODE_KEY, "plaintext").unwrap();
        assert_eq!(read_mode(&store), Mode::Html);
        // The raw value is left alone.
        assert_eq!(store.get(MODE_KEY, "html"), "plaintext");
    }

    #[test]
    fn mode_round_trip() {
        let store = MemoryStore::new(DEFAULT_NAMESPACE);

        write_mode(&store, Mode::Markdown).unwrap();
        assert_eq!(read_mode(&store), Mode::Markdown);
    }
}
