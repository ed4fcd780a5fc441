use std::collections::HashMap;
use std::sync::RwLock;

use super::{namespaced, PreferenceStore};
use crate::prelude::*;

/// In-process store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    namespace: String,
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            values: RwLock::new(HashMap::new()),
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str, default: &str) -> String {
        self.values
            .read()
            .unwrap()
            .get(&namespaced(&self.namespace, key))
            .cloned()
            .unwrap_or_else(|| default.to_owned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .unwrap()
            .insert(namespaced(&self.namespace, key), value.to_owned());
        Ok(())
    }
}
