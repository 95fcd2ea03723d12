//! Option stores.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};

use crate::error::{PersistenceError, Result};
use crate::io::{load_options_file, save_options_file};
use crate::sink::OptionSink;

/// Options persisted as a single JSON object on disk.
///
/// Every [`OptionSink::set_option`] call rewrites the whole file atomically.
#[derive(Debug)]
pub struct JsonOptionStore {
    path: PathBuf,
    options: Mutex<Map<String, Value>>,
}

impl JsonOptionStore {
    /// Open the store at `path`. A missing file starts an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let options = load_options_file(&path)?.unwrap_or_default();
        Ok(Self {
            path,
            options: Mutex::new(options),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored options object, or `None` when nothing has been stored.
    pub fn load(&self) -> Option<Value> {
        let options = self.lock();
        (!options.is_empty()).then(|| Value::Object(options.clone()))
    }

    fn lock(&self) -> MutexGuard<'_, Map<String, Value>> {
        self.options.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OptionSink for JsonOptionStore {
    fn set_option(&self, key: &str, value: Value) -> Result<()> {
        let snapshot = {
            let mut options = self.lock();
            options.insert(key.to_string(), value);
            options.clone()
        };
        tracing::trace!(key, path = %self.path.display(), "persisting option");
        save_options_file(&snapshot, &self.path)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    options: Map<String, Value>,
    writes: Vec<(String, Value)>,
    rejected: Vec<String>,
}

/// In-memory option store recording every write.
///
/// Clones share the same state, so a host can keep a handle for inspection
/// after handing the store to a session.
#[derive(Debug, Clone, Default)]
pub struct MemoryOptionStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryOptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing options object. Non-object values are ignored.
    pub fn with_options(initial: Value) -> Self {
        let store = Self::default();
        if let Value::Object(map) = initial {
            store.lock().options = map;
        }
        store
    }

    /// Make every later write to `key` fail.
    pub fn reject(&self, key: impl Into<String>) {
        self.lock().rejected.push(key.into());
    }

    pub fn load(&self) -> Option<Value> {
        let state = self.lock();
        (!state.options.is_empty()).then(|| Value::Object(state.options.clone()))
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().options.get(key).cloned()
    }

    /// Every accepted write, in order.
    pub fn writes(&self) -> Vec<(String, Value)> {
        self.lock().writes.clone()
    }

    /// Number of accepted writes to `key`.
    pub fn write_count(&self, key: &str) -> usize {
        self.lock().writes.iter().filter(|(k, _)| k == key).count()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OptionSink for MemoryOptionStore {
    fn set_option(&self, key: &str, value: Value) -> Result<()> {
        let mut state = self.lock();
        if state.rejected.iter().any(|k| k == key) {
            return Err(PersistenceError::Rejected {
                key: key.to_string(),
            });
        }
        state.writes.push((key.to_string(), value.clone()));
        state.options.insert(key.to_string(), value);
        Ok(())
    }
}
