use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::PersistError;

/// String key-value storage supplied by the host (browser local storage,
/// a file, a database row).
pub trait KeyValueStore {
    /// Value under `key`, or `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistError>;
}

/// In-process store. Clones share the same entries, so a host can keep a
/// handle while the discovery store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Store that rejects every operation, as when the host has storage
/// disabled or over quota.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, PersistError> {
        Err(PersistError::Unavailable)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), PersistError> {
        Err(PersistError::Unavailable)
    }

    fn remove(&mut self, _key: &str) -> Result<(), PersistError> {
        Err(PersistError::Unavailable)
    }
}
