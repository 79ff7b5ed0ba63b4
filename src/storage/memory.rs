use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use super::Storage;
use crate::error::StorageError;

#[derive(Debug, Default)]
struct Inner {
    values: HashMap<String, Value>,
    failing: bool,
    writes: usize,
}

/// In-process store. Clones share contents, so a test can keep a handle
/// while the coordinator owns another.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StorageError::Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.inner.borrow_mut().failing = failing;
    }

    /// Number of successful `set` calls so far.
    pub fn writes(&self) -> usize {
        self.inner.borrow().writes
    }

    /// Store a raw value, bypassing the failure switch and write counter.
    pub fn seed(&self, key: &str, value: Value) {
        self.inner.borrow_mut().values.insert(key.to_string(), value);
    }

    pub fn peek(&self, key: &str) -> Option<Value> {
        self.inner.borrow().values.get(key).cloned()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let inner = self.inner.borrow();
        if inner.failing {
            return Err(StorageError::Unavailable("memory store disabled".into()));
        }
        Ok(inner.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut inner = self.inner.borrow_mut();
        if inner.failing {
            return Err(StorageError::Unavailable("memory store disabled".into()));
        }
        inner.values.insert(key.to_string(), value);
        inner.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.borrow_mut();
        if inner.failing {
            return Err(StorageError::Unavailable("memory store disabled".into()));
        }
        inner.values.remove(key);
        Ok(())
    }
}
