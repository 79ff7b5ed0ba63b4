//! Key-value persistence of JSON values.
//!
//! The playback core only ever talks to `Storage`; the runtime picks the
//! file-backed store, tests use the in-memory one.

mod json_file;
mod memory;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

use serde_json::Value;

use crate::error::StorageError;

pub trait Storage {
    /// `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;
    fn set(&mut self, key: &str, value: Value) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests;
