//! In-memory storage

use rustc_hash::FxHashMap;

use super::{Storage, StorageError, validate_key};

/// Storage that lives for the lifetime of the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: FxHashMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;

        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;

        self.entries.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;

        self.entries.remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn write_then_read() -> TestResult {
        let mut storage = MemoryStorage::new();

        storage.write("my_orders", "[]")?;

        assert_eq!(storage.read("my_orders")?.as_deref(), Some("[]"));
        assert_eq!(storage.len(), 1);

        Ok(())
    }

    #[test]
    fn missing_key_reads_none() -> TestResult {
        let storage = MemoryStorage::new();

        assert_eq!(storage.read("cart-storage")?, None);
        assert!(storage.is_empty());

        Ok(())
    }

    #[test]
    fn remove_is_idempotent() -> TestResult {
        let mut storage = MemoryStorage::new();
        storage.write("cart-storage", "{}")?;

        storage.remove("cart-storage")?;
        storage.remove("cart-storage")?;

        assert_eq!(storage.read("cart-storage")?, None);

        Ok(())
    }
}
