//! In-process store backend.
//!
//! Collections are maps from document id to the serialized document, behind a
//! single process-wide lock. Intended for local runs and tests; not optimized
//! for performance.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use serde_json::Value;
use uuid::Uuid;

use crate::StoreError;

type Collections = HashMap<String, BTreeMap<Uuid, Value>>;

#[derive(Debug, Default)]
pub struct MemoryBackend {
    collections: RwLock<Collections>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn put(&self, collection: &str, id: Uuid, value: Value) -> Result<(), StoreError> {
        let mut collections = self.write()?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id, value);
        Ok(())
    }

    pub(crate) fn get(&self, collection: &str, id: Uuid) -> Result<Option<Value>, StoreError> {
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(&id))
            .cloned())
    }

    pub(crate) fn remove(&self, collection: &str, id: Uuid) -> Result<bool, StoreError> {
        let mut collections = self.write()?;
        Ok(collections
            .get_mut(collection)
            .map(|docs| docs.remove(&id).is_some())
            .unwrap_or(false))
    }

    /// Documents in id order (BTreeMap iteration order).
    pub(crate) fn values(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    pub(crate) fn len(&self, collection: &str) -> Result<u64, StoreError> {
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .map(|docs| docs.len() as u64)
            .unwrap_or(0))
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Collections>, StoreError> {
        self.collections
            .read()
            .map_err(|_| StoreError::Backend("collection lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Collections>, StoreError> {
        self.collections
            .write()
            .map_err(|_| StoreError::Backend("collection lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_are_ordered_by_id() {
        let backend = MemoryBackend::new();
        let first = Uuid::from_u128(1);
        let second = Uuid::from_u128(2);

        // Insert out of order; reads come back in id order.
        backend.put("letters", second, json!({"v": "b"})).unwrap();
        backend.put("letters", first, json!({"v": "a"})).unwrap();

        let values = backend.values("letters").unwrap();
        assert_eq!(values, vec![json!({"v": "a"}), json!({"v": "b"})]);
    }

    #[test]
    fn missing_collection_is_empty() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.len("nothing").unwrap(), 0);
        assert!(backend.values("nothing").unwrap().is_empty());
        assert!(!backend.remove("nothing", Uuid::nil()).unwrap());
    }
}
