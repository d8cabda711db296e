//! Document store client for LIBRIS.
//!
//! A [`Store`] is an explicitly passed handle with a connect/close lifecycle.
//! Records live in named collections and are addressed by a store-assigned
//! UUID; [`Collection`] gives typed access to one collection. The backend is
//! selected from the endpoint URL scheme in the settings (`memory://` is the
//! in-process backend).

pub mod memory;

use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use uuid::timestamp::context::ContextV7;
use uuid::Uuid;

use memory::MemoryBackend;

/// Errors surfaced by the store collaborator.
///
/// These are propagated unchanged to callers; the store performs no retries.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unsupported store endpoint '{0}' (expected a memory:// URL)")]
    UnsupportedEndpoint(String),

    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// A record type that can be persisted in a named collection.
///
/// The store owns identifier assignment: ids are UUIDv7, handed out on first
/// insert and immutable afterwards.
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection this document type is stored in.
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;

    /// Called by the store exactly once, during insert.
    fn assign_id(&mut self, id: Uuid);
}

#[derive(Debug)]
enum Backend {
    Memory(MemoryBackend),
}

impl Backend {
    fn put(&self, collection: &str, id: Uuid, value: serde_json::Value) -> Result<(), StoreError> {
        match self {
            Backend::Memory(mem) => mem.put(collection, id, value),
        }
    }

    fn get(&self, collection: &str, id: Uuid) -> Result<Option<serde_json::Value>, StoreError> {
        match self {
            Backend::Memory(mem) => mem.get(collection, id),
        }
    }

    fn remove(&self, collection: &str, id: Uuid) -> Result<bool, StoreError> {
        match self {
            Backend::Memory(mem) => mem.remove(collection, id),
        }
    }

    fn values(&self, collection: &str) -> Result<Vec<serde_json::Value>, StoreError> {
        match self {
            Backend::Memory(mem) => mem.values(collection),
        }
    }

    fn len(&self, collection: &str) -> Result<u64, StoreError> {
        match self {
            Backend::Memory(mem) => mem.len(collection),
        }
    }
}

/// Handle to one logical database on a store backend.
///
/// Cheap to clone; all clones share the underlying connection. Call
/// [`Store::close`] when the process is done with it.
#[derive(Clone, Debug)]
pub struct Store {
    backend: Arc<Backend>,
    database: String,
}

impl Store {
    /// Connect to the store described by `endpoint` and select `database`.
    pub async fn connect(endpoint: &str, database: &str) -> Result<Self, StoreError> {
        let backend = match endpoint.split_once("://") {
            Some(("memory", _)) => Backend::Memory(MemoryBackend::new()),
            _ => return Err(StoreError::UnsupportedEndpoint(endpoint.to_string())),
        };

        tracing::info!(endpoint, database, "store connected");

        Ok(Self {
            backend: Arc::new(backend),
            database: database.to_string(),
        })
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Typed handle to the collection `T` is stored in.
    pub fn collection<T: Document>(&self) -> Collection<T> {
        Collection {
            backend: Arc::clone(&self.backend),
            _marker: PhantomData,
        }
    }

    /// Release the handle. Clones of this store (and collections derived from
    /// it) stay usable until they are dropped themselves.
    pub async fn close(self) {
        tracing::info!(database = %self.database, "store connection closed");
    }
}

/// Typed operations against one collection.
///
/// Every call is a single bounded round-trip against the backend.
pub struct Collection<T> {
    backend: Arc<Backend>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            _marker: PhantomData,
        }
    }
}

impl<T: Document> Collection<T> {
    /// Insert a batch of new documents, assigning each a fresh id.
    ///
    /// Returns the documents with their assigned ids filled in.
    pub async fn insert_many(&self, docs: Vec<T>) -> Result<Vec<T>, StoreError> {
        let mut inserted = Vec::with_capacity(docs.len());

        for mut doc in docs {
            doc.assign_id(new_document_id());
            self.backend
                .put(T::COLLECTION, doc.id(), serde_json::to_value(&doc)?)?;
            inserted.push(doc);
        }

        Ok(inserted)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        match self.backend.get(T::COLLECTION, id)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Upsert the full document under its current id.
    pub async fn save(&self, doc: &T) -> Result<(), StoreError> {
        self.backend
            .put(T::COLLECTION, doc.id(), serde_json::to_value(doc)?)
    }

    /// Remove a document. Returns whether a document existed under `id`.
    pub async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.backend.remove(T::COLLECTION, id)
    }

    pub async fn count(&self) -> Result<u64, StoreError> {
        self.backend.len(T::COLLECTION)
    }

    /// All documents, ordered by id. Ids are UUIDv7, so this is insertion
    /// order for documents inserted by this store.
    pub async fn find_all(&self) -> Result<Vec<T>, StoreError> {
        self.backend
            .values(T::COLLECTION)?
            .into_iter()
            .map(|value| serde_json::from_value(value).map_err(StoreError::from))
            .collect()
    }

    /// All documents matching `predicate`, in the same order as
    /// [`Collection::find_all`].
    pub async fn find_where<P>(&self, predicate: P) -> Result<Vec<T>, StoreError>
    where
        P: Fn(&T) -> bool,
    {
        let mut matched = self.find_all().await?;
        matched.retain(|doc| predicate(doc));
        Ok(matched)
    }
}

// ContextV7 keeps ids strictly increasing even within one millisecond, so
// id order is insertion order.
static ID_CONTEXT: Lazy<Mutex<ContextV7>> = Lazy::new(|| Mutex::new(ContextV7::new()));

fn new_document_id() -> Uuid {
    Uuid::new_v7(uuid::Timestamp::now(&*ID_CONTEXT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Note {
        id: Uuid,
        body: String,
        pinned: bool,
    }

    impl Note {
        fn new(body: &str, pinned: bool) -> Self {
            Self {
                id: Uuid::nil(),
                body: body.to_string(),
                pinned,
            }
        }
    }

    impl Document for Note {
        const COLLECTION: &'static str = "notes";

        fn id(&self) -> Uuid {
            self.id
        }

        fn assign_id(&mut self, id: Uuid) {
            self.id = id;
        }
    }

    async fn test_store() -> Store {
        Store::connect("memory://local", "store-tests").await.unwrap()
    }

    #[tokio::test]
    async fn connect_rejects_unknown_scheme() {
        let err = Store::connect("ws://127.0.0.1:8000", "store-tests")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedEndpoint(_)));
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids() {
        let store = test_store().await;
        let notes = store
            .collection::<Note>()
            .insert_many(vec![Note::new("a", false), Note::new("b", true)])
            .await
            .unwrap();

        assert_eq!(notes.len(), 2);
        assert!(notes.iter().all(|n| !n.id.is_nil()));
        assert_ne!(notes[0].id, notes[1].id);
    }

    #[tokio::test]
    async fn find_by_id_roundtrips() {
        let store = test_store().await;
        let notes = store.collection::<Note>();
        let inserted = notes
            .insert_many(vec![Note::new("remember the milk", false)])
            .await
            .unwrap();

        let loaded = notes.find_by_id(inserted[0].id).await.unwrap().unwrap();
        assert_eq!(loaded.body, "remember the milk");

        let missing = notes.find_by_id(Uuid::nil()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn save_is_an_upsert() {
        let store = test_store().await;
        let notes = store.collection::<Note>();
        let mut note = notes
            .insert_many(vec![Note::new("draft", false)])
            .await
            .unwrap()
            .remove(0);

        note.body = "final".to_string();
        notes.save(&note).await.unwrap();

        assert_eq!(notes.count().await.unwrap(), 1);
        let loaded = notes.find_by_id(note.id).await.unwrap().unwrap();
        assert_eq!(loaded.body, "final");
    }

    #[tokio::test]
    async fn delete_reports_presence() {
        let store = test_store().await;
        let notes = store.collection::<Note>();
        let inserted = notes
            .insert_many(vec![Note::new("gone soon", false)])
            .await
            .unwrap();

        assert!(notes.delete(inserted[0].id).await.unwrap());
        assert!(!notes.delete(inserted[0].id).await.unwrap());
        assert_eq!(notes.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn find_where_filters() {
        let store = test_store().await;
        let notes = store.collection::<Note>();
        notes
            .insert_many(vec![
                Note::new("a", true),
                Note::new("b", false),
                Note::new("c", true),
            ])
            .await
            .unwrap();

        let pinned = notes.find_where(|n| n.pinned).await.unwrap();
        assert_eq!(pinned.len(), 2);
        assert!(pinned.iter().all(|n| n.pinned));
    }

    #[tokio::test]
    async fn collections_are_isolated_per_store() {
        let store = test_store().await;
        let other = test_store().await;

        store
            .collection::<Note>()
            .insert_many(vec![Note::new("mine", false)])
            .await
            .unwrap();

        assert_eq!(other.collection::<Note>().count().await.unwrap(), 0);
    }
}
