// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! In-memory store implementation using dashmap.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use dashmap::DashMap;
use hord_store::{Bytes, Error, Result, Store, validate_entry, validate_key};

use crate::builder::MemoryStoreBuilder;

#[derive(Debug)]
struct Shared {
    map: DashMap<String, Bytes>,
    closed: AtomicBool,
    name: Option<String>,
}

/// A concurrent in-memory store backed by a sharded hash map.
///
/// Clones share the same map, so a handle kept by a test observes every write made
/// through another handle. Closing any clone closes all of them.
///
/// # Examples
///
/// ```
/// use hord_memory::MemoryStore;
/// use hord_store::{ErrorKind, Store};
/// # futures::executor::block_on(async {
///
/// let store = MemoryStore::new();
/// store.set("key", "value".into()).await.unwrap();
/// assert!(store.contains_key("key"));
///
/// store.close().await;
/// assert_eq!(store.get("key").await.unwrap_err().kind(), ErrorKind::NotConnected);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<Shared>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a new builder for configuring a store.
    #[must_use]
    pub fn builder() -> MemoryStoreBuilder {
        MemoryStoreBuilder::new()
    }

    pub(crate) fn from_builder(builder: MemoryStoreBuilder) -> Self {
        let map = builder.initial_capacity.map_or_else(DashMap::new, DashMap::with_capacity);
        Self {
            inner: Arc::new(Shared {
                map,
                closed: AtomicBool::new(false),
                name: builder.name,
            }),
        }
    }

    /// Returns the name given to the store, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.map.len()
    }

    /// Returns `true` if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.map.is_empty()
    }

    /// Returns `true` if the store holds the given key.
    ///
    /// Inspection only; this works even after the store is closed.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.map.contains_key(key)
    }

    /// Returns `true` once the store has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::NotConnected);
        }
        Ok(())
    }
}

impl Store for MemoryStore {
    async fn setup(&self) -> Result<()> {
        self.ensure_open()
    }

    async fn health_check(&self) -> Result<()> {
        self.ensure_open()
    }

    async fn get(&self, key: &str) -> Result<Bytes> {
        self.ensure_open()?;
        validate_key(key)?;
        self.inner.map.get(key).map(|entry| entry.value().clone()).ok_or(Error::NotFound)
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<()> {
        self.ensure_open()?;
        validate_entry(key, &value)?;
        self.inner.map.insert(key.to_owned(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.ensure_open()?;
        validate_key(key)?;
        self.inner.map.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        self.ensure_open()?;
        Ok(self.inner.map.iter().map(|entry| entry.key().clone()).collect())
    }

    async fn close(&self) {
        if !self.inner.closed.swap(true, Ordering::AcqRel) {
            tracing::debug!(store.name = self.name(), store.entries = self.len(), "store.closed");
        }
    }
}
