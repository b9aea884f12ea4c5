// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Mock store implementation for testing.
//!
//! This module provides [`MockStore`], an in-memory store that records every operation
//! and supports failure injection for testing error paths.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use bytes::Bytes;
use parking_lot::Mutex;

use crate::{Error, ErrorKind, Result, Store, validate_entry, validate_key};

/// Recorded store operation with full context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    /// `setup` was called.
    Setup,
    /// `health_check` was called.
    HealthCheck,
    /// `get` was called with the given key.
    Get(String),
    /// `set` was called with the given key and value.
    Set {
        /// The key that was written.
        key: String,
        /// The value that was written.
        value: Bytes,
    },
    /// `delete` was called with the given key.
    Delete(String),
    /// `keys` was called.
    Keys,
    /// `close` was called.
    Close,
}

type FailPredicate = Box<dyn Fn(&StoreOp) -> Option<ErrorKind> + Send + Sync>;

/// A configurable mock store for testing.
///
/// The store keeps its data in memory and follows the full store contract, including
/// input validation and the closed state. Operations are recorded only once they pass
/// validation, so the log shows exactly which calls reached the "backend".
///
/// Clones share state, so a test can hand one clone to the code under test and inspect
/// the other.
///
/// # Examples
///
/// ```
/// use hord_store::{Store, testing::{MockStore, StoreOp}};
///
/// # futures::executor::block_on(async {
/// let store = MockStore::new();
/// store.set("key", "value".into()).await.unwrap();
///
/// assert_eq!(store.get("key").await.unwrap(), "value");
/// assert_eq!(store.operations(), vec![
///     StoreOp::Set { key: "key".into(), value: "value".into() },
///     StoreOp::Get("key".into()),
/// ]);
/// # });
/// ```
///
/// # Failure Injection
///
/// ```
/// use hord_store::{ErrorKind, Store, testing::{MockStore, StoreOp}};
///
/// # futures::executor::block_on(async {
/// let store = MockStore::new();
///
/// // Fail every get
/// store.fail_when(|op| matches!(op, StoreOp::Get(_)));
/// assert_eq!(store.get("key").await.unwrap_err().kind(), ErrorKind::Unavailable);
///
/// // Report a cancellation for one key only
/// store.fail_with(|op| matches!(op, StoreOp::Get(k) if k == "slow"), ErrorKind::Canceled);
/// assert_eq!(store.get("slow").await.unwrap_err().kind(), ErrorKind::Canceled);
/// # });
/// ```
pub struct MockStore {
    data: Arc<Mutex<HashMap<String, Bytes>>>,
    operations: Arc<Mutex<Vec<StoreOp>>>,
    fail_when: Arc<Mutex<Option<FailPredicate>>>,
    closed: Arc<AtomicBool>,
}

impl std::fmt::Debug for MockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStore")
            .field("data", &self.data)
            .field("operations", &self.operations)
            .field("fail_when", &self.fail_when.lock().is_some())
            .field("closed", &self.closed.load(Ordering::Acquire))
            .finish()
    }
}

impl Clone for MockStore {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            operations: Arc::clone(&self.operations),
            fail_when: Arc::clone(&self.fail_when),
            closed: Arc::clone(&self.closed),
        }
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStore {
    /// Creates a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_data(HashMap::new())
    }

    /// Creates a mock store with pre-populated data.
    #[must_use]
    pub fn with_data(data: HashMap<String, Bytes>) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.data.lock().len()
    }

    /// Returns `true` if the store holds the given key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.lock().contains_key(key)
    }

    /// Returns `true` once `close` has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Fails every operation matching `predicate` with [`ErrorKind::Unavailable`].
    ///
    /// Replaces any previously configured predicate. `close` cannot be made to fail.
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&StoreOp) -> bool + Send + Sync + 'static,
    {
        self.fail_with(predicate, ErrorKind::Unavailable);
    }

    /// Fails every operation matching `predicate` with an error of the given kind.
    ///
    /// Replaces any previously configured predicate.
    pub fn fail_with<F>(&self, predicate: F, kind: ErrorKind)
    where
        F: Fn(&StoreOp) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(move |op| predicate(op).then_some(kind)));
    }

    /// Clears the failure predicate, allowing all operations to succeed.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Returns a clone of all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<StoreOp> {
        self.operations.lock().clone()
    }

    /// Clears all recorded operations.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    /// Records `op` and returns the injected failure for it, if any.
    fn begin(&self, op: StoreOp) -> Result<()> {
        let failure = self.fail_when.lock().as_ref().and_then(|predicate| predicate(&op));
        self.operations.lock().push(op);
        match failure {
            Some(ErrorKind::Unavailable) => Err(Error::unavailable("mock: injected failure")),
            Some(kind) => Err(Error::from(kind)),
            None => Ok(()),
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::NotConnected);
        }
        Ok(())
    }
}

impl Store for MockStore {
    async fn setup(&self) -> Result<()> {
        self.ensure_open()?;
        self.begin(StoreOp::Setup)
    }

    async fn health_check(&self) -> Result<()> {
        self.ensure_open()?;
        self.begin(StoreOp::HealthCheck)
    }

    async fn get(&self, key: &str) -> Result<Bytes> {
        self.ensure_open()?;
        validate_key(key)?;
        self.begin(StoreOp::Get(key.to_owned()))?;
        self.data.lock().get(key).cloned().ok_or(Error::NotFound)
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<()> {
        self.ensure_open()?;
        validate_entry(key, &value)?;
        self.begin(StoreOp::Set {
            key: key.to_owned(),
            value: value.clone(),
        })?;
        self.data.lock().insert(key.to_owned(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.ensure_open()?;
        validate_key(key)?;
        self.begin(StoreOp::Delete(key.to_owned()))?;
        self.data.lock().remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        self.ensure_open()?;
        self.begin(StoreOp::Keys)?;
        Ok(self.data.lock().keys().cloned().collect())
    }

    async fn close(&self) {
        self.operations.lock().push(StoreOp::Close);
        self.closed.store(true, Ordering::Release);
    }
}
