// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Lookaside (cache-aside) composition of two stores.
//!
//! Reads check the accelerator first and fill it from the authoritative store on a miss.
//! Writes and deletes go to the authoritative store, then remove the key from the
//! accelerator. The accelerator is never written with a value the authoritative store has
//! not committed, and an accelerator failure never fails an operation.

use std::sync::atomic::{AtomicBool, Ordering};

use futures::join;
use hord_store::{Bytes, Error, Result, Store, validate_entry, validate_key};

use crate::telemetry::{self, Activity, Operation};

/// Health of a [`Lookaside`] store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    /// Both stores are healthy.
    Healthy,
    /// The authoritative store is healthy but the accelerator is not. Every operation
    /// still works, reads just take the slower path.
    Degraded,
}

/// A store that puts an accelerator (a cache) in front of an authoritative store.
///
/// The authoritative store is the source of truth. The accelerator only makes reads
/// faster and may lose data or fail at any time:
///
/// - `get` returns the accelerator's value on a hit. On a miss or an accelerator error it
///   reads the authoritative store and copies the value into the accelerator.
/// - `set` writes the authoritative store, then deletes the key from the accelerator so
///   the next `get` reloads it.
/// - `delete` deletes from the authoritative store, then from the accelerator.
/// - `keys` lists the authoritative store only.
///
/// Accelerator failures are logged and otherwise ignored. Authoritative failures are
/// returned, naming the operation that failed. A [`Error::Canceled`] reported by either
/// store ends a read before it moves on to the next store.
///
/// The composition never changes after construction and there is no locking; the only
/// mutable state is the closed flag.
///
/// # Concurrent writes
///
/// A `get` that reads the authoritative store before a concurrent `set` or `delete` of the
/// same key, but populates the accelerator after that write has invalidated it, puts the
/// old value back into the accelerator. Later reads return that stale value until the next
/// write to the key or until the accelerator evicts it on its own.
/// `MemoryStore` never evicts, so callers that read and write one key concurrently should
/// use an accelerator with an expiry.
///
/// # Examples
///
/// ```
/// use hord::Lookaside;
/// use hord_memory::MemoryStore;
/// use hord_store::Store;
/// # futures::executor::block_on(async {
///
/// let database = MemoryStore::new();
/// let cache = MemoryStore::new();
/// let store = Lookaside::new(database, cache.clone());
///
/// store.set("user:1", "alice".into()).await?;
/// assert!(!cache.contains_key("user:1"));
///
/// assert_eq!(store.get("user:1").await?, "alice");
/// assert!(cache.contains_key("user:1"));
/// # Ok::<(), hord_store::Error>(())
/// # });
/// ```
#[derive(Debug)]
pub struct Lookaside<A, C> {
    authoritative: A,
    accelerator: C,
    closed: AtomicBool,
}

impl<A, C> Lookaside<A, C> {
    /// Composes `authoritative` and `accelerator` into one store.
    ///
    /// Performs no I/O.
    #[must_use]
    pub fn new(authoritative: A, accelerator: C) -> Self {
        Self {
            authoritative,
            accelerator,
            closed: AtomicBool::new(false),
        }
    }

    /// Returns the authoritative store.
    #[must_use]
    pub fn authoritative(&self) -> &A {
        &self.authoritative
    }

    /// Returns the accelerator store.
    #[must_use]
    pub fn accelerator(&self) -> &C {
        &self.accelerator
    }

    /// Returns `true` once the store has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::NotConnected);
        }
        Ok(())
    }
}

impl<A, C> Lookaside<A, C>
where
    A: Store,
    C: Store,
{
    /// Checks both stores and reports how healthy the composition is.
    ///
    /// # Errors
    ///
    /// Fails if the store is closed or the authoritative store is unhealthy. An unhealthy
    /// accelerator only yields [`Health::Degraded`].
    pub async fn health(&self) -> Result<Health> {
        self.ensure_open()?;

        let (authoritative, accelerator) = join!(self.authoritative.health_check(), self.accelerator.health_check());
        authoritative.map_err(|error| authoritative_failure(Operation::HealthCheck, error))?;

        match accelerator {
            Ok(()) => Ok(Health::Healthy),
            Err(error) => {
                telemetry::accelerator_failed(Operation::HealthCheck, &error);
                Ok(Health::Degraded)
            }
        }
    }

    /// Copies a value read from the authoritative store into the accelerator.
    async fn populate(&self, key: &str, value: Bytes) {
        match self.accelerator.set(key, value).await {
            Ok(()) => telemetry::activity(Operation::Get, Activity::Populated, key),
            Err(error) => telemetry::accelerator_failed(Operation::Get, &error),
        }
    }

    /// Drops `key` from the accelerator after an authoritative write.
    async fn invalidate(&self, operation: Operation, key: &str) {
        match self.accelerator.delete(key).await {
            Ok(()) => telemetry::activity(operation, Activity::Invalidated, key),
            Err(error) => telemetry::accelerator_failed(operation, &error),
        }
    }
}

impl<A, C> Store for Lookaside<A, C>
where
    A: Store,
    C: Store,
{
    async fn setup(&self) -> Result<()> {
        self.ensure_open()?;

        let (authoritative, accelerator) = join!(self.authoritative.setup(), self.accelerator.setup());
        authoritative.map_err(|error| authoritative_failure(Operation::Setup, error))?;
        accelerator.map_err(|error| error.context(Operation::Setup.accelerator_context()))
    }

    async fn health_check(&self) -> Result<()> {
        self.health().await.map(|_| ())
    }

    async fn get(&self, key: &str) -> Result<Bytes> {
        self.ensure_open()?;
        validate_key(key)?;

        match self.accelerator.get(key).await {
            Ok(value) => {
                telemetry::activity(Operation::Get, Activity::Hit, key);
                return Ok(value);
            }
            Err(Error::Canceled) => return Err(Error::Canceled),
            Err(Error::NotFound) => telemetry::activity(Operation::Get, Activity::Miss, key),
            Err(error) => telemetry::accelerator_failed(Operation::Get, &error),
        }

        let value = self
            .authoritative
            .get(key)
            .await
            .map_err(|error| authoritative_failure(Operation::Get, error))?;

        self.populate(key, value.clone()).await;
        Ok(value)
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<()> {
        self.ensure_open()?;
        validate_entry(key, &value)?;

        self.authoritative
            .set(key, value)
            .await
            .map_err(|error| authoritative_failure(Operation::Set, error))?;

        self.invalidate(Operation::Set, key).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.ensure_open()?;
        validate_key(key)?;

        // A backend that reports an absent key as `NotFound` has still deleted it.
        match self.authoritative.delete(key).await {
            Ok(()) | Err(Error::NotFound) => {}
            Err(error) => return Err(authoritative_failure(Operation::Delete, error)),
        }

        self.invalidate(Operation::Delete, key).await;
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        self.ensure_open()?;

        self.authoritative
            .keys()
            .await
            .map_err(|error| authoritative_failure(Operation::Keys, error))
    }

    async fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        join!(self.authoritative.close(), self.accelerator.close());
        tracing::info!(store.strategy = "lookaside", "store.closed");
    }
}

/// Logs a real authoritative failure and names the operation in the error.
///
/// `NotFound`, validation errors and cancellations are expected outcomes and pass through
/// unlogged and unchanged.
fn authoritative_failure(operation: Operation, error: Error) -> Error {
    if matches!(error, Error::Unavailable { .. } | Error::NotConnected) {
        telemetry::authoritative_failed(operation, &error);
    }
    error.context(operation.authoritative_context())
}

#[cfg(test)]
mod tests {
    use hord_store::ErrorKind;
    use hord_store::testing::{MockStore, StoreOp};
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use super::*;

    fn value(bytes: &'static [u8]) -> Bytes {
        Bytes::from_static(bytes)
    }

    fn stores() -> (MockStore, MockStore, Lookaside<MockStore, MockStore>) {
        let database = MockStore::new();
        let cache = MockStore::new();
        let store = Lookaside::new(database.clone(), cache.clone());
        (database, cache, store)
    }

    #[tokio::test]
    async fn hit_does_not_touch_the_authoritative_store() {
        let (database, cache, store) = stores();
        cache.set("k", value(b"cached")).await.unwrap();
        cache.clear_operations();

        assert_eq!(store.get("k").await.unwrap(), value(b"cached"));
        assert!(database.operations().is_empty());
        assert_eq!(cache.operations(), vec![StoreOp::Get("k".into())]);
    }

    #[tokio::test]
    async fn miss_reads_through_and_populates() {
        let (database, cache, store) = stores();
        database.set("k", value(b"durable")).await.unwrap();
        database.clear_operations();

        assert_eq!(store.get("k").await.unwrap(), value(b"durable"));
        assert_eq!(database.operations(), vec![StoreOp::Get("k".into())]);
        assert_eq!(
            cache.operations(),
            vec![
                StoreOp::Get("k".into()),
                StoreOp::Set {
                    key: "k".into(),
                    value: value(b"durable"),
                },
            ]
        );
    }

    #[tokio::test]
    async fn authoritative_not_found_is_not_cached() {
        let (_database, cache, store) = stores();

        assert_eq!(store.get("missing").await.unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(cache.operations(), vec![StoreOp::Get("missing".into())]);
    }

    #[tokio::test]
    #[traced_test]
    async fn accelerator_error_on_get_falls_back() {
        let (database, cache, store) = stores();
        database.set("k", value(b"durable")).await.unwrap();
        cache.fail_when(|op| matches!(op, StoreOp::Get(_)));

        assert_eq!(store.get("k").await.unwrap(), value(b"durable"));
        assert!(cache.contains_key("k"));
        assert!(logs_contain("store.accelerator_error"));
    }

    #[tokio::test]
    async fn accelerator_cancellation_stops_the_read() {
        let (database, cache, store) = stores();
        database.set("k", value(b"durable")).await.unwrap();
        database.clear_operations();
        cache.fail_with(|op| matches!(op, StoreOp::Get(_)), ErrorKind::Canceled);

        assert_eq!(store.get("k").await.unwrap_err().kind(), ErrorKind::Canceled);
        assert!(database.operations().is_empty());
    }

    #[tokio::test]
    async fn authoritative_cancellation_skips_population() {
        let (database, cache, store) = stores();
        database.fail_with(|op| matches!(op, StoreOp::Get(_)), ErrorKind::Canceled);

        assert_eq!(store.get("k").await.unwrap_err().kind(), ErrorKind::Canceled);
        assert_eq!(cache.operations(), vec![StoreOp::Get("k".into())]);
    }

    #[tokio::test]
    #[traced_test]
    async fn population_failure_is_swallowed() {
        let (database, cache, store) = stores();
        database.set("k", value(b"durable")).await.unwrap();
        cache.fail_when(|op| matches!(op, StoreOp::Set { .. }));

        assert_eq!(store.get("k").await.unwrap(), value(b"durable"));
        assert!(!cache.contains_key("k"));
        assert!(logs_contain("store.accelerator_error"));
    }

    #[tokio::test]
    async fn set_writes_authoritative_then_invalidates() {
        let (database, cache, store) = stores();
        cache.set("k", value(b"stale")).await.unwrap();
        cache.clear_operations();

        store.set("k", value(b"fresh")).await.unwrap();

        assert_eq!(
            database.operations(),
            vec![StoreOp::Set {
                key: "k".into(),
                value: value(b"fresh"),
            }]
        );
        assert_eq!(cache.operations(), vec![StoreOp::Delete("k".into())]);
        assert!(!cache.contains_key("k"));
        assert_eq!(store.get("k").await.unwrap(), value(b"fresh"));
    }

    #[tokio::test]
    #[traced_test]
    async fn failed_authoritative_set_leaves_accelerator_untouched() {
        let (database, cache, store) = stores();
        database.fail_when(|op| matches!(op, StoreOp::Set { .. }));

        let error = store.set("k", value(b"v")).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unavailable);
        assert_eq!(error.to_string(), "authoritative set: backend unavailable");
        assert!(cache.operations().is_empty());
        assert!(logs_contain("store.authoritative_error"));
    }

    #[tokio::test]
    #[traced_test]
    async fn failed_invalidation_does_not_fail_set() {
        let (database, cache, store) = stores();
        cache.fail_when(|op| matches!(op, StoreOp::Delete(_)));

        store.set("k", value(b"v")).await.unwrap();
        assert!(database.contains_key("k"));
        assert!(logs_contain("store.accelerator_error"));
    }

    #[tokio::test]
    #[traced_test]
    async fn failure_logs_omit_the_key() {
        let (database, cache, store) = stores();
        cache.fail_when(|op| matches!(op, StoreOp::Delete(_)));
        database.fail_when(|op| matches!(op, StoreOp::Delete(_)));

        store.set("secret:42", value(b"v")).await.unwrap();
        store.delete("secret:43").await.unwrap_err();

        assert!(logs_contain("store.accelerator_error"));
        assert!(logs_contain("store.authoritative_error"));
        assert!(!logs_contain("secret:42"));
        assert!(!logs_contain("secret:43"));
    }

    #[tokio::test]
    async fn late_population_outlives_invalidation_until_next_write() {
        let (database, _cache, store) = stores();
        database.set("k", value(b"old")).await.unwrap();

        // A get that read "old" finishes populating after the set invalidated the key.
        store.set("k", value(b"new")).await.unwrap();
        store.populate("k", value(b"old")).await;
        assert_eq!(store.get("k").await.unwrap(), value(b"old"));

        store.set("k", value(b"newer")).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), value(b"newer"));
    }

    #[tokio::test]
    async fn delete_removes_from_both_stores() {
        let (database, cache, store) = stores();
        database.set("k", value(b"v")).await.unwrap();
        cache.set("k", value(b"v")).await.unwrap();

        store.delete("k").await.unwrap();
        assert!(!database.contains_key("k"));
        assert!(!cache.contains_key("k"));
    }

    #[tokio::test]
    async fn delete_invalidates_even_when_key_was_absent() {
        let (_database, cache, store) = stores();
        cache.set("ghost", value(b"stale")).await.unwrap();

        store.delete("ghost").await.unwrap();
        assert!(!cache.contains_key("ghost"));
    }

    #[tokio::test]
    async fn authoritative_not_found_on_delete_is_success() {
        let (database, cache, store) = stores();
        database.fail_with(|op| matches!(op, StoreOp::Delete(_)), ErrorKind::NotFound);
        cache.set("k", value(b"stale")).await.unwrap();

        store.delete("k").await.unwrap();
        assert!(!cache.contains_key("k"));

        database.clear_failures();
        assert_eq!(store.get("k").await.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn failed_authoritative_delete_is_surfaced() {
        let (database, cache, store) = stores();
        database.fail_when(|op| matches!(op, StoreOp::Delete(_)));

        let error = store.delete("k").await.unwrap_err();
        assert_eq!(error.to_string(), "authoritative delete: backend unavailable");
        assert!(cache.operations().is_empty());
    }

    #[tokio::test]
    async fn accelerator_failure_does_not_fail_delete() {
        let (_database, cache, store) = stores();
        cache.fail_when(|_| true);
        store.delete("k").await.unwrap();
    }

    #[tokio::test]
    async fn failed_authoritative_get_is_surfaced_and_not_cached() {
        let (database, cache, store) = stores();
        database.fail_when(|op| matches!(op, StoreOp::Get(_)));

        let error = store.get("k").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unavailable);
        assert_eq!(error.to_string(), "authoritative get: backend unavailable");
        assert_eq!(cache.operations(), vec![StoreOp::Get("k".into())]);
    }

    #[tokio::test]
    async fn failed_authoritative_keys_is_surfaced() {
        let (database, cache, store) = stores();
        database.fail_when(|op| matches!(op, StoreOp::Keys));

        let error = store.keys().await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unavailable);
        assert_eq!(error.to_string(), "authoritative keys: backend unavailable");
        assert!(cache.operations().is_empty());
    }

    #[tokio::test]
    async fn keys_ignore_the_accelerator() {
        let (database, cache, store) = stores();
        database.set("a", value(b"1")).await.unwrap();
        cache.set("stale", value(b"x")).await.unwrap();
        cache.clear_operations();

        assert_eq!(store.keys().await.unwrap(), vec!["a".to_string()]);
        assert!(cache.operations().is_empty());
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_a_store() {
        let (database, cache, store) = stores();

        assert_eq!(store.get("").await.unwrap_err().kind(), ErrorKind::InvalidKey);
        assert_eq!(store.set("", value(b"v")).await.unwrap_err().kind(), ErrorKind::InvalidKey);
        assert_eq!(store.set("k", Bytes::new()).await.unwrap_err().kind(), ErrorKind::InvalidData);
        assert_eq!(store.delete("").await.unwrap_err().kind(), ErrorKind::InvalidKey);

        assert!(database.operations().is_empty());
        assert!(cache.operations().is_empty());
    }

    #[tokio::test]
    async fn health_is_degraded_when_only_the_accelerator_fails() {
        let (_database, cache, store) = stores();
        assert_eq!(store.health().await.unwrap(), Health::Healthy);

        cache.fail_when(|op| matches!(op, StoreOp::HealthCheck));
        assert_eq!(store.health().await.unwrap(), Health::Degraded);
        store.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn health_fails_when_the_authoritative_store_fails() {
        let (database, _cache, store) = stores();
        database.fail_when(|op| matches!(op, StoreOp::HealthCheck));

        let error = store.health_check().await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unavailable);
        assert_eq!(error.to_string(), "authoritative health check: backend unavailable");
    }

    #[tokio::test]
    async fn setup_reaches_both_stores() {
        let (database, cache, store) = stores();
        store.setup().await.unwrap();
        assert_eq!(database.operations(), vec![StoreOp::Setup]);
        assert_eq!(cache.operations(), vec![StoreOp::Setup]);
    }

    #[tokio::test]
    async fn setup_surfaces_accelerator_failure() {
        let (_database, cache, store) = stores();
        cache.fail_when(|op| matches!(op, StoreOp::Setup));

        let error = store.setup().await.unwrap_err();
        assert_eq!(error.to_string(), "accelerator setup: backend unavailable");
    }

    #[tokio::test]
    async fn close_reaches_both_stores_once() {
        let (database, cache, store) = stores();
        store.close().await;
        store.close().await;

        assert!(store.is_closed());
        assert!(database.is_closed());
        assert!(cache.is_closed());
        assert_eq!(database.operations(), vec![StoreOp::Close]);
        assert_eq!(cache.operations(), vec![StoreOp::Close]);
    }

    #[tokio::test]
    async fn closed_store_does_not_reach_either_backend() {
        let (database, cache, store) = stores();
        store.close().await;
        database.clear_operations();
        cache.clear_operations();

        assert_eq!(store.get("k").await.unwrap_err().kind(), ErrorKind::NotConnected);
        assert_eq!(store.set("k", value(b"v")).await.unwrap_err().kind(), ErrorKind::NotConnected);
        assert_eq!(store.delete("k").await.unwrap_err().kind(), ErrorKind::NotConnected);
        assert_eq!(store.keys().await.unwrap_err().kind(), ErrorKind::NotConnected);
        assert_eq!(store.health_check().await.unwrap_err().kind(), ErrorKind::NotConnected);
        assert_eq!(store.setup().await.unwrap_err().kind(), ErrorKind::NotConnected);

        assert!(database.operations().is_empty());
        assert!(cache.operations().is_empty());
    }

    #[test]
    fn accessors_return_the_wrapped_stores() {
        let (database, cache, store) = stores();
        assert!(!store.is_closed());
        assert_eq!(store.authoritative().entry_count(), database.entry_count());
        assert_eq!(store.accelerator().entry_count(), cache.entry_count());
    }
}
