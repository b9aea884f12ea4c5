// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Type-erased store for mixing heterogeneous backends.

use std::{fmt::Debug, sync::Arc};

use bytes::Bytes;

use crate::{Result, Store, store::DynStore};

/// Extension trait for converting any [`Store`] into a [`DynamicStore`].
///
/// Implemented for every `Store`.
///
/// # Examples
///
/// ```
/// use hord_store::{DynamicStore, Store, StoreExt};
///
/// fn erase<S: Store + 'static>(store: S) -> DynamicStore {
///     store.into_dynamic()
/// }
/// ```
pub trait StoreExt: Sized {
    /// Converts this store into a [`DynamicStore`].
    fn into_dynamic(self) -> DynamicStore;
}

impl<T> StoreExt for T
where
    T: Store + 'static,
{
    fn into_dynamic(self) -> DynamicStore {
        DynamicStore::new(self)
    }
}

/// A clonable store with the concrete type erased.
///
/// Clones share the same underlying store. Use this where the concrete store is only
/// known at runtime, such as the result of composing stores from configuration.
pub struct DynamicStore(Arc<DynStore<'static>>);

impl DynamicStore {
    /// Creates a new dynamic store from any [`Store`] implementation.
    pub fn new<T>(store: T) -> Self
    where
        T: Store + 'static,
    {
        if let Some(existing) = (&store as &dyn std::any::Any).downcast_ref::<Self>() {
            return existing.clone();
        }
        Self(DynStore::new_arc(store))
    }

    /// Returns `true` if both handles point at the same underlying store.
    #[must_use]
    pub fn same_store(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Debug for DynamicStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicStore").finish_non_exhaustive()
    }
}

impl Clone for DynamicStore {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl Store for DynamicStore {
    async fn setup(&self) -> Result<()> {
        self.0.setup().await
    }

    async fn health_check(&self) -> Result<()> {
        self.0.health_check().await
    }

    async fn get(&self, key: &str) -> Result<Bytes> {
        self.0.get(key).await
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<()> {
        self.0.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.0.delete(key).await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        self.0.keys().await
    }

    async fn close(&self) {
        self.0.close().await;
    }
}
