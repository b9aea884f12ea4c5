// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! A store that is never connected.

use hord_store::{Bytes, Error, Result, Store};

/// A store that fails every operation with [`Error::NotConnected`].
///
/// [`compose`](crate::compose) hands this out alongside its error when a configuration is
/// invalid. Code that ignores the error then gets a predictable failure on its first
/// call, instead of a missing value. `close` does nothing.
///
/// # Examples
///
/// ```
/// use hord::NullStore;
/// use hord_store::{ErrorKind, Store};
/// # futures::executor::block_on(async {
///
/// let store = NullStore;
/// assert_eq!(store.get("x").await.unwrap_err().kind(), ErrorKind::NotConnected);
/// store.close().await;
/// # });
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullStore;

impl Store for NullStore {
    async fn setup(&self) -> Result<()> {
        Err(Error::NotConnected)
    }

    async fn health_check(&self) -> Result<()> {
        Err(Error::NotConnected)
    }

    async fn get(&self, _key: &str) -> Result<Bytes> {
        Err(Error::NotConnected)
    }

    async fn set(&self, _key: &str, _value: Bytes) -> Result<()> {
        Err(Error::NotConnected)
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Err(Error::NotConnected)
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Err(Error::NotConnected)
    }

    async fn close(&self) {}
}
