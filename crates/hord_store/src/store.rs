// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The store contract.
//!
//! [`Store`] is the interface every backing store (a database, a remote cache, an
//! in-process map) and every composed store implements. Callers written against it work
//! with any of them.

use bytes::Bytes;

use crate::{Error, Result};

/// A key-value store.
///
/// Keys are non-empty strings and values are non-empty byte sequences. Implementations
/// must follow these rules:
///
/// - `get`, `set` and `delete` reject an empty key with [`Error::InvalidKey`] before
///   doing any I/O, and `set` rejects an empty value with [`Error::InvalidData`].
///   [`validate_key`] and [`validate_value`] implement these checks.
/// - `get` on a missing key returns [`Error::NotFound`], never an empty value.
/// - `delete` on a missing key succeeds.
/// - After `close`, every operation returns [`Error::NotConnected`]. `close` itself never
///   fails and can be called any number of times. A closed store cannot reconnect.
/// - Backend failures are returned as errors, never as panics.
#[dynosaur::dynosaur(pub(crate) DynStore = dyn(box) Store, bridge(none))]
pub trait Store: Send + Sync {
    /// Prepares the underlying resources, such as creating tables.
    ///
    /// Safe to call repeatedly. Must be callable before any data operation.
    fn setup(&self) -> impl Future<Output = Result<()>> + Send;

    /// Reports whether the store can currently serve requests. Has no side effects.
    fn health_check(&self) -> impl Future<Output = Result<()>> + Send;

    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> impl Future<Output = Result<Bytes>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Bytes) -> impl Future<Output = Result<()>> + Send;

    /// Removes `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> impl Future<Output = Result<()>> + Send;

    /// Lists every key currently stored, in no particular order.
    fn keys(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Releases the underlying resources.
    fn close(&self) -> impl Future<Output = ()> + Send;
}

/// Rejects an empty key.
///
/// # Errors
///
/// Returns [`Error::InvalidKey`] if `key` is empty.
///
/// # Examples
///
/// ```
/// use hord_store::{validate_key, ErrorKind};
///
/// assert!(validate_key("user:1").is_ok());
/// assert_eq!(validate_key("").unwrap_err().kind(), ErrorKind::InvalidKey);
/// ```
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::InvalidKey);
    }
    Ok(())
}

/// Rejects an empty value.
///
/// # Errors
///
/// Returns [`Error::InvalidData`] if `value` is empty.
pub fn validate_value(value: &[u8]) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidData);
    }
    Ok(())
}

/// Rejects an empty key or an empty value, checking the key first.
///
/// # Errors
///
/// Returns [`Error::InvalidKey`] or [`Error::InvalidData`].
pub fn validate_entry(key: &str, value: &[u8]) -> Result<()> {
    validate_key(key)?;
    validate_value(value)
}
