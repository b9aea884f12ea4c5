// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! The key-value store contract shared by every hord store.
//!
//! This crate defines the [`Store`] trait that backing stores and composed stores
//! implement, the [`Error`] type they all report, and the key/value validation every
//! store applies before doing any I/O.
//!
//! # Implementing a Store
//!
//! ```
//! use bytes::Bytes;
//! use hord_store::{Error, Result, Store, validate_entry, validate_key};
//! use std::collections::HashMap;
//! use std::sync::RwLock;
//!
//! struct SimpleStore(RwLock<HashMap<String, Bytes>>);
//!
//! impl Store for SimpleStore {
//!     async fn setup(&self) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     async fn health_check(&self) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     async fn get(&self, key: &str) -> Result<Bytes> {
//!         validate_key(key)?;
//!         self.0.read().unwrap().get(key).cloned().ok_or(Error::NotFound)
//!     }
//!
//!     async fn set(&self, key: &str, value: Bytes) -> Result<()> {
//!         validate_entry(key, &value)?;
//!         self.0.write().unwrap().insert(key.to_owned(), value);
//!         Ok(())
//!     }
//!
//!     async fn delete(&self, key: &str) -> Result<()> {
//!         validate_key(key)?;
//!         self.0.write().unwrap().remove(key);
//!         Ok(())
//!     }
//!
//!     async fn keys(&self) -> Result<Vec<String>> {
//!         Ok(self.0.read().unwrap().keys().cloned().collect())
//!     }
//!
//!     async fn close(&self) {}
//! }
//! ```
//!
//! # Dynamic Dispatch
//!
//! [`DynamicStore`] wraps any `Store` in a clonable, type-erased handle. This is useful
//! when the concrete store is only chosen at runtime.

mod dynamic;
pub mod error;
pub(crate) mod store;
#[cfg(any(feature = "test-util", test))]
pub mod testing;

#[doc(inline)]
pub use bytes::Bytes;
#[doc(inline)]
pub use dynamic::{DynamicStore, StoreExt};
#[doc(inline)]
pub use error::{BoxError, Error, ErrorKind, Result};
#[doc(inline)]
pub use store::{Store, validate_entry, validate_key, validate_value};
