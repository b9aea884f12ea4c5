// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! In-process hash-table store.
//!
//! This crate provides [`MemoryStore`], a concurrent [`Store`](hord_store::Store) kept
//! entirely in memory. It is useful as a cache tier in front of a remote database, and as a
//! stand-in for real backends in tests. Use [`MemoryStoreBuilder`] to pre-size it or give
//! it a name for log output.
//!
//! # Quick Start
//!
//! ```
//! use hord_memory::MemoryStore;
//! use hord_store::Store;
//!
//! # futures::executor::block_on(async {
//! let store = MemoryStore::new();
//! store.setup().await?;
//!
//! store.set("user:1", "alice".into()).await?;
//! assert_eq!(store.get("user:1").await?, "alice");
//! # Ok::<(), hord_store::Error>(())
//! # });
//! ```

pub mod builder;
pub mod store;

#[doc(inline)]
pub use builder::MemoryStoreBuilder;
#[doc(inline)]
pub use store::MemoryStore;
