// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Put a fast cache in front of a slow database, behind one key-value interface.
//!
//! Every backing store implements [`Store`]. This crate composes two of them: an
//! *authoritative* store that holds the truth, and an *accelerator* that is consulted first
//! and repaired on a miss. The composed store is itself a [`Store`], so callers never know
//! whether a cache is present.
//!
//! # Lookaside Semantics
//!
//! - **get**: read the accelerator. On a hit, return it. On any failure other than
//!   cancellation, read the authoritative store and, if found, copy the value into the
//!   accelerator on a best-effort basis.
//! - **set** and **delete**: write the authoritative store first. Once that succeeds,
//!   remove the key from the accelerator on a best-effort basis.
//! - **keys**: served by the authoritative store only.
//!
//! Accelerator failures are logged and never returned, except from `setup`. Writes that
//! fail on the authoritative store leave the accelerator untouched.
//!
//! # Quick Start
//!
//! ```
//! use hord::{Config, Strategy, compose};
//! use hord_memory::MemoryStore;
//! use hord_store::Store;
//!
//! # futures::executor::block_on(async {
//! let store = compose(
//!     Config::new()
//!         .authoritative(MemoryStore::new())
//!         .accelerator(MemoryStore::new())
//!         .strategy_name("lookaside"),
//! )?;
//! store.setup().await?;
//!
//! store.set("user:1", "alice".into()).await?;
//! assert_eq!(store.get("user:1").await?, "alice");
//!
//! store.close().await;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # });
//! ```
//!
//! # Composing Without Configuration
//!
//! [`Lookaside`] can also be built directly when both stores are known statically. This
//! avoids dynamic dispatch and gives access to [`Lookaside::health`].
//!
//! ```
//! use hord::{Health, Lookaside};
//! use hord_memory::MemoryStore;
//!
//! # futures::executor::block_on(async {
//! let store = Lookaside::new(MemoryStore::new(), MemoryStore::new());
//! assert_eq!(store.health().await?, Health::Healthy);
//! # Ok::<(), hord_store::Error>(())
//! # });
//! ```
//!
//! # Logging
//!
//! Events are emitted with [`tracing`](https://docs.rs/tracing). Cache hits, misses and
//! repairs are `debug`, absorbed accelerator failures are `warn`, returned authoritative
//! failures are `error`, and composition and shutdown are `info`.

mod compose;
mod lookaside;
mod null;
mod telemetry;

#[doc(inline)]
pub use compose::{ComposeError, Config, Strategy, compose};
#[cfg(feature = "memory")]
#[cfg_attr(docsrs, doc(cfg(feature = "memory")))]
#[doc(inline)]
pub use hord_memory::{MemoryStore, MemoryStoreBuilder};
#[doc(inline)]
pub use hord_store::{Bytes, DynamicStore, Error, ErrorKind, Result, Store, StoreExt};
#[cfg(any(feature = "test-util", test))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-util")))]
#[doc(inline)]
pub use hord_store::testing::{MockStore, StoreOp};
#[doc(inline)]
pub use lookaside::{Health, Lookaside};
#[doc(inline)]
pub use null::NullStore;
