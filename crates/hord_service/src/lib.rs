// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Client-facing get, set and delete on top of a hord store.
//!
//! [`Frontend`] turns requests into store calls and store results into responses. It is
//! independent of any transport: an RPC or HTTP server decodes its own messages into
//! [`Request`]s, hands them to the frontend, and encodes the [`Response`]s it gets back.
//!
//! # Status Codes
//!
//! Every response carries a [`Status`]. Failures are never reported through the transport.
//!
//! | code | description |
//! |------|-------------|
//! | 0 | empty |
//! | 4 | `Key not defined` |
//! | 5 | `Failed to fetch data`, `Failed to store data` or `Failed to delete data` |
//!
//! # Tower Integration
//!
//! `Frontend` implements [`tower_service::Service<Request>`] with
//! [`Infallible`](std::convert::Infallible) as its error, so it can sit behind any tower
//! middleware stack.
//!
//! ```
//! use std::future::poll_fn;
//!
//! use hord_memory::MemoryStore;
//! use hord_service::{Frontend, GetRequest, Response, SetRequest};
//! use tower_service::Service;
//!
//! # futures::executor::block_on(async {
//! let mut service = Frontend::new(MemoryStore::new());
//!
//! poll_fn(|cx| service.poll_ready(cx)).await?;
//! service.call(SetRequest::new("user:1", "alice").into()).await?;
//!
//! let response = service.call(GetRequest::new("user:1").into()).await?;
//! assert_eq!(response.into_get().map(|r| r.data), Some("alice".into()));
//! # Ok::<(), std::convert::Infallible>(())
//! # });
//! ```

mod frontend;
mod record;
mod request;

#[doc(inline)]
pub use frontend::Frontend;
#[doc(inline)]
pub use record::{Record, RecordError};
#[doc(inline)]
pub use request::{
    DeleteRequest, DeleteResponse, GetRequest, GetResponse, Request, Response, SetRequest, SetResponse, Status, StatusCode,
    UnknownStatusCode,
};
