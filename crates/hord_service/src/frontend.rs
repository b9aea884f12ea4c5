// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Serving client requests from a store.

use std::{
    convert::Infallible,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use hord_store::{Error, Store};

use crate::{DeleteRequest, DeleteResponse, GetRequest, GetResponse, Record, Request, Response, SetRequest, SetResponse, Status};

/// Handles client requests against a single store.
///
/// Every outcome, including a missing key or a backend failure, is reported in the
/// response [`Status`]. Store errors are logged at `trace` with their details but never
/// copied into a response.
///
/// Values are written as [`Record`]s, so a get returns the data together with the time it
/// was written.
///
/// # Examples
///
/// ```
/// use hord_memory::MemoryStore;
/// use hord_service::{Frontend, GetRequest, SetRequest, StatusCode};
///
/// # futures::executor::block_on(async {
/// let frontend = Frontend::new(MemoryStore::new());
///
/// let response = frontend.set(SetRequest::new("user:1", "alice")).await;
/// assert_eq!(response.status.code, StatusCode::Success);
///
/// let response = frontend.get(GetRequest::new("user:1")).await;
/// assert_eq!(response.data, "alice");
/// assert!(response.last_updated > 0);
///
/// let response = frontend.get(GetRequest::new("")).await;
/// assert_eq!(response.status.code, StatusCode::InvalidKey);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct Frontend<S> {
    store: S,
}

impl<S> Frontend<S> {
    /// Creates a frontend serving requests from `store`.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the frontend and returns the store.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: Store> Frontend<S> {
    /// Reads the record stored under the request key.
    pub async fn get(&self, request: GetRequest) -> GetResponse {
        if request.key.is_empty() {
            tracing::trace!("request.rejected: key not defined");
            return GetResponse::failed(Status::KEY_NOT_DEFINED);
        }

        let value = match self.store.get(&request.key).await {
            Ok(value) => value,
            Err(error) => return GetResponse::failed(failure(&request.key, &error, Status::FETCH_FAILED)),
        };

        match Record::decode(&value) {
            Ok(record) => GetResponse {
                status: Status::SUCCESS,
                key: request.key,
                data: record.data,
                last_updated: record.last_updated,
            },
            Err(error) => {
                tracing::trace!(request.key = %request.key, request.error = %error, "request.failed");
                GetResponse::failed(Status::FETCH_FAILED)
            }
        }
    }

    /// Stores the request data under the request key, stamped with the current time.
    pub async fn set(&self, request: SetRequest) -> SetResponse {
        if request.key.is_empty() {
            tracing::trace!("request.rejected: key not defined");
            return SetResponse {
                status: Status::KEY_NOT_DEFINED,
                key: String::new(),
            };
        }

        let value = match Record::new(request.data).encode() {
            Ok(value) => value,
            Err(error) => {
                tracing::trace!(request.key = %request.key, request.error = %error, "request.failed");
                return SetResponse {
                    status: Status::STORE_FAILED,
                    key: String::new(),
                };
            }
        };

        match self.store.set(&request.key, value).await {
            Ok(()) => SetResponse {
                status: Status::SUCCESS,
                key: request.key,
            },
            Err(error) => SetResponse {
                status: failure(&request.key, &error, Status::STORE_FAILED),
                key: String::new(),
            },
        }
    }

    /// Removes the request key.
    pub async fn delete(&self, request: DeleteRequest) -> DeleteResponse {
        if request.key.is_empty() {
            tracing::trace!("request.rejected: key not defined");
            return DeleteResponse {
                status: Status::KEY_NOT_DEFINED,
                key: String::new(),
            };
        }

        match self.store.delete(&request.key).await {
            Ok(()) => DeleteResponse {
                status: Status::SUCCESS,
                key: request.key,
            },
            Err(error) => DeleteResponse {
                status: failure(&request.key, &error, Status::DELETE_FAILED),
                key: String::new(),
            },
        }
    }

    /// Dispatches any request to the matching operation.
    pub async fn handle(&self, request: Request) -> Response {
        match request {
            Request::Get(request) => Response::Get(self.get(request).await),
            Request::Set(request) => Response::Set(self.set(request).await),
            Request::Delete(request) => Response::Delete(self.delete(request).await),
        }
    }
}

fn failure(key: &str, error: &Error, status: Status) -> Status {
    tracing::trace!(request.key = key, request.error = %error, "request.failed");
    Status::from_error_kind(error.kind(), status)
}

/// The frontend is always ready and never fails at the service level.
impl<S> tower_service::Service<Request> for Frontend<S>
where
    S: Store + Clone + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let frontend = self.clone();
        Box::pin(async move { Ok(frontend.handle(request).await) })
    }
}
