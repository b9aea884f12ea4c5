// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Request and response types for the operations exposed by [`Frontend`](crate::Frontend).

use std::fmt;

use bytes::Bytes;
use hord_store::ErrorKind;
use serde::{Deserialize, Serialize};

/// The outcome category reported to clients.
///
/// The numeric values are part of the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
#[repr(u32)]
pub enum StatusCode {
    /// The operation succeeded.
    Success = 0,
    /// The request did not carry a usable key.
    InvalidKey = 4,
    /// The store could not complete the operation.
    Failed = 5,
}

impl StatusCode {
    /// Returns the numeric wire value.
    #[must_use]
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

impl From<StatusCode> for u32 {
    fn from(code: StatusCode) -> Self {
        code.as_u32()
    }
}

impl TryFrom<u32> for StatusCode {
    type Error = UnknownStatusCode;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            4 => Ok(Self::InvalidKey),
            5 => Ok(Self::Failed),
            other => Err(UnknownStatusCode(other)),
        }
    }
}

/// A numeric status code with no [`StatusCode`] counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown status code {0}")]
pub struct UnknownStatusCode(pub u32);

/// The status attached to every response.
///
/// Responses are produced by the frontend, so they serialize but do not deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Status {
    /// The outcome category.
    pub code: StatusCode,
    /// A fixed, human-readable description. Never contains backend error text.
    pub description: &'static str,
}

impl Status {
    /// The status of a successful operation. Its description is empty.
    pub const SUCCESS: Self = Self::new(StatusCode::Success, "");
    /// The request key was empty.
    pub const KEY_NOT_DEFINED: Self = Self::new(StatusCode::InvalidKey, "Key not defined");
    /// A get could not be served.
    pub const FETCH_FAILED: Self = Self::new(StatusCode::Failed, "Failed to fetch data");
    /// A set could not be applied.
    pub const STORE_FAILED: Self = Self::new(StatusCode::Failed, "Failed to store data");
    /// A delete could not be applied.
    pub const DELETE_FAILED: Self = Self::new(StatusCode::Failed, "Failed to delete data");

    const fn new(code: StatusCode, description: &'static str) -> Self {
        Self { code, description }
    }

    /// Maps a store error to the status reported for it.
    ///
    /// Invalid keys keep their own status. Every other failure is reported as `failure`.
    #[must_use]
    pub fn from_error_kind(kind: ErrorKind, failure: Self) -> Self {
        match kind {
            ErrorKind::InvalidKey => Self::KEY_NOT_DEFINED,
            _ => failure,
        }
    }

    /// Returns `true` for [`StatusCode::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == StatusCode::Success
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{}", self.code.as_u32())
        } else {
            write!(f, "{} {}", self.code.as_u32(), self.description)
        }
    }
}

/// Request to read the data stored under a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRequest {
    /// The key to read.
    pub key: String,
}

impl GetRequest {
    /// Creates a new get request for the given key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Request to store data under a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRequest {
    /// The key to write.
    pub key: String,
    /// The data to store. May be empty.
    pub data: Bytes,
}

impl SetRequest {
    /// Creates a new set request for the given key and data.
    #[must_use]
    pub fn new(key: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            key: key.into(),
            data: data.into(),
        }
    }
}

/// Request to remove a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    /// The key to remove.
    pub key: String,
}

impl DeleteRequest {
    /// Creates a new delete request for the given key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Response to a [`GetRequest`].
///
/// `key`, `data` and `last_updated` are only filled in on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetResponse {
    /// The outcome.
    pub status: Status,
    /// The key that was read.
    pub key: String,
    /// The stored data.
    pub data: Bytes,
    /// Unix time of the last write, in nanoseconds.
    pub last_updated: i64,
}

impl GetResponse {
    pub(crate) fn failed(status: Status) -> Self {
        Self {
            status,
            key: String::new(),
            data: Bytes::new(),
            last_updated: 0,
        }
    }
}

/// Response to a [`SetRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetResponse {
    /// The outcome.
    pub status: Status,
    /// The key that was written. Empty on failure.
    pub key: String,
}

/// Response to a [`DeleteRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteResponse {
    /// The outcome.
    pub status: Status,
    /// The key that was removed. Empty on failure.
    pub key: String,
}

/// Any request the frontend handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Request {
    /// Read a key.
    Get(GetRequest),
    /// Write a key.
    Set(SetRequest),
    /// Remove a key.
    Delete(DeleteRequest),
}

impl From<GetRequest> for Request {
    fn from(request: GetRequest) -> Self {
        Self::Get(request)
    }
}

impl From<SetRequest> for Request {
    fn from(request: SetRequest) -> Self {
        Self::Set(request)
    }
}

impl From<DeleteRequest> for Request {
    fn from(request: DeleteRequest) -> Self {
        Self::Delete(request)
    }
}

/// The response to a [`Request`], in the matching variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Response {
    /// Response to [`Request::Get`].
    Get(GetResponse),
    /// Response to [`Request::Set`].
    Set(SetResponse),
    /// Response to [`Request::Delete`].
    Delete(DeleteResponse),
}

impl Response {
    /// Returns the status of the response.
    #[must_use]
    pub fn status(&self) -> Status {
        match self {
            Self::Get(response) => response.status,
            Self::Set(response) => response.status,
            Self::Delete(response) => response.status,
        }
    }

    /// Extracts the get response, if this is one.
    #[must_use]
    pub fn into_get(self) -> Option<GetResponse> {
        match self {
            Self::Get(response) => Some(response),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_have_fixed_wire_values() {
        assert_eq!(StatusCode::Success.as_u32(), 0);
        assert_eq!(StatusCode::InvalidKey.as_u32(), 4);
        assert_eq!(StatusCode::Failed.as_u32(), 5);
        assert_eq!(StatusCode::try_from(5), Ok(StatusCode::Failed));
        assert_eq!(StatusCode::try_from(3), Err(UnknownStatusCode(3)));
    }

    #[test]
    fn error_kinds_map_to_statuses() {
        assert_eq!(Status::from_error_kind(ErrorKind::InvalidKey, Status::STORE_FAILED), Status::KEY_NOT_DEFINED);
        assert_eq!(Status::from_error_kind(ErrorKind::NotFound, Status::FETCH_FAILED), Status::FETCH_FAILED);
        assert_eq!(Status::from_error_kind(ErrorKind::Unavailable, Status::DELETE_FAILED), Status::DELETE_FAILED);
        assert_eq!(Status::from_error_kind(ErrorKind::NotConnected, Status::STORE_FAILED), Status::STORE_FAILED);
    }

    #[test]
    fn status_display() {
        assert_eq!(Status::SUCCESS.to_string(), "0");
        assert!(Status::SUCCESS.description.is_empty());
        assert_eq!(Status::KEY_NOT_DEFINED.to_string(), "4 Key not defined");
        assert!(Status::SUCCESS.is_success());
        assert!(!Status::FETCH_FAILED.is_success());
    }

    #[test]
    fn requests_convert_into_request() {
        assert_eq!(Request::from(GetRequest::new("k")), Request::Get(GetRequest { key: "k".into() }));
        assert!(matches!(Request::from(SetRequest::new("k", "v")), Request::Set(_)));
        assert!(matches!(Request::from(DeleteRequest::new("k")), Request::Delete(_)));
    }

    #[test]
    fn response_status_and_into_get() {
        let response = Response::Get(GetResponse::failed(Status::FETCH_FAILED));
        assert_eq!(response.status(), Status::FETCH_FAILED);
        assert!(response.into_get().is_some());

        let response = Response::Set(SetResponse {
            status: Status::SUCCESS,
            key: "k".into(),
        });
        assert!(response.into_get().is_none());
    }
}
