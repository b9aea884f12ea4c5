// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The value format the frontend writes into the store.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client data together with the time it was written.
///
/// The frontend stores records, not raw client data, so every stored value carries its
/// write time and is never empty even when the client sent no data.
///
/// # Examples
///
/// ```
/// use hord_service::Record;
///
/// let record = Record::new("alice".into());
/// let encoded = record.encode()?;
///
/// let decoded = Record::decode(&encoded)?;
/// assert_eq!(decoded, record);
/// # Ok::<(), hord_service::RecordError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// The client data.
    pub data: Bytes,
    /// Unix time of the write, in nanoseconds.
    pub last_updated: i64,
}

/// The error returned when a [`Record`] cannot be encoded or decoded.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The record could not be serialized.
    #[error("cannot encode record")]
    Encode(#[source] bincode::Error),
    /// The stored bytes are not a record.
    #[error("cannot decode record")]
    Decode(#[source] bincode::Error),
}

impl Record {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(data: Bytes) -> Self {
        Self::at(data, Utc::now())
    }

    /// Creates a record stamped with the given time.
    ///
    /// Times beyond the range of `i64` nanoseconds are clamped.
    #[must_use]
    pub fn at(data: Bytes, time: DateTime<Utc>) -> Self {
        let last_updated = time.timestamp_nanos_opt().unwrap_or(if time.timestamp() < 0 { i64::MIN } else { i64::MAX });
        Self { data, last_updated }
    }

    /// Returns the write time as a [`DateTime`].
    #[must_use]
    pub fn last_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.last_updated)
    }

    /// Serializes the record into a store value.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Encode`] if serialization fails.
    pub fn encode(&self) -> Result<Bytes, RecordError> {
        bincode::serialize(self).map(Bytes::from).map_err(RecordError::Encode)
    }

    /// Parses a store value written by [`Record::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Decode`] if `bytes` is not a valid record.
    pub fn decode(bytes: &[u8]) -> Result<Self, RecordError> {
        bincode::deserialize(bytes).map_err(RecordError::Decode)
    }
}
