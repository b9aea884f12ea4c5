// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types shared by every store.

use std::borrow::Cow;

use thiserror::Error;

/// A boxed error coming from a backend client library.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An error returned by any [`Store`](crate::Store) operation.
///
/// The set of kinds is the same for every store, whether it is a backing store or a
/// composed one, so callers can react to a failure without knowing which store produced it.
/// Use [`Error::kind`] when only the category matters.
///
/// # Thread safety
///
/// This type is thread-safe.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An empty key was supplied. Detected before any I/O.
    #[error("invalid key")]
    InvalidKey,

    /// An empty value was supplied to `set`. Detected before any I/O.
    #[error("invalid data")]
    InvalidData,

    /// The requested key does not exist.
    #[error("key not found")]
    NotFound,

    /// The store was closed, or never connected in the first place.
    #[error("not connected")]
    NotConnected,

    /// A composition was requested with a malformed configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(Cow<'static, str>),

    /// The operation was canceled by a backing store honoring a cancellation request.
    #[error("operation canceled")]
    Canceled,

    /// The backend failed. The original error is kept as the source.
    #[error("{context}: backend unavailable")]
    Unavailable {
        /// The operation that failed, for example `"authoritative set"`.
        context: Cow<'static, str>,
        /// The error reported by the backend.
        #[source]
        source: BoxError,
    },
}

/// The category of an [`Error`], without any payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// See [`Error::InvalidKey`].
    InvalidKey,
    /// See [`Error::InvalidData`].
    InvalidData,
    /// See [`Error::NotFound`].
    NotFound,
    /// See [`Error::NotConnected`].
    NotConnected,
    /// See [`Error::InvalidConfiguration`].
    InvalidConfiguration,
    /// See [`Error::Canceled`].
    Canceled,
    /// See [`Error::Unavailable`].
    Unavailable,
}

impl Error {
    /// Wraps an error reported by a backend client.
    ///
    /// # Examples
    ///
    /// ```
    /// use hord_store::{Error, ErrorKind};
    ///
    /// let error = Error::unavailable("connection refused");
    /// assert_eq!(error.kind(), ErrorKind::Unavailable);
    /// ```
    pub fn unavailable(source: impl Into<BoxError>) -> Self {
        Self::Unavailable {
            context: Cow::Borrowed("backend"),
            source: source.into(),
        }
    }

    /// Creates an [`Error::InvalidConfiguration`] with the given reason.
    pub fn invalid_configuration(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }

    /// Names the operation that failed.
    ///
    /// Only [`Error::Unavailable`] carries context; every other kind is returned unchanged
    /// so that callers can keep matching on it.
    #[must_use]
    pub fn context(self, context: &'static str) -> Self {
        match self {
            Self::Unavailable { source, .. } => Self::Unavailable {
                context: Cow::Borrowed(context),
                source,
            },
            other => other,
        }
    }

    /// Returns the category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidKey => ErrorKind::InvalidKey,
            Self::InvalidData => ErrorKind::InvalidData,
            Self::NotFound => ErrorKind::NotFound,
            Self::NotConnected => ErrorKind::NotConnected,
            Self::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
            Self::Canceled => ErrorKind::Canceled,
            Self::Unavailable { .. } => ErrorKind::Unavailable,
        }
    }

    /// Returns `true` if the key does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Returns `true` if the operation was canceled.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}

impl From<ErrorKind> for Error {
    /// Builds an error of the given kind with a generic payload where one is needed.
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::InvalidKey => Self::InvalidKey,
            ErrorKind::InvalidData => Self::InvalidData,
            ErrorKind::NotFound => Self::NotFound,
            ErrorKind::NotConnected => Self::NotConnected,
            ErrorKind::InvalidConfiguration => Self::invalid_configuration("unspecified"),
            ErrorKind::Canceled => Self::Canceled,
            ErrorKind::Unavailable => Self::unavailable("unspecified backend failure"),
        }
    }
}

/// A specialized `Result` for store operations.
pub type Result<T> = std::result::Result<T, Error>;
