// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Choosing and building a composed store from configuration.

use std::{fmt, str::FromStr};

use hord_store::{DynamicStore, Error, ErrorKind, Store, StoreExt};
use serde::{Deserialize, Serialize};

use crate::{Lookaside, NullStore};

/// How the authoritative and accelerator stores are combined.
///
/// Parses from and serializes to `"lookaside"` and `"none"`. `"cache-aside"` and
/// `"passthrough"` are accepted as aliases.
///
/// # Examples
///
/// ```
/// use hord::Strategy;
///
/// assert_eq!("cache-aside".parse::<Strategy>().unwrap(), Strategy::Lookaside);
/// assert_eq!(Strategy::Passthrough.to_string(), "none");
/// assert!("write-behind".parse::<Strategy>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Read from the accelerator first, fill it on a miss, invalidate it on writes.
    #[serde(rename = "lookaside", alias = "cache-aside")]
    Lookaside,
    /// Use the authoritative store as is. The accelerator is ignored.
    #[serde(rename = "none", alias = "passthrough")]
    Passthrough,
}

impl Strategy {
    /// Returns the canonical name of the strategy.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lookaside => "lookaside",
            Self::Passthrough => "none",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lookaside" | "cache-aside" => Ok(Self::Lookaside),
            "none" | "passthrough" => Ok(Self::Passthrough),
            other => Err(Error::invalid_configuration(format!("unrecognized caching strategy {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, Default)]
enum StrategySetting {
    #[default]
    Unset,
    Known(Strategy),
    Unrecognized(String),
}

/// The inputs to [`compose`].
///
/// # Examples
///
/// ```
/// use hord::{Config, Strategy};
/// use hord_memory::MemoryStore;
///
/// let config = Config::new()
///     .authoritative(MemoryStore::new())
///     .accelerator(MemoryStore::new())
///     .strategy(Strategy::Lookaside);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Config {
    authoritative: Option<DynamicStore>,
    accelerator: Option<DynamicStore>,
    strategy: StrategySetting,
}

impl Config {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the authoritative store, the source of truth.
    #[must_use]
    pub fn authoritative(mut self, store: impl Store + 'static) -> Self {
        self.authoritative = Some(store.into_dynamic());
        self
    }

    /// Sets the accelerator store, used as a cache in front of the authoritative one.
    #[must_use]
    pub fn accelerator(mut self, store: impl Store + 'static) -> Self {
        self.accelerator = Some(store.into_dynamic());
        self
    }

    /// Sets the composition strategy.
    #[must_use]
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = StrategySetting::Known(strategy);
        self
    }

    /// Sets the composition strategy by name, as read from a configuration source.
    ///
    /// An unrecognized name is kept and reported by [`compose`].
    #[must_use]
    pub fn strategy_name(mut self, name: &str) -> Self {
        self.strategy = name
            .parse()
            .map_or_else(|_| StrategySetting::Unrecognized(name.to_owned()), StrategySetting::Known);
        self
    }
}

/// The error returned by [`compose`].
///
/// It carries a [`NullStore`] so that a caller that cannot handle the error still gets a
/// store that fails every call in a well-defined way.
#[derive(Debug, thiserror::Error)]
#[error("cannot compose store: {error}")]
pub struct ComposeError {
    #[source]
    error: Error,
    fallback: NullStore,
}

impl ComposeError {
    fn new(error: Error) -> Self {
        Self {
            error,
            fallback: NullStore,
        }
    }

    /// Returns the underlying error.
    #[must_use]
    pub fn error(&self) -> &Error {
        &self.error
    }

    /// Returns the category of the underlying error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    /// Splits into the stand-in store and the underlying error.
    #[must_use]
    pub fn into_parts(self) -> (NullStore, Error) {
        (self.fallback, self.error)
    }

    /// Returns the stand-in store as a [`DynamicStore`], dropping the error.
    #[must_use]
    pub fn into_store(self) -> DynamicStore {
        self.fallback.into_dynamic()
    }
}

/// Builds the store described by `config`.
///
/// - [`Strategy::Lookaside`] needs both stores and returns a [`Lookaside`] over them.
/// - [`Strategy::Passthrough`] needs the authoritative store and returns it unchanged.
///
/// No I/O happens here; call [`Store::setup`] on the result before using it.
///
/// # Errors
///
/// Returns a [`ComposeError`] of kind [`ErrorKind::InvalidConfiguration`] if the strategy
/// is missing or unrecognized, or if a store it needs is missing. The error carries a
/// [`NullStore`].
///
/// # Examples
///
/// ```
/// use hord::{Config, Strategy, compose};
/// use hord_memory::MemoryStore;
/// use hord_store::{ErrorKind, Store};
/// # futures::executor::block_on(async {
///
/// let store = compose(
///     Config::new()
///         .authoritative(MemoryStore::new())
///         .accelerator(MemoryStore::new())
///         .strategy(Strategy::Lookaside),
/// )?;
/// store.setup().await?;
///
/// // Without an accelerator the lookaside strategy cannot be built.
/// let error = compose(Config::new().authoritative(MemoryStore::new()).strategy(Strategy::Lookaside)).unwrap_err();
/// assert_eq!(error.kind(), ErrorKind::InvalidConfiguration);
///
/// let fallback = error.into_store();
/// assert_eq!(fallback.get("x").await.unwrap_err().kind(), ErrorKind::NotConnected);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// # });
/// ```
pub fn compose(config: Config) -> Result<DynamicStore, ComposeError> {
    let Config {
        authoritative,
        accelerator,
        strategy,
    } = config;

    let store = match strategy {
        StrategySetting::Known(Strategy::Lookaside) => match (authoritative, accelerator) {
            (Some(authoritative), Some(accelerator)) => Lookaside::new(authoritative, accelerator).into_dynamic(),
            (None, _) => return Err(missing("authoritative store is required by the lookaside strategy")),
            (_, None) => return Err(missing("accelerator store is required by the lookaside strategy")),
        },
        StrategySetting::Known(Strategy::Passthrough) => match authoritative {
            Some(authoritative) => authoritative,
            None => return Err(missing("authoritative store is required")),
        },
        StrategySetting::Unset => return Err(missing("no caching strategy specified")),
        StrategySetting::Unrecognized(name) => {
            return Err(ComposeError::new(Error::invalid_configuration(format!(
                "unrecognized caching strategy {name:?}"
            ))));
        }
    };

    if let StrategySetting::Known(strategy) = strategy {
        tracing::info!(store.strategy = strategy.as_str(), "store.composed");
    }
    Ok(store)
}

fn missing(reason: &'static str) -> ComposeError {
    ComposeError::new(Error::invalid_configuration(reason))
}

#[cfg(test)]
mod tests {
    use hord_memory::MemoryStore;

    use super::*;

    #[test]
    fn strategy_serde_names() {
        assert_eq!(serde_json::to_string(&Strategy::Lookaside).unwrap(), "\"lookaside\"");
        assert_eq!(serde_json::to_string(&Strategy::Passthrough).unwrap(), "\"none\"");
        assert_eq!(serde_json::from_str::<Strategy>("\"cache-aside\"").unwrap(), Strategy::Lookaside);
        assert_eq!(serde_json::from_str::<Strategy>("\"passthrough\"").unwrap(), Strategy::Passthrough);
        assert!(serde_json::from_str::<Strategy>("\"write-through\"").is_err());
    }

    #[test]
    fn strategy_from_str_rejects_unknown_names() {
        let error = "LOOKASIDE".parse::<Strategy>().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn strategy_name_keeps_unrecognized_value() {
        let config = Config::new().strategy_name("bogus");
        assert!(matches!(config.strategy, StrategySetting::Unrecognized(ref name) if name == "bogus"));

        let config = Config::new().strategy_name("none");
        assert!(matches!(config.strategy, StrategySetting::Known(Strategy::Passthrough)));
    }

    #[test]
    fn missing_strategy_is_rejected() {
        let error = compose(Config::new().authoritative(MemoryStore::new()).accelerator(MemoryStore::new())).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidConfiguration);
        assert!(error.to_string().contains("no caching strategy"));
    }

    #[test]
    fn compose_error_exposes_parts() {
        let error = compose(Config::new()).unwrap_err();
        assert!(matches!(error.error(), Error::InvalidConfiguration(_)));

        let (store, error) = error.into_parts();
        assert_eq!(store, NullStore);
        assert_eq!(error.kind(), ErrorKind::InvalidConfiguration);
    }
}
