// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for configuring in-memory stores.

use crate::store::MemoryStore;

/// Builder for configuring a [`MemoryStore`].
///
/// # Examples
///
/// ```
/// use hord_memory::MemoryStore;
///
/// let store = MemoryStore::builder()
///     .initial_capacity(1024)
///     .name("session-cache")
///     .build();
/// assert_eq!(store.name(), Some("session-cache"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStoreBuilder {
    pub(crate) initial_capacity: Option<usize>,
    pub(crate) name: Option<String>,
}

impl MemoryStoreBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of entries to pre-allocate room for.
    ///
    /// The store may still grow beyond this size.
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// Sets a name that identifies the store in log output.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builds the configured [`MemoryStore`].
    #[must_use]
    pub fn build(self) -> MemoryStore {
        MemoryStore::from_builder(self)
    }
}
