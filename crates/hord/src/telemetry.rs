// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Structured log events for store operations.
//!
//! Field names are stable so that log pipelines can filter on them:
//! `store.operation`, `store.tier`, `store.activity`, `store.key` and `store.error`.
//! Keys are only recorded on `debug` events.

use hord_store::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    Setup,
    HealthCheck,
    Get,
    Set,
    Delete,
    Keys,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "store.setup",
            Self::HealthCheck => "store.health_check",
            Self::Get => "store.get",
            Self::Set => "store.set",
            Self::Delete => "store.delete",
            Self::Keys => "store.keys",
        }
    }

    /// Context attached to errors surfaced from the authoritative store.
    pub fn authoritative_context(self) -> &'static str {
        match self {
            Self::Setup => "authoritative setup",
            Self::HealthCheck => "authoritative health check",
            Self::Get => "authoritative get",
            Self::Set => "authoritative set",
            Self::Delete => "authoritative delete",
            Self::Keys => "authoritative keys",
        }
    }

    /// Context attached to errors surfaced from the accelerator.
    pub fn accelerator_context(self) -> &'static str {
        match self {
            Self::Setup => "accelerator setup",
            Self::HealthCheck => "accelerator health check",
            Self::Get => "accelerator get",
            Self::Set => "accelerator set",
            Self::Delete => "accelerator delete",
            Self::Keys => "accelerator keys",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tier {
    Authoritative,
    Accelerator,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Authoritative => "authoritative",
            Self::Accelerator => "accelerator",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Activity {
    Hit,
    Miss,
    Populated,
    Invalidated,
}

impl Activity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "store.hit",
            Self::Miss => "store.miss",
            Self::Populated => "store.populated",
            Self::Invalidated => "store.invalidated",
        }
    }
}

/// Records a successful accelerator interaction.
pub(crate) fn activity(operation: Operation, activity: Activity, key: &str) {
    tracing::debug!(
        store.operation = operation.as_str(),
        store.tier = Tier::Accelerator.as_str(),
        store.activity = activity.as_str(),
        store.key = key,
        "store.event"
    );
}

/// Records an accelerator failure that was absorbed instead of returned.
pub(crate) fn accelerator_failed(operation: Operation, error: &Error) {
    tracing::warn!(
        store.operation = operation.as_str(),
        store.tier = Tier::Accelerator.as_str(),
        store.error = %error,
        "store.accelerator_error"
    );
}

/// Records an authoritative failure that is returned to the caller.
pub(crate) fn authoritative_failed(operation: Operation, error: &Error) {
    tracing::error!(
        store.operation = operation.as_str(),
        store.tier = Tier::Authoritative.as_str(),
        store.error = %error,
        "store.authoritative_error"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_names() {
        assert_eq!(Operation::Get.as_str(), "store.get");
        assert_eq!(Operation::HealthCheck.as_str(), "store.health_check");
        assert_eq!(Operation::Set.authoritative_context(), "authoritative set");
        assert_eq!(Operation::Delete.accelerator_context(), "accelerator delete");
    }

    #[test]
    fn tier_and_activity_names() {
        assert_eq!(Tier::Authoritative.as_str(), "authoritative");
        assert_eq!(Tier::Accelerator.as_str(), "accelerator");
        assert_eq!(Activity::Hit.as_str(), "store.hit");
        assert_eq!(Activity::Invalidated.as_str(), "store.invalidated");
    }
}
