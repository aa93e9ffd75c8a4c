//! Error types used by the tickcron registry, callbacks and tick loop.
//!
//! This module defines three error enums:
//!
//! - [`RegistryError`] raised synchronously by [`Scheduler::insert`](crate::Scheduler::insert).
//! - [`CallbackError`] returned (or synthesized from a panic) by a callback during dispatch.
//! - [`RuntimeError`] raised by the async tick loop itself.
//!
//! All of them provide `as_label` / `as_message` helpers for logs and metrics.

use thiserror::Error;

/// # Errors produced when registering a callback.
///
/// Registration is atomic: when one of these is returned nothing was stored.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A callback with the same identifier is already registered.
    #[error("callback id {id:?} already exists")]
    DuplicateCallbackId {
        /// The offending identifier.
        id: String,
    },

    /// The period or the step pattern is malformed.
    #[error("invalid schedule: {reason}")]
    InvalidSchedule {
        /// What was wrong with it.
        reason: String,
    },
}

impl RegistryError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        RegistryError::InvalidSchedule {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use tickcron::RegistryError;
    ///
    /// let err = RegistryError::DuplicateCallbackId { id: "m15".into() };
    /// assert_eq!(err.as_label(), "registry_duplicate_id");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistryError::DuplicateCallbackId { .. } => "registry_duplicate_id",
            RegistryError::InvalidSchedule { .. } => "registry_invalid_schedule",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RegistryError::DuplicateCallbackId { id } => format!("duplicate id: {id}"),
            RegistryError::InvalidSchedule { reason } => format!("invalid schedule: {reason}"),
        }
    }
}

/// # Errors produced by a callback invocation.
///
/// These never escape the dispatcher; they are wrapped into an
/// [`EventKind::CallbackFailed`](crate::EventKind::CallbackFailed) event and
/// handed to the exception processors.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallbackError {
    /// The callback reported a failure.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The callback panicked; the panic was caught at the dispatch boundary.
    #[error("callback panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl CallbackError {
    /// Shorthand for [`CallbackError::Fail`].
    ///
    /// ```
    /// use tickcron::CallbackError;
    ///
    /// let err = CallbackError::fail("sensor offline");
    /// assert_eq!(err.to_string(), "execution failed: sensor offline");
    /// ```
    pub fn fail(error: impl std::fmt::Display) -> Self {
        CallbackError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            CallbackError::Fail { .. } => "callback_failed",
            CallbackError::Panicked { .. } => "callback_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            CallbackError::Fail { error } => format!("error: {error}"),
            CallbackError::Panicked { info } => format!("panic: {info}"),
        }
    }
}

/// # Errors produced by the tick loop.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The stop signal passed to [`Scheduler::run_until`](crate::Scheduler::run_until) failed.
    #[error("failed to listen for stop signal: {0}")]
    Signal(#[from] std::io::Error),
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Signal(_) => "runtime_signal",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::Signal(e) => format!("signal: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(
            RegistryError::invalid("zero period").as_label(),
            "registry_invalid_schedule"
        );
        assert_eq!(CallbackError::fail("x").as_label(), "callback_failed");
        assert_eq!(
            CallbackError::Panicked { info: "x".into() }.as_label(),
            "callback_panicked"
        );
    }

    #[test]
    fn test_messages_carry_details() {
        let err = RegistryError::DuplicateCallbackId { id: "daily2".into() };
        assert_eq!(err.as_message(), "duplicate id: daily2");
        assert_eq!(err.to_string(), "callback id \"daily2\" already exists");

        let err = CallbackError::fail("boom");
        assert_eq!(err.as_message(), "error: boom");
    }
}
