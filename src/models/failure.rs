//! Failure models for test execution
//!
//! Defines the rejection payloads an action can settle with and the
//! failures a test case records when it does not pass.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Payload an action fails with.
///
/// Actions are free to fail with something that is not an error at all
/// (a plain string, a number, an object), so the payload is kept exactly
/// as it was produced.
#[derive(Debug)]
pub enum Rejection {
    /// A structured error
    Error(anyhow::Error),
    /// An arbitrary value
    Value(Value),
    /// The action panicked; holds the panic message
    Panic(String),
}

impl Rejection {
    /// Reject with an arbitrary value
    pub fn value(value: impl Into<Value>) -> Self {
        Rejection::Value(value.into())
    }

    /// Reject with an error message
    pub fn msg(message: impl fmt::Display + fmt::Debug + Send + Sync + 'static) -> Self {
        Rejection::Error(anyhow::Error::msg(message))
    }

    /// The rejected value, if the payload is a plain value
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Rejection::Value(value) => Some(value),
            _ => None,
        }
    }

    /// The underlying error, if the payload is a structured error
    pub fn as_error(&self) -> Option<&anyhow::Error> {
        match self {
            Rejection::Error(error) => Some(error),
            _ => None,
        }
    }

    /// Build a rejection from a caught panic payload
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "panic with non-string payload".to_string()
        };
        Rejection::Panic(message)
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Error(error) => write!(f, "{error}"),
            Rejection::Value(Value::String(s)) => f.write_str(s),
            Rejection::Value(value) => write!(f, "{value}"),
            Rejection::Panic(message) => write!(f, "panicked: {message}"),
        }
    }
}

impl From<anyhow::Error> for Rejection {
    fn from(error: anyhow::Error) -> Self {
        Rejection::Error(error)
    }
}

impl From<Value> for Rejection {
    fn from(value: Value) -> Self {
        Rejection::Value(value)
    }
}

impl From<serde_json::Error> for Rejection {
    fn from(error: serde_json::Error) -> Self {
        Rejection::Error(error.into())
    }
}

/// Why a test case did not pass
#[derive(Error, Debug)]
pub enum TestFailure {
    #[error("No action set.")]
    MissingAction,

    #[error("{0}")]
    ActionThrew(Rejection),

    #[error("{0}")]
    ActionRejected(Rejection),

    #[error("Timed out.")]
    Timeout { limit: Duration },

    #[error("Unexpected result value.")]
    UnexpectedResult {
        actual: Value,
        /// Set when the expectation check itself panicked
        check_panic: Option<Rejection>,
    },
}

impl TestFailure {
    /// Payload-free kind of this failure
    pub fn kind(&self) -> FailureKind {
        match self {
            TestFailure::MissingAction => FailureKind::MissingAction,
            TestFailure::ActionThrew(_) => FailureKind::ActionThrew,
            TestFailure::ActionRejected(_) => FailureKind::ActionRejected,
            TestFailure::Timeout { .. } => FailureKind::Timeout,
            TestFailure::UnexpectedResult { .. } => FailureKind::UnexpectedResult,
        }
    }

    /// Human-readable failure message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// The original payload, for failures raised by the action or by a
    /// panicking expectation check
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            TestFailure::ActionThrew(r) | TestFailure::ActionRejected(r) => Some(r),
            TestFailure::UnexpectedResult { check_panic, .. } => check_panic.as_ref(),
            _ => None,
        }
    }
}

/// Failure taxonomy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    MissingAction,
    ActionThrew,
    ActionRejected,
    Timeout,
    UnexpectedResult,
}

impl FailureKind {
    pub fn name(&self) -> &'static str {
        match self {
            FailureKind::MissingAction => "MissingAction",
            FailureKind::ActionThrew => "ActionThrew",
            FailureKind::ActionRejected => "ActionRejected",
            FailureKind::Timeout => "Timeout",
            FailureKind::UnexpectedResult => "UnexpectedResult",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
