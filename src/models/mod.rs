//! Data models for test execution
//!
//! Failure payloads and serializable result snapshots.

mod failure;
mod report;

pub use failure::{FailureKind, Rejection, TestFailure};
pub use report::{CaseReport, FailureReport, SuiteReport, TestStatus};
