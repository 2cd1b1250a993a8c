//! Report models for test results
//!
//! Serializable snapshots of a suite after it has run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::failure::{FailureKind, TestFailure};

/// Outcome of a single test case
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    NotRun,
    Pass,
    Fail,
}

impl TestStatus {
    /// Map the tri-state `succeeded` flag onto a status
    pub fn from_succeeded(succeeded: Option<bool>) -> Self {
        match succeeded {
            None => TestStatus::NotRun,
            Some(true) => TestStatus::Pass,
            Some(false) => TestStatus::Fail,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TestStatus::Pass => "✓",
            TestStatus::Fail => "✗",
            TestStatus::NotRun => "○",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Pass => write!(f, "success"),
            TestStatus::Fail => write!(f, "fail"),
            TestStatus::NotRun => write!(f, "not run"),
        }
    }
}

/// Reported failure of a case
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FailureReport {
    pub kind: FailureKind,
    pub message: String,
    /// Original payload when the action failed with a plain value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl From<&TestFailure> for FailureReport {
    fn from(failure: &TestFailure) -> Self {
        let value = match failure {
            TestFailure::UnexpectedResult { actual, .. } => Some(actual.clone()),
            other => other
                .rejection()
                .and_then(|r| r.as_value())
                .cloned(),
        };
        Self {
            kind: failure.kind(),
            message: failure.message(),
            value,
        }
    }
}

/// Snapshot of one case
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CaseReport {
    pub index: usize,
    pub description: String,
    pub status: TestStatus,
    pub succeeded: Option<bool>,
    pub result: Option<Value>,
    pub error: Option<FailureReport>,
    pub duration_ms: Option<u64>,
}

impl fmt::Display for CaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Test {}: {}",
            self.status.symbol(),
            self.index + 1,
            self.description
        )?;
        if let Some(ms) = self.duration_ms {
            write!(f, " [{ms}ms]")?;
        }
        if let Some(error) = &self.error {
            write!(f, " - {}", error.message)?;
        }
        Ok(())
    }
}

/// Snapshot of a whole suite
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuiteReport {
    pub generated_at: DateTime<Utc>,
    pub run_count: usize,
    pub succeed_count: usize,
    /// Percentage of attempted cases that succeeded; 0 when nothing ran
    pub pass_rate: f64,
    pub tests: Vec<CaseReport>,
}

impl SuiteReport {
    pub fn new(run_count: usize, succeed_count: usize, tests: Vec<CaseReport>) -> Self {
        let pass_rate = if run_count == 0 {
            0.0
        } else {
            (succeed_count as f64 / run_count as f64) * 100.0
        };
        Self {
            generated_at: Utc::now(),
            run_count,
            succeed_count,
            pass_rate,
            tests,
        }
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for case in &self.tests {
            writeln!(f, "  {case}")?;
        }
        write!(
            f,
            "{}/{} succeeded ({:.2}%)",
            self.succeed_count,
            self.run_count,
            self.pass_rate
        )
    }
}
