//! Concurrent suite execution
//!
//! Runs every registered case at once and aggregates the outcome.

use futures::future::join_all;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

use super::TestCase;
use crate::config::SuiteConfig;
use crate::models::SuiteReport;

/// Ordered collection of test cases sharing a default timeout
#[derive(Debug, Default)]
pub struct TestSuite {
    tests: Vec<TestCase>,
    timeout: Option<Duration>,
    run_count: usize,
    succeed_count: usize,
}

impl TestSuite {
    pub fn new(config: SuiteConfig) -> Self {
        Self {
            timeout: config.timeout(),
            ..Default::default()
        }
    }

    /// Register a new case and return it for configuration
    pub fn add(&mut self) -> &mut TestCase {
        let index = self.tests.len();
        self.tests.push(TestCase::new(index));
        &mut self.tests[index]
    }

    /// Run every case concurrently and wait until all of them have settled.
    ///
    /// Cases are interleaved on the calling task, and a failing case never
    /// stops the others. Returns whether every case succeeded; an empty suite
    /// trivially succeeds.
    pub async fn run(&mut self) -> bool {
        self.run_count = 0;
        self.succeed_count = 0;

        info!("Running {} tests", self.tests.len());
        let start = Instant::now();

        let timeout = self.timeout;
        let settled = join_all(self.tests.iter_mut().map(|test| test.run(timeout))).await;

        self.run_count = settled.len();
        self.succeed_count = self
            .tests
            .iter()
            .filter(|test| test.succeeded() == Some(true))
            .count();

        info!(
            "Suite completed in {}ms - {}/{} succeeded",
            start.elapsed().as_millis(),
            self.succeed_count,
            self.run_count
        );
        if self.succeed_count < self.run_count {
            warn!("{} tests failed", self.run_count - self.succeed_count);
        }

        self.run_count == self.succeed_count
    }

    /// Registered cases, in registration order
    pub fn tests(&self) -> &[TestCase] {
        &self.tests
    }

    /// Cases attempted in the most recent run
    pub fn run_count(&self) -> usize {
        self.run_count
    }

    /// Cases that succeeded in the most recent run
    pub fn succeed_count(&self) -> usize {
        self.succeed_count
    }

    /// Suite-wide default timeout
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Snapshot of the suite for reporting
    pub fn report(&self) -> SuiteReport {
        SuiteReport::new(
            self.run_count,
            self.succeed_count,
            self.tests.iter().map(TestCase::report).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FailureKind, Rejection, TestFailure};
    use serde_json::{json, Value};

    #[test]
    fn test_add_assigns_sequential_indices() {
        let mut suite = TestSuite::default();
        suite.add().describe("first");
        suite.add().describe("second");
        suite.add().describe("third");

        let indices: Vec<_> = suite.tests().iter().map(TestCase::index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(suite.tests()[1].description(), "second");
        assert_eq!(suite.len(), 3);
    }

    #[test]
    fn test_config_timeout() {
        let suite = TestSuite::new(SuiteConfig::default().with_timeout_ms(500));
        assert_eq!(suite.timeout(), Some(Duration::from_millis(500)));
        assert_eq!(TestSuite::new(SuiteConfig::default()).timeout(), None);
    }

    #[tokio::test]
    async fn test_single_sync_value() {
        let mut suite = TestSuite::default();
        suite.add().test(|| Ok(42));

        assert!(suite.run().await);
        assert_eq!(suite.run_count(), 1);
        assert_eq!(suite.succeed_count(), 1);
        assert_eq!(suite.tests()[0].result(), Some(&json!(42)));
    }

    #[tokio::test]
    async fn test_thrown_error_is_contained() {
        let mut suite = TestSuite::default();
        suite
            .add()
            .describe("Test that throws an error")
            .expect("foo")
            .test(|| -> Result<Value, Rejection> { Err(anyhow::anyhow!("Error message here").into()) });

        assert!(!suite.run().await);
        assert_eq!(suite.run_count(), 1);
        assert_eq!(suite.succeed_count(), 0);

        let case = &suite.tests()[0];
        assert_eq!(case.succeeded(), Some(false));
        assert_eq!(case.error().unwrap().message(), "Error message here");
    }

    #[tokio::test(start_paused = true)]
    async fn test_suite_timeout() {
        let mut suite = TestSuite::new(SuiteConfig::default().with_timeout_ms(500));
        suite.add().describe("Long-running test").test_async(|| async {
            tokio::time::sleep(Duration::from_millis(1000)).await;
            Ok(json!(42))
        });

        assert!(!suite.run().await);
        assert_eq!(suite.succeed_count(), 0);
        assert_eq!(
            suite.tests()[0].error().map(TestFailure::kind),
            Some(FailureKind::Timeout)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_case_timeout_without_suite_default() {
        let mut suite = TestSuite::default();
        suite
            .add()
            .describe("Long-running test")
            .timeout(Duration::from_millis(500))
            .test_async(|| async {
                tokio::time::sleep(Duration::from_millis(1000)).await;
                Ok(json!(42))
            });

        assert!(!suite.run().await);
        assert_eq!(
            suite.tests()[0].error().map(TestFailure::kind),
            Some(FailureKind::Timeout)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cases_run_concurrently() {
        let mut suite = TestSuite::new(SuiteConfig::default().with_timeout_ms(1500));
        for _ in 0..3 {
            suite.add().expect(1).test_async(|| async {
                tokio::time::sleep(Duration::from_millis(1000)).await;
                Ok(json!(1))
            });
        }

        // Serialized execution would need 3s and blow the 1.5s deadline.
        let start = tokio::time::Instant::now();
        assert!(suite.run().await);
        assert!(start.elapsed() < Duration::from_millis(1500));
        assert_eq!(suite.succeed_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mixed_outcomes() {
        let mut suite = TestSuite::default();
        suite.add().expect(42).test(|| Ok(42));
        suite.add();
        suite.add().test_async(|| async { Err(Rejection::value("rejection")) });
        suite.add().expect_that(|v| v.is_string()).test(|| Ok(json!("text")));
        suite.add().expect(1).test(|| Ok(2));

        assert!(!suite.run().await);
        assert_eq!(suite.run_count(), 5);
        assert_eq!(suite.succeed_count(), 2);

        let kinds: Vec<_> = suite
            .tests()
            .iter()
            .map(|t| t.error().map(TestFailure::kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                None,
                Some(FailureKind::MissingAction),
                Some(FailureKind::ActionRejected),
                None,
                Some(FailureKind::UnexpectedResult),
            ]
        );
    }

    #[tokio::test]
    async fn test_panicking_expectation_is_contained() {
        let mut suite = TestSuite::default();
        suite.add().describe("passes").expect(1).test(|| Ok(1));
        suite
            .add()
            .describe("check panics")
            .expect_that(|v| {
                let n: Option<i64> = v.as_str().map(|_| 0);
                n.unwrap() > 0
            })
            .test(|| Ok(json!(42)));
        suite.add().describe("also passes").test(|| Ok("ok"));

        assert!(!suite.run().await);
        assert_eq!(suite.run_count(), 3);
        assert_eq!(suite.succeed_count(), 2);
        assert_eq!(suite.tests()[1].succeeded(), Some(false));
        assert_eq!(
            suite.tests()[1].error().map(TestFailure::kind),
            Some(FailureKind::UnexpectedResult)
        );
    }

    #[tokio::test]
    async fn test_empty_suite_vacuously_succeeds() {
        let mut suite = TestSuite::default();
        assert!(suite.run().await);
        assert_eq!(suite.run_count(), 0);
        assert_eq!(suite.succeed_count(), 0);
    }

    #[tokio::test]
    async fn test_rerun_recomputes_counters() {
        let mut suite = TestSuite::default();
        suite.add().test(|| Ok(1));
        suite.add().test(|| Ok(2));

        assert!(suite.run().await);
        assert!(suite.run().await);
        assert_eq!(suite.run_count(), 2);
        assert_eq!(suite.succeed_count(), 2);
    }

    #[tokio::test]
    async fn test_report_snapshot() {
        let mut suite = TestSuite::default();
        suite.add().describe("passes").test(|| Ok(42));
        suite.add().describe("no action");
        suite.run().await;

        let report = suite.report();
        assert_eq!(report.run_count, 2);
        assert_eq!(report.succeed_count, 1);
        assert_eq!(report.pass_rate, 50.0);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["pass_rate"], json!(50.0));
        assert_eq!(report.tests[0].result, Some(json!(42)));
        assert_eq!(
            report.tests[1].error.as_ref().map(|e| e.kind),
            Some(FailureKind::MissingAction)
        );
    }
}
