//! Built-in self-test suite
//!
//! Exercises the harness against itself: plain values, futures, predicates,
//! and nested suites whose failures must be contained and reported.

use serde_json::{json, Value};
use std::time::Duration;

use crate::config::SuiteConfig;
use crate::executor::{ActionResult, TestSuite};
use crate::models::Rejection;

async fn resolve_after(ms: u64, value: Value) -> ActionResult {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    Ok(value)
}

/// Run a nested suite and hand back its report as the produced value
async fn nested(mut suite: TestSuite) -> ActionResult {
    suite.run().await;
    Ok(serde_json::to_value(suite.report())?)
}

/// One case ran and it failed
fn single_failure(report: &Value) -> bool {
    report["run_count"] == json!(1)
        && report["succeed_count"] == json!(0)
        && report["tests"][0]["succeeded"] == json!(false)
}

/// Build the self-test suite
pub fn build(config: SuiteConfig) -> TestSuite {
    let mut tests = TestSuite::new(config);

    tests
        .add()
        .describe("Simple test that synchronously returns a value")
        .expect(42)
        .test(|| Ok(42));

    tests
        .add()
        .describe("Simple test that asynchronously returns a value")
        .expect(42)
        .test_async(|| async { Ok(json!(42)) });

    tests
        .add()
        .describe("Simple test that returns an explicit future")
        .expect(42)
        .test_async(|| futures::future::ready(Ok(json!(42))));

    tests
        .add()
        .describe("Simple test that returns a future which resolves later")
        .expect(42)
        .test_async(|| resolve_after(1000, json!(42)));

    tests
        .add()
        .describe("Simple test that uses a custom predicate function")
        .expect_that(|value| value.as_i64().is_some_and(|n| n > 5))
        .test(|| Ok(42));

    tests
        .add()
        .describe("Test should fail when an error is thrown from inside")
        .expect_that(|report| {
            single_failure(report)
                && report["tests"][0]["error"]["message"] == json!("Error message here")
        })
        .test_async(|| {
            let mut suite = TestSuite::default();
            suite
                .add()
                .describe("Test that throws an error")
                .expect("foo")
                .test(|| -> Result<Value, Rejection> {
                    Err(Rejection::msg("Error message here"))
                });
            nested(suite)
        });

    tests
        .add()
        .describe("Test should fail when the returned future rejects")
        .expect_that(|report| {
            single_failure(report) && report["tests"][0]["error"]["value"] == json!("rejection")
        })
        .test_async(|| {
            let mut suite = TestSuite::default();
            suite
                .add()
                .describe("Test that rejects a future")
                .expect("foo")
                .test_async(|| async {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    Err(Rejection::value("rejection"))
                });
            nested(suite)
        });

    tests
        .add()
        .describe("Test should fail due to undefined function")
        .expect_that(single_failure)
        .test_async(|| {
            let mut suite = TestSuite::default();
            suite
                .add()
                .describe("Test that tries to call an undefined function")
                .test(|| -> Result<Value, Rejection> {
                    panic!("undefinedFunction is not defined")
                });
            nested(suite)
        });

    tests
        .add()
        .describe("Test should fail due to undefined property")
        .expect_that(single_failure)
        .test_async(|| {
            let mut suite = TestSuite::default();
            suite
                .add()
                .describe("Test that tries to access a property on an object that doesn't exist")
                .test(|| {
                    let foo = Value::Null;
                    match foo.get("bar").and_then(|bar| bar.get("baz")) {
                        Some(baz) => Ok(baz.clone()),
                        None => panic!("cannot read properties of undefined (reading 'baz')"),
                    }
                });
            nested(suite)
        });

    tests
        .add()
        .describe("Test should fail because there is no associated action to test")
        .expect_that(single_failure)
        .test_async(|| {
            let mut suite = TestSuite::default();
            suite.add().describe("Test without an action");
            nested(suite)
        });

    tests
        .add()
        .describe("Test should fail due to global timeout")
        .expect_that(single_failure)
        .test_async(|| {
            let mut suite = TestSuite::new(SuiteConfig::default().with_timeout_ms(500));
            suite
                .add()
                .describe("Long-running test")
                .test_async(|| resolve_after(1000, json!(42)));
            nested(suite)
        });

    tests
        .add()
        .describe("Test should fail due to test-specific timeout")
        .expect_that(single_failure)
        .test_async(|| {
            let mut suite = TestSuite::default();
            suite
                .add()
                .describe("Long-running test")
                .timeout(Duration::from_millis(500))
                .test_async(|| resolve_after(1000, json!(42)));
            nested(suite)
        });

    tests
}
