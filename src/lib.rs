//! testlist - minimal asynchronous test-execution harness
//!
//! Register named test cases on a [`TestSuite`], each wrapping a synchronous
//! or asynchronous unit of work, then run them all concurrently with optional
//! per-case or suite-wide timeouts.
//!
//! ```no_run
//! use serde_json::json;
//! use std::time::Duration;
//! use testlist::{SuiteConfig, TestSuite};
//!
//! # async fn demo() {
//! let mut suite = TestSuite::new(SuiteConfig::default().with_timeout_ms(500));
//!
//! suite.add().describe("answer").expect(42).test(|| Ok(42));
//! suite
//!     .add()
//!     .describe("slow answer")
//!     .timeout(Duration::from_secs(2))
//!     .test_async(|| async {
//!         tokio::time::sleep(Duration::from_secs(1)).await;
//!         Ok(json!(42))
//!     });
//!
//! let all_passed = suite.run().await;
//! println!("{}/{} succeeded", suite.succeed_count(), suite.run_count());
//! # }
//! ```

pub mod config;
pub mod executor;
pub mod models;
pub mod output;
pub mod selftest;
pub mod utils;

pub use config::{AppConfig, SuiteConfig};
pub use executor::{ActionFuture, ActionResult, Expectation, TestCase, TestSuite};
pub use models::{FailureKind, Rejection, TestFailure, TestStatus};
