//! Test execution engine
//!
//! Single-case execution with timeout racing, and concurrent suite runs.

mod case;
mod suite;

pub use case::{ActionFuture, ActionResult, Expectation, TestCase};
pub use suite::TestSuite;
