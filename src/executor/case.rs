//! Single test case execution
//!
//! A [`TestCase`] holds one unit of work plus its outcome. Running it
//! invokes the action, races the result against the effective timeout and
//! checks the produced value against the expectation.

use futures::future::{self, BoxFuture};
use futures::FutureExt;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;
use tracing::{debug, trace};

use crate::models::{CaseReport, FailureKind, FailureReport, Rejection, TestFailure, TestStatus};
use crate::utils::Timer;

/// What an action settles with
pub type ActionResult = Result<Value, Rejection>;

/// Deferred result of an action
pub type ActionFuture = BoxFuture<'static, ActionResult>;

type Predicate = Box<dyn Fn(&Value) -> bool + Send + Sync>;

/// Unit of work executed by a test case
enum Action {
    Sync(Box<dyn Fn() -> ActionResult + Send + Sync>),
    Async(Box<dyn Fn() -> ActionFuture + Send + Sync>),
}

impl Action {
    /// Start the action. Failures raised while starting it are `ActionThrew`;
    /// everything after that settles through the returned future.
    fn invoke(&self) -> Result<ActionFuture, TestFailure> {
        match self {
            Action::Sync(action) => match panic::catch_unwind(AssertUnwindSafe(|| action())) {
                Ok(Ok(value)) => Ok(future::ready(Ok(value)).boxed()),
                Ok(Err(rejection)) => Err(TestFailure::ActionThrew(rejection)),
                Err(payload) => Err(TestFailure::ActionThrew(Rejection::from_panic(payload))),
            },
            Action::Async(action) => match panic::catch_unwind(AssertUnwindSafe(|| action())) {
                Ok(pending) => Ok(AssertUnwindSafe(pending)
                    .catch_unwind()
                    .map(|settled| settled.unwrap_or_else(|p| Err(Rejection::from_panic(p))))
                    .boxed()),
                Err(payload) => Err(TestFailure::ActionThrew(Rejection::from_panic(payload))),
            },
        }
    }
}

/// Correctness check applied to a produced value
pub enum Expectation {
    /// Strict equality against a value
    Literal(Value),
    /// Arbitrary predicate over the value
    Predicate(Predicate),
}

impl Expectation {
    pub fn literal(value: impl Into<Value>) -> Self {
        Expectation::Literal(value.into())
    }

    pub fn predicate(check: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Expectation::Predicate(Box::new(check))
    }

    /// Normalize into a single predicate form
    fn into_predicate(self) -> Predicate {
        match self {
            Expectation::Literal(expected) => Box::new(move |value| *value == expected),
            Expectation::Predicate(check) => check,
        }
    }
}

impl fmt::Debug for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Expectation::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// A single registered test
#[derive(Default)]
pub struct TestCase {
    description: String,
    action: Option<Action>,
    timeout: Option<Duration>,
    expectation: Option<Predicate>,
    index: usize,
    result: Option<Value>,
    error: Option<TestFailure>,
    succeeded: Option<bool>,
    duration: Option<Duration>,
}

impl TestCase {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    /// Set a human-readable description
    pub fn describe(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    /// Set a synchronous action
    pub fn test<F, T>(&mut self, action: F) -> &mut Self
    where
        F: Fn() -> Result<T, Rejection> + Send + Sync + 'static,
        T: Into<Value>,
    {
        self.action = Some(Action::Sync(Box::new(move || action().map(Into::into))));
        self
    }

    /// Set an asynchronous action
    pub fn test_async<F, Fut>(&mut self, action: F) -> &mut Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionResult> + Send + 'static,
    {
        self.action = Some(Action::Async(Box::new(move || action().boxed())));
        self
    }

    /// Set a timeout for this case only; overrides the suite default.
    /// A zero duration counts as unset.
    pub fn timeout(&mut self, duration: Duration) -> &mut Self {
        self.timeout = Some(duration);
        self
    }

    /// Expect the produced value to equal `value` exactly
    pub fn expect(&mut self, value: impl Into<Value>) -> &mut Self {
        self.expectation(Expectation::literal(value))
    }

    /// Expect the produced value to satisfy `check`
    pub fn expect_that(&mut self, check: impl Fn(&Value) -> bool + Send + Sync + 'static) -> &mut Self {
        self.expectation(Expectation::predicate(check))
    }

    pub fn expectation(&mut self, expectation: Expectation) -> &mut Self {
        self.expectation = Some(expectation.into_predicate());
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&TestFailure> {
        self.error.as_ref()
    }

    /// `None` until the case has run
    pub fn succeeded(&self) -> Option<bool> {
        self.succeeded
    }

    pub fn status(&self) -> TestStatus {
        TestStatus::from_succeeded(self.succeeded)
    }

    /// Wall-clock time of the most recent run
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Case-level timeout, falling back to `default`, falling back to none
    pub fn effective_timeout(&self, default: Option<Duration>) -> Option<Duration> {
        self.timeout
            .filter(|d| !d.is_zero())
            .or(default.filter(|d| !d.is_zero()))
    }

    /// Run this case. Resolves to `Ok(true)` when it passes and to the
    /// failure kind otherwise; the full failure is kept in [`Self::error`].
    ///
    /// Re-running resets the previous outcome.
    pub async fn run(&mut self, default_timeout: Option<Duration>) -> Result<bool, FailureKind> {
        self.result = None;
        self.error = None;
        self.succeeded = None;
        self.duration = None;

        debug!("Running test {}: {}", self.index + 1, self.description);
        let timer = Timer::start(format!("Test {}", self.index + 1));
        let outcome = self.execute(default_timeout).await;
        self.duration = Some(timer.stop());

        match outcome {
            Ok(value) => {
                self.result = Some(value);
                self.succeeded = Some(true);
                Ok(true)
            }
            Err(failure) => {
                let kind = failure.kind();
                debug!("Test {} failed ({}): {}", self.index + 1, kind, failure);
                self.error = Some(failure);
                self.succeeded = Some(false);
                Err(kind)
            }
        }
    }

    async fn execute(&self, default_timeout: Option<Duration>) -> Result<Value, TestFailure> {
        let limit = self.effective_timeout(default_timeout);
        let action = self.action.as_ref().ok_or(TestFailure::MissingAction)?;
        let pending = action.invoke()?;

        let value = match limit {
            Some(limit) => race(pending, limit).await?,
            None => pending.await.map_err(TestFailure::ActionRejected)?,
        };

        if let Some(check) = &self.expectation {
            match panic::catch_unwind(AssertUnwindSafe(|| check(&value))) {
                Ok(true) => {}
                Ok(false) => {
                    return Err(TestFailure::UnexpectedResult {
                        actual: value,
                        check_panic: None,
                    })
                }
                Err(payload) => {
                    return Err(TestFailure::UnexpectedResult {
                        actual: value,
                        check_panic: Some(Rejection::from_panic(payload)),
                    })
                }
            }
        }

        Ok(value)
    }

    /// Snapshot of this case for reporting
    pub fn report(&self) -> CaseReport {
        CaseReport {
            index: self.index,
            description: self.description.clone(),
            status: self.status(),
            succeeded: self.succeeded,
            result: self.result.clone(),
            error: self.error.as_ref().map(FailureReport::from),
            duration_ms: self.duration.map(|d| d.as_millis() as u64),
        }
    }
}

/// Race a pending action against a deadline.
///
/// The deadline timer is dropped as soon as the action settles. On timeout
/// the action is not cancelled: it is detached onto the runtime and keeps
/// running until it settles on its own.
async fn race(mut pending: ActionFuture, limit: Duration) -> Result<Value, TestFailure> {
    match tokio::time::timeout(limit, &mut pending).await {
        Ok(settled) => settled.map_err(TestFailure::ActionRejected),
        Err(_) => {
            tokio::spawn(async move {
                match pending.await {
                    Ok(_) => trace!("Detached action settled after its deadline"),
                    Err(rejection) => trace!("Detached action rejected after its deadline: {}", rejection),
                }
            });
            Err(TestFailure::Timeout { limit })
        }
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("index", &self.index)
            .field("description", &self.description)
            .field("has_action", &self.action.is_some())
            .field("timeout", &self.timeout)
            .field("has_expectation", &self.expectation.is_some())
            .field("result", &self.result)
            .field("error", &self.error)
            .field("succeeded", &self.succeeded)
            .finish()
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Test {}: {}", self.index + 1, self.description)
    }
}
