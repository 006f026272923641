//! Assertion suite use case.

use std::sync::Arc;
use std::time::Instant;

use costcheck_domain::{Check, CheckResult, SuiteResults};

use crate::ports::{AssertionEvaluator, HttpClient};

/// Use case that runs checks one after another.
///
/// Each check is independent: a failing or unreachable check is recorded
/// and the next one still runs.
pub struct RunSuite<C: HttpClient, E: AssertionEvaluator> {
    client: Arc<C>,
    evaluator: E,
}

impl<C: HttpClient, E: AssertionEvaluator> RunSuite<C, E> {
    /// Creates a new `RunSuite` use case.
    #[must_use]
    pub const fn new(client: Arc<C>, evaluator: E) -> Self {
        Self { client, evaluator }
    }

    /// Runs every check in order.
    pub async fn execute(&self, checks: &[Check]) -> SuiteResults {
        let start = Instant::now();
        let mut results = Vec::with_capacity(checks.len());

        for check in checks {
            let result = self.run_check(check).await;
            match result.failure_reason() {
                None => tracing::info!(check = %result.name, "PASS"),
                Some(reason) => tracing::warn!(check = %result.name, %reason, "FAIL"),
            }
            results.push(result);
        }

        SuiteResults::new(results, elapsed_ms(start))
    }

    /// Runs a single check.
    pub async fn run_check(&self, check: &Check) -> CheckResult {
        let start = Instant::now();
        let request = check.request.to_string();
        tracing::debug!(check = %check.name, url = %self.client.url_for(&check.request), "sending");

        match self.client.execute(&check.request).await {
            Ok(response) => CheckResult {
                name: check.name.clone(),
                request,
                status: Some(response.status),
                results: self.evaluator.evaluate_all(&check.assertions, &response),
                error: None,
                duration_ms: elapsed_ms(start),
            },
            Err(e) => CheckResult {
                name: check.name.clone(),
                request,
                status: None,
                results: Vec::new(),
                error: Some(e.to_string()),
                duration_ms: elapsed_ms(start),
            },
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
