//! Assertion evaluation port

use costcheck_domain::{Assertion, AssertionResult, ResponseSpec};

/// Evaluates assertions against a response.
pub trait AssertionEvaluator: Send + Sync {
    /// Evaluates a single assertion.
    fn evaluate(&self, assertion: &Assertion, response: &ResponseSpec) -> AssertionResult;

    /// Evaluates assertions in order, stopping after the first failure.
    fn evaluate_all(
        &self,
        assertions: &[Assertion],
        response: &ResponseSpec,
    ) -> Vec<AssertionResult> {
        let mut results = Vec::with_capacity(assertions.len());
        for assertion in assertions {
            let result = self.evaluate(assertion, response);
            let failed = !result.passed;
            results.push(result);
            if failed {
                break;
            }
        }
        results
    }
}
