//! Rendering and saving suite results.

use std::path::Path;

use costcheck_domain::{CheckResult, SuiteResults};

use crate::serialization::{SerializationError, to_json_stable};

/// Heading printed above the check results.
pub const SUITE_HEADING: &str = "== Running Assertion Suite ==";

/// Errors while producing a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The results could not be serialized.
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// The report file could not be written.
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders results as plain text, one line per check plus a summary.
#[must_use]
pub fn render_text(results: &SuiteResults) -> String {
    let mut out = format!("{SUITE_HEADING}\n\n");

    for check in &results.checks {
        out.push_str(&render_check(check));
    }

    out.push_str(&format!(
        "\n{} checks: {} passed, {} failed ({:.1}%) in {} ms\n",
        results.total,
        results.passed,
        results.failed,
        results.pass_rate(),
        results.duration_ms
    ));
    if results.all_passed() {
        out.push_str("All checks passed.\n");
    }
    out
}

fn render_check(check: &CheckResult) -> String {
    let mark = if check.passed() { "PASS" } else { "FAIL" };
    let mut out = format!("{mark}  {} ({} ms)\n", check.name, check.duration_ms);

    if let Some(reason) = check.failure_reason() {
        out.push_str(&format!("      {}\n", check.request));
        if let Some(status) = check.status {
            out.push_str(&format!("      status {status}\n"));
        }
        out.push_str(&format!("      {reason}\n"));
    }
    out
}

/// Renders results as stable, pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(results: &SuiteResults) -> Result<String, ReportError> {
    Ok(to_json_stable(results)?)
}

/// Writes the JSON report to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub async fn write_report(path: &Path, results: &SuiteResults) -> Result<(), ReportError> {
    let json = render_json(results)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, json).await?;
    tracing::info!(path = %path.display(), "report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use costcheck_domain::{Assertion, AssertionResult};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn passing(name: &str) -> CheckResult {
        CheckResult {
            name: name.to_string(),
            request: "GET about".to_string(),
            status: Some(200),
            results: vec![AssertionResult::pass(Assertion::status(200))],
            error: None,
            duration_ms: 4,
        }
    }

    fn failing() -> CheckResult {
        CheckResult {
            name: "add invalid category".to_string(),
            request: "POST add".to_string(),
            status: Some(500),
            results: vec![AssertionResult::fail_with_value(
                Assertion::status(400),
                "500",
                "Expected status = 400, got 500",
            )],
            error: None,
            duration_ms: 7,
        }
    }

    #[test]
    fn test_render_text_all_passed() {
        let results = SuiteResults::new(vec![passing("about")], 10);

        assert_eq!(
            render_text(&results),
            "== Running Assertion Suite ==\n\n\
             PASS  about (4 ms)\n\n\
             1 checks: 1 passed, 0 failed (100.0%) in 10 ms\n\
             All checks passed.\n"
        );
    }

    #[test]
    fn test_render_text_shows_failure_detail() {
        let results = SuiteResults::new(vec![passing("about"), failing()], 20);
        let text = render_text(&results);

        assert!(text.contains(
            "FAIL  add invalid category (7 ms)\n      POST add\n      status 500\n      \
             Status code = 400: Expected status = 400, got 500\n"
        ));
        assert!(text.contains("2 checks: 1 passed, 1 failed (50.0%)"));
        assert!(!text.contains("All checks passed."));
    }

    #[test]
    fn test_render_text_transport_error() {
        let check = CheckResult {
            name: "about".to_string(),
            request: "GET about".to_string(),
            status: None,
            results: Vec::new(),
            error: Some("connection refused by localhost:3000".to_string()),
            duration_ms: 1,
        };
        let text = render_text(&SuiteResults::new(vec![check], 1));
        assert!(text.contains(
            "FAIL  about (1 ms)\n      GET about\n      connection refused by localhost:3000\n"
        ));
    }

    #[tokio::test]
    async fn test_write_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("results.json");
        let results = SuiteResults::new(vec![passing("about"), failing()], 20);

        write_report(&path, &results).await.unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["total"], 2);
        assert_eq!(saved["failed"], 1);
        assert_eq!(saved["checks"][1]["name"], "add invalid category");
        assert_eq!(saved["checks"][1]["results"][0]["passed"], false);
    }
}
