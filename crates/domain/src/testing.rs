//! Checks and assertions.
//!
//! A [`Check`] is one request plus the assertions its response must satisfy.
//! Results are collected per check into [`CheckResult`] and per run into
//! [`SuiteResults`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::request::RequestSpec;

/// A test assertion to run against a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Check response status code.
    StatusCode {
        /// Expected status code.
        expected: u16,
    },
    /// Check body is valid JSON.
    IsJson,
    /// Check JSON path exists and optionally its value.
    JsonPath {
        /// JSONPath expression (e.g., "$.data.id").
        path: String,
        /// Expected value (as JSON).
        expected: Option<serde_json::Value>,
    },
    /// Check the JSON type of the value at a path.
    JsonPathType {
        /// JSONPath expression.
        path: String,
        /// Expected JSON type.
        kind: JsonKind,
    },
    /// Check the array at a path has at least `min` elements.
    JsonArrayLength {
        /// JSONPath expression.
        path: String,
        /// Minimum length.
        min: usize,
    },
    /// Check every element of the array at a path has the given keys.
    EachElementHasFields {
        /// JSONPath expression of the array.
        path: String,
        /// Keys each element must carry.
        fields: Vec<String>,
    },
}

impl Assertion {
    /// Status code must equal `code`.
    #[must_use]
    pub const fn status(code: u16) -> Self {
        Self::StatusCode { expected: code }
    }

    /// The key at `path` must exist.
    #[must_use]
    pub fn has(path: impl Into<String>) -> Self {
        Self::JsonPath {
            path: path.into(),
            expected: None,
        }
    }

    /// The value at `path` must equal `value`.
    #[must_use]
    pub fn equals(path: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self::JsonPath {
            path: path.into(),
            expected: Some(value.into()),
        }
    }

    /// The value at `path` must be of `kind`.
    #[must_use]
    pub fn is_kind(path: impl Into<String>, kind: JsonKind) -> Self {
        Self::JsonPathType {
            path: path.into(),
            kind,
        }
    }

    /// The array at `path` must not be empty.
    #[must_use]
    pub fn non_empty(path: impl Into<String>) -> Self {
        Self::JsonArrayLength {
            path: path.into(),
            min: 1,
        }
    }

    /// Get a human-readable description of this assertion.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("Status code = {expected}"),
            Self::IsJson => "Body is valid JSON".to_string(),
            Self::JsonPath {
                path,
                expected: Some(v),
            } => format!("JSON {path} equals {v}"),
            Self::JsonPath {
                path,
                expected: None,
            } => format!("JSON {path} exists"),
            Self::JsonPathType { path, kind } => format!("JSON {path} is {}", kind.article()),
            Self::JsonArrayLength { path, min } => format!("JSON {path} length >= {min}"),
            Self::EachElementHasFields { path, fields } => {
                format!("Each element of {path} has {}", fields.join(", "))
            }
        }
    }
}

/// JSON value types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JsonKind {
    /// `null`
    Null,
    /// `true` / `false`
    Bool,
    /// Any number.
    Number,
    /// A string.
    String,
    /// An array.
    Array,
    /// An object.
    Object,
}

impl JsonKind {
    /// Returns the kind of a JSON value.
    #[must_use]
    pub const fn of(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(_) => Self::Bool,
            serde_json::Value::Number(_) => Self::Number,
            serde_json::Value::String(_) => Self::String,
            serde_json::Value::Array(_) => Self::Array,
            serde_json::Value::Object(_) => Self::Object,
        }
    }

    const fn article(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "a boolean",
            Self::Number => "a number",
            Self::String => "a string",
            Self::Array => "an array",
            Self::Object => "an object",
        }
    }
}

/// Result of running a single assertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionResult {
    /// The assertion that was run.
    pub assertion: Assertion,
    /// Whether the assertion passed.
    pub passed: bool,
    /// Actual value found (for display).
    pub actual: Option<String>,
    /// Error message if failed.
    pub error: Option<String>,
}

impl AssertionResult {
    /// Create a passed result.
    #[must_use]
    pub const fn pass(assertion: Assertion) -> Self {
        Self {
            assertion,
            passed: true,
            actual: None,
            error: None,
        }
    }

    /// Create a passed result with actual value.
    #[must_use]
    pub fn pass_with_value(assertion: Assertion, actual: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: true,
            actual: Some(actual.into()),
            error: None,
        }
    }

    /// Create a failed result.
    #[must_use]
    pub fn fail(assertion: Assertion, error: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: false,
            actual: None,
            error: Some(error.into()),
        }
    }

    /// Create a failed result with actual value.
    #[must_use]
    pub fn fail_with_value(
        assertion: Assertion,
        actual: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            assertion,
            passed: false,
            actual: Some(actual.into()),
            error: Some(error.into()),
        }
    }
}

/// One independent check: a request and what its response must satisfy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Check {
    /// Unique identifier.
    pub id: Uuid,
    /// Check name, e.g. "user lookup success".
    pub name: String,
    /// The call to make.
    pub request: RequestSpec,
    /// Assertions, evaluated in order.
    pub assertions: Vec<Assertion>,
}

impl Check {
    /// Create a check with no assertions.
    #[must_use]
    pub fn new(name: impl Into<String>, request: RequestSpec) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            request,
            assertions: Vec::new(),
        }
    }

    /// Add an assertion (builder pattern).
    #[must_use]
    pub fn expect(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    /// Add several assertions (builder pattern).
    #[must_use]
    pub fn expect_all(mut self, assertions: impl IntoIterator<Item = Assertion>) -> Self {
        self.assertions.extend(assertions);
        self
    }
}

/// Outcome of a single check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Check name.
    pub name: String,
    /// The call as `METHOD path?query`.
    pub request: String,
    /// Status received, if any response arrived.
    pub status: Option<u16>,
    /// Assertion results up to and including the first failure.
    pub results: Vec<AssertionResult>,
    /// Transport error, when no response arrived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Round trip plus evaluation time in milliseconds.
    pub duration_ms: u64,
}

impl CheckResult {
    /// Whether the check passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.error.is_none() && self.results.iter().all(|r| r.passed)
    }

    /// The first failed assertion, if any.
    #[must_use]
    pub fn first_failure(&self) -> Option<&AssertionResult> {
        self.results.iter().find(|r| !r.passed)
    }

    /// Short reason for a failure, suitable for one line of output.
    #[must_use]
    pub fn failure_reason(&self) -> Option<String> {
        if let Some(error) = &self.error {
            return Some(error.clone());
        }
        self.first_failure().map(|f| {
            format!(
                "{}: {}",
                f.assertion.description(),
                f.error.as_deref().unwrap_or("failed")
            )
        })
    }
}

/// Results from running every check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResults {
    /// Suite identifier.
    pub id: Uuid,
    /// Per-check results, in execution order.
    pub checks: Vec<CheckResult>,
    /// Total number of checks.
    pub total: usize,
    /// Number of passed checks.
    pub passed: usize,
    /// Number of failed checks.
    pub failed: usize,
    /// Execution time in milliseconds.
    pub duration_ms: u64,
}

impl SuiteResults {
    /// Create new suite results.
    #[must_use]
    pub fn new(checks: Vec<CheckResult>, duration_ms: u64) -> Self {
        let total = checks.len();
        let passed = checks.iter().filter(|c| c.passed()).count();

        Self {
            id: Uuid::now_v7(),
            checks,
            total,
            passed,
            failed: total - passed,
            duration_ms,
        }
    }

    /// Check if all checks passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Get pass rate as percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }
}
