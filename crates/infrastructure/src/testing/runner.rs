//! Test runner implementation.
//!
//! Evaluates check assertions against HTTP responses.

use costcheck_application::ports::AssertionEvaluator;
use costcheck_domain::{Assertion, AssertionResult, JsonKind, ResponseSpec};
use serde_json::Value;

const PREVIEW_CHARS: usize = 100;

/// Test runner that executes assertions against responses.
///
/// Evaluation of a check stops at its first failed assertion.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestRunner;

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Run a single assertion against a response.
    #[must_use]
    pub fn run_assertion(&self, assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
        match assertion {
            Assertion::StatusCode { expected } => {
                Self::check_status_code(assertion, response, *expected)
            }
            Assertion::IsJson => Self::check_is_json(assertion, response),
            Assertion::JsonPath { path, expected } => {
                Self::check_json_path(assertion, response, path, expected.as_ref())
            }
            Assertion::JsonPathType { path, kind } => {
                Self::check_json_type(assertion, response, path, *kind)
            }
            Assertion::JsonArrayLength { path, min } => {
                Self::check_array_length(assertion, response, path, *min)
            }
            Assertion::EachElementHasFields { path, fields } => {
                Self::check_each_element(assertion, response, path, fields)
            }
        }
    }

    fn check_status_code(
        assertion: &Assertion,
        response: &ResponseSpec,
        expected: u16,
    ) -> AssertionResult {
        let actual = response.status;
        if actual == expected {
            AssertionResult::pass_with_value(assertion.clone(), actual.to_string())
        } else {
            AssertionResult::fail_with_value(
                assertion.clone(),
                actual.to_string(),
                format!(
                    "Expected status = {expected}, got {actual} ({})",
                    preview(&response.body)
                ),
            )
        }
    }

    fn check_is_json(assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
        match serde_json::from_str::<Value>(&response.body) {
            Ok(_) => AssertionResult::pass(assertion.clone()),
            Err(e) => AssertionResult::fail_with_value(
                assertion.clone(),
                preview(&response.body),
                format!("Body is not valid JSON: {e}"),
            ),
        }
    }

    /// Parses the body and resolves `path`, turning every miss into a failure.
    fn lookup(
        assertion: &Assertion,
        response: &ResponseSpec,
        path: &str,
    ) -> Result<Value, AssertionResult> {
        let json = serde_json::from_str::<Value>(&response.body).map_err(|e| {
            AssertionResult::fail(
                assertion.clone(),
                format!("Failed to parse body as JSON: {e}"),
            )
        })?;

        match query_json_path(&json, path) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(AssertionResult::fail(
                assertion.clone(),
                format!("JSON path '{path}' not found"),
            )),
            Err(e) => Err(AssertionResult::fail(
                assertion.clone(),
                format!("Invalid JSON path '{path}': {e}"),
            )),
        }
    }

    fn check_json_path(
        assertion: &Assertion,
        response: &ResponseSpec,
        path: &str,
        expected: Option<&Value>,
    ) -> AssertionResult {
        let value = match Self::lookup(assertion, response, path) {
            Ok(value) => value,
            Err(failure) => return failure,
        };

        match expected {
            Some(expected_value) if !json_equal(&value, expected_value) => {
                AssertionResult::fail_with_value(
                    assertion.clone(),
                    value.to_string(),
                    format!(
                        "JSON path '{path}' value mismatch: expected {expected_value}, got {value}"
                    ),
                )
            }
            _ => AssertionResult::pass_with_value(assertion.clone(), value.to_string()),
        }
    }

    fn check_json_type(
        assertion: &Assertion,
        response: &ResponseSpec,
        path: &str,
        kind: JsonKind,
    ) -> AssertionResult {
        let value = match Self::lookup(assertion, response, path) {
            Ok(value) => value,
            Err(failure) => return failure,
        };

        let actual = JsonKind::of(&value);
        if actual == kind {
            AssertionResult::pass(assertion.clone())
        } else {
            AssertionResult::fail_with_value(
                assertion.clone(),
                value.to_string(),
                format!("JSON path '{path}' is {actual:?}, expected {kind:?}"),
            )
        }
    }

    fn check_array_length(
        assertion: &Assertion,
        response: &ResponseSpec,
        path: &str,
        min: usize,
    ) -> AssertionResult {
        let value = match Self::lookup(assertion, response, path) {
            Ok(value) => value,
            Err(failure) => return failure,
        };

        let Some(items) = value.as_array() else {
            return AssertionResult::fail_with_value(
                assertion.clone(),
                value.to_string(),
                format!("JSON path '{path}' is not an array"),
            );
        };

        let actual_length = items.len();
        if actual_length >= min {
            AssertionResult::pass_with_value(assertion.clone(), actual_length.to_string())
        } else {
            AssertionResult::fail_with_value(
                assertion.clone(),
                actual_length.to_string(),
                format!("Array length {actual_length} is less than {min}"),
            )
        }
    }

    fn check_each_element(
        assertion: &Assertion,
        response: &ResponseSpec,
        path: &str,
        fields: &[String],
    ) -> AssertionResult {
        let value = match Self::lookup(assertion, response, path) {
            Ok(value) => value,
            Err(failure) => return failure,
        };

        let Some(items) = value.as_array() else {
            return AssertionResult::fail_with_value(
                assertion.clone(),
                value.to_string(),
                format!("JSON path '{path}' is not an array"),
            );
        };

        for (index, item) in items.iter().enumerate() {
            if let Some(missing) = fields.iter().find(|f| item.get(f.as_str()).is_none()) {
                return AssertionResult::fail_with_value(
                    assertion.clone(),
                    item.to_string(),
                    format!("Element {index} of '{path}' has no '{missing}'"),
                );
            }
        }
        AssertionResult::pass_with_value(assertion.clone(), format!("{} elements", items.len()))
    }
}

impl AssertionEvaluator for TestRunner {
    fn evaluate(&self, assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
        self.run_assertion(assertion, response)
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > PREVIEW_CHARS {
        let head: String = body.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}

/// Query a JSON value using a simple JSONPath-like syntax.
/// Supports: $, $.field, $.field.nested, $.array[0]
fn query_json_path(json: &Value, path: &str) -> Result<Option<Value>, String> {
    let path = path.trim();
    let Some(path) = path.strip_prefix('$') else {
        return Err("JSON path must start with '$'".to_string());
    };

    if path.is_empty() {
        return Ok(Some(json.clone()));
    }

    let path = path.strip_prefix('.').unwrap_or(path);
    let mut current = json;

    for segment in split_path_segments(path) {
        if let Some((name, index)) = parse_array_access(&segment) {
            if !name.is_empty() {
                match current.get(name.as_str()) {
                    Some(v) => current = v,
                    None => return Ok(None),
                }
            }
            let idx: usize = index
                .parse()
                .map_err(|_| format!("Invalid array index: {index}"))?;
            match current.get(idx) {
                Some(v) => current = v,
                None => return Ok(None),
            }
        } else {
            match current.get(segment.as_str()) {
                Some(v) => current = v,
                None => return Ok(None),
            }
        }
    }

    Ok(Some(current.clone()))
}

/// Split a path into segments, respecting array brackets.
fn split_path_segments(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_bracket = false;

    for ch in path.chars() {
        match ch {
            '.' if !in_bracket => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
            '[' => {
                in_bracket = true;
                current.push(ch);
            }
            ']' => {
                in_bracket = false;
                current.push(ch);
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Parse array access like "field[0]" into ("field", "0").
fn parse_array_access(segment: &str) -> Option<(String, String)> {
    let bracket_start = segment.find('[')?;
    if !segment.ends_with(']') {
        return None;
    }
    let name = segment[..bracket_start].to_string();
    let index = segment[bracket_start + 1..segment.len() - 1].to_string();
    Some((name, index))
}

/// JSON equality where `42` and `42.0` are the same number.
///
/// Integers are compared exactly; only non-integers go through `f64`.
fn json_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
                return a == b;
            }
            if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
                return a == b;
            }
            if a.is_f64() || b.is_f64() {
                return match (a.as_f64(), b.as_f64()) {
                    (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON,
                    _ => false,
                };
            }
            false
        }
        _ => actual == expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use costcheck_application::{SuiteContext, catalog};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    fn text_response(status: u16, body: &str) -> ResponseSpec {
        ResponseSpec::new(status, body.as_bytes().to_vec(), Duration::from_millis(5))
    }

    fn report_body() -> Value {
        json!({
            "userid": 123_123,
            "year": 2025,
            "month": 2,
            "costs": {
                "food": [{"sum": 8, "description": "milk 9", "day": 3}],
                "health": [],
                "housing": [],
                "sport": [],
                "education": []
            }
        })
    }

    #[test]
    fn test_status_code() {
        let runner = TestRunner::new();
        let response = text_response(200, "");

        assert!(runner.run_assertion(&Assertion::status(200), &response).passed);

        let result = runner.run_assertion(&Assertion::status(404), &response);
        assert!(!result.passed);
        assert_eq!(result.actual.as_deref(), Some("200"));
        assert_eq!(result.error.as_deref(), Some("Expected status = 404, got 200 ()"));
    }

    #[test]
    fn test_is_json() {
        let runner = TestRunner::new();
        let object = text_response(200, r#"{"ok": true}"#);
        assert!(runner.run_assertion(&Assertion::IsJson, &object).passed);
        let html = text_response(200, "<html>");
        assert!(!runner.run_assertion(&Assertion::IsJson, &html).passed);
    }

    #[test]
    fn test_json_path_exists_and_equals() {
        let runner = TestRunner::new();
        let response = ResponseSpec::json(
            200,
            &json!({"id": 123_123, "first_name": "Bar", "last_name": "Azarya", "total": 0}),
        );

        assert!(runner.run_assertion(&Assertion::has("$.first_name"), &response).passed);
        assert!(runner.run_assertion(&Assertion::equals("$.id", 123_123), &response).passed);

        let missing = runner.run_assertion(&Assertion::has("$.birthday"), &response);
        assert!(!missing.passed);
        assert_eq!(missing.error.as_deref(), Some("JSON path '$.birthday' not found"));

        let wrong = runner.run_assertion(&Assertion::equals("$.id", 1), &response);
        assert!(!wrong.passed);
        assert_eq!(wrong.actual.as_deref(), Some("123123"));
    }

    #[test]
    fn test_null_value_counts_as_present() {
        let runner = TestRunner::new();
        let response = ResponseSpec::json(200, &json!({"total": null}));
        assert!(runner.run_assertion(&Assertion::has("$.total"), &response).passed);
    }

    #[test]
    fn test_json_equality_ignores_number_representation() {
        let runner = TestRunner::new();
        let response = text_response(200, r#"{"sum": 42.0}"#);
        assert!(runner.run_assertion(&Assertion::equals("$.sum", 42), &response).passed);
        assert!(!runner.run_assertion(&Assertion::equals("$.sum", 42.5), &response).passed);
    }

    #[test]
    fn test_json_equality_keeps_large_integers_distinct() {
        let runner = TestRunner::new();
        // 2^53 and 2^53 + 1 collapse to the same f64.
        let response = text_response(200, r#"{"id": 9007199254740993}"#);

        let same = Assertion::equals("$.id", 9_007_199_254_740_993_i64);
        assert!(runner.run_assertion(&same, &response).passed);

        let off_by_one = Assertion::equals("$.id", 9_007_199_254_740_992_i64);
        assert!(!runner.run_assertion(&off_by_one, &response).passed);

        let huge = text_response(200, r#"{"id": 18446744073709551615}"#);
        assert!(!runner.run_assertion(&Assertion::equals("$.id", -1), &huge).passed);
        assert!(runner.run_assertion(&Assertion::equals("$.id", u64::MAX), &huge).passed);
    }

    #[test]
    fn test_json_path_on_non_json_body() {
        let runner = TestRunner::new();
        let result = runner.run_assertion(&Assertion::has("$.error"), &text_response(500, "oops"));
        assert!(!result.passed);
        assert!(result.error.unwrap().starts_with("Failed to parse body as JSON"));
    }

    #[test]
    fn test_invalid_json_path() {
        let runner = TestRunner::new();
        let result = runner.run_assertion(&Assertion::has("error"), &text_response(200, "{}"));
        assert!(!result.passed);
        assert_eq!(
            result.error.as_deref(),
            Some("Invalid JSON path 'error': JSON path must start with '$'")
        );
    }

    #[test]
    fn test_json_path_with_array() {
        let runner = TestRunner::new();
        let response = ResponseSpec::json(200, &report_body());
        let day = Assertion::equals("$.costs.food[0].day", 3);
        assert!(runner.run_assertion(&day, &response).passed);
        let second = Assertion::has("$.costs.food[1]");
        assert!(!runner.run_assertion(&second, &response).passed);
    }

    #[test]
    fn test_json_type() {
        let runner = TestRunner::new();
        let response = ResponseSpec::json(200, &report_body());

        for category in ["food", "health", "housing", "sport", "education"] {
            let assertion = Assertion::is_kind(format!("$.costs.{category}"), JsonKind::Array);
            assert!(runner.run_assertion(&assertion, &response).passed, "{category}");
        }
        let costs = Assertion::is_kind("$.costs", JsonKind::Object);
        assert!(runner.run_assertion(&costs, &response).passed);

        let null_costs = ResponseSpec::json(200, &json!({"costs": {"food": null}}));
        let result = runner.run_assertion(
            &Assertion::is_kind("$.costs.food", JsonKind::Array),
            &null_costs,
        );
        assert!(!result.passed);
        assert_eq!(
            result.error.as_deref(),
            Some("JSON path '$.costs.food' is Null, expected Array")
        );
    }

    #[test]
    fn test_array_length() {
        let runner = TestRunner::new();
        let assertion = Assertion::non_empty("$.validCategories");

        let valid = ResponseSpec::json(400, &json!({"validCategories": ["food", "health"]}));
        assert!(runner.run_assertion(&assertion, &valid).passed);

        let empty = ResponseSpec::json(400, &json!({"validCategories": []}));
        let result = runner.run_assertion(&assertion, &empty);
        assert_eq!(result.error.as_deref(), Some("Array length 0 is less than 1"));

        let not_array = ResponseSpec::json(400, &json!({"validCategories": "food"}));
        let result = runner.run_assertion(&assertion, &not_array);
        assert_eq!(
            result.error.as_deref(),
            Some("JSON path '$.validCategories' is not an array")
        );
    }

    #[test]
    fn test_each_element_has_fields() {
        let runner = TestRunner::new();
        let assertion = Assertion::EachElementHasFields {
            path: "$".to_string(),
            fields: vec!["first_name".to_string(), "last_name".to_string()],
        };

        let good = ResponseSpec::json(
            200,
            &json!([
                {"first_name": "Bar", "last_name": "Azarya"},
                {"first_name": "Aviv Meir", "last_name": "Ovadia"}
            ]),
        );
        assert!(runner.run_assertion(&assertion, &good).passed);

        let bad = ResponseSpec::json(
            200,
            &json!([{"first_name": "Bar", "last_name": "A"}, {"first_name": "X"}]),
        );
        let result = runner.run_assertion(&assertion, &bad);
        assert!(!result.passed);
        assert_eq!(result.error.as_deref(), Some("Element 1 of '$' has no 'last_name'"));
    }

    #[test]
    fn test_evaluate_all_stops_at_first_failure() {
        let response = text_response(404, "Not Found");
        let assertions = [Assertion::status(200), Assertion::IsJson];

        let results = TestRunner::new().evaluate_all(&assertions, &response);

        assert_eq!(results.len(), 1);
        assert!(!results[0].passed);
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let body = "é".repeat(150);
        let shown = preview(&body);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().count(), PREVIEW_CHARS + 3);
    }

    /// Smallest bodies the service contract allows for each catalog check.
    fn minimal_response(name: &str, ctx: &SuiteContext) -> ResponseSpec {
        let error = |status| ResponseSpec::json(status, &json!({"error": "x"}));
        match name {
            "user lookup success" => ResponseSpec::json(
                200,
                &json!({
                    "id": ctx.test_user_id,
                    "first_name": "A",
                    "last_name": "B",
                    "total": null
                }),
            ),
            "add invalid category" => ResponseSpec::json(
                400,
                &json!({"error": "Invalid category", "validCategories": ["food"]}),
            ),
            "add success" => ResponseSpec::json(
                200,
                &json!({
                    "userid": ctx.test_user_id,
                    "description": "Test cost entry",
                    "category": "food",
                    "sum": ctx.sum
                }),
            ),
            "report success" => ResponseSpec::json(
                200,
                &json!({
                    "userid": ctx.test_user_id,
                    "year": 2025,
                    "month": 3,
                    "costs": {
                        "food": [{
                            "userid": ctx.test_user_id,
                            "description": "milk 9",
                            "category": "food",
                            "sum": 8
                        }],
                        "health": [],
                        "housing": [],
                        "sport": [],
                        "education": [],
                        "other": []
                    }
                }),
            ),
            "about" => ResponseSpec::json(200, &json!([{"first_name": "A", "last_name": "B"}])),
            "user lookup not found" | "add unknown user" | "report unknown user" => error(404),
            "add missing fields"
            | "report missing params"
            | "user lookup invalid id"
            | "report non-numeric params" => error(400),
            other => unreachable!("no response for check '{other}'"),
        }
    }

    #[test]
    fn test_catalog_accepts_minimal_contract_bodies() {
        let now = Utc.with_ymd_and_hms(2025, 3, 9, 12, 0, 0).unwrap();
        let ctx = SuiteContext::new(123_123, 9_999_999, now).with_sum(57);
        let runner = TestRunner::new();

        for check in catalog(&ctx).unwrap() {
            let response = minimal_response(&check.name, &ctx);
            let results = runner.evaluate_all(&check.assertions, &response);
            let failure = results.iter().find(|r| !r.passed);
            assert!(failure.is_none(), "{}: {failure:?}", check.name);
            assert_eq!(results.len(), check.assertions.len(), "{}", check.name);
        }
    }
}
