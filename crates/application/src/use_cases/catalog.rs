//! The fixed catalog of checks run against the service.

use chrono::{DateTime, Datelike, Utc};
use rand::Rng;
use serde_json::json;

use costcheck_domain::{
    Assertion, Category, Check, DomainResult, JsonKind, NewCost, ReportQuery, RequestSpec,
};

/// User assumed to be seeded in the service.
pub const DEFAULT_TEST_USER_ID: i64 = 123_123;

/// User id assumed to not exist.
pub const DEFAULT_MISSING_USER_ID: i64 = 9_999_999;

/// Everything the catalog depends on besides the service itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteContext {
    /// Existing user the checks run as.
    pub test_user_id: i64,
    /// User id that must not exist.
    pub missing_user_id: i64,
    /// "Now", for `createdAt` and the current report month.
    pub now: DateTime<Utc>,
    /// Amount of the successful add.
    pub sum: i64,
    /// Also add one cost per remaining category.
    pub exhaustive_categories: bool,
}

impl SuiteContext {
    /// Creates a context with a random sum in `10..=100`.
    #[must_use]
    pub fn new(test_user_id: i64, missing_user_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            test_user_id,
            missing_user_id,
            now,
            sum: random_sum(),
            exhaustive_categories: false,
        }
    }

    /// Fixes the amount of the successful add.
    #[must_use]
    pub const fn with_sum(mut self, sum: i64) -> Self {
        self.sum = sum;
        self
    }

    /// Enables the per-category add checks.
    #[must_use]
    pub const fn with_exhaustive_categories(mut self, enabled: bool) -> Self {
        self.exhaustive_categories = enabled;
        self
    }
}

/// Picks the amount for a successful add.
#[must_use]
pub fn random_sum() -> i64 {
    rand::rng().random_range(10..=100)
}

/// Builds every check, in execution order.
///
/// # Errors
///
/// Returns an error if a report query cannot be encoded.
pub fn catalog(ctx: &SuiteContext) -> DomainResult<Vec<Check>> {
    let mut checks = vec![
        user_lookup_success(ctx),
        user_lookup_not_found(ctx),
        add_invalid_category(ctx),
        add_success(ctx, Category::Food, "Test cost entry", ctx.sum),
        add_missing_fields(),
        add_unknown_user(ctx),
        report_success(ctx)?,
        report_missing_params(ctx)?,
        about(),
        user_lookup_invalid_id(),
        report_non_numeric(),
        report_unknown_user(ctx)?,
    ];

    if ctx.exhaustive_categories {
        checks.extend(
            Category::ALL
                .into_iter()
                .filter(|c| *c != Category::Food)
                .map(|c| add_success(ctx, c, &format!("Test {c} entry"), ctx.sum)),
        );
    }

    Ok(checks)
}

fn error_body(status: u16) -> [Assertion; 3] {
    [
        Assertion::status(status),
        Assertion::IsJson,
        Assertion::has("$.error"),
    ]
}

fn user_lookup_success(ctx: &SuiteContext) -> Check {
    let path = format!("users/{}", ctx.test_user_id);
    Check::new("user lookup success", RequestSpec::get("user details", path)).expect_all([
        Assertion::status(200),
        Assertion::IsJson,
        Assertion::has("$.first_name"),
        Assertion::has("$.last_name"),
        Assertion::has("$.id"),
        Assertion::has("$.total"),
        Assertion::equals("$.id", ctx.test_user_id),
    ])
}

fn user_lookup_not_found(ctx: &SuiteContext) -> Check {
    let path = format!("users/{}", ctx.missing_user_id);
    Check::new("user lookup not found", RequestSpec::get("missing user", path))
        .expect_all(error_body(404))
}

fn user_lookup_invalid_id() -> Check {
    Check::new(
        "user lookup invalid id",
        RequestSpec::get("non-numeric user", "users/not-a-number"),
    )
    .expect_all(error_body(400))
}

fn add_invalid_category(ctx: &SuiteContext) -> Check {
    let payload = NewCost::new(
        ctx.test_user_id,
        "Test cost invalid category",
        Category::Food,
        50,
    )
    .with_raw_category("transport")
    .created_at(ctx.now);

    Check::new(
        "add invalid category",
        RequestSpec::post("add transport cost", "add", payload.to_json()),
    )
    .expect_all([
        Assertion::status(400),
        Assertion::IsJson,
        Assertion::equals("$.error", "Invalid category"),
        Assertion::has("$.validCategories"),
        Assertion::non_empty("$.validCategories"),
    ])
}

fn add_success(ctx: &SuiteContext, category: Category, description: &str, sum: i64) -> Check {
    let payload = NewCost::new(ctx.test_user_id, description, category, sum).created_at(ctx.now);
    let name = if category == Category::Food {
        "add success".to_string()
    } else {
        format!("add success ({category})")
    };

    Check::new(name, RequestSpec::post("add cost", "add", payload.to_json())).expect_all([
        Assertion::status(200),
        Assertion::IsJson,
        Assertion::equals("$.userid", ctx.test_user_id),
        Assertion::equals("$.description", description),
        Assertion::equals("$.category", category.as_str()),
        Assertion::equals("$.sum", sum),
    ])
}

fn add_missing_fields() -> Check {
    Check::new(
        "add missing fields",
        RequestSpec::post(
            "add incomplete cost",
            "add",
            json!({"description": "Missing fields test"}),
        ),
    )
    .expect_all(error_body(400))
}

fn add_unknown_user(ctx: &SuiteContext) -> Check {
    let payload = NewCost::new(
        ctx.missing_user_id,
        "User not found test",
        Category::Health,
        50,
    );
    Check::new(
        "add unknown user",
        RequestSpec::post("add cost for missing user", "add", payload.to_json()),
    )
    .expect_all(error_body(404))
}

fn report_success(ctx: &SuiteContext) -> DomainResult<Check> {
    let (year, month) = (ctx.now.year(), ctx.now.month());
    let request = RequestSpec::get("monthly report", "report")
        .with_query(&ReportQuery::new(ctx.test_user_id, year, month))?;

    let mut check = Check::new("report success", request).expect_all([
        Assertion::status(200),
        Assertion::IsJson,
        Assertion::equals("$.userid", ctx.test_user_id),
        Assertion::equals("$.year", year),
        Assertion::equals("$.month", month),
        Assertion::is_kind("$.costs", JsonKind::Object),
    ]);
    for category in Category::ALL {
        check = check.expect(Assertion::is_kind(
            format!("$.costs.{category}"),
            JsonKind::Array,
        ));
    }
    Ok(check)
}

fn report_missing_params(ctx: &SuiteContext) -> DomainResult<Check> {
    let query = ReportQuery::new(ctx.test_user_id, ctx.now.year(), ctx.now.month()).without_month();
    let request = RequestSpec::get("report without month", "report").with_query(&query)?;
    Ok(Check::new("report missing params", request).expect_all(error_body(400)))
}

fn report_non_numeric() -> Check {
    let request = RequestSpec::get("report with words", "report")
        .with_raw_query("id=abc&year=twenty&month=feb");
    Check::new("report non-numeric params", request).expect_all(error_body(400))
}

fn report_unknown_user(ctx: &SuiteContext) -> DomainResult<Check> {
    let query = ReportQuery::new(ctx.missing_user_id, ctx.now.year(), ctx.now.month());
    let request = RequestSpec::get("report for missing user", "report").with_query(&query)?;
    Ok(Check::new("report unknown user", request).expect_all(error_body(404)))
}

/// Builds the `GET about` check.
#[must_use]
pub fn about() -> Check {
    Check::new("about", RequestSpec::get("team members", "about")).expect_all([
        Assertion::status(200),
        Assertion::IsJson,
        Assertion::is_kind("$", JsonKind::Array),
        Assertion::non_empty("$"),
        Assertion::EachElementHasFields {
            path: "$".to_string(),
            fields: vec!["first_name".to_string(), "last_name".to_string()],
        },
    ])
}
