//! Request payloads sent to the Cost Manager service, with the service's
//! exact field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Payload for `POST add`.
///
/// Every field is optional so that deliberately incomplete payloads can be
/// sent; absent fields are omitted from the JSON body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCost {
    /// Owner of the cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userid: Option<i64>,
    /// Free text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category wire name. Kept as a string so invalid names can be sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sum: Option<i64>,
    /// When the expense happened; the service defaults to now.
    #[serde(
        rename = "createdAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl NewCost {
    /// Creates a complete payload for a valid category.
    #[must_use]
    pub fn new(userid: i64, description: impl Into<String>, category: Category, sum: i64) -> Self {
        Self {
            userid: Some(userid),
            description: Some(description.into()),
            category: Some(category.as_str().to_string()),
            sum: Some(sum),
            created_at: None,
        }
    }

    /// Replaces the category with an arbitrary name.
    #[must_use]
    pub fn with_raw_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the `createdAt` timestamp.
    #[must_use]
    pub const fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Converts the payload to a JSON value.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Query parameters of `GET report`.
///
/// Unset parameters are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportQuery {
    /// User id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// Month, 1-based.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
}

impl ReportQuery {
    /// Creates a complete query.
    #[must_use]
    pub fn new(id: i64, year: i32, month: u32) -> Self {
        Self {
            id: Some(id.to_string()),
            year: Some(year.to_string()),
            month: Some(month.to_string()),
        }
    }

    /// Drops the month parameter.
    #[must_use]
    pub fn without_month(mut self) -> Self {
        self.month = None;
        self
    }
}
