//! Request specification type

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::HttpMethod;
use crate::error::{DomainError, DomainResult};

/// Complete specification for one call against the service.
///
/// `path` is relative to the API root (`users/123123`, `report`); the
/// [`ApiBase`](super::ApiBase) decides where that root lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// Unique identifier for this request
    pub id: Uuid,
    /// Human-readable name
    pub name: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Endpoint path relative to the API root
    pub path: String,
    /// Encoded query string, without the leading `?`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// JSON body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl RequestSpec {
    /// Creates a GET request for the given path.
    #[must_use]
    pub fn get(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            method: HttpMethod::Get,
            path: path.into(),
            query: None,
            body: None,
        }
    }

    /// Creates a POST request with a JSON body.
    #[must_use]
    pub fn post(
        name: impl Into<String>,
        path: impl Into<String>,
        body: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            method: HttpMethod::Post,
            path: path.into(),
            query: None,
            body: Some(body),
        }
    }

    /// Sets the query string from any serializable parameter struct.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters cannot be url-encoded.
    pub fn with_query<Q: Serialize>(mut self, params: &Q) -> DomainResult<Self> {
        let encoded = serde_urlencoded::to_string(params)
            .map_err(|e| DomainError::InvalidQuery(e.to_string()))?;
        self.query = (!encoded.is_empty()).then_some(encoded);
        Ok(self)
    }

    /// Sets a raw, already encoded query string.
    #[must_use]
    pub fn with_raw_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

impl fmt::Display for RequestSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}
