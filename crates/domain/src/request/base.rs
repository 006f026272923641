//! Service root resolution

use url::Url;

use super::RequestSpec;
use crate::error::{DomainError, DomainResult};

/// Where the service's endpoints live: a base URL plus a path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase {
    base: Url,
    prefix: String,
}

impl ApiBase {
    /// Creates an API root from a base URL and a path prefix such as `/api`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or is not an
    /// `http`/`https` URL.
    pub fn new(base_url: &str, prefix: &str) -> DomainResult<Self> {
        let base = Url::parse(base_url.trim())
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: {base_url}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(DomainError::InvalidUrl(format!(
                "URL must start with http:// or https://: {base_url}"
            )));
        }

        Ok(Self {
            base,
            prefix: prefix.trim_matches('/').to_string(),
        })
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    /// Returns the absolute path of an endpoint, e.g. `/api/users/1`.
    #[must_use]
    pub fn endpoint_path(&self, path: &str) -> String {
        let joined = [self.base.path(), self.prefix.as_str(), path]
            .iter()
            .map(|part| part.trim_matches('/'))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        format!("/{joined}")
    }

    /// Resolves a request to its absolute URL.
    #[must_use]
    pub fn resolve(&self, request: &RequestSpec) -> Url {
        let mut url = self.base.clone();
        url.set_path(&self.endpoint_path(&request.path));
        url.set_query(request.query.as_deref());
        url
    }
}
