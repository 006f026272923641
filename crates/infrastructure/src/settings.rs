//! Layered run settings.
//!
//! Sources, lowest priority first: built-in defaults, an optional TOML
//! file, then `COSTCHECK_*` environment variables. Command-line overrides
//! are applied by the caller on the loaded value.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ::config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use costcheck_application::{DEFAULT_MISSING_USER_ID, DEFAULT_TEST_USER_ID};
use costcheck_domain::{ApiBase, DomainError};

/// Prefix of the environment variables read into [`Settings`].
pub const ENV_PREFIX: &str = "COSTCHECK";

/// Errors produced while loading or validating settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read or a value has the wrong type.
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// A value was read but is not usable.
    #[error("invalid value for '{key}': {message}")]
    InvalidValue {
        /// Setting name.
        key: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// The base URL or prefix is malformed.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Service root, e.g. `http://localhost:3000`.
    pub base_url: String,
    /// Path prefix every endpoint is mounted under.
    pub prefix: String,
    /// Existing user the checks run as.
    pub test_user_id: i64,
    /// User id that must not exist.
    pub missing_user_id: i64,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Probe output file.
    pub output: PathBuf,
    /// Add one cost per category instead of only `food`.
    pub exhaustive_categories: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            prefix: "/api".to_string(),
            test_user_id: DEFAULT_TEST_USER_ID,
            missing_user_id: DEFAULT_MISSING_USER_ID,
            timeout_ms: 30_000,
            output: PathBuf::from("probe-output.txt"),
            exhaustive_categories: false,
        }
    }
}

impl Settings {
    /// Loads settings from defaults, `file` and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `file` is given but unreadable, or a value is invalid.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(file, None)
    }

    /// Like [`Settings::load`], but reads variables from `env` instead of
    /// the process environment when it is `Some`.
    ///
    /// # Errors
    ///
    /// Returns an error if `file` is given but unreadable, or a value is invalid.
    pub fn load_with_env(
        file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("prefix", defaults.prefix)?
            .set_default("test_user_id", defaults.test_user_id)?
            .set_default("missing_user_id", defaults.missing_user_id)?
            .set_default("timeout_ms", 30_000_i64)?
            .set_default("output", defaults.output.to_string_lossy().into_owned())?
            .set_default("exhaustive_categories", defaults.exhaustive_categories)?;

        if let Some(path) = file {
            tracing::debug!(path = %path.display(), "reading config file");
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(true),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .source(env),
        );

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks values the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timeout_ms",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.test_user_id == self.missing_user_id {
            return Err(ConfigError::InvalidValue {
                key: "missing_user_id",
                message: "must differ from test_user_id".to_string(),
            });
        }
        if self.output.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "output",
                message: "must not be empty".to_string(),
            });
        }
        self.api_base()?;
        Ok(())
    }

    /// The service root joined with the prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute http(s) URL.
    pub fn api_base(&self) -> Result<ApiBase, ConfigError> {
        Ok(ApiBase::new(&self.base_url, &self.prefix)?)
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
