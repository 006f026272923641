//! Cost Manager checker application - use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (HTTP client, probe output, clock, assertion evaluation)
//! - The check catalog and the probe and suite use cases
//! - Application-level error handling

pub mod error;
pub mod ports;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult};
pub use ports::{
    AssertionEvaluator, Clock, HttpClient, HttpClientError, ProbeSink, ProbeSinkError,
};
pub use use_cases::{
    DEFAULT_MISSING_USER_ID, DEFAULT_TEST_USER_ID, RunProbes, RunProbesInput, RunSuite,
    SuiteContext, catalog, random_sum,
};
