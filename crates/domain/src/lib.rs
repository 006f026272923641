//! Cost Manager checker domain - core types
//!
//! This crate describes the Cost Manager service from the outside: the
//! payloads sent to it, the requests made against it and the checks and
//! probes run on its responses. All types here are pure Rust with no I/O
//! dependencies.

pub mod category;
pub mod error;
pub mod model;
pub mod probe;
pub mod request;
pub mod response;
pub mod testing;

pub use category::Category;
pub use error::{DomainError, DomainResult};
pub use model::{NewCost, ReportQuery};
pub use probe::{PROBE_HEADING, ProbeOutcome, ProbeRecord, ProbeReport};
pub use request::{ApiBase, HttpMethod, RequestSpec};
pub use response::ResponseSpec;
pub use testing::{Assertion, AssertionResult, Check, CheckResult, JsonKind, SuiteResults};
