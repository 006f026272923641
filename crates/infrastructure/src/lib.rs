//! Cost Manager checker infrastructure - adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus settings loading and
//! result reporting.

pub mod adapters;
pub mod report;
pub mod serialization;
pub mod settings;
pub mod testing;

pub use adapters::{FileProbeSink, ReqwestHttpClient, SystemClock};
pub use report::{ReportError, SUITE_HEADING, render_json, render_text, write_report};
pub use serialization::{SerializationError, to_json_stable};
pub use settings::{ConfigError, ENV_PREFIX, Settings};
pub use testing::TestRunner;
