//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod clock;
mod evaluator;
mod http_client;
mod probe_sink;

pub use clock::Clock;
pub use evaluator::AssertionEvaluator;
pub use http_client::{HttpClient, HttpClientError};
pub use probe_sink::{ProbeSink, ProbeSinkError};
