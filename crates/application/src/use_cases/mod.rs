//! Application use cases (business logic orchestration).

mod catalog;
mod run_probes;
mod run_suite;

pub use catalog::*;
pub use run_probes::*;
pub use run_suite::*;
