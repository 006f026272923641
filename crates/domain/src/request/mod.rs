//! Request types

mod base;
mod method;
mod spec;

pub use base::ApiBase;
pub use method::HttpMethod;
pub use spec::RequestSpec;
