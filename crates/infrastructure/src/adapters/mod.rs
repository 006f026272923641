//! Infrastructure adapters

mod file_probe_sink;
mod reqwest_client;
mod system_clock;

pub use file_probe_sink::FileProbeSink;
pub use reqwest_client::ReqwestHttpClient;
pub use system_clock::SystemClock;
