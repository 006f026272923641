//! Probe output port

use async_trait::async_trait;
use thiserror::Error;

use costcheck_domain::ProbeRecord;

/// Errors that can occur while writing probe output.
#[derive(Debug, Error)]
pub enum ProbeSinkError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The sink was already finished.
    #[error("probe output already closed")]
    Closed,
}

/// Destination of probe records.
///
/// Records are written as they complete, so a crash midway still leaves the
/// earlier probes behind.
#[async_trait]
pub trait ProbeSink: Send {
    /// Writes the run heading.
    ///
    /// # Errors
    /// Returns an error if the sink cannot be written.
    async fn write_heading(&mut self, heading: &str) -> Result<(), ProbeSinkError>;

    /// Writes one probe record.
    ///
    /// # Errors
    /// Returns an error if the sink cannot be written.
    async fn write_record(&mut self, record: &ProbeRecord) -> Result<(), ProbeSinkError>;

    /// Flushes and closes the sink.
    ///
    /// # Errors
    /// Returns an error if buffered output cannot be flushed.
    async fn finish(&mut self) -> Result<(), ProbeSinkError>;
}
