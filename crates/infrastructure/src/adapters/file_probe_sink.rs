//! Probe log written to a file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};

use costcheck_application::ports::{ProbeSink, ProbeSinkError};
use costcheck_domain::ProbeRecord;

/// Writes probe records to a text file, truncating any previous content.
#[derive(Debug)]
pub struct FileProbeSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileProbeSink {
    /// Creates (or truncates) the file at `path`, creating parent directories.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub async fn create(path: impl AsRef<Path>) -> Result<Self, ProbeSinkError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let file = File::create(&path).await?;

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
        })
    }

    /// Returns the output path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write(&mut self, text: &str) -> Result<(), ProbeSinkError> {
        let writer = self.writer.as_mut().ok_or(ProbeSinkError::Closed)?;
        writer.write_all(text.as_bytes()).await?;
        Ok(())
    }
}

#[async_trait]
impl ProbeSink for FileProbeSink {
    async fn write_heading(&mut self, heading: &str) -> Result<(), ProbeSinkError> {
        self.write(&format!("{heading}\n\n")).await
    }

    async fn write_record(&mut self, record: &ProbeRecord) -> Result<(), ProbeSinkError> {
        self.write(&format!("{}\n", record.render())).await
    }

    async fn finish(&mut self) -> Result<(), ProbeSinkError> {
        let mut writer = self.writer.take().ok_or(ProbeSinkError::Closed)?;
        writer.flush().await?;
        writer.into_inner().sync_all().await?;
        tracing::info!(path = %self.path.display(), "probe output written");
        Ok(())
    }
}
