//! Wiring of one checker run: probes first, then the suite.

use std::io::Write;
use std::sync::Arc;

use serde::Serialize;

use costcheck_application::ports::{Clock, HttpClient, HttpClientError, ProbeSinkError};
use costcheck_application::{
    ApplicationError, RunProbes, RunProbesInput, RunSuite, SuiteContext, catalog,
};
use costcheck_domain::{DomainError, ProbeReport, SuiteResults};
use costcheck_infrastructure::{
    ConfigError, FileProbeSink, ReportError, ReqwestHttpClient, SerializationError, Settings,
    SystemClock, TestRunner, render_text, to_json_stable, write_report,
};

use crate::cli::{CliConfig, OutputFormat};

/// Errors that stop a run before it produces a verdict.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Settings are unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built.
    #[error(transparent)]
    Http(#[from] HttpClientError),

    /// The check catalog could not be built.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The probe output file could not be written.
    #[error("probe output: {0}")]
    ProbeSink(#[from] ProbeSinkError),

    /// A use case failed.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// The results could not be reported.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Writing to stdout failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SerializationError> for AppError {
    fn from(error: SerializationError) -> Self {
        Self::Report(ReportError::Serialization(error))
    }
}

/// What a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Probe records, unless probes were skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probes: Option<ProbeReport>,
    /// Suite results, unless the suite was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suite: Option<SuiteResults>,
}

impl RunSummary {
    /// Process exit code: `0` when no check failed, `1` otherwise.
    ///
    /// Probes never affect it.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match &self.suite {
            Some(suite) if !suite.all_passed() => 1,
            _ => 0,
        }
    }
}

/// Runs against the service described by `settings` using reqwest.
///
/// # Errors
///
/// Returns an error if the client cannot be built or a phase cannot
/// write its output. Failing checks are not errors.
pub async fn run<W: Write>(
    cli: &CliConfig,
    settings: &Settings,
    out: &mut W,
) -> Result<RunSummary, AppError> {
    let client = ReqwestHttpClient::new(settings.api_base()?, settings.timeout())?;
    tracing::info!(base = %client.base().base_url(), prefix = %settings.prefix, "target");
    run_with_client(Arc::new(client), cli, settings, out).await
}

/// Runs both phases through an already-built client.
///
/// # Errors
///
/// See [`run`].
pub async fn run_with_client<C, W>(
    client: Arc<C>,
    cli: &CliConfig,
    settings: &Settings,
    out: &mut W,
) -> Result<RunSummary, AppError>
where
    C: HttpClient,
    W: Write,
{
    let clock = SystemClock::new();

    let probes = if cli.skip_probes {
        None
    } else {
        let mut sink = FileProbeSink::create(&settings.output).await?;
        let input = RunProbesInput {
            user_id: settings.test_user_id,
        };
        let report = RunProbes::new(Arc::clone(&client), clock)
            .execute(&input, &mut sink)
            .await?;
        Some(report)
    };

    let suite = if cli.skip_suite {
        None
    } else {
        let context =
            SuiteContext::new(settings.test_user_id, settings.missing_user_id, clock.now())
                .with_exhaustive_categories(settings.exhaustive_categories);
        let checks = catalog(&context)?;
        tracing::info!(checks = checks.len(), "running suite");
        Some(RunSuite::new(client, TestRunner::new()).execute(&checks).await)
    };

    let summary = RunSummary { probes, suite };

    if let (Some(path), Some(suite)) = (&cli.report_path, &summary.suite) {
        write_report(path, suite).await?;
    }

    match cli.output_format {
        OutputFormat::Text => write_text(out, settings, &summary)?,
        OutputFormat::Json => out.write_all(to_json_stable(&summary)?.as_bytes())?,
    }
    out.flush()?;

    Ok(summary)
}

fn write_text<W: Write>(
    out: &mut W,
    settings: &Settings,
    summary: &RunSummary,
) -> std::io::Result<()> {
    if let Some(probes) = &summary.probes {
        writeln!(
            out,
            "Probe output written to {} ({} responded, {} problems)",
            settings.output.display(),
            probes.responded(),
            probes.problems()
        )?;
    }
    if let Some(suite) = &summary.suite {
        if summary.probes.is_some() {
            writeln!(out)?;
        }
        out.write_all(render_text(suite).as_bytes())?;
    }
    Ok(())
}
