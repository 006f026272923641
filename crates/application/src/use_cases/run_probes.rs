//! Raw endpoint probe use case.

use std::sync::Arc;

use costcheck_domain::{
    Category, DomainResult, NewCost, PROBE_HEADING, ProbeOutcome, ProbeRecord, ProbeReport,
    ReportQuery, RequestSpec,
};

use crate::ApplicationResult;
use crate::ports::{Clock, HttpClient, ProbeSink};

/// Input for a probe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunProbesInput {
    /// User the report and add probes are made for.
    pub user_id: i64,
}

/// Use case that calls each endpoint once and logs whatever comes back.
///
/// Probes never fail the run: a request error is written as `problem`
/// and the next probe starts.
pub struct RunProbes<C: HttpClient, K: Clock> {
    client: Arc<C>,
    clock: K,
}

impl<C: HttpClient, K: Clock> RunProbes<C, K> {
    /// Creates a new `RunProbes` use case.
    #[must_use]
    pub const fn new(client: Arc<C>, clock: K) -> Self {
        Self { client, clock }
    }

    /// Builds the probe requests: about, report, add, report again.
    ///
    /// # Errors
    ///
    /// Returns an error if a report query cannot be encoded.
    pub fn requests(&self, input: &RunProbesInput) -> DomainResult<Vec<RequestSpec>> {
        let (year, month) = self.clock.year_month();
        let query = ReportQuery::new(input.user_id, year, month);
        let payload = NewCost::new(input.user_id, "milk 9", Category::Food, 8);

        Ok(vec![
            RequestSpec::get("about", "about"),
            RequestSpec::get("report - initial", "report").with_query(&query)?,
            RequestSpec::post("add", "add", payload.to_json()),
            RequestSpec::get("report - after add", "report").with_query(&query)?,
        ])
    }

    /// Runs every probe in order, writing each record as it completes.
    ///
    /// # Errors
    ///
    /// Returns an error only if the sink cannot be written; request
    /// failures are recorded, not returned.
    pub async fn execute<S: ProbeSink + ?Sized>(
        &self,
        input: &RunProbesInput,
        sink: &mut S,
    ) -> ApplicationResult<ProbeReport> {
        let requests = self.requests(input)?;
        let mut report = ProbeReport::default();

        sink.write_heading(PROBE_HEADING).await?;

        for request in &requests {
            let record = self.probe(request).await;
            sink.write_record(&record).await?;
            report.records.push(record);
        }

        sink.finish().await?;

        tracing::info!(
            responded = report.responded(),
            problems = report.problems(),
            "probes finished"
        );
        Ok(report)
    }

    async fn probe(&self, request: &RequestSpec) -> ProbeRecord {
        let title = format!(
            "Testing {} {} - {}",
            request.method,
            self.client.path_for(request),
            request.name
        );
        let url = self.client.url_for(request);

        let outcome = match self.client.execute(request).await {
            Ok(response) => {
                tracing::debug!(
                    %url,
                    status = response.status,
                    duration = ?response.duration,
                    "probe responded"
                );
                ProbeOutcome::Response {
                    status: response.status,
                    json: response.body_as_json(),
                    body: response.body,
                }
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "probe problem");
                ProbeOutcome::Problem {
                    error: e.to_string(),
                }
            }
        };

        ProbeRecord {
            title,
            url,
            outcome,
        }
    }
}
