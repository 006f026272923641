//! Raw endpoint probes.
//!
//! A probe is a request made for manual inspection: nothing is asserted,
//! the outcome is only recorded.

use serde::{Deserialize, Serialize};

/// Heading written once at the top of a probe log.
pub const PROBE_HEADING: &str = "== Testing Raw Endpoints ==";

/// What came back from a probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// A response arrived, whatever its status.
    Response {
        /// HTTP status code.
        status: u16,
        /// Raw body text.
        body: String,
        /// Decoded body, when it is JSON.
        json: Option<serde_json::Value>,
    },
    /// The request failed before a response arrived.
    Problem {
        /// Error text.
        error: String,
    },
}

/// One probe and its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeRecord {
    /// Heading such as `Testing GET /api/about`.
    pub title: String,
    /// Absolute URL that was called.
    pub url: String,
    /// What happened.
    pub outcome: ProbeOutcome,
}

impl ProbeRecord {
    /// Whether a response arrived.
    #[must_use]
    pub const fn responded(&self) -> bool {
        matches!(self.outcome, ProbeOutcome::Response { .. })
    }

    /// Renders the record as the text block written to the probe log.
    #[must_use]
    pub fn render(&self) -> String {
        let underline = "-".repeat(self.title.chars().count());
        let mut out = format!("{}\n{underline}\nurl={}\n", self.title, self.url);

        match &self.outcome {
            ProbeOutcome::Response { status, body, json } => {
                let pretty = json
                    .as_ref()
                    .and_then(|v| serde_json::to_string_pretty(v).ok())
                    .unwrap_or_else(|| "(not JSON)".to_string());
                out.push_str(&format!("status_code={status}\n{body}\njson={pretty}\n"));
            }
            ProbeOutcome::Problem { error } => {
                out.push_str(&format!("problem\n{error}\n"));
            }
        }
        out
    }
}

/// Every probe of one run, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeReport {
    /// Records in execution order.
    pub records: Vec<ProbeRecord>,
}

impl ProbeReport {
    /// Number of probes that got a response.
    #[must_use]
    pub fn responded(&self) -> usize {
        self.records.iter().filter(|r| r.responded()).count()
    }

    /// Number of probes that hit a problem.
    #[must_use]
    pub fn problems(&self) -> usize {
        self.records.len() - self.responded()
    }
}
