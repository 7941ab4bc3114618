//! Failure reports sent to an upstream endpoint.
//!
//! The only report today is the decode-error report: when the LCS answers
//! with something the CC cannot decode, the CC POSTs `{"error": <message>}`
//! to the report URL carried by the request's error state. Callers only see
//! a boolean; the cause of a failure is logged.

use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a report was not accepted.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no report URL in error state")]
    MissingUrl,

    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("report to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("report to {url} answered with status {status}")]
    Status { url: String, status: u16 },
}

/// Body of a decode-error report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeErrorReport<'a> {
    pub error: &'a str,
}

/// Sends failure reports with a bounded timeout.
#[derive(Clone)]
pub struct Reporter {
    agent: ureq::Agent,
    timeout: Duration,
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Reporter {
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: config.into(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POST a decode-error report. `true` iff the endpoint answered 200.
    pub fn report_decode_error(&self, report_url: Option<&str>, message: &str) -> bool {
        match self.send_decode_error(report_url, message) {
            Ok(()) => {
                debug!(url = report_url.unwrap_or_default(), "Decode error reported");
                true
            }
            Err(err) => {
                warn!(error = %err, "Decode error report failed");
                false
            }
        }
    }

    /// Same as [`Reporter::report_decode_error`] but keeps the failure cause.
    pub fn send_decode_error(
        &self,
        report_url: Option<&str>,
        message: &str,
    ) -> Result<(), ReportError> {
        let url = report_url.ok_or(ReportError::MissingUrl)?;
        let body = serde_json::to_string(&DecodeErrorReport { error: message })?;

        let response = self
            .agent
            .post(url)
            .header("Content-Type", "application/json")
            .send(body.as_str())
            .map_err(|source| ReportError::Transport {
                url: url.to_string(),
                source: Box::new(source),
            })?;

        let status = response.status().as_u16();
        if status == 200 {
            Ok(())
        } else {
            Err(ReportError::Status {
                url: url.to_string(),
                status,
            })
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}
