//! Best-effort remediation run before serving an error page.
//!
//! Fetching configuration, feeds, articles, or views belongs to other parts
//! of the client. They plug in through [`Remediator`]; whatever they do, the
//! dispatcher still serves the error page afterwards.

use super::registry::Remediation;
use super::state::ErrorState;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
#[error("{action} failed: {reason}")]
pub struct RemediationError {
    pub action: Remediation,
    pub reason: String,
}

impl RemediationError {
    pub fn new(action: Remediation, reason: impl Into<String>) -> Self {
        Self {
            action,
            reason: reason.into(),
        }
    }
}

/// Performs remediation actions on behalf of the dispatcher.
///
/// Implementations run synchronously on the request's thread and should
/// hand long work off to a background task of their own.
pub trait Remediator: Send + Sync {
    fn remediate(&self, action: Remediation, state: &ErrorState) -> Result<(), RemediationError>;
}

/// Remediator used when nothing is wired in: logs and succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeferredRemediator;

impl Remediator for DeferredRemediator {
    fn remediate(&self, action: Remediation, state: &ErrorState) -> Result<(), RemediationError> {
        debug!(
            action = %action,
            code = ?state.code.map(|c| c.value()),
            "No remediation wired, serving error page only"
        );
        Ok(())
    }
}
