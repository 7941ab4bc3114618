//! Per-request error state.

use crate::errors::ErrorCode;
use crate::render::{PageResponse, RequestContext};

/// Everything a handler needs to deal with one failed request.
///
/// Created by the request layer when a request fails and dropped once the
/// response has been sent. The dispatcher fills `code` and `message` only
/// when they are still unset, so values supplied by the caller win.
#[derive(Debug, Clone, Default)]
pub struct ErrorState {
    pub request: RequestContext,
    pub response: PageResponse,
    pub code: Option<ErrorCode>,
    pub message: Option<String>,
    /// Where a failure report is sent, for handlers that report.
    pub report_url: Option<String>,
}

impl ErrorState {
    pub fn new(request: RequestContext) -> Self {
        Self {
            request,
            ..Self::default()
        }
    }

    pub fn with_code(mut self, code: impl Into<ErrorCode>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_report_url(mut self, url: impl Into<String>) -> Self {
        self.report_url = Some(url.into());
        self
    }

    /// Set code and message unless they are already present.
    pub fn enrich(&mut self, code: ErrorCode, message: &str) {
        if self.code.is_none() {
            self.code = Some(code);
        }
        if self.message.is_none() {
            self.message = Some(message.to_string());
        }
    }

    pub fn into_page(self) -> PageResponse {
        self.response
    }
}
