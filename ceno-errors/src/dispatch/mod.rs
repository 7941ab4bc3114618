//! Entry points the request layer calls when a request fails.
//!
//! ```ignore
//! let (config, _warnings) = ErrorPageConfig::from_env();
//! let dispatcher = ErrorDispatcher::from_config(&config);
//!
//! let mut state = ErrorState::new(RequestContext::from_request(&request));
//! dispatcher.handle_cc_error(ErrorKind::MalformedUrl.code(), "bad scheme", &mut state);
//! return state.into_page().into_response();
//! ```
//!
//! Handling is synchronous: reading the view and sending a report block the
//! calling thread. Async callers should run dispatch on a blocking task.

pub mod registry;
pub mod remediation;
pub mod state;

pub use registry::{Handler, Remediation, cc_handler, lcs_handler, lookup_cc, lookup_lcs};
pub use remediation::{DeferredRemediator, RemediationError, Remediator};
pub use state::ErrorState;

use crate::config::ErrorPageConfig;
use crate::errors::{ErrorCode, ErrorKind};
use crate::i18n::Catalog;
use crate::render::PageRenderer;
use crate::report::Reporter;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Which registry a code is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Registry {
    Cc,
    Lcs,
}

impl Registry {
    fn lookup(self, code: ErrorCode) -> Option<Handler> {
        match self {
            Self::Cc => lookup_cc(code),
            Self::Lcs => lookup_lcs(code),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Cc => "cc",
            Self::Lcs => "lcs",
        }
    }
}

/// Classifies failures and answers them. Immutable and shareable across threads.
#[derive(Clone)]
pub struct ErrorDispatcher {
    renderer: PageRenderer,
    reporter: Reporter,
    remediator: Arc<dyn Remediator>,
}

impl fmt::Debug for ErrorDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorDispatcher")
            .field("renderer", &self.renderer)
            .field("reporter", &self.reporter)
            .finish_non_exhaustive()
    }
}

impl ErrorDispatcher {
    pub fn new(renderer: PageRenderer, reporter: Reporter) -> Self {
        Self {
            renderer,
            reporter,
            remediator: Arc::new(DeferredRemediator),
        }
    }

    /// Build renderer, catalog, and reporter from configuration.
    pub fn from_config(config: &ErrorPageConfig) -> Self {
        let catalog = Catalog::load(config.locales_dir.as_deref());
        Self::new(
            PageRenderer::new(config, catalog),
            Reporter::new(config.report_timeout),
        )
    }

    pub fn with_remediator(mut self, remediator: Arc<dyn Remediator>) -> Self {
        self.remediator = remediator;
        self
    }

    pub fn renderer(&self) -> &PageRenderer {
        &self.renderer
    }

    /// Handle an error raised inside the CC. Terminates the request.
    ///
    /// Returns true if the page was served and any background work succeeded.
    pub fn handle_cc_error(&self, code: ErrorCode, message: &str, state: &mut ErrorState) -> bool {
        self.dispatch(Registry::Cc, code, message, state)
    }

    /// Handle an error reported by the LCS. Terminates the request.
    pub fn handle_lcs_error(&self, code: ErrorCode, message: &str, state: &mut ErrorState) -> bool {
        self.dispatch(Registry::Lcs, code, message, state)
    }

    fn dispatch(
        &self,
        registry: Registry,
        code: ErrorCode,
        message: &str,
        state: &mut ErrorState,
    ) -> bool {
        state.enrich(code, message);

        match registry.lookup(code) {
            Some(handler) => {
                debug!(
                    registry = registry.name(),
                    code = %code,
                    handler = %handler,
                    "Dispatching error"
                );
                self.run(handler, state)
            }
            None => {
                warn!(
                    registry = registry.name(),
                    code = %code,
                    "No handler registered, serving invalid error page"
                );
                self.serve_unrecognized(code, state)
            }
        }
    }

    fn run(&self, handler: Handler, state: &mut ErrorState) -> bool {
        match handler {
            Handler::ServeError => self.serve_error(state),
            Handler::ReportDecodeError => {
                let reported = self.report_decode_error(state);
                self.serve_error(state);
                reported
            }
            Handler::RemediateThenServe(action) => {
                let remediated = match self.remediator.remediate(action, state) {
                    Ok(()) => true,
                    Err(err) => {
                        warn!(error = %err, "Remediation failed");
                        false
                    }
                };
                self.serve_error(state) && remediated
            }
        }
    }

    /// Serve the standard error page from the state's code and message.
    pub fn serve_error(&self, state: &mut ErrorState) -> bool {
        let code = state.code.unwrap_or(ErrorKind::InvalidError.code());
        let message = state.message.clone().unwrap_or_default();
        self.renderer
            .execute_error_page(code, &message, &mut state.response, &state.request);
        true
    }

    /// Report that the LCS response could not be decoded.
    ///
    /// Uses the state's message and report URL. True iff the endpoint
    /// answered 200.
    pub fn report_decode_error(&self, state: &ErrorState) -> bool {
        let message = state.message.as_deref().unwrap_or_default();
        self.reporter
            .report_decode_error(state.report_url.as_deref(), message)
    }

    fn serve_unrecognized(&self, code: ErrorCode, state: &mut ErrorState) -> bool {
        let message = self
            .renderer
            .translator()
            .t_with("unrecognized_error_code", &[("ErrCode", code.to_string())]);
        self.renderer.execute_error_page(
            ErrorKind::InvalidError.code(),
            &message,
            &mut state.response,
            &state.request,
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env_test_lock;
    use crate::render::{CONTENT_TYPE_HTML, ERROR_VIEW, RequestContext};
    use std::fs;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    const VIEW: &str = "url={{.Url}}|error={{.Error}}|refresh={{.ShouldRefresh}}|advice={{.Advice}}";

    #[derive(Default)]
    struct RecordingRemediator {
        calls: Mutex<Vec<Remediation>>,
        fail: bool,
    }

    impl Remediator for RecordingRemediator {
        fn remediate(
            &self,
            action: Remediation,
            _state: &ErrorState,
        ) -> Result<(), RemediationError> {
            self.calls.lock().unwrap().push(action);
            if self.fail {
                Err(RemediationError::new(action, "mirror unreachable"))
            } else {
                Ok(())
            }
        }
    }

    fn dispatcher() -> (TempDir, ErrorDispatcher) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(ERROR_VIEW), VIEW).unwrap();
        let config = ErrorPageConfig::default()
            .with_views_dir(dir.path())
            .with_report_timeout(Duration::from_secs(1));
        // ureq reads proxy settings from the environment when the agent is built.
        let _env = env_test_lock();
        (dir, ErrorDispatcher::from_config(&config))
    }

    fn state() -> ErrorState {
        ErrorState::new(RequestContext::new("http://example.com/a".parse().unwrap()))
    }

    #[test]
    fn test_cc_error_serves_page() {
        let (_dir, dispatcher) = dispatcher();
        let mut state = state();

        assert!(dispatcher.handle_cc_error(ErrorCode::new(1101), "bad scheme", &mut state));
        assert_eq!(state.response.content_type(), Some(CONTENT_TYPE_HTML));
        assert!(state.response.body().contains("error=bad scheme"));
        assert!(state.response.body().contains("refresh=false"));
    }

    #[test]
    fn test_preset_code_and_message_survive() {
        let (_dir, dispatcher) = dispatcher();
        let mut state = state()
            .with_code(ErrorKind::NoFeedsFile)
            .with_message("feeds.json not found");

        assert!(dispatcher.handle_cc_error(ErrorCode::new(1105), "corrupt", &mut state));
        assert_eq!(state.code, Some(ErrorKind::NoFeedsFile.code()));
        assert_eq!(state.message.as_deref(), Some("feeds.json not found"));
        // The page reflects the caller's code, not the dispatch code
        assert!(state.response.body().contains("refresh=true"));
        assert!(state.response.body().contains("error=feeds.json not found"));
    }

    #[test]
    fn test_unregistered_code_falls_back() {
        let (_dir, dispatcher) = dispatcher();

        let mut unknown = state();
        assert!(dispatcher.handle_cc_error(ErrorCode::new(9999), "mystery", &mut unknown));
        assert!(
            unknown
                .response
                .body()
                .contains("error=Encountered an unrecognized error code: 9999")
        );
        assert_eq!(unknown.code, Some(ErrorCode::new(9999)));

        // Known code, wrong origin
        let mut crossed = state();
        assert!(dispatcher.handle_lcs_error(ErrorCode::new(1101), "bad scheme", &mut crossed));
        assert!(crossed.response.body().contains("1101"));
        assert!(crossed.response.body().contains("refresh=false"));
    }

    #[test]
    fn test_remediation_runs_before_page() {
        let (_dir, dispatcher) = dispatcher();
        let remediator = Arc::new(RecordingRemediator::default());
        let dispatcher = dispatcher.with_remediator(remediator.clone());

        let mut state = state();
        assert!(dispatcher.handle_lcs_error(ErrorCode::new(2301), "no peers", &mut state));
        assert_eq!(
            *remediator.calls.lock().unwrap(),
            vec![Remediation::ShowPeerMonitor]
        );
        assert!(state.response.body().contains("refresh=true"));
    }

    #[test]
    fn test_failed_remediation_still_serves() {
        let (_dir, dispatcher) = dispatcher();
        let remediator = Arc::new(RecordingRemediator {
            fail: true,
            ..Default::default()
        });
        let dispatcher = dispatcher.with_remediator(remediator.clone());

        let mut state = state();
        assert!(!dispatcher.handle_cc_error(ErrorCode::new(1100), "no config", &mut state));
        assert!(state.response.is_written());
        assert!(state.response.body().contains("error=no config"));
        assert_eq!(
            *remediator.calls.lock().unwrap(),
            vec![Remediation::DownloadConfig]
        );
    }

    #[test]
    fn test_report_without_url_still_serves() {
        let (_dir, dispatcher) = dispatcher();
        let mut state = state();

        assert!(!dispatcher.handle_cc_error(ErrorCode::new(1201), "bad json", &mut state));
        assert!(state.response.body().contains("error=bad json"));
    }

    #[test]
    fn test_serve_error_without_code_uses_invalid_error() {
        let (_dir, dispatcher) = dispatcher();
        let mut state = state();

        assert!(dispatcher.serve_error(&mut state));
        assert!(state.response.body().contains("error=|"));
        assert!(
            state
                .response
                .body()
                .contains("advice=Something went wrong that we did not expect.")
        );
    }

    #[test]
    fn test_dispatcher_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ErrorDispatcher>();
    }
}
