//! Localized error pages.
//!
//! The view is read from `<views_dir>/error.html` on every render so that a
//! view restored while the client is running is picked up immediately. When
//! the view cannot be loaded the user still gets a plain-text explanation.

pub mod response;

pub use response::{CONTENT_TYPE_HTML, CONTENT_TYPE_TEXT, PageResponse, RequestContext};

use crate::config::ErrorPageConfig;
use crate::errors::{CONTACT_INFO, ErrorCode, ErrorKind};
use crate::i18n::{Catalog, Translator};
use crate::template::{Escape, Template, TemplateError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// File name of the error view inside the views directory.
pub const ERROR_VIEW: &str = "error.html";

/// Why the error view could not be used.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read view {path}: {source}")]
    ViewRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse view {path}: {source}")]
    ViewParse {
        path: PathBuf,
        #[source]
        source: TemplateError,
    },
}

/// How a render ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The HTML error page was written.
    Page,
    /// The view was unusable; a plain-text notice was written instead.
    Degraded,
}

/// Renders error pages in the configured language.
#[derive(Debug, Clone)]
pub struct PageRenderer {
    lang: String,
    views_dir: PathBuf,
    catalog: Catalog,
}

impl PageRenderer {
    pub fn new(config: &ErrorPageConfig, catalog: Catalog) -> Self {
        Self {
            lang: config.lang.clone(),
            views_dir: config.views_dir.clone(),
            catalog,
        }
    }

    /// Translator for the active locale.
    pub fn translator(&self) -> Translator<'_> {
        self.catalog.translator(&self.lang)
    }

    pub fn view_path(&self) -> PathBuf {
        self.views_dir.join(ERROR_VIEW)
    }

    /// Write the error page for `code` into `response`.
    ///
    /// A code without an advice entry is shown as `ERR_INVALID_ERROR` with a
    /// message naming the requested code.
    pub fn execute_error_page(
        &self,
        code: ErrorCode,
        message: &str,
        response: &mut PageResponse,
        request: &RequestContext,
    ) -> RenderOutcome {
        self.render(code, message, response, request, false)
    }

    fn render(
        &self,
        code: ErrorCode,
        message: &str,
        response: &mut PageResponse,
        request: &RequestContext,
        redirected: bool,
    ) -> RenderOutcome {
        let t = self.translator();

        let advice_key = match code.advice_key() {
            Some(key) => key,
            None if !redirected => {
                warn!(code = %code, "Unrecognized error code, rendering invalid error page");
                let message =
                    t.t_with("unrecognized_error_code", &[("ErrCode", code.to_string())]);
                return self.render(
                    ErrorKind::InvalidError.code(),
                    &message,
                    response,
                    request,
                    true,
                );
            }
            // Only reachable if the fallback code itself lost its entry.
            None => {
                warn!(code = %code, "Fallback code has no advice entry");
                ""
            }
        };

        let view = match load_view(&self.view_path()) {
            Ok(view) => view,
            Err(err) => {
                warn!(code = %code, error = %err, "Error view unavailable, serving plain text");
                let body = t.t_with("missing_view", &[("View", ERROR_VIEW.to_string())]);
                response.respond(CONTENT_TYPE_TEXT, body);
                return RenderOutcome::Degraded;
            }
        };

        let values: HashMap<&str, String> = HashMap::from([
            ("Url", request.url().to_string()),
            ("Error", message.to_string()),
            ("ShouldRefresh", code.should_refresh().to_string()),
            (
                "Advice",
                t.t_with(advice_key, &[("Contact", CONTACT_INFO.to_string())]),
            ),
            ("NoBundlePrepared", t.t("no_bundle_prepared_html")),
            ("YouAskedFor", t.t("you_asked_for_html")),
            ("ErrorWeGot", t.t("error_we_got_html")),
            ("WhatYouCanDo", t.t("what_you_can_do_html")),
            ("Retry", t.t("retry_html")),
            ("Report", t.t("report_html")),
            ("Contact", CONTACT_INFO.to_string()),
        ]);

        debug!(code = %code, locale = t.locale(), "Rendering error page");
        response.respond(CONTENT_TYPE_HTML, view.render(&values, Escape::Html));
        RenderOutcome::Page
    }
}

fn load_view(path: &Path) -> Result<Template, RenderError> {
    let source = std::fs::read_to_string(path).map_err(|source| RenderError::ViewRead {
        path: path.to_path_buf(),
        source,
    })?;
    Template::parse(&source).map_err(|source| RenderError::ViewParse {
        path: path.to_path_buf(),
        source,
    })
}
