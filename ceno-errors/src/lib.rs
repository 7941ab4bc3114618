//! Error handling for the CENO client.
//!
//! When the client (CC) or the local cache server (LCS) cannot serve a
//! browsing request, this crate decides what kind of failure it is, picks a
//! handler, renders a localized error page, and for undecodable LCS
//! responses reports the failure upstream.
//!
//! - [`errors`]: code taxonomy, advice and auto-refresh tables
//! - [`dispatch`]: `handle_cc_error` / `handle_lcs_error` and the registries
//! - [`render`]: the error page and its plain-text fallback
//! - [`report`]: decode-error reports
//! - [`i18n`], [`template`], [`config`], [`logging`]: supporting pieces

pub mod config;
pub mod dispatch;
pub mod errors;
pub mod i18n;
pub mod logging;
pub mod render;
pub mod report;
pub mod template;

pub use config::ErrorPageConfig;
pub use dispatch::{ErrorDispatcher, ErrorState, Handler, Remediation, Remediator};
pub use errors::{ErrorCode, ErrorKind, ErrorOrigin, is_cache_server_error, is_client_error};
pub use render::{PageRenderer, PageResponse, RequestContext};
pub use report::Reporter;
