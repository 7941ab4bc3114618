//! Handler registries for CC and LCS errors.
//!
//! Both registries are exhaustive matches over [`ErrorKind`], so adding a
//! kind forces a decision about how each origin handles it.

use crate::errors::{ErrorCode, ErrorKind};
use serde::Serialize;
use std::fmt;

/// Background work some handlers attempt before serving the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Remediation {
    /// Download, validate, and apply the default configuration package
    DownloadConfig,
    /// Download the latest RSS feeds list file
    DownloadFeedsFile,
    /// Download an articles list file
    DownloadArticlesFile,
    /// Download the view bundle
    DownloadViews,
    /// Act on an error report received from the LCS
    HandleLcsReport,
    /// Show the freenet node status monitor
    ShowFreenetMonitor,
    /// Show the peer status monitor
    ShowPeerMonitor,
}

impl Remediation {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DownloadConfig => "download_config",
            Self::DownloadFeedsFile => "download_feeds_file",
            Self::DownloadArticlesFile => "download_articles_file",
            Self::DownloadViews => "download_views",
            Self::HandleLcsReport => "handle_lcs_report",
            Self::ShowFreenetMonitor => "show_freenet_monitor",
            Self::ShowPeerMonitor => "show_peer_monitor",
        }
    }
}

impl fmt::Display for Remediation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What to do with an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "handler", content = "remediation")]
pub enum Handler {
    /// Serve the standard error page.
    ServeError,
    /// Report the decode failure upstream, then serve the page.
    ReportDecodeError,
    /// Attempt a remediation, then serve the page regardless.
    RemediateThenServe(Remediation),
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServeError => f.write_str("serve_error"),
            Self::ReportDecodeError => f.write_str("report_decode_error"),
            Self::RemediateThenServe(action) => write!(f, "{action}_and_serve_error"),
        }
    }
}

/// Handler for errors the CC is responsible for.
pub const fn cc_handler(kind: ErrorKind) -> Option<Handler> {
    use Handler::*;
    use Remediation::*;

    match kind {
        ErrorKind::NoConfig => Some(RemediateThenServe(DownloadConfig)),
        ErrorKind::MalformedUrl => Some(ServeError),
        ErrorKind::MissingView => Some(RemediateThenServe(DownloadViews)),
        ErrorKind::NoFeedsFile => Some(RemediateThenServe(DownloadFeedsFile)),
        ErrorKind::NoArticlesFile => Some(RemediateThenServe(DownloadArticlesFile)),
        ErrorKind::CorruptJson => Some(ServeError),
        ErrorKind::MalformedStatusCheck => Some(ServeError),
        ErrorKind::NoConnectLcs => Some(ServeError),
        ErrorKind::MalformedLcsResponse => Some(ReportDecodeError),
        ErrorKind::FromLcs => Some(RemediateThenServe(HandleLcsReport)),
        ErrorKind::NoConnectRs => Some(ServeError),
        ErrorKind::LcsNotReady => Some(ServeError),
        ErrorKind::InvalidError => Some(ServeError),

        ErrorKind::LcsMalformedUrl
        | ErrorKind::LcsUrlDecode
        | ErrorKind::LcsWillNotServe
        | ErrorKind::LcsLookupFailure
        | ErrorKind::LcsInternal
        | ErrorKind::LcsWaitFreenet
        | ErrorKind::LcsWaitPeers => None,
    }
}

/// Handler for errors the LCS reports to the CC.
pub const fn lcs_handler(kind: ErrorKind) -> Option<Handler> {
    use Handler::*;
    use Remediation::*;

    match kind {
        ErrorKind::LcsMalformedUrl => Some(ServeError),
        ErrorKind::LcsUrlDecode => Some(ServeError),
        ErrorKind::LcsWillNotServe => Some(ServeError),
        ErrorKind::LcsLookupFailure => Some(ServeError),
        ErrorKind::LcsInternal => Some(ServeError),
        ErrorKind::LcsWaitFreenet => Some(RemediateThenServe(ShowFreenetMonitor)),
        ErrorKind::LcsWaitPeers => Some(RemediateThenServe(ShowPeerMonitor)),

        ErrorKind::InvalidError
        | ErrorKind::NoConfig
        | ErrorKind::MalformedUrl
        | ErrorKind::MissingView
        | ErrorKind::NoFeedsFile
        | ErrorKind::NoArticlesFile
        | ErrorKind::CorruptJson
        | ErrorKind::MalformedStatusCheck
        | ErrorKind::NoConnectLcs
        | ErrorKind::MalformedLcsResponse
        | ErrorKind::FromLcs
        | ErrorKind::NoConnectRs
        | ErrorKind::LcsNotReady => None,
    }
}

/// Look up a raw code in the CC registry.
pub const fn lookup_cc(code: ErrorCode) -> Option<Handler> {
    match code.kind() {
        Some(kind) => cc_handler(kind),
        None => None,
    }
}

/// Look up a raw code in the LCS registry.
pub const fn lookup_lcs(code: ErrorCode) -> Option<Handler> {
    match code.kind() {
        Some(kind) => lcs_handler(kind),
        None => None,
    }
}
