//! Error Catalog for the CENO client
//!
//! Every failure the client can show to a user is identified by a numeric
//! code. The leading digit of `code / 1000` says where the failure came from:
//!
//! | Range | Origin        | Description                                  |
//! |-------|---------------|----------------------------------------------|
//! | 1xxx  | Client        | Raised inside the CC (config, views, files)  |
//! | 2xxx  | Cache server  | Reported to the CC by the LCS                |
//! | other | Unclassified  | Only `ERR_INVALID_ERROR` (100) lives here    |
//!
//! The numbers are a wire contract with the frontend and must never change.
//! Classification is done on the number alone, so [`ErrorCode::origin`] works
//! for codes that have no [`ErrorKind`].
//!
//! # Example
//!
//! ```rust
//! use ceno_errors::errors::catalog::{ErrorCode, ErrorKind};
//!
//! let code = ErrorCode::new(2301);
//! assert!(code.is_cache_server_error());
//! assert_eq!(code.kind(), Some(ErrorKind::LcsWaitPeers));
//! assert!(code.should_refresh());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Address users can write to when a page asks them to contact the developers.
pub const CONTACT_INFO: &str = "ceno@equalit.ie";

/// A raw error code as it travels between the LCS, the CC, and the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorCode(u32);

impl ErrorCode {
    /// Wrap a raw code number.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw code number.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// True when the code is of the form 1xxx.
    #[must_use]
    pub const fn is_client_error(self) -> bool {
        self.0 / 1000 == 1
    }

    /// True when the code is of the form 2xxx.
    #[must_use]
    pub const fn is_cache_server_error(self) -> bool {
        self.0 / 1000 == 2
    }

    /// Origin derived from the numeric range only.
    #[must_use]
    pub const fn origin(self) -> ErrorOrigin {
        match self.0 / 1000 {
            1 => ErrorOrigin::Client,
            2 => ErrorOrigin::CacheServer,
            _ => ErrorOrigin::Unclassified,
        }
    }

    /// The known kind for this code, if any.
    #[must_use]
    pub const fn kind(self) -> Option<ErrorKind> {
        ErrorKind::from_code(self)
    }

    /// Localization key of the advice shown for this code.
    ///
    /// `None` means the code is not in the advice table at all. `Some("")`
    /// means the code is known but has no canned advice.
    #[must_use]
    pub const fn advice_key(self) -> Option<&'static str> {
        match self.kind() {
            Some(kind) => Some(kind.advice_key()),
            None => None,
        }
    }

    /// Whether the error page for this code reloads itself. Unknown codes never do.
    #[must_use]
    pub const fn should_refresh(self) -> bool {
        match self.kind() {
            Some(kind) => kind.auto_refresh(),
            None => false,
        }
    }
}

impl From<u32> for ErrorCode {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<ErrorKind> for ErrorCode {
    fn from(kind: ErrorKind) -> Self {
        kind.code()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// True iff `code / 1000 == 1`.
#[must_use]
pub const fn is_client_error(code: ErrorCode) -> bool {
    code.is_client_error()
}

/// True iff `code / 1000 == 2`.
#[must_use]
pub const fn is_cache_server_error(code: ErrorCode) -> bool {
    code.is_cache_server_error()
}

/// Every error the CC knows how to explain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// A code nobody recognized was asked to be handled
    InvalidError,

    // =========================================================================
    // CC errors (1100-1106)
    // =========================================================================
    /// No configuration file could be found
    NoConfig,
    /// The requested URL could not be parsed
    MalformedUrl,
    /// A view template is missing
    MissingView,
    /// The RSS feeds list file is missing
    NoFeedsFile,
    /// An articles list file is missing
    NoArticlesFile,
    /// A JSON file could not be decoded
    CorruptJson,
    /// A status check request was malformed
    MalformedStatusCheck,

    // =========================================================================
    // CC errors talking to other agents (1200-1204)
    // =========================================================================
    /// The LCS could not be reached
    NoConnectLcs,
    /// The LCS answered with something the CC could not decode
    MalformedLcsResponse,
    /// The LCS answered with an error of its own
    FromLcs,
    /// The RS could not be reached
    NoConnectRs,
    /// The LCS is still starting up
    LcsNotReady,

    // =========================================================================
    // LCS errors (2110-2140)
    // =========================================================================
    /// The LCS rejected the URL as malformed
    LcsMalformedUrl,
    /// The LCS could not decode the URL
    LcsUrlDecode,
    /// The LCS refuses to serve the URL
    LcsWillNotServe,
    /// The LCS lookup failed
    LcsLookupFailure,
    /// The LCS hit an internal error
    LcsInternal,

    // =========================================================================
    // LCS waiting states (2300-2301)
    // =========================================================================
    /// The LCS is waiting for the freenet node
    LcsWaitFreenet,
    /// The LCS is waiting for peers
    LcsWaitPeers,
}

impl ErrorKind {
    /// Returns the wire code for this kind.
    #[must_use]
    pub const fn code_number(&self) -> u32 {
        match self {
            Self::InvalidError => 100,

            Self::NoConfig => 1100,
            Self::MalformedUrl => 1101,
            Self::MissingView => 1102,
            Self::NoFeedsFile => 1103,
            Self::NoArticlesFile => 1104,
            Self::CorruptJson => 1105,
            Self::MalformedStatusCheck => 1106,

            Self::NoConnectLcs => 1200,
            Self::MalformedLcsResponse => 1201,
            Self::FromLcs => 1202,
            Self::NoConnectRs => 1203,
            Self::LcsNotReady => 1204,

            Self::LcsMalformedUrl => 2110,
            Self::LcsUrlDecode => 2112,
            Self::LcsWillNotServe => 2120,
            Self::LcsLookupFailure => 2130,
            Self::LcsInternal => 2140,

            Self::LcsWaitFreenet => 2300,
            Self::LcsWaitPeers => 2301,
        }
    }

    /// Returns the wire code wrapped as an [`ErrorCode`].
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode(self.code_number())
    }

    /// Inverse of [`ErrorKind::code_number`].
    #[must_use]
    pub const fn from_code(code: ErrorCode) -> Option<Self> {
        let kind = match code.0 {
            100 => Self::InvalidError,

            1100 => Self::NoConfig,
            1101 => Self::MalformedUrl,
            1102 => Self::MissingView,
            1103 => Self::NoFeedsFile,
            1104 => Self::NoArticlesFile,
            1105 => Self::CorruptJson,
            1106 => Self::MalformedStatusCheck,

            1200 => Self::NoConnectLcs,
            1201 => Self::MalformedLcsResponse,
            1202 => Self::FromLcs,
            1203 => Self::NoConnectRs,
            1204 => Self::LcsNotReady,

            2110 => Self::LcsMalformedUrl,
            2112 => Self::LcsUrlDecode,
            2120 => Self::LcsWillNotServe,
            2130 => Self::LcsLookupFailure,
            2140 => Self::LcsInternal,

            2300 => Self::LcsWaitFreenet,
            2301 => Self::LcsWaitPeers,

            _ => return None,
        };
        Some(kind)
    }

    /// Origin of this kind, derived from its number.
    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        self.code().origin()
    }

    /// The constant name used for this code across CENO components.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::InvalidError => "ERR_INVALID_ERROR",
            Self::NoConfig => "ERR_NO_CONFIG",
            Self::MalformedUrl => "ERR_MALFORMED_URL",
            Self::MissingView => "ERR_MISSING_VIEW",
            Self::NoFeedsFile => "ERR_NO_FEEDS_FILE",
            Self::NoArticlesFile => "ERR_NO_ARTICLES_FILE",
            Self::CorruptJson => "ERR_CORRUPT_JSON",
            Self::MalformedStatusCheck => "ERR_MALFORMED_STATUS_CHECK",
            Self::NoConnectLcs => "ERR_NO_CONNECT_LCS",
            Self::MalformedLcsResponse => "ERR_MALFORMED_LCS_RESPONSE",
            Self::FromLcs => "ERR_FROM_LCS",
            Self::NoConnectRs => "ERR_NO_CONNECT_RS",
            Self::LcsNotReady => "ERR_LCS_NOT_READY",
            Self::LcsMalformedUrl => "ERR_LCS_MALFORMED_URL",
            Self::LcsUrlDecode => "ERR_LCS_URL_DECODE",
            Self::LcsWillNotServe => "ERR_LCS_WILL_NOT_SERVE",
            Self::LcsLookupFailure => "ERR_LCS_LOOKUP_FAILURE",
            Self::LcsInternal => "ERR_LCS_INTERNAL",
            Self::LcsWaitFreenet => "ERR_LCS_WAIT_FREENET",
            Self::LcsWaitPeers => "ERR_LCS_WAIT_PEERS",
        }
    }

    /// Short English description, used in logs and the operator CLI.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidError => "Unrecognized error code",
            Self::NoConfig => "Configuration file is missing",
            Self::MalformedUrl => "Requested URL is malformed",
            Self::MissingView => "View template is missing",
            Self::NoFeedsFile => "Feeds list file is missing",
            Self::NoArticlesFile => "Articles list file is missing",
            Self::CorruptJson => "JSON file is corrupt",
            Self::MalformedStatusCheck => "Status check request is malformed",
            Self::NoConnectLcs => "Could not connect to the LCS",
            Self::MalformedLcsResponse => "LCS response could not be decoded",
            Self::FromLcs => "LCS reported an error",
            Self::NoConnectRs => "Could not connect to the RS",
            Self::LcsNotReady => "LCS is not ready yet",
            Self::LcsMalformedUrl => "LCS rejected a malformed URL",
            Self::LcsUrlDecode => "LCS could not decode the URL",
            Self::LcsWillNotServe => "LCS will not serve the URL",
            Self::LcsLookupFailure => "LCS lookup failed",
            Self::LcsInternal => "LCS internal error",
            Self::LcsWaitFreenet => "LCS is waiting for the freenet node",
            Self::LcsWaitPeers => "LCS is waiting for peers",
        }
    }

    /// Localization key of the advice shown under the error.
    ///
    /// The empty string means "no canned advice".
    #[must_use]
    pub const fn advice_key(&self) -> &'static str {
        match self {
            Self::InvalidError => "contact_devs_err",
            Self::NoConfig => "missing_config_err",
            Self::MalformedUrl => "malformed_url_err",
            Self::MissingView => "download_package_err",
            Self::NoFeedsFile => "no_feeds_file_err",
            Self::NoArticlesFile => "no_articles_advice",
            Self::CorruptJson => "corrupt_json_err",
            Self::MalformedStatusCheck => "contact_devs_err",
            Self::NoConnectLcs => "agent_communication_err",
            Self::MalformedLcsResponse => "contact_devs_err",
            Self::FromLcs => "",
            Self::NoConnectRs => "agent_communication_err",
            Self::LcsNotReady => "lcs_not_ready_err",
            Self::LcsMalformedUrl | Self::LcsUrlDecode | Self::LcsWillNotServe => {
                "malformed_url_err"
            }
            Self::LcsLookupFailure
            | Self::LcsInternal
            | Self::LcsWaitFreenet
            | Self::LcsWaitPeers => "lcs_lookup_failure_err",
        }
    }

    /// Some errors resolve themselves over time, so their page reloads
    /// itself the same way the wait page does.
    #[must_use]
    pub const fn auto_refresh(&self) -> bool {
        matches!(
            self,
            Self::NoFeedsFile
                | Self::NoArticlesFile
                | Self::NoConnectLcs
                | Self::MalformedLcsResponse
                | Self::FromLcs
                | Self::NoConnectRs
                | Self::LcsLookupFailure
                | Self::LcsInternal
                | Self::LcsWaitFreenet
                | Self::LcsWaitPeers
        )
    }

    /// Returns all known kinds.
    #[must_use]
    pub const fn all() -> &'static [ErrorKind] {
        &[
            Self::InvalidError,
            // CC
            Self::NoConfig,
            Self::MalformedUrl,
            Self::MissingView,
            Self::NoFeedsFile,
            Self::NoArticlesFile,
            Self::CorruptJson,
            Self::MalformedStatusCheck,
            Self::NoConnectLcs,
            Self::MalformedLcsResponse,
            Self::FromLcs,
            Self::NoConnectRs,
            Self::LcsNotReady,
            // LCS
            Self::LcsMalformedUrl,
            Self::LcsUrlDecode,
            Self::LcsWillNotServe,
            Self::LcsLookupFailure,
            Self::LcsInternal,
            Self::LcsWaitFreenet,
            Self::LcsWaitPeers,
        ]
    }

    /// Full entry with all metadata.
    #[must_use]
    pub fn entry(&self) -> ErrorEntry {
        ErrorEntry {
            code: self.code(),
            symbol: self.symbol().to_string(),
            origin: self.origin(),
            description: self.description().to_string(),
            advice_key: self.advice_key().to_string(),
            auto_refresh: self.auto_refresh(),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.symbol(), self.code_number(), self.description())
    }
}

/// Where an error came from, derived from its code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorOrigin {
    /// Raised inside the CC (1xxx)
    Client,
    /// Reported by the LCS (2xxx)
    CacheServer,
    /// Outside both ranges
    Unclassified,
}

impl ErrorOrigin {
    /// Returns a human-readable name for the origin.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Client => "CC",
            Self::CacheServer => "LCS",
            Self::Unclassified => "Unclassified",
        }
    }
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Complete catalog entry for one known code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Wire code
    pub code: ErrorCode,
    /// Constant name (e.g. "ERR_NO_CONFIG")
    pub symbol: String,
    /// Origin of the error
    pub origin: ErrorOrigin,
    /// English description
    pub description: String,
    /// Advice localization key, empty when there is none
    pub advice_key: String,
    /// Whether the page reloads itself
    pub auto_refresh: bool,
}

impl ErrorEntry {
    /// Formats the entry as a single line.
    #[must_use]
    pub fn format_brief(&self) -> String {
        format!("[{}] {} {}", self.code, self.symbol, self.description)
    }
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_brief())
    }
}
