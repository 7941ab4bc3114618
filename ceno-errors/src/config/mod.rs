//! Configuration for error pages and failure reports.
//!
//! All settings come from the process environment:
//!
//! | Variable                   | Default   | Meaning                           |
//! |----------------------------|-----------|-----------------------------------|
//! | `CENOLANG`                 | `en-us`   | UI language tag                   |
//! | `CENO_VIEWS_DIR`           | `./views` | Directory holding `error.html`    |
//! | `CENO_LOCALES_DIR`         | unset     | Extra `<tag>.all.json` catalogs   |
//! | `CENO_REPORT_TIMEOUT_SECS` | `10`      | Timeout for failure report POSTs  |

pub mod env;
pub mod source;

pub use env::{EnvError, EnvParser};
pub use source::{ConfigSource, Sourced};

use std::path::PathBuf;
use std::time::Duration;

/// Locale used when `CENOLANG` is unset or not available.
pub const DEFAULT_LOCALE: &str = "en-us";

pub const LANG_VAR: &str = "CENOLANG";
pub const VIEWS_DIR_VAR: &str = "CENO_VIEWS_DIR";
pub const LOCALES_DIR_VAR: &str = "CENO_LOCALES_DIR";
pub const REPORT_TIMEOUT_VAR: &str = "CENO_REPORT_TIMEOUT_SECS";

const DEFAULT_VIEWS_DIR: &str = "./views";
const DEFAULT_REPORT_TIMEOUT_SECS: u64 = 10;
const MAX_REPORT_TIMEOUT_SECS: u64 = 300;

/// Settings shared by the renderer and the reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPageConfig {
    /// Requested UI language, already normalized.
    pub lang: String,
    /// Directory the error view is loaded from on every render.
    pub views_dir: PathBuf,
    /// Optional directory of translation files layered over the built-in ones.
    pub locales_dir: Option<PathBuf>,
    /// Upper bound on a failure report round trip.
    pub report_timeout: Duration,
}

impl Default for ErrorPageConfig {
    fn default() -> Self {
        Self {
            lang: DEFAULT_LOCALE.to_string(),
            views_dir: PathBuf::from(DEFAULT_VIEWS_DIR),
            locales_dir: None,
            report_timeout: Duration::from_secs(DEFAULT_REPORT_TIMEOUT_SECS),
        }
    }
}

impl ErrorPageConfig {
    /// Read the configuration from the environment.
    ///
    /// Invalid values fall back to their defaults; the problems are returned
    /// so the caller can warn about them.
    pub fn from_env() -> (Self, Vec<EnvError>) {
        let mut parser = EnvParser::new();

        let lang = parser.get_locale(LANG_VAR, DEFAULT_LOCALE);
        let views_dir = parser.get_path(VIEWS_DIR_VAR, DEFAULT_VIEWS_DIR);
        let locales_dir = parser.get_optional_path(LOCALES_DIR_VAR);
        let timeout = parser.get_u64_range(
            REPORT_TIMEOUT_VAR,
            DEFAULT_REPORT_TIMEOUT_SECS,
            1,
            MAX_REPORT_TIMEOUT_SECS,
        );

        tracing::debug!(
            lang = %lang.value,
            lang_source = %lang.source,
            views_dir = %views_dir.value.display(),
            report_timeout_secs = timeout.value,
            "Loaded error page configuration"
        );

        let config = Self {
            lang: lang.into_value(),
            views_dir: views_dir.into_value(),
            locales_dir: locales_dir.into_value(),
            report_timeout: Duration::from_secs(timeout.value),
        };
        (config, parser.take_errors())
    }

    pub fn with_lang(mut self, lang: &str) -> Self {
        self.lang = env::normalize_locale(lang);
        self
    }

    pub fn with_views_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.views_dir = dir.into();
        self
    }

    pub fn with_locales_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.locales_dir = Some(dir.into());
        self
    }

    pub fn with_report_timeout(mut self, timeout: Duration) -> Self {
        self.report_timeout = timeout;
        self
    }
}

#[cfg(test)]
pub(crate) fn env_test_lock() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
