//! Localized strings for error pages.
//!
//! Translation files use the go-i18n layout shared with the rest of CENO:
//! `<tag>.all.json` holding a JSON array of `{"id", "translation"}` objects.
//! The built-in catalogs are compiled in; a locale directory can add new
//! locales or override individual strings.

use crate::config::DEFAULT_LOCALE;
use crate::config::env::normalize_locale;
use crate::template::{Escape, Template};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

const TRANSLATION_SUFFIX: &str = ".all.json";

const BUILTIN_LOCALES: &[(&str, &str)] = &[
    ("en-us", include_str!("../locales/en-us.all.json")),
    ("fr-fr", include_str!("../locales/fr-fr.all.json")),
];

/// Errors loading a translation file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read translations from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse translations from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("translation file name {0} does not end in {TRANSLATION_SUFFIX}")]
    BadFileName(PathBuf),
}

#[derive(Debug, Deserialize)]
struct TranslationEntry {
    id: String,
    translation: TranslationText,
}

/// go-i18n allows either a plain string or a map of plural forms.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TranslationText {
    Plain(String),
    Plural(HashMap<String, String>),
}

impl TranslationText {
    fn into_text(self) -> Option<String> {
        match self {
            Self::Plain(text) => Some(text),
            Self::Plural(mut forms) => forms.remove("other").or_else(|| forms.remove("one")),
        }
    }
}

type Messages = HashMap<String, Template>;

/// All loaded locales. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    locales: HashMap<String, Messages>,
}

impl Catalog {
    /// The compiled-in translations.
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        for &(tag, source) in BUILTIN_LOCALES {
            // Built-in files are checked by tests; a bad one is skipped, not fatal.
            if let Err(err) = catalog.merge_json(tag, source, Path::new(tag)) {
                warn!(locale = tag, error = %err, "Skipping built-in translations");
            }
        }
        catalog
    }

    /// Built-in translations overlaid with every `*.all.json` in `dir`.
    ///
    /// Unreadable or malformed files are logged and skipped.
    pub fn load(dir: Option<&Path>) -> Self {
        let mut catalog = Self::builtin();
        let Some(dir) = dir else {
            return catalog;
        };

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "Cannot read locales directory");
                return catalog;
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.ends_with(TRANSLATION_SUFFIX))
            })
            .collect();
        paths.sort();

        for path in paths {
            match catalog.load_file(&path) {
                Ok((tag, count)) => {
                    debug!(locale = %tag, count, path = %path.display(), "Loaded translations")
                }
                Err(err) => warn!(error = %err, "Skipping translation file"),
            }
        }
        catalog
    }

    /// Merge one translation file; the locale comes from the file name.
    pub fn load_file(&mut self, path: &Path) -> Result<(String, usize), CatalogError> {
        let tag = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_suffix(TRANSLATION_SUFFIX))
            .map(normalize_locale)
            .ok_or_else(|| CatalogError::BadFileName(path.to_path_buf()))?;

        let source = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let count = self.merge_json(&tag, &source, path)?;
        Ok((tag, count))
    }

    fn merge_json(&mut self, tag: &str, source: &str, path: &Path) -> Result<usize, CatalogError> {
        let entries: Vec<TranslationEntry> =
            serde_json::from_str(source).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let messages = self.locales.entry(tag.to_string()).or_default();
        let mut count = 0;
        for entry in entries {
            let Some(text) = entry.translation.into_text() else {
                continue;
            };
            let template = Template::parse(&text).unwrap_or_else(|err| {
                warn!(locale = tag, id = %entry.id, error = %err, "Translation kept verbatim");
                Template::literal(&text)
            });
            messages.insert(entry.id, template);
            count += 1;
        }
        Ok(count)
    }

    /// True when at least one string is available for `tag`.
    pub fn has_locale(&self, tag: &str) -> bool {
        self.locales.contains_key(&normalize_locale(tag))
    }

    /// Sorted list of loaded locales.
    pub fn locales(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.locales.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// A translator for `lang`, or for the default locale if `lang` is not loaded.
    pub fn translator(&self, lang: &str) -> Translator<'_> {
        let tag = normalize_locale(lang);
        let locale = if self.locales.contains_key(&tag) {
            tag
        } else {
            if tag != DEFAULT_LOCALE {
                debug!(requested = %tag, fallback = DEFAULT_LOCALE, "Locale not available");
            }
            DEFAULT_LOCALE.to_string()
        };
        Translator {
            catalog: self,
            locale,
        }
    }
}

/// Looks up strings for one resolved locale.
#[derive(Debug, Clone)]
pub struct Translator<'a> {
    catalog: &'a Catalog,
    locale: String,
}

impl Translator<'_> {
    /// The locale strings are taken from first.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Translate `key` without parameters.
    pub fn t(&self, key: &str) -> String {
        self.t_with(key, &[])
    }

    /// Translate `key`, filling `{{.Name}}` placeholders from `params`.
    ///
    /// Falls back to the default locale, then to the key itself. The empty
    /// key translates to the empty string.
    pub fn t_with(&self, key: &str, params: &[(&str, String)]) -> String {
        if key.is_empty() {
            return String::new();
        }

        let found = [self.locale.as_str(), DEFAULT_LOCALE]
            .into_iter()
            .filter_map(|tag| self.catalog.locales.get(tag))
            .find_map(|messages| messages.get(key));

        match found {
            Some(template) => {
                let values: HashMap<&str, String> =
                    params.iter().map(|(k, v)| (*k, v.clone())).collect();
                template.render(&values, Escape::None)
            }
            None => {
                debug!(locale = %self.locale, key, "Missing translation");
                key.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use std::fs;

    #[test]
    fn test_builtin_locales_load() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.locales(), vec!["en-us", "fr-fr"]);
    }

    #[test]
    fn test_builtin_default_has_every_advice_key() {
        let catalog = Catalog::builtin();
        let t = catalog.translator(DEFAULT_LOCALE);
        for kind in ErrorKind::all() {
            let key = kind.advice_key();
            if !key.is_empty() {
                assert_ne!(t.t(key), key, "missing en-us advice for {:?}", kind);
            }
        }
        for key in [
            "unrecognized_error_code",
            "missing_view",
            "no_bundle_prepared_html",
            "you_asked_for_html",
            "error_we_got_html",
            "what_you_can_do_html",
            "retry_html",
            "report_html",
        ] {
            assert_ne!(t.t(key), key, "missing en-us string {key}");
        }
    }

    #[test]
    fn test_parameters_substituted() {
        let catalog = Catalog::builtin();
        let t = catalog.translator("en-us");
        assert_eq!(
            t.t_with("unrecognized_error_code", &[("ErrCode", "9999".to_string())]),
            "Encountered an unrecognized error code: 9999"
        );
    }

    #[test]
    fn test_unknown_locale_falls_back() {
        let catalog = Catalog::builtin();
        let t = catalog.translator("xx-yy");
        assert_eq!(t.locale(), DEFAULT_LOCALE);
        assert_eq!(t.t("retry_html"), "Retry");
    }

    #[test]
    fn test_partial_locale_falls_back_per_key() {
        let catalog = Catalog::builtin();
        let t = catalog.translator("FR_fr");
        assert_eq!(t.locale(), "fr-fr");
        assert_eq!(t.t("retry_html"), "Réessayer");
        // Not translated in fr-fr
        assert_eq!(
            t.t("no_bundle_prepared_html"),
            "No bundle could be prepared for the page you asked for."
        );
    }

    #[test]
    fn test_missing_key_and_empty_key() {
        let catalog = Catalog::builtin();
        let t = catalog.translator("en-us");
        assert_eq!(t.t("no_such_key"), "no_such_key");
        assert_eq!(t.t(""), "");
    }

    #[test]
    fn test_directory_overrides_and_adds() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("en-us.all.json"),
            r#"[{"id": "retry_html", "translation": "Try again"}]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("es-ES.all.json"),
            r#"[{"id": "retry_html", "translation": {"one": "Reintentar", "other": "Reintentar"}}]"#,
        )
        .unwrap();
        fs::write(dir.path().join("de-de.all.json"), "{ not json").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let catalog = Catalog::load(Some(dir.path()));
        assert_eq!(catalog.locales(), vec!["en-us", "es-es", "fr-fr"]);
        assert_eq!(catalog.translator("en-us").t("retry_html"), "Try again");
        assert_eq!(catalog.translator("es-es").t("retry_html"), "Reintentar");
        // Untouched built-in strings survive the overlay
        assert_eq!(catalog.translator("en-us").t("report_html"), "Report this problem");
    }

    #[test]
    fn test_load_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = Catalog::default();

        let bad_name = dir.path().join("en-us.json");
        fs::write(&bad_name, "[]").unwrap();
        assert!(matches!(
            catalog.load_file(&bad_name),
            Err(CatalogError::BadFileName(_))
        ));

        let missing = dir.path().join("pt-br.all.json");
        assert!(matches!(
            catalog.load_file(&missing),
            Err(CatalogError::Read { .. })
        ));
    }

    #[test]
    fn test_missing_dir_keeps_builtin() {
        let catalog = Catalog::load(Some(Path::new("/nonexistent/ceno/locales")));
        assert!(catalog.has_locale("en-us"));
    }
}
