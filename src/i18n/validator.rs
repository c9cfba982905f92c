//! Locale catalog validation.
//!
//! Checks that translations keep the placeholders of their default template,
//! that every template parses, and reports missing or stale translations.

use crate::i18n::catalog::{LocaleMessages, MessageCatalog};
use crate::i18n::icu::{argument_ids, parse_message};
use crate::i18n::token::FileScopedKey;
use std::collections::HashSet;

/// Validation report containing errors and warnings about a locale catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Templates that cannot be rendered at all
    pub errors: Vec<String>,

    /// Translations that render but are probably wrong or incomplete
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for locale catalogs.
pub struct CatalogValidator;

impl CatalogValidator {
    /// Validate one locale's messages against a message catalog.
    ///
    /// Errors:
    /// - a default or localized template does not parse
    ///
    /// Warnings:
    /// - a localized template uses different arguments than the default
    /// - a catalog message has no translation
    /// - a translation under this catalog's origin matches no catalog key
    pub fn validate(
        catalog: &MessageCatalog,
        locale: &str,
        messages: &LocaleMessages,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();
        let mut known_keys = HashSet::new();

        for entry in catalog.entries() {
            let key = FileScopedKey::new(catalog.origin(), entry.key).to_string();
            known_keys.insert(key.clone());

            let default_ids = match parse_message(entry.template) {
                Ok(elements) => argument_ids(&elements),
                Err(err) => {
                    report.errors.push(format!("{}: {}", key, err));
                    continue;
                }
            };

            let Some(localized) = messages.get(&key) else {
                report
                    .warnings
                    .push(format!("{}: missing {} translation", key, locale));
                continue;
            };

            match parse_message(&localized.message) {
                Ok(elements) => {
                    let localized_ids = argument_ids(&elements);
                    if localized_ids != default_ids {
                        report.warnings.push(format!(
                            "{}: {} translation uses arguments {:?}, default uses {:?}",
                            key, locale, localized_ids, default_ids
                        ));
                    }
                }
                Err(err) => report
                    .errors
                    .push(format!("{}: {} translation: {}", key, locale, err)),
            }
        }

        let prefix = format!("{}!#", catalog.origin());
        for key in messages.keys() {
            if key.starts_with(&prefix) && !known_keys.contains(key) {
                report
                    .warnings
                    .push(format!("{}: {} translation has no catalog entry", key, locale));
            }
        }

        report
    }
}
