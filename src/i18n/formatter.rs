//! Locale-aware formatting of recorded messages.

use crate::i18n::catalog::{LocaleCatalogs, MessageCatalog};
use crate::i18n::message_format::{FormatOptions, IcuMessageFormat, MessageFormat};
use crate::i18n::metrics::L10nMetrics;
use crate::i18n::preprocess::preprocess_values;
use crate::i18n::token::FileScopedKey;
use crate::i18n::{I18nError, MessageValues};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Accented-English pseudo-locale used to test rendering of translated text.
pub const PSEUDO_LOCALE: &str = "en-XA";

/// Real locale whose number conventions stand in for the pseudo-locale.
pub const PSEUDO_LOCALE_NUMBERS: &str = "de-DE";

/// Result of formatting one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedMessage {
    /// Final localized text
    pub message: String,

    /// Template the text was produced from (localized or default)
    pub template: String,
}

/// Formats messages against locale catalogs.
pub struct Formatter {
    catalogs: LocaleCatalogs,
    backend: Box<dyn MessageFormat>,
    options: FormatOptions,
    number_locale_overrides: HashMap<String, String>,
    metrics: L10nMetrics,
}

impl Formatter {
    /// Formatter using the built-in ICU renderer.
    pub fn new(catalogs: LocaleCatalogs) -> Self {
        Self::with_backend(catalogs, Box::new(IcuMessageFormat))
    }

    /// Formatter using a custom rendering backend.
    pub fn with_backend(catalogs: LocaleCatalogs, backend: Box<dyn MessageFormat>) -> Self {
        let mut number_locale_overrides = HashMap::new();
        number_locale_overrides.insert(
            PSEUDO_LOCALE.to_string(),
            PSEUDO_LOCALE_NUMBERS.to_string(),
        );

        Self {
            catalogs,
            backend,
            options: FormatOptions::default(),
            number_locale_overrides,
            metrics: L10nMetrics::new(),
        }
    }

    /// Use `numbers_locale` for number/date conventions whenever `locale` is requested.
    pub fn with_number_locale(
        mut self,
        locale: impl Into<String>,
        numbers_locale: impl Into<String>,
    ) -> Self {
        self.number_locale_overrides
            .insert(locale.into(), numbers_locale.into());
        self
    }

    pub fn with_options(mut self, options: FormatOptions) -> Self {
        self.options = options;
        self
    }

    pub fn catalogs(&self) -> &LocaleCatalogs {
        &self.catalogs
    }

    pub fn metrics(&self) -> &L10nMetrics {
        &self.metrics
    }

    /// Localized template for `key`, or `default_template` when the locale
    /// has no translation for it. An empty translation counts as missing.
    pub fn template_for<'a>(&'a self, locale: &str, key: &str, default_template: &'a str) -> &'a str {
        match self.catalogs.get(locale, key).filter(|m| !m.is_empty()) {
            Some(localized) => {
                self.metrics.record_localized_hit();
                localized
            }
            None => {
                debug!("No {} translation for {}, using default template", locale, key);
                self.metrics.record_fallback();
                default_template
            }
        }
    }

    /// Locale whose number/date conventions apply when rendering `locale`.
    pub fn number_locale<'a>(&'a self, locale: &'a str) -> &'a str {
        match self.number_locale_overrides.get(locale) {
            Some(substitute) => {
                if locale == PSEUDO_LOCALE {
                    self.metrics.record_pseudo_substitution();
                }
                substitute
            }
            None => locale,
        }
    }

    /// Format one recorded message for `locale`.
    ///
    /// Values are preprocessed against the default template, then rendered
    /// with the localized template (or the default one as a fallback).
    ///
    /// # Errors
    /// Returns `I18nError` if a template is malformed or a value is missing
    /// or invalid. A missing translation is never an error.
    pub fn format(
        &self,
        locale: &str,
        key: &str,
        default_template: &str,
        values: Option<&MessageValues>,
    ) -> Result<FormattedMessage, I18nError> {
        let template = self.template_for(locale, key, default_template);
        let number_locale = self.number_locale(locale);
        let prepared = preprocess_values(default_template, values)?;

        let message =
            self.backend
                .format(template, number_locale, prepared.as_ref(), &self.options)?;
        self.metrics.record_formatted();

        Ok(FormattedMessage {
            message,
            template: template.to_string(),
        })
    }

    /// Localized (or default) template text for every entry of `catalog`,
    /// keyed by entry key. Used to hand a renderer its static UI strings.
    pub fn catalog_strings(&self, locale: &str, catalog: &MessageCatalog) -> BTreeMap<String, String> {
        catalog
            .entries()
            .iter()
            .map(|entry| {
                let key = FileScopedKey::new(catalog.origin(), entry.key).to_string();
                let template = self.template_for(locale, &key, entry.template);
                (entry.key.to_string(), template.to_string())
            })
            .collect()
    }
}
