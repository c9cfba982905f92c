//! Recording phase: turn localizable messages into placeholder tokens.
//!
//! An `I18nSession` owns the usage registry for one report-generation run.
//! Report code records messages through it while building the report, then
//! resolves the finished report into one or more locales.

use crate::i18n::catalog::{MessageCatalog, MessageRef};
use crate::i18n::formatter::Formatter;
use crate::i18n::registry::UsageRegistry;
use crate::i18n::resolver::{resolve_tree, LocaleLog};
use crate::i18n::{I18nError, MessageValues, DEFAULT_LOCALE};
use serde_json::Value;
use tracing::debug;

/// State for one report-generation run.
#[derive(Debug, Clone)]
pub struct I18nSession {
    registry: UsageRegistry,
    locale: String,
}

impl Default for I18nSession {
    fn default() -> Self {
        Self::new()
    }
}

impl I18nSession {
    pub fn new() -> Self {
        Self {
            registry: UsageRegistry::new(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }

    /// Resume a run from a saved registry.
    pub fn from_registry(registry: UsageRegistry) -> Self {
        Self {
            registry,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }

    /// Set the locale used by `resolve`. `None` or an empty string is a no-op.
    ///
    /// The locale is not validated; unknown locales render with default
    /// templates and English number conventions.
    pub fn set_locale(&mut self, locale: Option<&str>) {
        if let Some(locale) = locale.filter(|l| !l.is_empty()) {
            self.locale = locale.to_string();
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn registry(&self) -> &UsageRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> UsageRegistry {
        self.registry
    }

    /// Forget every recorded usage. Tokens already written into a report will
    /// fail to resolve afterwards.
    pub fn reset(&mut self) {
        self.registry.clear();
    }

    /// Record a usage of a known message and return its placeholder token.
    pub fn format_message(&mut self, message: MessageRef<'_>, values: Option<MessageValues>) -> String {
        let key = message.file_scoped_key();
        let token = self.registry.record(&key, message.template, values);
        debug!("Recorded {}", token);
        token.to_string()
    }

    /// Recorder for a component whose own strings live in `catalog`.
    pub fn recorder<'a>(&'a mut self, catalog: &'a MessageCatalog) -> Recorder<'a> {
        Recorder {
            session: self,
            catalog,
        }
    }

    /// Resolve every placeholder in `tree` into the session's current locale.
    ///
    /// # Errors
    /// See [`resolve_tree`].
    pub fn resolve(&self, tree: &mut Value, formatter: &Formatter) -> Result<LocaleLog, I18nError> {
        resolve_tree(tree, &self.locale, &self.registry, formatter)
    }
}

/// Records messages on behalf of one report component.
///
/// Templates are looked up by exact text, first in the component's catalog
/// and then in the core catalog.
pub struct Recorder<'a> {
    session: &'a mut I18nSession,
    catalog: &'a MessageCatalog,
}

impl Recorder<'_> {
    /// Record `template` with `values` and return its placeholder token.
    ///
    /// # Errors
    /// Returns `I18nError::UnknownTemplate` if `template` is not the default
    /// text of any message in the component's catalog or the core catalog.
    pub fn format(
        &mut self,
        template: &str,
        values: Option<MessageValues>,
    ) -> Result<String, I18nError> {
        let message = self
            .catalog
            .find_template(template)
            .or_else(|| MessageCatalog::core().find_template(template))
            .ok_or_else(|| I18nError::UnknownTemplate {
                template: template.to_string(),
            })?;

        Ok(self.session.format_message(message, values))
    }

    /// Record a message of the component's catalog by key.
    ///
    /// # Errors
    /// Returns `I18nError::UnknownTemplate` if `key` is not in the catalog.
    pub fn format_key(
        &mut self,
        key: &str,
        values: Option<MessageValues>,
    ) -> Result<String, I18nError> {
        let message = self
            .catalog
            .message(key)
            .ok_or_else(|| I18nError::UnknownTemplate {
                template: format!("{}!#{}", self.catalog.origin(), key),
            })?;

        Ok(self.session.format_message(message, values))
    }
}
