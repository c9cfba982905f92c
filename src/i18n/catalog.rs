//! Message catalogs.
//!
//! A `MessageCatalog` holds the default-locale templates a report component
//! may record, keyed by stable names. `LocaleCatalogs` holds the externally
//! supplied translations, keyed by locale and then by file-scoped key.

use crate::i18n::number::language_of;
use crate::i18n::strings::{CORE_ORIGIN, CORE_STRINGS};
use crate::i18n::token::FileScopedKey;
use crate::i18n::{I18nError, DEFAULT_LOCALE};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// A localizable message definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Stable identifier, unique within its catalog
    pub key: &'static str,

    /// ICU template in the default locale
    pub template: &'static str,
}

impl CatalogEntry {
    pub const fn new(key: &'static str, template: &'static str) -> Self {
        Self { key, template }
    }
}

/// A catalog entry bound to the origin of the catalog that defines it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef<'a> {
    pub origin: &'a str,
    pub key: &'static str,
    pub template: &'static str,
}

impl MessageRef<'_> {
    pub fn file_scoped_key(&self) -> FileScopedKey {
        FileScopedKey::new(self.origin, self.key)
    }
}

/// The set of messages one report component can record.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    origin: String,
    entries: Vec<CatalogEntry>,
    by_key: HashMap<&'static str, usize>,
    by_template: HashMap<&'static str, usize>,
}

static CORE_CATALOG: OnceLock<MessageCatalog> = OnceLock::new();

impl MessageCatalog {
    /// Build a catalog for `origin` (a relative path or other stable name).
    ///
    /// If two entries share a key or a template, the first one wins.
    pub fn new(origin: impl Into<String>, entries: &[CatalogEntry]) -> Self {
        let mut by_key = HashMap::new();
        let mut by_template = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            by_key.entry(entry.key).or_insert(i);
            by_template.entry(entry.template).or_insert(i);
        }

        Self {
            origin: origin.into(),
            entries: entries.to_vec(),
            by_key,
            by_template,
        }
    }

    /// The shared core catalog.
    pub fn core() -> &'static MessageCatalog {
        CORE_CATALOG.get_or_init(|| MessageCatalog::new(CORE_ORIGIN, CORE_STRINGS))
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a message by key.
    pub fn message(&self, key: &str) -> Option<MessageRef<'_>> {
        self.by_key.get(key).map(|&i| self.bind(i))
    }

    /// Look up a message by its exact default template text.
    pub fn find_template(&self, template: &str) -> Option<MessageRef<'_>> {
        self.by_template.get(template).map(|&i| self.bind(i))
    }

    fn bind(&self, i: usize) -> MessageRef<'_> {
        let entry = self.entries[i];
        MessageRef {
            origin: &self.origin,
            key: entry.key,
            template: entry.template,
        }
    }
}

/// A localized message as stored in a locale catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleMessage {
    pub message: String,
}

/// Localized messages for one locale, keyed by file-scoped key.
pub type LocaleMessages = BTreeMap<String, LocaleMessage>;

const BUNDLED: &[(&str, &str)] = &[
    ("es", include_str!("../../locales/es.json")),
    ("en-XA", include_str!("../../locales/en-XA.json")),
];

/// Translations for every available locale.
#[derive(Debug, Clone, Default)]
pub struct LocaleCatalogs {
    locales: BTreeMap<String, LocaleMessages>,
}

impl LocaleCatalogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalogs shipped with the crate for the core strings.
    ///
    /// # Errors
    /// Returns `I18nError::CatalogParse` if a bundled file is not valid JSON.
    pub fn bundled() -> Result<Self, I18nError> {
        let mut catalogs = Self::new();
        for (locale, json) in BUNDLED {
            catalogs.insert_json(locale, json, Path::new(locale))?;
        }
        Ok(catalogs)
    }

    /// Add (or extend) the messages for a locale. Later keys overwrite earlier ones.
    pub fn insert(&mut self, locale: impl Into<String>, messages: LocaleMessages) {
        self.locales
            .entry(locale.into())
            .or_default()
            .extend(messages);
    }

    fn insert_json(&mut self, locale: &str, json: &str, path: &Path) -> Result<(), I18nError> {
        let messages: LocaleMessages =
            serde_json::from_str(json).map_err(|source| I18nError::CatalogParse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("Loaded {} messages for locale {}", messages.len(), locale);
        self.insert(locale, messages);
        Ok(())
    }

    /// Load every `<locale>.json` file in `dir`, returning how many were read.
    ///
    /// # Errors
    /// Returns `I18nError::CatalogIo` / `I18nError::CatalogParse` for unreadable
    /// or invalid files.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize, I18nError> {
        let dir = dir.as_ref();
        let io_err = |source| I18nError::CatalogIo {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            let Some(locale) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let json = std::fs::read_to_string(path).map_err(|source| I18nError::CatalogIo {
                path: path.clone(),
                source,
            })?;
            self.insert_json(locale, &json, path)?;
        }

        Ok(paths.len())
    }

    /// Locales that have a catalog.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }

    pub fn messages(&self, locale: &str) -> Option<&LocaleMessages> {
        self.locales.get(locale)
    }

    /// Localized template for a file-scoped key, if the locale has one.
    pub fn get(&self, locale: &str, key: &str) -> Option<&str> {
        self.locales
            .get(locale)?
            .get(key)
            .map(|entry| entry.message.as_str())
    }

    /// Pick the first requested locale that can be rendered.
    ///
    /// A request matches a catalog exactly (case-insensitive), then by primary
    /// language. The default locale needs no catalog.
    pub fn lookup_locale(&self, requested: &[&str]) -> Option<String> {
        for candidate in requested {
            if let Some(found) = self.locales().find(|l| l.eq_ignore_ascii_case(candidate)) {
                return Some(found.to_string());
            }

            let language = language_of(candidate);
            if language == language_of(DEFAULT_LOCALE) {
                return Some(DEFAULT_LOCALE.to_string());
            }
            if let Some(found) = self.locales().find(|l| language_of(l) == language) {
                return Some(found.to_string());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::strings;

    const AUDIT_STRINGS: &[CatalogEntry] = &[
        CatalogEntry::new("title", "Avoid enormous network payloads"),
        CatalogEntry::new("displayValue", "Total size was {totalBytes, number, bytes}\u{a0}KB"),
    ];

    // ==================== MessageCatalog Tests ====================

    #[test]
    fn test_core_returns_singleton() {
        let a = MessageCatalog::core();
        let b = MessageCatalog::core();
        assert!(std::ptr::eq(a, b));
        assert_eq!(a.origin(), "core/lib/i18n");
        assert_eq!(a.len(), strings::CORE_STRINGS.len());
    }

    #[test]
    fn test_message_by_key() {
        let catalog = MessageCatalog::new("audits/total-byte-weight", AUDIT_STRINGS);
        let message = catalog.message("title").unwrap();
        assert_eq!(message.origin, "audits/total-byte-weight");
        assert_eq!(message.template, "Avoid enormous network payloads");
        assert_eq!(
            message.file_scoped_key().to_string(),
            "audits/total-byte-weight!#title"
        );
    }

    #[test]
    fn test_find_template_exact_match_only() {
        let catalog = MessageCatalog::new("audits/total-byte-weight", AUDIT_STRINGS);
        assert_eq!(
            catalog
                .find_template("Avoid enormous network payloads")
                .unwrap()
                .key,
            "title"
        );
        assert!(catalog.find_template("avoid enormous network payloads").is_none());
    }

    #[test]
    fn test_duplicate_template_first_wins() {
        let entries = [
            CatalogEntry::new("first", "Same text"),
            CatalogEntry::new("second", "Same text"),
        ];
        let catalog = MessageCatalog::new("dup", &entries);
        assert_eq!(catalog.find_template("Same text").unwrap().key, "first");
        assert!(catalog.message("second").is_some());
    }

    // ==================== LocaleCatalogs Tests ====================

    #[test]
    fn test_bundled_catalogs() {
        let catalogs = LocaleCatalogs::bundled().unwrap();
        let locales: Vec<_> = catalogs.locales().collect();
        assert_eq!(locales, vec!["en-XA", "es"]);
        assert_eq!(
            catalogs.get("es", "core/lib/i18n!#columnSize"),
            Some("Tamaño (KB)")
        );
    }

    #[test]
    fn test_get_missing_key_or_locale() {
        let catalogs = LocaleCatalogs::bundled().unwrap();
        assert!(catalogs.get("es", "core/lib/i18n!#columnTimeSpent").is_none());
        assert!(catalogs.get("fr", "core/lib/i18n!#columnURL").is_none());
    }

    #[test]
    fn test_insert_extends_existing_locale() {
        let mut catalogs = LocaleCatalogs::bundled().unwrap();
        let mut extra = LocaleMessages::new();
        extra.insert(
            "core/lib/i18n!#columnTimeSpent".to_string(),
            LocaleMessage {
                message: "Tiempo invertido".to_string(),
            },
        );
        catalogs.insert("es", extra);

        assert_eq!(
            catalogs.get("es", "core/lib/i18n!#columnTimeSpent"),
            Some("Tiempo invertido")
        );
        assert!(catalogs.get("es", "core/lib/i18n!#columnSize").is_some());
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        std::fs::write(
            dir.path().join("fr.json"),
            r#"{"core/lib/i18n!#columnURL": {"message": "URL (fr)"}}"#,
        )
        .expect("Failed to write catalog");
        std::fs::write(dir.path().join("README.txt"), "ignored").expect("Failed to write file");

        let mut catalogs = LocaleCatalogs::new();
        let loaded = catalogs.load_dir(dir.path()).unwrap();

        assert_eq!(loaded, 1);
        assert_eq!(catalogs.get("fr", "core/lib/i18n!#columnURL"), Some("URL (fr)"));
    }

    #[test]
    fn test_load_dir_invalid_json() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("de.json"), "{not json").expect("Failed to write catalog");

        let result = LocaleCatalogs::new().load_dir(dir.path());
        assert!(matches!(result, Err(I18nError::CatalogParse { .. })));
    }

    #[test]
    fn test_load_dir_missing_directory() {
        let result = LocaleCatalogs::new().load_dir("/definitely/not/a/real/dir");
        assert!(matches!(result, Err(I18nError::CatalogIo { .. })));
    }

    #[test]
    fn test_lookup_locale() {
        let catalogs = LocaleCatalogs::bundled().unwrap();
        assert_eq!(catalogs.lookup_locale(&["es"]).as_deref(), Some("es"));
        assert_eq!(catalogs.lookup_locale(&["es-MX"]).as_deref(), Some("es"));
        assert_eq!(catalogs.lookup_locale(&["en-xa"]).as_deref(), Some("en-XA"));
        assert_eq!(catalogs.lookup_locale(&["en-GB"]).as_deref(), Some("en"));
        assert_eq!(catalogs.lookup_locale(&["zz", "es"]).as_deref(), Some("es"));
        assert_eq!(catalogs.lookup_locale(&["zz"]), None);
    }
}
