//! Resolution phase: replace placeholder tokens in a report with localized text.
//!
//! The walk is destructive. Resolve a pristine copy of the report once per
//! locale; a resolved tree no longer contains tokens.

use crate::i18n::formatter::Formatter;
use crate::i18n::registry::UsageRegistry;
use crate::i18n::token::PlaceholderToken;
use crate::i18n::{I18nError, MessageValues};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::info;

/// Top-level field the locale log is attached under.
pub const LOCALE_LOG_FIELD: &str = "localeLog";

/// One step from a parent container to a child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

/// Where a substitution happened, and with which recorded values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<MessageValues>,
    pub path: Vec<PathSegment>,
}

/// All substitutions of one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocaleLogEntry {
    /// Template used for this locale (localized, or the default as fallback)
    pub template: String,
    pub occurrences: Vec<Occurrence>,
}

/// Audit log of one resolution pass, keyed by file-scoped key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocaleLog {
    entries: BTreeMap<String, LocaleLogEntry>,
}

impl LocaleLog {
    pub fn get(&self, key: &str) -> Option<&LocaleLogEntry> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LocaleLogEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Number of distinct messages substituted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of substitutions performed.
    pub fn occurrence_count(&self) -> usize {
        self.entries.values().map(|entry| entry.occurrences.len()).sum()
    }
}

/// Render a path as `audits.a.details.items[0].url`.
pub fn format_path(path: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in path {
        match segment {
            PathSegment::Index(i) => out.push_str(&format!("[{}]", i)),
            PathSegment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
        }
    }
    out
}

/// Replace every placeholder token in `tree` with its message in `locale`,
/// then attach the audit log to the root as `localeLog`.
///
/// Every string leaf is checked; containers are always recursed into.
/// Repeated tokens produce one occurrence each.
///
/// # Errors
/// - `I18nError::RootNotObject` if `tree` is not a JSON object (nothing is modified)
/// - `I18nError::DanglingReference` if a token has no usage record; the pass
///   stops at the first one and the tree is left partially resolved
/// - any formatting error from the `Formatter`
pub fn resolve_tree(
    tree: &mut Value,
    locale: &str,
    registry: &UsageRegistry,
    formatter: &Formatter,
) -> Result<LocaleLog, I18nError> {
    if !tree.is_object() {
        return Err(I18nError::RootNotObject);
    }

    let mut walker = Walker {
        locale,
        registry,
        formatter,
        log: LocaleLog::default(),
        path: Vec::new(),
    };
    walker.visit(tree)?;
    let log = walker.log;

    info!(
        "Resolved {} placeholders ({} messages) for locale {}",
        log.occurrence_count(),
        log.len(),
        locale
    );

    let log_value = serde_json::to_value(&log).map_err(I18nError::LogSerialization)?;
    if let Value::Object(root) = tree {
        root.insert(LOCALE_LOG_FIELD.to_string(), log_value);
    }

    Ok(log)
}

/// Resolve a copy of `tree`, leaving the original untouched.
///
/// # Errors
/// Same as [`resolve_tree`].
pub fn localize(
    tree: &Value,
    locale: &str,
    registry: &UsageRegistry,
    formatter: &Formatter,
) -> Result<Value, I18nError> {
    let mut copy = tree.clone();
    resolve_tree(&mut copy, locale, registry, formatter)?;
    Ok(copy)
}

struct Walker<'a> {
    locale: &'a str,
    registry: &'a UsageRegistry,
    formatter: &'a Formatter,
    log: LocaleLog,
    path: Vec<PathSegment>,
}

impl Walker<'_> {
    fn visit(&mut self, value: &mut Value) -> Result<(), I18nError> {
        match value {
            Value::Object(map) => {
                for (key, child) in map.iter_mut() {
                    self.path.push(PathSegment::Key(key.clone()));
                    self.visit(child)?;
                    self.path.pop();
                }
            }
            Value::Array(items) => {
                for (i, child) in items.iter_mut().enumerate() {
                    self.path.push(PathSegment::Index(i));
                    self.visit(child)?;
                    self.path.pop();
                }
            }
            Value::String(text) => {
                if let Some(token) = PlaceholderToken::parse(text) {
                    let message = self.substitute(&token, text)?;
                    *text = message;
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
        Ok(())
    }

    fn substitute(&mut self, token: &PlaceholderToken, raw: &str) -> Result<String, I18nError> {
        let registry = self.registry;
        let record = registry
            .get(token)
            .ok_or_else(|| I18nError::DanglingReference {
                token: raw.to_string(),
                path: format_path(&self.path),
            })?;

        let key = token.key.to_string();
        let formatted =
            self.formatter
                .format(self.locale, &key, &record.template, record.values.as_ref())?;

        self.log
            .entries
            .entry(key)
            .or_insert_with(|| LocaleLogEntry {
                template: formatted.template.clone(),
                occurrences: Vec::new(),
            })
            .occurrences
            .push(Occurrence {
                values: record.values.clone(),
                path: self.path.clone(),
            });

        Ok(formatted.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::catalog::{LocaleCatalogs, MessageCatalog};
    use crate::i18n::recorder::I18nSession;
    use serde_json::json;

    fn formatter() -> Formatter {
        Formatter::new(LocaleCatalogs::bundled().unwrap())
    }

    fn record(session: &mut I18nSession, key: &str, values: Value) -> String {
        let message = MessageCatalog::core().message(key).unwrap();
        session.format_message(message, values.as_object().cloned())
    }

    // ==================== Substitution Tests ====================

    #[test]
    fn test_resolves_nested_tokens() {
        let mut session = I18nSession::new();
        let ms = record(&mut session, "ms", json!({"timeInMs": 1234}));
        let url = record(&mut session, "columnURL", json!(null));

        let mut tree = json!({
            "audits": {
                "a": {"displayValue": ms, "score": 0.5},
                "b": {"headings": [{"text": url}, {"text": "plain"}]}
            }
        });

        let log = resolve_tree(&mut tree, "en", session.registry(), &formatter()).unwrap();

        assert_eq!(tree["audits"]["a"]["displayValue"], "1,230\u{a0}ms");
        assert_eq!(tree["audits"]["a"]["score"], 0.5);
        assert_eq!(tree["audits"]["b"]["headings"][0]["text"], "URL");
        assert_eq!(tree["audits"]["b"]["headings"][1]["text"], "plain");
        assert_eq!(log.len(), 2);
        assert_eq!(log.occurrence_count(), 2);
    }

    #[test]
    fn test_log_records_paths_and_values() {
        let mut session = I18nSession::new();
        let token = record(&mut session, "columnURL", json!(null));
        let mut tree = json!({"items": [{"heading": token}]});

        let log = resolve_tree(&mut tree, "en", session.registry(), &formatter()).unwrap();
        let entry = log.get("core/lib/i18n!#columnURL").unwrap();

        assert_eq!(entry.template, "URL");
        assert_eq!(
            entry.occurrences[0].path,
            vec![
                PathSegment::Key("items".to_string()),
                PathSegment::Index(0),
                PathSegment::Key("heading".to_string()),
            ]
        );
        assert_eq!(entry.occurrences[0].values, None);
    }

    #[test]
    fn test_log_is_attached_to_root() {
        let mut session = I18nSession::new();
        let token = record(&mut session, "ms", json!({"timeInMs": 17}));
        let mut tree = json!({"a": token});

        resolve_tree(&mut tree, "en", session.registry(), &formatter()).unwrap();

        assert_eq!(
            tree[LOCALE_LOG_FIELD],
            json!({
                "core/lib/i18n!#ms": {
                    "template": "{timeInMs, number, milliseconds}\u{a0}ms",
                    "occurrences": [{"values": {"timeInMs": 17}, "path": ["a"]}]
                }
            })
        );
    }

    #[test]
    fn test_same_token_twice_gives_two_occurrences() {
        let mut session = I18nSession::new();
        let token = record(&mut session, "columnURL", json!(null));
        let mut tree = json!({"x": token.clone(), "y": [token]});

        let log = resolve_tree(&mut tree, "en", session.registry(), &formatter()).unwrap();
        assert_eq!(log.get("core/lib/i18n!#columnURL").unwrap().occurrences.len(), 2);
    }

    #[test]
    fn test_token_lookalikes_are_untouched() {
        let session = I18nSession::new();
        let mut tree = json!({"note": "see issue #12", "hex": "#ff0000", "n": 12});
        let expected_note = tree["note"].clone();

        let log = resolve_tree(&mut tree, "en", session.registry(), &formatter()).unwrap();
        assert!(log.is_empty());
        assert_eq!(tree["note"], expected_note);
        assert_eq!(tree["hex"], "#ff0000");
    }

    // ==================== Error Tests ====================

    #[test]
    fn test_dangling_reference_is_error() {
        let session = I18nSession::new();
        let mut tree = json!({"audits": {"a": {"title": "core/lib/i18n!#ms#7"}}});

        let err = resolve_tree(&mut tree, "en", session.registry(), &formatter()).unwrap_err();
        match err {
            I18nError::DanglingReference { token, path } => {
                assert_eq!(token, "core/lib/i18n!#ms#7");
                assert_eq!(path, "audits.a.title");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_object_root_is_rejected_untouched() {
        let mut session = I18nSession::new();
        let token = record(&mut session, "columnURL", json!(null));
        let mut tree = json!([token.clone()]);

        let result = resolve_tree(&mut tree, "en", session.registry(), &formatter());
        assert!(matches!(result, Err(I18nError::RootNotObject)));
        assert_eq!(tree[0], json!(token));
    }

    // ==================== Path Formatting Tests ====================

    #[test]
    fn test_format_path() {
        let path = vec![
            PathSegment::Key("audits".to_string()),
            PathSegment::Key("a".to_string()),
            PathSegment::Key("items".to_string()),
            PathSegment::Index(2),
            PathSegment::Key("url".to_string()),
        ];
        assert_eq!(format_path(&path), "audits.a.items[2].url");
        assert_eq!(format_path(&[]), "");
    }

    // ==================== localize Tests ====================

    #[test]
    fn test_localize_leaves_original_pristine() {
        let mut session = I18nSession::new();
        let token = record(&mut session, "columnSize", json!(null));
        let tree = json!({"heading": token.clone()});

        let f = formatter();
        let es = localize(&tree, "es", session.registry(), &f).unwrap();
        let en = localize(&tree, "en", session.registry(), &f).unwrap();

        assert_eq!(tree["heading"], json!(token));
        assert_eq!(es["heading"], "Tamaño (KB)");
        assert_eq!(en["heading"], "Size (KB)");
    }
}
