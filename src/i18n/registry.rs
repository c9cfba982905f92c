//! Usage registry: every message recorded during one report-generation run.
//!
//! Each file-scoped key maps to the ordered list of its usages. The position
//! of a usage in that list is the index encoded in its placeholder token, so
//! the list is append-only.

use crate::i18n::token::{FileScopedKey, PlaceholderToken};
use crate::i18n::MessageValues;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One call to the recorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// File-scoped key (`<origin>!#<name>`)
    pub key: String,

    /// Default-locale template the message was recorded with
    pub template: String,

    /// Raw substitution values, exactly as recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<MessageValues>,
}

/// Append-only store of usage records for one run.
///
/// Serializable so that a run's registry can be saved next to its pristine
/// report and resolved later.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageRegistry {
    usages: BTreeMap<String, Vec<UsageRecord>>,
}

impl UsageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a usage and return the token that refers to it.
    pub fn record(
        &mut self,
        key: &FileScopedKey,
        template: &str,
        values: Option<MessageValues>,
    ) -> PlaceholderToken {
        let key_text = key.to_string();
        let usages = self.usages.entry(key_text.clone()).or_default();
        let index = usages.len();
        usages.push(UsageRecord {
            key: key_text,
            template: template.to_string(),
            values,
        });
        PlaceholderToken::new(key.clone(), index)
    }

    /// Look up the usage a token refers to.
    pub fn get(&self, token: &PlaceholderToken) -> Option<&UsageRecord> {
        self.usages.get(&token.key.to_string())?.get(token.index)
    }

    /// All usages recorded for a file-scoped key, in call order.
    pub fn usages(&self, key: &str) -> &[UsageRecord] {
        self.usages.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Keys with at least one usage.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.usages.keys().map(String::as_str)
    }

    /// Total number of usages across all keys.
    pub fn len(&self) -> usize {
        self.usages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.usages.is_empty()
    }

    /// Drop every usage. Tokens minted before the call no longer resolve.
    pub fn clear(&mut self) {
        self.usages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ms_key() -> FileScopedKey {
        FileScopedKey::new("core/lib/i18n", "ms")
    }

    #[test]
    fn test_record_assigns_sequential_indices() {
        let mut registry = UsageRegistry::new();
        let first = registry.record(&ms_key(), "{timeInMs, number, milliseconds}\u{a0}ms", None);
        let second = registry.record(&ms_key(), "{timeInMs, number, milliseconds}\u{a0}ms", None);

        assert_eq!(first.index, 0);
        assert_eq!(second.index, 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_indices_are_per_key() {
        let mut registry = UsageRegistry::new();
        registry.record(&ms_key(), "a", None);
        let other = registry.record(&FileScopedKey::new("core/lib/i18n", "kb"), "b", None);
        assert_eq!(other.index, 0);
    }

    #[test]
    fn test_get_returns_recorded_values() {
        let mut registry = UsageRegistry::new();
        let values = json!({"timeInMs": 1234}).as_object().cloned();
        let token = registry.record(&ms_key(), "t", values.clone());

        let record = registry.get(&token).unwrap();
        assert_eq!(record.key, "core/lib/i18n!#ms");
        assert_eq!(record.template, "t");
        assert_eq!(record.values, values);
    }

    #[test]
    fn test_get_unknown_index() {
        let mut registry = UsageRegistry::new();
        registry.record(&ms_key(), "t", None);
        assert!(registry.get(&PlaceholderToken::new(ms_key(), 1)).is_none());
        assert!(registry
            .get(&PlaceholderToken::new(FileScopedKey::new("x", "y"), 0))
            .is_none());
    }

    #[test]
    fn test_clear_makes_tokens_dangling() {
        let mut registry = UsageRegistry::new();
        let token = registry.record(&ms_key(), "t", None);
        registry.clear();

        assert!(registry.is_empty());
        assert!(registry.get(&token).is_none());

        // Indices restart after a clear
        let fresh = registry.record(&ms_key(), "t", None);
        assert_eq!(fresh.index, 0);
    }

    #[test]
    fn test_usages_and_keys() {
        let mut registry = UsageRegistry::new();
        registry.record(&ms_key(), "t", None);
        registry.record(&ms_key(), "t", None);

        assert_eq!(registry.usages("core/lib/i18n!#ms").len(), 2);
        assert!(registry.usages("nope").is_empty());
        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["core/lib/i18n!#ms"]);
    }

    #[test]
    fn test_serde_shape() {
        let mut registry = UsageRegistry::new();
        registry.record(&ms_key(), "t", json!({"timeInMs": 10}).as_object().cloned());
        registry.record(&ms_key(), "t", None);

        let value = serde_json::to_value(&registry).expect("Should serialize");
        assert_eq!(
            value,
            json!({
                "core/lib/i18n!#ms": [
                    {"key": "core/lib/i18n!#ms", "template": "t", "values": {"timeInMs": 10}},
                    {"key": "core/lib/i18n!#ms", "template": "t"}
                ]
            })
        );

        let restored: UsageRegistry = serde_json::from_value(value).expect("Should deserialize");
        assert_eq!(restored, registry);
    }
}
