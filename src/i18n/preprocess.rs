//! Value preprocessing applied before locale formatting.
//!
//! Report code records raw measurements. Arguments styled `milliseconds` are
//! rounded to the nearest 10ms, and arguments styled `bytes` are converted to
//! kilobytes. The recorded values are never touched; a transformed copy is
//! returned.

use crate::i18n::icu::{formatted_arguments, parse_message, FormatKind};
use crate::i18n::message_format::{BYTES_STYLE, MILLISECONDS_STYLE};
use crate::i18n::number::numeric_value;
use crate::i18n::{I18nError, MessageValues};
use serde_json::{Number, Value};
use std::collections::HashSet;
use tracing::debug;

/// Produce formatting-ready values for `template`.
///
/// Returns `Ok(None)` without parsing when there are no values.
///
/// # Errors
/// Returns `I18nError::MalformedTemplate` if `template` does not parse.
pub fn preprocess_values(
    template: &str,
    values: Option<&MessageValues>,
) -> Result<Option<MessageValues>, I18nError> {
    let Some(values) = values else {
        return Ok(None);
    };

    let elements = parse_message(template)?;
    let mut prepared = values.clone();
    let mut transformed = HashSet::new();

    for (id, format) in formatted_arguments(&elements) {
        if format.kind != FormatKind::Number || transformed.contains(id) {
            continue;
        }
        let transform: fn(f64) -> f64 = match format.style.as_deref() {
            Some(MILLISECONDS_STYLE) => round_to_tens,
            Some(BYTES_STYLE) => bytes_to_kilobytes,
            _ => continue,
        };

        let Some(slot) = prepared.get_mut(id) else {
            continue;
        };
        match numeric_value(slot) {
            Some(raw) => {
                *slot = number_value(transform(raw));
                transformed.insert(id);
            }
            None => debug!("Leaving non-numeric value for '{}' unchanged", id),
        }
    }

    Ok(Some(prepared))
}

/// Nearest multiple of 10; halves round up like ECMAScript `Math.round`.
fn round_to_tens(ms: f64) -> f64 {
    (ms / 10.0 + 0.5).floor() * 10.0
}

fn bytes_to_kilobytes(bytes: f64) -> f64 {
    bytes / 1024.0
}

/// Store whole numbers as integers so they serialize without a `.0`.
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(value: Value) -> MessageValues {
        value.as_object().cloned().unwrap()
    }

    const MS_TEMPLATE: &str = "{timeInMs, number, milliseconds}\u{a0}ms";

    #[test]
    fn test_no_values_returns_none() {
        assert_eq!(preprocess_values(MS_TEMPLATE, None).unwrap(), None);
    }

    #[test]
    fn test_no_values_skips_parsing() {
        // Malformed template is never parsed when there is nothing to transform
        assert_eq!(preprocess_values("{broken", None).unwrap(), None);
    }

    #[test]
    fn test_milliseconds_round_to_tens() {
        let out = preprocess_values(MS_TEMPLATE, Some(&values(json!({"timeInMs": 1234}))))
            .unwrap()
            .unwrap();
        assert_eq!(out["timeInMs"], json!(1230));
    }

    #[test]
    fn test_milliseconds_half_rounds_up() {
        let out = preprocess_values(MS_TEMPLATE, Some(&values(json!({"timeInMs": 1235}))))
            .unwrap()
            .unwrap();
        assert_eq!(out["timeInMs"], json!(1240));

        let out = preprocess_values(MS_TEMPLATE, Some(&values(json!({"timeInMs": -1235}))))
            .unwrap()
            .unwrap();
        assert_eq!(out["timeInMs"], json!(-1230));
    }

    #[test]
    fn test_bytes_to_kilobytes() {
        let template = "{wastedBytes, number, bytes}\u{a0}KB";
        let out = preprocess_values(template, Some(&values(json!({"wastedBytes": 2048}))))
            .unwrap()
            .unwrap();
        assert_eq!(out["wastedBytes"], json!(2));

        let out = preprocess_values(template, Some(&values(json!({"wastedBytes": 1536}))))
            .unwrap()
            .unwrap();
        assert_eq!(out["wastedBytes"], json!(1.5));
    }

    #[test]
    fn test_unstyled_values_pass_through() {
        let template = "{url} took {timeInMs, number, milliseconds}\u{a0}ms ({count, number})";
        let input = values(json!({"url": "https://a.test/x.js", "timeInMs": 17, "count": 1234}));
        let out = preprocess_values(template, Some(&input)).unwrap().unwrap();

        assert_eq!(out["url"], json!("https://a.test/x.js"));
        assert_eq!(out["timeInMs"], json!(20));
        assert_eq!(out["count"], json!(1234));
    }

    #[test]
    fn test_extra_values_are_kept() {
        let input = values(json!({"timeInMs": 5, "unused": true}));
        let out = preprocess_values(MS_TEMPLATE, Some(&input)).unwrap().unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out["unused"], json!(true));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = values(json!({"timeInMs": 1234}));
        let before = input.clone();
        let _ = preprocess_values(MS_TEMPLATE, Some(&input)).unwrap();
        assert_eq!(input, before);
    }

    #[test]
    fn test_repeated_preprocessing_is_stable() {
        let input = values(json!({"timeInMs": 1234}));
        let first = preprocess_values(MS_TEMPLATE, Some(&input)).unwrap();
        let second = preprocess_values(MS_TEMPLATE, Some(&input)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_numeric_value_left_unchanged() {
        let input = values(json!({"timeInMs": "fast"}));
        let out = preprocess_values(MS_TEMPLATE, Some(&input)).unwrap().unwrap();
        assert_eq!(out["timeInMs"], json!("fast"));
    }

    #[test]
    fn test_numeric_string_milliseconds_are_rounded() {
        let input = values(json!({"timeInMs": "1234"}));
        let out = preprocess_values(MS_TEMPLATE, Some(&input)).unwrap().unwrap();
        assert_eq!(out["timeInMs"], json!(1230));
        assert_eq!(input["timeInMs"], json!("1234"));
    }

    #[test]
    fn test_numeric_string_bytes_are_converted() {
        let template = "{sizeInBytes, number, bytes}\u{a0}KB";
        let out = preprocess_values(template, Some(&values(json!({"sizeInBytes": "30720"}))))
            .unwrap()
            .unwrap();
        assert_eq!(out["sizeInBytes"], json!(30));
    }

    #[test]
    fn test_nested_plural_argument_is_transformed() {
        let template =
            "{count, plural, one {# request, {ms, number, milliseconds}} other {# requests, {ms, number, milliseconds}}}";
        let out = preprocess_values(template, Some(&values(json!({"count": 2, "ms": 333}))))
            .unwrap()
            .unwrap();
        assert_eq!(out["ms"], json!(330));
        assert_eq!(out["count"], json!(2));
    }

    #[test]
    fn test_argument_repeated_in_branches_is_transformed_once() {
        let template = "{n, plural, one {{size, number, bytes}} other {{size, number, bytes}}}";
        let out = preprocess_values(template, Some(&values(json!({"n": 1, "size": 4096}))))
            .unwrap()
            .unwrap();
        assert_eq!(out["size"], json!(4));
    }

    #[test]
    fn test_malformed_template_is_error() {
        let result = preprocess_values("{timeInMs, number", Some(&values(json!({"timeInMs": 1}))));
        assert!(matches!(result, Err(I18nError::MalformedTemplate { .. })));
    }
}
