//! Locale-aware number and date rendering.
//!
//! Grouping separators, decimal marks and minus signs come from `num-format`'s
//! CLDR tables; date patterns are a small per-language table rendered with
//! `chrono`'s localized month names. Unknown locales fall back to English
//! conventions.

use chrono::{DateTime, Locale as DateLocale, Utc};
use num_format::{Locale as NumLocale, ToFormattedString};
use serde_json::Value;

/// Primary language subtag in lowercase ("de-DE" -> "de", "pt_BR" -> "pt").
pub fn language_of(locale: &str) -> String {
    locale
        .split(|c| c == '-' || c == '_')
        .next()
        .unwrap_or("en")
        .to_ascii_lowercase()
}

/// Numeric reading of an argument value: JSON numbers, or strings holding one.
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Resolve the `num-format` locale: exact name first, then the language.
fn resolve_num_locale(locale: &str) -> NumLocale {
    let normalized = locale.replace('_', "-");
    NumLocale::from_name(normalized.as_str())
        .or_else(|_| NumLocale::from_name(language_of(locale).as_str()))
        .unwrap_or(NumLocale::en)
}

/// Format a number with at most `max_fraction_digits` fractional digits.
///
/// Trailing fractional zeros are dropped, so `1230.0` renders as `1,230` in
/// English and `1.5` stays `1.5`.
pub fn format_number(value: f64, locale: &str, max_fraction_digits: usize) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "NaN".to_string()
        } else if value > 0.0 {
            "∞".to_string()
        } else {
            "-∞".to_string()
        };
    }

    let num_locale = resolve_num_locale(locale);
    let fixed = format!(
        "{:.*}",
        max_fraction_digits,
        round_half_away(value.abs(), max_fraction_digits)
    );
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let grouped = match int_part.parse::<u64>() {
        Ok(n) => n.to_formatted_string(&num_locale),
        // Beyond u64: keep the digits ungrouped rather than lose precision
        Err(_) => int_part.to_string(),
    };

    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    let mut out = String::new();
    if value.is_sign_negative() && !is_zero {
        out.push_str(num_locale.minus_sign());
    }
    out.push_str(&grouped);
    if !frac_part.is_empty() {
        out.push_str(num_locale.decimal());
        out.push_str(frac_part);
    }
    out
}

/// Round to `digits` fractional digits, halves away from zero.
fn round_half_away(value: f64, digits: usize) -> f64 {
    let factor = 10f64.powi(digits.min(15) as i32);
    let scaled = value * factor;
    if scaled.is_finite() {
        scaled.round() / factor
    } else {
        value
    }
}

/// Resolve the `chrono` locale for month names: exact name, then the
/// language's own region, then POSIX (English).
fn resolve_date_locale(locale: &str) -> DateLocale {
    let lang = language_of(locale);
    DateLocale::try_from(locale.replace('-', "_").as_str())
        .or_else(|_| DateLocale::try_from(format!("{}_{}", lang, lang.to_ascii_uppercase()).as_str()))
        .unwrap_or(DateLocale::POSIX)
}

/// Format an epoch-milliseconds timestamp as a date (UTC).
pub fn format_date(epoch_ms: f64, locale: &str, style: Option<&str>) -> Option<String> {
    let dt = timestamp(epoch_ms)?;
    let lang = language_of(locale);

    let pattern = match (style.unwrap_or("short"), lang.as_str()) {
        ("long" | "full", "de") => "%-d. %B %Y",
        ("long" | "full", "es" | "pt") => "%-d de %B de %Y",
        ("long" | "full", "fr" | "it") => "%-d %B %Y",
        ("long" | "full", _) => "%B %-d, %Y",
        ("medium", "de") => "%d.%m.%Y",
        ("medium", "fr" | "es" | "it" | "pt") => "%-d %b %Y",
        ("medium", _) => "%b %-d, %Y",
        (_, "ja" | "zh" | "ko") => "%Y/%m/%d",
        (_, "de") => "%d.%m.%y",
        (_, "fr" | "es" | "it" | "pt") => "%d/%m/%Y",
        _ => "%-m/%-d/%y",
    };

    Some(dt.format_localized(pattern, resolve_date_locale(locale)).to_string())
}

/// Format an epoch-milliseconds timestamp as a time of day (UTC).
pub fn format_time(epoch_ms: f64, locale: &str, style: Option<&str>) -> Option<String> {
    let dt = timestamp(epoch_ms)?;
    let lang = language_of(locale);
    let with_seconds = matches!(style, Some("medium" | "long" | "full"));

    let pattern = match (lang.as_str(), with_seconds) {
        ("en", false) => "%-I:%M %p",
        ("en", true) => "%-I:%M:%S %p",
        (_, false) => "%H:%M",
        (_, true) => "%H:%M:%S",
    };

    Some(dt.format(pattern).to_string())
}

fn timestamp(epoch_ms: f64) -> Option<DateTime<Utc>> {
    if !epoch_ms.is_finite() {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(epoch_ms.round() as i64)
}
