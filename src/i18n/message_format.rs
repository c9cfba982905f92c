//! Message formatting backend.
//!
//! `MessageFormat` is the seam between the localization pipeline and whatever
//! renders ICU templates. `IcuMessageFormat` is the built-in renderer for the
//! ICU subset understood by `icu::parse_message`.

use crate::i18n::icu::{parse_message, ArgumentFormat, FormatKind, MessageElement, MessageOption};
use crate::i18n::number::{format_date, format_number, format_time, language_of, numeric_value};
use crate::i18n::{I18nError, MessageValues};
use serde_json::Value;
use std::collections::HashMap;

/// Number style used for millisecond durations.
pub const MILLISECONDS_STYLE: &str = "milliseconds";

/// Number style used for byte sizes (rendered as KB after preprocessing).
pub const BYTES_STYLE: &str = "bytes";

/// Options passed to the formatting backend on every call.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Maximum fractional digits per named number style
    pub number_styles: HashMap<String, usize>,

    /// Maximum fractional digits for unstyled (or unknown-style) numbers
    pub default_max_fraction_digits: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        let mut number_styles = HashMap::new();
        number_styles.insert(MILLISECONDS_STYLE.to_string(), 0);

        Self {
            number_styles,
            default_max_fraction_digits: 3,
        }
    }
}

/// Renders a template against a locale and argument values.
pub trait MessageFormat: Send + Sync {
    /// Format `template` for `locale`.
    ///
    /// # Errors
    /// Returns an `I18nError` when the template does not parse or a value
    /// required by the template is missing or has the wrong type.
    fn format(
        &self,
        template: &str,
        locale: &str,
        values: Option<&MessageValues>,
        options: &FormatOptions,
    ) -> Result<String, I18nError>;
}

/// Built-in ICU renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct IcuMessageFormat;

impl MessageFormat for IcuMessageFormat {
    fn format(
        &self,
        template: &str,
        locale: &str,
        values: Option<&MessageValues>,
        options: &FormatOptions,
    ) -> Result<String, I18nError> {
        let elements = parse_message(template)?;
        let ctx = RenderContext {
            template,
            locale,
            language: language_of(locale),
            values,
            options,
        };

        let mut out = String::new();
        ctx.render(&elements, None, &mut out)?;
        Ok(out)
    }
}

struct RenderContext<'a> {
    template: &'a str,
    locale: &'a str,
    language: String,
    values: Option<&'a MessageValues>,
    options: &'a FormatOptions,
}

impl RenderContext<'_> {
    fn render(
        &self,
        elements: &[MessageElement],
        pound: Option<f64>,
        out: &mut String,
    ) -> Result<(), I18nError> {
        for element in elements {
            match element {
                MessageElement::Literal(text) => out.push_str(text),
                MessageElement::Argument { id, format: None } => {
                    out.push_str(&display_value(self.value(id)?));
                }
                MessageElement::Argument {
                    id,
                    format: Some(format),
                } => out.push_str(&self.render_formatted(id, format)?),
                MessageElement::Plural {
                    id,
                    offset,
                    ordinal,
                    options,
                } => {
                    let n = self.numeric(id)?;
                    let shifted = n - offset;
                    let option = options
                        .iter()
                        .find(|option| exact_selector(&option.selector) == Some(n))
                        .or_else(|| {
                            let category = plural_category(shifted, &self.language, *ordinal);
                            find_option(options, category)
                        })
                        .or_else(|| find_option(options, "other"));
                    if let Some(option) = option {
                        self.render(&option.message, Some(shifted), out)?;
                    }
                }
                MessageElement::Select { id, options } => {
                    let key = match self.value(id)? {
                        Value::String(s) => s.clone(),
                        other => display_value(other),
                    };
                    let option = find_option(options, &key).or_else(|| find_option(options, "other"));
                    if let Some(option) = option {
                        self.render(&option.message, pound, out)?;
                    }
                }
                MessageElement::Pound => match pound {
                    Some(n) => out.push_str(&format_number(
                        n,
                        self.locale,
                        self.options.default_max_fraction_digits,
                    )),
                    None => out.push('#'),
                },
            }
        }
        Ok(())
    }

    fn render_formatted(&self, id: &str, format: &ArgumentFormat) -> Result<String, I18nError> {
        let n = self.numeric(id)?;
        let style = format.style.as_deref();

        match format.kind {
            FormatKind::Number => Ok(match style {
                Some("integer") => format_number(n, self.locale, 0),
                Some("percent") => format!(
                    "{}{}",
                    format_number(n * 100.0, self.locale, 0),
                    percent_suffix(&self.language)
                ),
                Some(name) => {
                    let digits = self
                        .options
                        .number_styles
                        .get(name)
                        .copied()
                        .unwrap_or(self.options.default_max_fraction_digits);
                    format_number(n, self.locale, digits)
                }
                None => format_number(n, self.locale, self.options.default_max_fraction_digits),
            }),
            FormatKind::Date => {
                format_date(n, self.locale, style).ok_or_else(|| out_of_range(id, n))
            }
            FormatKind::Time => {
                format_time(n, self.locale, style).ok_or_else(|| out_of_range(id, n))
            }
        }
    }

    fn value(&self, id: &str) -> Result<&Value, I18nError> {
        self.values
            .and_then(|values| values.get(id))
            .filter(|value| !value.is_null())
            .ok_or_else(|| I18nError::MissingValue {
                id: id.to_string(),
                template: self.template.to_string(),
            })
    }

    fn numeric(&self, id: &str) -> Result<f64, I18nError> {
        let value = self.value(id)?;
        numeric_value(value).ok_or_else(|| I18nError::InvalidValue {
            id: id.to_string(),
            reason: format!("expected a number, got {}", value),
        })
    }
}

fn out_of_range(id: &str, n: f64) -> I18nError {
    I18nError::InvalidValue {
        id: id.to_string(),
        reason: format!("timestamp {} is out of range", n),
    }
}

/// Percent sign with the spacing CLDR uses for the language.
fn percent_suffix(language: &str) -> &'static str {
    match language {
        "fr" => "\u{202f}%",
        "de" | "es" | "sv" | "nb" | "da" | "fi" | "cs" | "sk" => "\u{a0}%",
        _ => "%",
    }
}

fn find_option<'a>(options: &'a [MessageOption], selector: &str) -> Option<&'a MessageOption> {
    options.iter().find(|option| option.selector == selector)
}

fn exact_selector(selector: &str) -> Option<f64> {
    selector.strip_prefix('=')?.parse().ok()
}

/// Render a value the way a plain `{id}` argument shows it.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Simplified CLDR plural categories.
fn plural_category(n: f64, language: &str, ordinal: bool) -> &'static str {
    let is_integer = n.fract() == 0.0;

    if ordinal {
        if language != "en" || !is_integer {
            return "other";
        }
        let i = n.abs() as u64;
        return match (i % 10, i % 100) {
            (1, m) if m != 11 => "one",
            (2, m) if m != 12 => "two",
            (3, m) if m != 13 => "few",
            _ => "other",
        };
    }

    match language {
        "ja" | "zh" | "ko" | "th" | "vi" | "id" => "other",
        "fr" | "pt" if (0.0..2.0).contains(&n) => "one",
        "fr" | "pt" => "other",
        _ if is_integer && n.abs() == 1.0 => "one",
        _ => "other",
    }
}
