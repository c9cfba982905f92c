//! ICU message syntax parser.
//!
//! Parses the subset of ICU MessageFormat used by report strings into typed
//! elements. The formatter renders these elements, and the value preprocessor
//! reads their format/style metadata to decide which numeric transforms apply.

use crate::i18n::I18nError;
use std::collections::BTreeSet;

/// Kind of a formatted argument (`{id, <kind>, <style>}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Number,
    Date,
    Time,
}

/// Format metadata attached to an argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentFormat {
    pub kind: FormatKind,

    /// Style name after the second comma (e.g. `milliseconds`, `bytes`, `short`)
    pub style: Option<String>,
}

/// One branch of a `plural` or `select` argument.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageOption {
    /// Selector such as `=1`, `one`, `other` or a select keyword
    pub selector: String,
    pub message: Vec<MessageElement>,
}

/// A parsed piece of an ICU message.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageElement {
    /// Plain text, with quoting already removed
    Literal(String),

    /// `{id}` or `{id, number|date|time[, style]}`
    Argument {
        id: String,
        format: Option<ArgumentFormat>,
    },

    /// `{id, plural|selectordinal, [offset:n] selector {message} ...}`
    Plural {
        id: String,
        offset: f64,
        ordinal: bool,
        options: Vec<MessageOption>,
    },

    /// `{id, select, keyword {message} ...}`
    Select {
        id: String,
        options: Vec<MessageOption>,
    },

    /// `#` inside a plural branch
    Pound,
}

/// Parse an ICU message template into elements.
///
/// # Errors
/// Returns `I18nError::MalformedTemplate` when the template is not valid
/// message syntax (unbalanced braces, empty argument names, unknown argument
/// types, plural/select without an `other` branch, bad offsets).
pub fn parse_message(template: &str) -> Result<Vec<MessageElement>, I18nError> {
    let mut parser = Parser::new(template);
    let elements = parser.parse_elements(false)?;

    if parser.pos < parser.chars.len() {
        return Err(I18nError::malformed(
            template,
            format!("unexpected '}}' at offset {}", parser.pos),
        ));
    }

    Ok(elements)
}

/// Every formatted argument in the message, including those nested in
/// plural/select branches, in document order.
pub fn formatted_arguments(elements: &[MessageElement]) -> Vec<(&str, &ArgumentFormat)> {
    let mut found = Vec::new();
    collect_formatted(elements, &mut found);
    found
}

fn collect_formatted<'a>(
    elements: &'a [MessageElement],
    found: &mut Vec<(&'a str, &'a ArgumentFormat)>,
) {
    for element in elements {
        match element {
            MessageElement::Argument {
                id,
                format: Some(format),
            } => found.push((id.as_str(), format)),
            MessageElement::Plural { options, .. } | MessageElement::Select { options, .. } => {
                for option in options {
                    collect_formatted(&option.message, found);
                }
            }
            _ => {}
        }
    }
}

/// Names of all arguments referenced anywhere in the message.
pub fn argument_ids(elements: &[MessageElement]) -> BTreeSet<String> {
    let mut ids = BTreeSet::new();
    collect_ids(elements, &mut ids);
    ids
}

fn collect_ids(elements: &[MessageElement], ids: &mut BTreeSet<String>) {
    for element in elements {
        match element {
            MessageElement::Argument { id, .. } => {
                ids.insert(id.clone());
            }
            MessageElement::Plural { id, options, .. } | MessageElement::Select { id, options } => {
                ids.insert(id.clone());
                for option in options {
                    collect_ids(&option.message, ids);
                }
            }
            MessageElement::Literal(_) | MessageElement::Pound => {}
        }
    }
}

struct Parser<'a> {
    template: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(template: &'a str) -> Self {
        Self {
            template,
            chars: template.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn error(&self, reason: impl Into<String>) -> I18nError {
        I18nError::malformed(self.template, reason)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), I18nError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => Err(self.error(format!(
                "expected '{}' at offset {}, found '{}'",
                expected, self.pos, c
            ))),
            None => Err(self.error(format!("expected '{}' before end of message", expected))),
        }
    }

    /// Read a token up to whitespace or ICU syntax characters.
    fn read_word(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, '{' | '}' | ',') {
                break;
            }
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn parse_elements(&mut self, in_plural: bool) -> Result<Vec<MessageElement>, I18nError> {
        let mut elements = Vec::new();
        let mut text = String::new();

        while let Some(c) = self.peek() {
            match c {
                '{' => {
                    flush_literal(&mut text, &mut elements);
                    self.pos += 1;
                    elements.push(self.parse_argument(in_plural)?);
                }
                '}' => break,
                '#' if in_plural => {
                    flush_literal(&mut text, &mut elements);
                    self.pos += 1;
                    elements.push(MessageElement::Pound);
                }
                '\'' => {
                    self.pos += 1;
                    self.parse_quoted(&mut text, in_plural);
                }
                _ => {
                    text.push(c);
                    self.pos += 1;
                }
            }
        }

        flush_literal(&mut text, &mut elements);
        Ok(elements)
    }

    /// Handle text following an apostrophe.
    fn parse_quoted(&mut self, text: &mut String, in_plural: bool) {
        match self.peek() {
            Some('\'') => {
                text.push('\'');
                self.pos += 1;
            }
            Some(c) if c == '{' || c == '}' || (c == '#' && in_plural) => {
                while let Some(c) = self.peek() {
                    self.pos += 1;
                    if c != '\'' {
                        text.push(c);
                        continue;
                    }
                    if self.peek() == Some('\'') {
                        text.push('\'');
                        self.pos += 1;
                    } else {
                        break;
                    }
                }
            }
            _ => text.push('\''),
        }
    }

    fn parse_argument(&mut self, in_plural: bool) -> Result<MessageElement, I18nError> {
        self.skip_whitespace();
        let id = self.read_word();
        if id.is_empty() {
            return Err(self.error(format!("empty argument name at offset {}", self.pos)));
        }
        self.skip_whitespace();

        match self.peek() {
            Some('}') => {
                self.pos += 1;
                Ok(MessageElement::Argument { id, format: None })
            }
            Some(',') => {
                self.pos += 1;
                self.skip_whitespace();
                let kind = self.read_word();
                self.skip_whitespace();
                match kind.as_str() {
                    "number" => self.parse_simple_format(id, FormatKind::Number),
                    "date" => self.parse_simple_format(id, FormatKind::Date),
                    "time" => self.parse_simple_format(id, FormatKind::Time),
                    "plural" | "selectordinal" => {
                        self.expect(',')?;
                        let offset = self.parse_offset()?;
                        let options = self.parse_options(true)?;
                        Ok(MessageElement::Plural {
                            id,
                            offset,
                            ordinal: kind == "selectordinal",
                            options,
                        })
                    }
                    "select" => {
                        self.expect(',')?;
                        let options = self.parse_options(in_plural)?;
                        Ok(MessageElement::Select { id, options })
                    }
                    "" => Err(self.error(format!("missing type for argument '{}'", id))),
                    other => Err(self.error(format!(
                        "unknown argument type '{}' for '{}'",
                        other, id
                    ))),
                }
            }
            Some(c) => Err(self.error(format!(
                "unexpected '{}' in argument '{}' at offset {}",
                c, id, self.pos
            ))),
            None => Err(self.error(format!("unclosed argument '{}'", id))),
        }
    }

    fn parse_simple_format(
        &mut self,
        id: String,
        kind: FormatKind,
    ) -> Result<MessageElement, I18nError> {
        let style = match self.peek() {
            Some('}') => None,
            Some(',') => {
                self.pos += 1;
                let start = self.pos;
                while let Some(c) = self.peek() {
                    if c == '}' {
                        break;
                    }
                    if c == '{' {
                        return Err(self.error(format!("unexpected '{{' in style of '{}'", id)));
                    }
                    self.pos += 1;
                }
                let style: String = self.chars[start..self.pos].iter().collect();
                let style = style.trim();
                (!style.is_empty()).then(|| style.to_string())
            }
            _ => {
                return Err(self.error(format!("expected ',' or '}}' after type of '{}'", id)));
            }
        };

        self.expect('}')?;
        Ok(MessageElement::Argument {
            id,
            format: Some(ArgumentFormat { kind, style }),
        })
    }

    fn parse_offset(&mut self) -> Result<f64, I18nError> {
        self.skip_whitespace();
        let rest: String = self.chars[self.pos..].iter().take(7).collect();
        if rest != "offset:" {
            return Ok(0.0);
        }
        self.pos += 7;
        self.skip_whitespace();

        let raw = self.read_word();
        raw.parse::<f64>()
            .map_err(|_| self.error(format!("invalid plural offset '{}'", raw)))
    }

    fn parse_options(&mut self, in_plural: bool) -> Result<Vec<MessageOption>, I18nError> {
        let mut options = Vec::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('}') => {
                    self.pos += 1;
                    break;
                }
                None => return Err(self.error("unclosed plural/select argument")),
                _ => {}
            }

            let selector = self.read_word();
            if selector.is_empty() {
                return Err(self.error(format!("missing selector at offset {}", self.pos)));
            }
            self.skip_whitespace();
            self.expect('{')?;
            let message = self.parse_elements(in_plural)?;
            self.expect('}')?;

            options.push(MessageOption { selector, message });
        }

        if !options.iter().any(|option| option.selector == "other") {
            return Err(self.error("plural/select argument requires an 'other' option"));
        }

        Ok(options)
    }
}

fn flush_literal(text: &mut String, elements: &mut Vec<MessageElement>) {
    if !text.is_empty() {
        elements.push(MessageElement::Literal(std::mem::take(text)));
    }
}
