//! Error taxonomy for recording, formatting and resolving localized messages.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the i18n pipeline.
///
/// Every variant except the catalog-loading ones describes an authoring or
/// programming defect: the same inputs always fail the same way, so callers
/// should surface them rather than retry.
#[derive(Debug, Error)]
pub enum I18nError {
    /// A template passed to the recorder is not registered in any known catalog.
    #[error("unknown localizable template: {template:?}")]
    UnknownTemplate { template: String },

    /// A placeholder token in the tree has no matching usage record.
    #[error("dangling placeholder {token:?} at {path}")]
    DanglingReference { token: String, path: String },

    /// A template could not be parsed as an ICU message.
    #[error("malformed message template {template:?}: {reason}")]
    MalformedTemplate { template: String, reason: String },

    /// An argument referenced by the template had no value.
    #[error("no value provided for argument '{id}' in {template:?}")]
    MissingValue { id: String, template: String },

    /// An argument value has the wrong shape for its placeholder.
    #[error("invalid value for argument '{id}': {reason}")]
    InvalidValue { id: String, reason: String },

    /// The locale log can only be attached to a JSON object.
    #[error("report root must be a JSON object to receive the locale log")]
    RootNotObject,

    /// The locale log could not be converted to JSON.
    #[error("failed to serialize locale log")]
    LogSerialization(#[source] serde_json::Error),

    /// A locale catalog file could not be read.
    #[error("failed to read locale catalog {path}")]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A locale catalog file is not valid catalog JSON.
    #[error("failed to parse locale catalog {path}")]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl I18nError {
    pub(crate) fn malformed(template: &str, reason: impl Into<String>) -> Self {
        I18nError::MalformedTemplate {
            template: template.to_string(),
            reason: reason.into(),
        }
    }
}
