//! Deferred localization for generated reports.
//!
//! Report code never produces final text. It records localizable messages
//! and gets back opaque placeholder tokens, which it stores in the report
//! wherever text belongs. Once the report is complete, the resolver walks
//! the tree and replaces each token with the message formatted for the
//! requested locale, attaching an audit log of every substitution.
//!
//! # Architecture
//!
//! - `catalog`: Default message catalogs and per-locale translation catalogs
//! - `recorder`: `I18nSession` and `Recorder`, the recording phase
//! - `registry`: Usage records backing each placeholder token
//! - `token`: Placeholder token and file-scoped key wire formats
//! - `formatter`: Template selection, value preprocessing and rendering
//! - `resolver`: Tree walk, substitution and the `localeLog` audit log
//! - `icu`, `message_format`, `number`: ICU MessageFormat parsing and rendering
//! - `validator`: Translation catalog checks
//! - `metrics`: Localization counters
//!
//! # Example
//!
//! ```rust,ignore
//! use report_l10n::i18n::{Formatter, I18nSession, LocaleCatalogs, MessageCatalog};
//!
//! let mut session = I18nSession::new();
//! let token = session
//!     .recorder(MessageCatalog::core())
//!     .format("URL", None)?;
//!
//! let mut report = serde_json::json!({ "heading": token });
//! let formatter = Formatter::new(LocaleCatalogs::bundled()?);
//! session.set_locale(Some("es"));
//! session.resolve(&mut report, &formatter)?;
//! ```

pub mod catalog;
mod error;
pub mod formatter;
pub mod icu;
pub mod message_format;
mod metrics;
pub mod number;
pub mod preprocess;
pub mod recorder;
pub mod registry;
pub mod resolver;
pub mod strings;
pub mod token;
mod validator;

/// Locale used when none is requested.
pub const DEFAULT_LOCALE: &str = "en";

/// Named argument values for a message.
pub type MessageValues = serde_json::Map<String, serde_json::Value>;

pub use catalog::{
    CatalogEntry, LocaleCatalogs, LocaleMessage, LocaleMessages, MessageCatalog, MessageRef,
};
pub use error::I18nError;
pub use formatter::{FormattedMessage, Formatter, PSEUDO_LOCALE};
pub use icu::parse_message;
pub use message_format::{FormatOptions, IcuMessageFormat, MessageFormat};
pub use metrics::{L10nMetrics, MetricsReport};
pub use recorder::{I18nSession, Recorder};
pub use registry::{UsageRecord, UsageRegistry};
pub use resolver::{localize, resolve_tree, LocaleLog, LocaleLogEntry, Occurrence, PathSegment};
pub use token::{FileScopedKey, PlaceholderToken};
pub use validator::{CatalogValidator, ValidationReport};
