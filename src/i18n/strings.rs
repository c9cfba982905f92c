//! Shared UI strings available to every report component.
//!
//! Templates are ICU messages in the default locale (English). Localized
//! versions live in the locale catalogs under the file-scoped key
//! `core/lib/i18n!#<key>`.

use crate::i18n::CatalogEntry;

/// Origin of the core catalog, used as the first half of its message keys.
pub const CORE_ORIGIN: &str = "core/lib/i18n";

// ==================== Units ====================

/// A duration in milliseconds, rounded to the nearest 10ms.
pub const MS: CatalogEntry = CatalogEntry::new("ms", "{timeInMs, number, milliseconds}\u{a0}ms");

/// A size in kilobytes, converted from a byte count.
pub const KB: CatalogEntry = CatalogEntry::new("kb", "{sizeInBytes, number, bytes}\u{a0}KB");

// ==================== Display Values ====================

/// Summary shown when an audit could save bytes.
pub const DISPLAY_VALUE_BYTE_SAVINGS: CatalogEntry = CatalogEntry::new(
    "displayValueByteSavings",
    "Potential savings of {wastedBytes, number, bytes}\u{a0}KB",
);

/// Summary shown when an audit could save time.
pub const DISPLAY_VALUE_MS_SAVINGS: CatalogEntry = CatalogEntry::new(
    "displayValueMsSavings",
    "Potential savings of {wastedMs, number, milliseconds}\u{a0}ms",
);

/// Count of DOM elements matched by an audit.
pub const DISPLAY_VALUE_ELEMENTS_FOUND: CatalogEntry = CatalogEntry::new(
    "displayValueElementsFound",
    "{nodeCount, plural, =1 {1 element found} other {# elements found}}",
);

// ==================== Table Columns ====================

pub const COLUMN_URL: CatalogEntry = CatalogEntry::new("columnURL", "URL");
pub const COLUMN_SIZE: CatalogEntry = CatalogEntry::new("columnSize", "Size (KB)");
pub const COLUMN_CACHE_TTL: CatalogEntry = CatalogEntry::new("columnCacheTTL", "Cache TTL");
pub const COLUMN_WASTED_BYTES: CatalogEntry =
    CatalogEntry::new("columnWastedBytes", "Potential Savings (KB)");
pub const COLUMN_WASTED_MS: CatalogEntry =
    CatalogEntry::new("columnWastedMs", "Potential Savings (ms)");
pub const COLUMN_TIME_SPENT: CatalogEntry = CatalogEntry::new("columnTimeSpent", "Time Spent");

// ==================== Report Sections ====================

pub const PASSED_AUDITS_GROUP_TITLE: CatalogEntry =
    CatalogEntry::new("passedAuditsGroupTitle", "Passed audits");
pub const NOT_APPLICABLE_AUDITS_GROUP_TITLE: CatalogEntry =
    CatalogEntry::new("notApplicableAuditsGroupTitle", "Not applicable");
pub const WARNING_HEADER: CatalogEntry = CatalogEntry::new("warningHeader", "Warnings: ");

/// Every core string, in catalog order.
pub const CORE_STRINGS: &[CatalogEntry] = &[
    MS,
    KB,
    DISPLAY_VALUE_BYTE_SAVINGS,
    DISPLAY_VALUE_MS_SAVINGS,
    DISPLAY_VALUE_ELEMENTS_FOUND,
    COLUMN_URL,
    COLUMN_SIZE,
    COLUMN_CACHE_TTL,
    COLUMN_WASTED_BYTES,
    COLUMN_WASTED_MS,
    COLUMN_TIME_SPENT,
    PASSED_AUDITS_GROUP_TITLE,
    NOT_APPLICABLE_AUDITS_GROUP_TITLE,
    WARNING_HEADER,
];
