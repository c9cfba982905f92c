//! Localization metrics and observability.
//!
//! Counts how often resolution found a localized template versus falling back
//! to the default one, so incomplete catalogs show up in logs.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for one formatter.
#[derive(Debug, Default)]
pub struct L10nMetrics {
    /// Messages formatted successfully
    messages_formatted: AtomicUsize,

    /// Lookups that found a template in the requested locale's catalog
    localized_hits: AtomicUsize,

    /// Lookups that fell back to the default template
    fallbacks: AtomicUsize,

    /// Formats that used a substitute locale for number conventions
    pseudo_substitutions: AtomicUsize,
}

impl L10nMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a formatted message.
    pub fn record_formatted(&self) {
        self.messages_formatted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a template found in the locale catalog.
    pub fn record_localized_hit(&self) {
        self.localized_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a fallback to the default template.
    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a pseudo-locale number-convention substitution.
    pub fn record_pseudo_substitution(&self) {
        self.pseudo_substitutions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn messages_formatted(&self) -> usize {
        self.messages_formatted.load(Ordering::Relaxed)
    }

    pub fn localized_hits(&self) -> usize {
        self.localized_hits.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    pub fn pseudo_substitutions(&self) -> usize {
        self.pseudo_substitutions.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.localized_hits();
        let fallbacks = self.fallbacks();
        let lookups = hits + fallbacks;
        let fallback_rate = if lookups > 0 {
            (fallbacks as f64 / lookups as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            messages_formatted: self.messages_formatted(),
            localized_hits: hits,
            fallbacks,
            fallback_rate,
            pseudo_substitutions: self.pseudo_substitutions(),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.messages_formatted.store(0, Ordering::Relaxed);
        self.localized_hits.store(0, Ordering::Relaxed);
        self.fallbacks.store(0, Ordering::Relaxed);
        self.pseudo_substitutions.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of localization counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub messages_formatted: usize,
    pub localized_hits: usize,
    pub fallbacks: usize,

    /// Fallbacks as a percentage (0-100) of template lookups
    pub fallback_rate: f64,

    pub pseudo_substitutions: usize,
}
