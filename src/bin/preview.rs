//! Preview binary - builds a sample report and prints it in several locales
//!
//! Usage:
//!   cargo run --bin preview                      # Print the sample in en, es and en-XA
//!   cargo run --bin preview -- es de             # Print the sample in the given locales
//!   cargo run --bin preview -- --save out        # Also save report.json + registry.json to out/
//!
//! The saved pair can be localized later with the main binary
//! (REPORT_PATH=out/report.json REGISTRY_PATH=out/registry.json).

use anyhow::{Context, Result};
use chrono::Utc;
use report_l10n::i18n::{
    localize, strings, CatalogEntry, Formatter, I18nSession, LocaleCatalogs, MessageCatalog,
    MessageValues, PSEUDO_LOCALE,
};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tracing::info;

const CACHE_TTL_ORIGIN: &str = "audits/uses-long-cache-ttl";

const CACHE_TTL_STRINGS: &[CatalogEntry] = &[
    CatalogEntry::new("title", "Uses efficient cache policy on static assets"),
    CatalogEntry::new(
        "failureTitle",
        "Serve static assets with an efficient cache policy",
    ),
    CatalogEntry::new(
        "displayValue",
        "{itemCount, plural, =1 {1 resource found} other {# resources found}}",
    ),
];

fn values(value: Value) -> Option<MessageValues> {
    value.as_object().cloned()
}

/// Build a small report the way an audit would, recording every string.
fn build_sample_report(session: &mut I18nSession) -> Result<Value> {
    let catalog = MessageCatalog::new(CACHE_TTL_ORIGIN, CACHE_TTL_STRINGS);
    let mut recorder = session.recorder(&catalog);

    let items = [
        ("https://example.com/app.js", 86_400_000_u64, 48_213_u64),
        ("https://example.com/styles.css", 0, 15_360),
    ];

    let mut rows = Vec::new();
    for (url, ttl_ms, bytes) in items {
        rows.push(json!({
            "url": url,
            "cacheLifetime": recorder.format(strings::MS.template, values(json!({"timeInMs": ttl_ms})))?,
            "totalBytes": recorder.format(strings::KB.template, values(json!({"sizeInBytes": bytes})))?,
        }));
    }

    let item_count = rows.len();
    Ok(json!({
        "fetchTime": Utc::now().to_rfc3339(),
        "audits": {
            "uses-long-cache-ttl": {
                "title": recorder.format_key("failureTitle", None)?,
                "displayValue": recorder.format_key("displayValue", values(json!({"itemCount": item_count})))?,
                "details": {
                    "headings": [
                        {"key": "url", "text": recorder.format(strings::COLUMN_URL.template, None)?},
                        {"key": "cacheLifetime", "text": recorder.format(strings::COLUMN_CACHE_TTL.template, None)?},
                        {"key": "totalBytes", "text": recorder.format(strings::COLUMN_SIZE.template, None)?},
                    ],
                    "items": rows,
                },
            },
            "bootup-time": {
                "displayValue": recorder.format(
                    strings::DISPLAY_VALUE_MS_SAVINGS.template,
                    values(json!({"wastedMs": 1234.5})),
                )?,
            },
        },
        "categoryGroups": {
            "passed": recorder.format(strings::PASSED_AUDITS_GROUP_TITLE.template, None)?,
            "notApplicable": recorder.format(strings::NOT_APPLICABLE_AUDITS_GROUP_TITLE.template, None)?,
        },
    }))
}

/// Save the pristine report and its registry so they can be resolved later.
fn save_sample(dir: &Path, report: &Value, session: &I18nSession) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let report_path = dir.join("report.json");
    fs::write(&report_path, serde_json::to_string_pretty(report)?)
        .context("Failed to write report")?;

    let registry_path = dir.join("registry.json");
    fs::write(
        &registry_path,
        serde_json::to_string_pretty(session.registry())?,
    )
    .context("Failed to write registry")?;

    info!(
        "Saved report to {} and registry to {}",
        report_path.display(),
        registry_path.display()
    );
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("report_l10n=info".parse()?),
        )
        .init();

    // Load environment from .env file
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let mut save_dir = None;
    let mut locales = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--save" {
            save_dir = Some(args.next().context("--save requires a directory")?);
        } else {
            locales.push(arg);
        }
    }
    if locales.is_empty() {
        locales = vec!["en".to_string(), "es".to_string(), PSEUDO_LOCALE.to_string()];
    }

    let mut session = I18nSession::new();
    let report = build_sample_report(&mut session)?;
    info!("Recorded {} distinct messages", session.registry().len());

    if let Some(dir) = save_dir {
        save_sample(Path::new(&dir), &report, &session)?;
    }

    let formatter = Formatter::new(LocaleCatalogs::bundled()?);
    for locale in &locales {
        let localized = localize(&report, locale, session.registry(), &formatter)
            .with_context(|| format!("Failed to localize sample into {}", locale))?;

        println!("\n{}", "=".repeat(60));
        println!("LOCALE: {}", locale);
        println!("{}\n", "=".repeat(60));
        println!("{}", serde_json::to_string_pretty(&localized)?);
    }

    let metrics = formatter.metrics().report();
    info!(
        "Formatted {} messages ({} localized, {} fallbacks)",
        metrics.messages_formatted, metrics.localized_hits, metrics.fallbacks
    );

    Ok(())
}
