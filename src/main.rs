use anyhow::{Context, Result};
use report_l10n::config::Config;
use report_l10n::i18n::{
    resolve_tree, CatalogValidator, Formatter, LocaleCatalogs, MessageCatalog, UsageRegistry,
};
use serde_json::Value;
use std::fs;
use tracing::{info, warn};

fn main() -> Result<()> {
    // Load .env file (ignored when variables come from the environment)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("report_l10n=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        "Localizing {} into {}",
        config.report_path.display(),
        config.locale
    );

    // Step 1: Load the pristine report and the registry saved with it
    let report = fs::read_to_string(&config.report_path)
        .with_context(|| format!("Failed to read report {}", config.report_path.display()))?;
    let mut report: Value = serde_json::from_str(&report).context("Failed to parse report")?;

    let registry = fs::read_to_string(&config.registry_path).with_context(|| {
        format!(
            "Failed to read registry {}",
            config.registry_path.display()
        )
    })?;
    let registry: UsageRegistry =
        serde_json::from_str(&registry).context("Failed to parse registry")?;
    info!("Loaded {} recorded messages", registry.len());

    // Step 2: Load translation catalogs
    let mut catalogs = LocaleCatalogs::bundled().context("Failed to load bundled catalogs")?;
    if let Some(dir) = &config.locales_dir {
        let loaded = catalogs
            .load_dir(dir)
            .with_context(|| format!("Failed to load catalogs from {}", dir.display()))?;
        info!("Loaded {} locale catalogs from {}", loaded, dir.display());
    }

    match catalogs.messages(&config.locale) {
        Some(messages) => {
            let validation =
                CatalogValidator::validate(MessageCatalog::core(), &config.locale, messages);
            for error in &validation.errors {
                warn!("Catalog error: {}", error);
            }
            for warning in &validation.warnings {
                warn!("Catalog warning: {}", warning);
            }
        }
        None => warn!(
            "No catalog for locale {}, messages will use default templates",
            config.locale
        ),
    }

    // Step 3: Resolve placeholders
    let formatter = Formatter::new(catalogs);
    let log = resolve_tree(&mut report, &config.locale, &registry, &formatter)
        .context("Failed to localize report")?;

    // Step 4: Write the localized report
    let output = serde_json::to_string_pretty(&report)?;
    match &config.output_path {
        Some(path) => {
            fs::write(path, output)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote localized report to {}", path.display());
        }
        None => println!("{}", output),
    }

    let metrics = formatter.metrics().report();
    info!(
        "Substituted {} placeholders: {} localized, {} fallbacks ({:.1}% fallback rate)",
        log.occurrence_count(),
        metrics.localized_hits,
        metrics.fallbacks,
        metrics.fallback_rate
    );

    Ok(())
}
