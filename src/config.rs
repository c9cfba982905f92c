use crate::i18n::DEFAULT_LOCALE;
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Inputs saved by the report-generation run
    pub report_path: PathBuf,
    pub registry_path: PathBuf,

    // Localization
    pub locale: String,
    pub locales_dir: Option<PathBuf>,

    // Output (stdout when unset)
    pub output_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            report_path: std::env::var("REPORT_PATH")
                .context("REPORT_PATH not set")?
                .into(),
            registry_path: std::env::var("REGISTRY_PATH")
                .context("REGISTRY_PATH not set")?
                .into(),

            locale: std::env::var("REPORT_LOCALE")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            locales_dir: std::env::var("LOCALES_DIR")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),

            output_path: std::env::var("OUTPUT_PATH")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        })
    }
}
