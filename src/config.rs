use crate::models::ExtractionRules;
use crate::utils::KtpError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application settings, loaded from an optional JSON file. Missing keys
/// take their defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// The single accumulating record store
    pub output_path: PathBuf,
    /// Where the OCR engine leaves its detail files
    pub detail_dir: PathBuf,
    pub detail_suffix: String,
    /// Tokens scored below this are dropped before parsing
    pub confidence_threshold: f32,
    pub rules_path: Option<PathBuf>,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            output_path: PathBuf::from("assets/output/ocr_results.csv"),
            detail_dir: PathBuf::from("assets/output"),
            detail_suffix: "_detail.txt".to_string(),
            confidence_threshold: 0.0,
            rules_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_json_str(json: &str) -> Result<Self, KtpError> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, KtpError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            KtpError::ConfigError(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Range checks, rerun after command line overrides
    pub fn check(&self) -> Result<(), KtpError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(KtpError::ConfigError(format!(
                "confidence_threshold must be within 0..=1, got {}",
                self.confidence_threshold
            )));
        }
        if self.detail_suffix.is_empty() {
            return Err(KtpError::ConfigError("detail_suffix must not be empty".to_string()));
        }
        Ok(())
    }

    /// Built-in rules unless a rules file is configured
    pub fn extraction_rules(&self) -> Result<ExtractionRules, KtpError> {
        match &self.rules_path {
            Some(path) => ExtractionRules::from_json_file(path),
            None => Ok(ExtractionRules::default()),
        }
    }
}
