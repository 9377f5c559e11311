use thiserror::Error;

#[derive(Debug, Error)]
pub enum KtpError {
    #[error("OCR detail read error: {0}")]
    DetailReadError(String),
    #[error("Record store error: {0}")]
    StoreError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid pattern: {0}")]
    PatternError(#[from] regex::Error),
}
