pub mod config;
pub mod ktp_extractor;
pub mod models;
pub mod processing;
pub mod storage;
pub mod utils;
pub mod validation;

pub use config::AppConfig;
pub use ktp_extractor::{KtpExtractor, ProcessedDocument};
