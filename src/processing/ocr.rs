use crate::models::RecognizedToken;
use crate::utils::KtpError;
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

lazy_static! {
    // Detail files written by the OCR engine carry one `Text: '...'` span per
    // recognised region; this pattern is the compatibility contract.
    static ref TEXT_SPAN: Regex = Regex::new(r"Text:\s*'([^']+)'").unwrap();
    static ref CONFIDENCE: Regex = Regex::new(r"^[^\n]*?Confidence:\s*([0-9]*\.?[0-9]+)").unwrap();
}

/// Reads token streams out of OCR detail output
pub struct OcrDetailReader;

impl OcrDetailReader {
    /// Every quoted text span, trimmed, in document order
    pub fn extract_tokens(text: &str) -> Vec<String> {
        TEXT_SPAN
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .collect()
    }

    /// Text spans together with the confidence score printed after them on
    /// the same line, when there is one
    pub fn extract_recognized(text: &str) -> Vec<RecognizedToken> {
        TEXT_SPAN
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let span = caps.get(1)?;
                let confidence = CONFIDENCE
                    .captures(&text[whole.end()..])
                    .and_then(|c| c[1].parse::<f32>().ok());
                Some(RecognizedToken {
                    text: span.as_str().trim().to_string(),
                    confidence,
                })
            })
            .collect()
    }

    /// Drops tokens scored below `threshold`; unscored tokens are kept
    pub fn filter_by_confidence(tokens: Vec<RecognizedToken>, threshold: f32) -> Vec<String> {
        tokens
            .into_iter()
            .filter(|t| t.confidence.map_or(true, |c| c >= threshold))
            .map(|t| t.text)
            .collect()
    }

    pub fn read_detail_file(path: &Path) -> Result<String, KtpError> {
        let bytes = fs::read(path).map_err(|e| {
            KtpError::DetailReadError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        debug!("Read {} bytes of OCR detail from {}", bytes.len(), path.display());
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn read_tokens(path: &Path, confidence_threshold: f32) -> Result<Vec<String>, KtpError> {
        let text = Self::read_detail_file(path)?;
        let recognized = Self::extract_recognized(&text);
        let total = recognized.len();
        let tokens = Self::filter_by_confidence(recognized, confidence_threshold);
        info!(
            "Extracted {} tokens from {} ({} below confidence {})",
            tokens.len(),
            path.display(),
            total - tokens.len(),
            confidence_threshold
        );
        Ok(tokens)
    }

    /// Most recently modified file in `dir` whose name ends with `suffix`
    pub fn find_latest_detail(dir: &Path, suffix: &str) -> Result<Option<PathBuf>, KtpError> {
        let entries = fs::read_dir(dir).map_err(|e| {
            KtpError::DetailReadError(format!("Failed to list {}: {}", dir.display(), e))
        })?;

        let mut latest: Option<(SystemTime, PathBuf)> = None;
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            let matches = path
                .file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| n.ends_with(suffix));
            if !matches || !path.is_file() {
                continue;
            }
            let modified = entry.metadata()?.modified()?;
            if latest.as_ref().map_or(true, |(t, _)| modified > *t) {
                latest = Some((modified, path));
            }
        }
        Ok(latest.map(|(_, path)| path))
    }
}
