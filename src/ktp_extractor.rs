use crate::config::AppConfig;
use crate::models::{ExtractionRules, FieldRecord, RecordValidationResult};
use crate::processing::{FieldExtractor, OcrDetailReader};
use crate::storage::{CsvRecordStore, RecordSink};
use crate::utils::KtpError;
use crate::validation::RecordValidator;
use chrono::Local;
use log::{info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Outcome of processing one OCR detail file
#[derive(Debug, Serialize)]
pub struct ProcessedDocument {
    pub source_file: String,
    pub token_count: usize,
    pub record: FieldRecord,
    pub validation: RecordValidationResult,
    pub location: PathBuf,
}

pub struct KtpExtractor<S: RecordSink = CsvRecordStore> {
    extractor: FieldExtractor,
    sink: S,
    confidence_threshold: f32,
}

impl KtpExtractor<CsvRecordStore> {
    pub fn from_config(config: &AppConfig) -> Result<Self, KtpError> {
        let rules = config.extraction_rules()?;
        Ok(KtpExtractor::new(
            FieldExtractor::new(&rules)?,
            CsvRecordStore::new(&config.output_path),
            config.confidence_threshold,
        ))
    }
}

impl<S: RecordSink> KtpExtractor<S> {
    pub fn new(extractor: FieldExtractor, sink: S, confidence_threshold: f32) -> Self {
        KtpExtractor {
            extractor,
            sink,
            confidence_threshold,
        }
    }

    pub fn with_sink(sink: S) -> Result<Self, KtpError> {
        let extractor = FieldExtractor::new(&ExtractionRules::default())?;
        Ok(Self::new(extractor, sink, 0.0))
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    // Orchestrates one document: read, parse, check, persist
    pub fn process_detail_file(
        &self,
        detail_path: &Path,
        source_file: &str,
    ) -> Result<ProcessedDocument, KtpError> {
        // Step 1: read tokens; an unreadable document is a hard failure
        let tokens = OcrDetailReader::read_tokens(detail_path, self.confidence_threshold)?;

        // Step 2: infer fields
        let record = self.extractor.parse(&tokens);

        // Step 3: audit the result
        let validation = RecordValidator::validate(&record);
        for issue in &validation.issues {
            warn!("{}: {}", source_file, issue.message);
        }

        // Step 4: persist, even when nothing was recognised
        let location = self
            .sink
            .append_record(&record, source_file, Local::now().naive_local())?;

        info!(
            "Processed {}: {} of {} fields filled from {} tokens",
            source_file,
            record.filled_count(),
            crate::models::Field::COUNT,
            tokens.len()
        );

        Ok(ProcessedDocument {
            source_file: source_file.to_string(),
            token_count: tokens.len(),
            record,
            validation,
            location,
        })
    }

    /// Processes the newest detail file in `dir`, named after the file itself
    pub fn process_latest(
        &self,
        dir: &Path,
        suffix: &str,
    ) -> Result<Option<ProcessedDocument>, KtpError> {
        let latest = match OcrDetailReader::find_latest_detail(dir, suffix)? {
            Some(path) => path,
            None => {
                warn!("No *{} file found in {}", suffix, dir.display());
                return Ok(None);
            }
        };
        let source = source_name(&latest);
        self.process_detail_file(&latest, &source).map(Some)
    }
}

/// File name used as provenance for a detail file
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
