pub mod data;
pub mod rules;

pub use data::{
    Field, FieldRecord, OutputRow, RecognizedToken, RecordValidationResult, ValidationIssue,
    ValidationIssueType, HEADERS, TIMESTAMP_FORMAT,
};
pub use rules::ExtractionRules;
