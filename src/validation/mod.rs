pub mod birth_date;
pub mod format;

pub use birth_date::BirthDateValidator;
pub use format::FormatValidator;

use crate::models::{FieldRecord, RecordValidationResult};

pub struct RecordValidator;

impl RecordValidator {
    pub fn validate(record: &FieldRecord) -> RecordValidationResult {
        let mut issues = FormatValidator::validate(record);
        issues.extend(BirthDateValidator::validate(record));
        RecordValidationResult {
            is_valid: issues.is_empty(),
            issues,
        }
    }
}
