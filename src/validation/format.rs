use crate::models::{Field, FieldRecord, ValidationIssue, ValidationIssueType};

pub struct FormatValidator;

impl FormatValidator {
    /// Structural checks on an extracted record. Issues are informational;
    /// the record is stored either way.
    pub fn validate(record: &FieldRecord) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        let nik = record.get(Field::IdNumber);
        if nik.is_empty() {
            issues.push(ValidationIssue {
                issue_type: ValidationIssueType::MissingField,
                message: "NIK is missing".to_string(),
            });
        } else if nik.len() != 16 || !nik.chars().all(|c| c.is_ascii_digit()) {
            issues.push(ValidationIssue {
                issue_type: ValidationIssueType::Format,
                message: format!("NIK should be 16 digits, got {:?}", nik),
            });
        }

        if record.get(Field::Name).is_empty() {
            issues.push(ValidationIssue {
                issue_type: ValidationIssueType::MissingField,
                message: "Name is missing".to_string(),
            });
        }

        for field in [Field::Rt, Field::Rw] {
            let value = record.get(field);
            if !value.is_empty() && !value.chars().all(|c| c.is_ascii_digit()) {
                issues.push(ValidationIssue {
                    issue_type: ValidationIssueType::Format,
                    message: format!("{} should be numeric, got {:?}", field.column(), value),
                });
            }
        }

        issues
    }
}
