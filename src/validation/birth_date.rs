use chrono::{Local, NaiveDate};
use crate::models::{Field, FieldRecord, ValidationIssue, ValidationIssueType};

pub struct BirthDateValidator;

impl BirthDateValidator {
    pub fn validate(record: &FieldRecord) -> Vec<ValidationIssue> {
        let today = Local::now().naive_local().date();
        Self::validate_on(record, today)
    }

    pub fn validate_on(record: &FieldRecord, today: NaiveDate) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let raw = record.get(Field::BirthDate);

        if raw.is_empty() {
            issues.push(ValidationIssue {
                issue_type: ValidationIssueType::MissingField,
                message: "Birth date is missing".to_string(),
            });
            return issues;
        }

        match Self::parse_date(raw) {
            Some(date) if date > today => issues.push(ValidationIssue {
                issue_type: ValidationIssueType::Date,
                message: format!("Birth date {} is in the future", raw),
            }),
            Some(_) => {}
            None => issues.push(ValidationIssue {
                issue_type: ValidationIssueType::Date,
                message: format!("Birth date {:?} is not a valid DD-MM-YYYY date", raw),
            }),
        }

        issues
    }

    // Parse "DD-MM-YYYY" or "DD/MM/YYYY"
    fn parse_date(date_str: &str) -> Option<NaiveDate> {
        let parts: Vec<&str> = date_str.split(['-', '/']).collect();
        if parts.len() != 3 {
            return None;
        }

        let day = parts[0].parse::<u32>().ok()?;
        let month = parts[1].parse::<u32>().ok()?;
        let year = parts[2].parse::<i32>().ok()?;

        NaiveDate::from_ymd_opt(year, month, day)
    }
}
