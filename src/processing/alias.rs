use crate::models::{ExtractionRules, Field};
use crate::utils::KtpError;
use regex::Regex;
use std::collections::HashMap;

/// Whole-word label detection over normalized token text.
///
/// Alias patterns are compiled once per field, keeping the declaration order
/// of the rules table.
pub struct AliasMatcher {
    patterns: HashMap<Field, Vec<Regex>>,
}

impl AliasMatcher {
    pub fn new(rules: &ExtractionRules) -> Result<Self, KtpError> {
        let mut patterns = HashMap::new();
        for field in Field::ALL {
            let compiled = rules
                .aliases_for(field)
                .iter()
                .map(|alias| Regex::new(&format!(r"\b{}\b", regex::escape(&alias.to_lowercase()))))
                .collect::<Result<Vec<_>, _>>()?;
            patterns.insert(field, compiled);
        }
        Ok(AliasMatcher { patterns })
    }

    fn patterns_for(&self, field: Field) -> &[Regex] {
        self.patterns.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_alias(&self, normalized: &str, field: Field) -> bool {
        self.patterns_for(field).iter().any(|p| p.is_match(normalized))
    }

    /// Returns the trimmed text following the alias occurrence that ends
    /// furthest to the right, or `None` when no alias occurs or nothing
    /// follows it. Ties on the end offset keep the earlier-declared alias.
    pub fn extract_value_after_last_alias(&self, normalized: &str, field: Field) -> Option<String> {
        let mut last_end: Option<usize> = None;
        for pattern in self.patterns_for(field) {
            for m in pattern.find_iter(normalized) {
                if last_end.map_or(true, |end| m.end() > end) {
                    last_end = Some(m.end());
                }
            }
        }

        let value = normalized[last_end?..].trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}

impl Default for AliasMatcher {
    fn default() -> Self {
        Self::new(&ExtractionRules::default()).expect("built-in alias table is valid")
    }
}
