use crate::models::ExtractionRules;
use crate::utils::KtpError;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s]").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Cleans a single raw OCR token into the comparable form used by the alias
/// matcher: separators folded to spaces, known misreadings corrected,
/// punctuation dropped, whitespace collapsed, lower-cased.
///
/// Normalizing is pure and idempotent, so it is recomputed wherever needed
/// instead of being cached.
pub struct TokenNormalizer {
    typos: Vec<(Regex, String)>,
}

impl TokenNormalizer {
    pub fn new(rules: &ExtractionRules) -> Result<Self, KtpError> {
        let typos = rules
            .typos
            .iter()
            .map(|(bad, good)| {
                let pattern = format!("(?i){}", regex::escape(bad));
                Ok((Regex::new(&pattern)?, good.clone()))
            })
            .collect::<Result<Vec<_>, KtpError>>()?;
        Ok(TokenNormalizer { typos })
    }

    pub fn normalize(&self, token: &str) -> String {
        let mut text = token.replace(['-', '/', '\\'], " ");

        for (pattern, correction) in &self.typos {
            if pattern.is_match(&text) {
                text = pattern
                    .replace_all(&text, regex::NoExpand(correction.as_str()))
                    .into_owned();
            }
        }

        let text = NON_WORD.replace_all(&text, " ");
        let text = WHITESPACE_RUN.replace_all(&text, " ");
        text.trim().to_lowercase()
    }
}

impl Default for TokenNormalizer {
    fn default() -> Self {
        Self::new(&ExtractionRules::default()).expect("built-in typo table is valid")
    }
}

/// Capitalises the first letter of every alphabetic run and lower-cases the
/// rest, so "LAKI-LAKI" becomes "Laki-Laki" and "o'neil" becomes "O'Neil".
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Collapses internal whitespace runs and trims
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}
