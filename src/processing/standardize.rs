// Canonical vocabularies for the KTP fields that have one.
// Each standardizer is pure and returns "" for empty input.

use crate::processing::normalizer::{collapse_whitespace, title_case};

pub const MALE: &str = "Laki-laki";
pub const FEMALE: &str = "Perempuan";

pub const NOT_MARRIED: &str = "Belum Kawin";
pub const MARRIED: &str = "Kawin";
pub const DIVORCED: &str = "Cerai";
pub const DIVORCED_LIVING: &str = "Cerai Hidup";
pub const DIVORCED_DECEASED: &str = "Cerai Mati";

pub const CITIZEN: &str = "WNI";
pub const FOREIGNER: &str = "WNA";

pub const LIFETIME: &str = "Seumur Hidup";

pub fn standardize_gender(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let r = raw.to_uppercase();
    if r.contains("LAKI") {
        return MALE.to_string();
    }
    if r.contains("PEREMPUAN") || r.contains("WANITA") {
        return FEMALE.to_string();
    }
    title_case(raw)
}

pub fn standardize_marital_status(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let r = raw.to_uppercase();
    let negated = r.contains("BELUM") || r.contains("BUKAN") || r.contains("TIDAK");
    if r.contains("KAWIN") {
        return if negated { NOT_MARRIED } else { MARRIED }.to_string();
    }
    if r.contains("CERAI") {
        if r.contains("HIDUP") {
            return DIVORCED_LIVING.to_string();
        }
        if r.contains("MATI") {
            return DIVORCED_DECEASED.to_string();
        }
        return DIVORCED.to_string();
    }
    title_case(raw)
}

/// Picks every known occupation mentioned in `raw` and joins their parts as
/// "Part/Part" in keyword-list order. Free text falls through title-cased.
pub fn standardize_occupation(raw: &str, keywords: &[String]) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let upper = raw.to_uppercase();
    let mut parts: Vec<String> = Vec::new();
    for keyword in keywords.iter().map(|k| k.to_uppercase()) {
        if keyword.is_empty() || !upper.contains(&keyword) {
            continue;
        }
        for part in keyword.split('/').map(str::trim) {
            if !part.is_empty() && !parts.iter().any(|p| p == part) {
                parts.push(part.to_string());
            }
        }
    }

    if parts.is_empty() {
        return title_case(&collapse_whitespace(raw));
    }

    parts
        .iter()
        .map(|p| title_case(p))
        .collect::<Vec<_>>()
        .join("/")
}

pub fn standardize_nationality(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let r = raw.to_uppercase();
    if r.contains(CITIZEN) {
        return CITIZEN.to_string();
    }
    if r.contains(FOREIGNER) {
        return FOREIGNER.to_string();
    }
    if r.contains("INDONES") {
        return CITIZEN.to_string();
    }
    r
}

pub fn standardize_validity(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    if raw.to_lowercase().contains("seumur") {
        return LIFETIME.to_string();
    }
    title_case(raw)
}
