// Sequential token-to-field inference for KTP OCR output
use crate::models::{ExtractionRules, Field, FieldRecord};
use crate::processing::alias::AliasMatcher;
use crate::processing::normalizer::{title_case, TokenNormalizer};
use crate::processing::standardize::{
    standardize_gender, standardize_marital_status, standardize_nationality, standardize_occupation,
    standardize_validity, CITIZEN, FOREIGNER, LIFETIME,
};
use crate::utils::KtpError;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

lazy_static! {
    static ref ID_NUMBER: Regex = Regex::new(r"^\d{15,18}\b").unwrap();
    static ref DATE_AT_START: Regex = Regex::new(r"^\d{2}[-/]\d{2}[-/]\d{4}").unwrap();
    static ref DATE_ANYWHERE: Regex = Regex::new(r"\d{2}[-/]\d{2}[-/]\d{4}").unwrap();
    static ref RT_RW: Regex = Regex::new(r"(\d{1,3})\s*(?:/|\s)\s*(\d{1,3})").unwrap();
}

/// Fields whose label and value are often fused into one token. They are
/// filled ahead of the detectors without moving the cursor.
const FUSED_FIELDS: [Field; 6] = [
    Field::MaritalStatus,
    Field::Nationality,
    Field::Gender,
    Field::Occupation,
    Field::ValidUntil,
    Field::Religion,
];

type Detector = fn(&FieldExtractor, &Window<'_>, &mut FieldRecord) -> Option<usize>;

/// The tokens visible from one cursor position
struct Window<'a> {
    tokens: &'a [String],
    pos: usize,
    current: &'a str,
    current_norm: String,
}

impl<'a> Window<'a> {
    fn ahead(&self, offset: usize) -> Option<&'a str> {
        self.tokens.get(self.pos + offset).map(|t| t.trim())
    }

    fn next(&self) -> Option<&'a str> {
        self.ahead(1)
    }
}

/// Single forward pass over an OCR token stream that fills a [`FieldRecord`].
///
/// At every cursor position the detectors run in a fixed order and the first
/// one that recognises the current token decides how many tokens are
/// consumed. Unrecognised tokens are skipped one at a time. Apart from the
/// validity field, a value once written is never replaced.
pub struct FieldExtractor {
    normalizer: TokenNormalizer,
    matcher: AliasMatcher,
    job_keywords: Vec<String>,
}

impl FieldExtractor {
    pub fn new(rules: &ExtractionRules) -> Result<Self, KtpError> {
        Ok(FieldExtractor {
            normalizer: TokenNormalizer::new(rules)?,
            matcher: AliasMatcher::new(rules)?,
            job_keywords: rules.job_keywords.clone(),
        })
    }

    pub fn normalizer(&self) -> &TokenNormalizer {
        &self.normalizer
    }

    pub fn parse(&self, tokens: &[String]) -> FieldRecord {
        let mut record = FieldRecord::new();
        let mut cursor = 0;
        while cursor < tokens.len() {
            cursor += self.step(tokens, cursor, &mut record);
        }
        debug!(
            "Parsed {} tokens into {} filled fields",
            tokens.len(),
            record.filled_count()
        );
        record
    }

    /// Runs one detector round at `cursor` and returns how many tokens it
    /// consumed (at least 1).
    pub fn step(&self, tokens: &[String], cursor: usize, record: &mut FieldRecord) -> usize {
        let current = match tokens.get(cursor) {
            Some(token) => token.trim(),
            None => return 1,
        };
        let window = Window {
            tokens,
            pos: cursor,
            current,
            current_norm: self.normalizer.normalize(current),
        };

        self.prefill_fused(&window, record);

        let detectors: [(&str, Detector); 14] = [
            ("id_number", Self::detect_id_number),
            ("name", Self::detect_name),
            ("birth", Self::detect_birth),
            ("gender", Self::detect_gender),
            ("blood_type", Self::detect_blood_type),
            ("address", Self::detect_address),
            ("rt_rw", Self::detect_rt_rw),
            ("sub_district", Self::detect_sub_district),
            ("district", Self::detect_district),
            ("religion", Self::detect_religion),
            ("marital_status", Self::detect_marital_status),
            ("occupation", Self::detect_occupation),
            ("nationality", Self::detect_nationality),
            ("validity", Self::detect_validity),
        ];

        for (name, detect) in detectors {
            if let Some(consumed) = detect(self, &window, record) {
                debug!("{} detector consumed {} token(s) at {}", name, consumed, cursor);
                return consumed.max(1);
            }
        }
        1
    }

    fn standardize(&self, field: Field, raw: &str) -> String {
        match field {
            Field::Gender => standardize_gender(raw),
            Field::MaritalStatus => standardize_marital_status(raw),
            Field::Occupation => standardize_occupation(raw, &self.job_keywords),
            Field::Nationality => standardize_nationality(raw),
            Field::ValidUntil => standardize_validity(raw),
            _ => title_case(raw),
        }
    }

    fn prefill_fused(&self, w: &Window<'_>, record: &mut FieldRecord) {
        for field in FUSED_FIELDS {
            if !self.matcher.contains_alias(&w.current_norm, field) {
                continue;
            }
            let fused = self
                .matcher
                .extract_value_after_last_alias(&w.current_norm, field);
            if let Some(value) = fused {
                let value = self.standardize(field, &value);
                if field == Field::ValidUntil {
                    record.overwrite(field, value);
                } else {
                    record.set_if_empty(field, value);
                }
            }
        }
    }

    fn detect_id_number(&self, w: &Window<'_>, record: &mut FieldRecord) -> Option<usize> {
        if self.matcher.contains_alias(&w.current_norm, Field::IdNumber) {
            if let Some(next) = w.next() {
                if ID_NUMBER.is_match(next) {
                    record.set_if_empty(Field::IdNumber, next);
                    return Some(2);
                }
            }
            // "NIK : 3201..." in one token
            let fused = self
                .matcher
                .extract_value_after_last_alias(&w.current_norm, Field::IdNumber);
            if let Some(m) = fused.as_deref().and_then(|v| ID_NUMBER.find(v)) {
                if !record.is_filled(Field::IdNumber) {
                    record.set_if_empty(Field::IdNumber, m.as_str());
                    return Some(1);
                }
            }
        }
        if ID_NUMBER.is_match(w.current) && !record.is_filled(Field::IdNumber) {
            record.set_if_empty(Field::IdNumber, w.current);
            return Some(1);
        }
        None
    }

    fn detect_name(&self, w: &Window<'_>, record: &mut FieldRecord) -> Option<usize> {
        if !self.matcher.contains_alias(&w.current_norm, Field::Name) {
            return None;
        }
        if let Some(value) = self
            .matcher
            .extract_value_after_last_alias(&w.current_norm, Field::Name)
        {
            record.set_if_empty(Field::Name, title_case(&value));
            return Some(1);
        }
        self.take_next(w, record, Field::Name, title_case)
    }

    fn detect_birth(&self, w: &Window<'_>, record: &mut FieldRecord) -> Option<usize> {
        let labelled = self.matcher.contains_alias(&w.current_norm, Field::Birthplace)
            || self.matcher.contains_alias(&w.current_norm, Field::BirthDate);
        if !labelled {
            return None;
        }

        if let (Some(place), Some(date)) = (w.ahead(1), w.ahead(2)) {
            if DATE_AT_START.is_match(date) {
                record.set_if_empty(Field::Birthplace, title_case(place));
                record.set_if_empty(Field::BirthDate, date);
                return Some(3);
            }
        }

        let next = match w.next() {
            Some(next) => next,
            None => return Some(1),
        };
        if DATE_ANYWHERE.is_match(next) {
            // "BATULICIN, 26-04-2004" carries both parts
            let parts: Vec<&str> = next.split_whitespace().collect();
            match parts.split_last() {
                Some((last, place)) if !place.is_empty() && DATE_ANYWHERE.is_match(last) => {
                    record.set_if_empty(Field::Birthplace, title_case(&place.join(" ")));
                    record.set_if_empty(Field::BirthDate, *last);
                }
                _ => {
                    record.set_if_empty(Field::BirthDate, next);
                }
            }
            return Some(2);
        }

        record.set_if_empty(Field::Birthplace, title_case(next));
        Some(2)
    }

    fn detect_gender(&self, w: &Window<'_>, record: &mut FieldRecord) -> Option<usize> {
        if !self.matcher.contains_alias(&w.current_norm, Field::Gender) {
            return None;
        }
        if record.is_filled(Field::Gender) {
            return Some(1);
        }
        self.take_next(w, record, Field::Gender, standardize_gender)
    }

    fn detect_blood_type(&self, w: &Window<'_>, record: &mut FieldRecord) -> Option<usize> {
        if !self.matcher.contains_alias(&w.current_norm, Field::BloodType) {
            return None;
        }
        if let Some(value) = self
            .matcher
            .extract_value_after_last_alias(&w.current_norm, Field::BloodType)
        {
            record.set_if_empty(Field::BloodType, value.to_uppercase());
            return Some(1);
        }
        self.take_next(w, record, Field::BloodType, str::to_uppercase)
    }

    fn detect_address(&self, w: &Window<'_>, record: &mut FieldRecord) -> Option<usize> {
        if !self.matcher.contains_alias(&w.current_norm, Field::Address) {
            return None;
        }
        self.take_next(w, record, Field::Address, title_case)
    }

    fn detect_rt_rw(&self, w: &Window<'_>, record: &mut FieldRecord) -> Option<usize> {
        let labelled = self.matcher.contains_alias(&w.current_norm, Field::Rt);
        let in_next = w.next().and_then(|next| RT_RW.captures(next));
        if !labelled && in_next.is_none() {
            return None;
        }

        if let Some(caps) = in_next {
            record.set_if_empty(Field::Rt, &caps[1]);
            record.set_if_empty(Field::Rw, &caps[2]);
            return Some(2);
        }
        // "RT 005 RW 003" squeezed into the label token
        if let Some(caps) = RT_RW.captures(&w.current_norm) {
            record.set_if_empty(Field::Rt, &caps[1]);
            record.set_if_empty(Field::Rw, &caps[2]);
        }
        Some(1)
    }

    fn detect_sub_district(&self, w: &Window<'_>, record: &mut FieldRecord) -> Option<usize> {
        self.detect_labelled(w, record, Field::SubDistrict)
    }

    fn detect_district(&self, w: &Window<'_>, record: &mut FieldRecord) -> Option<usize> {
        self.detect_labelled(w, record, Field::District)
    }

    fn detect_religion(&self, w: &Window<'_>, record: &mut FieldRecord) -> Option<usize> {
        self.detect_labelled(w, record, Field::Religion)
    }

    fn detect_marital_status(&self, w: &Window<'_>, record: &mut FieldRecord) -> Option<usize> {
        self.detect_standardized(w, record, Field::MaritalStatus)
    }

    fn detect_occupation(&self, w: &Window<'_>, record: &mut FieldRecord) -> Option<usize> {
        self.detect_standardized(w, record, Field::Occupation)
    }

    fn detect_nationality(&self, w: &Window<'_>, record: &mut FieldRecord) -> Option<usize> {
        if !self.matcher.contains_alias(&w.current_norm, Field::Nationality) {
            return None;
        }
        if record.is_filled(Field::Nationality) {
            return Some(1);
        }

        let is_known = |value: &str| value == CITIZEN || value == FOREIGNER;

        let same_token = self
            .matcher
            .extract_value_after_last_alias(&w.current_norm, Field::Nationality)
            .map(|v| standardize_nationality(&v))
            .or_else(|| {
                // a bare "WNI" token is label and value at once
                Some(standardize_nationality(&w.current_norm)).filter(|v| is_known(v.as_str()))
            });
        if let Some(value) = same_token {
            if is_known(value.as_str()) {
                record.set_if_empty(Field::Nationality, value);
            }
            return Some(1);
        }

        match w.next().map(standardize_nationality) {
            Some(value) if is_known(value.as_str()) => {
                record.set_if_empty(Field::Nationality, value);
                Some(2)
            }
            _ => Some(1),
        }
    }

    fn detect_validity(&self, w: &Window<'_>, record: &mut FieldRecord) -> Option<usize> {
        if !self.matcher.contains_alias(&w.current_norm, Field::ValidUntil) {
            return None;
        }
        record.overwrite(Field::ValidUntil, LIFETIME);
        Some(1)
    }

    /// Label detector for plain free-text fields: a fused value wins,
    /// otherwise the following token is taken.
    fn detect_labelled(
        &self,
        w: &Window<'_>,
        record: &mut FieldRecord,
        field: Field,
    ) -> Option<usize> {
        if !self.matcher.contains_alias(&w.current_norm, field) {
            return None;
        }
        if let Some(value) = self.matcher.extract_value_after_last_alias(&w.current_norm, field) {
            record.set_if_empty(field, title_case(&value));
            return Some(1);
        }
        self.take_next(w, record, field, title_case)
    }

    /// Like [`Self::detect_labelled`] for vocabulary fields, skipped once the
    /// fused pre-pass has filled the field.
    fn detect_standardized(
        &self,
        w: &Window<'_>,
        record: &mut FieldRecord,
        field: Field,
    ) -> Option<usize> {
        if !self.matcher.contains_alias(&w.current_norm, field) {
            return None;
        }
        if record.is_filled(field) {
            return Some(1);
        }
        if let Some(value) = self.matcher.extract_value_after_last_alias(&w.current_norm, field) {
            record.set_if_empty(field, self.standardize(field, &value));
            return Some(1);
        }
        match w.next() {
            Some(next) => {
                record.set_if_empty(field, self.standardize(field, next));
                Some(2)
            }
            None => Some(1),
        }
    }

    /// Stores the following token through `convert`; consumes the label and
    /// the value, or just the label at the end of the stream.
    fn take_next<F>(
        &self,
        w: &Window<'_>,
        record: &mut FieldRecord,
        field: Field,
        convert: F,
    ) -> Option<usize>
    where
        F: Fn(&str) -> String,
    {
        match w.next() {
            Some(next) => {
                record.set_if_empty(field, convert(next));
                Some(2)
            }
            None => Some(1),
        }
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new(&ExtractionRules::default()).expect("built-in extraction rules are valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::standardize::{FEMALE, MALE, MARRIED, NOT_MARRIED};

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|t| t.to_string()).collect()
    }

    fn parse(raw: &[&str]) -> FieldRecord {
        FieldExtractor::default().parse(&tokens(raw))
    }

    #[test]
    fn test_id_number_after_label() {
        let extractor = FieldExtractor::default();
        let toks = tokens(&["NIK", "3201011234567890"]);
        let mut record = FieldRecord::new();

        assert_eq!(extractor.step(&toks, 0, &mut record), 2);
        assert_eq!(record.get(Field::IdNumber), "3201011234567890");
    }

    #[test]
    fn test_unlabelled_id_number() {
        let record = parse(&["PROVINSI JAWA BARAT", "3201011234567890", "Nama", "BUDI"]);
        assert_eq!(record.get(Field::IdNumber), "3201011234567890");
    }

    #[test]
    fn test_fused_id_number() {
        let extractor = FieldExtractor::default();
        let toks = tokens(&["NIK : 3201011234567890", "Nama"]);
        let mut record = FieldRecord::new();

        assert_eq!(extractor.step(&toks, 0, &mut record), 1);
        assert_eq!(record.get(Field::IdNumber), "3201011234567890");
    }

    #[test]
    fn test_id_number_length_bounds() {
        let record = parse(&["NIK", "12345678901234"]);
        assert_eq!(record.get(Field::IdNumber), "");
        let record = parse(&["1234567890123456789"]);
        assert_eq!(record.get(Field::IdNumber), "");
    }

    #[test]
    fn test_first_id_number_wins() {
        let record = parse(&["3201011234567890", "3201019999999999"]);
        assert_eq!(record.get(Field::IdNumber), "3201011234567890");
        let record = parse(&["3201011234567890", "NIK", "3201019999999999"]);
        assert_eq!(record.get(Field::IdNumber), "3201011234567890");
    }

    #[test]
    fn test_name_from_next_token() {
        let extractor = FieldExtractor::default();
        let toks = tokens(&["Nama", "JOHN DOE"]);
        let mut record = FieldRecord::new();

        assert_eq!(extractor.step(&toks, 0, &mut record), 2);
        assert_eq!(record.get(Field::Name), "John Doe");
    }

    #[test]
    fn test_fused_name() {
        let extractor = FieldExtractor::default();
        let toks = tokens(&["NAMA : JOHN DOE", "Tempat/Tgl Lahir"]);
        let mut record = FieldRecord::new();

        assert_eq!(extractor.step(&toks, 0, &mut record), 1);
        assert_eq!(record.get(Field::Name), "John Doe");
    }

    #[test]
    fn test_name_is_not_overwritten() {
        let record = parse(&["Nama", "JOHN DOE", "Nama", "JANE ROE"]);
        assert_eq!(record.get(Field::Name), "John Doe");
    }

    #[test]
    fn test_birth_place_and_date_in_three_tokens() {
        let extractor = FieldExtractor::default();
        let toks = tokens(&["Tempat Tgl Lahir", "JAKARTA", "17-08-1985"]);
        let mut record = FieldRecord::new();

        assert_eq!(extractor.step(&toks, 0, &mut record), 3);
        assert_eq!(record.get(Field::Birthplace), "Jakarta");
        assert_eq!(record.get(Field::BirthDate), "17-08-1985");
    }

    #[test]
    fn test_birth_place_and_date_in_one_token() {
        let extractor = FieldExtractor::default();
        let toks = tokens(&[
            "Tempat/Tgl Lahir",
            "BATULICIN KAB TANAH BUMBU 26-04-2004",
            "Jenis Kelamin",
        ]);
        let mut record = FieldRecord::new();

        assert_eq!(extractor.step(&toks, 0, &mut record), 2);
        assert_eq!(record.get(Field::Birthplace), "Batulicin Kab Tanah Bumbu");
        assert_eq!(record.get(Field::BirthDate), "26-04-2004");
    }

    #[test]
    fn test_birth_date_alone() {
        let record = parse(&["Tgl Lahir", "26/04/2004"]);
        assert_eq!(record.get(Field::BirthDate), "26/04/2004");
        assert_eq!(record.get(Field::Birthplace), "");
    }

    #[test]
    fn test_birthplace_without_date() {
        let record = parse(&["Tempat Lahir", "BANDUNG", "Jenis Kelamin", "PEREMPUAN"]);
        assert_eq!(record.get(Field::Birthplace), "Bandung");
        assert_eq!(record.get(Field::BirthDate), "");
        assert_eq!(record.get(Field::Gender), FEMALE);
    }

    #[test]
    fn test_gender_from_next_token() {
        let extractor = FieldExtractor::default();
        let toks = tokens(&["Jenis Kelamin", "LAKI-LAKI"]);
        let mut record = FieldRecord::new();

        assert_eq!(extractor.step(&toks, 0, &mut record), 2);
        assert_eq!(record.get(Field::Gender), MALE);
    }

    #[test]
    fn test_fused_gender_does_not_read_next_token() {
        let extractor = FieldExtractor::default();
        let toks = tokens(&["Jenis Kelamin: PEREMPUAN", "Alamat"]);
        let mut record = FieldRecord::new();

        assert_eq!(extractor.step(&toks, 0, &mut record), 1);
        assert_eq!(record.get(Field::Gender), FEMALE);
    }

    #[test]
    fn test_blood_type() {
        let record = parse(&["Gol. Darah: o"]);
        assert_eq!(record.get(Field::BloodType), "O");
        let record = parse(&["Gol Darah", "ab"]);
        assert_eq!(record.get(Field::BloodType), "AB");
    }

    #[test]
    fn test_address_consumes_value() {
        let extractor = FieldExtractor::default();
        let toks = tokens(&["Alamat", "JL. MERDEKA NO. 5"]);
        let mut record = FieldRecord::new();

        assert_eq!(extractor.step(&toks, 0, &mut record), 2);
        assert_eq!(record.get(Field::Address), "Jl. Merdeka No. 5");
    }

    #[test]
    fn test_rt_rw_from_next_token() {
        let extractor = FieldExtractor::default();
        let toks = tokens(&["RT/RW", "005/003"]);
        let mut record = FieldRecord::new();

        assert_eq!(extractor.step(&toks, 0, &mut record), 2);
        assert_eq!(record.get(Field::Rt), "005");
        assert_eq!(record.get(Field::Rw), "003");
    }

    #[test]
    fn test_rt_rw_fused_in_label() {
        let extractor = FieldExtractor::default();
        let toks = tokens(&["RT/RW 002/011", "Kel/Desa"]);
        let mut record = FieldRecord::new();

        assert_eq!(extractor.step(&toks, 0, &mut record), 1);
        assert_eq!(record.get(Field::Rt), "002");
        assert_eq!(record.get(Field::Rw), "011");
    }

    #[test]
    fn test_rt_rw_without_label() {
        let record = parse(&["JL MERDEKA", "001 / 002"]);
        assert_eq!(record.get(Field::Rt), "001");
        assert_eq!(record.get(Field::Rw), "002");
    }

    #[test]
    fn test_sub_district_district_religion() {
        let record = parse(&[
            "Kel/Desa",
            "SUKAMAJU",
            "Kecamatan : CIBINONG",
            "Agama",
            "ISLAM",
        ]);
        assert_eq!(record.get(Field::SubDistrict), "Sukamaju");
        assert_eq!(record.get(Field::District), "Cibinong");
        assert_eq!(record.get(Field::Religion), "Islam");
    }

    #[test]
    fn test_fused_marital_status_does_not_consume_more() {
        let extractor = FieldExtractor::default();
        let toks = tokens(&["STATUS PERKAWINAN BELUM KAWIN", "Pekerjaan"]);
        let mut record = FieldRecord::new();

        assert_eq!(extractor.step(&toks, 0, &mut record), 1);
        assert_eq!(record.get(Field::MaritalStatus), NOT_MARRIED);
    }

    #[test]
    fn test_marital_status_from_next_token() {
        let record = parse(&["Status Perkawinan", "KAWIN"]);
        assert_eq!(record.get(Field::MaritalStatus), MARRIED);
    }

    #[test]
    fn test_prefill_keeps_first_value() {
        let record = parse(&["STATUS PERKAWINAN KAWIN", "Status Perkawinan", "BELUM KAWIN"]);
        assert_eq!(record.get(Field::MaritalStatus), MARRIED);
    }

    #[test]
    fn test_birth_keeps_first_value() {
        let record = parse(&[
            "Tempat Tgl Lahir",
            "JAKARTA",
            "17-08-1985",
            "Tempat Tgl Lahir",
            "BANDUNG",
            "01-01-1990",
        ]);
        assert_eq!(record.get(Field::Birthplace), "Jakarta");
        assert_eq!(record.get(Field::BirthDate), "17-08-1985");
    }

    #[test]
    fn test_gender_keeps_first_value() {
        let record = parse(&["Jenis Kelamin", "PEREMPUAN", "Jenis Kelamin: LAKI-LAKI"]);
        assert_eq!(record.get(Field::Gender), FEMALE);
    }

    #[test]
    fn test_blood_type_keeps_first_value() {
        let record = parse(&["Gol. Darah: B", "Gol. Darah: O"]);
        assert_eq!(record.get(Field::BloodType), "B");
    }

    #[test]
    fn test_address_keeps_first_value() {
        let record = parse(&["Alamat", "JL. MERDEKA NO. 5", "Alamat", "JL. SUDIRMAN"]);
        assert_eq!(record.get(Field::Address), "Jl. Merdeka No. 5");
    }

    #[test]
    fn test_rt_rw_keeps_first_value() {
        let record = parse(&["RT/RW", "005/003", "RT/RW", "009/010"]);
        assert_eq!(record.get(Field::Rt), "005");
        assert_eq!(record.get(Field::Rw), "003");
    }

    #[test]
    fn test_sub_district_keeps_first_value() {
        let record = parse(&["Kel/Desa", "SUKAMAJU", "Kel/Desa", "CIBODAS"]);
        assert_eq!(record.get(Field::SubDistrict), "Sukamaju");
    }

    #[test]
    fn test_district_keeps_first_value() {
        let record = parse(&["Kecamatan", "CIBINONG", "Kecamatan", "BOGOR"]);
        assert_eq!(record.get(Field::District), "Cibinong");
    }

    #[test]
    fn test_religion_keeps_prefilled_value() {
        let record = parse(&["Agama : ISLAM", "Agama", "KRISTEN"]);
        assert_eq!(record.get(Field::Religion), "Islam");
    }

    #[test]
    fn test_occupation_keeps_first_value() {
        let record = parse(&["Pekerjaan", "PETANI", "Pekerjaan : BURUH"]);
        assert_eq!(record.get(Field::Occupation), "Petani");
    }

    #[test]
    fn test_nationality_keeps_first_value() {
        let record = parse(&["Kewarganegaraan: WNI", "Kewarganegaraan", "WNA"]);
        assert_eq!(record.get(Field::Nationality), "WNI");
    }

    #[test]
    fn test_validity_detector_overwrites() {
        let extractor = FieldExtractor::default();
        let toks = tokens(&["Berlaku Hingga"]);
        let mut record = FieldRecord::new();
        record.set_if_empty(Field::ValidUntil, "17-08-2027");

        assert_eq!(extractor.step(&toks, 0, &mut record), 1);
        assert_eq!(record.get(Field::ValidUntil), LIFETIME);
    }

    #[test]
    fn test_validity_prefill_overwrites() {
        let extractor = FieldExtractor::default();
        // the marital status detector claims this token, so only the
        // pre-pass writes the validity value
        let toks = tokens(&["STATUS KAWIN BERLAKU HINGGA 17-08-2027"]);
        let mut record = FieldRecord::new();
        record.set_if_empty(Field::ValidUntil, LIFETIME);

        assert_eq!(extractor.step(&toks, 0, &mut record), 1);
        assert_eq!(record.get(Field::MaritalStatus), MARRIED);
        assert_eq!(record.get(Field::ValidUntil), "17 08 2027");
    }

    #[test]
    fn test_occupation() {
        let record = parse(&["Pekerjaan", "PELAJAR/MAHASISWA"]);
        assert_eq!(record.get(Field::Occupation), "Pelajar/Mahasiswa");
        let record = parse(&["Pokorjaan : KARYAWAN SWASTA"]);
        assert_eq!(record.get(Field::Occupation), "Karyawan/Swasta");
    }

    #[test]
    fn test_nationality() {
        let record = parse(&["Kewarganegaraan", "WNI"]);
        assert_eq!(record.get(Field::Nationality), "WNI");
        let record = parse(&["Kewarganegaraan: WNA"]);
        assert_eq!(record.get(Field::Nationality), "WNA");
        let record = parse(&["WNI", "Berlaku Hingga"]);
        assert_eq!(record.get(Field::Nationality), "WNI");
    }

    #[test]
    fn test_nationality_rejects_unknown_next_token() {
        let extractor = FieldExtractor::default();
        let toks = tokens(&["Kewarganegaraan", "Berlaku Hingga", "SEUMUR HIDUP"]);
        let mut record = FieldRecord::new();

        assert_eq!(extractor.step(&toks, 0, &mut record), 1);
        assert_eq!(record.get(Field::Nationality), "");
    }

    #[test]
    fn test_validity_is_always_lifetime() {
        let record = parse(&["Berlaku Hingga", "SEUMUR HIDUP"]);
        assert_eq!(record.get(Field::ValidUntil), LIFETIME);
        let record = parse(&["Berlaku Hingga: 17-08-2027"]);
        assert_eq!(record.get(Field::ValidUntil), LIFETIME);
    }

    #[test]
    fn test_noise_advances_by_one() {
        let extractor = FieldExtractor::default();
        let toks = tokens(&["PROVINSI JAWA BARAT", "KABUPATEN BOGOR"]);
        let mut record = FieldRecord::new();

        assert_eq!(extractor.step(&toks, 0, &mut record), 1);
        assert_eq!(record.filled_count(), 0);
    }

    #[test]
    fn test_empty_stream_gives_empty_record() {
        let record = parse(&[]);
        assert_eq!(record, FieldRecord::new());
    }

    #[test]
    fn test_label_at_end_of_stream() {
        let record = parse(&["Nama"]);
        assert_eq!(record.get(Field::Name), "");
        let record = parse(&["Alamat"]);
        assert_eq!(record.get(Field::Address), "");
    }

    #[test]
    fn test_full_card() {
        let record = parse(&[
            "PROVINSI JAWA BARAT",
            "KABUPATEN BOGOR",
            "NIK",
            "3201011234567890",
            "Nama",
            "JOHN DOE",
            "Tempat/Tgl Lahir",
            "JAKARTA",
            "17-08-1985",
            "Jenis Kelamin",
            "LAKI-LAKI",
            "Gol. Darah: B",
            "Alamat",
            "JL. MERDEKA NO. 5",
            "RT/RW",
            "005/003",
            "Kel/Desa",
            "SUKAMAJU",
            "Kecamatan",
            "CIBINONG",
            "Agama",
            "ISLAM",
            "Status Perkawinan: BELUM KAWIN",
            "Pekerjaan",
            "PELAJAR/MAHASISWA",
            "Kewarganegaraan",
            "WNI",
            "Berlaku Hingga",
            "SEUMUR HIDUP",
        ]);

        assert_eq!(record.get(Field::IdNumber), "3201011234567890");
        assert_eq!(record.get(Field::Name), "John Doe");
        assert_eq!(record.get(Field::Birthplace), "Jakarta");
        assert_eq!(record.get(Field::BirthDate), "17-08-1985");
        assert_eq!(record.get(Field::Gender), MALE);
        assert_eq!(record.get(Field::BloodType), "B");
        assert_eq!(record.get(Field::Address), "Jl. Merdeka No. 5");
        assert_eq!(record.get(Field::Rt), "005");
        assert_eq!(record.get(Field::Rw), "003");
        assert_eq!(record.get(Field::SubDistrict), "Sukamaju");
        assert_eq!(record.get(Field::District), "Cibinong");
        assert_eq!(record.get(Field::Religion), "Islam");
        assert_eq!(record.get(Field::MaritalStatus), NOT_MARRIED);
        assert_eq!(record.get(Field::Occupation), "Pelajar/Mahasiswa");
        assert_eq!(record.get(Field::Nationality), "WNI");
        assert_eq!(record.get(Field::ValidUntil), LIFETIME);
    }
}
