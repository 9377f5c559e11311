use chrono::NaiveDateTime;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Timestamp layout used in the provenance column of every output row
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column schema of the record store: provenance first, then one column per field
pub const HEADERS: [&str; 18] = [
    "Timestamp",
    "Source File",
    "nik",
    "nama",
    "tempat_lahir",
    "tanggal_lahir",
    "jenis_kelamin",
    "golongan_darah",
    "alamat",
    "rt",
    "rw",
    "kelurahan_atau_desa",
    "kecamatan",
    "agama",
    "status_perkawinan",
    "pekerjaan",
    "kewarganegaraan",
    "berlaku_hingga",
];

/// Semantic slots printed on a KTP card, in store column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "nik")]
    IdNumber,
    #[serde(rename = "nama")]
    Name,
    #[serde(rename = "tempat_lahir")]
    Birthplace,
    #[serde(rename = "tanggal_lahir")]
    BirthDate,
    #[serde(rename = "jenis_kelamin")]
    Gender,
    #[serde(rename = "golongan_darah")]
    BloodType,
    #[serde(rename = "alamat")]
    Address,
    #[serde(rename = "rt")]
    Rt,
    #[serde(rename = "rw")]
    Rw,
    #[serde(rename = "kelurahan_atau_desa")]
    SubDistrict,
    #[serde(rename = "kecamatan")]
    District,
    #[serde(rename = "agama")]
    Religion,
    #[serde(rename = "status_perkawinan")]
    MaritalStatus,
    #[serde(rename = "pekerjaan")]
    Occupation,
    #[serde(rename = "kewarganegaraan")]
    Nationality,
    #[serde(rename = "berlaku_hingga")]
    ValidUntil,
}

impl Field {
    pub const COUNT: usize = 16;

    pub const ALL: [Field; Field::COUNT] = [
        Field::IdNumber,
        Field::Name,
        Field::Birthplace,
        Field::BirthDate,
        Field::Gender,
        Field::BloodType,
        Field::Address,
        Field::Rt,
        Field::Rw,
        Field::SubDistrict,
        Field::District,
        Field::Religion,
        Field::MaritalStatus,
        Field::Occupation,
        Field::Nationality,
        Field::ValidUntil,
    ];

    /// Column name of this field in the record store
    pub fn column(&self) -> &'static str {
        HEADERS[2 + self.index()]
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Field values extracted from one document.
///
/// Every field always has a slot; an undetected field is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRecord {
    values: [String; Field::COUNT],
}

impl FieldRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    pub fn is_filled(&self, field: Field) -> bool {
        !self.values[field.index()].is_empty()
    }

    /// First writer wins: stores `value` only while the slot is still empty.
    /// Returns true when the slot was written.
    pub fn set_if_empty(&mut self, field: Field, value: impl Into<String>) -> bool {
        if self.is_filled(field) {
            return false;
        }
        let value = value.into();
        if value.is_empty() {
            return false;
        }
        self.values[field.index()] = value;
        true
    }

    /// Unconditional write, for detectors allowed to replace earlier values
    pub fn overwrite(&mut self, field: Field, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::ALL.iter().map(move |f| (*f, self.get(*f)))
    }

    pub fn filled_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_empty()).count()
    }
}

impl Serialize for FieldRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Field::COUNT))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.column(), value)?;
        }
        map.end()
    }
}

/// One store row: provenance plus the field values in column order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub timestamp: String,
    pub source_file: String,
    pub values: Vec<String>,
}

impl OutputRow {
    pub fn new(record: &FieldRecord, source_file: &str, timestamp: NaiveDateTime) -> Self {
        OutputRow {
            timestamp: timestamp.format(TIMESTAMP_FORMAT).to_string(),
            source_file: source_file.to_string(),
            values: record.iter().map(|(_, v)| v.to_string()).collect(),
        }
    }

    pub fn columns(&self) -> Vec<&str> {
        let mut columns = Vec::with_capacity(HEADERS.len());
        columns.push(self.timestamp.as_str());
        columns.push(self.source_file.as_str());
        columns.extend(self.values.iter().map(String::as_str));
        columns
    }
}

/// A text span recognised by the OCR engine, in reading order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognizedToken {
    pub text: String,
    pub confidence: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub issue_type: ValidationIssueType,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidationIssueType {
    MissingField,
    Format,
    Date,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordValidationResult {
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
}
