use crate::models::Field;
use crate::utils::KtpError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Lookup tables driving the extraction engine.
///
/// The built-in defaults cover the KTP layout and the OCR misreadings seen on
/// real scans. A JSON rules file may replace any section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionRules {
    /// Misspelling -> correction, applied in order
    pub typos: Vec<(String, String)>,
    /// Label words per field, in declaration order
    pub aliases: BTreeMap<Field, Vec<String>>,
    /// Closed occupation vocabulary; `/` joins multi-part entries
    pub job_keywords: Vec<String>,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        let typos = [
            ("jonis", "jenis"),
            ("tompautgl", "tempat tanggal"),
            ("tompautglahir", "tempat tanggal"),
            ("tompat", "tempat"),
            ("tmpt", "tempat"),
            ("namat", "nama"),
            ("stalus", "status"),
            ("porkawnan", "perkawinan"),
            ("pokorjaan", "pekerjaan"),
            ("kowarganegaraan", "kewarganegaraan"),
            ("kevdesa", "kelurahan desa"),
            ("kocamatan", "kecamatan"),
            ("aama", "agama"),
            ("borlaku", "berlaku"),
            ("borlaku hingoa", "berlaku hingga"),
            ("rtiaw", "rt rw"),
        ]
        .iter()
        .map(|(bad, good)| (bad.to_string(), good.to_string()))
        .collect();

        let aliases = Field::ALL
            .iter()
            .map(|field| {
                let words = Self::default_aliases(*field)
                    .iter()
                    .map(|w| w.to_string())
                    .collect();
                (*field, words)
            })
            .collect();

        let job_keywords = [
            "PELAJAR",
            "MAHASISWA",
            "PNS",
            "PNS/TNI",
            "KARYAWAN",
            "WIRASWASTA",
            "BURUH",
            "PETANI",
            "PENSIUNAN",
            "SWASTA",
            "TNI",
            "POLRI",
            "PELAJAR/MAHASISWA",
        ]
        .iter()
        .map(|k| k.to_string())
        .collect();

        ExtractionRules {
            typos,
            aliases,
            job_keywords,
        }
    }
}

impl ExtractionRules {
    fn default_aliases(field: Field) -> &'static [&'static str] {
        match field {
            Field::IdNumber => &["nik"],
            Field::Name => &["nama", "namat"],
            Field::Birthplace => &["tempat", "lahir", "tmplahir", "tmpt", "tempat tanggal"],
            Field::BirthDate => &["tanggal", "tgl"],
            Field::Gender => &["jenis kelamin", "jenis", "jns kelamin"],
            Field::BloodType => &["gol darah", "goldarah", "gol"],
            Field::Address => &["alamat"],
            // RT and RW share one label group ("RT/RW")
            Field::Rt | Field::Rw => &["rt", "rw"],
            Field::SubDistrict => &["kelurahan", "desa", "kel"],
            Field::District => &["kecamatan"],
            Field::Religion => &["agama"],
            Field::MaritalStatus => &["status", "perkawinan"],
            Field::Occupation => &["pekerjaan"],
            Field::Nationality => &["kewarganegaraan", "wni", "wna"],
            Field::ValidUntil => &["berlaku", "berlaku hingga", "hingga"],
        }
    }

    pub fn aliases_for(&self, field: Field) -> &[String] {
        self.aliases.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn from_json_str(json: &str) -> Result<Self, KtpError> {
        let mut rules: ExtractionRules = serde_json::from_str(json)?;
        // an overriding alias map only replaces the fields it names
        for field in Field::ALL {
            rules.aliases.entry(field).or_insert_with(|| {
                Self::default_aliases(field)
                    .iter()
                    .map(|w| w.to_string())
                    .collect()
            });
        }
        rules.check()?;
        Ok(rules)
    }

    // An empty entry would match everywhere
    fn check(&self) -> Result<(), KtpError> {
        if self.typos.iter().any(|(bad, _)| bad.trim().is_empty()) {
            return Err(KtpError::ConfigError("typo table has an empty entry".to_string()));
        }
        for (field, words) in &self.aliases {
            if words.iter().any(|w| w.trim().is_empty()) {
                return Err(KtpError::ConfigError(format!(
                    "empty alias for {}",
                    field.column()
                )));
            }
        }
        if self.job_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(KtpError::ConfigError("empty occupation keyword".to_string()));
        }
        Ok(())
    }

    pub fn from_json_file(path: &Path) -> Result<Self, KtpError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            KtpError::ConfigError(format!("Failed to read rules file {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }
}
