use crate::models::{FieldRecord, OutputRow, HEADERS};
use crate::storage::RecordSink;
use crate::utils::KtpError;
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, WriterBuilder};
use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::{NamedTempFile, PersistError};

type PersistFn = fn(NamedTempFile, &Path) -> Result<(), PersistError>;

fn replace_file(file: NamedTempFile, target: &Path) -> Result<(), PersistError> {
    file.persist(target).map(|_| ())
}

/// Accumulating CSV store with the fixed KTP column schema.
///
/// Each append rewrites the whole table into a temporary file next to the
/// target and renames it into place, so a failed write leaves the previous
/// table intact. When the target cannot be replaced because it is locked,
/// the table goes to `<stem>_<n>.<ext>` instead.
///
/// Appends through one store value are serialised. Separate processes
/// writing the same path are not coordinated and can lose rows.
pub struct CsvRecordStore {
    path: PathBuf,
    lock: Mutex<()>,
    persist: PersistFn,
}

impl CsvRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvRecordStore {
            path: path.into(),
            lock: Mutex::new(()),
            persist: replace_file,
        }
    }

    #[cfg(test)]
    fn with_persist(path: impl Into<PathBuf>, persist: PersistFn) -> Self {
        CsvRecordStore {
            path: path.into(),
            lock: Mutex::new(()),
            persist,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All rows of a store file, header included
    pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>, KtpError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;
        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }

    /// The primary store file and any fallback files next to it, in the
    /// order they were created
    pub fn store_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        if self.path.exists() {
            files.push(self.path.clone());
        }
        let mut n = 1;
        loop {
            let alt = alternate_path(&self.path, n);
            if !alt.exists() {
                break;
            }
            files.push(alt);
            n += 1;
        }
        files
    }

    fn write_snapshot(&self, row: &OutputRow) -> Result<NamedTempFile, KtpError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::Builder::new()
            .prefix("ocr_results_tmp_")
            .suffix(".csv")
            .tempfile_in(&dir)?;

        {
            let mut writer = WriterBuilder::new()
                .flexible(true)
                .from_writer(tmp.as_file_mut());

            if self.path.exists() {
                let mut reader = ReaderBuilder::new()
                    .has_headers(false)
                    .flexible(true)
                    .from_path(&self.path)?;
                let mut copied = 0;
                for record in reader.records() {
                    writer.write_record(&record?)?;
                    copied += 1;
                }
                debug!("Copied {} existing rows from {}", copied, self.path.display());
            } else {
                info!("Creating record store {}", self.path.display());
                writer.write_record(HEADERS)?;
            }

            writer.write_record(row.columns())?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        Ok(tmp)
    }

    fn persist_with_fallback(&self, tmp: NamedTempFile) -> Result<PathBuf, KtpError> {
        let err = match (self.persist)(tmp, &self.path) {
            Ok(()) => return Ok(self.path.clone()),
            Err(err) => err,
        };

        if err.error.kind() != io::ErrorKind::PermissionDenied {
            return Err(KtpError::StoreError(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                err.error
            )));
        }

        let alt = (1..)
            .map(|n| alternate_path(&self.path, n))
            .find(|p| !p.exists())
            .ok_or_else(|| KtpError::StoreError("No free fallback file name".to_string()))?;
        warn!(
            "{} is locked ({}), writing to {} instead",
            self.path.display(),
            err.error,
            alt.display()
        );

        (self.persist)(err.file, &alt).map_err(|e| {
            KtpError::StoreError(format!("Failed to write fallback {}: {}", alt.display(), e.error))
        })?;
        Ok(alt)
    }
}

impl RecordSink for CsvRecordStore {
    fn append_record(
        &self,
        record: &FieldRecord,
        source_file: &str,
        timestamp: NaiveDateTime,
    ) -> Result<PathBuf, KtpError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| KtpError::StoreError("Record store lock poisoned".to_string()))?;

        let row = OutputRow::new(record, source_file, timestamp);
        let tmp = self.write_snapshot(&row)?;
        let location = self.persist_with_fallback(tmp)?;
        info!("Appended {} to {}", source_file, location.display());
        Ok(location)
    }
}

/// `dir/ocr_results.csv` -> `dir/ocr_results_<n>.csv`
fn alternate_path(target: &Path, n: usize) -> PathBuf {
    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match target.extension() {
        Some(ext) => format!("{}_{}.{}", stem, n, ext.to_string_lossy()),
        None => format!("{}_{}", stem, n),
    };
    target.with_file_name(name)
}
