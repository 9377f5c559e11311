pub mod csv_store;

pub use csv_store::CsvRecordStore;

use crate::models::FieldRecord;
use crate::utils::KtpError;
use chrono::NaiveDateTime;
use std::path::PathBuf;

/// Durable destination for extracted records.
///
/// One call appends one row; implementations must not corrupt rows written
/// by earlier calls if an append fails part way.
pub trait RecordSink {
    /// Appends `record` with its provenance and returns where it was stored
    fn append_record(
        &self,
        record: &FieldRecord,
        source_file: &str,
        timestamp: NaiveDateTime,
    ) -> Result<PathBuf, KtpError>;
}
