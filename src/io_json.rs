//! Input-file reader: a single JSON array of records.

use crate::errors::PopulateError;
use crate::record::InputRecord;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info, warn};

/// Reads the input file and parses it as a JSON array of [`InputRecord`].
///
/// The array itself must parse; individual elements with an invalid shape
/// (wrong field types, non-object entries) are logged with their index and
/// skipped, so one malformed record never aborts the run.
///
/// # Errors
/// - [`PopulateError::Io`] if the file cannot be opened or read.
/// - [`PopulateError::Parse`] if the contents are not a valid JSON array.
/// - [`PopulateError::EmptyInput`] if the parsed array has no elements.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<InputRecord>, PopulateError> {
    info!("Reading input file {:?}", path.as_ref());

    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    let raw: Vec<Value> = serde_json::from_reader(reader)?;
    if raw.is_empty() {
        return Err(PopulateError::EmptyInput);
    }

    let total = raw.len();
    let mut records = Vec::with_capacity(total);
    for (i, v) in raw.into_iter().enumerate() {
        match serde_json::from_value::<InputRecord>(v) {
            Ok(r) => records.push(r),
            Err(e) => {
                warn!("Record {}/{} has an invalid shape, skipping: {e}", i + 1, total);
            }
        }
    }

    debug!("Loaded {} of {} records", records.len(), total);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::RawId;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn reads_record_array() {
        let f = write_temp(
            r#"[{"id": 5, "text": "a"}, {"text": "b"}, {"id": "  ", "text": "c"}]"#,
        );
        let records = read_records(f.path()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, RawId::Uint(5));
        assert_eq!(records[2].id, RawId::Text("  ".into()));
    }

    #[test]
    fn mistyped_record_skipped_keeps_valid_records() {
        let f = write_temp(r#"[{"text": "ok"}, {"text": 5}, 7, {"text": "also ok"}]"#);
        let records = read_records(f.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text_for_embedding(), Some("ok"));
        assert_eq!(records[1].text_for_embedding(), Some("also ok"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_records("/nonexistent/records.json").unwrap_err();
        assert!(matches!(err, PopulateError::Io(_)));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let f = write_temp("{not json");
        let err = read_records(f.path()).unwrap_err();
        assert!(matches!(err, PopulateError::Parse(_)));
    }

    #[test]
    fn non_array_is_parse_error() {
        let f = write_temp(r#"{"text": "a"}"#);
        let err = read_records(f.path()).unwrap_err();
        assert!(matches!(err, PopulateError::Parse(_)));
    }

    #[test]
    fn empty_array_is_rejected() {
        let f = write_temp("[]");
        let err = read_records(f.path()).unwrap_err();
        assert!(matches!(err, PopulateError::EmptyInput));
    }
}
