//! JSON rendering of lookup results.
//!
//! The batch is printed pretty with sorted keys. A single record written to
//! disk keeps the order rows appeared on the page.

// ============================================================================
// Imports
// ============================================================================

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::Serializer;
use serde_json::ser::PrettyFormatter;
use tracing::info;

use crate::error::Result;
use crate::record::{ReportBatch, VehicleRecord};

/// File [`write_record`] targets when no name is given.
pub const DEFAULT_RECORD_FILE: &str = "data_structure.json";

const INDENT: &[u8] = b"    ";

/// Renders `batch` as a JSON array, four-space indented, keys sorted.
///
/// # Errors
///
/// Returns [`crate::Error::Json`] if a record cannot be serialized.
pub fn batch_to_json(batch: &ReportBatch) -> Result<String> {
    // Going through `Value` sorts every object's keys.
    let value = serde_json::to_value(batch)?;

    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Writes `record` to `path` as compact JSON in page order.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] or [`crate::Error::Json`].
pub fn write_record(record: &VehicleRecord, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    info!(vin = %record.vin, path = %path.display(), "Writing record");

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, record)?;
    writer.flush()?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::vin::Vin;

    fn honda() -> VehicleRecord {
        let mut record = VehicleRecord::new(Vin::parse("1HGCM82633A004352").expect("valid vin"));
        record.decoded_details.insert("Model".to_string(), "Accord".to_string());
        record.decoded_details.insert("Make".to_string(), "Honda".to_string());
        record
    }

    #[test]
    fn test_batch_json_is_sorted_and_indented() {
        let mut batch = ReportBatch::new();
        batch.push(honda());

        let json = batch_to_json(&batch).expect("serialize");

        assert!(json.starts_with("[\n    {\n        \"additional_info\": {},\n"));
        let make = json.find("\"Make\"").expect("make present");
        let model = json.find("\"Model\"").expect("model present");
        assert!(make < model);
        assert!(json.contains("\n            \"Make\": \"Honda\","));
    }

    #[test]
    fn test_empty_batch() {
        assert_eq!(batch_to_json(&ReportBatch::new()).expect("serialize"), "[]");
    }

    #[test]
    fn test_write_record_keeps_page_order() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(DEFAULT_RECORD_FILE);

        write_record(&honda(), &path).expect("write");

        let written = std::fs::read_to_string(&path).expect("read back");
        assert!(written.starts_with(
            r#"{"decoded_details":{"Model":"Accord","Make":"Honda"},"additional_info":{}"#
        ));
        assert!(written.ends_with(r#""images":{"vehicle_logo":"","vehicle_images":[]}}"#));
    }

    #[test]
    fn test_write_record_to_missing_directory_fails() {
        let err = write_record(&honda(), "/nonexistent/dir/record.json").expect_err("no dir");
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
