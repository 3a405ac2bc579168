//! Label Table Ingestion
//!
//! The label table carries fixed three-column rows `(kind, value, image)`.
//! The first two rows are header/metadata and never reach the pairing stage.
//! Rows with missing trailing fields are read as blank fields, not errors;
//! the pairing policy decides what to do with them.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::pipeline::PipelineError;

/// Leading header/metadata rows skipped in the label table.
const LABEL_TABLE_SKIP: usize = 2;

/// One row of the label table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelRecord {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub value: String,
    /// Name key into the image dictionary. May be unresolved.
    #[serde(default)]
    pub image: String,
}

impl LabelRecord {
    /// A record with a blank value carries nothing printable.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Read the label table in row order, skipping the header/metadata rows.
pub fn read_label_records(path: &Path) -> Result<Vec<LabelRecord>, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut records = Vec::new();
    for row in reader.deserialize::<LabelRecord>().skip(LABEL_TABLE_SKIP) {
        records.push(row?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_table(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn skips_first_two_rows() {
        let file = write_table("Label Table,,\nkind,value,image\nName,Alice,imgA\n");
        let records = read_label_records(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, "Name");
        assert_eq!(records[0].value, "Alice");
        assert_eq!(records[0].image, "imgA");
    }

    #[test]
    fn short_rows_become_blank_fields() {
        let file = write_table("h,,\nh,,\nName\nEmail,a@x.com,imgB\n");
        let records = read_label_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].is_empty());
        assert_eq!(records[0].kind, "Name");
        assert!(!records[1].is_empty());
    }

    #[test]
    fn blank_value_is_empty() {
        let record = LabelRecord {
            kind: "Name".to_string(),
            value: String::new(),
            image: "imgA".to_string(),
        };
        assert!(record.is_empty());
    }
}
