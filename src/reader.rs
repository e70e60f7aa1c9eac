use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};

use crate::error::{ImportError, ImportResult};
use crate::model::JsonImportDocument;

/// A CSV data row keyed by header name. `index` is 1-based and excludes the header.
#[derive(Debug, Clone)]
pub struct CsvRow {
    pub index: usize,
    fields: HashMap<String, String>,
}

impl CsvRow {
    pub fn new(index: usize, fields: HashMap<String, String>) -> Self {
        Self { index, fields }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

/// Lazily yields the data rows of a headed CSV file in file order.
pub struct CsvRows {
    path: PathBuf,
    headers: StringRecord,
    records: StringRecordsIntoIter<File>,
    next_index: usize,
}

impl Iterator for CsvRows {
    type Item = ImportResult<CsvRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(err) => return Some(Err(csv_error(&self.path, err))),
        };

        let index = self.next_index;
        self.next_index += 1;

        // Short rows leave trailing columns unset; extra cells are dropped.
        let fields = self
            .headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.to_string(), cell.to_string()))
            .collect();

        Some(Ok(CsvRow::new(index, fields)))
    }
}

pub fn open_csv(path: &Path) -> ImportResult<CsvRows> {
    let file = File::open(path).map_err(|source| ImportError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);
    let headers = reader
        .headers()
        .map_err(|err| csv_error(path, err))?
        .clone();

    Ok(CsvRows {
        path: path.to_path_buf(),
        headers,
        records: reader.into_records(),
        next_index: 1,
    })
}

pub fn read_json_document(path: &Path) -> ImportResult<JsonImportDocument> {
    let raw = fs::read(path).map_err(|source| ImportError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&raw).map_err(|err| ImportError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

fn csv_error(path: &Path, err: csv::Error) -> ImportError {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => ImportError::FileAccess {
            path: path.to_path_buf(),
            source,
        },
        _ => ImportError::Parse {
            path: path.to_path_buf(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::{open_csv, read_json_document};
    use crate::error::ImportError;

    fn write_fixture(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).expect("write fixture");
        path
    }

    #[test]
    fn csv_rows_follow_file_order_with_one_based_indexes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_fixture(
            dir.path(),
            "kb.csv",
            "agent_type,key,value\nsupport,first,one\nsales,\"second, quoted\",two\n",
        );

        let rows = open_csv(&path)
            .expect("open")
            .collect::<Result<Vec<_>, _>>()
            .expect("rows");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].index, 1);
        assert_eq!(rows[0].get("agent_type"), Some("support"));
        assert_eq!(rows[1].index, 2);
        assert_eq!(rows[1].get("key"), Some("second, quoted"));
        assert_eq!(rows[1].get("metadata"), None);
    }

    #[test]
    fn csv_short_rows_leave_trailing_columns_unset() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_fixture(dir.path(), "short.csv", "a,b,c\n1,2\n1,2,3,4\n");

        let rows = open_csv(&path)
            .expect("open")
            .collect::<Result<Vec<_>, _>>()
            .expect("rows");

        assert_eq!(rows[0].get("b"), Some("2"));
        assert_eq!(rows[0].get("c"), None);
        assert_eq!(rows[1].get("c"), Some("3"));
    }

    #[test]
    fn csv_header_byte_order_mark_is_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_fixture(dir.path(), "bom.csv", "\u{feff}agent_type,key\nops,k\n");

        let rows = open_csv(&path)
            .expect("open")
            .collect::<Result<Vec<_>, _>>()
            .expect("rows");
        assert_eq!(rows[0].get("agent_type"), Some("ops"));
    }

    #[test]
    fn missing_csv_file_is_a_file_access_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = open_csv(&dir.path().join("absent.csv"))
            .err()
            .expect("missing file should fail");
        assert!(matches!(err, ImportError::FileAccess { .. }));
    }

    #[test]
    fn json_document_is_read_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_fixture(
            dir.path(),
            "kb.json",
            r#"{"metadata": {"source": "wiki"}, "entries": [{"key": "k"}]}"#,
        );

        let document = read_json_document(&path).expect("document");
        assert_eq!(document.entries().len(), 1);
        assert_eq!(document.declared_source(), "wiki");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_fixture(dir.path(), "broken.json", r#"{"entries": [}"#);

        let err = read_json_document(&path).expect_err("broken json should fail");
        assert!(matches!(err, ImportError::Parse { .. }));
    }

    #[test]
    fn non_object_json_root_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_fixture(dir.path(), "list.json", "[1, 2, 3]");

        let err = read_json_document(&path).expect_err("array root should fail");
        assert!(matches!(err, ImportError::Parse { .. }));
    }

    #[test]
    fn missing_json_file_is_a_file_access_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = read_json_document(&dir.path().join("absent.json"))
            .expect_err("missing file should fail");
        assert!(matches!(err, ImportError::FileAccess { .. }));
    }
}
