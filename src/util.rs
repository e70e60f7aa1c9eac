use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

/// Wall-clock time in the `YYYY-MM-DDTHH:MM:SS.ffffff` form the import headers use.
pub fn now_local_isoformat() -> String {
    Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Renders JSON the way the existing import pipeline stores metadata:
/// `", "` and `": "` separators, non-ASCII escaped as `\uXXXX`.
pub fn to_canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, CanonicalFormatter);
    value
        .serialize(&mut serializer)
        .context("failed to serialize metadata json")?;
    String::from_utf8(buf).context("canonical json produced invalid UTF-8")
}

struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (idx, ch) in fragment.char_indices() {
            if ch.is_ascii() && ch != '\u{7f}' {
                continue;
            }
            writer.write_all(fragment[start..idx].as_bytes())?;
            let mut units = [0_u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = idx + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Writes rendered SQL to `path`, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("failed to create sql file: {}", path.display()))?;
            file.write_all(data)
                .with_context(|| format!("failed to write sql file: {}", path.display()))?;
        }
        None => {
            let mut output = io::BufWriter::new(io::stdout().lock());
            output
                .write_all(data)
                .context("failed to write sql to stdout")?;
            output.flush().context("failed to flush stdout")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{now_local_isoformat, to_canonical_json, write_output};

    #[test]
    fn canonical_json_uses_spaced_separators() {
        let value = json!({"a": 1, "tags": ["x", "y"], "nested": {"b": true, "c": null}});
        let text = to_canonical_json(&value).expect("serialize");
        assert_eq!(
            text,
            r#"{"a": 1, "tags": ["x", "y"], "nested": {"b": true, "c": null}}"#
        );
    }

    #[test]
    fn canonical_json_keeps_empty_containers_compact() {
        assert_eq!(to_canonical_json(&json!({})).expect("serialize"), "{}");
        assert_eq!(to_canonical_json(&json!([])).expect("serialize"), "[]");
    }

    #[test]
    fn canonical_json_escapes_non_ascii() {
        let value = json!({"name": "café", "emoji": "😀", "del": "\u{7f}"});
        let text = to_canonical_json(&value).expect("serialize");
        assert_eq!(
            text,
            r#"{"name": "caf\u00e9", "emoji": "\ud83d\ude00", "del": "\u007f"}"#
        );
    }

    #[test]
    fn canonical_json_keeps_standard_escapes() {
        let value = json!({"quote": "say \"hi\"\n", "path": "a\\b"});
        let text = to_canonical_json(&value).expect("serialize");
        assert_eq!(text, r#"{"quote": "say \"hi\"\n", "path": "a\\b"}"#);

        let parsed: serde_json::Value = serde_json::from_str(&text).expect("reparse");
        assert_eq!(parsed, value);
    }

    #[test]
    fn canonical_json_keeps_integers_beyond_64_bits() {
        let value: serde_json::Value =
            serde_json::from_str(r#"{"id": 123456789012345678901234567890, "ratio": 1.10}"#)
                .expect("parse");
        let text = to_canonical_json(&value).expect("serialize");
        assert_eq!(text, r#"{"id": 123456789012345678901234567890, "ratio": 1.10}"#);
    }

    #[test]
    fn local_isoformat_has_microsecond_precision() {
        let stamp = now_local_isoformat();
        let (date, time) = stamp.split_once('T').expect("T separator");
        assert_eq!(date.len(), 10);
        assert_eq!(time.len(), "HH:MM:SS.ffffff".len());
    }

    #[test]
    fn write_output_creates_target_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("import.sql");

        write_output(Some(&path), b"SELECT 1;\n").expect("write");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "SELECT 1;\n");
    }
}
