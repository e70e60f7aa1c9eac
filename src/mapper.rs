use serde_json::{Map, Value};

use crate::error::{ImportError, ImportResult};
use crate::model::KnowledgeEntry;
use crate::reader::CsvRow;

/// A mapped CSV row together with the recoverable metadata failure, if any.
#[derive(Debug)]
pub struct MappedRow {
    pub entry: KnowledgeEntry,
    pub warning: Option<ImportError>,
}

impl KnowledgeEntry {
    /// Builds an entry from a headed CSV row.
    ///
    /// The `metadata` cell holds JSON text; if it does not parse the entry gets `{}`
    /// and the decode failure is handed back in [`MappedRow::warning`].
    pub fn from_csv_row(row: &CsvRow) -> ImportResult<MappedRow> {
        let require = |field: &'static str| {
            row.get(field)
                .map(ToOwned::to_owned)
                .ok_or(ImportError::MissingField {
                    index: row.index,
                    field,
                })
        };

        let agent_type = require("agent_type")?;
        let source_type = require("source_type")?;
        let category = require("category")?;
        let key = require("key")?;
        let value = require("value")?;
        let raw_metadata = require("metadata")?;
        let is_active = require("is_active")?.to_lowercase() == "true";

        let (metadata, warning) = match serde_json::from_str::<Value>(&raw_metadata) {
            Ok(metadata) => (metadata, None),
            Err(source) => (
                empty_metadata(),
                Some(ImportError::MetadataDecode {
                    index: row.index,
                    source,
                }),
            ),
        };

        Ok(MappedRow {
            entry: KnowledgeEntry {
                agent_type,
                source_type,
                category,
                key,
                value,
                metadata,
                is_active,
            },
            warning,
        })
    }

    /// Builds an entry from one element of a JSON document's `entries` array.
    pub fn from_json_entry(index: usize, raw: &Value) -> ImportResult<KnowledgeEntry> {
        let object = raw.as_object().ok_or_else(|| ImportError::InvalidField {
            index,
            field: "entry",
            expected: "an object",
            found: json_type_name(raw).to_string(),
        })?;

        let metadata = match object.get("metadata") {
            None | Some(Value::Null) => empty_metadata(),
            Some(metadata) => metadata.clone(),
        };

        let is_active = match object.get("isActive") {
            None | Some(Value::Null) => true,
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(text)) => text.to_lowercase() == "true",
            Some(other) => {
                return Err(ImportError::InvalidField {
                    index,
                    field: "isActive",
                    expected: "a boolean",
                    found: json_type_name(other).to_string(),
                });
            }
        };

        Ok(KnowledgeEntry {
            agent_type: required_string(object, index, "agentType")?,
            source_type: required_string(object, index, "sourceType")?,
            category: required_string(object, index, "category")?,
            key: required_string(object, index, "key")?,
            value: required_string(object, index, "value")?,
            metadata,
            is_active,
        })
    }
}

fn required_string(
    object: &Map<String, Value>,
    index: usize,
    field: &'static str,
) -> ImportResult<String> {
    match object.get(field) {
        None => Err(ImportError::MissingField { index, field }),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => Err(ImportError::InvalidField {
            index,
            field,
            expected: "a string",
            found: json_type_name(other).to_string(),
        }),
    }
}

fn empty_metadata() -> Value {
    Value::Object(Map::new())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
