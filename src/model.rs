use serde::Deserialize;
use serde_json::Value;

/// One `knowledge_base` row, holding unescaped text.
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeEntry {
    pub agent_type: String,
    pub source_type: String,
    pub category: String,
    pub key: String,
    pub value: String,
    pub metadata: Value,
    pub is_active: bool,
}

/// Root of a JSON knowledge-base export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonImportDocument {
    #[serde(default)]
    pub entries: Option<Vec<Value>>,
    #[serde(default)]
    pub metadata: Option<DocumentMetadata>,
}

impl JsonImportDocument {
    pub fn entries(&self) -> &[Value] {
        self.entries.as_deref().unwrap_or_default()
    }

    pub fn declared_source(&self) -> String {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.source.as_ref())
            .map(value_label)
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn declared_version(&self) -> String {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.version.as_ref())
            .map(value_label)
            .unwrap_or_else(|| "1.0".to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub source: Option<Value>,
    #[serde(default)]
    pub version: Option<Value>,
}

fn value_label(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
