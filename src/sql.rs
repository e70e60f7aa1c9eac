use std::io::{self, Write};

use anyhow::{Context, Result};

use crate::model::KnowledgeEntry;
use crate::util::to_canonical_json;

pub const TABLE_NAME: &str = "knowledge_base";

pub const COLUMNS: [&str; 8] = [
    "agent_type",
    "source_type",
    "category",
    "key",
    "value",
    "metadata",
    "is_active",
    "synced_at",
];

/// Doubles every single quote so `text` can sit inside a `'...'` literal.
pub fn escape_literal(text: &str) -> String {
    text.replace('\'', "''")
}

pub fn quote_literal(text: &str) -> String {
    format!("'{}'", escape_literal(text))
}

/// Which pipeline produced the entries; controls the header and entry comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
    Csv,
    Json { source: String, version: String },
}

#[derive(Debug, Clone)]
pub struct ImportHeader {
    pub source: ImportSource,
    pub generated_at: String,
    pub input_path: String,
}

/// Renders a complete import script: header comments, one commented INSERT per entry
/// in input order, and the closing summary.
pub fn write_script<W: Write>(
    out: &mut W,
    header: &ImportHeader,
    entries: &[KnowledgeEntry],
) -> Result<()> {
    write_header(out, header, entries.len()).context("failed to render sql header")?;

    for (offset, entry) in entries.iter().enumerate() {
        let sequence = offset + 1;
        match header.source {
            ImportSource::Csv => writeln!(out, "-- Entry {sequence}")?,
            ImportSource::Json { .. } => {
                writeln!(out, "-- Entry {sequence}: {}", single_line(&entry.key))?
            }
        }
        let statement = render_insert(entry)
            .with_context(|| format!("failed to render insert for entry {sequence}"))?;
        writeln!(out, "{statement}")?;
        writeln!(out)?;
        writeln!(out)?;
    }

    writeln!(
        out,
        "-- ✅ Done! Generated {} INSERT statements",
        entries.len()
    )?;
    Ok(())
}

fn write_header<W: Write>(out: &mut W, header: &ImportHeader, count: usize) -> io::Result<()> {
    match header.source {
        ImportSource::Csv => writeln!(out, "-- Knowledge Base Import")?,
        ImportSource::Json { .. } => writeln!(out, "-- Knowledge Base Import (JSON)")?,
    }
    writeln!(out, "-- Generated: {}", header.generated_at)?;
    writeln!(out, "-- Source: {}", single_line(&header.input_path))?;
    writeln!(out)?;

    writeln!(out, "-- Total Entries: {count}")?;
    if let ImportSource::Json { source, version } = &header.source {
        writeln!(out, "-- Source: {}", single_line(source))?;
        writeln!(out, "-- Version: {}", single_line(version))?;
    }
    writeln!(out)?;
    Ok(())
}

/// One `INSERT INTO knowledge_base` statement, terminated by `;`.
pub fn render_insert(entry: &KnowledgeEntry) -> Result<String> {
    let metadata = to_canonical_json(&entry.metadata)?;

    let values = [
        quote_literal(&entry.agent_type),
        quote_literal(&entry.source_type),
        quote_literal(&entry.category),
        quote_literal(&entry.key),
        quote_literal(&entry.value),
        format!("{}::jsonb", quote_literal(&metadata)),
        entry.is_active.to_string(),
        "NOW()".to_string(),
    ];

    Ok(format!(
        "INSERT INTO {TABLE_NAME} (\n{}\n) VALUES (\n{}\n);",
        indented_list(COLUMNS.iter().copied()),
        indented_list(values.iter().map(String::as_str)),
    ))
}

fn indented_list<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items
        .map(|item| format!("  {item}"))
        .collect::<Vec<_>>()
        .join(",\n")
}

// Comments end at the newline, so embedded line breaks would leak text into the SQL.
fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}
