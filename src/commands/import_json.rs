use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::ImportJsonArgs;
use crate::model::KnowledgeEntry;
use crate::reader::read_json_document;
use crate::sql::{ImportHeader, ImportSource, write_script};
use crate::util::{now_local_isoformat, write_output};

pub fn run(json_file: &Path, args: &ImportJsonArgs) -> Result<()> {
    info!(source = %json_file.display(), "starting json import");

    let generated_at = now_local_isoformat();
    let (script, entry_count) = render(json_file, &generated_at)?;
    write_output(args.output.as_deref(), &script)?;

    info!(
        source = %json_file.display(),
        entries = entry_count,
        "json import sql generated"
    );
    Ok(())
}

pub fn render(json_file: &Path, generated_at: &str) -> Result<(Vec<u8>, usize)> {
    let document = read_json_document(json_file)?;

    let entries = document
        .entries()
        .iter()
        .enumerate()
        .map(|(offset, raw)| {
            KnowledgeEntry::from_json_entry(offset + 1, raw).with_context(|| {
                format!(
                    "failed to map entry {} of {}",
                    offset + 1,
                    json_file.display()
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let header = ImportHeader {
        source: ImportSource::Json {
            source: document.declared_source(),
            version: document.declared_version(),
        },
        generated_at: generated_at.to_string(),
        input_path: json_file.display().to_string(),
    };

    let mut script = Vec::new();
    write_script(&mut script, &header, &entries)?;
    Ok((script, entries.len()))
}
