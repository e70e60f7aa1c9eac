use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::ImportCsvArgs;
use crate::model::KnowledgeEntry;
use crate::reader::open_csv;
use crate::sql::{ImportHeader, ImportSource, write_script};
use crate::util::{now_local_isoformat, write_output};

pub fn run(csv_file: &Path, args: &ImportCsvArgs) -> Result<()> {
    info!(source = %csv_file.display(), "starting csv import");

    let generated_at = now_local_isoformat();
    let (script, entry_count) = render(csv_file, &generated_at)?;
    write_output(args.output.as_deref(), &script)?;

    info!(
        source = %csv_file.display(),
        entries = entry_count,
        "csv import sql generated"
    );
    Ok(())
}

/// Maps every row of `csv_file` and renders the full script into memory.
///
/// Returns the script bytes and the number of INSERT statements it holds.
pub fn render(csv_file: &Path, generated_at: &str) -> Result<(Vec<u8>, usize)> {
    let rows = open_csv(csv_file)?;

    let mut entries = Vec::new();
    for row in rows {
        let row = row?;
        let mapped = KnowledgeEntry::from_csv_row(&row)
            .with_context(|| format!("failed to map row {} of {}", row.index, csv_file.display()))?;
        // Hidden when RUST_LOG is below warn; `--help` says so.
        if let Some(warning) = mapped.warning {
            warn!(row = row.index, error = %warning, "metadata is not valid json");
        }
        entries.push(mapped.entry);
    }

    let header = ImportHeader {
        source: ImportSource::Csv,
        generated_at: generated_at.to_string(),
        input_path: csv_file.display().to_string(),
    };

    let mut script = Vec::new();
    write_script(&mut script, &header, &entries)?;
    Ok((script, entries.len()))
}
