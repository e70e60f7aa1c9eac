use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "import_csv",
    version,
    about = "Convert a knowledge-base CSV export into knowledge_base INSERT statements",
    after_help = "Rows whose metadata cell is not valid JSON are imported with '{}' and reported \
                  as warnings on stderr. Keep RUST_LOG at warn or more verbose (the default is \
                  info) to see them."
)]
pub struct ImportCsvArgs {
    /// CSV file with an agent_type,source_type,category,key,value,metadata,is_active header.
    #[arg(value_name = "CSV_FILE")]
    pub csv_file: Option<PathBuf>,

    /// Write the SQL here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "import_json",
    version,
    about = "Convert a knowledge-base JSON export into knowledge_base INSERT statements"
)]
pub struct ImportJsonArgs {
    /// JSON file with an `entries` array and optional `metadata` object.
    #[arg(value_name = "JSON_FILE")]
    pub json_file: Option<PathBuf>,

    /// Write the SQL here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}

/// Prints usage to stdout and exits with status 1.
pub fn exit_with_usage<C: CommandFactory>(example: &str) -> ! {
    let mut command = C::command();
    println!("{}", command.render_usage());
    println!("Example: {example}");
    std::process::exit(1);
}

pub fn exit_on_error(result: Result<()>) {
    if let Err(err) = result {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}
