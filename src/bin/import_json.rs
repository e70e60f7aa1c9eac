use clap::Parser;
use kb_import::cli::{self, ImportJsonArgs};
use kb_import::commands;

fn main() {
    cli::init_tracing();
    let args = ImportJsonArgs::parse();

    let Some(json_file) = args.json_file.clone() else {
        cli::exit_with_usage::<ImportJsonArgs>(
            "import_json knowledge-base-template.json > import.sql",
        );
    };

    cli::exit_on_error(commands::import_json::run(&json_file, &args));
}
