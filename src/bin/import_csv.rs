use clap::Parser;
use kb_import::cli::{self, ImportCsvArgs};
use kb_import::commands;

fn main() {
    cli::init_tracing();
    let args = ImportCsvArgs::parse();

    let Some(csv_file) = args.csv_file.clone() else {
        cli::exit_with_usage::<ImportCsvArgs>(
            "import_csv knowledge-base-template.csv > import.sql",
        );
    };

    cli::exit_on_error(commands::import_csv::run(&csv_file, &args));
}
