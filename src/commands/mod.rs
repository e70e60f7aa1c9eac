pub mod import_csv;
pub mod import_json;
