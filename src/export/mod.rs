pub mod csv;
pub mod json;

pub use self::csv::{export_csv, export_csv_to_path};
pub use self::json::{export_json, export_json_to_path, import_json, import_json_from_path};
