//! Export/import of the ledger as a JSON array-of-arrays document.

pub mod document;
pub mod json_backend;

pub use document::{
    decode_document, export_document, import_into, parse_document, ImportMode, ImportReport,
};
pub use json_backend::{load_ledger_from_path, save_ledger_to_path};

/// Default file name for `export` and `import`.
pub const DEFAULT_EXPORT_FILE: &str = "gpa_data.json";
