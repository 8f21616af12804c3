//! `fieldloom-io` — file I/O for review documents.

pub mod json;

pub use json::{export_file_name, load_document, write_document};
