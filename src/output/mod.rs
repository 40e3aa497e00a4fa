//! Output formatting

pub mod formatter;

pub use formatter::{write_results_to_file, OutputFormat, ResultFormatter};
