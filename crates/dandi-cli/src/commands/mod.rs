//! CLI command implementations.

pub mod digest;
pub mod doi;
pub mod manifest;
pub mod status;
pub mod validate;

use std::path::Path;

use colored::{ColoredString, Colorize};
use dandi::{FileStore, RecordStatus};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Open an existing store. A missing directory is an error rather than a
/// fresh empty store.
pub fn open_store(dir: &Path) -> Result<FileStore, Box<dyn std::error::Error>> {
    if !dir.is_dir() {
        return Err(format!("Record store not found: {}", dir.display()).into());
    }
    Ok(FileStore::open(dir)?)
}

pub fn status_label(status: RecordStatus) -> ColoredString {
    match status {
        RecordStatus::Valid => status.label().green().bold(),
        RecordStatus::Invalid => status.label().red().bold(),
        RecordStatus::Validating => status.label().yellow(),
        RecordStatus::Pending => status.label().white(),
    }
}

/// Print multi-line validation error text, indented.
pub fn print_validation_error(text: &str) {
    for line in text.lines() {
        println!("  {}", line);
    }
}
