//! Digest command - checksum a blob and store it on the asset.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use colored::Colorize;
use dandi::record::compute_digest;
use dandi::{RecordId, RecordStore};

use super::{open_store, CommandResult};

pub fn run(id: String, file: PathBuf, store: PathBuf) -> CommandResult {
    let store = open_store(&store)?;
    let id = RecordId::new(id);
    // Fail on a wrong id before reading a possibly large blob.
    store.get_record(&id)?.into_asset()?;

    let blob = File::open(&file)
        .map_err(|e| format!("Failed to open '{}': {}", file.display(), e))?;
    let size = blob.metadata()?.len();
    let digest = compute_digest(BufReader::new(blob), size)?;
    store.save_digest(&id, &digest)?;

    println!("{} {}", "Digest stored for".cyan().bold(), id.as_str().white());
    println!("  sha256: {}", digest.sha256.as_deref().unwrap_or_default());
    println!("  etag:   {}", digest.etag.as_deref().unwrap_or_default());
    Ok(())
}
