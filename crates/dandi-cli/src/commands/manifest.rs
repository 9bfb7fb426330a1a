//! Manifest command - write a version's JSON-LD manifests.

use std::path::PathBuf;

use colored::Colorize;
use dandi::manifest::write_manifests;
use dandi::RecordId;

use super::{open_store, CommandResult};

pub fn run(id: String, output: PathBuf, store: PathBuf) -> CommandResult {
    let store = open_store(&store)?;
    let paths = write_manifests(&store, &RecordId::new(id), &output)?;

    println!("{}", "Manifests written:".green().bold());
    for path in paths.all() {
        println!("  {}", path.display());
    }
    Ok(())
}
