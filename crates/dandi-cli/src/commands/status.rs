//! Status command - show a record's validation status.

use std::path::PathBuf;

use colored::Colorize;
use dandi::record::StoredRecord;
use dandi::{RecordId, RecordStore};

use super::{open_store, print_validation_error, status_label, CommandResult};

pub fn run(id: String, json_output: bool, store: PathBuf) -> CommandResult {
    let store = open_store(&store)?;
    let record = store.get_record(&RecordId::new(id))?;

    if json_output {
        let mut status = serde_json::json!({
            "id": record.id(),
            "kind": record.kind().label(),
            "status": record.status(),
            "validation_error": record.validation_error(),
        });
        match &record {
            StoredRecord::Asset(asset) => {
                status["digest"] = asset.digest.to_metadata();
            }
            StoredRecord::Version(version) => {
                status["dataset"] = serde_json::to_value(&version.dataset)?;
                status["assets"] = serde_json::to_value(&version.assets)?;
            }
        }
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {}",
        format!("Status for {}", record.kind().label()).cyan().bold(),
        record.id().as_str().white()
    );
    println!("  Status: {}", status_label(record.status()));

    match &record {
        StoredRecord::Asset(asset) => {
            let sha256 = asset.digest.sha256.as_deref().unwrap_or("-");
            let etag = asset.digest.etag.as_deref().unwrap_or("-");
            println!("  sha256: {}", sha256.dimmed());
            println!("  etag:   {}", etag.dimmed());
        }
        StoredRecord::Version(version) => {
            println!(
                "  Dataset: {} {}",
                version.dataset.dataset_identifier.white(),
                version.dataset.version_label.white()
            );
            let doi = version.dataset.doi.as_deref().unwrap_or("none");
            println!("  DOI:     {}", doi.white());
            println!("  Assets:  {}", version.assets.len());
        }
    }

    if !record.validation_error().is_empty() {
        println!();
        println!("{}", "Validation errors:".yellow().bold());
        print_validation_error(record.validation_error());
    }

    Ok(())
}
