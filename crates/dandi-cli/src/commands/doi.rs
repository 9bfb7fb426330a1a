//! DOI commands - preview, create and delete version DOIs.

use std::path::PathBuf;

use colored::Colorize;
use dandi::doi::{DeleteOutcome, DoiDataBuilder};
use dandi::{DoiPublisher, RecordId, RecordStore, Settings};

use super::{open_store, CommandResult};

pub fn preview(id: String, store: PathBuf) -> CommandResult {
    let settings = Settings::from_env()?;
    let store = open_store(&store)?;
    let version = store.get_record(&RecordId::new(id))?.into_version()?;

    let builder =
        DoiDataBuilder::from_settings(&settings.doi).with_mode(settings.validation_mode());
    let mut metadata = version.metadata()?;
    let data = builder.build(
        &version.dataset.dataset_identifier,
        &version.dataset.version_label,
        &mut metadata,
    )?;

    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}

pub fn create(id: String, store: PathBuf) -> CommandResult {
    let settings = Settings::from_env()?;
    let store = open_store(&store)?;
    let publisher = DoiPublisher::from_settings(&settings)?;

    if !publisher.client().is_configured() {
        println!("{}", "DOI registry not configured; the DOI is recorded only".yellow());
    }
    let doi = publisher.create_for_record(&store, &RecordId::new(id))?;
    println!("{} {}", "DOI:".green().bold(), doi);
    Ok(())
}

pub fn delete(id: String, store: PathBuf) -> CommandResult {
    let settings = Settings::from_env()?;
    let store = open_store(&store)?;
    let publisher = DoiPublisher::from_settings(&settings)?;

    match publisher.delete_for_record(&store, &RecordId::new(id))? {
        None => println!("{}", "Version has no DOI".yellow()),
        Some(DeleteOutcome::Disabled) => {
            println!("{}", "DOI registry not configured; nothing deleted".yellow())
        }
        Some(DeleteOutcome::Absent) => println!("{}", "DOI not found in registry".yellow()),
        Some(DeleteOutcome::Retained { state }) => {
            println!("{} {}", "DOI kept; registry state is".yellow(), state.white().bold())
        }
        Some(DeleteOutcome::Deleted) => println!("{}", "Draft DOI deleted".green().bold()),
    }
    Ok(())
}
