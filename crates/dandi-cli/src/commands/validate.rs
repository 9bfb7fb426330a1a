//! Validate commands - run validation and persist the outcome.

use std::path::PathBuf;

use colored::Colorize;
use dandi::record::Settled;
use dandi::{RecordId, Settings, Validator};

use super::{open_store, print_validation_error, status_label, CommandResult};

pub fn run_asset(id: String, store: PathBuf, verbose: bool) -> CommandResult {
    let settings = Settings::from_env()?;
    let store = open_store(&store)?;
    let validator = Validator::new(&store).with_mode(settings.validation_mode());

    let settled = validator.validate_asset(&RecordId::new(id.as_str()))?;
    report("Asset", &id, &settled, verbose);
    Ok(())
}

pub fn run_version(id: String, store: PathBuf, verbose: bool) -> CommandResult {
    let settings = Settings::from_env()?;
    let store = open_store(&store)?;
    let validator = Validator::new(&store).with_mode(settings.validation_mode());

    let settled = validator.validate_version(&RecordId::new(id.as_str()))?;
    report("Version", &id, &settled, verbose);
    Ok(())
}

fn report(kind: &str, id: &str, settled: &Settled, verbose: bool) {
    println!(
        "{} {} {}",
        kind.cyan().bold(),
        id.white(),
        status_label(settled.status())
    );
    if !settled.is_valid() {
        print_validation_error(settled.validation_error());
    } else if verbose {
        println!("  {}", "No validation errors".dimmed());
    }
}
