//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// dandi-admin: validate archive metadata and manage version DOIs
#[derive(Parser)]
#[command(name = "dandi-admin")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Location of the record store.
#[derive(Args, Clone, Debug)]
pub struct StoreArgs {
    /// Record store directory
    #[arg(long, value_name = "DIR", env = "DANDI_STORE", default_value = "dandi-store")]
    pub store: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate an asset's metadata and record the outcome
    ValidateAsset {
        /// Asset record id
        #[arg(value_name = "ASSET_ID")]
        id: String,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Validate a version's metadata and assets and record the outcome
    ValidateVersion {
        /// Version record id
        #[arg(value_name = "VERSION_ID")]
        id: String,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Show a record's validation status
    Status {
        /// Asset or version record id
        #[arg(value_name = "RECORD_ID")]
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Compute a blob's checksums and store them on the asset
    Digest {
        /// Asset record id
        #[arg(value_name = "ASSET_ID")]
        id: String,

        /// Blob file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Write dandiset.yaml and assets.yaml (plus JSON-LD copies) for a version
    Manifest {
        /// Version record id
        #[arg(value_name = "VERSION_ID")]
        id: String,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Manage version DOIs
    Doi {
        #[command(subcommand)]
        command: DoiCommands,
    },
}

#[derive(Subcommand)]
pub enum DoiCommands {
    /// Print the DOI and registration payload without contacting the registry
    Preview {
        /// Version record id
        #[arg(value_name = "VERSION_ID")]
        id: String,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Register the version's DOI (no-op if it already has one)
    Create {
        /// Version record id
        #[arg(value_name = "VERSION_ID")]
        id: String,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Delete the version's DOI if it is still a draft
    Delete {
        /// Version record id
        #[arg(value_name = "VERSION_ID")]
        id: String,

        #[command(flatten)]
        store: StoreArgs,
    },
}
