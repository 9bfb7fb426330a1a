//! dandi-admin CLI - metadata validation and DOI management.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands, DoiCommands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::ValidateAsset { id, store } => {
            commands::validate::run_asset(id, store.store, cli.verbose)
        }

        Commands::ValidateVersion { id, store } => {
            commands::validate::run_version(id, store.store, cli.verbose)
        }

        Commands::Status { id, json, store } => commands::status::run(id, json, store.store),

        Commands::Digest { id, file, store } => commands::digest::run(id, file, store.store),

        Commands::Manifest { id, output, store } => {
            commands::manifest::run(id, output, store.store)
        }

        Commands::Doi { command } => match command {
            DoiCommands::Preview { id, store } => commands::doi::preview(id, store.store),
            DoiCommands::Create { id, store } => commands::doi::create(id, store.store),
            DoiCommands::Delete { id, store } => commands::doi::delete(id, store.store),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "dandi=debug,dandi_cli=debug" } else { "dandi=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
