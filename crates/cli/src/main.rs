//! Catalog Provisioner CLI - Database migrations and location bookkeeping.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! provisioner-cli migrate
//!
//! # List the fulfillment location recorded for each shop
//! provisioner-cli locations list
//!
//! # Forget a shop's recorded location (next request creates a new one)
//! provisioner-cli locations forget demo.myshopify.com
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "provisioner-cli")]
#[command(author, version, about = "Catalog provisioner CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage recorded fulfillment locations
    Locations {
        #[command(subcommand)]
        action: LocationAction,
    },
}

#[derive(Subcommand)]
enum LocationAction {
    /// List every recorded location
    List,
    /// Forget the location recorded for a shop
    Forget {
        /// Shop domain (e.g. demo.myshopify.com)
        shop: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Locations { action } => match action {
            LocationAction::List => commands::locations::list().await?,
            LocationAction::Forget { shop } => commands::locations::forget(&shop).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_forget() {
        let cli = Cli::try_parse_from([
            "provisioner-cli",
            "locations",
            "forget",
            "demo.myshopify.com",
        ])
        .unwrap_or_else(|e| panic!("{e}"));
        assert!(matches!(
            cli.command,
            Commands::Locations {
                action: LocationAction::Forget { ref shop }
            } if shop == "demo.myshopify.com"
        ));
    }
}
