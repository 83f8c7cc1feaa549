mod sales;
mod scrape;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "grocerdb-cli")]
#[command(about = "grocerdb command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract sales from downloaded catalog images and save them.
    Scrape {
        /// Vendor folder to scrape; repeat for several. Defaults to every
        /// known vendor.
        #[arg(long = "vendor")]
        vendors: Vec<String>,
        /// Root folder holding one sub-folder per vendor.
        #[arg(long)]
        images_root: Option<PathBuf>,
        /// List the images that would be sent without calling the model.
        #[arg(long)]
        dry_run: bool,
    },
    /// Inspect the saved sales document.
    Sales {
        #[command(subcommand)]
        command: SalesCommands,
    },
}

#[derive(Debug, Subcommand)]
enum SalesCommands {
    /// Print item counts per vendor.
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = grocerdb_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Scrape {
            vendors,
            images_root,
            dry_run,
        } => {
            let images_root = images_root.unwrap_or_else(|| config.images_root.clone());
            scrape::run_scrape(&config, &vendors, &images_root, dry_run).await?;
        }
        Commands::Sales {
            command: SalesCommands::Show,
        } => sales::run_sales_show(&config)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
