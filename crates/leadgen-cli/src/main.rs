use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::store::ExportFormat;

mod batch;
mod commands;
mod store;

#[derive(Debug, Parser)]
#[command(name = "leadgen")]
#[command(about = "Find local businesses and enrich them with contact channels")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Enrich a JSON array of business records read from a file
    Enrich {
        /// JSON file holding an array of business records
        #[arg(long)]
        input: PathBuf,

        /// Write results here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Search a niche in a city, enrich new businesses, and cache them
    Search {
        /// Business niche, e.g. "padaria"
        #[arg(long)]
        niche: String,

        /// City to search in
        #[arg(long)]
        city: String,

        /// Write the newly enriched records here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Export a cached search
    Export {
        #[arg(long)]
        niche: String,

        #[arg(long)]
        city: String,

        /// Keep only records with a WhatsApp number
        #[arg(long)]
        whatsapp_only: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,

        /// Write results here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = leadgen_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(env = %config.env, data_dir = %config.data_dir.display(), "config loaded");

    let stop = batch::StopSignal::default();
    stop.listen_for_ctrl_c();

    match cli.command {
        Commands::Enrich { input, output } => {
            commands::run_enrich(&config, &input, output.as_deref(), &stop).await
        }
        Commands::Search {
            niche,
            city,
            output,
        } => commands::run_search(&config, &niche, &city, output.as_deref(), &stop).await,
        Commands::Export {
            niche,
            city,
            whatsapp_only,
            format,
            output,
        } => {
            commands::run_export(&config, &niche, &city, whatsapp_only, format, output.as_deref())
                .await
        }
    }
}
