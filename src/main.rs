use anyhow::Context;
use clap::{Parser, Subcommand};
use goa_taluka_map::{config, data, server, view::MapSession};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the map assets and the taluka API
    Serve {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
    /// Print label positions for every taluka as JSON
    Markers {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
    /// Print the tooltip shown when hovering a taluka
    Lookup {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
        name: String,
    },
}

async fn load_session(path: &Path) -> anyhow::Result<(config::AppConfig, MapSession)> {
    info!(config = ?path, "loading configuration");
    let app_config = config::AppConfig::load_from_file(path)?;
    let loaded = data::load_sources(&app_config.input).await;
    let session = MapSession::new(&app_config, loaded).context("Invalid map configuration")?;
    Ok((app_config, session))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve { config } => {
            let (app_config, session) = load_session(config).await?;
            if !session.is_ready() {
                tracing::warn!("no geometry loaded; clients will stay on the loading placeholder");
            }
            server::start_server(app_config, session).await?;
        }
        Commands::Markers { config } => {
            let (_, session) = load_session(config).await?;
            println!("{}", serde_json::to_string_pretty(session.markers())?);
        }
        Commands::Lookup { config, name } => {
            let (_, session) = load_session(config).await?;
            println!("{}", serde_json::to_string_pretty(&session.describe(name))?);
        }
    }

    Ok(())
}
