use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;

use mergington_activities::config::ServerConfig;
use mergington_activities::seed;
use mergington_activities::state::AppState;

#[derive(Parser)]
#[command(
    name = "mergington-activities",
    about = "Serves the Mergington High School activity signup API"
)]
struct Cli {
    /// Path to config file (default: ~/.config/mergington/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Port to listen on, overriding config and environment
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ServerConfig::load(cli.config.as_ref())?;
    if let Some(port) = cli.port {
        config.port = port;
    }

    let catalog = match &config.seed_file {
        Some(path) => {
            info!(path = %path.display(), "loading activities from seed file");
            seed::load_catalog(path)?
        }
        None => seed::default_catalog(),
    };
    info!(activities = catalog.len(), "activity directory ready");

    let state = AppState::with_catalog(catalog);

    let app = if config.static_dir.is_dir() {
        info!("Serving static files from {}", config.static_dir.display());
        mergington_activities::build_router_with_static(state, &config.static_dir)
    } else {
        info!("No static directory found, serving API only");
        mergington_activities::build_router(state)
    };

    let cancel = CancellationToken::new();
    let (addr, handle) =
        mergington_activities::spawn_http_server(app, &config.host, config.port, cancel.clone())
            .await?;
    info!("mergington-activities listening on http://{}", addr);

    tokio::signal::ctrl_c().await?;
    info!("received ctrl-c, shutting down");
    cancel.cancel();
    handle.await?;

    Ok(())
}
