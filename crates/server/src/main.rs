use clap::Parser;
use heatmap::Heatmap;
use heatmap_server::config::{load_index_config, parse_listen_addr};
use heatmap_server::{AppState, ServerConfig, run_server};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Listen address; `:port` binds every interface
    #[arg(long, env = "API_HOST", default_value = ServerConfig::DEFAULT_API_HOST)]
    api_host: String,

    /// CSV dataset to load at startup and on reload
    #[arg(short, long, env = "HEATMAP_DATASET")]
    dataset: Option<PathBuf>,

    /// Index configuration file (.toml or .json)
    #[arg(short, long, env = "HEATMAP_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 10)]
    request_timeout_secs: u64,

    #[arg(long, default_value_t = 5)]
    shutdown_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "heatmap_server=info,heatmap=info,info".into()),
        )
        .init();

    let args = Args::parse();

    let server_config = ServerConfig::default()
        .with_api_host(parse_listen_addr(&args.api_host)?)
        .with_request_timeout(Duration::from_secs(args.request_timeout_secs))
        .with_shutdown_timeout(Duration::from_secs(args.shutdown_timeout_secs));

    let index_config = match &args.config {
        Some(path) => {
            info!("startup : Reading index config from {}", path.display());
            load_index_config(path)?
        }
        None => heatmap::Config::default(),
    };
    let heatmap = Heatmap::with_config(index_config)?;

    match &args.dataset {
        Some(path) => {
            let loader = heatmap.clone();
            let path = path.clone();
            let report = tokio::task::spawn_blocking(move || loader.load_path(path)).await??;
            info!(
                "startup : Loaded {} points from {} rows",
                report.distinct_points, report.rows_read
            );
        }
        None => warn!("startup : No dataset configured, queries return 503 until a load"),
    }

    let listener = tokio::net::TcpListener::bind(server_config.api_host).await?;
    let state = AppState::new(heatmap, args.dataset);

    run_server(listener, state, &server_config, shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("shutdown : Failed to listen for ctrl_c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("shutdown : Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
