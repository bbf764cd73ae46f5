//! printwatch - predictive-maintenance dashboard for 3D printers
//!
//! # Usage
//!
//! ```bash
//! # Serve the dashboard API (default command)
//! printwatch --addr 127.0.0.1:8080
//!
//! # Check a parameter set before sending it to the printer
//! printwatch validate params.json
//!
//! # Print a cost-benefit report for {recommendations, health}
//! printwatch report plan.json --timeframe quarterly
//! ```
//!
//! # Environment Variables
//!
//! - `PRINTWATCH_CONFIG`: Path to the TOML config (default: ./printwatch.toml)
//! - `PRINTWATCH_SERVER_ADDR`: Override `server.addr`
//! - `PRINTWATCH_CORS_ORIGINS`: Comma-separated origins allowed cross-origin
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use printwatch::api::handlers::CostBenefitRequest;
use printwatch::api::{create_app, DashboardState};
use printwatch::backend::{BackendClient, PredictionService};
use printwatch::config::{DashboardConfig, DataSource};
use printwatch::cost_benefit::{self, DEFAULT_TIMEFRAME};
use printwatch::store::{InMemoryPrinterStore, PrinterRepository, RemotePrinterStore};
use printwatch::types::PrintParameters;
use printwatch::validator;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "printwatch")]
#[command(about = "Predictive maintenance dashboard for 3D printers")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default: "0.0.0.0:8080")
    #[arg(short, long, value_name = "HOST:PORT")]
    addr: Option<String>,

    /// Config file to load instead of the standard search order
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Run the dashboard API server
    Serve,

    /// Validate a print parameter JSON file; exits 1 on violations
    Validate {
        /// Path to a PrintParameters JSON document
        file: PathBuf,
    },

    /// Render a cost-benefit report from a {recommendations, health} JSON file
    Report {
        file: PathBuf,
        /// Period named in the report header
        #[arg(long)]
        timeframe: Option<String>,
    },
}

// ============================================================================
// Commands
// ============================================================================

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Returns `true` when the parameters pass every hard range.
fn run_validate(path: &Path) -> Result<bool> {
    let params: PrintParameters = read_json(path)?;
    let violations = validator::validate(&params);
    let advisories = validator::material_advisories(&params);

    if violations.is_empty() {
        println!("✓ {} parameters are valid", params.material);
    } else {
        println!("✗ {} violation(s):", violations.len());
        for v in &violations {
            println!("  - {v}");
        }
    }
    for a in &advisories {
        println!("  ! {a}");
    }
    Ok(violations.is_empty())
}

fn run_report(path: &Path, timeframe: Option<String>) -> Result<()> {
    let req: CostBenefitRequest = read_json(path)?;
    let timeframe = timeframe
        .or(req.timeframe)
        .unwrap_or_else(|| DEFAULT_TIMEFRAME.to_string());
    let result = cost_benefit::estimate(&req.recommendations, &req.health);
    print!("{}", cost_benefit::render_report(&result, &timeframe));
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    match path {
        Some(p) => {
            let config = DashboardConfig::load_from_file(p)
                .with_context(|| format!("Failed to load config {}", p.display()))?;
            info!(path = %p.display(), "Loaded dashboard config");
            Ok(config.with_env_overrides())
        }
        None => Ok(DashboardConfig::load()),
    }
}

async fn run_server(config: DashboardConfig, cancel_token: CancellationToken) -> Result<()> {
    let client = BackendClient::from_config(&config).context("Failed to build HTTP client")?;
    info!(
        prediction = %client.prediction_url(),
        backend = %client.backend_url(),
        timeout_secs = config.prediction.request_timeout_secs,
        "Backend endpoints"
    );

    let repository: Arc<dyn PrinterRepository> = match config.backend.source {
        DataSource::Fixtures => {
            info!("Printer data: built-in demo fleet");
            Arc::new(InMemoryPrinterStore::with_demo_fleet())
        }
        DataSource::Remote => {
            info!(url = %client.backend_url(), "Printer data: remote backend");
            Arc::new(RemotePrinterStore::new(client.clone()))
        }
    };
    let predictor: Arc<dyn PredictionService> = Arc::new(client);

    let state = DashboardState::new(repository, predictor, config.backend.source);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&config.server.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server.addr))?;
    info!("✓ HTTP server listening on {}", config.server.addr);

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
            info!("[HttpServer] Received shutdown signal");
        })
        .await;

    match result {
        Ok(()) => {
            info!("[HttpServer] Graceful shutdown complete");
            Ok(())
        }
        Err(e) => {
            error!("[HttpServer] Server error: {}", e);
            Err(anyhow::anyhow!("HTTP server error: {}", e))
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    match args.command {
        Some(SubCommand::Validate { file }) => {
            if !run_validate(&file)? {
                std::process::exit(1);
            }
            return Ok(());
        }
        Some(SubCommand::Report { file, timeframe }) => return run_report(&file, timeframe),
        Some(SubCommand::Serve) | None => {}
    }

    let mut config = load_config(args.config.as_deref())?;
    if let Some(addr) = args.addr {
        config.server.addr = addr;
    }

    info!("printwatch v{}", env!("CARGO_PKG_VERSION"));

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("🛑 Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    run_server(config, cancel_token).await?;

    info!("✓ printwatch shutdown complete");
    Ok(())
}
