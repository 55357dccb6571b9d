//! Main entry point for the Prediction Board dashboard
//!
//! Loads configuration, then either renders the leaderboard once to the
//! terminal or serves the dashboard over HTTP until a shutdown signal.

use anyhow::Result;
use clap::Parser;
use prediction_board::config::AppConfig;
use prediction_board::report::render_text;
use prediction_board::service::{AppState, HealthCheck, HealthStatus, ServiceError};
use prediction_board::web::{DashboardServer, DashboardServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// Prediction Board - leaderboard dashboard for prediction contests
#[derive(Parser)]
#[command(
    name = "prediction-board",
    version,
    about = "Leaderboard dashboard for a prediction contest",
    long_about = "Prediction Board reads a player-by-game points sheet, ranks players by total \
                 points with rank movement against a previous sheet, and serves an HTML \
                 dashboard with a recent-games title race chart and per-player lookups."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Current points sheet override
    #[arg(short, long, value_name = "FILE", help = "Path to the current points sheet")]
    scores: Option<PathBuf>,

    /// Previous points sheet override
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to the previous points sheet used for rank changes"
    )]
    previous: Option<PathBuf>,

    /// HTTP port override
    #[arg(long, value_name = "PORT", help = "Override HTTP server port")]
    port: Option<u16>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without starting service")]
    dry_run: bool,

    /// Render once to stdout and exit
    #[arg(long, help = "Print the leaderboard to the terminal and exit")]
    print: bool,

    /// Perform health check and exit
    #[arg(long, help = "Perform a health check and exit with status code")]
    health_check: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Perform health check and exit with the matching status code
fn perform_health_check(app_state: &AppState) -> ! {
    info!("Performing health check...");

    let health = HealthCheck::check(app_state);
    println!("Health Check: {}", health.status);
    for check in &health.checks {
        match &check.message {
            Some(message) => println!("  {}: {} ({})", check.name, check.status, message),
            None => println!("  {}: {}", check.name, check.status),
        }
    }

    if health.status == HealthStatus::Unhealthy {
        std::process::exit(1);
    }
    std::process::exit(0);
}

/// Render the dashboard once as text
fn print_report(app_state: &AppState) -> Result<()> {
    match app_state.render() {
        Ok(report) => {
            print!("{}", render_text(&report));
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C) signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}

/// Display startup banner with service information
fn display_startup_banner(config: &AppConfig) {
    info!("🏏 Prediction Board");
    info!("   Service: {}", config.service.name);
    info!("   Log level: {}", config.service.log_level);
    info!("   Scores: {}", config.data.scores_file.display());
    match &config.data.previous_file {
        Some(previous) => info!("   Previous scores: {}", previous.display()),
        None => info!("   Previous scores: none (rank changes disabled)"),
    }
    info!(
        "   Trend: last {} games, top {}",
        config.dashboard.trend_window, config.dashboard.trend_top_n
    );
    info!(
        "   HTTP: {}:{}",
        config.service.http_host, config.service.http_port
    );
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

/// Load and merge configuration from environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(scores) = &args.scores {
        config.data.scores_file = scores.clone();
    }

    if let Some(previous) = &args.previous {
        config.data.previous_file = Some(previous.clone());
    }

    if let Some(port) = args.port {
        config.service.http_port = port;
    }

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let app_state = match AppState::new(config.clone()) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    if args.dry_run {
        info!("Configuration validation successful");
        display_startup_banner(&config);
        info!("Dry run completed - exiting without starting service");
        return Ok(());
    }

    if args.health_check {
        perform_health_check(&app_state);
    }

    if args.print {
        return print_report(&app_state);
    }

    display_startup_banner(&config);

    let app_state = Arc::new(app_state);
    let server = Arc::new(DashboardServer::new(
        DashboardServerConfig {
            host: config.service.http_host.clone(),
            port: config.service.http_port,
        },
        app_state.clone(),
    ));

    let mut server_task = {
        let server = server.clone();
        tokio::spawn(async move { server.start().await })
    };

    info!("✅ Prediction Board is running");
    info!("Press Ctrl+C to shutdown gracefully...");

    tokio::select! {
        _ = wait_for_shutdown_signal() => {
            info!("🛑 Shutdown signal received, beginning graceful shutdown...");
            server.stop();
        }
        result = &mut server_task => {
            let message = match result {
                Ok(Ok(())) => "dashboard server exited unexpectedly".to_string(),
                Ok(Err(e)) => format!("{:#}", e),
                Err(e) => e.to_string(),
            };
            error!("{}", ServiceError::Server { message });
            std::process::exit(1);
        }
    }

    match tokio::time::timeout(config.shutdown_timeout(), server_task).await {
        Ok(Ok(Ok(()))) => info!("✅ Graceful shutdown completed successfully"),
        Ok(Ok(Err(e))) => error!("Dashboard server error during shutdown: {:#}", e),
        Ok(Err(e)) => error!("Dashboard server task failed: {}", e),
        Err(_) => warn!("⚠️  Shutdown timeout exceeded, forcing exit"),
    }

    info!("🛑 Prediction Board stopped");
    Ok(())
}
