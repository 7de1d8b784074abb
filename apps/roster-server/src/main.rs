use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use tokio_util::sync::CancellationToken;

use api_gateway::{ApiGateway, GatewayConfig};
use runtime::{AppConfig, CliArgs};
use users::{domain::service::Service, infra::storage::UserStore};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Roster Server - in-memory user roster CRUD API
#[derive(Parser)]
#[command(name = "roster-server")]
#[command(about = "Roster Server - in-memory user roster CRUD API")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI args passed down to config
    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;

    // Apply CLI overrides (port / verbosity)
    config.apply_cli_overrides(&args);

    // Initialize logging; relative log paths resolve against the cwd
    let logging_config = config
        .logging
        .clone()
        .unwrap_or_else(runtime::default_logging_config);
    runtime::logging::init_logging_from_config(&logging_config, Path::new("."));
    tracing::info!("Roster Server starting");

    // Print config and exit if requested
    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    // Execute command
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config),
    }
}

fn gateway_config(config: &AppConfig) -> GatewayConfig {
    GatewayConfig {
        bind_addr: format!("{}:{}", config.server.host, config.server.port),
        enable_docs: config.server.enable_docs,
        allowed_origins: config
            .cors
            .clone()
            .unwrap_or_default()
            .allowed_origins,
    }
}

async fn run_server(config: AppConfig) -> Result<()> {
    // The store outlives every request; handlers reach it through the
    // service extension rather than module-level state.
    let store = Arc::new(UserStore::new());
    if config.server.seed_demo_users {
        store.seed_demo_users();
        tracing::info!("Seeded demo users");
    }
    let service = Arc::new(Service::new(store));
    let api = users::api::rest::routes::router(service);

    let gateway = ApiGateway::new(gateway_config(&config));
    let router = gateway.build_router(api)?;

    // Cancel on SIGINT/SIGTERM; the server drains in-flight requests
    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if let Err(e) = wait_for_shutdown().await {
                tracing::error!("Signal listener failed: {}", e);
            }
            cancel.cancel();
        }
    });

    gateway.serve(router, cancel).await
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    // Surface a bad bind address or malformed CORS origin now rather than
    // at startup
    ApiGateway::new(gateway_config(&config)).validate()?;

    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);

    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?; // Ctrl+C
        tokio::select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv()  => {},
            _ = tokio::signal::ctrl_c() => {}, // fallback
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        Ok(())
    }
}
