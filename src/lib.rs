pub mod api;
pub mod config;
pub mod db;
pub mod entities;
pub mod services;

use tokio::signal;

pub use config::Config;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("init" | "--init") => {
            Config::create_default_if_missing()?;
            println!("✓ Config file created. Edit config.toml and run again.");
            Ok(())
        }
        Some("help" | "-h" | "--help") => {
            print_help();
            Ok(())
        }
        None | Some("serve") => serve(config).await,
        Some(other) => {
            println!("Unknown command: {other}");
            println!();
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!("bEDU - blogging platform backend");
    println!();
    println!("USAGE:");
    println!("  bedu [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("  serve   Run the HTTP server (default)");
    println!("  init    Create default config file");
    println!("  help    Show this help message");
    println!();
    println!("CONFIG:");
    println!("  Edit config.toml to configure the database, SMTP, JWT secret, etc.");
}

async fn serve(config: Config) -> anyhow::Result<()> {
    info!("bEDU v{} starting...", env!("CARGO_PKG_VERSION"));

    let port = config.server.port;
    let state = api::create_app_state_from_config(config).await?;
    let app = api::router(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}
