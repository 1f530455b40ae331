pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod notify;
pub mod services;
pub mod state;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub use cli::{Cli, Commands};
pub use config::Config;
use db::Store;
use domain::Role;

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let command = cli.command.unwrap_or(Commands::Serve);

    if command == Commands::Init {
        if Config::create_default_if_missing()? {
            println!("✓ Config file created. Edit config.toml and run again.");
        } else {
            println!("config.toml already exists, leaving it untouched.");
        }
        return Ok(());
    }

    config.validate()?;
    init_tracing(&config);

    match command {
        Commands::Serve => run_server(config).await,
        Commands::CreateAdmin { email, password } => {
            cmd_create_admin(&config, &email, &password).await
        }
        Commands::Init => Ok(()),
    }
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.observability.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    info!("feedbackd v{} starting...", env!("CARGO_PKG_VERSION"));

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        info!("Prometheus metrics recorder initialized");
        Some(handle)
    } else {
        None
    };

    let port = config.server.port;
    let state = api::create_app_state_from_config(config, prometheus_handle).await?;
    let app = api::router(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Web server running at http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}

async fn cmd_create_admin(config: &Config, email: &str, password: &str) -> anyhow::Result<()> {
    let email = email.trim();
    if !domain::is_valid_email(email) {
        anyhow::bail!("Invalid email address: {email}");
    }
    if password.chars().count() < 8 {
        anyhow::bail!("Password must be at least 8 characters.");
    }

    let store = Store::new(&config.general.database_path).await?;
    let users = store.users();

    if users.get_by_email(email).await?.is_some() {
        anyhow::bail!("User {email} already exists");
    }

    let user = users
        .create(email, password, Role::Admin, &config.security)
        .await?;

    println!("✓ Admin {} created (id {})", user.email, user.id);
    Ok(())
}
