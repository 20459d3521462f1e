use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use life_in_weeks::{
    AppConfig, AppState, InMemorySnapshotStore, LifeExpectancyTable, build_router,
    countries::DEFAULT_COUNTRY,
    weeks::{DEFAULT_AGE, compute, render_text_grid, validate_inputs},
};

#[derive(Parser)]
#[command(name = "life-in-weeks")]
#[command(about = "Life in weeks calculator and share-link server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the week breakdown for an age
    Weeks {
        #[arg(long, default_value_t = DEFAULT_AGE)]
        age: f64,
        #[arg(long, conflicts_with = "country")]
        life_expectancy: Option<f64>,
        #[arg(long)]
        country: Option<String>,
        /// Also print the week grid
        #[arg(long)]
        grid: bool,
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    let mut config = AppConfig::from_env().context("failed to load application configuration")?;

    match cli.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    }) {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await
        }
        Command::Weeks {
            age,
            life_expectancy,
            country,
            grid,
            json,
        } => {
            let countries = load_countries(&config)?;
            let life_expectancy = match (life_expectancy, country) {
                (Some(value), _) => value,
                (None, country) => {
                    let country = country.as_deref().unwrap_or(DEFAULT_COUNTRY);
                    if countries.lookup(country).is_none() {
                        warn!(country, "unknown country, using default life expectancy");
                    }
                    countries.life_expectancy_or_default(country)
                }
            };
            validate_inputs(age, life_expectancy)?;

            let weeks = compute(age, life_expectancy);
            if json {
                println!("{}", serde_json::to_string_pretty(&weeks)?);
            } else {
                println!("Weeks lived:          {}", weeks.weeks_lived);
                println!("Weeks spent dreaming: {}", weeks.sleep_weeks);
                println!("Future awake weeks:   {}", weeks.awake_weeks);
                println!();
                println!("{}", weeks.summary());
            }
            if grid {
                println!();
                print!("{}", render_text_grid(&weeks));
            }
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    let countries = load_countries(&config)?;
    info!(countries = countries.len(), "country table loaded");

    let store = Arc::new(InMemorySnapshotStore::with_ttl(config.snapshot_ttl));
    let ttl_secs = store.ttl().as_secs();
    let app = build_router(AppState::new(store, Arc::new(countries)), &config);

    let addr = config.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(
        address = %addr,
        static_dir = %config.static_dir.display(),
        ttl_secs,
        "life-in-weeks server started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn load_countries(config: &AppConfig) -> Result<LifeExpectancyTable> {
    match &config.life_expectancy_table {
        Some(path) => LifeExpectancyTable::from_json_file(path)
            .with_context(|| format!("failed to load country table from {}", path.display())),
        None => Ok(LifeExpectancyTable::builtin()),
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("life_in_weeks=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install Ctrl+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install SIGTERM handler");
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
