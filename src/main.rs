//! routes-list
//!
//! Serves the routes described in a TOML file and prints a summary table
//! of them (method, path, auth strategy, auth mode, scopes) once the
//! server has started.
//!
//! # Architecture Overview
//!
//! ```text
//!     config.toml ──▶ config ──▶ lifecycle::startup ──▶ http::HttpServer
//!                                        │                   │
//!                                        ▼                   ▼
//!                               plugin::RoutesList      routing::RouteTable
//!                                        │                   │
//!                                        ▼                   │
//!                               listing::RouteLister ◀───────┘
//!                                 │            │
//!                                 ▼            ▼
//!                           style::Theme   AlignedTable ──▶ stdout
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use routes_list::config::{load_config, validate_config, ConfigError, ServerConfig};
use routes_list::lifecycle::{self, signals, Shutdown};
use routes_list::observability::logging;
use routes_list::plugin::RoutesList;
use routes_list::style::ThemePreset;

#[derive(Parser)]
#[command(name = "routes-list")]
#[command(about = "Serve configured routes and print the route table", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Color theme for the table
    #[arg(short, long, value_enum)]
    theme: Option<ThemePreset>,

    /// Columns to show, in order (comma separated)
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// Sort by column; prefix with '-' for descending
    #[arg(long, allow_hyphen_values = true)]
    sort: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server and list routes once it is up (default)
    Serve {
        /// Override listener.bind_address
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Print the route table and exit
    Print,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    apply_overrides(&mut config, &cli);
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init(&config.observability);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?cli.config,
        routes = config.routes.len(),
        "routes-list starting"
    );

    match cli.command.unwrap_or(Commands::Serve { bind: None }) {
        Commands::Print => {
            config.listing.enabled = true;
            let server = lifecycle::build_server(config, None)?;
            let lister = RoutesList::lister(&server).ok_or("route listing is not registered")?;
            lister.list_routes()?;
        }
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.listener.bind_address = bind;
                validate_config(&config).map_err(ConfigError::Validation)?;
            }
            let server = lifecycle::build_server(config, None)?;

            let shutdown = Shutdown::new();
            signals::spawn_signal_handler(shutdown.clone());
            lifecycle::serve(server, &shutdown).await?;
            tracing::info!("Shutdown complete");
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut ServerConfig, cli: &Cli) {
    if let Some(theme) = cli.theme {
        config.listing.theme = theme;
    }
    if let Some(columns) = &cli.columns {
        config.listing.columns = Some(columns.clone());
    }
    if let Some(sort) = &cli.sort {
        config.listing.sort = Some(sort.clone());
    }
}
