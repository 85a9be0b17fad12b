//! storefront server & CLI
//!
//! Dual-mode application:
//! - Server Mode (default, or `serve`): JSON API over HTTP
//! - CLI Mode: run one catalog operation directly and print markdown
//!
//! Both modes share the same catalog store, search matcher and admin check.

mod admin;
mod catalog;
mod cli;
mod config;
mod error;
mod http;
mod search;
mod state;
mod tools;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, ServeArgs};
use config::Config;
use error::AppError;
use state::AppState;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        None => run_server(config, ServeArgs::default()).await,
        Some(Commands::Serve(args)) => run_server(config, args).await,
        Some(command) => run_cli_mode(config, command).await,
    }
}

/// Initialize logging based on verbosity flags; RUST_LOG wins when set
fn init_logging(cli: &Cli) {
    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr) // Log to stderr to keep stdout clean
        .init();
}

/// Config file, then CLI / environment overrides
fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = config::load_config(cli.config.as_deref())?;

    if let Some(data_file) = &cli.data_file {
        config.data_file = data_file.clone();
    }
    if let Some(code) = &cli.admin_code {
        config.admin_code = Some(code.clone());
    }

    config.validate().context("Invalid configuration")?;
    debug!("Using catalog data file {}", config.data_file.display());
    Ok(config)
}

/// Run in server mode
async fn run_server(mut config: Config, args: ServeArgs) -> Result<()> {
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    let bind = config.bind.clone();

    let state = AppState::open(config)?;
    info!("Catalog data file {}", state.store.path().display());
    if !state.guard.is_configured() {
        info!("No admin code configured; catalog writes are disabled");
    }

    info!("Starting storefront server");
    http::serve(state, &bind).await
}

/// Run in CLI mode
async fn run_cli_mode(config: Config, command: Commands) -> Result<()> {
    let result = AppState::open(config).and_then(|state| execute_command(&state, command));

    // Handle result and exit with appropriate code
    match result {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

fn execute_command(state: &AppState, command: Commands) -> Result<String, AppError> {
    match command {
        Commands::List(args) => match args.category {
            Some(category) => {
                let products = tools::catalog::execute_list(state, &category)?;
                Ok(tools::catalog::format_category(&category, &products))
            }
            None => {
                let catalog = tools::catalog::execute_catalog(state)?;
                Ok(tools::catalog::format_catalog(&catalog))
            }
        },
        Commands::Search(args) => {
            let hits = tools::search::execute_search(state, &args)?;
            Ok(tools::search::format_search_results(&hits, &args.query))
        }
        Commands::Add(args) => {
            let code = args.code.clone();
            let category = args.category.trim().to_string();
            let product = tools::products::execute_add(state, code.as_deref(), args)?;
            Ok(format!(
                "✓ Added to {}\n{}",
                category,
                tools::catalog::format_product(&product)
            ))
        }
        Commands::Remove(args) => {
            let product =
                tools::products::execute_remove(state, args.code.as_deref(), &args.product)?;
            Ok(format!(
                "✓ Removed from {}\n{}",
                args.product.category,
                tools::catalog::format_product(&product)
            ))
        }
        Commands::Order(target) => {
            let link = tools::order::execute_order(state, &target)?;
            Ok(link.url)
        }
        Commands::Serve(_) => Err(AppError::Internal(
            "serve is handled before CLI dispatch".to_string(),
        )),
    }
}
