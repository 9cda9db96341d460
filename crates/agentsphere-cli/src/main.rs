//! AgentSphere CLI - Browse NFA agents and simulate wallet-gated checkout
//!
//! The terminal stands in for the browser: `--wallet mock` simulates an
//! injected wallet, `--wallet none` simulates a browser without one, and
//! `--demo` starts the session with the demo wallet installed.
//!
//! # Quick Start
//!
//! ```bash
//! agentsphere browse
//! agentsphere show 1
//! agentsphere buy 1 --demo
//! agentsphere offer 3 0.4 --reject
//! agentsphere wallet walkthrough
//! ```

use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod display;

use agentsphere_marketplace::{InMemoryRegistry, Shelf, SortBy};
use commands::wallet::WalletOpts;
use commands::{catalog, checkout, wallet};
use config::{AppConfig, LoggingConfig};

/// AgentSphere CLI - The NFA agent marketplace from a terminal
#[derive(Parser)]
#[command(name = "agentsphere")]
#[command(author = "AgentSphere Contributors")]
#[command(version)]
#[command(about = "Browse AI agents and simulate buying them with a wallet", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (TOML, JSON, or YAML)
    #[arg(short, long, global = true, env = "AGENTSPHERE_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "AGENTSPHERE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format (json, pretty)
    #[arg(long, global = true, env = "AGENTSPHERE_LOG_FORMAT")]
    log_format: Option<String>,

    /// Start with the demo wallet connected
    #[arg(long, global = true)]
    demo: bool,

    #[command(flatten)]
    wallet: WalletOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List featured and trending agents
    Browse {
        /// Only one shelf (featured, trending)
        #[arg(long, value_parser = parse_shelf)]
        shelf: Option<Shelf>,
    },

    /// List agent categories
    Categories,

    /// Search agents
    Search {
        /// Text matched against name, description, creator and tags
        text: Option<String>,

        /// Category slug
        #[arg(long)]
        category: Option<String>,

        /// Minimum price in ETH
        #[arg(long)]
        min: Option<String>,

        /// Maximum price in ETH
        #[arg(long)]
        max: Option<String>,

        /// Ordering (popular, price, newest, most-liked)
        #[arg(long, default_value = "popular", value_parser = parse_sort)]
        sort: SortBy,
    },

    /// Show an agent's detail page
    Show {
        /// Listing id
        id: String,
    },

    /// Buy an agent at its listed price
    Buy {
        /// Listing id
        id: String,
    },

    /// Make an offer on an agent
    Offer {
        /// Listing id
        id: String,

        /// Offer in ETH
        amount: String,
    },

    /// Wallet session commands
    Wallet {
        #[command(subcommand)]
        action: WalletCommands,
    },
}

#[derive(Subcommand)]
enum WalletCommands {
    /// Connect the wallet
    Connect,

    /// Show the state a new session starts in
    Status,

    /// Run a scripted connect / switch / demo / revoke sequence
    Walkthrough,
}

fn parse_shelf(s: &str) -> Result<Shelf, String> {
    match s.to_ascii_lowercase().as_str() {
        "featured" => Ok(Shelf::Featured),
        "trending" => Ok(Shelf::Trending),
        other => Err(format!("unknown shelf '{}'", other)),
    }
}

fn parse_sort(s: &str) -> Result<SortBy, String> {
    match s.to_ascii_lowercase().replace('_', "-").as_str() {
        "popular" => Ok(SortBy::Popular),
        "price" => Ok(SortBy::Price),
        "newest" => Ok(SortBy::Newest),
        "most-liked" | "likes" => Ok(SortBy::MostLiked),
        other => Err(format!("unknown sort order '{}'", other)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut app_config = AppConfig::load(cli.config.as_deref())?;

    // Override with CLI arguments
    if let Some(level) = cli.log_level {
        app_config.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        app_config.logging.format = format;
    }
    if cli.demo {
        app_config.session.start_in_demo_mode = true;
    }

    init_logging(&app_config.logging)?;
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Starting AgentSphere CLI");

    print_banner();

    let registry = InMemoryRegistry::builtin().await?;
    let session_config = &app_config.session;

    match cli.command {
        Commands::Browse { shelf } => catalog::browse(&registry, shelf).await?,
        Commands::Categories => catalog::categories(&registry).await?,
        Commands::Search {
            text,
            category,
            min,
            max,
            sort,
        } => catalog::search(&registry, text, category, min, max, sort).await?,
        Commands::Show { id } => catalog::show(&registry, &id).await?,
        Commands::Buy { id } => checkout::buy(&registry, session_config, &cli.wallet, &id).await?,
        Commands::Offer { id, amount } => {
            checkout::offer(&registry, session_config, &cli.wallet, &id, &amount).await?
        }
        Commands::Wallet { action } => match action {
            WalletCommands::Connect => wallet::connect(session_config, &cli.wallet).await?,
            WalletCommands::Status => wallet::status(session_config, &cli.wallet).await?,
            WalletCommands::Walkthrough => {
                wallet::walkthrough(session_config, &cli.wallet).await?
            }
        },
    }

    Ok(())
}

/// Initialize logging
fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            subscriber
                .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            subscriber
                .with(fmt::layer().pretty().with_target(true).with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}

fn print_banner() {
    println!();
    println!("{}", "╔══════════════════════════════════════════════════════════╗".bright_cyan());
    println!(
        "{}{}{}",
        "║  ".bright_cyan(),
        "AgentSphere".bright_white().bold(),
        " - The marketplace for Non-Fungible Agents    ║".bright_cyan()
    );
    println!("{}", "╚══════════════════════════════════════════════════════════╝".bright_cyan());
}
