// src/bin/cli.rs

//! dailykiosk: content kiosk CLI.
//!
//! Runs the rotation and routing engine against a feed directory or a
//! remote base URL, rendering to the terminal. The interactive mode maps
//! stdin lines to the two user inputs the engine knows: navigation and
//! reload.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use dailykiosk::app::Kiosk;
use dailykiosk::error::{AppError, Result};
use dailykiosk::models::{Config, FeedKind};
use dailykiosk::render::TerminalRenderer;
use dailykiosk::services::{DirFeedSource, FeedSource, HttpFeedSource};
use dailykiosk::storage::{IndexStore, LocalIndexStore};

#[derive(Parser, Debug)]
#[command(name = "dailykiosk", version, about = "Daily Facts 4U content kiosk")]

/// CLI Arguments
struct Cli {
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Serve feeds from this local directory (overrides the config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Serve feeds from this base URL (overrides the config)
    #[arg(long, global = true)]
    data_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// CLI Commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Run the kiosk interactively
    Run {
        /// Page to start on; omit for the intro and holiday hand-off
        fragment: Option<String>,
    },
    /// Render a single page and exit
    Show {
        /// Page to render
        fragment: String,
    },
    /// Validate the configuration file
    Validate,
    /// Show the resolved data source, state directory and stored indices
    Info,
}

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    if let Some(dir) = cli.data_dir {
        config.kiosk.data_dir = Some(dir);
        config.kiosk.data_url = None;
    }
    if let Some(url) = cli.data_url {
        config.kiosk.data_url = Some(url);
    }
    config.validate()?;
    let config = Arc::new(config);

    match cli.command {
        Command::Run { fragment } => run(config, fragment.as_deref()).await?,
        Command::Show { fragment } => show(config, &fragment).await?,
        Command::Validate => println!("Configuration OK"),
        Command::Info => info(&config).await,
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn feed_source(config: &Config) -> Result<Arc<dyn FeedSource>> {
    if let Some(url) = &config.kiosk.data_url {
        Ok(Arc::new(HttpFeedSource::new(url, &config.http)?))
    } else if let Some(dir) = &config.kiosk.data_dir {
        Ok(Arc::new(DirFeedSource::new(dir)))
    } else {
        Err(AppError::config(
            "either kiosk.data_url or kiosk.data_dir must be set",
        ))
    }
}

fn build_kiosk(config: Arc<Config>) -> Result<Kiosk<TerminalRenderer>> {
    let source = feed_source(&config)?;
    let store = Arc::new(LocalIndexStore::new(&config.kiosk.state_dir));
    Ok(Kiosk::new(config, source, store, TerminalRenderer::new()))
}

async fn run(config: Arc<Config>, fragment: Option<&str>) -> Result<()> {
    let mut kiosk = build_kiosk(config)?;
    kiosk.navigate(fragment).await;

    println!("Enter a page name to navigate, an empty line to reload, 'q' to quit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = kiosk.idle() => {}
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let line = line.trim();
                if line == "q" {
                    break;
                }
                if line.is_empty() {
                    kiosk.reload().await;
                } else {
                    kiosk.navigate(Some(line)).await;
                }
            }
        }
    }
    Ok(())
}

async fn show(config: Arc<Config>, fragment: &str) -> Result<()> {
    let mut kiosk = build_kiosk(config)?;
    kiosk.navigate(Some(fragment)).await;
    kiosk.settle().await;
    Ok(())
}

async fn info(config: &Config) {
    match (&config.kiosk.data_url, &config.kiosk.data_dir) {
        (Some(url), _) => println!("data source: {url}"),
        (None, Some(dir)) => println!("data source: {}", dir.display()),
        (None, None) => println!("data source: not configured"),
    }
    println!("state dir:   {}", config.kiosk.state_dir.display());

    let store = LocalIndexStore::new(&config.kiosk.state_dir);
    for kind in FeedKind::ALL {
        if let Some(key) = kind.store_key() {
            match store.read(key).await {
                Some(index) => println!("{key}: {index}"),
                None => println!("{key}: <absent>"),
            }
        }
    }
}
