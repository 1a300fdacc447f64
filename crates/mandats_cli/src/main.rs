//! Mandats CLI
//!
//! Print the mandats feed and drive the organisation select from the
//! command line.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use mandats_core::{Point, Size};
use mandats_layout::RenderTree;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod feed;
mod pick;
mod view;

use config::{SiteConfig, CONFIG_FILE};
use feed::{Mandat, Request};
use pick::Picker;

#[derive(Parser)]
#[command(name = "mandats")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Mandats feed and component CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode an exported feed and print it
    Feed {
        /// Contents API payload or raw JSON array
        file: PathBuf,
    },

    /// Pick an organisation from the feed with scripted actions
    Pick {
        /// Contents API payload or raw JSON array
        file: PathBuf,

        /// Comma separated actions: open, down, up, home, end, enter, escape, clear, click:<n>
        #[arg(short, long, default_value = "")]
        script: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = SiteConfig::load(&cli.config)?;

    match cli.command {
        Commands::Feed { file } => cmd_feed(&config, &file),
        Commands::Pick { file, script } => cmd_pick(&config, &file, &script),
    }
}

fn load(config: &SiteConfig, file: &Path) -> Result<Vec<Mandat>> {
    info!(
        "Loading feed {} (exported from {})",
        file.display(),
        config.source.contents_url()
    );
    match feed::load_feed(file) {
        Request::Ready(mandats) => Ok(mandats),
        Request::Failed(reason) => bail!("Feed unavailable: {}", reason),
        Request::Loading => bail!("Feed still loading"),
    }
}

fn viewport(config: &SiteConfig) -> Size {
    Size::new(config.window.width, config.window.height)
}

fn cmd_feed(config: &SiteConfig, file: &Path) -> Result<()> {
    let mandats = load(config, file)?;
    info!("{} mandats", mandats.len());

    let tree = RenderTree::build(&view::feed_view(&mandats), viewport(config), Point::ZERO)?;
    print!("{}", tree.outline());
    Ok(())
}

fn cmd_pick(config: &SiteConfig, file: &Path, script: &str) -> Result<()> {
    let mandats = load(config, file)?;
    let actions = pick::parse_script(script)?;
    let organisations = pick::organisations(&mandats);
    info!(
        "{} organisations, {} scripted actions",
        organisations.len(),
        actions.len()
    );

    let mut picker = Picker::new(organisations, &config.select, viewport(config));
    picker.mount()?;
    print!("{}", picker.frame());

    for action in actions {
        picker.perform(action)?;
        println!("\n> {action}");
        print!("{}", picker.frame());
    }

    let selected = picker.selected();
    let matching = mandats
        .iter()
        .filter(|m| selected.as_ref().map_or(true, |org| &m.org == org))
        .count();
    println!(
        "\nselected: {} ({} mandats)",
        selected.as_deref().unwrap_or("none"),
        matching
    );
    Ok(())
}
