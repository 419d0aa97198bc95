use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use curtain_core::observe::Capabilities;
use curtain_core::AppConfig;

mod commands;
mod scenario;

#[derive(Parser)]
#[command(name = "curtain")]
#[command(version, about = "Load-gated scroll-reveal engine simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a page through a scripted scenario and print the reveal timeline
    Run {
        /// Page description file (TOML)
        page: PathBuf,
        /// Scenario file; defaults to a load-complete signal at t=0
        #[arg(short, long)]
        scenario: Option<PathBuf>,
        /// Drop the intersection capability (reveal degrades to all-at-once)
        #[arg(long)]
        no_intersection: bool,
        /// Drop the mutation capability (inserted elements go unobserved)
        #[arg(long)]
        no_mutation: bool,
        /// Drop the smooth-scroll capability (anchor clicks jump)
        #[arg(long)]
        no_smooth: bool,
        /// Emit the timeline as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Check a page (and optionally a scenario) against the marker contract
    Validate {
        /// Page description file (TOML)
        page: PathBuf,
        /// Scenario file to check alongside
        #[arg(short, long)]
        scenario: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first so its log level can serve as the default
    let config = AppConfig::load()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            page,
            scenario,
            no_intersection,
            no_mutation,
            no_smooth,
            json,
        } => {
            let caps = Capabilities {
                intersection: !no_intersection,
                mutation: !no_mutation,
                smooth_scroll: !no_smooth,
            };
            commands::run::run(config, &page, scenario.as_deref(), caps, json).await
        }
        Commands::Validate { page, scenario } => {
            commands::validate::run(&config, &page, scenario.as_deref())
        }
        Commands::Config => commands::config::run(&config),
    }
}
