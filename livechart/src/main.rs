//! LiveChart - live line charts fed over Zenoh.
//!
//! This application subscribes to `<prefix>/*/points` and renders every
//! chart declared in its configuration file.

use std::path::PathBuf;

use clap::Parser;
use iced::application;

use livechart::config::ViewerConfig;
use livechart::{LiveChartApp, Settings};
use livechart_common::init_tracing;

/// LiveChart viewer
#[derive(Parser, Debug)]
#[command(name = "livechart")]
#[command(about = "Live line charts fed over Zenoh")]
#[command(version)]
struct Args {
    /// Path to the JSON5 configuration file (defaults to the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Generate random data instead of connecting to Zenoh
    #[arg(long)]
    demo: bool,

    /// Override the configured log level
    #[arg(short, long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::load_default()?,
    };

    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }

    init_tracing(&config.logging)?;

    tracing::info!(
        charts = config.charts.len(),
        key_prefix = %config.key_prefix,
        "Starting LiveChart"
    );

    let settings = Settings {
        config,
        demo: args.demo,
    };

    application(
        move || LiveChartApp::boot(settings.clone()),
        LiveChartApp::update,
        LiveChartApp::view,
    )
    .title(LiveChartApp::title)
    .subscription(LiveChartApp::subscription)
    .theme(LiveChartApp::theme)
    .run()
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
