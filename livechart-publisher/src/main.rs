use anyhow::{Context, Result};
use clap::Parser;

use livechart_common::{connect, init_tracing};
use livechart_publisher::args::PublisherArgs;
use livechart_publisher::{ChartPublisher, PublisherConfig, SystemCollector};

#[tokio::main]
async fn main() -> Result<()> {
    let args = PublisherArgs::parse();

    let mut config = match &args.config {
        Some(path) => PublisherConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => PublisherConfig::default(),
    };

    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    init_tracing(&config.logging)?;

    tracing::info!(
        chart = %config.chart,
        key_prefix = %config.key_prefix,
        "Starting livechart-publisher"
    );

    let session = connect(&config.zenoh)
        .await
        .context("Failed to connect to Zenoh")?;

    let collector = SystemCollector::new(config.network.clone());
    ChartPublisher::new(config).run(session, collector).await
}
