//! Rolling-window snapshot publishing.

use std::time::Duration;

use tokio::signal;
use zenoh::Session;

use livechart_common::{
    KeyExprBuilder, Label, RollingWindow, UpdateError, UpdateMessage, current_timestamp_millis,
    publish,
};

use crate::collector::{HostSample, SystemCollector};
use crate::config::PublisherConfig;

/// Keeps the rolling window for one chart and publishes its snapshots.
pub struct ChartPublisher {
    key: String,
    window: RollingWindow,
    config: PublisherConfig,
}

impl ChartPublisher {
    pub fn new(config: PublisherConfig) -> Self {
        let key = KeyExprBuilder::with_prefix(config.key_prefix.clone()).points_key(&config.chart);
        Self {
            key,
            window: RollingWindow::new(config.window),
            config,
        }
    }

    /// The key snapshots are put on.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Append a reading and return the full window.
    pub fn record(&mut self, timestamp: i64, sample: &HostSample) -> Result<UpdateMessage, UpdateError> {
        self.window.push(Label::from(timestamp), sample.series())?;
        Ok(self.window.snapshot())
    }

    /// Sample, record and publish every interval until Ctrl+C.
    pub async fn run(mut self, session: Session, mut collector: SystemCollector) -> anyhow::Result<()> {
        let mut ticker = tokio::time::interval(Duration::from_secs(self.config.interval_secs));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        tracing::info!(
            key = %self.key,
            interval_secs = self.config.interval_secs,
            window = self.config.window,
            "Publisher running. Press Ctrl+C to stop."
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let sample = collector.sample();
                    self.publish_sample(&session, &sample).await;
                }
                result = signal::ctrl_c() => {
                    if let Err(e) = result {
                        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                    }
                    break;
                }
            }
        }

        tracing::info!("Received shutdown signal");

        if let Err(e) = session.close().await {
            tracing::warn!(error = %e, "Error closing Zenoh session");
        }

        tracing::info!("Goodbye!");
        Ok(())
    }

    async fn publish_sample(&mut self, session: &Session, sample: &HostSample) {
        let snapshot = match self.record(current_timestamp_millis(), sample) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "Dropping reading");
                return;
            }
        };

        match publish(session, &self.key, &snapshot, self.config.serialization).await {
            Ok(()) => {
                tracing::debug!(key = %self.key, points = snapshot.len(), "Published snapshot");
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to publish snapshot");
            }
        }
    }
}
