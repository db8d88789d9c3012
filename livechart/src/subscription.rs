use std::hash::{Hash, Hasher};
use std::time::Duration;

use iced::Subscription;

use livechart_common::{
    Format, KeyExprBuilder, POINTS_EVENT, ZenohConfig, connect, current_timestamp_millis, encode,
};

use crate::config::ChartConfig;
use crate::message::{ChartEvent, Message};

/// Create a subscription that connects to Zenoh and receives chart events.
///
/// Every `points` event under `key_prefix` is forwarded undecoded; the
/// target chart decodes it.
pub fn zenoh_subscription(config: ZenohConfig, key_prefix: String) -> Subscription<Message> {
    Subscription::run_with((config, key_prefix), |(config, key_prefix)| {
        let config = config.clone();
        let keys = KeyExprBuilder::with_prefix(key_prefix.clone());
        async_stream::stream! {
            let session = match connect(&config).await {
                Ok(session) => {
                    yield Message::Connected;
                    session
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to connect to Zenoh");
                    yield Message::Disconnected(e.to_string());
                    // Wait before the stream ends (subscription will restart)
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    return;
                }
            };

            let key_expr = keys.points_wildcard();
            let subscriber = match session.declare_subscriber(&key_expr).await {
                Ok(sub) => sub,
                Err(e) => {
                    tracing::error!(error = %e, key = %key_expr, "Failed to create subscriber");
                    yield Message::Disconnected(e.to_string());
                    return;
                }
            };

            tracing::info!(key = %key_expr, "Subscribed to chart events");

            loop {
                match subscriber.recv_async().await {
                    Ok(sample) => match sample_to_event(&keys, &sample) {
                        Some(event) => {
                            yield Message::EventReceived(event);
                        }
                        None => {
                            tracing::debug!(key = %sample.key_expr(), "Ignoring sample with unexpected key");
                        }
                    },
                    Err(e) => {
                        tracing::error!(error = %e, "Subscriber error");
                        yield Message::Disconnected(e.to_string());
                        return;
                    }
                }
            }
        }
    })
}

/// Route a sample to its chart by key, keeping the payload undecoded.
fn sample_to_event(keys: &KeyExprBuilder, sample: &zenoh::sample::Sample) -> Option<ChartEvent> {
    let parsed = keys.parse(sample.key_expr().as_str())?;
    Some(ChartEvent::from_key(parsed, sample.payload().to_bytes().to_vec()))
}

/// Charts fed by the demo subscription.
#[derive(Debug, Clone)]
pub struct DemoCharts {
    pub charts: Vec<(String, ChartConfig)>,
    pub window: usize,
    pub interval: Duration,
}

impl Hash for DemoCharts {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for (id, config) in &self.charts {
            id.hash(state);
            for series in &config.series {
                series.label.hash(state);
            }
        }
        self.window.hash(state);
        self.interval.hash(state);
    }
}

/// Create a demo subscription that generates random-walk chart data.
///
/// Snapshots are encoded and delivered exactly like Zenoh samples, so
/// the charts exercise the same decode path.
pub fn demo_subscription(demo: DemoCharts) -> Subscription<Message> {
    Subscription::run_with(demo, |demo| {
        let demo = demo.clone();
        async_stream::stream! {
            use crate::mock::DemoFeed;
            use rand::SeedableRng;

            yield Message::Connected;

            let mut rng = rand::rngs::StdRng::from_os_rng();
            let mut feeds: Vec<(String, DemoFeed)> = demo
                .charts
                .iter()
                .map(|(id, config)| (id.clone(), DemoFeed::for_chart(config, demo.window)))
                .collect();

            loop {
                tokio::time::sleep(demo.interval).await;
                let now = current_timestamp_millis();

                for (id, feed) in feeds.iter_mut() {
                    let snapshot = feed.tick(&mut rng, now);
                    match encode(&snapshot, Format::Json) {
                        Ok(payload) => {
                            yield Message::EventReceived(ChartEvent::new(id.clone(), POINTS_EVENT, payload));
                        }
                        Err(e) => {
                            tracing::warn!(chart = %id, error = %e, "Failed to encode demo snapshot");
                        }
                    }
                }
            }
        }
    })
}
