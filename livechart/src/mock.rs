//! Mock chart data for demo mode and tests.
//!
//! Produces update messages without a publisher or a Zenoh session.

use rand::Rng;

use livechart_common::{Label, RollingWindow, UpdateMessage};

use crate::config::ChartConfig;

/// Interval between generated slots, in milliseconds.
pub const DEMO_INTERVAL_MS: i64 = 1000;

/// A deterministic CPU/RAM/TCP Out snapshot with `count` slots.
///
/// Every seventh RAM sample is a gap.
pub fn server_events(start_ms: i64, count: usize) -> UpdateMessage {
    let labels: Vec<Label> = (0..count)
        .map(|i| Label::from(start_ms + i as i64 * DEMO_INTERVAL_MS))
        .collect();

    let cpu = (0..count).map(|i| Some(40.0 + 30.0 * (i as f64 / 5.0).sin()));
    let ram = (0..count).map(|i| (i % 7 != 6).then(|| 55.0 + (i % 10) as f64));
    let tcp = (0..count).map(|i| Some(((i * 37) % 100) as f64 / 50.0));

    UpdateMessage::new(labels)
        .with_series("CPU", cpu)
        .with_series("RAM", ram)
        .with_series("TCP Out", tcp)
}

/// One series doing a bounded random walk.
#[derive(Debug, Clone)]
struct Walker {
    name: String,
    value: f64,
    min: f64,
    max: f64,
}

impl Walker {
    fn step(&mut self, rng: &mut impl Rng) -> f64 {
        let span = self.max - self.min;
        let delta = rng.random_range(-0.05..0.05) * span;
        self.value = (self.value + delta).clamp(self.min, self.max);
        self.value
    }
}

/// Random-walk feed for every series of one chart.
#[derive(Debug, Clone)]
pub struct DemoFeed {
    window: RollingWindow,
    walkers: Vec<Walker>,
    /// Probability of a gap per sample.
    gap_rate: f64,
}

impl DemoFeed {
    /// A feed matching the chart's series, bounded by fixed axis ranges
    /// where configured and `0..100` otherwise.
    pub fn for_chart(config: &ChartConfig, capacity: usize) -> Self {
        let walkers = config
            .series
            .iter()
            .map(|series| {
                let [min, max] = config
                    .axis_for(&series.scale)
                    .and_then(|axis| axis.range)
                    .unwrap_or([0.0, 100.0]);
                Walker {
                    name: series.label.clone(),
                    value: (min + max) / 2.0,
                    min,
                    max,
                }
            })
            .collect();

        Self {
            window: RollingWindow::new(capacity),
            walkers,
            gap_rate: 0.02,
        }
    }

    pub fn with_gap_rate(mut self, gap_rate: f64) -> Self {
        self.gap_rate = gap_rate.clamp(0.0, 1.0);
        self
    }

    /// Advance every walker one slot and return the full window.
    pub fn tick(&mut self, rng: &mut impl Rng, timestamp: i64) -> UpdateMessage {
        let gap_rate = self.gap_rate;
        let samples: Vec<(String, Option<f64>)> = self
            .walkers
            .iter_mut()
            .map(|walker| {
                let value = walker.step(rng);
                let sample = (!rng.random_bool(gap_rate)).then_some(value);
                (walker.name.clone(), sample)
            })
            .collect();

        let pushed = self.window.push(
            Label::from(timestamp),
            samples.iter().map(|(name, value)| (name.as_str(), *value)),
        );
        if let Err(e) = pushed {
            tracing::debug!(error = %e, "Skipping demo slot");
        }

        self.window.snapshot()
    }
}
