//! The live chart widget and its host-facing hook.
//!
//! A [`LiveChart`] owns one chart instance: configuration, data and the
//! canvas cache used to draw it. The host runtime drives it through the
//! [`ChartHook`] capability:
//!
//! ```text
//! Unmounted --on_mount--> Mounted --on_update--> Mounted ... --on_unmount--> Unmounted
//! ```

use iced::widget::canvas::Cache;
use thiserror::Error;

use livechart_common::{POINTS_EVENT, UpdateError, UpdateMessage, decode_auto};

use crate::config::{ChartConfig, ColorSpec};
use crate::data::ChartData;

/// Errors raised by chart lifecycle callbacks.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("chart is not mounted")]
    NotMounted,

    #[error("chart is already mounted")]
    AlreadyMounted,

    #[error("invalid surface size {width}x{height}")]
    InvalidSurface { width: f32, height: f32 },

    #[error("rejected update: {0}")]
    InvalidUpdate(#[from] UpdateError),

    #[error("undecodable payload: {0}")]
    Decode(#[from] livechart_common::Error),
}

/// The drawable area a chart is mounted on, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
}

impl Surface {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The surface size a chart configuration asks for.
    pub fn from_config(config: &ChartConfig) -> Self {
        Self::new(config.width, config.height)
    }

    fn validate(&self) -> Result<(), ChartError> {
        if self.width > 0.0 && self.height > 0.0 {
            Ok(())
        } else {
            Err(ChartError::InvalidSurface {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Where a widget is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Unmounted,
    Mounted,
}

/// What an applied update changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Configured series whose samples were replaced.
    pub updated: Vec<String>,
    /// Series named in the message but not configured.
    pub ignored: Vec<String>,
    /// Redraw counter after the update.
    pub revision: u64,
}

/// The capability a chart registers with its host runtime.
///
/// Hosts call these in delivery order, one at a time.
pub trait ChartHook {
    /// The drawable surface became available.
    fn on_mount(&mut self, surface: Surface) -> Result<(), ChartError>;

    /// A complete snapshot arrived.
    fn on_update(&mut self, message: UpdateMessage) -> Result<UpdateOutcome, ChartError>;

    /// A named event arrived with a raw payload.
    ///
    /// Only `points` is understood; other events are ignored.
    fn on_event(
        &mut self,
        event: &str,
        payload: &[u8],
    ) -> Result<Option<UpdateOutcome>, ChartError> {
        if event != POINTS_EVENT {
            tracing::debug!(event, "Ignoring unhandled chart event");
            return Ok(None);
        }

        let message: UpdateMessage = decode_auto(payload).inspect_err(|e| {
            tracing::warn!(error = %e, bytes = payload.len(), "Rejected undecodable points payload");
        })?;

        self.on_update(message).map(Some)
    }

    /// The surface is going away. Release everything held for drawing.
    fn on_unmount(&mut self) {}
}

/// One entry of the chart legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: ColorSpec,
    /// Formatted latest value, or the placeholder.
    pub value: String,
}

/// Per-mount state.
struct ChartInstance {
    surface: Surface,
    data: ChartData,
    cache: Cache,
    revision: u64,
}

impl std::fmt::Debug for ChartInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartInstance")
            .field("surface", &self.surface)
            .field("data", &self.data)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl ChartInstance {
    fn redraw(&mut self) {
        self.cache.clear();
        self.revision += 1;
    }
}

/// A chart view kept current from a stream of update messages.
#[derive(Debug)]
pub struct LiveChart {
    config: ChartConfig,
    seed: Option<UpdateMessage>,
    instance: Option<ChartInstance>,
}

impl LiveChart {
    /// Create an unmounted chart.
    pub fn new(config: ChartConfig) -> Self {
        Self {
            config,
            seed: None,
            instance: None,
        }
    }

    /// Data applied right after mounting instead of starting empty.
    pub fn with_seed(mut self, seed: UpdateMessage) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn title(&self) -> &str {
        &self.config.title
    }

    pub fn lifecycle(&self) -> Lifecycle {
        if self.instance.is_some() {
            Lifecycle::Mounted
        } else {
            Lifecycle::Unmounted
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.instance.is_some()
    }

    /// Current data, while mounted.
    pub fn data(&self) -> Option<&ChartData> {
        self.instance.as_ref().map(|i| &i.data)
    }

    pub fn surface(&self) -> Option<Surface> {
        self.instance.as_ref().map(|i| i.surface)
    }

    /// Number of redraws since mount.
    pub fn revision(&self) -> u64 {
        self.instance.as_ref().map_or(0, |i| i.revision)
    }

    pub(crate) fn cache(&self) -> Option<&Cache> {
        self.instance.as_ref().map(|i| &i.cache)
    }

    /// Legend rows in series order, valued at the last label slot.
    pub fn legend(&self) -> Vec<LegendEntry> {
        self.config
            .series
            .iter()
            .enumerate()
            .map(|(index, series)| LegendEntry {
                label: series.label.clone(),
                color: series.color.clone(),
                value: series
                    .format
                    .format(self.data().and_then(|d| d.latest(index))),
            })
            .collect()
    }

    fn apply(&mut self, message: UpdateMessage) -> Result<UpdateOutcome, ChartError> {
        let Some(instance) = self.instance.as_mut() else {
            return Err(ChartError::NotMounted);
        };

        message.validate()?;

        let UpdateMessage { labels, points } = message;
        let mut outcome = UpdateOutcome::default();

        instance.data.replace_labels(labels);

        for (name, samples) in points {
            match self.config.series_index(&name) {
                Some(index) => {
                    instance.data.replace_series(index, samples);
                    outcome.updated.push(name);
                }
                None => {
                    tracing::warn!(
                        chart = %self.config.title,
                        series = %name,
                        "Ignoring samples for unconfigured series"
                    );
                    outcome.ignored.push(name);
                }
            }
        }

        instance.redraw();
        outcome.revision = instance.revision;

        tracing::trace!(
            chart = %self.config.title,
            points = instance.data.point_count(),
            revision = instance.revision,
            "Chart updated"
        );

        Ok(outcome)
    }
}

impl ChartHook for LiveChart {
    fn on_mount(&mut self, surface: Surface) -> Result<(), ChartError> {
        if self.instance.is_some() {
            return Err(ChartError::AlreadyMounted);
        }
        surface.validate()?;

        self.instance = Some(ChartInstance {
            surface,
            data: ChartData::empty(self.config.series.len()),
            cache: Cache::new(),
            revision: 0,
        });

        tracing::debug!(
            chart = %self.config.title,
            width = surface.width,
            height = surface.height,
            "Chart mounted"
        );

        if let Some(seed) = self.seed.clone() {
            if let Err(e) = self.apply(seed) {
                tracing::warn!(chart = %self.config.title, error = %e, "Ignoring invalid seed data");
            }
        }

        Ok(())
    }

    fn on_update(&mut self, message: UpdateMessage) -> Result<UpdateOutcome, ChartError> {
        self.apply(message).inspect_err(|e| {
            tracing::warn!(chart = %self.config.title, error = %e, "Rejected chart update");
        })
    }

    fn on_unmount(&mut self) {
        if self.instance.take().is_some() {
            tracing::debug!(chart = %self.config.title, "Chart unmounted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livechart_common::Label;

    use crate::config::{SeriesConfig, TimeUnit, ValueFormat};

    fn cpu_ram() -> ChartConfig {
        let percent = ValueFormat::new(1, "%");
        ChartConfig {
            title: "Load".to_string(),
            width: 400.0,
            height: 200.0,
            series: vec![
                SeriesConfig::new("CPU", "red", "%", percent.clone()),
                SeriesConfig::new("RAM", "blue", "%", percent),
            ],
            axes: vec![],
            time_unit: TimeUnit::Milliseconds,
        }
    }

    fn mounted() -> LiveChart {
        let mut chart = LiveChart::new(cpu_ram());
        chart.on_mount(Surface::new(400.0, 200.0)).unwrap();
        chart
    }

    #[test]
    fn test_mount_empty() {
        let chart = mounted();

        assert_eq!(chart.lifecycle(), Lifecycle::Mounted);
        let data = chart.data().unwrap();
        assert_eq!(data.point_count(), 0);
        assert_eq!(data.series_count(), 2);

        let legend = chart.legend();
        assert_eq!(legend.len(), 2);
        assert_eq!(legend[0].label, "CPU");
        assert_eq!(legend[0].value, "-");
    }

    #[test]
    fn test_update_replaces_named_series_only() {
        let mut chart = mounted();
        chart
            .on_update(
                UpdateMessage::new(vec!["a".into()])
                    .with_series("CPU", [Some(1.0)])
                    .with_series("RAM", [Some(2.0)]),
            )
            .unwrap();

        let outcome = chart
            .on_update(
                UpdateMessage::new(vec!["t1".into(), "t2".into()])
                    .with_series("CPU", [Some(10.5), None]),
            )
            .unwrap();

        assert_eq!(outcome.updated, vec!["CPU"]);
        assert!(outcome.ignored.is_empty());

        let data = chart.data().unwrap();
        assert_eq!(data.labels(), &[Label::from("t1"), Label::from("t2")]);
        assert_eq!(data.samples(0), &[Some(10.5), None]);
        assert_eq!(data.samples(1), &[Some(2.0)]);
    }

    #[test]
    fn test_update_is_idempotent() {
        let message = UpdateMessage::new(vec![Label::Timestamp(1.0), Label::Timestamp(2.0)])
            .with_series("RAM", [Some(50.0), Some(51.0)]);

        let mut once = mounted();
        once.on_update(message.clone()).unwrap();

        let mut twice = mounted();
        twice.on_update(message.clone()).unwrap();
        twice.on_update(message).unwrap();

        assert_eq!(once.data(), twice.data());
        assert_eq!(once.legend(), twice.legend());
        assert_eq!(twice.revision(), 2);
    }

    #[test]
    fn test_unknown_series_ignored() {
        let mut chart = mounted();
        let outcome = chart
            .on_update(UpdateMessage::new(vec!["a".into(), "b".into()]).with_series("Unknown", [Some(1.0), Some(2.0)]))
            .unwrap();

        assert_eq!(outcome.ignored, vec!["Unknown"]);
        assert!(outcome.updated.is_empty());
        let data = chart.data().unwrap();
        assert!(data.samples(0).is_empty());
        assert!(data.samples(1).is_empty());
    }

    #[test]
    fn test_invalid_update_keeps_state() {
        let mut chart = mounted();
        chart
            .on_update(UpdateMessage::new(vec!["a".into()]).with_series("CPU", [Some(1.0)]))
            .unwrap();
        let before = chart.data().cloned();
        let revision = chart.revision();

        let err = chart
            .on_update(UpdateMessage::new(vec!["a".into(), "b".into()]).with_series("CPU", [Some(9.0)]))
            .unwrap_err();

        assert!(matches!(err, ChartError::InvalidUpdate(_)));
        assert_eq!(chart.data().cloned(), before);
        assert_eq!(chart.revision(), revision);
    }

    #[test]
    fn test_on_event_decodes_points() {
        let mut chart = mounted();
        let payload = br#"{"labels": ["t1", "t2"], "points": {"CPU": [10.5, null]}}"#;

        let outcome = chart.on_event("points", payload).unwrap().unwrap();
        assert_eq!(outcome.updated, vec!["CPU"]);
        assert_eq!(chart.legend()[0].value, "-");
    }

    #[test]
    fn test_on_event_other_events_ignored() {
        let mut chart = mounted();
        assert!(chart.on_event("reset", b"{}").unwrap().is_none());
        assert_eq!(chart.revision(), 0);
    }

    #[test]
    fn test_on_event_malformed_payload() {
        let mut chart = mounted();
        let err = chart.on_event("points", br#"{"labels": []}"#).unwrap_err();
        assert!(matches!(err, ChartError::Decode(_)));
        assert!(chart.data().unwrap().is_empty());
    }

    #[test]
    fn test_lifecycle_errors() {
        let mut chart = LiveChart::new(cpu_ram());
        assert!(matches!(
            chart.on_update(UpdateMessage::default()),
            Err(ChartError::NotMounted)
        ));
        assert!(matches!(
            chart.on_mount(Surface::new(0.0, 100.0)),
            Err(ChartError::InvalidSurface { .. })
        ));

        chart.on_mount(Surface::new(10.0, 10.0)).unwrap();
        assert!(matches!(
            chart.on_mount(Surface::new(10.0, 10.0)),
            Err(ChartError::AlreadyMounted)
        ));
    }

    #[test]
    fn test_unmount_releases_instance() {
        let mut chart = mounted();
        chart
            .on_update(UpdateMessage::new(vec!["a".into()]).with_series("CPU", [Some(1.0)]))
            .unwrap();

        chart.on_unmount();
        assert_eq!(chart.lifecycle(), Lifecycle::Unmounted);
        assert!(chart.data().is_none());
        assert!(chart.cache().is_none());

        // Idempotent, and the chart can be mounted again from scratch.
        chart.on_unmount();
        chart.on_mount(Surface::new(10.0, 10.0)).unwrap();
        assert!(chart.data().unwrap().is_empty());
    }

    #[test]
    fn test_seed_applied_on_mount() {
        let seed = UpdateMessage::new(vec![Label::Timestamp(1000.0)]).with_series("RAM", [Some(42.0)]);
        let mut chart = LiveChart::new(cpu_ram()).with_seed(seed);
        chart.on_mount(Surface::new(10.0, 10.0)).unwrap();

        assert_eq!(chart.legend()[1].value, "42.0%");
        assert_eq!(chart.revision(), 1);
    }
}
