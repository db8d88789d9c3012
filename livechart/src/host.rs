//! Registry of mounted charts, keyed by chart id.
//!
//! The host owns every chart instance and routes `(chart id, event,
//! payload)` deliveries to the right one. Instances share nothing.

use std::collections::BTreeMap;

use thiserror::Error;

use livechart_common::validate_chart_id;

use crate::config::ChartConfig;
use crate::widget::{ChartError, ChartHook, LiveChart, Surface, UpdateOutcome};

/// Errors raised while routing to charts.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("no chart mounted with id '{0}'")]
    UnknownChart(String),

    #[error("a chart with id '{0}' is already mounted")]
    DuplicateChart(String),

    #[error("chart '{id}': {source}")]
    Chart {
        id: String,
        #[source]
        source: ChartError,
    },

    #[error(transparent)]
    InvalidId(#[from] livechart_common::Error),
}

/// Owns chart instances and dispatches events to them.
#[derive(Debug)]
pub struct ChartHost<H: ChartHook = LiveChart> {
    charts: BTreeMap<String, H>,
}

impl<H: ChartHook> Default for ChartHost<H> {
    fn default() -> Self {
        Self {
            charts: BTreeMap::new(),
        }
    }
}

impl<H: ChartHook> ChartHost<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `chart` on `surface` and register it under `id`.
    pub fn mount(&mut self, id: impl Into<String>, mut chart: H, surface: Surface) -> Result<(), HostError> {
        let id = id.into();
        validate_chart_id(&id)?;

        if self.charts.contains_key(&id) {
            return Err(HostError::DuplicateChart(id));
        }

        chart.on_mount(surface).map_err(|source| HostError::Chart {
            id: id.clone(),
            source,
        })?;

        tracing::info!(chart = %id, "Mounted chart");
        self.charts.insert(id, chart);
        Ok(())
    }

    /// Deliver a raw event to one chart.
    ///
    /// `Ok(None)` means the chart ignored the event.
    pub fn dispatch(
        &mut self,
        id: &str,
        event: &str,
        payload: &[u8],
    ) -> Result<Option<UpdateOutcome>, HostError> {
        let chart = self
            .charts
            .get_mut(id)
            .ok_or_else(|| HostError::UnknownChart(id.to_string()))?;

        chart.on_event(event, payload).map_err(|source| HostError::Chart {
            id: id.to_string(),
            source,
        })
    }

    /// Unmount and drop the chart registered under `id`.
    pub fn unmount(&mut self, id: &str) -> Result<H, HostError> {
        let mut chart = self
            .charts
            .remove(id)
            .ok_or_else(|| HostError::UnknownChart(id.to_string()))?;

        chart.on_unmount();
        tracing::info!(chart = %id, "Unmounted chart");
        Ok(chart)
    }

    /// Unmount every chart.
    pub fn unmount_all(&mut self) {
        for (id, mut chart) in std::mem::take(&mut self.charts) {
            chart.on_unmount();
            tracing::debug!(chart = %id, "Unmounted chart");
        }
    }

    pub fn get(&self, id: &str) -> Option<&H> {
        self.charts.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut H> {
        self.charts.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.charts.contains_key(id)
    }

    /// Chart ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.charts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &H)> {
        self.charts.iter().map(|(id, chart)| (id.as_str(), chart))
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

impl ChartHost<LiveChart> {
    /// Build a host with one mounted [`LiveChart`] per configured chart.
    ///
    /// Each chart is mounted on the surface its configuration asks for.
    pub fn from_configs<'a>(
        charts: impl IntoIterator<Item = (&'a String, &'a ChartConfig)>,
    ) -> Result<Self, HostError> {
        let mut host = Self::new();
        for (id, config) in charts {
            let surface = Surface::from_config(config);
            host.mount(id.clone(), LiveChart::new(config.clone()), surface)?;
        }
        Ok(host)
    }
}
