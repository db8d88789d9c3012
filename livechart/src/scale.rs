//! Value and label scales used to place samples on the plot.

use std::collections::BTreeMap;

use livechart_common::Label;

use crate::config::ChartConfig;
use crate::data::ChartData;

/// A closed value interval mapped onto the plot height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ValueRange {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range covering `values` with 10% padding on both ends.
    ///
    /// Flat data gets ±0.5 around the value; no data gets `0..1`.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });

        if min > max {
            return Self::default();
        }

        let range = max - min;
        if range < 0.001 {
            Self::new(min - 0.5, max + 0.5)
        } else {
            let padding = range * 0.1;
            Self::new(min - padding, max + padding)
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Position of `value` in the range, 0.0 at `min` and 1.0 at `max`.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.span();
        if span <= 0.0 {
            0.5
        } else {
            (value - self.min) / span
        }
    }

    /// `divisions + 1` evenly spaced values from `max` down to `min`.
    pub fn ticks(&self, divisions: usize) -> Vec<f64> {
        let divisions = divisions.max(1);
        (0..=divisions)
            .map(|i| self.max - (i as f64 / divisions as f64) * self.span())
            .collect()
    }
}

/// Compute the range of every scale used by the chart.
///
/// A fixed axis range wins; otherwise the range covers all aligned,
/// non-null samples of the series on that scale.
pub fn scale_ranges(config: &ChartConfig, data: &ChartData) -> BTreeMap<String, ValueRange> {
    config
        .scales()
        .into_iter()
        .map(|scale| {
            let fixed = config
                .axis_for(scale)
                .and_then(|axis| axis.range)
                .map(|[min, max]| ValueRange::new(min, max));

            let range = fixed.unwrap_or_else(|| {
                ValueRange::from_values(
                    config
                        .series
                        .iter()
                        .enumerate()
                        .filter(|(_, s)| s.scale == scale)
                        .flat_map(|(index, _)| data.present_values(index)),
                )
            });

            (scale.to_string(), range)
        })
        .collect()
}

/// Horizontal placement of label slots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum XScale {
    /// Proportional to time between the first and last timestamp.
    Time { start: f64, end: f64 },
    /// Evenly spaced slots.
    Index { count: usize },
}

impl XScale {
    /// Pick a scale for a label sequence.
    ///
    /// Time placement needs every label to be a timestamp and a positive,
    /// finite span.
    pub fn for_labels(labels: &[Label]) -> Self {
        let timestamps: Option<Vec<f64>> = labels.iter().map(Label::as_timestamp).collect();

        match timestamps.as_deref() {
            Some([first, .., last]) if (last - first).is_finite() && last > first => XScale::Time {
                start: *first,
                end: *last,
            },
            _ => XScale::Index {
                count: labels.len(),
            },
        }
    }

    /// Position of a slot, 0.0 at the left edge and 1.0 at the right.
    pub fn position(&self, slot: usize, label: &Label) -> f64 {
        match (*self, label) {
            (XScale::Time { start, end }, Label::Timestamp(ts)) => {
                ((ts - start) / (end - start)).clamp(0.0, 1.0)
            }
            (XScale::Time { .. }, Label::Text(_)) => 0.0,
            (XScale::Index { count }, _) => {
                if count <= 1 {
                    0.5
                } else {
                    slot as f64 / (count - 1) as f64
                }
            }
        }
    }
}

/// Choose at most `max_ticks` evenly spread slots to label, always
/// including the first and last.
pub fn x_tick_slots(count: usize, max_ticks: usize) -> Vec<usize> {
    if count == 0 || max_ticks == 0 {
        return Vec::new();
    }
    if count <= max_ticks {
        return (0..count).collect();
    }
    if max_ticks == 1 {
        return vec![count - 1];
    }

    let last = count - 1;
    let mut slots: Vec<usize> = (0..max_ticks)
        .map(|i| (i * last + (max_ticks - 1) / 2) / (max_ticks - 1))
        .collect();
    slots.dedup();
    slots
}
