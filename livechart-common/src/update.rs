//! The `points` event payload pushed to live charts.
//!
//! Wire shape:
//!
//! ```json
//! { "labels": [1700000000000, 1700000005000], "points": { "CPU": [10.5, null] } }
//! ```
//!
//! Every message is a complete snapshot of the label sequence and of the
//! series it names; receivers replace their state rather than appending.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Event name carrying an [`UpdateMessage`].
pub const POINTS_EVENT: &str = "points";

/// A single X-axis slot identifier.
///
/// Any JSON number is a timestamp. Its unit is up to the receiver;
/// producers in this workspace send epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    /// Unix epoch time, integer or fractional.
    Timestamp(f64),

    /// Free-form category or index name.
    Text(String),
}

impl Label {
    /// The timestamp, if this label is one.
    pub fn as_timestamp(&self) -> Option<f64> {
        match self {
            Label::Timestamp(ts) => Some(*ts),
            Label::Text(_) => None,
        }
    }
}

impl From<i64> for Label {
    fn from(ts: i64) -> Self {
        Label::Timestamp(ts as f64)
    }
}

impl From<f64> for Label {
    fn from(ts: f64) -> Self {
        Label::Timestamp(ts)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::Text(s.to_string())
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label::Text(s)
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Timestamp(ts) => write!(f, "{}", ts),
            Label::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Reasons an update is refused as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    #[error("series '{series}' has {actual} samples but there are {expected} labels")]
    LengthMismatch {
        series: String,
        expected: usize,
        actual: usize,
    },

    #[error("timestamp label at index {index} goes backwards")]
    DecreasingTimestamps { index: usize },

    #[error("timestamp label at index {index} is not a finite number")]
    InvalidTimestamp { index: usize },
}

/// A consistent snapshot of labels plus samples for zero or more series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateMessage {
    /// Shared X-axis labels.
    pub labels: Vec<Label>,

    /// Series name to samples. `null` samples are gaps.
    pub points: BTreeMap<String, Vec<Option<f64>>>,
}

impl UpdateMessage {
    /// Create a message with the given labels and no series.
    pub fn new(labels: Vec<Label>) -> Self {
        Self {
            labels,
            points: BTreeMap::new(),
        }
    }

    /// Add (or replace) the samples for a series.
    pub fn with_series(
        mut self,
        name: impl Into<String>,
        samples: impl IntoIterator<Item = Option<f64>>,
    ) -> Self {
        self.points.insert(name.into(), samples.into_iter().collect());
        self
    }

    /// Number of label slots.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the message carries no label slots.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Names of the series carried by this message.
    pub fn series_names(&self) -> impl Iterator<Item = &str> {
        self.points.keys().map(String::as_str)
    }

    /// Check the message is internally consistent.
    ///
    /// Every series must have exactly one sample per label, timestamps
    /// must be finite, and when all labels are timestamps they must not
    /// decrease.
    pub fn validate(&self) -> Result<(), UpdateError> {
        let expected = self.labels.len();

        if let Some(index) = self
            .labels
            .iter()
            .position(|label| label.as_timestamp().is_some_and(|ts| !ts.is_finite()))
        {
            return Err(UpdateError::InvalidTimestamp { index });
        }

        for (series, samples) in &self.points {
            if samples.len() != expected {
                return Err(UpdateError::LengthMismatch {
                    series: series.clone(),
                    expected,
                    actual: samples.len(),
                });
            }
        }

        let timestamps: Option<Vec<f64>> = self.labels.iter().map(Label::as_timestamp).collect();
        if let Some(timestamps) = timestamps {
            if let Some(index) = timestamps.windows(2).position(|w| w[1] < w[0]) {
                return Err(UpdateError::DecreasingTimestamps { index: index + 1 });
            }
        }

        Ok(())
    }
}

/// Get the current timestamp in milliseconds since Unix epoch.
///
/// Returns 0 if system time is before Unix epoch.
pub fn current_timestamp_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
