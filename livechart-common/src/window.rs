//! Fixed-size rolling window that producers keep and snapshot.
//!
//! Each push appends one label slot; the oldest slot falls off once the
//! window is full. [`RollingWindow::snapshot`] yields a complete
//! [`UpdateMessage`] that always passes validation.

use std::collections::{BTreeMap, VecDeque};

use crate::update::{Label, UpdateError, UpdateMessage};

/// Default number of label slots kept by producers.
pub const DEFAULT_WINDOW_SIZE: usize = 60;

/// Labels plus one aligned sample queue per series.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    labels: VecDeque<Label>,
    series: BTreeMap<String, VecDeque<Option<f64>>>,
}

impl Default for RollingWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl RollingWindow {
    /// Create a window holding at most `capacity` slots (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            labels: VecDeque::with_capacity(capacity),
            series: BTreeMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Append a slot.
    ///
    /// Series missing from `samples` get a gap in this slot; series seen
    /// for the first time are back-filled with gaps. A timestamp older
    /// than the previous one is refused.
    pub fn push<'a>(
        &mut self,
        label: Label,
        samples: impl IntoIterator<Item = (&'a str, Option<f64>)>,
    ) -> Result<(), UpdateError> {
        if label.as_timestamp().is_some_and(|ts| !ts.is_finite()) {
            return Err(UpdateError::InvalidTimestamp {
                index: self.labels.len(),
            });
        }

        if let (Some(previous), Some(next)) = (
            self.labels.back().and_then(Label::as_timestamp),
            label.as_timestamp(),
        ) {
            if next < previous {
                return Err(UpdateError::DecreasingTimestamps {
                    index: self.labels.len(),
                });
            }
        }

        if self.labels.len() == self.capacity {
            self.labels.pop_front();
            for queue in self.series.values_mut() {
                queue.pop_front();
            }
        }

        let slot = self.labels.len();
        self.labels.push_back(label);

        for (name, value) in samples {
            let queue = self
                .series
                .entry(name.to_string())
                .or_insert_with(|| VecDeque::from(vec![None; slot]));
            queue.push_back(value);
        }

        let len = self.labels.len();
        for queue in self.series.values_mut() {
            queue.resize(len, None);
        }

        Ok(())
    }

    /// Current contents as a complete update.
    pub fn snapshot(&self) -> UpdateMessage {
        UpdateMessage {
            labels: self.labels.iter().cloned().collect(),
            points: self
                .series
                .iter()
                .map(|(name, queue)| (name.clone(), queue.iter().copied().collect()))
                .collect(),
        }
    }

    pub fn clear(&mut self) {
        self.labels.clear();
        self.series.clear();
    }
}
