//! Label and sample storage for one chart instance.

use livechart_common::Label;

/// The label sequence and one sample sequence per configured series.
///
/// Series are stored by position, matching the chart configuration.
/// A series that was not part of the latest update keeps its previous
/// samples, so its length may differ from the label count; use
/// [`ChartData::aligned`] to read samples slot by slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    labels: Vec<Label>,
    series: Vec<Vec<Option<f64>>>,
}

impl ChartData {
    /// Empty data for `series_count` series.
    pub fn empty(series_count: usize) -> Self {
        Self {
            labels: Vec::new(),
            series: vec![Vec::new(); series_count],
        }
    }

    /// The shared label sequence.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Number of label slots.
    pub fn point_count(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of series slots.
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Stored samples of a series, exactly as last received.
    ///
    /// Not aligned: a series omitted from the latest update may hold more
    /// or fewer samples than there are labels.
    pub fn samples(&self, series: usize) -> &[Option<f64>] {
        self.series.get(series).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sample at a label slot; `None` for gaps and slots the series lacks.
    pub fn sample_at(&self, series: usize, slot: usize) -> Option<f64> {
        self.samples(series).get(slot).copied().flatten()
    }

    /// Samples of a series aligned to the label sequence.
    ///
    /// Always yields exactly [`ChartData::point_count`] items.
    pub fn aligned(&self, series: usize) -> impl Iterator<Item = Option<f64>> + '_ {
        (0..self.labels.len()).map(move |slot| self.sample_at(series, slot))
    }

    /// Non-null aligned samples of a series.
    pub fn present_values(&self, series: usize) -> impl Iterator<Item = f64> + '_ {
        self.aligned(series).flatten().filter(|v| v.is_finite())
    }

    /// The sample in the last label slot.
    pub fn latest(&self, series: usize) -> Option<f64> {
        self.labels
            .len()
            .checked_sub(1)
            .and_then(|slot| self.sample_at(series, slot))
    }

    pub(crate) fn replace_labels(&mut self, labels: Vec<Label>) {
        self.labels = labels;
    }

    pub(crate) fn replace_series(&mut self, series: usize, samples: Vec<Option<f64>>) {
        if let Some(slot) = self.series.get_mut(series) {
            *slot = samples;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: i64) -> Vec<Label> {
        (0..n).map(|i| Label::from(i * 1000)).collect()
    }

    #[test]
    fn test_empty() {
        let data = ChartData::empty(3);
        assert!(data.is_empty());
        assert_eq!(data.series_count(), 3);
        assert!(data.samples(0).is_empty());
        assert_eq!(data.latest(0), None);
        assert_eq!(data.aligned(2).count(), 0);
    }

    #[test]
    fn test_aligned_pads_and_truncates() {
        let mut data = ChartData::empty(2);
        data.replace_series(0, vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
        data.replace_series(1, vec![Some(5.0)]);
        data.replace_labels(labels(2));

        assert_eq!(data.aligned(0).collect::<Vec<_>>(), vec![Some(1.0), Some(2.0)]);
        assert_eq!(data.aligned(1).collect::<Vec<_>>(), vec![Some(5.0), None]);
        assert_eq!(data.latest(1), None);
        assert_eq!(data.latest(0), Some(2.0));

        // Stored samples are untouched by alignment.
        assert_eq!(data.samples(0).len(), 4);
    }

    #[test]
    fn test_out_of_range_series() {
        let mut data = ChartData::empty(1);
        data.replace_series(5, vec![Some(1.0)]);
        assert!(data.samples(5).is_empty());
        assert_eq!(data.series_count(), 1);
    }

    #[test]
    fn test_present_values_skip_gaps() {
        let mut data = ChartData::empty(1);
        data.replace_labels(labels(3));
        data.replace_series(0, vec![Some(1.0), None, Some(3.0)]);
        assert_eq!(data.present_values(0).collect::<Vec<_>>(), vec![1.0, 3.0]);
    }
}
