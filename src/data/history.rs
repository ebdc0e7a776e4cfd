//! Rolling sample history for gauges, charts and sparklines.

use std::collections::VecDeque;

use pulsewatch_types::Sample;

/// Default number of samples kept in the rolling window.
pub const DEFAULT_HISTORY_CAPACITY: usize = 40;

/// Which metric of a [`Sample`] to chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Temperature,
    Vibration,
}

impl Metric {
    /// Read this metric from a sample.
    pub fn read(self, sample: &Sample) -> f64 {
        match self {
            Metric::Temperature => sample.temperature,
            Metric::Vibration => sample.vibration,
        }
    }
}

/// Fixed-capacity, oldest-first buffer of recent samples.
///
/// Appending past capacity evicts from the front, so a long-running
/// session holds at most `capacity` samples. Order is append order.
#[derive(Debug, Clone)]
pub struct History {
    samples: VecDeque<Sample>,
    capacity: usize,
    empty: Sample,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create an empty history with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create an empty history holding at most `capacity` samples.
    ///
    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            empty: Sample::empty(),
        }
    }

    /// Append a sample at the tail, evicting the oldest entries past capacity.
    pub fn append(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// The most recent sample, or the [`Sample::empty`] sentinel.
    pub fn latest(&self) -> &Sample {
        self.samples.back().unwrap_or(&self.empty)
    }

    /// An owned, oldest-first copy of the window.
    ///
    /// The copy is unaffected by later appends.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.iter().cloned().collect()
    }

    /// Iterate oldest-first without copying.
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every stored sample.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Chart points as `(position, value)`, oldest at position 0.
    pub fn series(&self, metric: Metric) -> Vec<(f64, f64)> {
        self.samples
            .iter()
            .enumerate()
            .map(|(i, s)| (i as f64, metric.read(s)))
            .collect()
    }

    /// Smallest and largest value of a metric in the window.
    pub fn bounds(&self, metric: Metric) -> Option<(f64, f64)> {
        let mut values = self.samples.iter().map(|s| metric.read(s));
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Get sparkline data (normalized to 0-7 for 8 bar levels).
    ///
    /// Returns an empty Vec if there's not enough history.
    pub fn trend(&self, metric: Metric) -> Vec<u8> {
        if self.samples.len() < 2 {
            return Vec::new();
        }

        let Some((min, max)) = self.bounds(metric) else {
            return Vec::new();
        };
        let range = max - min;

        self.samples
            .iter()
            .map(|s| {
                if range <= f64::EPSILON {
                    return 0;
                }
                let normalized = ((metric.read(s) - min) / range * 7.0) as u8;
                normalized.min(7)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(i: usize) -> Sample {
        Sample::builder()
            .temperature(20.0 + i as f64)
            .vibration(i as f64)
            .captured_at(format!("00:00:{:02}", i % 60))
            .build()
    }

    #[test]
    fn new_history_is_empty() {
        let h = History::new();
        assert!(h.is_empty());
        assert_eq!(h.capacity(), 40);
        assert!(h.snapshot().is_empty());
    }

    #[test]
    fn latest_is_sentinel_when_empty() {
        let h = History::new();
        assert!(h.latest().is_sentinel());
        assert_eq!(h.latest(), &Sample::empty());
    }

    #[test]
    fn latest_returns_just_appended_sample() {
        let mut h = History::new();
        let s = Sample::new(51.25, 80.5, true, "08:00:00");
        h.append(s.clone());

        let latest = h.latest();
        assert_eq!(latest, &s);
        assert_eq!(latest.temperature.to_bits(), s.temperature.to_bits());
        assert_eq!(latest.vibration.to_bits(), s.vibration.to_bits());
    }

    #[test]
    fn history_caps_at_capacity_keeping_newest_in_order() {
        for capacity in [1usize, 2, 5, 40] {
            let mut h = History::with_capacity(capacity);
            let total = capacity * 3 + 1;
            for i in 0..total {
                h.append(sample(i));
            }

            let snap = h.snapshot();
            assert_eq!(snap.len(), capacity);
            let expected: Vec<Sample> = (total - capacity..total).map(sample).collect();
            assert_eq!(snap, expected);
        }
    }

    #[test]
    fn history_below_capacity_keeps_everything() {
        let mut h = History::with_capacity(10);
        for i in 0..4 {
            h.append(sample(i));
        }
        assert_eq!(h.len(), 4);
        assert_eq!(h.snapshot()[0], sample(0));
    }

    #[test]
    fn duplicates_are_not_collapsed() {
        let mut h = History::with_capacity(4);
        h.append(sample(1));
        h.append(sample(1));
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn snapshot_is_detached_from_later_appends() {
        let mut h = History::with_capacity(3);
        h.append(sample(0));
        let snap = h.snapshot();

        h.append(sample(1));
        h.append(sample(2));
        h.append(sample(3));

        assert_eq!(snap, vec![sample(0)]);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut h = History::with_capacity(0);
        h.append(sample(0));
        h.append(sample(1));
        assert_eq!(h.capacity(), 1);
        assert_eq!(h.snapshot(), vec![sample(1)]);
    }

    #[test]
    fn clear_resets_to_sentinel() {
        let mut h = History::new();
        h.append(sample(3));
        h.clear();
        assert!(h.is_empty());
        assert!(h.latest().is_sentinel());
    }

    #[test]
    fn series_is_indexed_oldest_first() {
        let mut h = History::new();
        h.append(sample(0));
        h.append(sample(5));

        assert_eq!(
            h.series(Metric::Temperature),
            vec![(0.0, 20.0), (1.0, 25.0)]
        );
        assert_eq!(h.series(Metric::Vibration), vec![(0.0, 0.0), (1.0, 5.0)]);
    }

    #[test]
    fn bounds_cover_window() {
        let mut h = History::new();
        assert!(h.bounds(Metric::Vibration).is_none());

        for i in [7, 2, 9] {
            h.append(sample(i));
        }
        assert_eq!(h.bounds(Metric::Vibration), Some((2.0, 9.0)));
    }

    #[test]
    fn trend_empty_with_single_reading() {
        let mut h = History::new();
        h.append(sample(1));
        assert!(h.trend(Metric::Temperature).is_empty());
    }

    #[test]
    fn trend_normalizes_to_eight_levels() {
        let mut h = History::new();
        for i in 0..8 {
            h.append(sample(i));
        }

        let trend = h.trend(Metric::Vibration);
        assert_eq!(trend.len(), 8);
        assert_eq!(trend[0], 0);
        assert_eq!(trend[7], 7);
        assert!(trend.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn trend_flat_series_is_all_zero() {
        let mut h = History::new();
        for _ in 0..3 {
            h.append(sample(4));
        }
        assert_eq!(h.trend(Metric::Temperature), vec![0, 0, 0]);
    }
}
