use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::sensor::SensorState;

pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// One charted point, values rounded to two decimals at capture time.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct HistorySample {
    /// Buffer length before this sample was inserted.
    ///
    /// Once the buffer is full this stops counting up, so it does not give a
    /// stable ordering. Use `tick` for that.
    pub sequence_index: usize,
    /// Monotonic count of samples ever recorded by the buffer.
    pub tick: u64,
    pub altitude: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
}

impl HistorySample {
    fn capture(state: &SensorState, sequence_index: usize, tick: u64) -> Self {
        Self {
            sequence_index,
            tick,
            altitude: round_to_hundredths(state.altitude),
            temperature: round_to_hundredths(state.temperature),
            humidity: round_to_hundredths(state.humidity),
            pressure: round_to_hundredths(state.pressure),
        }
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fixed-capacity sliding window of samples, oldest first.
#[derive(Clone, Debug)]
pub struct HistoryBuffer {
    capacity: usize,
    samples: VecDeque<HistorySample>,
    recorded: u64,
}

impl HistoryBuffer {
    /// `capacity` is expected to be non-zero; a zero capacity is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
            recorded: 0,
        }
    }

    /// Appends a sample of `state`, evicting the oldest one when full.
    pub fn record(&mut self, state: &SensorState) -> HistorySample {
        let sample = HistorySample::capture(state, self.samples.len(), self.recorded);
        self.recorded += 1;

        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);

        sample
    }

    pub fn samples(&self) -> impl Iterator<Item = &HistorySample> {
        self.samples.iter()
    }

    pub fn to_vec(&self) -> Vec<HistorySample> {
        self.samples.iter().copied().collect()
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
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

/// The selectable third chart series.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChartMetric {
    #[default]
    Humidity,
    Pressure,
}

impl ChartMetric {
    /// Fixed Y axis range for the series.
    pub fn domain(&self) -> (f64, f64) {
        match self {
            ChartMetric::Humidity => (0.0, 100.0),
            ChartMetric::Pressure => (1000.0, 1020.0),
        }
    }

    pub fn value(&self, sample: &HistorySample) -> f64 {
        match self {
            ChartMetric::Humidity => sample.humidity,
            ChartMetric::Pressure => sample.pressure,
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            ChartMetric::Humidity => "%",
            ChartMetric::Pressure => "hPa",
        }
    }
}
