use serde::Serialize;

use crate::gnc::Phase;

// ---------------------------------------------------------------------------
// Sampled flight history
// ---------------------------------------------------------------------------

/// One sampled point of a trajectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSample {
    pub time: f64,              // s since release (unscaled)
    pub distance: f64,          // m downrange
    pub altitude: f64,          // m
    pub speed: f64,             // m/s
    pub phase: Phase,
    pub flight_path_angle: f64, // rad
    pub aoa: f64,               // rad
}

impl FlightSample {
    /// Body pitch: flight-path angle plus angle of attack, rad.
    pub fn pitch(&self) -> f64 {
        self.flight_path_angle + self.aoa
    }
}

/// Time-ordered samples taken every Nth integration step.
#[derive(Debug, Clone, Default)]
pub struct History {
    samples: Vec<FlightSample>,
}

impl History {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { samples: Vec::with_capacity(capacity) }
    }

    /// Append a sample. Times must be non-decreasing.
    pub(crate) fn push(&mut self, sample: FlightSample) {
        debug_assert!(self.samples.last().map_or(true, |last| last.time <= sample.time));
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FlightSample> {
        self.samples.iter()
    }

    pub fn as_slice(&self) -> &[FlightSample] {
        &self.samples
    }

    pub fn last(&self) -> Option<&FlightSample> {
        self.samples.last()
    }

    /// First sample at or after `elapsed` seconds; the last sample once
    /// `elapsed` runs past the end. Binary search over the sample times.
    pub fn sample_at(&self, elapsed: f64) -> Option<&FlightSample> {
        let idx = self.samples.partition_point(|s| s.time < elapsed);
        self.samples.get(idx).or_else(|| self.samples.last())
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a FlightSample;
    type IntoIter = std::slice::Iter<'a, FlightSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
