use std::ops::Range;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Timing, randomness and fault knobs for the upload simulation.
///
/// Ranges are half-open (`min..max`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub tick_interval_ms: u64,
    pub min_increment: u8,
    pub max_increment: u8,
    pub processing_min_ms: u64,
    pub processing_max_ms: u64,
    pub min_records: u32,
    pub max_records: u32,
    /// Probability of a synthetic failure on each upload tick.
    pub failure_rate: f64,
    /// Fixed RNG seed for reproducible runs; entropy when `None`.
    pub seed: Option<u64>,
    pub status_channel_capacity: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 200,
            min_increment: 5,
            max_increment: 20,
            processing_min_ms: 1_500,
            processing_max_ms: 2_500,
            min_records: 100,
            max_records: 2_100,
            failure_rate: 0.0,
            seed: None,
            status_channel_capacity: 256,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,
    #[error("progress increment range {min}..{max} is empty or starts at zero")]
    IncrementRange { min: u8, max: u8 },
    #[error("processing delay range {min}..{max} ms is empty")]
    ProcessingRange { min: u64, max: u64 },
    #[error("record count range {min}..{max} is empty")]
    RecordRange { min: u32, max: u32 },
    #[error("failure rate {0} is outside 0..=1")]
    FailureRate(f64),
    #[error("status channel capacity must be greater than zero")]
    ZeroCapacity,
}

impl SimulationSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_interval_ms == 0 {
            return Err(SettingsError::ZeroTickInterval);
        }
        if self.min_increment == 0 || self.min_increment >= self.max_increment {
            return Err(SettingsError::IncrementRange {
                min: self.min_increment,
                max: self.max_increment,
            });
        }
        if self.processing_min_ms >= self.processing_max_ms {
            return Err(SettingsError::ProcessingRange {
                min: self.processing_min_ms,
                max: self.processing_max_ms,
            });
        }
        if self.min_records >= self.max_records {
            return Err(SettingsError::RecordRange {
                min: self.min_records,
                max: self.max_records,
            });
        }
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(SettingsError::FailureRate(self.failure_rate));
        }
        if self.status_channel_capacity == 0 {
            return Err(SettingsError::ZeroCapacity);
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn increment_range(&self) -> Range<u8> {
        self.min_increment..self.max_increment
    }

    pub fn processing_range(&self) -> Range<u64> {
        self.processing_min_ms..self.processing_max_ms
    }

    pub fn record_range(&self) -> Range<u32> {
        self.min_records..self.max_records
    }
}
