use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One meter sample as delivered by the ingestion layer.
///
/// `power_w` and `energy_counter_kwh` may be absent on any sample; the
/// estimator degrades through its fallback chain rather than rejecting
/// them. The counter is expected to be non-decreasing, but register resets
/// do happen in the field and are handled downstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Sample instant
    pub timestamp: DateTime<Utc>,

    /// Active power (W)
    pub power_w: Option<f64>,

    /// Cumulative meter register (kWh)
    pub energy_counter_kwh: Option<f64>,

    /// RMS voltage (V)
    pub voltage_v: f64,

    /// RMS current (A)
    pub current_a: f64,

    /// Power factor, nominally in [0, 1]; sensor noise may push it outside
    pub power_factor: f64,
}

impl Reading {
    /// Create a new reading.
    pub fn new(
        timestamp: DateTime<Utc>,
        power_w: Option<f64>,
        energy_counter_kwh: Option<f64>,
        voltage_v: f64,
        current_a: f64,
        power_factor: f64,
    ) -> Self {
        Self {
            timestamp,
            power_w,
            energy_counter_kwh,
            voltage_v,
            current_a,
            power_factor,
        }
    }
}
