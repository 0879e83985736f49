use serde::{Deserialize, Serialize};

use super::Reading;

/// Per-device averaged readings over a reporting window.
///
/// Produced by the report layer from a raw series, consumed by the
/// three-phase analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseAverage {
    pub avg_voltage_v: f64,
    pub avg_current_a: f64,
    pub avg_power_w: f64,
    pub avg_power_factor: f64,
}

impl PhaseAverage {
    pub fn new(avg_voltage_v: f64, avg_current_a: f64, avg_power_w: f64, avg_power_factor: f64) -> Self {
        Self {
            avg_voltage_v,
            avg_current_a,
            avg_power_w,
            avg_power_factor,
        }
    }

    /// Reduce a raw series to arithmetic means.
    ///
    /// Missing power samples count as 0 W. An empty series reduces to zero
    /// volts/amps/watts with unity power factor, matching what an idle
    /// metering point reports.
    pub fn from_readings(readings: &[Reading]) -> Self {
        if readings.is_empty() {
            return Self::new(0.0, 0.0, 0.0, 1.0);
        }

        let n = readings.len() as f64;
        let avg_voltage_v = readings.iter().map(|r| r.voltage_v).sum::<f64>() / n;
        let avg_current_a = readings.iter().map(|r| r.current_a).sum::<f64>() / n;
        let avg_power_w = readings.iter().map(|r| r.power_w.unwrap_or(0.0)).sum::<f64>() / n;
        let avg_power_factor = readings.iter().map(|r| r.power_factor).sum::<f64>() / n;

        Self::new(avg_voltage_v, avg_current_a, avg_power_w, avg_power_factor)
    }
}
