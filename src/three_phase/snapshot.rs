use serde::{Deserialize, Serialize};
use std::fmt;

/// Aggregate power figures and imbalance metrics for one reporting window.
///
/// Power triangle: active (W) is what does work, apparent (VA) is V x I
/// irrespective of phase angle, reactive (VAR) is exchanged due to the
/// phase difference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreePhaseSnapshot {
    /// Sum of per-phase active power (W)
    pub total_active_power_w: f64,

    /// Sum of per-phase apparent power (VA)
    pub total_apparent_power_va: f64,

    /// Sum of per-phase reactive power (VAR)
    pub total_reactive_power_var: f64,

    /// Active / apparent ratio, clamped to [0, 1]
    pub overall_power_factor: f64,

    /// Overall power factor expressed as a percentage
    pub efficiency_percent: f64,

    /// Relative spread (stddev/mean) of per-phase power, in percent
    pub power_imbalance_percent: f64,

    /// Relative spread of per-phase current, in percent
    pub current_imbalance_percent: f64,

    /// Relative spread of per-phase voltage, in percent
    pub voltage_imbalance_percent: f64,
}

impl ThreePhaseSnapshot {
    /// Largest of the three imbalance metrics.
    pub fn worst_imbalance_percent(&self) -> f64 {
        self.power_imbalance_percent
            .max(self.current_imbalance_percent)
            .max(self.voltage_imbalance_percent)
    }

    /// Whether every imbalance metric stays at or below `limit_percent`.
    pub fn is_balanced_within(&self, limit_percent: f64) -> bool {
        self.worst_imbalance_percent() <= limit_percent
    }
}

impl fmt::Display for ThreePhaseSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ThreePhaseSnapshot {{ P: {:.1}W, S: {:.1}VA, Q: {:.1}VAR, PF: {:.3}, imbalance P/I/V: {:.1}/{:.1}/{:.1}% }}",
            self.total_active_power_w,
            self.total_apparent_power_va,
            self.total_reactive_power_var,
            self.overall_power_factor,
            self.power_imbalance_percent,
            self.current_imbalance_percent,
            self.voltage_imbalance_percent,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ThreePhaseSnapshot {
        ThreePhaseSnapshot {
            total_active_power_w: 1200.0,
            total_apparent_power_va: 1320.0,
            total_reactive_power_var: 550.0,
            overall_power_factor: 0.909,
            efficiency_percent: 90.9,
            power_imbalance_percent: 4.0,
            current_imbalance_percent: 7.5,
            voltage_imbalance_percent: 0.8,
        }
    }

    #[test]
    fn test_worst_imbalance() {
        assert!((snapshot().worst_imbalance_percent() - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_is_balanced_within() {
        assert!(snapshot().is_balanced_within(10.0));
        assert!(!snapshot().is_balanced_within(5.0));
    }

    #[test]
    fn test_display() {
        let display = format!("{}", snapshot());
        assert!(display.contains("P: 1200.0W"));
        assert!(display.contains("PF: 0.909"));
    }

    #[test]
    fn test_serialization_round_trip() {
        let json = serde_json::to_string(&snapshot()).unwrap();
        let deserialized: ThreePhaseSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot(), deserialized);
    }
}
