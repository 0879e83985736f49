use std::collections::HashMap;

use tracing::debug;

use super::ThreePhaseSnapshot;
use crate::domain::PhaseAverage;

/// Pure aggregation of per-phase averages into system-level power figures.
///
/// Keyed by device id rather than a fixed L1/L2/L3 triple: installations in
/// the field run anywhere from one to several metering points, and the math
/// is the same for all of them.
pub struct ThreePhaseAnalyzer;

impl ThreePhaseAnalyzer {
    /// Aggregate phase averages into a snapshot.
    ///
    /// An empty map yields the idle snapshot (zero power, unity power
    /// factor, zero imbalance) rather than an error.
    pub fn analyze(phases: &HashMap<String, PhaseAverage>) -> ThreePhaseSnapshot {
        let mut total_active = 0.0;
        let mut total_apparent = 0.0;
        let mut total_reactive = 0.0;

        for phase in phases.values() {
            // Sensor noise can push the reported factor past 1.
            let pf = phase.avg_power_factor.clamp(0.0, 1.0);
            let apparent = phase.avg_voltage_v * phase.avg_current_a;

            total_active += phase.avg_power_w;
            total_apparent += apparent;

            // Q = S * sin(acos(PF)); undefined angle means no exchange
            if pf > 0.0 && apparent > 0.0 {
                total_reactive += apparent * pf.acos().sin();
            }
        }

        let overall_power_factor = if total_apparent > 0.0 {
            (total_active / total_apparent).clamp(0.0, 1.0)
        } else {
            1.0
        };

        let powers: Vec<f64> = phases.values().map(|p| p.avg_power_w).collect();
        let currents: Vec<f64> = phases.values().map(|p| p.avg_current_a).collect();
        let voltages: Vec<f64> = phases.values().map(|p| p.avg_voltage_v).collect();

        let snapshot = ThreePhaseSnapshot {
            total_active_power_w: total_active,
            total_apparent_power_va: total_apparent,
            total_reactive_power_var: total_reactive,
            overall_power_factor,
            efficiency_percent: overall_power_factor * 100.0,
            power_imbalance_percent: relative_spread_percent(&powers),
            current_imbalance_percent: relative_spread_percent(&currents),
            voltage_imbalance_percent: relative_spread_percent(&voltages),
        };

        debug!(phases = phases.len(), %snapshot, "phase aggregation complete");
        snapshot
    }
}

/// Population stddev over mean, as a percentage. Zero for an empty list or
/// a non-positive mean, so idle or single-phase systems read as balanced.
fn relative_spread_percent(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return 0.0;
    }

    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() / mean * 100.0
}
