//! Threshold-based findings over an analyzed window.
//!
//! Findings carry measured values, not prose; turning them into user-facing
//! text (or report sections) is a downstream concern.

use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::domain::PhaseAverage;
use crate::three_phase::ThreePhaseSnapshot;

const LOW_POWER_FACTOR: f64 = 0.85;
const EXCELLENT_POWER_FACTOR: f64 = 0.95;
const POWER_IMBALANCE_LIMIT_PERCENT: f64 = 20.0;
const CURRENT_IMBALANCE_LIMIT_PERCENT: f64 = 15.0;
const VOLTAGE_IMBALANCE_LIMIT_PERCENT: f64 = 5.0;
const VOLTAGE_MIN_V: f64 = 200.0;
const VOLTAGE_MAX_V: f64 = 240.0;
const EFFICIENCY_TARGET_PERCENT: f64 = 90.0;

/// A single structured observation about the analyzed window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// Correction capacitors would pay off below this factor
    LowPowerFactor { measured: f64 },
    ExcellentPowerFactor { measured: f64 },
    /// Loads should be redistributed across phases
    HighPowerImbalance { percent: f64 },
    /// Possible faulty equipment or uneven load distribution
    HighCurrentImbalance { percent: f64 },
    /// Utility- or transformer-side problem
    HighVoltageImbalance { percent: f64 },
    VoltageOutOfRange { device_id: String, measured_v: f64 },
    HighEfficiency { percent: f64 },
    EfficiencyBelowTarget { percent: f64 },
    /// Nothing noteworthy observed
    NominalOperation,
}

/// Evaluate a snapshot plus its per-phase inputs against the fixed
/// thresholds. Devices are visited in id order so output is deterministic.
pub fn evaluate(
    snapshot: &ThreePhaseSnapshot,
    phases: &HashMap<String, PhaseAverage>,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    if snapshot.overall_power_factor < LOW_POWER_FACTOR {
        findings.push(Finding::LowPowerFactor {
            measured: snapshot.overall_power_factor,
        });
    } else if snapshot.overall_power_factor > EXCELLENT_POWER_FACTOR {
        findings.push(Finding::ExcellentPowerFactor {
            measured: snapshot.overall_power_factor,
        });
    }

    if snapshot.power_imbalance_percent > POWER_IMBALANCE_LIMIT_PERCENT {
        findings.push(Finding::HighPowerImbalance {
            percent: snapshot.power_imbalance_percent,
        });
    } else if snapshot.current_imbalance_percent > CURRENT_IMBALANCE_LIMIT_PERCENT {
        findings.push(Finding::HighCurrentImbalance {
            percent: snapshot.current_imbalance_percent,
        });
    }

    if snapshot.voltage_imbalance_percent > VOLTAGE_IMBALANCE_LIMIT_PERCENT {
        findings.push(Finding::HighVoltageImbalance {
            percent: snapshot.voltage_imbalance_percent,
        });
    }

    for (device_id, phase) in phases.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
        let v = phase.avg_voltage_v;
        if v > 0.0 && !(VOLTAGE_MIN_V..=VOLTAGE_MAX_V).contains(&v) {
            findings.push(Finding::VoltageOutOfRange {
                device_id: device_id.clone(),
                measured_v: v,
            });
        }
    }

    if snapshot.total_active_power_w > 0.0 {
        if snapshot.efficiency_percent > EFFICIENCY_TARGET_PERCENT {
            findings.push(Finding::HighEfficiency {
                percent: snapshot.efficiency_percent,
            });
        } else {
            findings.push(Finding::EfficiencyBelowTarget {
                percent: snapshot.efficiency_percent,
            });
        }
    }

    if findings.is_empty() {
        findings.push(Finding::NominalOperation);
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::three_phase::ThreePhaseAnalyzer;

    fn phases(entries: &[(&str, PhaseAverage)]) -> HashMap<String, PhaseAverage> {
        entries
            .iter()
            .map(|(id, p)| (id.to_string(), *p))
            .collect()
    }

    #[test]
    fn test_low_power_factor_flagged() {
        // PF 600/880 ~ 0.68
        let input = phases(&[("L1", PhaseAverage::new(220.0, 4.0, 600.0, 0.7))]);
        let snapshot = ThreePhaseAnalyzer::analyze(&input);
        let findings = evaluate(&snapshot, &input);

        assert!(findings
            .iter()
            .any(|f| matches!(f, Finding::LowPowerFactor { .. })));
        assert!(findings
            .iter()
            .any(|f| matches!(f, Finding::EfficiencyBelowTarget { .. })));
    }

    #[test]
    fn test_balanced_efficient_system() {
        let p = PhaseAverage::new(230.0, 5.0, 1120.0, 0.97);
        let input = phases(&[("L1", p), ("L2", p), ("L3", p)]);
        let snapshot = ThreePhaseAnalyzer::analyze(&input);
        let findings = evaluate(&snapshot, &input);

        assert!(findings
            .iter()
            .any(|f| matches!(f, Finding::ExcellentPowerFactor { .. })));
        assert!(findings
            .iter()
            .any(|f| matches!(f, Finding::HighEfficiency { .. })));
        assert!(!findings
            .iter()
            .any(|f| matches!(f, Finding::HighPowerImbalance { .. })));
    }

    #[test]
    fn test_power_imbalance_takes_precedence_over_current() {
        let input = phases(&[
            ("L1", PhaseAverage::new(230.0, 10.0, 2200.0, 0.95)),
            ("L2", PhaseAverage::new(230.0, 1.0, 220.0, 0.95)),
            ("L3", PhaseAverage::new(230.0, 1.0, 220.0, 0.95)),
        ]);
        let snapshot = ThreePhaseAnalyzer::analyze(&input);
        let findings = evaluate(&snapshot, &input);

        assert!(findings
            .iter()
            .any(|f| matches!(f, Finding::HighPowerImbalance { .. })));
        assert!(!findings
            .iter()
            .any(|f| matches!(f, Finding::HighCurrentImbalance { .. })));
    }

    #[test]
    fn test_voltage_out_of_range_per_device() {
        let input = phases(&[
            ("pzem-1", PhaseAverage::new(195.0, 2.0, 400.0, 0.9)),
            ("pzem-2", PhaseAverage::new(220.0, 2.0, 400.0, 0.9)),
            ("pzem-3", PhaseAverage::new(251.0, 2.0, 400.0, 0.9)),
        ]);
        let snapshot = ThreePhaseAnalyzer::analyze(&input);
        let findings = evaluate(&snapshot, &input);

        let out_of_range: Vec<&Finding> = findings
            .iter()
            .filter(|f| matches!(f, Finding::VoltageOutOfRange { .. }))
            .collect();
        assert_eq!(out_of_range.len(), 2);

        // Deterministic device order
        assert_eq!(
            out_of_range[0],
            &Finding::VoltageOutOfRange {
                device_id: "pzem-1".to_string(),
                measured_v: 195.0
            }
        );
    }

    #[test]
    fn test_idle_system_reports_nominal() {
        let input = HashMap::new();
        let snapshot = ThreePhaseAnalyzer::analyze(&input);
        let findings = evaluate(&snapshot, &input);

        // Idle snapshot has unity PF, which reads as excellent; active power
        // is zero so no efficiency verdict is emitted.
        assert!(!findings.is_empty());
        assert!(!findings
            .iter()
            .any(|f| matches!(f, Finding::EfficiencyBelowTarget { .. })));
    }

    #[test]
    fn test_quiet_mid_range_system_is_nominal() {
        // PF between 0.85 and 0.95, balanced, in-range voltage, zero power.
        let p = PhaseAverage::new(230.0, 0.0, 0.0, 0.9);
        let input = phases(&[("L1", p), ("L2", p), ("L3", p)]);
        let mut snapshot = ThreePhaseAnalyzer::analyze(&input);
        snapshot.overall_power_factor = 0.9;

        let findings = evaluate(&snapshot, &input);
        assert_eq!(findings, vec![Finding::NominalOperation]);
    }

    #[test]
    fn test_findings_serialize_with_kind_tag() {
        let finding = Finding::LowPowerFactor { measured: 0.72 };
        let json = serde_json::to_string(&finding).unwrap();
        assert!(json.contains("\"kind\":\"low_power_factor\""));
    }
}
