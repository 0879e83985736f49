//! Window report assembly.
//!
//! The one place where the three calculators meet: per-device energy
//! estimates are summed into the billable total, per-device averages feed
//! the three-phase analyzer, and the diagnostics pass runs over the result.
//! Composition only; every number is produced by a leaf component.

pub mod profile;

pub use profile::{hourly_profile, ProfilePoint};

use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagnostics::{self, Finding};
use crate::domain::{PhaseAverage, Reading, ReportWindow};
use crate::error::CoreError;
use crate::estimator::{EnergyEstimate, EnergyEstimator};
use crate::tariff::{BillCalculation, TariffCalculator, TariffClass, DEFAULT_PPN_PERCENT};
use crate::three_phase::{ThreePhaseAnalyzer, ThreePhaseSnapshot};

/// Per-device slice of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceReport {
    pub device_id: String,
    pub estimate: EnergyEstimate,
    pub averages: PhaseAverage,
}

/// Combined output for one reporting window, ready for rendering or
/// persistence by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyReport {
    pub window: ReportWindow,
    pub tariff_class: TariffClass,
    /// Ordered by device id
    pub devices: Vec<DeviceReport>,
    /// Sum of per-device estimates (kWh)
    pub total_energy_kwh: f64,
    pub snapshot: ThreePhaseSnapshot,
    pub bill: BillCalculation,
    pub findings: Vec<Finding>,
}

/// Composes estimator, analyzer and billing into one report.
#[derive(Debug, Clone)]
pub struct ReportAggregator {
    estimator: EnergyEstimator,
    ppn_percent: f64,
}

impl Default for ReportAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportAggregator {
    pub fn new() -> Self {
        Self {
            estimator: EnergyEstimator::new(),
            ppn_percent: DEFAULT_PPN_PERCENT,
        }
    }

    /// Use a custom-configured estimator.
    pub fn with_estimator(mut self, estimator: EnergyEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Override the VAT rate passed to billing.
    pub fn with_ppn(mut self, ppn_percent: f64) -> Self {
        self.ppn_percent = ppn_percent;
        self
    }

    /// Build the combined report for one window.
    ///
    /// Devices are processed independently; a device with no usable data
    /// contributes zero energy (flagged `NoData` in its estimate) instead
    /// of failing the whole report.
    pub fn build_report(
        &self,
        series_by_device: &HashMap<String, Vec<Reading>>,
        window: &ReportWindow,
        tariff_class: TariffClass,
    ) -> Result<EnergyReport, CoreError> {
        window.validate()?;

        let mut devices = Vec::with_capacity(series_by_device.len());
        for (device_id, series) in series_by_device.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
            let in_window: Vec<Reading> = series
                .iter()
                .filter(|r| window.contains(r.timestamp))
                .copied()
                .collect();

            let estimate = self.estimator.estimate(&in_window, window)?;
            let averages = PhaseAverage::from_readings(&in_window);

            devices.push(DeviceReport {
                device_id: device_id.clone(),
                estimate,
                averages,
            });
        }

        let total_energy_kwh: f64 = devices.iter().map(|d| d.estimate.energy_kwh).sum();

        let phase_map: HashMap<String, PhaseAverage> = devices
            .iter()
            .map(|d| (d.device_id.clone(), d.averages))
            .collect();
        let snapshot = ThreePhaseAnalyzer::analyze(&phase_map);

        let bill = TariffCalculator::with_ppn(tariff_class, self.ppn_percent)
            .calculate_bill(total_energy_kwh)?;

        let findings = diagnostics::evaluate(&snapshot, &phase_map);

        debug!(
            devices = devices.len(),
            total_energy_kwh,
            total_bill = bill.total_bill,
            "report assembled"
        );

        Ok(EnergyReport {
            window: *window,
            tariff_class,
            devices,
            total_energy_kwh,
            snapshot,
            bill,
            findings,
        })
    }
}
