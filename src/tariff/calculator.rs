use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{TariffClass, TariffConfig, DEFAULT_PPN_PERCENT};
use crate::error::CoreError;

/// Itemized bill for one consumption figure.
///
/// No rounding is applied anywhere in the calculation; callers round only
/// for display. By construction `block1_energy_kwh + block2_energy_kwh ==
/// energy_kwh` (non-flat classes), `subtotal == energy_cost + abonemen` and
/// `total_bill == subtotal * (1 + ppn_percent)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillCalculation {
    pub energy_kwh: f64,
    pub block1_energy_kwh: f64,
    pub block2_energy_kwh: f64,
    pub block1_cost: f64,
    pub block2_cost: f64,
    pub energy_cost: f64,
    pub abonemen: f64,
    pub subtotal: f64,
    pub ppn_percent: f64,
    pub ppn_amount: f64,
    pub total_bill: f64,
    pub tariff_class: TariffClass,
}

impl BillCalculation {
    /// Whether this figure should be labelled approximate downstream.
    ///
    /// The documented two-block formula is known to under-model real bills
    /// once block 2 is in use: reference bills at high consumption include
    /// further tiers and surcharges this calculator deliberately does not
    /// guess at.
    pub fn is_approximate(&self) -> bool {
        !TariffConfig::for_class(self.tariff_class).is_flat_rate && self.block2_energy_kwh > 0.0
    }
}

/// Summary of the energy cost alone, without abonemen and VAT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyCostSummary {
    pub energy_kwh: f64,
    /// Block costs summed (IDR)
    pub energy_cost: f64,
    /// Effective blended rate actually paid (IDR/kWh)
    pub average_rate_per_kwh: f64,
    /// Full bill total for reference (IDR)
    pub total_bill: f64,
}

/// Block-tariff billing calculator for a fixed tariff class.
#[derive(Debug, Clone)]
pub struct TariffCalculator {
    config: TariffConfig,
    ppn_percent: f64,
}

impl TariffCalculator {
    /// Calculator for `class` with the default VAT rate.
    pub fn new(class: TariffClass) -> Self {
        Self::with_ppn(class, DEFAULT_PPN_PERCENT)
    }

    /// Calculator for `class` with an explicit VAT rate.
    pub fn with_ppn(class: TariffClass, ppn_percent: f64) -> Self {
        Self {
            config: TariffConfig::for_class(class),
            ppn_percent,
        }
    }

    pub fn config(&self) -> &TariffConfig {
        &self.config
    }

    pub fn ppn_percent(&self) -> f64 {
        self.ppn_percent
    }

    /// Compute the itemized bill for `energy_kwh`.
    pub fn calculate_bill(&self, energy_kwh: f64) -> Result<BillCalculation, CoreError> {
        if energy_kwh < 0.0 {
            return Err(CoreError::InvalidInput(format!(
                "energy must be non-negative, got {energy_kwh} kWh"
            )));
        }

        let (block1_energy, block2_energy, block1_cost, block2_cost) = if self.config.is_flat_rate
        {
            (energy_kwh, 0.0, energy_kwh * self.config.block1_rate, 0.0)
        } else {
            let block1 = energy_kwh.min(self.config.block1_threshold_kwh);
            let block2 = (energy_kwh - self.config.block1_threshold_kwh).max(0.0);
            (
                block1,
                block2,
                block1 * self.config.block1_rate,
                block2 * self.config.block2_rate,
            )
        };

        let energy_cost = block1_cost + block2_cost;
        let subtotal = energy_cost + self.config.abonemen;
        let ppn_amount = subtotal * self.ppn_percent;
        let total_bill = subtotal + ppn_amount;

        debug!(
            class = %self.config.tariff_class,
            energy_kwh,
            total_bill,
            "bill computed"
        );

        Ok(BillCalculation {
            energy_kwh,
            block1_energy_kwh: block1_energy,
            block2_energy_kwh: block2_energy,
            block1_cost,
            block2_cost,
            energy_cost,
            abonemen: self.config.abonemen,
            subtotal,
            ppn_percent: self.ppn_percent,
            ppn_amount,
            total_bill,
            tariff_class: self.config.tariff_class,
        })
    }

    /// Energy cost only, plus the effective blended rate per kWh.
    ///
    /// For zero consumption the blended rate is reported as the block-1
    /// rate, the marginal price of the first kWh.
    pub fn energy_cost_summary(&self, energy_kwh: f64) -> Result<EnergyCostSummary, CoreError> {
        let bill = self.calculate_bill(energy_kwh)?;

        let average_rate_per_kwh = if energy_kwh > 0.0 {
            bill.energy_cost / energy_kwh
        } else {
            self.config.block1_rate
        };

        Ok(EnergyCostSummary {
            energy_kwh,
            energy_cost: bill.energy_cost,
            average_rate_per_kwh,
            total_bill: bill.total_bill,
        })
    }
}

/// One-shot helper for callers that bill a single figure.
pub fn calculate_bill(
    energy_kwh: f64,
    class: TariffClass,
    ppn_percent: Option<f64>,
) -> Result<BillCalculation, CoreError> {
    let calculator = match ppn_percent {
        Some(ppn) => TariffCalculator::with_ppn(class, ppn),
        None => TariffCalculator::new(class),
    };
    calculator.calculate_bill(energy_kwh)
}
