//! Block-tariff billing.
//!
//! A total energy figure goes in, an itemized bill comes out: per-block
//! energy and cost, subscription charge, VAT and grand total. The tariff
//! table is static; VAT is the one per-call knob.

pub mod calculator;
pub mod config;

pub use calculator::{calculate_bill, BillCalculation, EnergyCostSummary, TariffCalculator};
pub use config::{TariffClass, TariffConfig, DEFAULT_PPN_PERCENT};
