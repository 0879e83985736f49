//! # Metering Analytics
//!
//! Pure computational core for electrical metering reports: best-effort
//! energy estimation from noisy time series, three-phase power aggregation
//! with imbalance detection, and PLN block-tariff billing with VAT.
//!
//! The surrounding system (ingestion, storage, web, rendering) lives
//! elsewhere; this crate takes ordered measurement series and per-phase
//! averages in and hands fixed data structures back. Every component is a
//! synchronous pure function over immutable inputs, so concurrent callers
//! need no coordination.
//!
//! Data quality is treated as a fact of life rather than an error: missing
//! fields, out-of-range power factors and non-monotonic meter registers are
//! absorbed by clamping and fallback chains. Only an inverted window,
//! negative billable energy or an unknown tariff class surface as
//! [`CoreError`].

pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod estimator;
pub mod report;
pub mod tariff;
pub mod three_phase;

pub use diagnostics::Finding;
pub use domain::{PhaseAverage, Reading, ReportPeriod, ReportWindow};
pub use error::CoreError;
pub use estimator::{EnergyEstimate, EnergyEstimator, EstimationMethod, MAX_PLAUSIBLE_KWH};
pub use report::{hourly_profile, DeviceReport, EnergyReport, ProfilePoint, ReportAggregator};
pub use tariff::{
    calculate_bill, BillCalculation, EnergyCostSummary, TariffCalculator, TariffClass,
    TariffConfig, DEFAULT_PPN_PERCENT,
};
pub use three_phase::{ThreePhaseAnalyzer, ThreePhaseSnapshot};
