//! Energy estimation over a noisy, possibly-missing measurement series.
//!
//! Real meter series are imperfect: samples arrive out of order, the
//! cumulative register resets mid-window, power readings drop out for hours.
//! Instead of failing on any of these, estimation degrades through a chain
//! of methods in decreasing order of confidence:
//!
//! 1. Delta of the cumulative meter register (most accurate)
//! 2. Trapezoidal integration of instantaneous power
//! 3. Mean power times window duration
//! 4. No usable data at all, reported as zero with an explicit marker
//!
//! The chosen method is always part of the result so downstream billing can
//! flag low-confidence figures.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{Reading, ReportWindow};
use crate::error::CoreError;

/// Sanity bound on a counter delta (kWh). Register resets and corrupt
/// payloads show up as absurd deltas; anything at or above this bound falls
/// back to power integration.
pub const MAX_PLAUSIBLE_KWH: f64 = 10_000.0;

/// How an estimate was produced, in decreasing order of confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum EstimationMethod {
    /// Difference of the cumulative meter register
    CounterDelta,
    /// Trapezoidal integration of instantaneous power samples
    TrapezoidalIntegration,
    /// Mean power times window duration
    AverageApproximation,
    /// No usable samples; energy reported as zero
    NoData,
}

/// Best-effort energy figure for one device over one window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyEstimate {
    /// Estimated consumption (kWh), never negative
    pub energy_kwh: f64,
    pub method: EstimationMethod,
    /// Readings that fell inside the window
    pub sample_count: usize,
}

/// Stateless estimator; the only knob is the counter-delta sanity bound.
#[derive(Debug, Clone)]
pub struct EnergyEstimator {
    max_plausible_kwh: f64,
}

impl Default for EnergyEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl EnergyEstimator {
    pub fn new() -> Self {
        Self {
            max_plausible_kwh: MAX_PLAUSIBLE_KWH,
        }
    }

    /// Override the counter-delta sanity bound.
    pub fn with_max_plausible_kwh(max_plausible_kwh: f64) -> Self {
        Self { max_plausible_kwh }
    }

    /// Estimate energy consumed during `window`.
    ///
    /// The series may be empty, unsorted or partially null; the first
    /// applicable method in the chain wins. The only hard failure is an
    /// inverted window.
    pub fn estimate(
        &self,
        series: &[Reading],
        window: &ReportWindow,
    ) -> Result<EnergyEstimate, CoreError> {
        window.validate()?;

        // Callers are not trusted to deliver chronological data.
        let mut samples: Vec<&Reading> = series
            .iter()
            .filter(|r| window.contains(r.timestamp))
            .collect();
        samples.sort_by_key(|r| r.timestamp);

        if let Some(delta) = self.counter_delta(&samples) {
            debug!(delta_kwh = delta, "estimated from meter register delta");
            return Ok(EnergyEstimate {
                energy_kwh: delta,
                method: EstimationMethod::CounterDelta,
                sample_count: samples.len(),
            });
        }

        if let Some(kwh) = integrate_power(&samples) {
            debug!(energy_kwh = kwh, "estimated from trapezoidal power integration");
            return Ok(EnergyEstimate {
                energy_kwh: kwh,
                method: EstimationMethod::TrapezoidalIntegration,
                sample_count: samples.len(),
            });
        }

        if let Some(kwh) = average_power_approximation(&samples, window) {
            debug!(energy_kwh = kwh, "estimated from mean power over window");
            return Ok(EnergyEstimate {
                energy_kwh: kwh,
                method: EstimationMethod::AverageApproximation,
                sample_count: samples.len(),
            });
        }

        debug!(samples = samples.len(), "no usable power or counter data in window");
        Ok(EnergyEstimate {
            energy_kwh: 0.0,
            method: EstimationMethod::NoData,
            sample_count: samples.len(),
        })
    }

    /// Register delta between the earliest and latest reading in range.
    ///
    /// Applicable only when both endpoints carry a counter value, the
    /// counter did not decrease between them, and the delta is plausible.
    fn counter_delta(&self, samples: &[&Reading]) -> Option<f64> {
        if samples.len() < 2 {
            return None;
        }

        let first = samples.first()?.energy_counter_kwh?;
        let last = samples.last()?.energy_counter_kwh?;
        let delta = last - first;

        if delta < 0.0 {
            warn!(first, last, "meter register decreased across window, falling back");
            return None;
        }
        if delta >= self.max_plausible_kwh {
            warn!(
                delta,
                bound = self.max_plausible_kwh,
                "implausible register delta, falling back"
            );
            return None;
        }

        Some(delta)
    }
}

/// Trapezoidal integration over consecutive sample pairs.
///
/// Pairs with a missing power endpoint or non-positive duration contribute
/// zero. Applicable once at least two power samples exist.
fn integrate_power(samples: &[&Reading]) -> Option<f64> {
    let powered = samples.iter().filter(|r| r.power_w.is_some()).count();
    if powered < 2 {
        return None;
    }

    let kwh: f64 = samples
        .iter()
        .tuple_windows()
        .map(|(a, b)| match (a.power_w, b.power_w) {
            (Some(p0), Some(p1)) => {
                let hours = (b.timestamp - a.timestamp).num_milliseconds() as f64 / 3_600_000.0;
                if hours > 0.0 {
                    (p0 + p1) / 2.0 * hours / 1000.0
                } else {
                    0.0
                }
            }
            _ => 0.0,
        })
        .sum();

    Some(kwh.max(0.0))
}

/// Last resort before giving up: mean of whatever power samples exist,
/// spread over the whole window.
fn average_power_approximation(samples: &[&Reading], window: &ReportWindow) -> Option<f64> {
    let powers: Vec<f64> = samples.iter().filter_map(|r| r.power_w).collect();
    if powers.is_empty() {
        return None;
    }

    let mean = powers.iter().sum::<f64>() / powers.len() as f64;
    Some((mean * window.duration_hours() / 1000.0).max(0.0))
}
