//! PLN block-tariff configurations (2024 rates).
//!
//! Four customer classes are supported. Residential R1/R2 and business B2
//! pay a cheaper rate up to a class-specific threshold and a higher rate
//! above it; industrial I3 pays a single flat rate. All classes carry a
//! fixed monthly subscription charge (abonemen).

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Default VAT (PPN) rate applied to the bill subtotal.
pub const DEFAULT_PPN_PERCENT: f64 = 0.11;

/// PLN customer tariff classes covered by the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TariffClass {
    /// Residential, 1300-2200 VA
    R1,
    /// Residential, 3500-5500 VA
    R2,
    /// Small business
    B2,
    /// Medium industry, flat rate
    I3,
}

impl TariffClass {
    pub const ALL: [TariffClass; 4] = [Self::R1, Self::R2, Self::B2, Self::I3];
}

impl fmt::Display for TariffClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::R1 => "R1",
            Self::R2 => "R2",
            Self::B2 => "B2",
            Self::I3 => "I3",
        };
        write!(f, "{s}")
    }
}

impl FromStr for TariffClass {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "R1" => Ok(Self::R1),
            "R2" => Ok(Self::R2),
            "B2" => Ok(Self::B2),
            "I3" => Ok(Self::I3),
            _ => Err(CoreError::UnknownTariffClass(s.to_string())),
        }
    }
}

/// One tariff class configuration. Rates and abonemen in IDR, threshold in
/// kWh. Never mutated at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TariffConfig {
    pub tariff_class: TariffClass,
    pub block1_threshold_kwh: f64,
    /// Rate for consumption up to the threshold (IDR/kWh)
    pub block1_rate: f64,
    /// Rate for consumption above the threshold (IDR/kWh)
    pub block2_rate: f64,
    /// Fixed monthly subscription charge (IDR)
    pub abonemen: f64,
    /// Flat-rate classes bill everything at `block1_rate`
    pub is_flat_rate: bool,
}

/// 2024 tariff table, ordered as [`TariffClass::ALL`]. Read-only after
/// initialization, so concurrent lookups need no synchronization.
static TARIFF_TABLE: Lazy<[TariffConfig; 4]> = Lazy::new(|| {
    [
        TariffConfig {
            tariff_class: TariffClass::R1,
            block1_threshold_kwh: 900.0,
            block1_rate: 1352.0,
            block2_rate: 1445.0,
            abonemen: 11_000.0,
            is_flat_rate: false,
        },
        TariffConfig {
            tariff_class: TariffClass::R2,
            block1_threshold_kwh: 1300.0,
            block1_rate: 1352.0,
            block2_rate: 1445.0,
            abonemen: 20_000.0,
            is_flat_rate: false,
        },
        TariffConfig {
            tariff_class: TariffClass::B2,
            block1_threshold_kwh: 200.0,
            block1_rate: 1445.0,
            block2_rate: 1699.0,
            abonemen: 40_000.0,
            is_flat_rate: false,
        },
        TariffConfig {
            tariff_class: TariffClass::I3,
            block1_threshold_kwh: 0.0,
            block1_rate: 1699.0,
            block2_rate: 1699.0,
            abonemen: 40_000.0,
            is_flat_rate: true,
        },
    ]
});

impl TariffConfig {
    /// Look up the static configuration for `class`.
    pub fn for_class(class: TariffClass) -> TariffConfig {
        let idx = match class {
            TariffClass::R1 => 0,
            TariffClass::R2 => 1,
            TariffClass::B2 => 2,
            TariffClass::I3 => 3,
        };
        TARIFF_TABLE[idx]
    }

    /// All predefined configurations.
    pub fn all() -> &'static [TariffConfig] {
        &*TARIFF_TABLE
    }
}
