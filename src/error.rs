use thiserror::Error;

/// Errors surfaced to callers of the analytics core.
///
/// This taxonomy is deliberately small: intermittent telemetry guarantees
/// imperfect data will arrive continuously, so missing samples, sensor noise
/// and non-monotonic counters are resolved locally (clamping, fallback
/// degradation) instead of being raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown tariff class: {0}; expected R1, R2, B2 or I3")]
    UnknownTariffClass(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::InvalidInput("energy must be non-negative".to_string());
        assert_eq!(err.to_string(), "Invalid input: energy must be non-negative");

        let err = CoreError::UnknownTariffClass("R5".to_string());
        assert!(err.to_string().contains("R5"));
        assert!(err.to_string().contains("R1, R2, B2 or I3"));
    }
}
