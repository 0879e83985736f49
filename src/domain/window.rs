use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Inclusive reporting window `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportWindow {
    /// Create a window; `end` must not precede `start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, CoreError> {
        let window = Self { start, end };
        window.validate()?;
        Ok(window)
    }

    /// Check that the bounds are chronological.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.end < self.start {
            return Err(CoreError::InvalidInput(format!(
                "window end {} precedes start {}",
                self.end, self.start
            )));
        }
        Ok(())
    }

    /// Window length in hours.
    pub fn duration_hours(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64 / 3_600_000.0
    }

    /// Whether `instant` falls inside the window (bounds inclusive).
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

/// Standard reporting periods offered to the report layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Daily,
    Weekly,
    Monthly,
}

impl ReportPeriod {
    /// The window of this period ending at `end`.
    ///
    /// Monthly is a rolling 30 days, not a calendar month.
    pub fn window_ending(&self, end: DateTime<Utc>) -> ReportWindow {
        let start = match self {
            Self::Daily => end - Duration::days(1),
            Self::Weekly => end - Duration::weeks(1),
            Self::Monthly => end - Duration::days(30),
        };
        ReportWindow { start, end }
    }
}
