use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Reading, ReportWindow};

/// One hour bucket of averaged samples for one device.
///
/// This is the raw material for downstream time-series charts; nothing here
/// decides how it is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    /// Start of the hour bucket
    pub bucket_start: DateTime<Utc>,
    pub device_id: String,
    /// Missing power samples count as 0 W
    pub avg_power_w: f64,
    pub avg_voltage_v: f64,
    pub avg_current_a: f64,
    pub sample_count: usize,
}

#[derive(Default)]
struct BucketAccumulator {
    power_w: f64,
    voltage_v: f64,
    current_a: f64,
    count: usize,
}

/// Reduce raw series into hourly per-device averages.
///
/// Output is ordered by bucket start, then device id. Hours without samples
/// produce no point; gap filling is a presentation decision.
pub fn hourly_profile(
    series_by_device: &HashMap<String, Vec<Reading>>,
    window: &ReportWindow,
) -> Vec<ProfilePoint> {
    let mut buckets: BTreeMap<(i64, &str), BucketAccumulator> = BTreeMap::new();

    for (device_id, series) in series_by_device {
        for reading in series.iter().filter(|r| window.contains(r.timestamp)) {
            let secs = reading.timestamp.timestamp();
            let bucket_secs = secs - secs.rem_euclid(3600);

            let acc = buckets.entry((bucket_secs, device_id.as_str())).or_default();
            acc.power_w += reading.power_w.unwrap_or(0.0);
            acc.voltage_v += reading.voltage_v;
            acc.current_a += reading.current_a;
            acc.count += 1;
        }
    }

    buckets
        .into_iter()
        .filter_map(|((bucket_secs, device_id), acc)| {
            let bucket_start = DateTime::from_timestamp(bucket_secs, 0)?;
            let n = acc.count as f64;
            Some(ProfilePoint {
                bucket_start,
                device_id: device_id.to_string(),
                avg_power_w: acc.power_w / n,
                avg_voltage_v: acc.voltage_v / n,
                avg_current_a: acc.current_a / n,
                sample_count: acc.count,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn reading(time: &str, power_w: f64) -> Reading {
        Reading::new(ts(time), Some(power_w), None, 220.0, 2.0, 0.9)
    }

    fn window() -> ReportWindow {
        ReportWindow::new(ts("2024-03-01T00:00:00Z"), ts("2024-03-02T00:00:00Z")).unwrap()
    }

    #[test]
    fn test_samples_average_within_their_hour() {
        let series = HashMap::from([(
            "pzem-1".to_string(),
            vec![
                reading("2024-03-01T10:05:00Z", 400.0),
                reading("2024-03-01T10:55:00Z", 600.0),
                reading("2024-03-01T11:05:00Z", 1000.0),
            ],
        )]);

        let profile = hourly_profile(&series, &window());
        assert_eq!(profile.len(), 2);

        assert_eq!(profile[0].bucket_start, ts("2024-03-01T10:00:00Z"));
        assert!((profile[0].avg_power_w - 500.0).abs() < 1e-9);
        assert_eq!(profile[0].sample_count, 2);

        assert_eq!(profile[1].bucket_start, ts("2024-03-01T11:00:00Z"));
        assert!((profile[1].avg_power_w - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_ordering_is_bucket_then_device() {
        let series = HashMap::from([
            (
                "pzem-2".to_string(),
                vec![reading("2024-03-01T10:10:00Z", 100.0)],
            ),
            (
                "pzem-1".to_string(),
                vec![
                    reading("2024-03-01T10:20:00Z", 200.0),
                    reading("2024-03-01T09:20:00Z", 300.0),
                ],
            ),
        ]);

        let profile = hourly_profile(&series, &window());
        let keys: Vec<(DateTime<Utc>, &str)> = profile
            .iter()
            .map(|p| (p.bucket_start, p.device_id.as_str()))
            .collect();

        assert_eq!(
            keys,
            vec![
                (ts("2024-03-01T09:00:00Z"), "pzem-1"),
                (ts("2024-03-01T10:00:00Z"), "pzem-1"),
                (ts("2024-03-01T10:00:00Z"), "pzem-2"),
            ]
        );
    }

    #[test]
    fn test_out_of_window_samples_dropped() {
        let series = HashMap::from([(
            "pzem-1".to_string(),
            vec![
                reading("2024-02-29T23:59:00Z", 999.0),
                reading("2024-03-01T00:01:00Z", 500.0),
            ],
        )]);

        let profile = hourly_profile(&series, &window());
        assert_eq!(profile.len(), 1);
        assert_eq!(profile[0].bucket_start, ts("2024-03-01T00:00:00Z"));
    }

    #[test]
    fn test_missing_power_counts_as_zero() {
        let series = HashMap::from([(
            "pzem-1".to_string(),
            vec![
                reading("2024-03-01T10:05:00Z", 800.0),
                Reading::new(ts("2024-03-01T10:35:00Z"), None, None, 220.0, 2.0, 0.9),
            ],
        )]);

        let profile = hourly_profile(&series, &window());
        assert!((profile[0].avg_power_w - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input_yields_empty_profile() {
        let profile = hourly_profile(&HashMap::new(), &window());
        assert!(profile.is_empty());
    }
}
