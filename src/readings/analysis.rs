use crate::readings::model::{Reading, SampleColumn};
use crate::shutter::math::{calculate_ev_difference, fraction_to_ms, tolerance_for_speed, EvRating};
use crate::shutter::statistics;
use serde::Serialize;

/// Shown wherever a figure cannot be computed.
pub const PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleSummary {
    pub count: usize,
    pub average: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub range: Option<String>,
}

impl SampleSummary {
    pub fn from_samples(samples: &[f64]) -> Self {
        Self {
            count: samples.len(),
            average: statistics::average(samples),
            std_dev: statistics::std_dev(samples),
            min: statistics::min(samples),
            max: statistics::max(samples),
            range: statistics::format_range(samples),
        }
    }
}

/// Everything a table row or report line derives from one reading.
/// Recomputed on demand; never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingSummary {
    pub id: String,
    pub expected_time: String,
    pub expected_ms: f64,
    pub before: SampleSummary,
    pub measurement: SampleSummary,
    /// After (or actual) average against nominal.
    pub ev_difference: Option<f64>,
    pub before_ev_difference: Option<f64>,
    pub tolerance: f64,
    pub rating: Option<EvRating>,
}

impl ReadingSummary {
    pub fn from_reading(reading: &Reading) -> Self {
        let expected_ms = fraction_to_ms(&reading.expected_time);
        let before = SampleSummary::from_samples(reading.samples(SampleColumn::Before));
        let measurement = SampleSummary::from_samples(reading.samples(SampleColumn::Measurement));
        let ev_difference = ev_against(expected_ms, measurement.average);
        Self {
            id: reading.id.clone(),
            expected_time: reading.expected_time.clone(),
            expected_ms,
            before_ev_difference: ev_against(expected_ms, before.average),
            ev_difference,
            rating: ev_difference.map(EvRating::from_ev),
            tolerance: tolerance_for_speed(&reading.expected_time),
            before,
            measurement,
        }
    }

    /// Whether the after/actual average sits inside the speed's tolerance band.
    pub fn within_tolerance(&self) -> Option<bool> {
        self.ev_difference.map(|ev| ev.abs() <= self.tolerance)
    }
}

// Imported reports may still carry zero or negative values; those get no EV.
fn ev_against(expected_ms: f64, average: Option<f64>) -> Option<f64> {
    if !expected_ms.is_finite() || expected_ms <= 0.0 {
        return None;
    }
    average
        .filter(|avg| avg.is_finite() && *avg > 0.0)
        .map(|avg| calculate_ev_difference(expected_ms, avg))
}

pub fn summarize(readings: &[Reading]) -> Vec<ReadingSummary> {
    readings.iter().map(ReadingSummary::from_reading).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub expected_time: String,
    pub ev_diff: Option<f64>,
    pub before_ev_diff: Option<f64>,
    pub tolerance_range: (f64, f64),
}

/// Graph series in reading order (slow on the left, fast on the right).
pub fn chart_points(readings: &[Reading]) -> Vec<ChartPoint> {
    summarize(readings)
        .into_iter()
        .map(|s| ChartPoint {
            tolerance_range: (-s.tolerance, s.tolerance),
            ev_diff: s.ev_difference,
            before_ev_diff: s.before_ev_difference,
            expected_time: s.expected_time,
        })
        .collect()
}

/// Average cell text: `"—"`, `"1.0"`, or `"1.0 (3)"` when several samples
/// are shown in multi-measurement mode.
pub fn format_average_with_count(samples: &[f64], multiple_measurements: bool) -> String {
    match statistics::average(samples) {
        None => PLACEHOLDER.to_string(),
        Some(avg) if multiple_measurements && samples.len() > 1 => {
            format!("{:.1} ({})", avg, samples.len())
        }
        Some(avg) => format!("{:.1}", avg),
    }
}

pub fn format_optional(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => PLACEHOLDER.to_string(),
    }
}
