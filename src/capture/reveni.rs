//! Text output of the Reveni shutter tester.
//!
//! The tester emits one line per shot with three tab-separated readings
//! (left/top, center, right/bottom), e.g. `"868.63\t868.36\t865.06"`.
//! Only the center reading is kept.

use crate::readings::model::{Reading, SampleColumn};

pub fn parse_line(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let fields: Vec<&str> = trimmed.split('\t').collect();
    if fields.len() != 3 {
        return None;
    }
    fields[1]
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Column the next captured value belongs to.
///
/// With before/after mode on the target is "before" until every reading has
/// before-samples and each reading's before and measurement counts match.
/// An all-empty set counts as unfinished.
pub fn determine_target_column(readings: &[Reading], before_after: bool) -> SampleColumn {
    if !before_after {
        return SampleColumn::Measurement;
    }
    let all_have_before = readings.iter().all(|r| !r.before_samples.is_empty());
    let all_equal = readings
        .iter()
        .all(|r| r.before_samples.len() == r.measurement_samples.len());
    if all_have_before && all_equal {
        SampleColumn::Measurement
    } else {
        SampleColumn::Before
    }
}
