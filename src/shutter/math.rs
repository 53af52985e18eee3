use serde::{Deserialize, Serialize};

/// The standard test ladder, ordered from slow to fast.
pub const STANDARD_SHUTTER_SPEEDS: [&str; 11] = [
    "1", "1/2", "1/4", "1/8", "1/15", "1/30", "1/60", "1/125", "1/250", "1/500", "1/1000",
];

/// Nominal speeds at or slower than this (1/125) use the tight tolerance band.
const SLOW_BAND_MIN_MS: f64 = 8.0;
const SLOW_BAND_TOLERANCE_EV: f64 = 0.25;
const FAST_BAND_TOLERANCE_EV: f64 = 0.333;

const GOOD_EV_LIMIT: f64 = 0.25;
const MARGINAL_EV_LIMIT: f64 = 0.5;

/// Convert a nominal speed ("1/1000", "1", "2.5") to milliseconds.
///
/// No bounds checking: malformed text yields `NaN` so that bad input stays
/// visible to the caller instead of turning into a plausible number.
pub fn fraction_to_ms(expr: &str) -> f64 {
    let expr = expr.trim();
    if expr.contains('/') {
        let mut parts = expr.split('/');
        let (Some(numerator), Some(denominator), None) = (parts.next(), parts.next(), parts.next())
        else {
            return f64::NAN;
        };
        return (parse_number(numerator) / parse_number(denominator)) * 1000.0;
    }
    parse_number(expr) * 1000.0
}

fn parse_number(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Display form of a duration: whole or one-decimal seconds from 1000ms up,
/// `1/<n>` below. Lossy; never used for storage.
pub fn ms_to_fraction(ms: f64) -> String {
    if ms >= 1000.0 {
        let seconds = ms / 1000.0;
        return if seconds == seconds.floor() {
            format!("{}", seconds)
        } else {
            format!("{:.1}", seconds)
        };
    }
    let denominator = (1000.0 / ms).round();
    format!("1/{}", denominator)
}

/// EV deviation of a measured time from its nominal time.
///
/// Positive means the shutter stayed open longer than nominal (overexposure),
/// negative means it closed early (underexposure).
pub fn calculate_ev_difference(expected_ms: f64, actual_ms: f64) -> f64 {
    if expected_ms == actual_ms {
        return 0.0;
    }
    (actual_ms / expected_ms).log2()
}

/// Allowed EV deviation (±) for a nominal speed.
pub fn tolerance_for_speed(expected_time: &str) -> f64 {
    if fraction_to_ms(expected_time) >= SLOW_BAND_MIN_MS {
        SLOW_BAND_TOLERANCE_EV
    } else {
        FAST_BAND_TOLERANCE_EV
    }
}

/// Color class of an EV deviation. Independent of the speed-aware tolerance band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvRating {
    Good,
    Marginal,
    Bad,
}

impl EvRating {
    pub fn from_ev(ev: f64) -> Self {
        let abs = ev.abs();
        if abs < GOOD_EV_LIMIT {
            EvRating::Good
        } else if abs < MARGINAL_EV_LIMIT {
            EvRating::Marginal
        } else {
            EvRating::Bad
        }
    }
}

/// "+0.12" / "-1.00"; zero carries a plus sign.
pub fn format_ev(ev: f64) -> String {
    let sign = if ev >= 0.0 { "+" } else { "" };
    format!("{}{:.2}", sign, ev)
}
