//! Summary statistics over measurement samples (milliseconds).
//!
//! Every function returns `None` when the set is too small to say anything,
//! so "no data" never collapses into a zero.

pub fn average(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let sum: f64 = samples.iter().sum();
    Some(sum / samples.len() as f64)
}

/// Sample standard deviation (n - 1 denominator). Needs at least two samples.
pub fn std_dev(samples: &[f64]) -> Option<f64> {
    if samples.len() < 2 {
        return None;
    }
    let avg = average(samples)?;
    let squared_diffs: f64 = samples.iter().map(|v| (v - avg).powi(2)).sum();
    let variance = squared_diffs / (samples.len() - 1) as f64;
    Some(variance.sqrt())
}

pub fn min(samples: &[f64]) -> Option<f64> {
    samples.iter().copied().reduce(f64::min)
}

pub fn max(samples: &[f64]) -> Option<f64> {
    samples.iter().copied().reduce(f64::max)
}

/// "min-max" with one decimal each, e.g. `[1.0, 1.05, 1.02]` → `"1.0-1.1"`.
pub fn format_range(samples: &[f64]) -> Option<String> {
    let (lo, hi) = (min(samples)?, max(samples)?);
    Some(format!("{:.1}-{:.1}", lo, hi))
}

/// The value shown and edited in single-measurement mode.
pub fn first_sample(samples: &[f64]) -> Option<f64> {
    samples.first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average() {
        assert_eq!(average(&[]), None);
        assert_eq!(average(&[2.0]), Some(2.0));
        assert_eq!(average(&[1.0, 2.0, 3.0]), Some(2.0));
    }

    #[test]
    fn test_average_of_zero_is_some() {
        assert_eq!(average(&[0.0, 0.0]), Some(0.0));
    }

    #[test]
    fn test_std_dev_needs_two_samples() {
        assert_eq!(std_dev(&[]), None);
        assert_eq!(std_dev(&[4.2]), None);
    }

    #[test]
    fn test_std_dev_constant_set_is_zero() {
        assert_eq!(std_dev(&[5.0, 5.0, 5.0]), Some(0.0));
    }

    #[test]
    fn test_std_dev_uses_sample_denominator() {
        // mean 5, squared diffs sum 32, / (8 - 1)
        let samples = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let sd = std_dev(&samples).unwrap();
        assert!((sd - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min(&[]), None);
        assert_eq!(max(&[]), None);
        assert_eq!(min(&[3.0, 1.5, 2.0]), Some(1.5));
        assert_eq!(max(&[3.0, 1.5, 2.0]), Some(3.0));
    }

    #[test]
    fn test_average_between_min_and_max() {
        let sets: [&[f64]; 4] = [
            &[1.0],
            &[1.0, 2.0, 4.5],
            &[868.63, 868.36, 865.06],
            &[0.98, 1.02, 1.05, 0.97],
        ];
        for set in sets {
            let avg = average(set).unwrap();
            assert!(min(set).unwrap() <= avg && avg <= max(set).unwrap(), "{:?}", set);
        }
    }

    #[test]
    fn test_format_range() {
        assert_eq!(format_range(&[]), None);
        assert_eq!(format_range(&[1.5]), Some("1.5-1.5".to_string()));
        assert_eq!(format_range(&[1.0, 1.05, 1.02]), Some("1.0-1.1".to_string()));
    }

    #[test]
    fn test_first_sample() {
        assert_eq!(first_sample(&[]), None);
        assert_eq!(first_sample(&[7.0, 1.0]), Some(7.0));
    }
}
