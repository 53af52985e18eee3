use crate::readings::model::{Reading, SampleColumn};
use crate::shutter::math::{fraction_to_ms, STANDARD_SHUTTER_SPEEDS};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReadingError {
    #[error("shutter speed is empty")]
    EmptySpeed,
    #[error("not a shutter speed: {0}")]
    UnparsableSpeed(String),
    #[error("shutter speed {0} already exists")]
    DuplicateSpeed(String),
    #[error("reading not found: {0}")]
    NotFound(String),
    #[error("cannot remove the last remaining reading")]
    LastReading,
    #[error("reading {0} has samples; confirm before removing it")]
    ConfirmationRequired(String),
}

/// The eleven standard speeds, slow to fast, with positional ids and no samples.
pub fn default_readings() -> Vec<Reading> {
    STANDARD_SHUTTER_SPEEDS
        .iter()
        .enumerate()
        .map(|(index, speed)| Reading::new(format!("reading-{}", index), *speed))
        .collect()
}

/// Insert a custom speed at its slow-to-fast position.
///
/// The text is kept verbatim (trimmed) when it reads as a fraction or as bare
/// seconds. Duplicates are matched on the exact `expected_time` string.
pub fn add_speed(readings: &[Reading], input: &str) -> Result<Vec<Reading>, ReadingError> {
    let speed = input.trim();
    if speed.is_empty() {
        return Err(ReadingError::EmptySpeed);
    }
    let new_ms = fraction_to_ms(speed);
    if !new_ms.is_finite() || new_ms <= 0.0 {
        tracing::warn!("add_speed: rejected {:?}", speed);
        return Err(ReadingError::UnparsableSpeed(speed.to_string()));
    }
    if readings.iter().any(|r| r.expected_time == speed) {
        return Err(ReadingError::DuplicateSpeed(speed.to_string()));
    }

    let existing_ids: Vec<&str> = readings.iter().map(|r| r.id.as_str()).collect();
    let id = unique_reading_id(
        format!("reading-custom-{}", chrono::Utc::now().timestamp_millis()),
        &existing_ids,
    );
    let reading = Reading::new(id, speed);

    // First reading that is faster than the new one; NaN nominals never match.
    let insert_at = readings
        .iter()
        .position(|r| fraction_to_ms(&r.expected_time) < new_ms)
        .unwrap_or(readings.len());

    let mut next = readings.to_vec();
    next.insert(insert_at, reading);
    Ok(next)
}

fn unique_reading_id(base: String, existing: &[&str]) -> String {
    if !existing.contains(&base.as_str()) {
        return base;
    }
    let mut counter: u32 = 2;
    loop {
        let candidate = format!("{}-{}", base, counter);
        if !existing.contains(&candidate.as_str()) {
            return candidate;
        }
        counter += 1;
    }
}

/// Whether `remove_speed` is allowed at all (ignores the confirmation step).
pub fn can_remove_speed(readings: &[Reading], id: &str) -> bool {
    readings.len() > 1 && readings.iter().any(|r| r.id == id)
}

/// Remove a speed. A reading holding samples is only removed with `confirmed`.
pub fn remove_speed(
    readings: &[Reading],
    id: &str,
    confirmed: bool,
) -> Result<Vec<Reading>, ReadingError> {
    let reading = readings
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| ReadingError::NotFound(id.to_string()))?;
    if readings.len() <= 1 {
        return Err(ReadingError::LastReading);
    }
    if reading.has_data() && !confirmed {
        return Err(ReadingError::ConfirmationRequired(
            reading.expected_time.clone(),
        ));
    }
    Ok(readings.iter().filter(|r| r.id != id).cloned().collect())
}

/// Multi-sample mode: append one value to a column.
pub fn append_sample(
    readings: &[Reading],
    id: &str,
    column: SampleColumn,
    value: f64,
) -> Vec<Reading> {
    map_reading(readings, id, |r| r.samples_mut(column).push(value))
}

/// Single-value mode: the column becomes `[value]`, or empty when cleared.
pub fn set_single_sample(
    readings: &[Reading],
    id: &str,
    column: SampleColumn,
    value: Option<f64>,
) -> Vec<Reading> {
    map_reading(readings, id, |r| {
        *r.samples_mut(column) = value.into_iter().collect();
    })
}

/// Remove the sample at `index`; an out-of-range index leaves the column alone.
pub fn delete_sample(
    readings: &[Reading],
    id: &str,
    column: SampleColumn,
    index: usize,
) -> Vec<Reading> {
    map_reading(readings, id, |r| {
        let samples = r.samples_mut(column);
        if index < samples.len() {
            samples.remove(index);
        }
    })
}

fn map_reading(readings: &[Reading], id: &str, f: impl Fn(&mut Reading)) -> Vec<Reading> {
    readings
        .iter()
        .cloned()
        .map(|mut r| {
            if r.id == id {
                f(&mut r);
            }
            r
        })
        .collect()
}

/// Text typed into a sample field. Anything but a finite positive number is "no value".
pub fn parse_sample_input(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}
