//! Every on-disk shape the container has had, and the one-way upgrade to the
//! current model.
//!
//! Readings went from a single nullable `measuredMs`, to nullable
//! `beforeMs`/`measuredMs`, to the `beforeSamples`/`measurementSamples`
//! arrays. Cameras gained `actions`, `notes`, the two mode flags and
//! `metadata.createdTimestamp` along the way. The persisted types below accept
//! all of those; `migrate` turns them into `StoredData` by adding defaults only.
//! Nothing past this module ever sees a legacy shape.

use crate::cameras::model::{
    CameraMetadata, LiveDataMode, StoredCamera, StoredData, CURRENT_VERSION,
};
use crate::readings::ladder::default_readings;
use crate::readings::model::Reading;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Explicit `null` reads as the default, like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A mode this build does not know reads as no mode.
fn known_live_data_mode<'de, D>(deserializer: D) -> Result<Option<LiveDataMode>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Any JSON number. Whole non-negative values (`1`, `1.0`) are kept; anything
/// else reads as the current version.
fn lenient_version<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    let whole = number.as_u64().or_else(|| {
        number
            .as_f64()
            .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
            .map(|v| v as u64)
    });
    Ok(whole
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or_else(|| {
            tracing::debug!("migrate: unusable version {}, reading as {}", number, CURRENT_VERSION);
            CURRENT_VERSION
        }))
}

/// A reading as found on disk or in an imported file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadingRecord {
    Current(Reading),
    Legacy(LegacyReading),
}

/// Scalar-era reading. The array fields appear on half-migrated records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyReading {
    pub id: String,
    pub expected_time: String,
    #[serde(default)]
    pub before_ms: Option<f64>,
    #[serde(default)]
    pub measured_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_samples: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_samples: Option<Vec<f64>>,
}

impl ReadingRecord {
    /// Current shape; array records pass through untouched.
    pub fn into_current(self) -> Reading {
        match self {
            ReadingRecord::Current(reading) => reading,
            ReadingRecord::Legacy(legacy) => Reading {
                before_samples: legacy
                    .before_samples
                    .unwrap_or_else(|| legacy.before_ms.into_iter().collect()),
                measurement_samples: legacy
                    .measurement_samples
                    .unwrap_or_else(|| legacy.measured_ms.into_iter().collect()),
                id: legacy.id,
                expected_time: legacy.expected_time,
            },
        }
    }
}

pub fn migrate_readings(records: Vec<ReadingRecord>) -> Vec<Reading> {
    records.into_iter().map(ReadingRecord::into_current).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub make: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub serial_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_date: String,
    #[serde(default)]
    pub created_timestamp: Option<String>,
    #[serde(
        default,
        deserialize_with = "known_live_data_mode",
        skip_serializing_if = "Option::is_none"
    )]
    pub live_data_mode: Option<LiveDataMode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedCamera {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    pub metadata: PersistedMetadata,
    #[serde(default)]
    pub readings: Option<Vec<ReadingRecord>>,
    #[serde(default)]
    pub actions: Option<Vec<String>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub show_before_column: Option<bool>,
    #[serde(default)]
    pub show_multiple_measurements: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedData {
    #[serde(deserialize_with = "lenient_version")]
    pub version: u32,
    pub current_camera_id: String,
    pub cameras: BTreeMap<String, PersistedCamera>,
}

/// Upgrade a parsed container to the current model. Never fails, never drops
/// data, and is idempotent.
pub fn migrate(data: PersistedData) -> StoredData {
    let cameras = data
        .cameras
        .into_iter()
        .map(|(key, camera)| {
            let camera = migrate_camera(&key, camera);
            (key, camera)
        })
        .collect();
    StoredData {
        version: data.version,
        current_camera_id: data.current_camera_id,
        cameras,
    }
}

fn migrate_camera(key: &str, camera: PersistedCamera) -> StoredCamera {
    let created_timestamp = camera
        .metadata
        .created_timestamp
        .filter(|ts| !ts.is_empty())
        .unwrap_or_else(|| {
            tracing::debug!("migrate: camera {} gets createdTimestamp from createdAt", key);
            camera.created_at.clone()
        });
    let readings = match camera.readings {
        Some(records) => migrate_readings(records),
        None => {
            tracing::debug!("migrate: camera {} has no readings, using defaults", key);
            default_readings()
        }
    };
    StoredCamera {
        id: if camera.id.is_empty() {
            key.to_string()
        } else {
            camera.id
        },
        metadata: CameraMetadata {
            make: camera.metadata.make,
            model: camera.metadata.model,
            serial_number: camera.metadata.serial_number,
            customer_name: camera.metadata.customer_name,
            service_date: camera.metadata.service_date,
            created_timestamp,
            live_data_mode: camera.metadata.live_data_mode,
        },
        readings,
        actions: camera.actions.unwrap_or_default(),
        notes: camera.notes.unwrap_or_default(),
        show_before_column: camera.show_before_column.unwrap_or(false),
        show_multiple_measurements: camera.show_multiple_measurements.unwrap_or(false),
        updated_at: camera
            .updated_at
            .unwrap_or_else(|| camera.created_at.clone()),
        created_at: camera.created_at,
    }
}

impl From<StoredCamera> for PersistedCamera {
    fn from(camera: StoredCamera) -> Self {
        Self {
            id: camera.id,
            metadata: PersistedMetadata {
                make: camera.metadata.make,
                model: camera.metadata.model,
                serial_number: camera.metadata.serial_number,
                customer_name: camera.metadata.customer_name,
                service_date: camera.metadata.service_date,
                created_timestamp: Some(camera.metadata.created_timestamp),
                live_data_mode: camera.metadata.live_data_mode,
            },
            readings: Some(
                camera
                    .readings
                    .into_iter()
                    .map(ReadingRecord::Current)
                    .collect(),
            ),
            actions: Some(camera.actions),
            notes: Some(camera.notes),
            show_before_column: Some(camera.show_before_column),
            show_multiple_measurements: Some(camera.show_multiple_measurements),
            created_at: camera.created_at,
            updated_at: Some(camera.updated_at),
        }
    }
}

impl From<StoredData> for PersistedData {
    fn from(data: StoredData) -> Self {
        Self {
            version: data.version,
            current_camera_id: data.current_camera_id,
            cameras: data
                .cameras
                .into_iter()
                .map(|(key, camera)| (key, camera.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn legacy_container() -> PersistedData {
        serde_json::from_value(json!({
            "version": 1,
            "currentCameraId": "camera-1",
            "cameras": {
                "camera-1": {
                    "id": "camera-1",
                    "metadata": {
                        "make": "Nikon",
                        "model": "FM2",
                        "serialNumber": "N123",
                        "customerName": "",
                        "serviceDate": "2023-05-01"
                    },
                    "readings": [
                        { "id": "reading-0", "expectedTime": "1/1000", "beforeMs": 1.05, "measuredMs": null },
                        { "id": "reading-1", "expectedTime": "1/500", "measuredMs": 2.1 },
                        { "id": "reading-2", "expectedTime": "1/250",
                          "beforeSamples": [4.1, 4.2], "measurementSamples": [] }
                    ],
                    "createdAt": "2023-05-01T09:00:00.000Z",
                    "updatedAt": "2023-05-01T10:00:00.000Z"
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_legacy_reading_to_arrays() {
        let data = migrate(legacy_container());
        let camera = &data.cameras["camera-1"];
        assert_eq!(camera.readings[0].before_samples, vec![1.05]);
        assert!(camera.readings[0].measurement_samples.is_empty());
        assert!(camera.readings[1].before_samples.is_empty());
        assert_eq!(camera.readings[1].measurement_samples, vec![2.1]);
        assert_eq!(camera.readings[2].before_samples, vec![4.1, 4.2]);
    }

    #[test]
    fn test_missing_fields_backfilled() {
        let data = migrate(legacy_container());
        let camera = &data.cameras["camera-1"];
        assert!(camera.actions.is_empty());
        assert_eq!(camera.notes, "");
        assert!(!camera.show_before_column);
        assert!(!camera.show_multiple_measurements);
        assert_eq!(camera.metadata.created_timestamp, "2023-05-01T09:00:00.000Z");
        assert_eq!(camera.metadata.make, "Nikon");
        assert_eq!(camera.updated_at, "2023-05-01T10:00:00.000Z");
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let once = migrate(legacy_container());
        let twice = migrate(PersistedData::from(once.clone()));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_migrate_survives_json_round_trip() {
        let once = migrate(legacy_container());
        let text = serde_json::to_string(&once).unwrap();
        let reparsed: PersistedData = serde_json::from_str(&text).unwrap();
        assert_eq!(migrate(reparsed), once);
    }

    #[test]
    fn test_existing_values_are_kept() {
        let mut raw = legacy_container();
        let camera = raw.cameras.get_mut("camera-1").unwrap();
        camera.actions = Some(vec!["Cleaned shutter".to_string()]);
        camera.notes = Some("sticky at 1s".to_string());
        camera.show_before_column = Some(true);
        camera.metadata.created_timestamp = Some("2023-05-01T09:30:00.000Z".to_string());

        let data = migrate(raw);
        let camera = &data.cameras["camera-1"];
        assert_eq!(camera.actions, vec!["Cleaned shutter"]);
        assert_eq!(camera.notes, "sticky at 1s");
        assert!(camera.show_before_column);
        assert_eq!(camera.metadata.created_timestamp, "2023-05-01T09:30:00.000Z");
    }

    #[test]
    fn test_single_legacy_reading_record() {
        let record: ReadingRecord = serde_json::from_value(json!({
            "id": "r", "expectedTime": "1/60", "beforeMs": 1.05, "measuredMs": null
        }))
        .unwrap();
        assert!(matches!(record, ReadingRecord::Legacy(_)));
        let reading = record.into_current();
        assert_eq!(reading.before_samples, vec![1.05]);
        assert!(reading.measurement_samples.is_empty());

        let again = ReadingRecord::Current(reading.clone()).into_current();
        assert_eq!(again, reading);
    }

    #[test]
    fn test_current_reading_record_passes_through() {
        let record: ReadingRecord = serde_json::from_value(json!({
            "id": "r", "expectedTime": "1/60",
            "beforeSamples": [16.0], "measurementSamples": [16.5, 16.7]
        }))
        .unwrap();
        assert!(matches!(record, ReadingRecord::Current(_)));
    }

    #[test]
    fn test_version_read_leniently() {
        for (raw, expected) in [("1", 1), ("1.0", 1), ("2", 2), ("1.5", CURRENT_VERSION), ("-3", CURRENT_VERSION)] {
            let text = format!(
                r#"{{"version":{},"currentCameraId":"a","cameras":{{}}}}"#,
                raw
            );
            let parsed: PersistedData = serde_json::from_str(&text).unwrap();
            assert_eq!(parsed.version, expected, "version {}", raw);
        }
    }

    #[test]
    fn test_camera_without_readings_gets_ladder() {
        let mut raw = legacy_container();
        raw.cameras.get_mut("camera-1").unwrap().readings = None;
        let data = migrate(raw);
        assert_eq!(data.cameras["camera-1"].readings.len(), 11);
    }
}
