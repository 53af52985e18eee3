use crate::readings::ladder::default_readings;
use crate::readings::model::Reading;
use crate::util::{generate_camera_id, now_iso, today};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema version written into new containers.
pub const CURRENT_VERSION: u32 = 1;

/// Capture workflow a report was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiveDataMode {
    Reveni,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraMetadata {
    pub make: String,
    pub model: String,
    pub serial_number: String,
    pub customer_name: String,
    /// `YYYY-MM-DD`
    pub service_date: String,
    /// Only used to order reports serviced on the same day.
    pub created_timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_data_mode: Option<LiveDataMode>,
}

pub fn create_empty_camera_metadata() -> CameraMetadata {
    CameraMetadata {
        make: String::new(),
        model: String::new(),
        serial_number: String::new(),
        customer_name: String::new(),
        service_date: today(),
        created_timestamp: now_iso(),
        live_data_mode: None,
    }
}

/// One test session as persisted in the container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCamera {
    pub id: String,
    pub metadata: CameraMetadata,
    pub readings: Vec<Reading>,
    pub actions: Vec<String>,
    pub notes: String,
    pub show_before_column: bool,
    pub show_multiple_measurements: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl StoredCamera {
    /// Blank report: empty metadata, the standard ladder, modes off.
    pub fn empty(id: String, mode: Option<LiveDataMode>) -> Self {
        let now = now_iso();
        let mut metadata = create_empty_camera_metadata();
        metadata.live_data_mode = mode;
        Self {
            id,
            metadata,
            readings: default_readings(),
            actions: Vec::new(),
            notes: String::new(),
            show_before_column: false,
            show_multiple_measurements: false,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// The whole persisted container.
///
/// `cameras` is never empty and `current_camera_id` is always one of its keys;
/// every transform in `cameras::store` preserves both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredData {
    pub version: u32,
    pub current_camera_id: String,
    pub cameras: BTreeMap<String, StoredCamera>,
}

impl StoredData {
    /// A container holding one fresh camera.
    pub fn with_single_camera(version: u32, camera: StoredCamera) -> Self {
        let id = camera.id.clone();
        Self {
            version,
            current_camera_id: id.clone(),
            cameras: BTreeMap::from([(id, camera)]),
        }
    }
}

pub fn new_empty_camera(mode: Option<LiveDataMode>) -> StoredCamera {
    StoredCamera::empty(generate_camera_id(), mode)
}

/// Partial update of the current camera; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraUpdate {
    #[serde(default)]
    pub metadata: Option<CameraMetadata>,
    #[serde(default)]
    pub readings: Option<Vec<Reading>>,
    #[serde(default)]
    pub actions: Option<Vec<String>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub show_before_column: Option<bool>,
    #[serde(default)]
    pub show_multiple_measurements: Option<bool>,
}

impl CameraUpdate {
    pub fn apply_to(self, camera: &mut StoredCamera) {
        if let Some(metadata) = self.metadata {
            camera.metadata = metadata;
        }
        if let Some(readings) = self.readings {
            camera.readings = readings;
        }
        if let Some(actions) = self.actions {
            camera.actions = actions;
        }
        if let Some(notes) = self.notes {
            camera.notes = notes;
        }
        if let Some(flag) = self.show_before_column {
            camera.show_before_column = flag;
        }
        if let Some(flag) = self.show_multiple_measurements {
            camera.show_multiple_measurements = flag;
        }
    }
}
