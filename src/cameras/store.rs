use crate::cameras::migrations::{migrate, migrate_readings, PersistedData};
use crate::cameras::model::{
    new_empty_camera, CameraUpdate, LiveDataMode, StoredCamera, StoredData, CURRENT_VERSION,
};
use crate::report::model::ImportedReport;
use crate::storage::StorageMedium;
use crate::util::{generate_camera_id, now_iso};

/// Key of the container record in the storage medium.
pub const STORAGE_KEY: &str = "cameraTestReport";

pub fn create_default_stored_data() -> StoredData {
    StoredData::with_single_camera(CURRENT_VERSION, new_empty_camera(None))
}

/// Load the container. Anything missing or broken yields a fresh default
/// container; the failure is logged, never returned.
pub fn load_data(storage: &dyn StorageMedium) -> StoredData {
    let raw = match storage.get_raw(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::info!("load_data: no stored container, starting fresh");
            return create_default_stored_data();
        }
        Err(e) => {
            tracing::warn!("load_data: storage read failed: {:#}", e);
            return create_default_stored_data();
        }
    };
    parse_stored_data(&raw).unwrap_or_else(|| {
        tracing::warn!("load_data: stored container is corrupt, starting fresh");
        create_default_stored_data()
    })
}

/// Parse and migrate raw container text. `None` when the text is not JSON,
/// lacks a numeric `version`, or `currentCameraId` does not name a camera.
pub fn parse_stored_data(raw: &str) -> Option<StoredData> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    if !has_valid_envelope(&value) {
        return None;
    }
    match serde_json::from_value::<PersistedData>(value) {
        Ok(persisted) => Some(migrate(persisted)),
        Err(e) => {
            tracing::warn!("parse_stored_data: unreadable camera entry: {}", e);
            None
        }
    }
}

fn has_valid_envelope(value: &serde_json::Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    if !obj.get("version").is_some_and(|v| v.is_number()) {
        return false;
    }
    let Some(current) = obj.get("currentCameraId").and_then(|v| v.as_str()) else {
        return false;
    };
    obj.get("cameras")
        .and_then(|v| v.as_object())
        .is_some_and(|cameras| cameras.contains_key(current))
}

pub fn save_data(storage: &mut dyn StorageMedium, data: &StoredData) -> anyhow::Result<()> {
    let text = serde_json::to_string(data)?;
    storage.set_raw(STORAGE_KEY, &text)
}

pub fn clear_data(storage: &mut dyn StorageMedium) -> anyhow::Result<()> {
    storage.remove_raw(STORAGE_KEY)
}

pub fn get_current_camera(data: &StoredData) -> Option<&StoredCamera> {
    data.cameras.get(&data.current_camera_id)
}

pub fn get_all_cameras(data: &StoredData) -> Vec<&StoredCamera> {
    data.cameras.values().collect()
}

/// Merge `update` into the current camera and stamp `updated_at`.
pub fn update_current_camera(mut data: StoredData, update: CameraUpdate) -> StoredData {
    if let Some(camera) = data.cameras.get_mut(&data.current_camera_id) {
        update.apply_to(camera);
        camera.updated_at = now_iso();
    }
    data
}

/// Insert a blank camera and make it current.
pub fn add_camera(mut data: StoredData, mode: Option<LiveDataMode>) -> StoredData {
    let camera = new_empty_camera(mode);
    tracing::info!("CAMERA_ADDED id={}", camera.id);
    data.current_camera_id = camera.id.clone();
    data.cameras.insert(camera.id.clone(), camera);
    data
}

/// Remove a camera. Deleting the only camera replaces it with a blank one;
/// deleting the current camera makes another one current.
pub fn delete_camera(mut data: StoredData, id: &str) -> StoredData {
    if !data.cameras.contains_key(id) {
        tracing::warn!("delete_camera: unknown id {}", id);
        return data;
    }
    if data.cameras.len() <= 1 {
        tracing::info!("CAMERA_DELETED id={} (last one, replaced)", id);
        return StoredData::with_single_camera(data.version, new_empty_camera(None));
    }
    data.cameras.remove(id);
    tracing::info!("CAMERA_DELETED id={}", id);
    if data.current_camera_id == id {
        if let Some(next) = data.cameras.keys().next() {
            data.current_camera_id = next.clone();
        }
    }
    data
}

/// Make `id` current; unknown ids leave the container unchanged.
pub fn switch_camera(mut data: StoredData, id: &str) -> StoredData {
    if data.cameras.contains_key(id) {
        data.current_camera_id = id.to_string();
    }
    data
}

/// Add an imported report as a new current camera with fresh id and timestamps.
pub fn import_camera(mut data: StoredData, report: ImportedReport) -> StoredData {
    let id = generate_camera_id();
    let now = now_iso();
    let camera = StoredCamera {
        id: id.clone(),
        metadata: report.metadata,
        readings: migrate_readings(report.readings),
        actions: report.actions,
        notes: report.notes,
        show_before_column: report.show_before_column.unwrap_or(false),
        show_multiple_measurements: report.show_multiple_measurements.unwrap_or(false),
        created_at: now.clone(),
        updated_at: now,
    };
    tracing::info!("CAMERA_IMPORTED id={} readings={}", id, camera.readings.len());
    data.current_camera_id = id.clone();
    data.cameras.insert(id, camera);
    data
}
