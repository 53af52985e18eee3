//! Host-agnostic entry points over `AppState`: plain functions taking their
//! arguments and the state, callable from a desktop shell, a CLI or tests.
//! Each mutating call applies one store transform to the committed container,
//! writes the whole result to the storage medium, and only then commits it.
//! Errors are stringified at this boundary.

use crate::capture::live::LiveCapture;
use crate::cameras::actions;
use crate::cameras::model::{CameraUpdate, LiveDataMode, StoredCamera, StoredData};
use crate::cameras::sort::{camera_display_name, sorted_cameras};
use crate::cameras::store;
use crate::readings::analysis::{summarize, ReadingSummary};
use crate::readings::ladder;
use crate::readings::model::{Reading, SampleColumn};
use crate::report::export::write_report_json;
use crate::report::import::parse_report;
use crate::state::AppState;
use serde::Serialize;

/// Sidebar entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraListItem {
    pub id: String,
    pub display_name: String,
    pub service_date: String,
    pub customer_name: String,
    pub is_current: bool,
}

fn current_of(data: &StoredData) -> Result<StoredCamera, String> {
    store::get_current_camera(data)
        .cloned()
        .ok_or_else(|| format!("current camera {} is missing", data.current_camera_id))
}

// Lock order: storage first, then data
fn commit<T>(
    state: &AppState,
    transform: impl FnOnce(StoredData) -> Result<(StoredData, T), String>,
) -> Result<T, String> {
    let mut storage = state
        .storage
        .lock()
        .map_err(|_| "state lock poisoned".to_string())?;
    let mut data = state
        .data
        .lock()
        .map_err(|_| "state lock poisoned".to_string())?;
    let (next, out) = transform(data.clone())?;
    store::save_data(&mut **storage, &next).map_err(|e| format!("{:#}", e))?;
    *data = next;
    Ok(out)
}

/// Commit a transform and hand back the resulting current camera.
fn commit_current(
    state: &AppState,
    transform: impl FnOnce(StoredData) -> Result<StoredData, String>,
) -> Result<StoredCamera, String> {
    commit(state, |data| {
        let next = transform(data)?;
        let current = current_of(&next)?;
        Ok((next, current))
    })
}

fn snapshot(state: &AppState) -> Result<StoredData, String> {
    let data = state
        .data
        .lock()
        .map_err(|_| "state lock poisoned".to_string())?;
    Ok(data.clone())
}

pub fn get_current_camera(state: &AppState) -> Result<StoredCamera, String> {
    current_of(&snapshot(state)?)
}

pub fn list_cameras(state: &AppState) -> Result<Vec<CameraListItem>, String> {
    let data = snapshot(state)?;
    let items: Vec<CameraListItem> = sorted_cameras(&data)
        .into_iter()
        .map(|camera| CameraListItem {
            id: camera.id.clone(),
            display_name: camera_display_name(camera),
            service_date: camera.metadata.service_date.clone(),
            customer_name: camera.metadata.customer_name.clone(),
            is_current: camera.id == data.current_camera_id,
        })
        .collect();
    tracing::info!("list_cameras: returning {} cameras", items.len());
    Ok(items)
}

pub fn add_camera(mode: Option<LiveDataMode>, state: &AppState) -> Result<StoredCamera, String> {
    commit_current(state, |data| Ok(store::add_camera(data, mode)))
}

/// Callers confirm with the user before invoking this.
pub fn delete_camera(id: String, state: &AppState) -> Result<StoredCamera, String> {
    commit_current(state, |data| Ok(store::delete_camera(data, &id)))
}

pub fn switch_camera(id: String, state: &AppState) -> Result<StoredCamera, String> {
    commit_current(state, |data| {
        if !data.cameras.contains_key(&id) {
            tracing::warn!("switch_camera: unknown id {}", id);
        }
        Ok(store::switch_camera(data, &id))
    })
}

pub fn update_current_camera(
    update: CameraUpdate,
    state: &AppState,
) -> Result<StoredCamera, String> {
    commit_current(state, |data| Ok(store::update_current_camera(data, update)))
}

/// Apply a readings edit to the current camera.
fn edit_readings(
    state: &AppState,
    edit: impl FnOnce(&StoredCamera) -> Result<Vec<Reading>, String>,
) -> Result<StoredCamera, String> {
    commit_current(state, |data| {
        let readings = edit(&current_of(&data)?)?;
        Ok(store::update_current_camera(
            data,
            CameraUpdate {
                readings: Some(readings),
                ..CameraUpdate::default()
            },
        ))
    })
}

pub fn add_speed(speed: String, state: &AppState) -> Result<StoredCamera, String> {
    edit_readings(state, |camera| {
        ladder::add_speed(&camera.readings, &speed).map_err(|e| e.to_string())
    })
}

pub fn remove_speed(
    reading_id: String,
    confirmed: bool,
    state: &AppState,
) -> Result<StoredCamera, String> {
    edit_readings(state, |camera| {
        ladder::remove_speed(&camera.readings, &reading_id, confirmed).map_err(|e| e.to_string())
    })
}

/// Record typed sample text. Multi-measurement mode appends; otherwise the
/// column is replaced, and blank text clears it.
pub fn record_sample(
    reading_id: String,
    column: SampleColumn,
    text: String,
    state: &AppState,
) -> Result<StoredCamera, String> {
    edit_readings(state, |camera| {
        let value = ladder::parse_sample_input(&text);
        if camera.show_multiple_measurements {
            let value = value.ok_or_else(|| format!("not a positive number: {:?}", text))?;
            Ok(ladder::append_sample(&camera.readings, &reading_id, column, value))
        } else {
            if value.is_none() && !text.trim().is_empty() {
                return Err(format!("not a positive number: {:?}", text));
            }
            Ok(ladder::set_single_sample(
                &camera.readings,
                &reading_id,
                column,
                value,
            ))
        }
    })
}

pub fn delete_sample(
    reading_id: String,
    column: SampleColumn,
    index: usize,
    state: &AppState,
) -> Result<StoredCamera, String> {
    edit_readings(state, |camera| {
        Ok(ladder::delete_sample(&camera.readings, &reading_id, column, index))
    })
}

pub fn add_action(text: String, state: &AppState) -> Result<StoredCamera, String> {
    commit_current(state, |data| {
        let current = current_of(&data)?;
        let next = actions::add_action(&current.actions, &text)
            .ok_or_else(|| "action is empty".to_string())?;
        Ok(store::update_current_camera(
            data,
            CameraUpdate {
                actions: Some(next),
                ..CameraUpdate::default()
            },
        ))
    })
}

pub fn remove_action(index: usize, state: &AppState) -> Result<StoredCamera, String> {
    commit_current(state, |data| {
        let next = actions::remove_action(&current_of(&data)?.actions, index);
        Ok(store::update_current_camera(
            data,
            CameraUpdate {
                actions: Some(next),
                ..CameraUpdate::default()
            },
        ))
    })
}

/// Feed one instrument line through the live capture state. `Ok(None)` when
/// the line was not a tester line or no speed is selected.
pub fn record_live_line(
    line: String,
    capture: &LiveCapture,
    state: &AppState,
) -> Result<Option<StoredCamera>, String> {
    commit(state, |data| {
        let camera = current_of(&data)?;
        match capture.accept_line(&camera.readings, &line, camera.show_before_column) {
            Some(readings) => {
                let next = store::update_current_camera(
                    data,
                    CameraUpdate {
                        readings: Some(readings),
                        ..CameraUpdate::default()
                    },
                );
                let current = current_of(&next)?;
                Ok((next, Some(current)))
            }
            None => Ok((data, None)),
        }
    })
}

pub fn reading_summaries(state: &AppState) -> Result<Vec<ReadingSummary>, String> {
    Ok(summarize(&get_current_camera(state)?.readings))
}

/// Import a report file's text as a new current camera. Invalid input leaves
/// the store untouched.
pub fn import_report(text: String, state: &AppState) -> Result<StoredCamera, String> {
    let report = parse_report(&text).map_err(|e| {
        tracing::warn!("import_report: {}", e);
        e.to_string()
    })?;
    commit_current(state, |data| Ok(store::import_camera(data, report)))
}

/// Write the current camera's report JSON into the export dir; returns the path.
pub fn export_report(state: &AppState) -> Result<String, String> {
    let camera = get_current_camera(state)?;
    let path = write_report_json(&state.export_dir, &camera).map_err(|e| format!("{:#}", e))?;
    Ok(path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStorage;
    use crate::storage::StorageMedium;
    use tempfile::TempDir;

    /// Medium whose writes always fail.
    struct ReadOnlyStorage;

    impl StorageMedium for ReadOnlyStorage {
        fn get_raw(&self, _key: &str) -> anyhow::Result<Option<String>> {
            Ok(None)
        }
        fn set_raw(&mut self, _key: &str, _value: &str) -> anyhow::Result<()> {
            anyhow::bail!("medium is read-only")
        }
        fn remove_raw(&mut self, _key: &str) -> anyhow::Result<()> {
            anyhow::bail!("medium is read-only")
        }
    }

    fn memory_state(tmp: &TempDir) -> AppState {
        AppState::open(Box::new(MemoryStorage::default()), tmp.path().join("exports"))
    }

    fn stored(state: &AppState) -> Option<String> {
        state
            .storage
            .lock()
            .unwrap()
            .get_raw(store::STORAGE_KEY)
            .unwrap()
    }

    #[test]
    fn test_mutation_is_written_before_commit() {
        let tmp = TempDir::new().unwrap();
        let state = memory_state(&tmp);
        assert!(stored(&state).is_none());
        let camera = add_speed("1/4000".to_string(), &state).unwrap();
        assert_eq!(camera.readings.last().unwrap().expected_time, "1/4000");
        let raw = stored(&state).expect("container written");
        let reloaded = store::parse_stored_data(&raw).unwrap();
        assert_eq!(reloaded, *state.data.lock().unwrap());
    }

    #[test]
    fn test_failed_save_leaves_committed_state() {
        let tmp = TempDir::new().unwrap();
        let state = AppState::open(Box::new(ReadOnlyStorage), tmp.path().join("exports"));
        let before = state.data.lock().unwrap().clone();
        let err = add_camera(None, &state).unwrap_err();
        assert!(err.contains("read-only"));
        assert_eq!(*state.data.lock().unwrap(), before);
    }

    #[test]
    fn test_add_speed_rejects_duplicates() {
        let tmp = TempDir::new().unwrap();
        let state = memory_state(&tmp);
        let err = add_speed("1/125".to_string(), &state).unwrap_err();
        assert!(err.contains("1/125"));
        assert!(stored(&state).is_none());
    }

    #[test]
    fn test_remove_speed_needs_confirmation_when_data_present() {
        let tmp = TempDir::new().unwrap();
        let state = memory_state(&tmp);
        let id = get_current_camera(&state).unwrap().readings[0].id.clone();
        record_sample(id.clone(), SampleColumn::Measurement, "980".into(), &state).unwrap();
        assert!(remove_speed(id.clone(), false, &state).is_err());
        let camera = remove_speed(id.clone(), true, &state).unwrap();
        assert!(camera.readings.iter().all(|r| r.id != id));
    }

    #[test]
    fn test_record_sample_single_and_multiple_modes() {
        let tmp = TempDir::new().unwrap();
        let state = memory_state(&tmp);
        let id = get_current_camera(&state).unwrap().readings[3].id.clone();

        record_sample(id.clone(), SampleColumn::Measurement, "8.1".into(), &state).unwrap();
        let camera =
            record_sample(id.clone(), SampleColumn::Measurement, "8.3".into(), &state).unwrap();
        assert_eq!(camera.readings[3].measurement_samples, vec![8.3]);

        let camera = record_sample(id.clone(), SampleColumn::Measurement, " ".into(), &state)
            .unwrap();
        assert!(camera.readings[3].measurement_samples.is_empty());
        assert!(record_sample(id.clone(), SampleColumn::Measurement, "abc".into(), &state).is_err());

        update_current_camera(
            CameraUpdate {
                show_multiple_measurements: Some(true),
                ..CameraUpdate::default()
            },
            &state,
        )
        .unwrap();
        record_sample(id.clone(), SampleColumn::Before, "7.9".into(), &state).unwrap();
        let camera = record_sample(id.clone(), SampleColumn::Before, "8.0".into(), &state).unwrap();
        assert_eq!(camera.readings[3].before_samples, vec![7.9, 8.0]);

        let camera = delete_sample(id, SampleColumn::Before, 0, &state).unwrap();
        assert_eq!(camera.readings[3].before_samples, vec![8.0]);
    }

    #[test]
    fn test_record_sample_rejects_non_positive() {
        let tmp = TempDir::new().unwrap();
        let state = memory_state(&tmp);
        let id = get_current_camera(&state).unwrap().readings[0].id.clone();
        assert!(record_sample(id.clone(), SampleColumn::Measurement, "0".into(), &state).is_err());
        assert!(record_sample(id, SampleColumn::Measurement, "-5".into(), &state).is_err());
        assert!(stored(&state).is_none());
    }

    #[test]
    fn test_add_and_remove_actions() {
        let tmp = TempDir::new().unwrap();
        let state = memory_state(&tmp);
        add_action(" Cleaned curtains ".into(), &state).unwrap();
        let camera = add_action("Adjusted tension".into(), &state).unwrap();
        assert_eq!(camera.actions, vec!["Cleaned curtains", "Adjusted tension"]);

        assert!(add_action("   ".into(), &state).is_err());
        let camera = remove_action(5, &state).unwrap();
        assert_eq!(camera.actions.len(), 2);
        let camera = remove_action(0, &state).unwrap();
        assert_eq!(camera.actions, vec!["Adjusted tension"]);
        let reloaded = store::parse_stored_data(&stored(&state).unwrap()).unwrap();
        assert_eq!(store::get_current_camera(&reloaded).unwrap().actions, camera.actions);
    }

    #[test]
    fn test_record_live_line() {
        let tmp = TempDir::new().unwrap();
        let state = memory_state(&tmp);
        let first = get_current_camera(&state).unwrap().readings[0].id.clone();
        let mut capture = LiveCapture::new();

        assert!(record_live_line("1\t2\t3".into(), &capture, &state)
            .unwrap()
            .is_none());

        capture.select(first);
        assert!(record_live_line("garbage".into(), &capture, &state)
            .unwrap()
            .is_none());
        let camera = record_live_line("1\t1002.5\t2".into(), &capture, &state)
            .unwrap()
            .expect("line accepted");
        assert_eq!(camera.readings[0].measurement_samples, vec![1002.5]);
    }

    #[test]
    fn test_list_cameras_marks_current() {
        let tmp = TempDir::new().unwrap();
        let state = memory_state(&tmp);
        let added = add_camera(Some(LiveDataMode::Reveni), &state).unwrap();
        let items = list_cameras(&state).unwrap();
        assert_eq!(items.len(), 2);
        let current: Vec<_> = items.iter().filter(|item| item.is_current).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].id, added.id);
        assert_eq!(current[0].display_name, "Untitled Report");
    }

    #[test]
    fn test_switch_and_delete_camera() {
        let tmp = TempDir::new().unwrap();
        let state = memory_state(&tmp);
        let original = get_current_camera(&state).unwrap().id;
        let added = add_camera(None, &state).unwrap();

        let current = switch_camera(original.clone(), &state).unwrap();
        assert_eq!(current.id, original);
        let current = switch_camera("camera-missing".into(), &state).unwrap();
        assert_eq!(current.id, original);

        let current = delete_camera(original.clone(), &state).unwrap();
        assert_eq!(current.id, added.id);
        let replacement = delete_camera(added.id.clone(), &state).unwrap();
        assert_ne!(replacement.id, added.id);
        assert_eq!(state.data.lock().unwrap().cameras.len(), 1);
    }

    #[test]
    fn test_import_then_export_report() {
        let tmp = TempDir::new().unwrap();
        let state = memory_state(&tmp);
        let text = r#"{
            "metadata": {
                "make": "Nikon", "model": "F3", "serialNumber": "1234",
                "customerName": "Ana", "serviceDate": "2026-03-01",
                "createdTimestamp": "2026-03-01T10:00:00.000Z"
            },
            "readings": [
                {"id": "r1", "expectedTime": "1/60", "beforeSamples": [], "measurementSamples": [16.4]}
            ],
            "actions": ["Cleaned"],
            "notes": ""
        }"#;
        let camera = import_report(text.to_string(), &state).unwrap();
        assert_eq!(camera.metadata.make, "Nikon");
        assert_eq!(get_current_camera(&state).unwrap().id, camera.id);

        let summaries = reading_summaries(&state).unwrap();
        assert_eq!(summaries.len(), 1);

        let path = export_report(&state).unwrap();
        assert!(path.ends_with("nikon-f3-1234-2026-03-01.json"));
        assert!(std::path::Path::new(&path).is_file());
    }

    #[test]
    fn test_invalid_import_leaves_store_untouched() {
        let tmp = TempDir::new().unwrap();
        let state = memory_state(&tmp);
        let before = state.data.lock().unwrap().clone();
        assert!(import_report("{not json".into(), &state).is_err());
        assert!(import_report(r#"{"metadata": {}}"#.into(), &state).is_err());
        assert_eq!(*state.data.lock().unwrap(), before);
        assert!(stored(&state).is_none());
    }
}
