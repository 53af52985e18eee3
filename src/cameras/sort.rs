use crate::cameras::model::{StoredCamera, StoredData};
use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Ordering;

/// Cameras in sidebar order: most recent service date first, then most
/// recently created. Missing or unreadable dates sort last.
pub fn sorted_cameras(data: &StoredData) -> Vec<&StoredCamera> {
    let mut cameras: Vec<&StoredCamera> = data.cameras.values().collect();
    cameras.sort_by(|a, b| compare_for_display(a, b));
    cameras
}

fn compare_for_display(a: &StoredCamera, b: &StoredCamera) -> Ordering {
    let by_date = service_date(b).cmp(&service_date(a));
    if by_date != Ordering::Equal {
        return by_date;
    }
    created_instant(b).cmp(&created_instant(a))
}

fn service_date(camera: &StoredCamera) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&camera.metadata.service_date, "%Y-%m-%d").ok()
}

fn created_instant(camera: &StoredCamera) -> Option<DateTime<Utc>> {
    let raw = if camera.metadata.created_timestamp.is_empty() {
        &camera.created_at
    } else {
        &camera.metadata.created_timestamp
    };
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Sidebar label: make and model, or "Untitled Report" when both are blank.
pub fn camera_display_name(camera: &StoredCamera) -> String {
    let parts: Vec<&str> = [
        camera.metadata.make.as_str(),
        camera.metadata.model.as_str(),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect();
    if parts.is_empty() {
        "Untitled Report".to_string()
    } else {
        parts.join(" ")
    }
}
