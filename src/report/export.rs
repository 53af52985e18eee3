use crate::cameras::model::StoredCamera;
use crate::report::filename::report_filename;
use crate::report::model::Report;
use crate::util::now_iso;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Snapshot a camera as an export report, stamped with the export time.
pub fn build_report(camera: &StoredCamera) -> Report {
    Report {
        metadata: camera.metadata.clone(),
        readings: camera.readings.clone(),
        actions: camera.actions.clone(),
        notes: camera.notes.clone(),
        show_before_column: Some(camera.show_before_column),
        show_multiple_measurements: Some(camera.show_multiple_measurements),
        exported_at: Some(now_iso()),
    }
}

/// Pretty JSON with two-space indentation.
pub fn report_to_json(report: &Report) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Write the camera's report into `dir` under its conventional filename.
/// The file appears atomically (temp file, then rename).
pub fn write_report_json(dir: &Path, camera: &StoredCamera) -> anyhow::Result<PathBuf> {
    let report = build_report(camera);
    let json = report_to_json(&report)?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export dir {}", dir.display()))?;
    let path = dir.join(report_filename(&report.metadata, "json"));
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, &path)
        .with_context(|| format!("Failed to move report into {}", path.display()))?;
    tracing::info!("REPORT_EXPORTED camera={} path={}", camera.id, path.display());
    Ok(path)
}
