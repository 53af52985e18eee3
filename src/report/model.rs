use crate::cameras::migrations::ReadingRecord;
use crate::cameras::model::CameraMetadata;
use crate::readings::model::Reading;
use serde::{Deserialize, Serialize};

/// Exported report file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub metadata: CameraMetadata,
    pub readings: Vec<Reading>,
    pub actions: Vec<String>,
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_before_column: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_multiple_measurements: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<String>,
}

/// A report file as read back in: readings may still be in a legacy shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedReport {
    pub metadata: CameraMetadata,
    pub readings: Vec<ReadingRecord>,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub show_before_column: Option<bool>,
    #[serde(default)]
    pub show_multiple_measurements: Option<bool>,
    #[serde(default)]
    pub exported_at: Option<String>,
}
