use crate::cameras::model::CameraMetadata;

/// Used when make, model and serial number are all blank.
const FALLBACK_STEM: &str = "camera-report";

/// Download name for a report: `make-model-serial-serviceDate.<ext>`, each
/// identity part sanitized and skipped when nothing is left of it.
pub fn report_filename(metadata: &CameraMetadata, extension: &str) -> String {
    let mut parts: Vec<String> = [
        metadata.make.as_str(),
        metadata.model.as_str(),
        metadata.serial_number.as_str(),
    ]
    .into_iter()
    .map(sanitize_for_filename)
    .filter(|part| !part.is_empty())
    .collect();

    if parts.is_empty() {
        parts.push(FALLBACK_STEM.to_string());
    }
    if !metadata.service_date.is_empty() {
        parts.push(metadata.service_date.clone());
    }
    format!("{}.{}", parts.join("-"), extension)
}

/// Lowercase, collapse every run of non-[a-z0-9] chars into one hyphen, trim
/// hyphens at both ends.
pub fn sanitize_for_filename(text: &str) -> String {
    let lower = text.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut prev_was_hyphen = false;
    for ch in lower.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            prev_was_hyphen = false;
        } else if !prev_was_hyphen {
            out.push('-');
            prev_was_hyphen = true;
        }
    }
    out.trim_matches('-').to_string()
}
