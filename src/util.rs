use chrono::SecondsFormat;

/// Current instant as ISO-8601 UTC with millisecond precision
/// (`2024-01-15T10:30:00.000Z`).
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Today's local calendar date, `YYYY-MM-DD`.
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// `camera-<unix millis>-<7 random chars>`; unique enough for one container.
pub fn generate_camera_id() -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "camera-{}-{}",
        chrono::Utc::now().timestamp_millis(),
        &random[..7]
    )
}
