use crate::cameras::model::StoredData;
use crate::cameras::store::load_data;
use crate::storage::StorageMedium;
use std::path::PathBuf;
use std::sync::Mutex;

/// The committed container and the medium it is mirrored to.
///
/// Lock order: `storage` first, then `data`.
pub struct AppState {
    pub storage: Mutex<Box<dyn StorageMedium + Send>>,
    pub data: Mutex<StoredData>,
    pub export_dir: PathBuf,
}

impl AppState {
    /// Load the container from `storage` (falling back to a fresh one).
    pub fn open(storage: Box<dyn StorageMedium + Send>, export_dir: PathBuf) -> Self {
        let data = load_data(storage.as_ref());
        tracing::info!(
            "AppState opened: {} camera(s), current={}",
            data.cameras.len(),
            data.current_camera_id
        );
        Self {
            storage: Mutex::new(storage),
            data: Mutex::new(data),
            export_dir,
        }
    }
}
