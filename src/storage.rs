//! Preference storage backed by `window.localStorage`

use masterlist_core::{PreferenceBackend, PreferenceError};
use web_sys::Storage;

/// Looks the storage object up on every access, so the handle itself
/// carries no browser state.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageBackend;

fn local_storage() -> Result<Storage, PreferenceError> {
    let window = web_sys::window()
        .ok_or_else(|| PreferenceError::Unavailable("no window".to_string()))?;
    window
        .local_storage()
        .map_err(|e| PreferenceError::Unavailable(format!("{:?}", e)))?
        .ok_or_else(|| PreferenceError::Unavailable("localStorage is disabled".to_string()))
}

impl PreferenceBackend for LocalStorageBackend {
    fn read(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        local_storage()?
            .get_item(key)
            .map_err(|e| PreferenceError::Unavailable(format!("{:?}", e)))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        local_storage()?
            .set_item(key, value)
            .map_err(|e| PreferenceError::Unavailable(format!("{:?}", e)))
    }
}
