use bookworm_shared::session::KeyValueStore;
use bookworm_shared::StoreError;
use web_sys::{window, Storage};

const PREFIX: &str = "bookworm_";

/// Session keys in `localStorage`, namespaced with `bookworm_`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

fn storage() -> Result<Storage, StoreError> {
    window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .ok_or_else(|| StoreError("localStorage unavailable".to_string()))
}

fn failed(op: &str, key: &str) -> StoreError {
    StoreError(format!("localStorage {op} failed for {key}"))
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        storage()?
            .get_item(&format!("{PREFIX}{key}"))
            .map_err(|_| failed("read", key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        storage()?
            .set_item(&format!("{PREFIX}{key}"), value)
            .map_err(|_| failed("write", key))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        storage()?
            .remove_item(&format!("{PREFIX}{key}"))
            .map_err(|_| failed("remove", key))
    }
}
