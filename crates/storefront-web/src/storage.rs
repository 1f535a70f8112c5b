//! Browser Storage
//!
//! `localStorage` behind the entitlement cache's key-value trait.

use storefront_core::{KeyValueStore, StoreError};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// The window's `localStorage`, looked up on every call
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<Storage, StoreError> {
        web_sys::window()
            .ok_or_else(|| StoreError::Storage("window unavailable".into()))?
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StoreError::Storage("localStorage unavailable".into()))
    }
}

fn js_error(value: JsValue) -> StoreError {
    StoreError::Storage(format!("{value:?}"))
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> storefront_core::Result<Option<String>> {
        Self::storage()?.get_item(key).map_err(js_error)
    }

    fn set(&self, key: &str, value: &str) -> storefront_core::Result<()> {
        Self::storage()?.set_item(key, value).map_err(js_error)
    }

    fn delete(&self, key: &str) -> storefront_core::Result<()> {
        Self::storage()?.remove_item(key).map_err(js_error)
    }
}
