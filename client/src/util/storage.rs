//! `window.localStorage` as an [`authapp::Storage`] backend.
//!
//! Requires a browser environment. Native builds get a stand-in whose every
//! call fails with [`StorageError::Unavailable`], which the session store
//! treats as "no persisted session".

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use authapp::{Storage, StorageError};

/// Zero-sized handle; the browser storage object is looked up per call.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        #[cfg(feature = "csr")]
        {
            browser_storage()?.get_item(key).map_err(js_error)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            Err(unavailable())
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(feature = "csr")]
        {
            browser_storage()?.set_item(key, value).map_err(js_error)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (key, value);
            Err(unavailable())
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        #[cfg(feature = "csr")]
        {
            browser_storage()?.remove_item(key).map_err(js_error)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            Err(unavailable())
        }
    }
}

#[cfg(feature = "csr")]
fn browser_storage() -> Result<web_sys::Storage, StorageError> {
    let window = web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".to_owned()))?;
    window
        .local_storage()
        .map_err(js_error)?
        .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_owned()))
}

#[cfg(feature = "csr")]
fn js_error(err: wasm_bindgen::JsValue) -> StorageError {
    StorageError::Unavailable(format!("{err:?}"))
}

#[cfg(not(feature = "csr"))]
fn unavailable() -> StorageError {
    StorageError::Unavailable("localStorage requires a browser".to_owned())
}
