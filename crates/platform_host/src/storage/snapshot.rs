//! Versioned store snapshots and well-known preference keys.
//!
//! Small client stores (desktop mode, globe topics/pins) persist as `{ "state": .., "version": n }`
//! under a fixed key. A snapshot whose version differs from the caller's is ignored so stale
//! shapes fall back to defaults instead of failing hydration.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::storage::prefs::{load_pref_with, save_pref_with, PrefsStore};

/// Key holding the classic/globe desktop-mode snapshot.
pub const DESKTOP_MODE_STORAGE_KEY: &str = "desktop-mode-storage";
/// Key holding the globe topics/pins/camera snapshot.
pub const GLOBE_STORAGE_KEY: &str = "globe-storage";

/// Returns the key under which an app's launch path is remembered.
pub fn initial_path_pref_key(app_id: &str) -> String {
    format!("app_{app_id}_initialPath")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Persisted store payload plus its schema version.
pub struct PersistedSnapshot<T> {
    /// Persisted subset of the store.
    pub state: T,
    /// Schema version the payload was written with.
    #[serde(default)]
    pub version: u32,
}

/// Loads the snapshot under `key` when it was written with `version`.
///
/// Returns `Ok(None)` when the key is missing or the version differs.
///
/// # Errors
///
/// Returns an error when the store fails or the payload does not decode as `T`.
pub async fn load_snapshot_with<S: PrefsStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
    version: u32,
) -> Result<Option<T>, String> {
    let snapshot: Option<PersistedSnapshot<T>> = load_pref_with(store, key).await?;
    Ok(snapshot
        .filter(|snapshot| snapshot.version == version)
        .map(|snapshot| snapshot.state))
}

/// Writes `state` under `key` wrapped in a versioned snapshot.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub async fn save_snapshot_with<S: PrefsStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    version: u32,
    state: &T,
) -> Result<(), String> {
    save_pref_with(
        store,
        key,
        &PersistedSnapshot {
            state,
            version,
        },
    )
    .await
}
