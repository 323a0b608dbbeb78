//! Desktop runtime persistence adapters for boot hydration and lightweight local preferences.
//!
//! Everything persists through an injected [`PrefsStore`]; load failures are logged and treated
//! as "nothing stored" so a corrupt entry never blocks boot.

use desktop_app_contract::ApplicationId;
use leptos::logging;
use platform_host::{
    initial_path_pref_key, load_pref_with, load_snapshot_with, save_pref_with, save_snapshot_with,
    PrefsStore, DESKTOP_MODE_STORAGE_KEY, GLOBE_STORAGE_KEY,
};
use serde::{Deserialize, Serialize};

use crate::{globe::GlobeSnapshot, model::DesktopMode};

/// Schema version of the `{ mode }` desktop-mode snapshot.
pub const DESKTOP_MODE_SNAPSHOT_VERSION: u32 = 0;
/// Schema version of the globe topics/pins/camera snapshot.
pub const GLOBE_SNAPSHOT_VERSION: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct DesktopModeSnapshot {
    mode: DesktopMode,
}

/// Loads the persisted desktop surface, if any.
pub async fn load_desktop_mode<S: PrefsStore + ?Sized>(store: &S) -> Option<DesktopMode> {
    match load_snapshot_with::<_, DesktopModeSnapshot>(
        store,
        DESKTOP_MODE_STORAGE_KEY,
        DESKTOP_MODE_SNAPSHOT_VERSION,
    )
    .await
    {
        Ok(snapshot) => snapshot.map(|snapshot| snapshot.mode),
        Err(err) => {
            logging::warn!("desktop mode load failed: {err}");
            None
        }
    }
}

/// Persists the desktop surface choice.
pub async fn persist_desktop_mode<S: PrefsStore + ?Sized>(
    store: &S,
    mode: DesktopMode,
) -> Result<(), String> {
    save_snapshot_with(
        store,
        DESKTOP_MODE_STORAGE_KEY,
        DESKTOP_MODE_SNAPSHOT_VERSION,
        &DesktopModeSnapshot { mode },
    )
    .await
}

/// Loads the persisted globe data, if any.
pub async fn load_globe_snapshot<S: PrefsStore + ?Sized>(store: &S) -> Option<GlobeSnapshot> {
    match load_snapshot_with(store, GLOBE_STORAGE_KEY, GLOBE_SNAPSHOT_VERSION).await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            logging::warn!("globe snapshot load failed: {err}");
            None
        }
    }
}

/// Persists globe topics, pins, and camera.
pub async fn persist_globe_snapshot<S: PrefsStore + ?Sized>(
    store: &S,
    snapshot: &GlobeSnapshot,
) -> Result<(), String> {
    save_snapshot_with(store, GLOBE_STORAGE_KEY, GLOBE_SNAPSHOT_VERSION, snapshot).await
}

/// Loads the last launch path remembered for `app_id`.
pub async fn load_initial_path<S: PrefsStore + ?Sized>(
    store: &S,
    app_id: &ApplicationId,
) -> Option<String> {
    let key = initial_path_pref_key(app_id.as_str());
    match load_pref_with::<_, String>(store, &key).await {
        Ok(path) => path,
        Err(err) => {
            logging::warn!("initial path load failed: {err}");
            None
        }
    }
}

/// Remembers the launch path for `app_id`.
pub async fn persist_initial_path<S: PrefsStore + ?Sized>(
    store: &S,
    app_id: &ApplicationId,
    path: &str,
) -> Result<(), String> {
    save_pref_with(store, &initial_path_pref_key(app_id.as_str()), path).await
}
