use desktop_app_contract::ApplicationId;
use leptos::{logging, spawn_local, SignalWithUntracked};

use crate::{
    host::DesktopHostContext, model::DesktopMode, persistence,
    runtime_context::DesktopRuntimeContext,
};

pub(super) fn persist_initial_path(host: DesktopHostContext, app_id: ApplicationId, path: String) {
    spawn_local(async move {
        let prefs = host.prefs_store();
        if let Err(err) = persistence::persist_initial_path(&*prefs, &app_id, &path).await {
            logging::warn!("persist initial path for `{app_id}` failed: {err}");
        }
    });
}

pub(super) fn persist_desktop_mode(host: DesktopHostContext, mode: DesktopMode) {
    spawn_local(async move {
        let prefs = host.prefs_store();
        if let Err(err) = persistence::persist_desktop_mode(&*prefs, mode).await {
            logging::warn!("persist desktop mode failed: {err}");
        }
    });
}

pub(super) fn persist_globe(host: DesktopHostContext, runtime: DesktopRuntimeContext) {
    let snapshot = runtime.globe.with_untracked(|globe| globe.snapshot());
    spawn_local(async move {
        let prefs = host.prefs_store();
        if let Err(err) = persistence::persist_globe_snapshot(&*prefs, &snapshot).await {
            logging::warn!("persist globe failed: {err}");
        }
    });
}
