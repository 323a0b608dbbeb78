use leptos::{create_effect, spawn_local, SignalUpdate};

use crate::{
    host::DesktopHostContext, persistence, reducer::DesktopAction,
    runtime_context::DesktopRuntimeContext,
};

pub(super) fn install_boot_hydration(host: DesktopHostContext, runtime: DesktopRuntimeContext) {
    create_effect(move |_| {
        let host = host.clone();
        spawn_local(async move {
            let prefs = host.prefs_store();

            if let Some(mode) = persistence::load_desktop_mode(&*prefs).await {
                runtime.dispatch_action(DesktopAction::HydrateDesktopMode { mode });
            }

            if let Some(snapshot) = persistence::load_globe_snapshot(&*prefs).await {
                runtime.globe.update(|globe| globe.hydrate(snapshot));
            }
        });
    });
}
