//! Runtime provider and context wiring for the desktop shell.
//!
//! This module owns the long-lived reducer container, runtime effect queue, app-session state,
//! the globe store, and host bootstrap wiring. Views read derived [`Memo`]s and never mutate
//! desktop state outside [`DesktopRuntimeContext::dispatch_action`].
#![allow(clippy::clone_on_copy)]

use desktop_app_contract::AppShellEvent;
use leptos::*;
use platform_host::{iso_timestamp_now, unix_time_ms_now, HostServices};

use crate::{
    app_runtime::{sync_runtime_sessions, take_window_inbox, AppRuntimeState},
    effect_executor,
    globe::{GlobePin, GlobeState},
    host::DesktopHostContext,
    model::{DesktopState, InstanceId, LaunchRequest},
    presentation::{desktop_presentation, window_presentation, DesktopPresentation, WindowPresentation},
    reducer::{reduce_desktop, DesktopAction, RuntimeEffect, WindowRuntimeState},
};

#[derive(Clone, Copy)]
/// Leptos context for reading desktop runtime state and dispatching [`DesktopAction`] values.
pub struct DesktopRuntimeContext {
    /// Host service bundle for executing runtime side effects and environment queries.
    pub host: StoredValue<DesktopHostContext>,
    /// Reactive registry state.
    pub state: RwSignal<DesktopState>,
    /// Reactive per-window controllers and transition machines.
    pub windows: RwSignal<WindowRuntimeState>,
    /// Queue of runtime effects emitted by the reducer and drained by the effect executor.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Per-instance app sessions and inboxes.
    pub app_runtime: RwSignal<AppRuntimeState>,
    /// Globe desktop surface store.
    pub globe: RwSignal<GlobeState>,
    /// Latest animation frame time, for rendering in-flight transitions.
    pub frame_clock: RwSignal<u64>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<DesktopAction>,
}

impl DesktopRuntimeContext {
    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: DesktopAction) {
        self.dispatch.call(action);
    }

    /// Equality-checked projection of the registry state.
    pub fn select<T, F>(&self, selector: F) -> Memo<T>
    where
        T: PartialEq + 'static,
        F: Fn(&DesktopState) -> T + 'static,
    {
        let state = self.state;
        create_memo(move |_| state.with(|desktop| selector(desktop)))
    }

    /// Render model of one window, recomputed on state changes and animation frames.
    pub fn window_presentation(&self, instance_id: InstanceId) -> Memo<Option<WindowPresentation>> {
        let runtime = *self;
        create_memo(move |_| {
            let now_ms = runtime.frame_clock.get();
            runtime.state.with(|desktop| {
                runtime
                    .windows
                    .with(|windows| window_presentation(desktop, windows, instance_id, now_ms))
            })
        })
    }

    /// Render model of the whole desktop.
    pub fn desktop_presentation(&self) -> Memo<DesktopPresentation> {
        let runtime = *self;
        create_memo(move |_| {
            let now_ms = runtime.frame_clock.get();
            runtime.state.with(|desktop| {
                runtime
                    .windows
                    .with(|windows| desktop_presentation(desktop, windows, now_ms))
            })
        })
    }

    /// Launches an app stamped with the current time.
    pub fn launch(&self, request: LaunchRequest) {
        self.dispatch_action(DesktopAction::Launch(request.at(unix_time_ms_now())));
    }

    /// Starts a minimize toward the window's dock icon or taskbar item.
    pub fn request_minimize(&self, instance_id: InstanceId) {
        let anchor = self.state.with_untracked(|desktop| {
            desktop.instance(instance_id).and_then(|record| {
                self.host
                    .get_value()
                    .resolve_minimize_anchor(record, &desktop.environment)
            })
        });
        self.dispatch_action(DesktopAction::RequestMinimize {
            instance_id,
            anchor,
            now_ms: unix_time_ms_now(),
        });
    }

    /// Starts an animated close, asking intercepting apps first.
    pub fn request_close(&self, instance_id: InstanceId) {
        self.dispatch_action(DesktopAction::RequestClose {
            instance_id,
            now_ms: unix_time_ms_now(),
        });
    }

    /// Removes and returns the shell events waiting for one instance.
    pub fn take_app_events(&self, instance_id: InstanceId) -> Vec<AppShellEvent> {
        take_window_inbox(self.app_runtime, instance_id)
    }

    /// Mutates the globe store and persists its snapshot.
    pub fn update_globe(&self, edit: impl FnOnce(&mut GlobeState)) {
        self.globe.update(edit);
        self.host.get_value().persist_globe(*self);
    }

    /// Edits a pin, stamping its update time.
    pub fn update_globe_pin(&self, pin_id: &str, edit: impl FnOnce(&mut GlobePin)) {
        let updated_at = iso_timestamp_now();
        let mut found = false;
        self.update_globe(|globe| found = globe.update_pin(pin_id, updated_at, edit));
        if !found {
            logging::warn!("globe pin `{pin_id}` not found");
        }
    }
}

fn install_runtime_orchestration(runtime: DesktopRuntimeContext) {
    let host = runtime.host.get_value();
    host.install_boot_hydration(runtime);
    host.install_environment_sync(runtime);
    effect_executor::install(runtime);
}

/// Creates the runtime signals and dispatcher, provides them as context, and boots host wiring.
pub fn provide_desktop_runtime(host_services: HostServices) -> DesktopRuntimeContext {
    let host = store_value(DesktopHostContext::new(host_services));
    let state = create_rw_signal(DesktopState::default());
    let windows = create_rw_signal(WindowRuntimeState::default());
    let effects = create_rw_signal(Vec::<RuntimeEffect>::new());
    let app_runtime = create_rw_signal(AppRuntimeState::default());
    let globe = create_rw_signal(GlobeState::default());
    let frame_clock = create_rw_signal(unix_time_ms_now());

    let dispatch = Callback::new(move |action: DesktopAction| {
        let mut desktop = state.get_untracked();
        let mut window_runtime = windows.get_untracked();
        let previous_desktop = desktop.clone();
        let previous_windows = window_runtime.clone();

        match reduce_desktop(&mut desktop, &mut window_runtime, action) {
            Ok(new_effects) => {
                if desktop.instances != previous_desktop.instances {
                    sync_runtime_sessions(app_runtime, &desktop.instances);
                }
                if desktop != previous_desktop {
                    state.set(desktop);
                }
                if window_runtime != previous_windows {
                    windows.set(window_runtime);
                }
                if !new_effects.is_empty() {
                    let mut queue = effects.get_untracked();
                    queue.extend(new_effects);
                    effects.set(queue);
                }
            }
            Err(err) => logging::warn!("desktop reducer error: {err}"),
        }
    });

    let runtime = DesktopRuntimeContext {
        host,
        state,
        windows,
        effects,
        app_runtime,
        globe,
        frame_clock,
        dispatch,
    };

    provide_context(runtime.clone());
    install_runtime_orchestration(runtime);
    runtime
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components and boots persisted state.
pub fn DesktopProvider(
    /// Injected browser or desktop host bundle assembled by the entry layer.
    host_services: HostServices,
    children: Children,
) -> impl IntoView {
    provide_desktop_runtime(host_services);
    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}
