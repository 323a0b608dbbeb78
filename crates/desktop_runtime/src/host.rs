//! Host-side runtime helpers for executing reducer effects and querying browser environment state.
//!
//! Reducer semantics stay pure; everything that touches storage, the DOM, audio, or app content
//! runs here behind the injected [`HostServices`] bundle.

mod app_bus;
mod boot;
pub mod browser;
mod feedback_effects;
pub mod host_ui;
mod persistence_effects;

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use platform_host::{
    AnchorResolver, AnchorTarget, FeedbackService, HostServices, HostStrategy, PrefsStore,
    ScreenPoint, VibrationPattern,
};

use crate::{
    model::{InstanceRecord, ShellEnvironment, Size},
    reducer::RuntimeEffect,
    runtime_context::DesktopRuntimeContext,
};

#[derive(Clone)]
/// Host service bundle for desktop runtime side effects.
pub struct DesktopHostContext {
    prefs: Rc<dyn PrefsStore>,
    anchors: Rc<dyn AnchorResolver>,
    feedback: Rc<dyn FeedbackService>,
    host_strategy: HostStrategy,
    last_vibration_ms: Rc<RefCell<HashMap<VibrationPattern, u64>>>,
}

impl DesktopHostContext {
    /// Wraps the host services assembled by the entry layer.
    pub fn new(services: HostServices) -> Self {
        Self {
            prefs: services.prefs,
            anchors: services.anchors,
            feedback: services.feedback,
            host_strategy: services.host_strategy,
            last_vibration_ms: Rc::default(),
        }
    }

    /// Returns the configured lightweight preference service.
    pub fn prefs_store(&self) -> Rc<dyn PrefsStore> {
        self.prefs.clone()
    }

    /// Returns the configured dock/taskbar anchor lookup.
    pub fn anchor_resolver(&self) -> Rc<dyn AnchorResolver> {
        self.anchors.clone()
    }

    /// Returns the configured sound and vibration service.
    pub fn feedback_service(&self) -> Rc<dyn FeedbackService> {
        self.feedback.clone()
    }

    pub fn host_strategy(&self) -> HostStrategy {
        self.host_strategy
    }

    /// Center of the chrome element a minimizing window flies into.
    ///
    /// Dock themes target the app's dock icon, taskbar themes the instance's taskbar item.
    pub fn resolve_minimize_anchor(
        &self,
        record: &InstanceRecord,
        environment: &ShellEnvironment,
    ) -> Option<ScreenPoint> {
        let target = if environment.theme.has_dock() {
            AnchorTarget::DockIcon(record.app_id.clone())
        } else {
            AnchorTarget::TaskbarItem(record.instance_id.0)
        };
        self.anchors.resolve_anchor(&target)
    }

    /// Records a buzz of `pattern` at `now_ms` unless one happened within its cooldown.
    pub fn admit_vibration(&self, pattern: VibrationPattern, now_ms: u64) -> bool {
        let mut log = self.last_vibration_ms.borrow_mut();
        if let Some(last) = log.get(&pattern) {
            if now_ms.saturating_sub(*last) < u64::from(pattern.cooldown_ms) {
                return false;
            }
        }
        log.insert(pattern, now_ms);
        true
    }

    /// Current environment seeded from the browser viewport.
    pub fn viewport_environment(&self, current: ShellEnvironment) -> ShellEnvironment {
        let mut environment = host_ui::environment_for_viewport(current, self.viewport_size());
        environment.embedded_shell = self.host_strategy.is_embedded_shell();
        environment
    }

    pub fn viewport_size(&self) -> Size {
        host_ui::viewport_size()
    }

    /// Installs boot hydration of the desktop mode and globe snapshots.
    pub fn install_boot_hydration(&self, runtime: DesktopRuntimeContext) {
        boot::install_boot_hydration(self.clone(), runtime);
    }

    /// Installs the viewport listener and the transition frame clock.
    pub fn install_environment_sync(&self, runtime: DesktopRuntimeContext) {
        host_ui::install_environment_listener(runtime);
        host_ui::install_frame_clock(runtime);
    }

    /// Persists the globe snapshot from the runtime's globe store.
    pub fn persist_globe(&self, runtime: DesktopRuntimeContext) {
        persistence_effects::persist_globe(self.clone(), runtime);
    }

    /// Executes a single [`RuntimeEffect`] emitted by the reducer.
    pub fn run_runtime_effect(&self, runtime: DesktopRuntimeContext, effect: RuntimeEffect) {
        match effect {
            RuntimeEffect::PersistInitialPath { app_id, path } => {
                persistence_effects::persist_initial_path(self.clone(), app_id, path)
            }
            RuntimeEffect::PersistDesktopMode(mode) => {
                persistence_effects::persist_desktop_mode(self.clone(), mode)
            }
            RuntimeEffect::DeliverAppEvent(event) => app_bus::deliver_app_event(runtime, event),
            RuntimeEffect::PlaySound(sound) => feedback_effects::play_sound(self, sound),
            RuntimeEffect::Vibrate(pattern) => feedback_effects::vibrate(self, pattern),
            RuntimeEffect::ExposeSelection(instance_id) => {
                host_ui::select_exposed_window(runtime, instance_id)
            }
        }
    }
}
