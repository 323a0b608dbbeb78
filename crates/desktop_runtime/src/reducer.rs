//! Reducer actions, side-effect intents, and transition logic for the desktop window runtime.
//!
//! [`reduce_desktop`] is the only writer of [`DesktopState`] and of the per-window controllers and
//! transition machines kept in [`WindowRuntimeState`]. Everything observable outside the state
//! (persistence, app notifications, sounds) is returned as [`RuntimeEffect`] values.

mod gestures;
mod surface;

use std::collections::BTreeMap;

use desktop_app_contract::{AppLifecycleEvent, AppShellEvent, ApplicationId};
use leptos::logging;
use platform_host::{FeedbackEvent, ScreenPoint, SoundEffect, VibrationPattern};
use serde_json::Value;
use thiserror::Error;

use crate::{
    apps,
    controller::{GestureTarget, WindowGeometryController},
    geometry,
    model::{
        ConstraintOverride, DesktopMode, DesktopState, InstanceId, InstanceRecord, LaunchRequest,
        Point, Rect, ResizeEdge, ShellEnvironment,
    },
    registry::{self, RegistryError},
    transition::{CloseRequest, TransitionCommit, TransitionMachine},
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`].
///
/// Time-dependent actions carry the caller's clock so the reducer stays deterministic.
pub enum DesktopAction {
    /// Launch an app, or re-target its existing window for single-instance apps.
    Launch(LaunchRequest),
    /// Raise and focus an instance, un-minimizing it.
    BringToForeground {
        /// Instance to focus.
        instance_id: InstanceId,
        /// Current time in ms.
        now_ms: u64,
    },
    /// Focus the most recently stacked instance of an app.
    BringAppToForeground {
        /// App to focus.
        app_id: ApplicationId,
        /// Current time in ms.
        now_ms: u64,
    },
    /// Start the animated minimize toward the dock icon or taskbar item.
    RequestMinimize {
        /// Instance to minimize.
        instance_id: InstanceId,
        /// Resolved anchor center, if the host found one.
        anchor: Option<ScreenPoint>,
        /// Current time in ms.
        now_ms: u64,
    },
    /// User close request; apps that intercept closes are asked first.
    RequestClose {
        /// Instance to close.
        instance_id: InstanceId,
        /// Current time in ms.
        now_ms: u64,
    },
    /// Close without asking the app, e.g. after it confirmed an intercepted close.
    PerformClose {
        /// Instance to close.
        instance_id: InstanceId,
        /// Current time in ms.
        now_ms: u64,
    },
    /// Shake a window to signal a refused action.
    Shake {
        /// Instance to shake.
        instance_id: InstanceId,
        /// Current time in ms.
        now_ms: u64,
    },
    /// Advance animation deadlines.
    Tick {
        /// Current time in ms.
        now_ms: u64,
    },
    /// Foreground the next instance of a different app.
    NavigateNext {
        /// Instance the walk starts from.
        instance_id: InstanceId,
    },
    /// Foreground the previous instance of a different app.
    NavigatePrevious {
        /// Instance the walk starts from.
        instance_id: InstanceId,
    },
    /// Replace an instance's title.
    UpdateTitle {
        /// Instance to retitle.
        instance_id: InstanceId,
        /// New title.
        title: String,
    },
    /// Replace an instance's launch payload.
    UpdateInitialData {
        /// Instance to update.
        instance_id: InstanceId,
        /// New payload.
        initial_data: Option<Value>,
    },
    /// Pointer pressed on a titlebar: focuses, then starts a drag or phone swipe.
    TitlebarPointerDown {
        /// Window whose titlebar was hit.
        instance_id: InstanceId,
        /// Chrome roles of the event target.
        target: GestureTarget,
        /// Pointer position in viewport px.
        pointer: Point,
        /// Current time in ms.
        now_ms: u64,
    },
    /// Pointer pressed on a resize handle.
    ResizePointerDown {
        /// Window being resized.
        instance_id: InstanceId,
        /// Handle that was hit.
        edge: ResizeEdge,
        /// Chrome roles of the event target.
        target: GestureTarget,
        /// Pointer position in viewport px.
        pointer: Point,
    },
    /// Pointer moved during a drag or resize.
    PointerMove {
        /// Window owning the gesture.
        instance_id: InstanceId,
        /// Pointer position in viewport px.
        pointer: Point,
    },
    /// Pointer released; commits the gesture.
    PointerUp {
        /// Window owning the gesture.
        instance_id: InstanceId,
        /// Pointer position in viewport px.
        pointer: Point,
    },
    /// Gesture abandoned (pointer capture lost, escape key).
    CancelGesture {
        /// Window owning the gesture.
        instance_id: InstanceId,
    },
    /// Mouse double-click on a titlebar.
    TitlebarDoubleClick {
        /// Window whose titlebar was hit.
        instance_id: InstanceId,
        /// Chrome roles of the event target.
        target: GestureTarget,
        /// Current time in ms.
        now_ms: u64,
    },
    /// Touch tap on a titlebar.
    TitlebarTap {
        /// Window whose titlebar was hit.
        instance_id: InstanceId,
        /// Chrome roles of the event target.
        target: GestureTarget,
        /// Current time in ms.
        now_ms: u64,
    },
    /// Double-click on a resize edge.
    EdgeDoubleClick {
        /// Window whose edge was hit.
        instance_id: InstanceId,
        /// Edge that was hit.
        edge: ResizeEdge,
    },
    /// Zoom control or keyboard shortcut.
    ToggleMaximize {
        /// Window to maximize or restore.
        instance_id: InstanceId,
        /// Current time in ms.
        now_ms: u64,
    },
    /// Flip expose mode.
    ToggleExpose,
    /// Enter or leave expose mode.
    SetExposeMode {
        /// Whether expose should be active.
        enabled: bool,
    },
    /// Click on a window while expose is active.
    ExposeClick {
        /// Window that was clicked.
        instance_id: InstanceId,
    },
    /// Replace the host-provided environment (viewport, theme, dock metrics).
    SetEnvironment {
        /// New environment.
        environment: ShellEnvironment,
    },
    /// Switch the desktop surface and persist the choice.
    SetDesktopMode {
        /// Requested mode.
        mode: DesktopMode,
    },
    /// Flip between the classic and globe desktop surfaces.
    ToggleDesktopMode,
    /// Apply a persisted desktop mode without persisting it again.
    HydrateDesktopMode {
        /// Restored mode.
        mode: DesktopMode,
    },
}

impl DesktopAction {
    /// Clock carried by the action, if any.
    pub fn now_ms(&self) -> Option<u64> {
        match self {
            Self::Launch(request) => Some(request.now_ms),
            Self::BringToForeground { now_ms, .. }
            | Self::BringAppToForeground { now_ms, .. }
            | Self::RequestMinimize { now_ms, .. }
            | Self::RequestClose { now_ms, .. }
            | Self::PerformClose { now_ms, .. }
            | Self::Shake { now_ms, .. }
            | Self::Tick { now_ms }
            | Self::TitlebarPointerDown { now_ms, .. }
            | Self::TitlebarDoubleClick { now_ms, .. }
            | Self::TitlebarTap { now_ms, .. }
            | Self::ToggleMaximize { now_ms, .. } => Some(*now_ms),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the host layer to execute.
pub enum RuntimeEffect {
    /// Store a launch path under the app's initial-path pref key.
    PersistInitialPath {
        /// App the path belongs to.
        app_id: ApplicationId,
        /// Path to persist.
        path: String,
    },
    /// Deliver a notification to the app content of one instance.
    DeliverAppEvent(AppShellEvent),
    /// Play a UI sound.
    PlaySound(SoundEffect),
    /// Pulse the device vibration motor.
    Vibrate(VibrationPattern),
    /// A window was picked in expose; leave expose and focus it.
    ExposeSelection(InstanceId),
    /// Persist the desktop surface choice.
    PersistDesktopMode(DesktopMode),
}

impl From<FeedbackEvent> for RuntimeEffect {
    fn from(event: FeedbackEvent) -> Self {
        match event {
            FeedbackEvent::Sound(sound) => Self::PlaySound(sound),
            FeedbackEvent::Vibration(pattern) => Self::Vibrate(pattern),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for actions that reference state that does not exist.
pub enum ReducerError {
    /// The registry rejected the action.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// An expose-only action arrived while expose was inactive.
    #[error("expose mode is not active")]
    ExposeInactive,
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Per-window runtime kept beside the registry: geometry controllers and transition machines.
pub struct WindowRuntimeState {
    /// Geometry controller per live instance.
    pub controllers: BTreeMap<InstanceId, WindowGeometryController>,
    /// Transition machine per live instance.
    pub transitions: BTreeMap<InstanceId, TransitionMachine>,
    /// Latest clock value seen on an action.
    pub clock_ms: u64,
}

impl WindowRuntimeState {
    pub fn controller(&self, instance_id: InstanceId) -> Option<&WindowGeometryController> {
        self.controllers.get(&instance_id)
    }

    pub fn transition(&self, instance_id: InstanceId) -> Option<&TransitionMachine> {
        self.transitions.get(&instance_id)
    }

    /// Earliest time at which a [`DesktopAction::Tick`] has work to do.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.transitions
            .values()
            .filter_map(TransitionMachine::next_deadline_ms)
            .min()
    }
}

/// Applies a [`DesktopAction`] and collects resulting side effects.
///
/// After the action runs, every instance gets a controller and a transition machine, registry
/// geometry is mirrored into idle controllers, and un-minimize flips start restore animations.
///
/// # Errors
///
/// Returns [`ReducerError::Registry`] when an action references an unknown instance or app, and
/// [`ReducerError::ExposeInactive`] for expose clicks outside expose mode.
pub fn reduce_desktop(
    state: &mut DesktopState,
    windows: &mut WindowRuntimeState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    if let Some(now_ms) = action.now_ms() {
        windows.clock_ms = windows.clock_ms.max(now_ms);
    }
    let previous_foreground = state.foreground;
    let mut effects = Vec::new();

    if !gestures::reduce_gesture_action(state, windows, &action, &mut effects)?
        && !surface::reduce_surface_action(state, &action, &mut effects)?
    {
        reduce_window_action(state, windows, action, &mut effects)?;
    }

    sync_window_runtime(state, windows, &mut effects);
    if state.foreground != previous_foreground {
        if let Some(instance_id) = state.foreground {
            effects.push(lifecycle(instance_id, AppLifecycleEvent::Focused));
        }
    }
    Ok(effects)
}

fn reduce_window_action(
    state: &mut DesktopState,
    windows: &mut WindowRuntimeState,
    action: DesktopAction,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    match action {
        DesktopAction::Launch(request) => launch(state, windows, request, effects)?,
        DesktopAction::BringToForeground { instance_id, .. } => {
            registry::bring_to_foreground(state, instance_id)?;
        }
        DesktopAction::BringAppToForeground { app_id, .. } => {
            registry::bring_app_to_foreground(state, &app_id)?;
        }
        DesktopAction::RequestMinimize {
            instance_id,
            anchor,
            now_ms,
        } => {
            let frame = require(state, instance_id)?.rect();
            let offset = anchor_offset(&state.environment, frame, anchor);
            let (_, transition) = window_parts(state, windows, instance_id)?;
            if transition.request_minimize(now_ms, offset) {
                effects.push(RuntimeEffect::PlaySound(SoundEffect::WindowZoomMinimize));
            }
        }
        DesktopAction::RequestClose {
            instance_id,
            now_ms,
        } => {
            let (_, transition) = window_parts(state, windows, instance_id)?;
            match transition.request_close(now_ms) {
                CloseRequest::Ignored => {}
                CloseRequest::Intercepted => {
                    effects.push(RuntimeEffect::DeliverAppEvent(
                        AppShellEvent::CloseRequested {
                            instance_id: instance_id.0,
                        },
                    ));
                }
                CloseRequest::Closing => push_closing_effects(instance_id, effects),
            }
        }
        DesktopAction::PerformClose {
            instance_id,
            now_ms,
        } => {
            let (_, transition) = window_parts(state, windows, instance_id)?;
            if transition.perform_close(now_ms) {
                push_closing_effects(instance_id, effects);
            }
        }
        DesktopAction::Shake {
            instance_id,
            now_ms,
        } => {
            let (_, transition) = window_parts(state, windows, instance_id)?;
            transition.shake(now_ms);
        }
        DesktopAction::Tick { now_ms } => tick(state, windows, now_ms, effects)?,
        DesktopAction::NavigateNext { instance_id } => {
            registry::navigate_next(state, instance_id)?;
        }
        DesktopAction::NavigatePrevious { instance_id } => {
            registry::navigate_previous(state, instance_id)?;
        }
        DesktopAction::UpdateTitle { instance_id, title } => {
            registry::update_title(state, instance_id, title)?;
        }
        DesktopAction::UpdateInitialData {
            instance_id,
            initial_data,
        } => {
            registry::update_initial_data(state, instance_id, initial_data)?;
        }
        // gesture and surface actions are consumed by the sub-reducers
        _ => {}
    }
    Ok(())
}

fn launch(
    state: &mut DesktopState,
    windows: &mut WindowRuntimeState,
    request: LaunchRequest,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    let LaunchRequest {
        app_id,
        initial_data,
        initial_path,
        title,
        constraints,
        suppress_open_transition,
        now_ms,
    } = request;

    if apps::app_descriptor(&app_id).is_none() {
        logging::warn!("launching `{app_id}` without a catalog entry; using default constraints");
    }
    if let Some(path) = initial_path {
        effects.push(RuntimeEffect::PersistInitialPath {
            app_id: app_id.clone(),
            path,
        });
    }

    let policy = apps::window_policy(&app_id);
    if policy.single_instance {
        if let Some(existing) = reusable_instance_of(state, windows, &app_id) {
            registry::bring_to_foreground(state, existing)?;
            if let Some(transition) = windows.transitions.get_mut(&existing) {
                transition.cancel_minimize(now_ms);
            }
            if let Some(initial_data) = initial_data {
                effects.push(RuntimeEffect::DeliverAppEvent(
                    AppShellEvent::UpdateExisting {
                        app_id,
                        instance_id: existing.0,
                        initial_data,
                    },
                ));
            }
            return Ok(());
        }
    }

    let constraints = apps::window_constraints(&app_id, &constraints);
    let cascade = state.instances.iter().filter(|i| i.is_open).count();
    let frame = geometry::launch_rect(&state.environment, &constraints, cascade);
    let title = title.unwrap_or_else(|| apps::default_title(&app_id));
    let instance_id = registry::launch(state, app_id, title, initial_data, frame);

    windows.controllers.insert(
        instance_id,
        WindowGeometryController::new(instance_id, constraints, frame),
    );
    windows.transitions.insert(
        instance_id,
        TransitionMachine::new(policy, now_ms, suppress_open_transition),
    );
    effects.push(lifecycle(instance_id, AppLifecycleEvent::Opened));
    if !suppress_open_transition {
        effects.push(RuntimeEffect::PlaySound(SoundEffect::WindowOpen));
    }
    Ok(())
}

fn tick(
    state: &mut DesktopState,
    windows: &mut WindowRuntimeState,
    now_ms: u64,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    let ids: Vec<_> = windows.transitions.keys().copied().collect();
    for instance_id in ids {
        let Some(transition) = windows.transitions.get_mut(&instance_id) else {
            continue;
        };
        match transition.tick(now_ms) {
            Some(TransitionCommit::Minimize) => {
                registry::minimize(state, instance_id)?;
                effects.push(lifecycle(instance_id, AppLifecycleEvent::Minimized));
            }
            Some(TransitionCommit::Close) => {
                registry::close(state, instance_id)?;
                windows.controllers.remove(&instance_id);
                windows.transitions.remove(&instance_id);
                effects.push(lifecycle(instance_id, AppLifecycleEvent::Closed));
            }
            None => {}
        }
    }
    Ok(())
}

fn sync_window_runtime(
    state: &DesktopState,
    windows: &mut WindowRuntimeState,
    effects: &mut Vec<RuntimeEffect>,
) {
    windows
        .controllers
        .retain(|id, _| state.instance(*id).is_some());
    windows
        .transitions
        .retain(|id, _| state.instance(*id).is_some());

    let now_ms = windows.clock_ms;
    for record in &state.instances {
        let instance_id = record.instance_id;
        windows
            .controllers
            .entry(instance_id)
            .or_insert_with(|| idle_controller(record))
            .sync_from_registry(record.rect());
        let transition = windows
            .transitions
            .entry(instance_id)
            .or_insert_with(|| idle_transition(record, now_ms));
        let fallback = fallback_anchor_offset(&state.environment, record.rect());
        if transition.observe_minimized(record.is_minimized, now_ms, fallback) {
            effects.push(RuntimeEffect::PlaySound(SoundEffect::WindowZoomMaximize));
            effects.push(lifecycle(instance_id, AppLifecycleEvent::Restored));
        }
    }
}

fn idle_controller(record: &InstanceRecord) -> WindowGeometryController {
    WindowGeometryController::new(
        record.instance_id,
        apps::window_constraints(&record.app_id, &ConstraintOverride::default()),
        record.rect(),
    )
}

fn idle_transition(record: &InstanceRecord, now_ms: u64) -> TransitionMachine {
    TransitionMachine::new(apps::window_policy(&record.app_id), now_ms, true)
}

fn require(state: &DesktopState, instance_id: InstanceId) -> Result<&InstanceRecord, ReducerError> {
    state
        .instance(instance_id)
        .ok_or(ReducerError::Registry(RegistryError::InstanceNotFound(
            instance_id,
        )))
}

/// Controller and transition machine of a registered instance, created on first use.
fn window_parts<'a>(
    state: &DesktopState,
    windows: &'a mut WindowRuntimeState,
    instance_id: InstanceId,
) -> Result<(&'a mut WindowGeometryController, &'a mut TransitionMachine), ReducerError> {
    let record = require(state, instance_id)?;
    let now_ms = windows.clock_ms;
    let controller = windows
        .controllers
        .entry(instance_id)
        .or_insert_with(|| idle_controller(record));
    let transition = windows
        .transitions
        .entry(instance_id)
        .or_insert_with(|| idle_transition(record, now_ms));
    Ok((controller, transition))
}

/// Topmost open instance of `app_id` that is not closing.
fn reusable_instance_of(
    state: &DesktopState,
    windows: &WindowRuntimeState,
    app_id: &ApplicationId,
) -> Option<InstanceId> {
    state.z_order.iter().rev().copied().find(|id| {
        state
            .instance(*id)
            .is_some_and(|instance| instance.is_open && &instance.app_id == app_id)
            && !windows
                .transition(*id)
                .is_some_and(TransitionMachine::is_exiting)
    })
}

/// Translation from the window center to the resolved anchor center.
fn anchor_offset(env: &ShellEnvironment, frame: Rect, anchor: Option<ScreenPoint>) -> (f64, f64) {
    let Some(anchor) = anchor else {
        return fallback_anchor_offset(env, frame);
    };
    let (center_x, center_y) = frame.center();
    (anchor.x - center_x, anchor.y - center_y)
}

/// Straight down to the bottom edge of the viewport.
fn fallback_anchor_offset(env: &ShellEnvironment, frame: Rect) -> (f64, f64) {
    (0.0, f64::from(env.viewport.height - frame.y))
}

fn push_closing_effects(instance_id: InstanceId, effects: &mut Vec<RuntimeEffect>) {
    effects.push(RuntimeEffect::Vibrate(VibrationPattern::CLOSE));
    effects.push(RuntimeEffect::PlaySound(SoundEffect::WindowClose));
    effects.push(lifecycle(instance_id, AppLifecycleEvent::Closing));
}

fn lifecycle(instance_id: InstanceId, event: AppLifecycleEvent) -> RuntimeEffect {
    RuntimeEffect::DeliverAppEvent(AppShellEvent::Lifecycle {
        instance_id: instance_id.0,
        event,
    })
}
