//! Reducer helpers for pointer gestures: drag, resize, maximize toggles, and phone swipes.

use crate::{
    controller::{GestureOutcome, NavigateDirection, WindowGeometryController},
    model::{DesktopState, InstanceId},
    reducer::{window_parts, DesktopAction, ReducerError, RuntimeEffect, WindowRuntimeState},
    registry,
};

/// Controller of a window that currently takes pointer input.
///
/// `None` while expose is active or the window is closing.
fn interactive_controller<'a>(
    state: &DesktopState,
    windows: &'a mut WindowRuntimeState,
    instance_id: InstanceId,
) -> Result<Option<&'a mut WindowGeometryController>, ReducerError> {
    let (controller, transition) = window_parts(state, windows, instance_id)?;
    if state.expose_mode || !transition.accepts_pointer_input() {
        return Ok(None);
    }
    Ok(Some(controller))
}

pub(super) fn reduce_gesture_action(
    state: &mut DesktopState,
    windows: &mut WindowRuntimeState,
    action: &DesktopAction,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<bool, ReducerError> {
    let env = state.environment;
    let outcome = match action {
        DesktopAction::TitlebarPointerDown {
            instance_id,
            target,
            pointer,
            now_ms,
        } => {
            let is_foreground = state.foreground == Some(*instance_id);
            let Some(controller) = interactive_controller(state, windows, *instance_id)? else {
                return Ok(true);
            };
            controller.begin_titlebar_gesture(&env, target, *pointer, *now_ms, is_foreground);
            registry::bring_to_foreground(state, *instance_id)?;
            GestureOutcome::default()
        }
        DesktopAction::ResizePointerDown {
            instance_id,
            edge,
            target,
            pointer,
        } => {
            let Some(controller) = interactive_controller(state, windows, *instance_id)? else {
                return Ok(true);
            };
            controller.begin_resize(&env, target, *edge, *pointer);
            registry::bring_to_foreground(state, *instance_id)?;
            GestureOutcome::default()
        }
        DesktopAction::PointerMove {
            instance_id,
            pointer,
        } => {
            let (controller, _) = window_parts(state, windows, *instance_id)?;
            controller.drag_to(&env, *pointer);
            controller.resize_to(*pointer);
            GestureOutcome::default()
        }
        DesktopAction::PointerUp {
            instance_id,
            pointer,
        } => {
            let (controller, transition) = window_parts(state, windows, *instance_id)?;
            if !transition.accepts_pointer_input() {
                controller.cancel_gesture();
                return Ok(true);
            }
            if controller.is_dragging() {
                controller.drag_to(&env, *pointer);
                controller.end_drag(&env)
            } else {
                controller.end_resize()
            }
        }
        DesktopAction::CancelGesture { instance_id } => {
            let (controller, _) = window_parts(state, windows, *instance_id)?;
            controller.cancel_gesture();
            GestureOutcome::default()
        }
        DesktopAction::TitlebarDoubleClick {
            instance_id,
            target,
            now_ms,
        } => match interactive_controller(state, windows, *instance_id)? {
            Some(controller) => controller.titlebar_double_click(&env, target, *now_ms),
            None => GestureOutcome::default(),
        },
        DesktopAction::TitlebarTap {
            instance_id,
            target,
            now_ms,
        } => match interactive_controller(state, windows, *instance_id)? {
            Some(controller) => controller.titlebar_tap(&env, target, *now_ms),
            None => GestureOutcome::default(),
        },
        DesktopAction::EdgeDoubleClick { instance_id, edge } => {
            match interactive_controller(state, windows, *instance_id)? {
                Some(controller) if edge.is_vertical_edge() => {
                    controller.toggle_height_maximize(&env)
                }
                _ => GestureOutcome::default(),
            }
        }
        DesktopAction::ToggleMaximize {
            instance_id,
            now_ms,
        } => match interactive_controller(state, windows, *instance_id)? {
            Some(controller) => controller.toggle_full_maximize(&env, *now_ms),
            None => GestureOutcome::default(),
        },
        _ => return Ok(false),
    };

    if let Some(instance_id) = gesture_instance(action) {
        apply_outcome(state, instance_id, outcome, effects)?;
    }
    Ok(true)
}

fn gesture_instance(action: &DesktopAction) -> Option<InstanceId> {
    match action {
        DesktopAction::TitlebarPointerDown { instance_id, .. }
        | DesktopAction::ResizePointerDown { instance_id, .. }
        | DesktopAction::PointerMove { instance_id, .. }
        | DesktopAction::PointerUp { instance_id, .. }
        | DesktopAction::CancelGesture { instance_id }
        | DesktopAction::TitlebarDoubleClick { instance_id, .. }
        | DesktopAction::TitlebarTap { instance_id, .. }
        | DesktopAction::EdgeDoubleClick { instance_id, .. }
        | DesktopAction::ToggleMaximize { instance_id, .. } => Some(*instance_id),
        _ => None,
    }
}

fn apply_outcome(
    state: &mut DesktopState,
    instance_id: InstanceId,
    outcome: GestureOutcome,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    if let Some(frame) = outcome.commit {
        registry::update_geometry(state, instance_id, frame.position(), frame.size())?;
    }
    effects.extend(outcome.feedback.into_iter().map(RuntimeEffect::from));
    match outcome.navigate {
        Some(NavigateDirection::Next) => {
            registry::navigate_next(state, instance_id)?;
        }
        Some(NavigateDirection::Previous) => {
            registry::navigate_previous(state, instance_id)?;
        }
        None => {}
    }
    Ok(())
}
