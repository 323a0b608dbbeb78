//! Reducer helpers for desktop-wide surface state: expose, environment, and desktop mode.

use crate::{
    expose,
    model::DesktopState,
    reducer::{DesktopAction, ReducerError, RuntimeEffect},
    registry::RegistryError,
};

pub(super) fn reduce_surface_action(
    state: &mut DesktopState,
    action: &DesktopAction,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<bool, ReducerError> {
    match action {
        DesktopAction::ToggleExpose => {
            state.expose_mode = !state.expose_mode;
        }
        DesktopAction::SetExposeMode { enabled } => {
            state.expose_mode = *enabled;
        }
        DesktopAction::ExposeClick { instance_id } => {
            if !state.expose_mode {
                return Err(ReducerError::ExposeInactive);
            }
            if state.instance(*instance_id).is_none() {
                return Err(RegistryError::InstanceNotFound(*instance_id).into());
            }
            if let Some(selected) = expose::expose_selection(state, *instance_id) {
                effects.push(RuntimeEffect::ExposeSelection(selected));
            }
        }
        DesktopAction::SetEnvironment { environment } => {
            state.environment = *environment;
        }
        DesktopAction::SetDesktopMode { mode } => {
            if state.desktop_mode != *mode {
                state.desktop_mode = *mode;
                effects.push(RuntimeEffect::PersistDesktopMode(*mode));
            }
        }
        DesktopAction::ToggleDesktopMode => {
            state.desktop_mode = state.desktop_mode.toggled();
            effects.push(RuntimeEffect::PersistDesktopMode(state.desktop_mode));
        }
        DesktopAction::HydrateDesktopMode { mode } => {
            state.desktop_mode = *mode;
        }
        _ => return Ok(false),
    }
    Ok(true)
}
