//! Instance registry: the authoritative id → record map, stacking order, and foreground holder.
//!
//! Every operation keeps three facts in agreement: `state.foreground`, the per-record
//! `is_foreground` flags, and the tail of `state.z_order`.

use desktop_app_contract::ApplicationId;
use serde_json::Value;
use thiserror::Error;

use crate::model::{DesktopState, InstanceId, InstanceRecord, Point, Rect, Size};

/// Stacking base below every managed window.
pub const BASE_Z_INDEX: u32 = 1;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("instance {0} not found")]
    InstanceNotFound(InstanceId),
    #[error("no open instance of app `{0}`")]
    AppNotOpen(ApplicationId),
}

fn require(state: &DesktopState, instance_id: InstanceId) -> Result<(), RegistryError> {
    state
        .instance(instance_id)
        .map(|_| ())
        .ok_or(RegistryError::InstanceNotFound(instance_id))
}

fn require_mut(
    state: &mut DesktopState,
    instance_id: InstanceId,
) -> Result<&mut InstanceRecord, RegistryError> {
    state
        .instance_mut(instance_id)
        .ok_or(RegistryError::InstanceNotFound(instance_id))
}

fn set_foreground(state: &mut DesktopState, instance_id: Option<InstanceId>) {
    for instance in &mut state.instances {
        instance.is_foreground = Some(instance.instance_id) == instance_id;
    }
    state.foreground = instance_id;
}

fn raise(state: &mut DesktopState, instance_id: InstanceId) {
    state.z_order.retain(|id| *id != instance_id);
    state.z_order.push(instance_id);
}

/// Opens a new foreground instance at the top of the stack and returns its id.
pub fn launch(
    state: &mut DesktopState,
    app_id: ApplicationId,
    title: String,
    initial_data: Option<Value>,
    frame: Rect,
) -> InstanceId {
    let instance_id = InstanceId(state.next_instance_id);
    state.next_instance_id = state.next_instance_id.saturating_add(1);
    state.instances.push(InstanceRecord {
        instance_id,
        app_id,
        is_open: true,
        is_foreground: false,
        is_minimized: false,
        position: frame.position(),
        size: frame.size(),
        title,
        initial_data,
    });
    raise(state, instance_id);
    set_foreground(state, Some(instance_id));
    instance_id
}

/// Raises and focuses `instance_id`, un-minimizing it.
///
/// Returns `false` when it already was the visible foreground instance.
pub fn bring_to_foreground(
    state: &mut DesktopState,
    instance_id: InstanceId,
) -> Result<bool, RegistryError> {
    let record = require_mut(state, instance_id)?;
    if record.is_foreground && !record.is_minimized {
        return Ok(false);
    }
    record.is_minimized = false;
    raise(state, instance_id);
    set_foreground(state, Some(instance_id));
    Ok(true)
}

/// Focuses the most recently stacked open instance of `app_id`.
pub fn bring_app_to_foreground(
    state: &mut DesktopState,
    app_id: &ApplicationId,
) -> Result<InstanceId, RegistryError> {
    let target = state
        .z_order
        .iter()
        .rev()
        .copied()
        .find(|id| {
            state
                .instance(*id)
                .is_some_and(|instance| instance.is_open && &instance.app_id == app_id)
        })
        .ok_or_else(|| RegistryError::AppNotOpen(app_id.clone()))?;
    bring_to_foreground(state, target)?;
    Ok(target)
}

/// Marks `instance_id` minimized. Focus is not handed to another window.
pub fn minimize(state: &mut DesktopState, instance_id: InstanceId) -> Result<(), RegistryError> {
    let record = require_mut(state, instance_id)?;
    record.is_minimized = true;
    record.is_foreground = false;
    if state.foreground == Some(instance_id) {
        state.foreground = None;
    }
    Ok(())
}

/// Removes `instance_id`. A closed foreground hands focus to the topmost visible instance.
pub fn close(state: &mut DesktopState, instance_id: InstanceId) -> Result<(), RegistryError> {
    require(state, instance_id)?;
    state
        .instances
        .retain(|instance| instance.instance_id != instance_id);
    state.z_order.retain(|id| *id != instance_id);

    if state.foreground == Some(instance_id) {
        let next = state.z_order.iter().rev().copied().find(|id| {
            state
                .instance(*id)
                .is_some_and(InstanceRecord::is_visible)
        });
        set_foreground(state, next);
    }
    Ok(())
}

pub fn update_geometry(
    state: &mut DesktopState,
    instance_id: InstanceId,
    position: Point,
    size: Size,
) -> Result<(), RegistryError> {
    let record = require_mut(state, instance_id)?;
    record.position = position;
    record.size = size;
    Ok(())
}

pub fn update_title(
    state: &mut DesktopState,
    instance_id: InstanceId,
    title: String,
) -> Result<(), RegistryError> {
    require_mut(state, instance_id)?.title = title;
    Ok(())
}

pub fn update_initial_data(
    state: &mut DesktopState,
    instance_id: InstanceId,
    initial_data: Option<Value>,
) -> Result<(), RegistryError> {
    require_mut(state, instance_id)?.initial_data = initial_data;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Walk {
    Forward,
    Backward,
}

fn navigate(
    state: &mut DesktopState,
    from: InstanceId,
    walk: Walk,
) -> Result<Option<InstanceId>, RegistryError> {
    let from_app = state
        .instance(from)
        .map(|instance| instance.app_id.clone())
        .ok_or(RegistryError::InstanceNotFound(from))?;
    let Some(start) = state.z_order.iter().position(|id| *id == from) else {
        return Ok(None);
    };
    let len = state.z_order.len();
    let target = (1..len)
        .map(|step| match walk {
            Walk::Forward => (start + step) % len,
            Walk::Backward => (start + len - step) % len,
        })
        .map(|index| state.z_order[index])
        .find(|id| {
            state
                .instance(*id)
                .is_some_and(|instance| instance.is_open && instance.app_id != from_app)
        });

    if let Some(target) = target {
        bring_to_foreground(state, target)?;
    }
    Ok(target)
}

/// Foregrounds the next instance of a different app above `from`, wrapping around the stack.
pub fn navigate_next(
    state: &mut DesktopState,
    from: InstanceId,
) -> Result<Option<InstanceId>, RegistryError> {
    navigate(state, from, Walk::Forward)
}

/// Foregrounds the previous instance of a different app below `from`, wrapping around the stack.
pub fn navigate_previous(
    state: &mut DesktopState,
    from: InstanceId,
) -> Result<Option<InstanceId>, RegistryError> {
    navigate(state, from, Walk::Backward)
}

/// CSS stacking value for `instance_id`: its stack position above [`BASE_Z_INDEX`].
pub fn z_index_for(state: &DesktopState, instance_id: InstanceId) -> u32 {
    state
        .z_order
        .iter()
        .position(|id| *id == instance_id)
        .map_or(BASE_Z_INDEX, |index| BASE_Z_INDEX + index as u32 + 1)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn open(state: &mut DesktopState, app: &str) -> InstanceId {
        launch(
            state,
            ApplicationId::trusted(app),
            app.to_string(),
            None,
            Rect::new(10, 10, 300, 200),
        )
    }

    fn flags(state: &DesktopState, id: InstanceId) -> (bool, bool) {
        let record = state.instance(id).expect("instance");
        (record.is_foreground, record.is_minimized)
    }

    #[test]
    fn launch_appends_and_takes_foreground() {
        let mut state = DesktopState::default();
        let first = open(&mut state, "finder");
        let second = open(&mut state, "finder");

        assert_ne!(first, second);
        assert_eq!(state.z_order, vec![first, second]);
        assert_eq!(state.foreground, Some(second));
        assert_eq!(flags(&state, first), (false, false));
        assert_eq!(flags(&state, second), (true, false));
    }

    #[test]
    fn bring_to_foreground_raises_and_unminimizes() {
        let mut state = DesktopState::default();
        let first = open(&mut state, "finder");
        let second = open(&mut state, "textedit");
        minimize(&mut state, first).expect("minimize");

        assert!(bring_to_foreground(&mut state, first).expect("focus"));
        assert_eq!(state.z_order, vec![second, first]);
        assert_eq!(flags(&state, first), (true, false));
        assert_eq!(flags(&state, second), (false, false));
        assert!(!bring_to_foreground(&mut state, first).expect("focus again"));
    }

    #[test]
    fn minimize_does_not_transfer_focus() {
        let mut state = DesktopState::default();
        let first = open(&mut state, "finder");
        let second = open(&mut state, "textedit");
        minimize(&mut state, second).expect("minimize");

        assert_eq!(state.foreground, None);
        assert_eq!(flags(&state, first), (false, false));
        assert_eq!(flags(&state, second), (false, true));
        assert_eq!(state.z_order, vec![first, second]);
    }

    #[test]
    fn closing_foreground_promotes_topmost_visible() {
        let mut state = DesktopState::default();
        let first = open(&mut state, "finder");
        let second = open(&mut state, "textedit");
        let third = open(&mut state, "terminal");
        minimize(&mut state, second).expect("minimize");
        bring_to_foreground(&mut state, third).expect("focus");

        close(&mut state, third).expect("close");
        assert_eq!(state.foreground, Some(first));
        assert_eq!(state.z_order, vec![first, second]);
        assert!(state.instance(third).is_none());
    }

    #[test]
    fn closing_background_keeps_foreground() {
        let mut state = DesktopState::default();
        let first = open(&mut state, "finder");
        let second = open(&mut state, "textedit");
        close(&mut state, first).expect("close");
        assert_eq!(state.foreground, Some(second));
    }

    #[test]
    fn unknown_instances_are_reported_without_mutation() {
        let mut state = DesktopState::default();
        open(&mut state, "finder");
        let before = state.clone();
        let missing = InstanceId(99);

        assert_eq!(
            close(&mut state, missing),
            Err(RegistryError::InstanceNotFound(missing))
        );
        assert_eq!(
            update_title(&mut state, missing, "x".into()),
            Err(RegistryError::InstanceNotFound(missing))
        );
        assert_eq!(
            bring_to_foreground(&mut state, missing),
            Err(RegistryError::InstanceNotFound(missing))
        );
        assert_eq!(state, before);
    }

    #[test]
    fn navigation_skips_same_app_and_wraps() {
        let mut state = DesktopState::default();
        let finder_a = open(&mut state, "finder");
        let finder_b = open(&mut state, "finder");
        let editor = open(&mut state, "textedit");

        // stack: finder_a, finder_b, editor
        assert_eq!(navigate_next(&mut state, editor).expect("next"), Some(finder_a));
        // stack: finder_b, editor, finder_a
        assert_eq!(
            navigate_previous(&mut state, finder_a).expect("previous"),
            Some(editor)
        );
        assert_eq!(state.foreground, Some(editor));
        assert_eq!(state.z_order, vec![finder_b, finder_a, editor]);
    }

    #[test]
    fn navigation_is_noop_with_a_single_app() {
        let mut state = DesktopState::default();
        let a = open(&mut state, "finder");
        let b = open(&mut state, "finder");
        assert_eq!(navigate_next(&mut state, b).expect("next"), None);
        assert_eq!(state.foreground, Some(b));
        assert_eq!(navigate_previous(&mut state, a).expect("previous"), None);
    }

    #[test]
    fn bring_app_to_foreground_prefers_most_recent_instance() {
        let mut state = DesktopState::default();
        let _older = open(&mut state, "finder");
        let newer = open(&mut state, "finder");
        open(&mut state, "textedit");

        let finder = ApplicationId::trusted("finder");
        assert_eq!(bring_app_to_foreground(&mut state, &finder), Ok(newer));
        assert_eq!(state.foreground, Some(newer));

        let ipod = ApplicationId::trusted("ipod");
        assert_eq!(
            bring_app_to_foreground(&mut state, &ipod),
            Err(RegistryError::AppNotOpen(ipod))
        );
    }

    #[test]
    fn z_index_follows_stack_position() {
        let mut state = DesktopState::default();
        let first = open(&mut state, "finder");
        let second = open(&mut state, "textedit");
        assert_eq!(z_index_for(&state, first), 2);
        assert_eq!(z_index_for(&state, second), 3);
        assert_eq!(z_index_for(&state, InstanceId(42)), BASE_Z_INDEX);
    }

    #[test]
    fn geometry_and_data_updates_touch_only_their_fields() {
        let mut state = DesktopState::default();
        let id = open(&mut state, "finder");
        update_geometry(&mut state, id, Point::new(5, 6), Size::new(700, 500)).expect("geometry");
        update_initial_data(&mut state, id, Some(serde_json::json!({ "path": "/Documents" })))
            .expect("data");

        let record = state.instance(id).expect("instance");
        assert_eq!(record.rect(), Rect::new(5, 6, 700, 500));
        assert_eq!(record.title, "finder");
        assert_eq!(
            record.initial_data,
            Some(serde_json::json!({ "path": "/Documents" }))
        );
    }
}
