//! Read-only render model derived from the registry and the per-window runtime.
//!
//! Views never combine registry geometry, live gesture geometry, transition frames, and expose
//! transforms themselves; they render a [`WindowPresentation`].

use serde::Serialize;

use crate::{
    controller::resize_handle_extent,
    expose::{expose_layout, ExposeSlot},
    geometry::{snap_rect, ExposeTransform},
    model::{DesktopState, InstanceId, InstanceRecord, Rect, ResizeEdge},
    reducer::WindowRuntimeState,
    registry,
    theme::{compute_insets, show_desktop_menu_bar, Insets},
    transition::{TransitionPhase, VisualFrame},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
/// How a window's DOM is kept.
pub enum WindowVisibility {
    Shown,
    /// Minimized but kept mounted, hidden from view and hit testing.
    Hidden,
    Unmounted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowPresentation {
    pub instance_id: InstanceId,
    pub title: String,
    pub frame: Rect,
    pub z_index: u32,
    pub is_foreground: bool,
    pub is_maximized: bool,
    pub visual: VisualFrame,
    pub is_shaking: bool,
    pub expose: Option<ExposeTransform>,
    pub visibility: WindowVisibility,
    /// Chrome (titlebar, handles) takes pointer input.
    pub chrome_interactive: bool,
    /// App content takes pointer input; off in expose and during drags and resizes.
    pub content_interactive: bool,
    /// Half-screen outline shown while a drag hovers a snap zone.
    pub snap_preview: Option<Rect>,
    pub resize_handles: Vec<(ResizeEdge, i32)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesktopPresentation {
    pub insets: Insets,
    pub show_menu_bar: bool,
    pub expose_mode: bool,
    /// Windows in stacking order, bottom first.
    pub windows: Vec<WindowPresentation>,
}

fn present(
    state: &DesktopState,
    windows: &WindowRuntimeState,
    record: &InstanceRecord,
    slots: &[ExposeSlot],
    now_ms: u64,
) -> WindowPresentation {
    let env = &state.environment;
    let instance_id = record.instance_id;
    let controller = windows.controller(instance_id);
    let transition = windows.transition(instance_id);
    let slot = state
        .expose_mode
        .then(|| slots.iter().find(|slot| slot.instance_id == instance_id))
        .flatten();

    let phase = transition.map(|machine| machine.phase());
    let visibility = match phase {
        Some(TransitionPhase::Closed) => WindowVisibility::Unmounted,
        Some(TransitionPhase::Minimized) | None if record.is_minimized => {
            if transition.is_some_and(|machine| machine.content_mounted()) {
                WindowVisibility::Hidden
            } else {
                WindowVisibility::Unmounted
            }
        }
        _ => WindowVisibility::Shown,
    };
    let accepts_input = transition.map_or(true, |machine| machine.accepts_pointer_input());
    let chrome_interactive =
        accepts_input && visibility == WindowVisibility::Shown && !state.expose_mode;
    let in_gesture = controller.is_some_and(|controller| {
        controller.is_dragging() || controller.active_resize_edge().is_some()
    });

    WindowPresentation {
        instance_id,
        title: record.title.clone(),
        frame: controller.map_or(record.rect(), |controller| controller.frame()),
        z_index: slot.map_or_else(
            || registry::z_index_for(state, instance_id),
            |slot| slot.z_index,
        ),
        is_foreground: record.is_foreground,
        is_maximized: controller.is_some_and(|controller| controller.is_maximized()),
        visual: transition.map_or(VisualFrame::RESTING, |machine| machine.frame(now_ms)),
        is_shaking: transition.is_some_and(|machine| machine.is_shaking(now_ms)),
        expose: slot.map(|slot| slot.transform),
        visibility,
        chrome_interactive,
        content_interactive: chrome_interactive && !in_gesture,
        snap_preview: controller
            .and_then(|controller| controller.snap_zone())
            .map(|zone| snap_rect(env, zone)),
        resize_handles: ResizeEdge::available(env.is_mobile)
            .map(|edge| {
                let extent = controller.map_or_else(
                    || resize_handle_extent(edge, env.theme, env.is_mobile),
                    |controller| controller.handle_extent(edge, env.theme, env.is_mobile),
                );
                (edge, extent)
            })
            .collect(),
    }
}

/// Render model of one window at `now_ms`, or `None` for unknown instances.
pub fn window_presentation(
    state: &DesktopState,
    windows: &WindowRuntimeState,
    instance_id: InstanceId,
    now_ms: u64,
) -> Option<WindowPresentation> {
    let record = state.instance(instance_id)?;
    let slots = if state.expose_mode {
        expose_layout(state)
    } else {
        Vec::new()
    };
    Some(present(state, windows, record, &slots, now_ms))
}

/// Render model of the whole desktop at `now_ms`.
pub fn desktop_presentation(
    state: &DesktopState,
    windows: &WindowRuntimeState,
    now_ms: u64,
) -> DesktopPresentation {
    let slots = if state.expose_mode {
        expose_layout(state)
    } else {
        Vec::new()
    };
    DesktopPresentation {
        insets: compute_insets(&state.environment),
        show_menu_bar: show_desktop_menu_bar(
            state.environment.theme,
            state.foreground.is_some(),
            state.expose_mode,
        ),
        expose_mode: state.expose_mode,
        windows: state
            .z_order
            .iter()
            .filter_map(|id| state.instance(*id))
            .map(|record| present(state, windows, record, &slots, now_ms))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::ApplicationId;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        controller::GestureTarget,
        expose::EXPOSE_Z_INDEX_BASE,
        model::{LaunchRequest, Point},
        reducer::{reduce_desktop, DesktopAction},
        theme::ThemeId,
    };

    fn open(state: &mut DesktopState, windows: &mut WindowRuntimeState, app: &str) -> InstanceId {
        reduce_desktop(
            state,
            windows,
            DesktopAction::Launch(LaunchRequest {
                suppress_open_transition: true,
                ..LaunchRequest::new(ApplicationId::trusted(app))
            }),
        )
        .expect("launch");
        state.foreground.expect("foreground")
    }

    #[test]
    fn live_drag_geometry_and_snap_preview_are_presented() {
        let mut state = DesktopState::default();
        let mut windows = WindowRuntimeState::default();
        let id = open(&mut state, &mut windows, "finder");
        reduce_desktop(
            &mut state,
            &mut windows,
            DesktopAction::TitlebarPointerDown {
                instance_id: id,
                target: GestureTarget::titlebar(),
                pointer: Point::new(500, 200),
                now_ms: 0,
            },
        )
        .expect("down");
        reduce_desktop(
            &mut state,
            &mut windows,
            DesktopAction::PointerMove {
                instance_id: id,
                pointer: Point::new(20, 210),
            },
        )
        .expect("move");

        let view = window_presentation(&state, &windows, id, 0).expect("window");
        assert_eq!(view.frame, Rect::new(-140, 200, 600, 400));
        assert_eq!(view.snap_preview, Some(Rect::new(0, 36, 640, 708)));
        assert_eq!(view.z_index, 2);
        assert!(view.chrome_interactive);
        assert!(!view.content_interactive);
    }

    #[test]
    fn expose_overrides_stacking_and_disables_content() {
        let mut state = DesktopState::default();
        let mut windows = WindowRuntimeState::default();
        let first = open(&mut state, &mut windows, "finder");
        open(&mut state, &mut windows, "textedit");
        reduce_desktop(&mut state, &mut windows, DesktopAction::ToggleExpose).expect("expose");

        let desktop = desktop_presentation(&state, &windows, 0);
        assert!(desktop.show_menu_bar);
        let view = &desktop.windows[0];
        assert_eq!(view.instance_id, first);
        assert_eq!(view.z_index, EXPOSE_Z_INDEX_BASE);
        assert!(view.expose.is_some());
        assert!(!view.content_interactive);
    }

    #[test]
    fn minimized_windows_unmount_unless_kept() {
        let mut state = DesktopState::default();
        let mut windows = WindowRuntimeState::default();
        let finder = open(&mut state, &mut windows, "finder");
        let ipod = open(&mut state, &mut windows, "ipod");
        for instance_id in [finder, ipod] {
            reduce_desktop(
                &mut state,
                &mut windows,
                DesktopAction::RequestMinimize {
                    instance_id,
                    anchor: None,
                    now_ms: 0,
                },
            )
            .expect("minimize");
        }
        reduce_desktop(&mut state, &mut windows, DesktopAction::Tick { now_ms: 500 }).expect("tick");

        let visibility = |id| {
            window_presentation(&state, &windows, id, 500)
                .expect("window")
                .visibility
        };
        assert_eq!(visibility(finder), WindowVisibility::Unmounted);
        assert_eq!(visibility(ipod), WindowVisibility::Hidden);
        assert!(desktop_presentation(&state, &windows, 500).show_menu_bar);
    }

    #[test]
    fn menu_bar_belongs_to_the_foreground_app_on_mac_themes() {
        let mut state = DesktopState::default();
        let mut windows = WindowRuntimeState::default();
        open(&mut state, &mut windows, "finder");
        assert!(!desktop_presentation(&state, &windows, 0).show_menu_bar);

        state.environment.theme = ThemeId::Xp;
        assert!(desktop_presentation(&state, &windows, 0).show_menu_bar);
    }
}
