//! Browser environment queries and DOM-driven scheduling for the desktop runtime.

use leptos::*;
use platform_host::unix_time_ms_now;

#[cfg(target_arch = "wasm32")]
use crate::controller::GestureTarget;
use crate::{
    controller::ElementRole,
    model::{InstanceId, ShellEnvironment, Size, MOBILE_BREAKPOINT_PX},
    reducer::DesktopAction,
    runtime_context::DesktopRuntimeContext,
};

/// DOM attribute naming the chrome role of a window element.
pub const WINDOW_CHROME_ATTRIBUTE: &str = "data-window-chrome";
/// DOM attribute marking the window root; ancestor walks stop there.
pub const WINDOW_ROOT_ATTRIBUTE: &str = "data-window-root";
/// Widest viewport treated as a phone.
pub const PHONE_MAX_WIDTH_PX: i32 = 640;

const FALLBACK_VIEWPORT: Size = Size::new(1280, 800);

/// Role of one element, from its tag name, `role` attribute, and chrome attribute.
pub fn element_role(tag_name: &str, role: Option<&str>, chrome: Option<&str>) -> Option<ElementRole> {
    match chrome {
        Some("titlebar-controls") => return Some(ElementRole::TitlebarControls),
        Some("titlebar") => return Some(ElementRole::Titlebar),
        Some("content") => return Some(ElementRole::Content),
        _ => {}
    }
    if tag_name.eq_ignore_ascii_case("button") || role == Some("button") {
        return Some(ElementRole::Button);
    }
    None
}

/// Environment for a new viewport, keeping theme and dock settings.
pub fn environment_for_viewport(current: ShellEnvironment, viewport: Size) -> ShellEnvironment {
    ShellEnvironment {
        viewport,
        is_mobile: viewport.width < MOBILE_BREAKPOINT_PX,
        is_phone: viewport.width <= PHONE_MAX_WIDTH_PX,
        ..current
    }
}

/// Inner size of the browser window.
pub(super) fn viewport_size() -> Size {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let read = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>, fallback| {
                value
                    .ok()
                    .and_then(|value| value.as_f64())
                    .map_or(fallback, |value| value as i32)
            };
            return Size::new(
                read(window.inner_width(), FALLBACK_VIEWPORT.width),
                read(window.inner_height(), FALLBACK_VIEWPORT.height),
            );
        }
    }

    FALLBACK_VIEWPORT
}

/// Roles of `target` and its ancestors up to the window root, innermost first.
#[cfg(target_arch = "wasm32")]
pub fn gesture_target_from_dom(target: Option<web_sys::EventTarget>) -> GestureTarget {
    use wasm_bindgen::JsCast;

    let mut ancestors = Vec::new();
    let mut current = target.and_then(|target| target.dyn_into::<web_sys::Element>().ok());
    while let Some(element) = current {
        if let Some(role) = element_role(
            &element.tag_name(),
            element.get_attribute("role").as_deref(),
            element.get_attribute(WINDOW_CHROME_ATTRIBUTE).as_deref(),
        ) {
            ancestors.push(role);
        }
        if element.has_attribute(WINDOW_ROOT_ATTRIBUTE) {
            break;
        }
        current = element.parent_element();
    }
    GestureTarget { ancestors }
}

/// Leaves expose and focuses the picked window.
pub(super) fn select_exposed_window(runtime: DesktopRuntimeContext, instance_id: InstanceId) {
    runtime.dispatch_action(DesktopAction::SetExposeMode { enabled: false });
    runtime.dispatch_action(DesktopAction::BringToForeground {
        instance_id,
        now_ms: unix_time_ms_now(),
    });
}

/// Seeds the environment from the current viewport and follows window resizes.
pub(super) fn install_environment_listener(runtime: DesktopRuntimeContext) {
    let sync = move || {
        let current = runtime.state.get_untracked().environment;
        let environment = runtime.host.get_value().viewport_environment(current);
        if environment != current {
            runtime.dispatch_action(DesktopAction::SetEnvironment { environment });
        }
    };
    sync();

    #[cfg(target_arch = "wasm32")]
    {
        let handle = window_event_listener(ev::resize, move |_| sync());
        on_cleanup(move || handle.remove());
    }
}

/// Drives [`DesktopAction::Tick`] and the presentation clock while transitions are in flight.
///
/// Native builds have no frame source; callers dispatch ticks themselves.
pub(super) fn install_frame_clock(runtime: DesktopRuntimeContext) {
    create_effect(move |_| {
        let in_flight = runtime
            .windows
            .with(|windows| windows.next_deadline_ms().is_some());
        if in_flight {
            schedule_frame(runtime);
        }
    });
}

#[cfg(target_arch = "wasm32")]
fn schedule_frame(runtime: DesktopRuntimeContext) {
    request_animation_frame(move || {
        let now_ms = unix_time_ms_now();
        runtime.frame_clock.set(now_ms);
        let deadline = runtime
            .windows
            .with_untracked(|windows| windows.next_deadline_ms());
        match deadline {
            Some(deadline) if deadline <= now_ms => {
                runtime.dispatch_action(DesktopAction::Tick { now_ms });
            }
            Some(_) => schedule_frame(runtime),
            None => {}
        }
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn schedule_frame(runtime: DesktopRuntimeContext) {
    runtime.frame_clock.set(unix_time_ms_now());
}
