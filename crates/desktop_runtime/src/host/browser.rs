//! Browser adapters for the host service contracts: `localStorage` prefs, DOM anchors, and Web
//! Audio/vibration feedback.
//!
//! Chrome elements opt into anchor lookup by rendering `data-window-anchor` with the value from
//! [`anchor_attribute_value`].

use platform_host::{AnchorTarget, HostServices};
#[cfg(target_arch = "wasm32")]
use platform_host::{
    AnchorResolver, FeedbackService, HostStrategy, PrefsStore, PrefsStoreFuture, ScreenPoint,
    SoundEffect, VibrationPattern,
};

/// DOM attribute carrying an anchor token.
pub const ANCHOR_ATTRIBUTE: &str = "data-window-anchor";

/// Token identifying `target` on the element that represents it.
pub fn anchor_attribute_value(target: &AnchorTarget) -> String {
    match target {
        AnchorTarget::DockIcon(app_id) => format!("dock:{}", app_id.as_str()),
        AnchorTarget::TaskbarItem(instance_id) => format!("taskbar:{instance_id}"),
    }
}

/// Path of the audio asset for a UI sound.
pub fn sound_asset_path(token: &str) -> String {
    format!("/sounds/{token}.mp3")
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
/// Preference store backed by `window.localStorage`.
pub struct WebPrefsStore;

#[cfg(target_arch = "wasm32")]
impl WebPrefsStore {
    fn save_json(self, key: &str, raw_json: &str) -> Result<(), String> {
        let storage = local_storage().ok_or_else(|| "localStorage unavailable".to_string())?;
        storage
            .set_item(key, raw_json)
            .map_err(|e| format!("localStorage set_item failed: {e:?}"))
    }

    fn delete_json(self, key: &str) -> Result<(), String> {
        let storage = local_storage().ok_or_else(|| "localStorage unavailable".to_string())?;
        storage
            .remove_item(key)
            .map_err(|e| format!("localStorage remove_item failed: {e:?}"))
    }
}

#[cfg(target_arch = "wasm32")]
impl PrefsStore for WebPrefsStore {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { Ok(local_storage().and_then(|storage| storage.get_item(key).ok().flatten())) })
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        let store = *self;
        Box::pin(async move { store.save_json(key, raw_json) })
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        let store = *self;
        Box::pin(async move { store.delete_json(key) })
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
/// Resolves anchors to the center of the element tagged with [`ANCHOR_ATTRIBUTE`].
pub struct DomAnchorResolver;

#[cfg(target_arch = "wasm32")]
impl AnchorResolver for DomAnchorResolver {
    fn resolve_anchor(&self, target: &AnchorTarget) -> Option<ScreenPoint> {
        let document = web_sys::window()?.document()?;
        let selector = format!(
            "[{ANCHOR_ATTRIBUTE}=\"{}\"]",
            anchor_attribute_value(target)
        );
        let element = document.query_selector(&selector).ok().flatten()?;
        let rect = element.get_bounding_client_rect();
        Some(ScreenPoint::new(
            rect.left() + rect.width() / 2.0,
            rect.top() + rect.height() / 2.0,
        ))
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
/// Plays sound assets through `HTMLAudioElement` and buzzes through `navigator.vibrate`.
pub struct WebFeedbackService;

#[cfg(target_arch = "wasm32")]
impl FeedbackService for WebFeedbackService {
    fn play_sound(&self, sound: SoundEffect) {
        let Ok(audio) = web_sys::HtmlAudioElement::new_with_src(&sound_asset_path(sound.token()))
        else {
            return;
        };
        // Autoplay policies reject playback before the first user gesture.
        let _ = audio.play();
    }

    fn vibrate(&self, pattern: VibrationPattern) {
        if let Some(window) = web_sys::window() {
            let _ = window.navigator().vibrate_with_duration(pattern.duration_ms);
        }
    }
}

/// Host services for the current target: browser adapters on wasm, in-memory ones elsewhere.
pub fn browser_host_services() -> HostServices {
    #[cfg(target_arch = "wasm32")]
    {
        use std::rc::Rc;

        HostServices {
            prefs: Rc::new(WebPrefsStore),
            anchors: Rc::new(DomAnchorResolver),
            feedback: Rc::new(WebFeedbackService),
            host_strategy: detect_host_strategy(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        HostServices::headless()
    }
}

#[cfg(target_arch = "wasm32")]
fn detect_host_strategy() -> HostStrategy {
    let embedded = web_sys::window()
        .and_then(|window| js_sys::Reflect::get(&window, &"__TAURI__".into()).ok())
        .is_some_and(|value| !value.is_undefined());
    if embedded {
        HostStrategy::DesktopTauri
    } else {
        HostStrategy::Browser
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::ApplicationId;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn anchor_tokens_distinguish_dock_and_taskbar() {
        assert_eq!(
            anchor_attribute_value(&AnchorTarget::DockIcon(ApplicationId::trusted("ipod"))),
            "dock:ipod"
        );
        assert_eq!(
            anchor_attribute_value(&AnchorTarget::TaskbarItem(12)),
            "taskbar:12"
        );
    }

    #[test]
    fn sound_assets_live_under_sounds() {
        assert_eq!(sound_asset_path("window-open"), "/sounds/window-open.mp3");
    }

    #[test]
    fn native_builds_fall_back_to_headless_services() {
        assert!(!browser_host_services().host_strategy.is_embedded_shell());
    }
}
