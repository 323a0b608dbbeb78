//! Host-bundle and strategy models for browser and embedded-shell composition.

use std::rc::Rc;

use crate::{
    AnchorResolver, FeedbackService, MemoryAnchorResolver, MemoryPrefsStore, NoopFeedbackService,
    PrefsStore,
};

/// Stable host strategy selected for the current build/runtime composition path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStrategy {
    /// Plain browser tab.
    Browser,
    /// Embedded desktop shell (Tauri webview) that draws its own native menu bar.
    DesktopTauri,
    /// No real host, e.g. unit tests and server-side tooling.
    Headless,
}

impl HostStrategy {
    /// Returns a stable string token for diagnostics and runtime inspection.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::DesktopTauri => "desktop-tauri",
            Self::Headless => "headless",
        }
    }

    /// Returns whether the shell runs inside an embedded desktop webview.
    pub const fn is_embedded_shell(self) -> bool {
        matches!(self, Self::DesktopTauri)
    }
}

/// Runtime-selected host service bundle injected into the desktop window runtime.
///
/// Environment-specific service selection happens before this bundle crosses into
/// `desktop_runtime`.
#[derive(Clone)]
pub struct HostServices {
    /// Lightweight typed preference store (launch paths, desktop-mode and globe snapshots).
    pub prefs: Rc<dyn PrefsStore>,
    /// Dock/taskbar anchor lookup for minimize and restore transitions.
    pub anchors: Rc<dyn AnchorResolver>,
    /// Sound and vibration hooks.
    pub feedback: Rc<dyn FeedbackService>,
    /// Stable strategy identifier for diagnostics and inset policy.
    pub host_strategy: HostStrategy,
}

impl HostServices {
    /// In-memory bundle with silent feedback, used off-browser.
    pub fn headless() -> Self {
        Self {
            prefs: Rc::new(MemoryPrefsStore::default()),
            anchors: Rc::new(MemoryAnchorResolver::default()),
            feedback: Rc::new(NoopFeedbackService),
            host_strategy: HostStrategy::Headless,
        }
    }
}
