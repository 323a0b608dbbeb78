//! Theme identifiers and the chrome metrics the geometry engine needs from them.
//!
//! Only numbers live here. Colors, fonts, and chrome rendering belong to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::model::ShellEnvironment;

/// Menu bar height when an embedded desktop shell draws a native macOS-style bar.
pub const EMBEDDED_MENU_BAR_HEIGHT: i32 = 32;
/// System 7 menu bar height.
pub const SYSTEM7_MENU_BAR_HEIGHT: i32 = 30;
/// Mac OS X and Meadow menu bar height.
pub const MAC_MENU_BAR_HEIGHT: i32 = 36;
/// XP/98 taskbar height.
pub const WINDOWS_TASKBAR_HEIGHT: i32 = 30;
/// Unscaled dock height for dock-bearing themes.
pub const DOCK_BASE_HEIGHT: f64 = 56.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeId {
    System7,
    #[serde(rename = "macosx")]
    MacOsX,
    Xp,
    Win98,
    Meadow,
}

impl ThemeId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System7 => "system7",
            Self::MacOsX => "macosx",
            Self::Xp => "xp",
            Self::Win98 => "win98",
            Self::Meadow => "meadow",
        }
    }

    /// XP and 98 use a bottom taskbar instead of a menu bar and dock.
    pub const fn is_windows_like(self) -> bool {
        matches!(self, Self::Xp | Self::Win98)
    }

    pub const fn has_dock(self) -> bool {
        matches!(self, Self::MacOsX | Self::Meadow)
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            "system7" => Some(Self::System7),
            "macosx" => Some(Self::MacOsX),
            "xp" => Some(Self::Xp),
            "win98" => Some(Self::Win98),
            "meadow" => Some(Self::Meadow),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Screen space reserved by shell chrome, derived from [`ShellEnvironment`] and never stored.
pub struct Insets {
    pub menu_bar_height: i32,
    pub taskbar_height: i32,
    pub dock_height: i32,
    pub safe_area_bottom: i32,
    pub top_inset: i32,
    pub bottom_inset: i32,
}

impl Insets {
    /// Vertical space left for windows in a viewport of `viewport_height`.
    pub fn available_height(&self, viewport_height: i32) -> i32 {
        viewport_height - self.top_inset - self.bottom_inset
    }
}

fn menu_bar_height(env: &ShellEnvironment) -> i32 {
    let embedded_mac_bar =
        env.embedded_shell && matches!(env.theme, ThemeId::MacOsX | ThemeId::System7);
    if embedded_mac_bar {
        return EMBEDDED_MENU_BAR_HEIGHT;
    }
    match env.theme {
        ThemeId::System7 => SYSTEM7_MENU_BAR_HEIGHT,
        ThemeId::MacOsX | ThemeId::Meadow => MAC_MENU_BAR_HEIGHT,
        ThemeId::Xp | ThemeId::Win98 => 0,
    }
}

/// Computes the chrome insets for `env`.
///
/// `top = menu bar`, `bottom = taskbar + dock + safe area`. A hiding dock reserves nothing.
pub fn compute_insets(env: &ShellEnvironment) -> Insets {
    let menu_bar_height = menu_bar_height(env);
    let taskbar_height = if env.theme.is_windows_like() {
        WINDOWS_TASKBAR_HEIGHT
    } else {
        0
    };
    let dock_height = if env.theme.has_dock() && !env.dock_hiding {
        (DOCK_BASE_HEIGHT * env.dock_scale).round() as i32
    } else {
        0
    };
    let safe_area_bottom = env.safe_area_bottom.max(0);

    Insets {
        menu_bar_height,
        taskbar_height,
        dock_height,
        safe_area_bottom,
        top_inset: menu_bar_height,
        bottom_inset: taskbar_height + dock_height + safe_area_bottom,
    }
}

/// Whether the desktop-level menu bar (or XP/98 taskbar) is shown.
///
/// Mac-style themes hand the menu bar to the foreground app; expose always shows the desktop bar.
pub fn show_desktop_menu_bar(theme: ThemeId, has_foreground: bool, expose_mode: bool) -> bool {
    theme.is_windows_like() || !has_foreground || expose_mode
}
