//! Shared contract types between the desktop window runtime and the apps it hosts.
//!
//! Apps never see the instance registry directly. They are identified by an [`ApplicationId`],
//! declare how their windows behave through an [`AppWindowPolicy`], and receive shell-originated
//! notifications as [`AppShellEvent`] values.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable identifier for a runtime-managed window instance, as exposed to apps.
pub type InstanceRuntimeId = u64;

/// Stable identifier for an application type (`finder`, `internet-explorer`, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(String);

impl ApplicationId {
    /// Returns an app identifier when `raw` is a lowercase kebab-case token.
    pub fn new(raw: impl Into<String>) -> Result<Self, String> {
        let raw = raw.into();
        if is_valid_application_id(&raw) {
            Ok(Self(raw))
        } else {
            Err(format!(
                "invalid application id `{raw}`; expected lowercase kebab-case"
            ))
        }
    }

    /// Returns the string form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Creates an id without validation for compile-time/runtime trusted constants.
    pub fn trusted(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn is_valid_application_id(raw: &str) -> bool {
    if raw.is_empty() || raw.len() > 64 {
        return false;
    }
    let bytes = raw.as_bytes();
    if !bytes[0].is_ascii_lowercase() || raw.ends_with('-') || raw.contains("--") {
        return false;
    }
    bytes
        .iter()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
}

/// Per-app window behavior flags consulted by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppWindowPolicy {
    /// Launching again foregrounds the existing instance instead of opening another one.
    pub single_instance: bool,
    /// Content stays mounted (visually hidden) while minimized, e.g. media players.
    pub keep_mounted_when_minimized: bool,
    /// Close requests are handed to the app for confirmation before the window closes.
    pub intercept_close: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Lifecycle events emitted by the desktop window runtime.
pub enum AppLifecycleEvent {
    /// Window was launched.
    Opened,
    /// Window became the foreground instance.
    Focused,
    /// Window finished minimizing into the dock/taskbar.
    Minimized,
    /// Window started restoring from the dock/taskbar.
    Restored,
    /// Window close transition started.
    Closing,
    /// Window close transition completed and the instance was removed.
    Closed,
}

impl AppLifecycleEvent {
    /// Returns a stable string token for debugging hooks.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Opened => "opened",
            Self::Focused => "focused",
            Self::Minimized => "minimized",
            Self::Restored => "restored",
            Self::Closing => "closing",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Shell-to-app notifications consumed by app content renderers.
pub enum AppShellEvent {
    /// A launch targeted an app that already had an open instance and carried new launch data.
    ///
    /// The runtime does not interpret `initial_data`; the app decides what to do with it.
    UpdateExisting {
        /// App that was launched again.
        app_id: ApplicationId,
        /// Instance that was foregrounded by the launch.
        instance_id: InstanceRuntimeId,
        /// Launch payload supplied by the caller.
        initial_data: Value,
    },
    /// The user asked to close a window whose app intercepts closes.
    ///
    /// The app shows its confirmation UI and later asks the runtime to perform the close.
    CloseRequested {
        /// Instance whose close was intercepted.
        instance_id: InstanceRuntimeId,
    },
    /// Lifecycle notification for one instance.
    Lifecycle {
        /// Instance the event belongs to.
        instance_id: InstanceRuntimeId,
        /// Lifecycle stage reached.
        event: AppLifecycleEvent,
    },
}

impl AppShellEvent {
    /// Returns the instance the event is addressed to.
    pub fn instance_id(&self) -> InstanceRuntimeId {
        match self {
            Self::UpdateExisting { instance_id, .. }
            | Self::CloseRequested { instance_id }
            | Self::Lifecycle { instance_id, .. } => *instance_id,
        }
    }
}
