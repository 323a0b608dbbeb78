//! Desktop window instance and layout runtime.
//!
//! [`reduce_desktop`] owns the instance registry, per-window geometry controllers, and transition
//! machines; [`DesktopProvider`] wraps it in Leptos signals and runs its effects against the
//! injected host services.

pub mod app_runtime;
pub mod apps;
pub mod controller;
pub mod effect_executor;
pub mod expose;
pub mod geometry;
pub mod globe;
pub mod host;
pub mod legacy;
pub mod model;
pub mod persistence;
pub mod presentation;
pub mod reducer;
pub mod registry;
pub mod runtime_context;
pub mod theme;
pub mod transition;

pub use host::{browser::browser_host_services, DesktopHostContext};
pub use model::*;
pub use presentation::{desktop_presentation, window_presentation, DesktopPresentation, WindowPresentation};
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect, WindowRuntimeState};
pub use runtime_context::{provide_desktop_runtime, use_desktop_runtime, DesktopProvider, DesktopRuntimeContext};
