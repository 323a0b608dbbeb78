//! On-screen anchor lookup for dock icons and taskbar items.
//!
//! Minimize and restore transitions fly toward (or out of) the chrome element that represents a
//! window. The chrome owns those elements, so the runtime asks through [`AnchorResolver`] and
//! falls back to its own default point when nothing answers.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use desktop_app_contract::{ApplicationId, InstanceRuntimeId};

/// Viewport-space point in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl ScreenPoint {
    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Chrome element a window can be anchored to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnchorTarget {
    /// Dock icon for an application (macOS-style themes).
    DockIcon(ApplicationId),
    /// Taskbar button for one instance (Windows-style themes).
    TaskbarItem(InstanceRuntimeId),
}

/// Resolves the center of a chrome element on screen.
pub trait AnchorResolver {
    /// Returns the element center, or `None` when it is not currently rendered.
    fn resolve_anchor(&self, target: &AnchorTarget) -> Option<ScreenPoint>;
}

/// Resolver for hosts without dock or taskbar chrome.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnchorResolver;

impl AnchorResolver for NoopAnchorResolver {
    fn resolve_anchor(&self, _target: &AnchorTarget) -> Option<ScreenPoint> {
        None
    }
}

/// Resolver backed by positions the chrome registers as it lays itself out.
#[derive(Debug, Clone, Default)]
pub struct MemoryAnchorResolver {
    inner: Rc<RefCell<HashMap<AnchorTarget, ScreenPoint>>>,
}

impl MemoryAnchorResolver {
    /// Records (or moves) the on-screen center of a chrome element.
    pub fn register(&self, target: AnchorTarget, center: ScreenPoint) {
        self.inner.borrow_mut().insert(target, center);
    }

    /// Forgets a chrome element, e.g. when its dock icon is removed.
    pub fn unregister(&self, target: &AnchorTarget) {
        self.inner.borrow_mut().remove(target);
    }
}

impl AnchorResolver for MemoryAnchorResolver {
    fn resolve_anchor(&self, target: &AnchorTarget) -> Option<ScreenPoint> {
        self.inner.borrow().get(target).copied()
    }
}
