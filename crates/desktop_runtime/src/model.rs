//! Core data model for the desktop window runtime: instances, z-order, geometry primitives, and
//! the shell environment the geometry engine is evaluated against.

use desktop_app_contract::ApplicationId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::theme::ThemeId;

/// Viewport width (px) below which the shell switches to its mobile layout rules.
pub const MOBILE_BREAKPOINT_PX: i32 = 768;
/// Fallback window size when an app has no catalog entry.
pub const DEFAULT_WINDOW_WIDTH: i32 = 600;
/// Fallback window height when an app has no catalog entry.
pub const DEFAULT_WINDOW_HEIGHT: i32 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Opaque identifier of one running window instance.
pub struct InstanceId(pub u64);

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Window frame in viewport coordinates.
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn from_parts(position: Point, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    pub const fn position(self) -> Point {
        Point::new(self.x, self.y)
    }

    pub const fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Center point in fractional pixels.
    pub fn center(self) -> (f64, f64) {
        (
            f64::from(self.x) + f64::from(self.width) / 2.0,
            f64::from(self.y) + f64::from(self.height) / 2.0,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One running window instance as tracked by the registry.
pub struct InstanceRecord {
    pub instance_id: InstanceId,
    pub app_id: ApplicationId,
    pub is_open: bool,
    pub is_foreground: bool,
    pub is_minimized: bool,
    pub position: Point,
    pub size: Size,
    pub title: String,
    /// Opaque launch payload, replaced only through an explicit update.
    pub initial_data: Option<Value>,
}

impl InstanceRecord {
    pub fn rect(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }

    /// Open, not minimized: participates in expose and foreground promotion.
    pub fn is_visible(&self) -> bool {
        self.is_open && !self.is_minimized
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Optional per-dimension size bound.
pub struct SizeBound {
    pub width: Option<i32>,
    pub height: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Per-app window size constraints.
pub struct WindowConstraints {
    pub min_size: SizeBound,
    pub max_size: SizeBound,
    pub default_size: Size,
}

impl Default for WindowConstraints {
    fn default() -> Self {
        Self {
            min_size: SizeBound::default(),
            max_size: SizeBound::default(),
            default_size: Size::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Caller-supplied constraint override; every set field wins over the catalog value.
pub struct ConstraintOverride {
    pub min_width: Option<i32>,
    pub min_height: Option<i32>,
    pub max_width: Option<i32>,
    pub max_height: Option<i32>,
    pub default_size: Option<Size>,
}

impl WindowConstraints {
    /// Merges `overrides` field by field.
    pub fn merged(self, overrides: &ConstraintOverride) -> Self {
        Self {
            min_size: SizeBound {
                width: overrides.min_width.or(self.min_size.width),
                height: overrides.min_height.or(self.min_size.height),
            },
            max_size: SizeBound {
                width: overrides.max_width.or(self.max_size.width),
                height: overrides.max_height.or(self.max_size.height),
            },
            default_size: overrides.default_size.unwrap_or(self.default_size),
        }
    }

    /// Clamps `size` into `[min_size, max_size]`; the minimum wins if the bounds cross.
    pub fn clamp_size(&self, size: Size) -> Size {
        Size::new(
            clamp_dimension(size.width, self.min_size.width, self.max_size.width),
            clamp_dimension(size.height, self.min_size.height, self.max_size.height),
        )
    }
}

fn clamp_dimension(value: i32, min: Option<i32>, max: Option<i32>) -> i32 {
    let mut value = value;
    if let Some(max) = max {
        value = value.min(max);
    }
    if let Some(min) = min {
        value = value.max(min);
    }
    value.max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeEdge {
    pub const ALL: [Self; 8] = [
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthEast,
        Self::SouthWest,
    ];

    /// Handles rendered for the current layout; mobile has no north-west corner.
    pub fn available(is_mobile: bool) -> impl Iterator<Item = Self> {
        Self::ALL
            .into_iter()
            .filter(move |edge| !(is_mobile && *edge == Self::NorthWest))
    }

    /// True for the pure top/bottom edges that toggle height-only maximize on double-click.
    pub fn is_vertical_edge(self) -> bool {
        matches!(self, Self::North | Self::South)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Half-screen target highlighted while a drag hovers a viewport edge.
pub enum SnapZone {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Which desktop surface the shell shows.
pub enum DesktopMode {
    Classic,
    #[default]
    Globe,
}

impl DesktopMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Classic => Self::Globe,
            Self::Globe => Self::Classic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Host-provided environment the geometry engine evaluates against.
pub struct ShellEnvironment {
    pub theme: ThemeId,
    pub viewport: Size,
    pub dock_scale: f64,
    pub dock_hiding: bool,
    pub safe_area_bottom: i32,
    pub is_mobile: bool,
    pub is_phone: bool,
    pub embedded_shell: bool,
}

impl Default for ShellEnvironment {
    fn default() -> Self {
        Self::for_viewport(ThemeId::MacOsX, Size::new(1280, 800))
    }
}

impl ShellEnvironment {
    /// Environment for `viewport` with mobile detection derived from its width.
    pub fn for_viewport(theme: ThemeId, viewport: Size) -> Self {
        Self {
            theme,
            viewport,
            dock_scale: 1.0,
            dock_hiding: false,
            safe_area_bottom: 0,
            is_mobile: viewport.width < MOBILE_BREAKPOINT_PX,
            is_phone: false,
            embedded_shell: false,
        }
    }

    pub fn is_wide(&self) -> bool {
        self.viewport.width >= MOBILE_BREAKPOINT_PX
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Request to launch (or re-target) an application window.
pub struct LaunchRequest {
    pub app_id: ApplicationId,
    pub initial_data: Option<Value>,
    pub initial_path: Option<String>,
    pub title: Option<String>,
    pub constraints: ConstraintOverride,
    /// Skip the open animation (bulk restore).
    pub suppress_open_transition: bool,
    pub now_ms: u64,
}

impl LaunchRequest {
    pub fn new(app_id: ApplicationId) -> Self {
        Self {
            app_id,
            initial_data: None,
            initial_path: None,
            title: None,
            constraints: ConstraintOverride::default(),
            suppress_open_transition: false,
            now_ms: 0,
        }
    }

    pub fn with_initial_data(mut self, data: Value) -> Self {
        self.initial_data = Some(data);
        self
    }

    pub fn at(mut self, now_ms: u64) -> Self {
        self.now_ms = now_ms;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Per-app fold of all instances for consumers that predate multi-instance windows.
pub struct LegacyAppState {
    pub is_open: bool,
    pub is_foreground: bool,
    pub position: Point,
    pub size: Size,
    pub initial_data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Authoritative desktop state owned by the reducer.
pub struct DesktopState {
    pub next_instance_id: u64,
    /// Instances in launch (insertion) order.
    pub instances: Vec<InstanceRecord>,
    /// Stacking order, later = higher.
    pub z_order: Vec<InstanceId>,
    pub foreground: Option<InstanceId>,
    pub expose_mode: bool,
    pub environment: ShellEnvironment,
    pub desktop_mode: DesktopMode,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            next_instance_id: 1,
            instances: Vec::new(),
            z_order: Vec::new(),
            foreground: None,
            expose_mode: false,
            environment: ShellEnvironment::default(),
            desktop_mode: DesktopMode::default(),
        }
    }
}

impl DesktopState {
    pub fn with_environment(environment: ShellEnvironment) -> Self {
        Self {
            environment,
            ..Self::default()
        }
    }

    pub fn instance(&self, instance_id: InstanceId) -> Option<&InstanceRecord> {
        self.instances
            .iter()
            .find(|instance| instance.instance_id == instance_id)
    }

    pub fn instance_mut(&mut self, instance_id: InstanceId) -> Option<&mut InstanceRecord> {
        self.instances
            .iter_mut()
            .find(|instance| instance.instance_id == instance_id)
    }

    pub fn foreground_instance(&self) -> Option<&InstanceRecord> {
        self.foreground.and_then(|id| self.instance(id))
    }

    /// Open, non-minimized instances in registry order.
    pub fn visible_instances(&self) -> impl Iterator<Item = &InstanceRecord> {
        self.instances.iter().filter(|instance| instance.is_visible())
    }

    pub fn instances_of<'a>(
        &'a self,
        app_id: &'a ApplicationId,
    ) -> impl Iterator<Item = &'a InstanceRecord> + 'a {
        self.instances
            .iter()
            .filter(move |instance| &instance.app_id == app_id)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn constraint_override_wins_field_by_field() {
        let base = WindowConstraints {
            min_size: SizeBound {
                width: Some(300),
                height: Some(200),
            },
            max_size: SizeBound {
                width: None,
                height: Some(900),
            },
            default_size: Size::new(640, 480),
        };
        let merged = base.merged(&ConstraintOverride {
            min_height: Some(250),
            max_width: Some(1000),
            ..ConstraintOverride::default()
        });

        assert_eq!(
            merged,
            WindowConstraints {
                min_size: SizeBound {
                    width: Some(300),
                    height: Some(250),
                },
                max_size: SizeBound {
                    width: Some(1000),
                    height: Some(900),
                },
                default_size: Size::new(640, 480),
            }
        );
    }

    #[test]
    fn clamp_size_is_inclusive_and_min_wins_on_crossed_bounds() {
        let constraints = WindowConstraints {
            min_size: SizeBound {
                width: Some(300),
                height: Some(500),
            },
            max_size: SizeBound {
                width: Some(800),
                height: Some(400),
            },
            default_size: Size::new(400, 300),
        };
        assert_eq!(constraints.clamp_size(Size::new(300, 10)), Size::new(300, 500));
        assert_eq!(constraints.clamp_size(Size::new(900, 900)), Size::new(800, 500));
    }

    #[test]
    fn mobile_layout_drops_north_west_handle() {
        assert_eq!(ResizeEdge::available(false).count(), 8);
        assert!(ResizeEdge::available(true).all(|edge| edge != ResizeEdge::NorthWest));
        assert_eq!(ResizeEdge::available(true).count(), 7);
    }

    #[test]
    fn desktop_mode_serializes_lowercase_and_defaults_to_globe() {
        assert_eq!(DesktopMode::default(), DesktopMode::Globe);
        assert_eq!(
            serde_json::to_string(&DesktopMode::Classic).expect("serialize"),
            "\"classic\""
        );
        assert_eq!(DesktopMode::Classic.toggled(), DesktopMode::Globe);
    }

    #[test]
    fn environment_detects_mobile_from_viewport_width() {
        assert!(ShellEnvironment::for_viewport(ThemeId::Xp, Size::new(390, 844)).is_mobile);
        assert!(!ShellEnvironment::for_viewport(ThemeId::Xp, Size::new(768, 844)).is_mobile);
    }
}
