//! Pure window-geometry helpers: maximize/restore targets, snap zones, drag and resize clamping,
//! and the expose grid.
//!
//! Nothing here reads or writes runtime state; every function is evaluated against an explicit
//! [`ShellEnvironment`] and the app's [`WindowConstraints`].

use serde::{Deserialize, Serialize};

use crate::{
    model::{Point, Rect, ResizeEdge, ShellEnvironment, Size, SnapZone, WindowConstraints},
    theme::compute_insets,
};

/// Fraction of the viewport width on each side that arms a snap zone during drag.
pub const SNAP_EDGE_RATIO: f64 = 0.1;
/// Tolerance (px) for treating a window as already full-height.
pub const FULL_HEIGHT_TOLERANCE_PX: i32 = 5;
/// Minimum top offset used when re-centering a restored window.
pub const RESTORE_MIN_TOP_PX: i32 = 30;
/// Horizontal strip of a dragged window that must stay on screen.
pub const MIN_VISIBLE_WIDTH_PX: i32 = 64;
/// Vertical strip (roughly a titlebar) that must stay above the bottom inset.
pub const MIN_VISIBLE_HEIGHT_PX: i32 = 24;
/// Outer padding of the expose grid.
pub const EXPOSE_PADDING_PX: f64 = 60.0;
/// Gap between expose grid cells.
pub const EXPOSE_GAP_PX: f64 = 24.0;
/// Column cap for the expose grid on mobile viewports.
pub const EXPOSE_MOBILE_MAX_COLUMNS: usize = 2;

/// Offset between consecutive launches so new windows do not stack exactly.
pub const LAUNCH_CASCADE_STEP_PX: i32 = 24;
/// Number of cascade steps before placement wraps back to center.
pub const LAUNCH_CASCADE_SLOTS: usize = 8;

fn available_height(env: &ShellEnvironment) -> i32 {
    compute_insets(env).available_height(env.viewport.height)
}

fn max_height_target(env: &ShellEnvironment, constraints: &WindowConstraints) -> i32 {
    let available = available_height(env);
    constraints
        .max_size
        .height
        .map_or(available, |max| available.min(max))
}

/// Initial frame of a newly launched window.
///
/// Wide viewports center the default size between the insets and cascade by `cascade` steps;
/// narrow ones pin the window under the menu bar at full width.
pub fn launch_rect(env: &ShellEnvironment, constraints: &WindowConstraints, cascade: usize) -> Rect {
    let insets = compute_insets(env);
    let available = insets.available_height(env.viewport.height);
    let size = constraints.clamp_size(constraints.default_size);
    if !env.is_wide() {
        return Rect::new(
            0,
            insets.top_inset,
            env.viewport.width,
            size.height.min(available.max(1)),
        );
    }
    let step = LAUNCH_CASCADE_STEP_PX * (cascade % LAUNCH_CASCADE_SLOTS) as i32;
    let position = Point::new(
        ((env.viewport.width - size.width) / 2).max(0) + step,
        insets.top_inset + ((available - size.height) / 2).max(0) + step,
    );
    Rect::from_parts(clamp_drag_position(env, position, size), size)
}

/// Target frame of a full maximize.
///
/// Narrow viewports take the full width at `x = 0`; wide ones honor `max_width` and center.
pub fn maximize_rect(env: &ShellEnvironment, constraints: &WindowConstraints) -> Rect {
    let vw = env.viewport.width;
    let width = if env.is_wide() {
        constraints.max_size.width.map_or(vw, |max| vw.min(max))
    } else {
        vw
    };
    let x = if env.is_wide() { (vw - width) / 2 } else { 0 };
    Rect::new(
        x,
        compute_insets(env).top_inset,
        width,
        max_height_target(env, constraints),
    )
}

/// Frame restored from a full maximize: the default size, re-centered on wide viewports.
///
/// Narrow viewports keep `current` as the position.
pub fn restore_rect(env: &ShellEnvironment, constraints: &WindowConstraints, current: Point) -> Rect {
    let size = constraints.default_size;
    let position = if env.is_wide() {
        Point::new(
            ((env.viewport.width - size.width) / 2).max(0),
            ((env.viewport.height - size.height) / 2).max(RESTORE_MIN_TOP_PX),
        )
    } else {
        current
    };
    Rect::from_parts(position, size)
}

/// Frame of a height-only maximize: width and x untouched, y moved under the menu bar.
pub fn full_height_rect(env: &ShellEnvironment, constraints: &WindowConstraints, current: Rect) -> Rect {
    Rect {
        y: compute_insets(env).top_inset,
        height: max_height_target(env, constraints),
        ..current
    }
}

/// Whether `height` already fills the space between the insets.
pub fn is_full_height(env: &ShellEnvironment, height: i32) -> bool {
    (height - available_height(env)).abs() < FULL_HEIGHT_TOLERANCE_PX
}

/// Snap zone armed by a pointer at `pointer_x`, or `None`. Mobile layouts never snap.
pub fn snap_zone_for_pointer(env: &ShellEnvironment, pointer_x: i32) -> Option<SnapZone> {
    if env.is_mobile {
        return None;
    }
    let vw = f64::from(env.viewport.width);
    let edge = vw * SNAP_EDGE_RATIO;
    let x = f64::from(pointer_x);
    if x < edge {
        Some(SnapZone::Left)
    } else if x > vw - edge {
        Some(SnapZone::Right)
    } else {
        None
    }
}

/// Half-screen frame for `zone`, spanning the full height between the insets.
pub fn snap_rect(env: &ShellEnvironment, zone: SnapZone) -> Rect {
    let insets = compute_insets(env);
    let half = env.viewport.width / 2;
    let x = match zone {
        SnapZone::Left => 0,
        SnapZone::Right => half,
    };
    Rect::new(
        x,
        insets.top_inset,
        half,
        insets.available_height(env.viewport.height),
    )
}

/// Clamps a dropped window so its titlebar stays reachable.
///
/// The top edge never rises above the menu bar; a strip of the window stays inside the viewport
/// horizontally and above the bottom inset.
pub fn clamp_drag_position(env: &ShellEnvironment, position: Point, size: Size) -> Point {
    let insets = compute_insets(env);
    let vw = env.viewport.width;
    let min_x = MIN_VISIBLE_WIDTH_PX.min(size.width) - size.width;
    let max_x = (vw - MIN_VISIBLE_WIDTH_PX.min(size.width)).max(min_x);
    let min_y = insets.top_inset;
    let max_y = (env.viewport.height - insets.bottom_inset - MIN_VISIBLE_HEIGHT_PX).max(min_y);
    Point::new(position.x.clamp(min_x, max_x), position.y.clamp(min_y, max_y))
}

/// Applies a pointer delta to `start` for `edge`, clamped to `constraints`.
///
/// The edge opposite the dragged one stays anchored even when the size hits a bound.
pub fn resize_rect(
    start: Rect,
    edge: ResizeEdge,
    dx: i32,
    dy: i32,
    constraints: &WindowConstraints,
) -> Rect {
    let (grow_w, grow_h, moves_left, moves_top) = match edge {
        ResizeEdge::East => (dx, 0, false, false),
        ResizeEdge::West => (-dx, 0, true, false),
        ResizeEdge::South => (0, dy, false, false),
        ResizeEdge::North => (0, -dy, false, true),
        ResizeEdge::NorthEast => (dx, -dy, false, true),
        ResizeEdge::NorthWest => (-dx, -dy, true, true),
        ResizeEdge::SouthEast => (dx, dy, false, false),
        ResizeEdge::SouthWest => (-dx, dy, true, false),
    };
    let size = constraints.clamp_size(Size::new(start.width + grow_w, start.height + grow_h));
    let x = if moves_left {
        start.x + start.width - size.width
    } else {
        start.x
    };
    let y = if moves_top {
        start.y + start.height - size.height
    } else {
        start.y
    };
    Rect::new(x, y, size.width, size.height)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Cell layout of the expose overlay for a given window count.
pub struct ExposeGrid {
    pub count: usize,
    pub columns: usize,
    pub rows: usize,
    pub cell_width: f64,
    pub cell_height: f64,
    pub padding: f64,
    pub gap: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Translation (from the stored frame) plus uniform scale placing a window in its cell.
pub struct ExposeTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

/// Lays out `count` windows: `ceil(sqrt(count))` columns (capped on mobile), as many rows as needed.
pub fn expose_grid(count: usize, viewport: Size, padding: f64, gap: f64, is_mobile: bool) -> ExposeGrid {
    let count_f = count.max(1) as f64;
    let mut columns = count_f.sqrt().ceil() as usize;
    if is_mobile {
        columns = columns.min(EXPOSE_MOBILE_MAX_COLUMNS);
    }
    let columns = columns.max(1);
    let rows = count.max(1).div_ceil(columns);
    let usable_w = (f64::from(viewport.width) - 2.0 * padding - gap * (columns as f64 - 1.0)).max(1.0);
    let usable_h = (f64::from(viewport.height) - 2.0 * padding - gap * (rows as f64 - 1.0)).max(1.0);
    ExposeGrid {
        count,
        columns,
        rows,
        cell_width: usable_w / columns as f64,
        cell_height: usable_h / rows as f64,
        padding,
        gap,
    }
}

/// Transform moving the window `frame` into cell `index` of `grid`.
///
/// A partially filled last row is centered horizontally.
pub fn expose_transform(frame: Rect, index: usize, grid: &ExposeGrid) -> ExposeTransform {
    let row = index / grid.columns;
    let column = index % grid.columns;
    let in_last_row = row + 1 == grid.rows;
    let items_in_row = if in_last_row {
        grid.count - row * grid.columns
    } else {
        grid.columns
    };
    let row_offset = (grid.columns - items_in_row.min(grid.columns)) as f64
        * (grid.cell_width + grid.gap)
        / 2.0;

    let cell_center_x = grid.padding
        + row_offset
        + column as f64 * (grid.cell_width + grid.gap)
        + grid.cell_width / 2.0;
    let cell_center_y =
        grid.padding + row as f64 * (grid.cell_height + grid.gap) + grid.cell_height / 2.0;

    let width = f64::from(frame.width.max(1));
    let height = f64::from(frame.height.max(1));
    let scale = (grid.cell_width / width)
        .min(grid.cell_height / height)
        .min(1.0);
    let (center_x, center_y) = frame.center();

    ExposeTransform {
        translate_x: cell_center_x - center_x,
        translate_y: cell_center_y - center_y,
        scale,
    }
}
