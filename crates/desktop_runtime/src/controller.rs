//! Per-window geometry controller: turns pointer gestures into live geometry and registry commits.
//!
//! Live geometry changes on every pointer move but only reaches the registry when a gesture
//! ends, so a drag produces one registry write instead of one per frame. All timing is driven by
//! caller-supplied millisecond stamps.

use platform_host::{FeedbackEvent, SoundEffect, VibrationPattern};
use serde::{Deserialize, Serialize};

use crate::{
    geometry::{
        clamp_drag_position, full_height_rect, is_full_height, maximize_rect, resize_rect,
        restore_rect, snap_rect, snap_zone_for_pointer,
    },
    model::{InstanceId, Point, Rect, ResizeEdge, ShellEnvironment, Size, SnapZone, WindowConstraints},
    theme::ThemeId,
};

/// Minimum spacing between two full-maximize toggles.
pub const MAXIMIZE_COOLDOWN_MS: u64 = 300;
/// Two titlebar taps closer than this count as a double tap.
pub const DOUBLE_TAP_WINDOW_MS: u64 = 300;
/// Horizontal travel that turns a phone titlebar swipe into app navigation.
pub const SWIPE_THRESHOLD_PX: i32 = 100;
/// Hit extent of the resize handle currently being dragged.
pub const ACTIVE_RESIZE_HANDLE_PX: i32 = 200;
/// Resting resize handle extent on desktop layouts.
pub const DESKTOP_RESIZE_HANDLE_PX: i32 = 8;

/// Resting hit extent of a resize handle for the given theme and layout.
pub fn resize_handle_extent(edge: ResizeEdge, theme: ThemeId, is_mobile: bool) -> i32 {
    if !is_mobile {
        return DESKTOP_RESIZE_HANDLE_PX;
    }
    match edge {
        ResizeEdge::North => match theme {
            ThemeId::Xp | ThemeId::Win98 => 16,
            ThemeId::MacOsX => 8,
            ThemeId::System7 | ThemeId::Meadow => 32,
        },
        ResizeEdge::South => 24,
        _ => DESKTOP_RESIZE_HANDLE_PX,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Chrome role of an element between a pointer target and the window root.
pub enum ElementRole {
    /// Container of the close/minimize/zoom buttons.
    TitlebarControls,
    /// A `button` or `role="button"` element.
    Button,
    Titlebar,
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Roles of the event target and its ancestors, innermost first.
pub struct GestureTarget {
    pub ancestors: Vec<ElementRole>,
}

impl GestureTarget {
    pub fn titlebar() -> Self {
        Self {
            ancestors: vec![ElementRole::Titlebar],
        }
    }

    pub fn titlebar_control() -> Self {
        Self {
            ancestors: vec![
                ElementRole::Button,
                ElementRole::TitlebarControls,
                ElementRole::Titlebar,
            ],
        }
    }

    /// Pointer events from the titlebar buttons must never start window gestures.
    pub fn is_from_titlebar_controls(&self) -> bool {
        self.ancestors
            .iter()
            .any(|role| matches!(role, ElementRole::TitlebarControls | ElementRole::Button))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigateDirection {
    Next,
    Previous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureSession {
    Drag {
        pointer_start: Point,
        rect_start: Rect,
        tracks_swipe: bool,
    },
    Resize {
        edge: ResizeEdge,
        pointer_start: Point,
        rect_start: Rect,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
/// What a gesture step asks the runtime to do.
pub struct GestureOutcome {
    /// Geometry to write back to the registry.
    pub commit: Option<Rect>,
    pub feedback: Vec<FeedbackEvent>,
    pub navigate: Option<NavigateDirection>,
}

impl GestureOutcome {
    fn commit(rect: Rect) -> Self {
        Self {
            commit: Some(rect),
            ..Self::default()
        }
    }

    fn with_sound(mut self, sound: SoundEffect) -> Self {
        self.feedback.push(FeedbackEvent::Sound(sound));
        self
    }

    fn with_vibration(mut self, pattern: VibrationPattern) -> Self {
        self.feedback.push(FeedbackEvent::Vibration(pattern));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.commit.is_none() && self.feedback.is_empty() && self.navigate.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Live geometry and gesture state of one window.
pub struct WindowGeometryController {
    instance_id: InstanceId,
    constraints: WindowConstraints,
    live: Rect,
    gesture: Option<GestureSession>,
    snap_zone: Option<SnapZone>,
    is_maximized: bool,
    is_full_height: bool,
    last_toggle_ms: Option<u64>,
    last_tap_ms: Option<u64>,
}

impl WindowGeometryController {
    pub fn new(instance_id: InstanceId, constraints: WindowConstraints, frame: Rect) -> Self {
        Self {
            instance_id,
            constraints,
            live: frame,
            gesture: None,
            snap_zone: None,
            is_maximized: false,
            is_full_height: false,
            last_toggle_ms: None,
            last_tap_ms: None,
        }
    }

    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    pub fn constraints(&self) -> &WindowConstraints {
        &self.constraints
    }

    /// Geometry to render right now, including uncommitted gesture movement.
    pub fn frame(&self) -> Rect {
        self.live
    }

    pub fn snap_zone(&self) -> Option<SnapZone> {
        self.snap_zone
    }

    pub fn is_maximized(&self) -> bool {
        self.is_maximized
    }

    /// Whether the last edge double-click expanded the height.
    pub fn is_full_height(&self) -> bool {
        self.is_full_height
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Some(GestureSession::Drag { .. }))
    }

    pub fn active_resize_edge(&self) -> Option<ResizeEdge> {
        match self.gesture {
            Some(GestureSession::Resize { edge, .. }) => Some(edge),
            _ => None,
        }
    }

    /// Hit extent for `edge`, expanded while that handle is being dragged.
    pub fn handle_extent(&self, edge: ResizeEdge, theme: ThemeId, is_mobile: bool) -> i32 {
        if self.active_resize_edge() == Some(edge) {
            ACTIVE_RESIZE_HANDLE_PX
        } else {
            resize_handle_extent(edge, theme, is_mobile)
        }
    }

    fn in_cooldown(&self, now_ms: u64) -> bool {
        self.last_toggle_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < MAXIMIZE_COOLDOWN_MS)
    }

    /// Adopts registry geometry when no gesture is in flight.
    pub fn sync_from_registry(&mut self, frame: Rect) {
        if self.gesture.is_none() {
            self.live = frame;
        }
    }

    /// Starts a titlebar drag. Refused for titlebar controls, during another gesture, and
    /// inside the maximize cooldown.
    pub fn begin_drag(&mut self, target: &GestureTarget, pointer: Point, now_ms: u64) -> bool {
        if target.is_from_titlebar_controls() || self.gesture.is_some() || self.in_cooldown(now_ms) {
            return false;
        }
        self.gesture = Some(GestureSession::Drag {
            pointer_start: pointer,
            rect_start: self.live,
            tracks_swipe: false,
        });
        self.snap_zone = None;
        true
    }

    /// Titlebar press: starts a drag, and on a phone's foreground window also watches for a
    /// horizontal swipe that [`Self::end_drag`] turns into app navigation.
    pub fn begin_titlebar_gesture(
        &mut self,
        env: &ShellEnvironment,
        target: &GestureTarget,
        pointer: Point,
        now_ms: u64,
        is_foreground: bool,
    ) -> bool {
        if !self.begin_drag(target, pointer, now_ms) {
            return false;
        }
        if let Some(GestureSession::Drag { tracks_swipe, .. }) = &mut self.gesture {
            *tracks_swipe = env.is_phone && is_foreground;
        }
        true
    }

    pub fn drag_to(&mut self, env: &ShellEnvironment, pointer: Point) {
        let Some(GestureSession::Drag {
            pointer_start,
            rect_start,
            ..
        }) = self.gesture
        else {
            return;
        };
        self.live = rect_start.offset(pointer.x - pointer_start.x, pointer.y - pointer_start.y);
        self.snap_zone = snap_zone_for_pointer(env, pointer.x);
    }

    /// Ends the drag: an armed snap zone commits its half-screen frame, otherwise the dropped
    /// position is clamped back on screen.
    ///
    /// A swipe-tracking drag that travelled mostly sideways by at least [`SWIPE_THRESHOLD_PX`]
    /// puts the window back and navigates instead: leftward to the next app, rightward to the
    /// previous one.
    pub fn end_drag(&mut self, env: &ShellEnvironment) -> GestureOutcome {
        let Some(GestureSession::Drag {
            rect_start,
            tracks_swipe,
            ..
        }) = self.gesture
        else {
            return GestureOutcome::default();
        };
        self.gesture = None;
        if tracks_swipe {
            if let Some(direction) = swipe_direction(self.live.x - rect_start.x, self.live.y - rect_start.y) {
                self.snap_zone = None;
                self.live = rect_start;
                return GestureOutcome {
                    navigate: Some(direction),
                    ..GestureOutcome::default()
                }
                .with_vibration(VibrationPattern::SWAP)
                .with_sound(SoundEffect::WindowMoveStop);
            }
        }
        let committed = match self.snap_zone.take() {
            Some(zone) => {
                self.is_maximized = false;
                self.is_full_height = false;
                snap_rect(env, zone)
            }
            None => Rect::from_parts(
                clamp_drag_position(env, self.live.position(), self.live.size()),
                self.live.size(),
            ),
        };
        self.live = committed;
        GestureOutcome::commit(committed)
    }

    /// Abandons a drag or resize and puts the window back where the gesture started.
    pub fn cancel_gesture(&mut self) {
        match self.gesture.take() {
            Some(GestureSession::Drag { rect_start, .. })
            | Some(GestureSession::Resize { rect_start, .. }) => self.live = rect_start,
            None => {}
        }
        self.snap_zone = None;
    }

    /// Starts a resize from `edge`. The north-west handle does not exist on mobile.
    pub fn begin_resize(
        &mut self,
        env: &ShellEnvironment,
        target: &GestureTarget,
        edge: ResizeEdge,
        pointer: Point,
    ) -> bool {
        if target.is_from_titlebar_controls()
            || self.gesture.is_some()
            || (env.is_mobile && edge == ResizeEdge::NorthWest)
        {
            return false;
        }
        self.gesture = Some(GestureSession::Resize {
            edge,
            pointer_start: pointer,
            rect_start: self.live,
        });
        true
    }

    pub fn resize_to(&mut self, pointer: Point) {
        let Some(GestureSession::Resize {
            edge,
            pointer_start,
            rect_start,
        }) = self.gesture
        else {
            return;
        };
        self.live = resize_rect(
            rect_start,
            edge,
            pointer.x - pointer_start.x,
            pointer.y - pointer_start.y,
            &self.constraints,
        );
    }

    pub fn end_resize(&mut self) -> GestureOutcome {
        if self.active_resize_edge().is_none() {
            return GestureOutcome::default();
        }
        self.gesture = None;
        self.is_full_height = false;
        GestureOutcome::commit(self.live)
    }

    /// Double-click on the top or bottom edge: toggles between the default height and the tallest
    /// height the app allows between the insets.
    ///
    /// Ignored while fully maximized. A window already filling the available height collapses.
    pub fn toggle_height_maximize(&mut self, env: &ShellEnvironment) -> GestureOutcome {
        if self.is_maximized || self.gesture.is_some() {
            return GestureOutcome::default();
        }
        if self.is_full_height || is_full_height(env, self.live.height) {
            self.is_full_height = false;
            self.live = Rect {
                height: self.constraints.default_size.height,
                ..self.live
            };
            GestureOutcome::commit(self.live).with_sound(SoundEffect::WindowCollapse)
        } else {
            self.is_full_height = true;
            self.live = full_height_rect(env, &self.constraints, self.live);
            GestureOutcome::commit(self.live).with_sound(SoundEffect::WindowExpand)
        }
    }

    /// Toggles full maximize. Calls inside the cooldown are dropped, not queued.
    pub fn toggle_full_maximize(&mut self, env: &ShellEnvironment, now_ms: u64) -> GestureOutcome {
        if self.gesture.is_some() || self.in_cooldown(now_ms) {
            return GestureOutcome::default();
        }
        self.last_toggle_ms = Some(now_ms);
        self.is_maximized = !self.is_maximized;
        self.is_full_height = false;
        let (frame, sound) = if self.is_maximized {
            (maximize_rect(env, &self.constraints), SoundEffect::WindowExpand)
        } else {
            (
                restore_rect(env, &self.constraints, self.live.position()),
                SoundEffect::WindowCollapse,
            )
        };
        self.live = frame;
        GestureOutcome::commit(frame)
            .with_vibration(VibrationPattern::MAXIMIZE)
            .with_sound(sound)
    }

    pub fn titlebar_double_click(
        &mut self,
        env: &ShellEnvironment,
        target: &GestureTarget,
        now_ms: u64,
    ) -> GestureOutcome {
        if target.is_from_titlebar_controls() {
            return GestureOutcome::default();
        }
        self.toggle_full_maximize(env, now_ms)
    }

    /// Touch titlebar tap; the second tap inside [`DOUBLE_TAP_WINDOW_MS`] toggles full maximize.
    ///
    /// Taps landing inside the maximize cooldown are ignored and do not start a new pair.
    pub fn titlebar_tap(
        &mut self,
        env: &ShellEnvironment,
        target: &GestureTarget,
        now_ms: u64,
    ) -> GestureOutcome {
        if target.is_from_titlebar_controls() || self.in_cooldown(now_ms) {
            return GestureOutcome::default();
        }
        match self.last_tap_ms {
            Some(last) if now_ms > last && now_ms - last < DOUBLE_TAP_WINDOW_MS => {
                self.last_tap_ms = None;
                self.toggle_full_maximize(env, now_ms)
            }
            _ => {
                self.last_tap_ms = Some(now_ms);
                GestureOutcome::default()
            }
        }
    }

    /// Size restored when an app resets the window, e.g. after a theme switch.
    pub fn default_size(&self) -> Size {
        self.constraints.default_size
    }
}

fn swipe_direction(dx: i32, dy: i32) -> Option<NavigateDirection> {
    if dx.abs() < SWIPE_THRESHOLD_PX || dx.abs() <= dy.abs() {
        return None;
    }
    Some(if dx < 0 {
        NavigateDirection::Next
    } else {
        NavigateDirection::Previous
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::SizeBound;

    fn env() -> ShellEnvironment {
        ShellEnvironment::for_viewport(ThemeId::MacOsX, Size::new(1280, 800))
    }

    fn controller() -> WindowGeometryController {
        WindowGeometryController::new(
            InstanceId(1),
            WindowConstraints {
                min_size: SizeBound {
                    width: Some(300),
                    height: Some(200),
                },
                max_size: SizeBound {
                    width: Some(900),
                    height: Some(700),
                },
                default_size: Size::new(640, 480),
            },
            Rect::new(200, 150, 640, 480),
        )
    }

    #[test]
    fn drag_moves_live_frame_and_commits_once() {
        let env = env();
        let mut c = controller();
        assert!(c.begin_drag(&GestureTarget::titlebar(), Point::new(300, 160), 0));
        c.drag_to(&env, Point::new(350, 200));
        assert_eq!(c.frame(), Rect::new(250, 190, 640, 480));
        assert_eq!(c.snap_zone(), None);

        let outcome = c.end_drag(&env);
        assert_eq!(outcome.commit, Some(Rect::new(250, 190, 640, 480)));
        assert!(!c.is_dragging());
        assert!(c.end_drag(&env).is_empty());
    }

    #[test]
    fn drag_into_left_tenth_snaps_to_half_screen() {
        let env = env();
        let mut c = controller();
        c.begin_drag(&GestureTarget::titlebar(), Point::new(300, 160), 0);
        c.drag_to(&env, Point::new(20, 300));
        assert_eq!(c.snap_zone(), Some(SnapZone::Left));

        let outcome = c.end_drag(&env);
        assert_eq!(outcome.commit, Some(Rect::new(0, 36, 640, 708)));
        assert_eq!(c.snap_zone(), None);
    }

    #[test]
    fn leaving_the_edge_disarms_snap() {
        let env = env();
        let mut c = controller();
        c.begin_drag(&GestureTarget::titlebar(), Point::new(300, 160), 0);
        c.drag_to(&env, Point::new(1270, 300));
        assert_eq!(c.snap_zone(), Some(SnapZone::Right));
        c.drag_to(&env, Point::new(700, 300));
        assert_eq!(c.snap_zone(), None);
    }

    #[test]
    fn dropped_window_is_clamped_below_menu_bar() {
        let env = env();
        let mut c = controller();
        c.begin_drag(&GestureTarget::titlebar(), Point::new(300, 160), 0);
        c.drag_to(&env, Point::new(500, 0));
        assert_eq!(c.end_drag(&env).commit, Some(Rect::new(400, 36, 640, 480)));
    }

    #[test]
    fn cancel_restores_start_frame() {
        let env = env();
        let mut c = controller();
        c.begin_drag(&GestureTarget::titlebar(), Point::new(300, 160), 0);
        c.drag_to(&env, Point::new(30, 300));
        c.cancel_gesture();
        assert_eq!(c.frame(), Rect::new(200, 150, 640, 480));
        assert_eq!(c.snap_zone(), None);
    }

    #[test]
    fn titlebar_controls_never_start_gestures() {
        let env = env();
        let mut c = controller();
        let controls = GestureTarget::titlebar_control();
        assert!(!c.begin_drag(&controls, Point::new(0, 0), 0));
        assert!(!c.begin_resize(&env, &controls, ResizeEdge::East, Point::new(0, 0)));
        assert!(c.titlebar_double_click(&env, &controls, 1_000).is_empty());
        assert!(!c.is_maximized());
    }

    #[test]
    fn resize_clamps_continuously_and_expands_active_handle() {
        let env = env();
        let mut c = controller();
        assert!(c.begin_resize(&env, &GestureTarget::default(), ResizeEdge::SouthEast, Point::new(0, 0)));
        assert_eq!(c.handle_extent(ResizeEdge::SouthEast, ThemeId::MacOsX, false), 200);
        assert_eq!(c.handle_extent(ResizeEdge::North, ThemeId::MacOsX, false), 8);

        c.resize_to(Point::new(-1000, -1000));
        assert_eq!(c.frame().size(), Size::new(300, 200));
        c.resize_to(Point::new(1000, 1000));
        assert_eq!(c.frame().size(), Size::new(900, 700));

        assert_eq!(c.end_resize().commit, Some(Rect::new(200, 150, 900, 700)));
        assert_eq!(c.active_resize_edge(), None);
    }

    #[test]
    fn north_west_resize_is_unavailable_on_mobile() {
        let mobile = ShellEnvironment::for_viewport(ThemeId::MacOsX, Size::new(390, 844));
        let mut c = controller();
        assert!(!c.begin_resize(&mobile, &GestureTarget::default(), ResizeEdge::NorthWest, Point::new(0, 0)));
        assert!(c.begin_resize(&mobile, &GestureTarget::default(), ResizeEdge::SouthWest, Point::new(0, 0)));
    }

    #[test]
    fn full_maximize_round_trip_returns_default_size() {
        let env = env();
        let mut c = controller();
        let maximize = c.toggle_full_maximize(&env, 1_000);
        assert_eq!(maximize.commit, Some(Rect::new(190, 36, 900, 700)));
        assert!(maximize
            .feedback
            .contains(&FeedbackEvent::Sound(SoundEffect::WindowExpand)));
        assert!(c.is_maximized());

        assert!(c.toggle_full_maximize(&env, 1_200).is_empty());
        assert!(c.is_maximized());

        let restore = c.toggle_full_maximize(&env, 1_300);
        assert_eq!(restore.commit, Some(Rect::new(320, 160, 640, 480)));
        assert!(!c.is_maximized());
    }

    #[test]
    fn drag_is_refused_during_cooldown() {
        let env = env();
        let mut c = controller();
        c.toggle_full_maximize(&env, 5_000);
        assert!(!c.begin_drag(&GestureTarget::titlebar(), Point::new(0, 0), 5_100));
        assert!(c.begin_drag(&GestureTarget::titlebar(), Point::new(0, 0), 5_300));
    }

    #[test]
    fn double_tap_toggles_full_maximize() {
        let env = env();
        let mut c = controller();
        let titlebar = GestureTarget::titlebar();
        assert!(c.titlebar_tap(&env, &titlebar, 1_000).is_empty());
        assert!(c.titlebar_tap(&env, &titlebar, 1_150).commit.is_some());
        assert!(c.is_maximized());

        // inside the cooldown: ignored entirely
        assert!(c.titlebar_tap(&env, &titlebar, 1_300).is_empty());
        assert!(c.titlebar_tap(&env, &titlebar, 1_400).is_empty());
        assert!(c.titlebar_tap(&env, &titlebar, 1_800).is_empty());
        assert!(c.titlebar_tap(&env, &titlebar, 2_400).is_empty());
        assert!(c.is_maximized());
    }

    #[test]
    fn height_toggle_round_trips_to_default_height() {
        let env = env();
        let mut c = controller();
        let expand = c.toggle_height_maximize(&env);
        assert_eq!(expand.commit, Some(Rect::new(200, 36, 640, 700)));
        assert!(c.is_full_height());

        // capped at max height, short of the available 708
        let collapse = c.toggle_height_maximize(&env);
        assert_eq!(collapse.commit, Some(Rect::new(200, 36, 640, 480)));
        assert!(!c.is_full_height());
        let expand_again = c.toggle_height_maximize(&env);
        assert_eq!(expand_again.commit, Some(Rect::new(200, 36, 640, 700)));

        let mut unbounded = WindowGeometryController::new(
            InstanceId(2),
            WindowConstraints::default(),
            Rect::new(10, 100, 600, 400),
        );
        unbounded.toggle_height_maximize(&env);
        assert_eq!(unbounded.frame(), Rect::new(10, 36, 600, 708));
        let collapse = unbounded.toggle_height_maximize(&env);
        assert_eq!(collapse.commit, Some(Rect::new(10, 36, 600, 400)));
    }

    #[test]
    fn resize_and_full_maximize_clear_the_height_toggle() {
        let env = env();
        let mut c = controller();
        c.toggle_height_maximize(&env);
        assert!(c.begin_resize(&env, &GestureTarget::default(), ResizeEdge::East, Point::new(840, 300)));
        c.resize_to(Point::new(800, 300));
        c.end_resize();
        assert!(!c.is_full_height());
        let expand = c.toggle_height_maximize(&env);
        assert_eq!(expand.commit.map(|rect| rect.height), Some(700));

        c.toggle_full_maximize(&env, 0);
        assert!(!c.is_full_height());
        c.toggle_full_maximize(&env, MAXIMIZE_COOLDOWN_MS);
        let expand = c.toggle_height_maximize(&env);
        assert_eq!(expand.commit.map(|rect| rect.height), Some(700));
    }

    #[test]
    fn height_toggle_is_ignored_while_maximized() {
        let env = env();
        let mut c = controller();
        c.toggle_full_maximize(&env, 0);
        assert!(c.toggle_height_maximize(&env).is_empty());
    }

    fn phone() -> ShellEnvironment {
        let mut phone = ShellEnvironment::for_viewport(ThemeId::MacOsX, Size::new(390, 844));
        phone.is_phone = true;
        phone
    }

    fn release_at(c: &mut WindowGeometryController, env: &ShellEnvironment, pointer: Point) -> GestureOutcome {
        c.drag_to(env, pointer);
        c.end_drag(env)
    }

    #[test]
    fn phone_swipe_past_threshold_navigates() {
        let phone = phone();
        let mut c = controller();
        let start = c.frame();

        assert!(c.begin_titlebar_gesture(&phone, &GestureTarget::titlebar(), Point::new(200, 50), 0, true));
        let outcome = release_at(&mut c, &phone, Point::new(90, 60));
        assert_eq!(outcome.navigate, Some(NavigateDirection::Next));
        assert_eq!(outcome.commit, None);
        assert_eq!(c.frame(), start);
        assert!(outcome
            .feedback
            .contains(&FeedbackEvent::Vibration(VibrationPattern::SWAP)));

        c.begin_titlebar_gesture(&phone, &GestureTarget::titlebar(), Point::new(200, 50), 0, true);
        assert_eq!(release_at(&mut c, &phone, Point::new(299, 50)).navigate, None);
        c.begin_titlebar_gesture(&phone, &GestureTarget::titlebar(), Point::new(200, 50), 0, true);
        assert_eq!(
            release_at(&mut c, &phone, Point::new(300, 50)).navigate,
            Some(NavigateDirection::Previous)
        );
    }

    #[test]
    fn phone_foreground_titlebar_still_drags_vertically() {
        let phone = phone();
        let mut c = controller();
        let start = c.frame();

        assert!(c.begin_titlebar_gesture(&phone, &GestureTarget::titlebar(), Point::new(200, 50), 0, true));
        assert!(c.is_dragging());
        // 120 px sideways but 200 px down: a drag, not a swipe
        let outcome = release_at(&mut c, &phone, Point::new(320, 250));
        assert_eq!(outcome.navigate, None);
        assert_eq!(outcome.commit.map(|rect| rect.y), Some(start.y + 200));
    }

    #[test]
    fn swipes_are_phone_foreground_only() {
        let mut c = controller();
        c.begin_titlebar_gesture(&env(), &GestureTarget::titlebar(), Point::new(300, 160), 0, true);
        assert_eq!(release_at(&mut c, &env(), Point::new(600, 160)).navigate, None);

        c.begin_titlebar_gesture(&phone(), &GestureTarget::titlebar(), Point::new(200, 50), 0, false);
        assert_eq!(release_at(&mut c, &phone(), Point::new(50, 50)).navigate, None);
    }

    #[test]
    fn mobile_handle_extents_vary_by_theme() {
        assert_eq!(resize_handle_extent(ResizeEdge::North, ThemeId::Xp, true), 16);
        assert_eq!(resize_handle_extent(ResizeEdge::North, ThemeId::MacOsX, true), 8);
        assert_eq!(resize_handle_extent(ResizeEdge::North, ThemeId::System7, true), 32);
        assert_eq!(resize_handle_extent(ResizeEdge::South, ThemeId::Win98, true), 24);
        assert_eq!(resize_handle_extent(ResizeEdge::South, ThemeId::Win98, false), 8);
    }

    #[test]
    fn registry_sync_waits_for_gesture_end() {
        let env = env();
        let mut c = controller();
        c.begin_drag(&GestureTarget::titlebar(), Point::new(0, 0), 0);
        c.drag_to(&env, Point::new(10, 10));
        c.sync_from_registry(Rect::new(0, 0, 10, 10));
        assert_eq!(c.frame(), Rect::new(210, 160, 640, 480));
        c.cancel_gesture();
        c.sync_from_registry(Rect::new(0, 0, 400, 300));
        assert_eq!(c.frame(), Rect::new(0, 0, 400, 300));
    }
}
