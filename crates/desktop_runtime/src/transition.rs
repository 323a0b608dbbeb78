//! Per-window lifecycle transition state machine.
//!
//! ```text
//! Opening -> Visible -> Minimizing -> Minimized -> Restoring -> Visible
//!                  \-> Closing -> Closed
//! ```
//!
//! Animations complete on deadlines checked by [`TransitionMachine::tick`]. A window holds at
//! most one exit intent; a close overwrites a pending minimize, and the superseded minimize never
//! commits because its animation generation is stale.

mod easing;

use desktop_app_contract::AppWindowPolicy;
use serde::{Deserialize, Serialize};

pub use easing::{ease_in_out, ease_out_cubic};

pub const OPEN_DURATION_MS: u64 = 200;
pub const MINIMIZE_DURATION_MS: u64 = 250;
pub const RESTORE_DURATION_MS: u64 = 250;
pub const CLOSE_DURATION_MS: u64 = 200;
pub const SHAKE_DURATION_MS: u64 = 400;
/// Scale a window shrinks to while flying into the dock or taskbar.
pub const MINIMIZED_SCALE: f64 = 0.1;
/// Scale at the start of an open and the end of a close.
pub const POPPED_SCALE: f64 = 0.95;
/// Peak horizontal shake displacement in px.
pub const SHAKE_AMPLITUDE_PX: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionPhase {
    Opening,
    Visible,
    Minimizing,
    Minimized,
    Restoring,
    Closing,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitIntent {
    Minimize,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Registry mutation a finished transition asks for.
pub enum TransitionCommit {
    Minimize,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Result of a user close request.
pub enum CloseRequest {
    /// Already closing or closed.
    Ignored,
    /// The app confirms closes itself; nothing changed yet.
    Intercepted,
    Closing,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Visual state applied on top of the window frame.
pub struct VisualFrame {
    pub scale: f64,
    pub opacity: f64,
    /// Translation from the window's resting position, in px.
    pub offset_x: f64,
    pub offset_y: f64,
}

impl VisualFrame {
    pub const RESTING: Self = Self {
        scale: 1.0,
        opacity: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };

    fn toward_anchor(anchor_offset: (f64, f64)) -> Self {
        Self {
            scale: MINIMIZED_SCALE,
            opacity: 0.0,
            offset_x: anchor_offset.0,
            offset_y: anchor_offset.1,
        }
    }

    fn popped() -> Self {
        Self {
            scale: POPPED_SCALE,
            opacity: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    fn lerp(self, to: Self, t: f64) -> Self {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self {
            scale: mix(self.scale, to.scale),
            opacity: mix(self.opacity, to.opacity),
            offset_x: mix(self.offset_x, to.offset_x),
            offset_y: mix(self.offset_y, to.offset_y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveAnimation {
    started_at_ms: u64,
    duration_ms: u64,
    from: VisualFrame,
    to: VisualFrame,
    generation: u64,
    entering: bool,
}

impl ActiveAnimation {
    fn progress(&self, now_ms: u64) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.started_at_ms) as f64;
        (elapsed / self.duration_ms as f64).clamp(0.0, 1.0)
    }

    fn is_complete(&self, now_ms: u64) -> bool {
        now_ms >= self.started_at_ms.saturating_add(self.duration_ms)
    }

    fn frame(&self, now_ms: u64) -> VisualFrame {
        let t = self.progress(now_ms);
        let eased = if self.entering {
            ease_out_cubic(t)
        } else {
            ease_in_out(t)
        };
        self.from.lerp(self.to, eased)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMachine {
    phase: TransitionPhase,
    exit_intent: Option<ExitIntent>,
    animation: Option<ActiveAnimation>,
    generation: u64,
    shaking_until_ms: Option<u64>,
    anchor_offset: Option<(f64, f64)>,
    last_seen_minimized: bool,
    policy: AppWindowPolicy,
}

impl TransitionMachine {
    /// Starts in `Opening`, or directly `Visible` when the open animation is suppressed.
    pub fn new(policy: AppWindowPolicy, now_ms: u64, suppress_open: bool) -> Self {
        let mut machine = Self {
            phase: TransitionPhase::Visible,
            exit_intent: None,
            animation: None,
            generation: 0,
            shaking_until_ms: None,
            anchor_offset: None,
            last_seen_minimized: false,
            policy,
        };
        if !suppress_open {
            machine.phase = TransitionPhase::Opening;
            machine.animate(now_ms, OPEN_DURATION_MS, VisualFrame::popped(), VisualFrame::RESTING, true);
        }
        machine
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn exit_intent(&self) -> Option<ExitIntent> {
        self.exit_intent
    }

    pub fn policy(&self) -> AppWindowPolicy {
        self.policy
    }

    fn animate(&mut self, now_ms: u64, duration_ms: u64, from: VisualFrame, to: VisualFrame, entering: bool) {
        self.generation = self.generation.wrapping_add(1);
        self.animation = Some(ActiveAnimation {
            started_at_ms: now_ms,
            duration_ms,
            from,
            to,
            generation: self.generation,
            entering,
        });
    }

    /// Whether the window is on its way out and must not be reused.
    pub fn is_exiting(&self) -> bool {
        matches!(self.phase, TransitionPhase::Closing | TransitionPhase::Closed)
    }

    /// Turns an in-flight minimize back toward the resting frame; the minimize never commits.
    pub fn cancel_minimize(&mut self, now_ms: u64) -> bool {
        if self.phase != TransitionPhase::Minimizing {
            return false;
        }
        let from = self.frame(now_ms);
        self.exit_intent = None;
        self.phase = TransitionPhase::Restoring;
        self.animate(now_ms, RESTORE_DURATION_MS, from, VisualFrame::RESTING, true);
        true
    }

    /// Starts flying toward the dock/taskbar anchor at `anchor_offset` from the window center.
    ///
    /// The registry is only told once the animation finishes.
    pub fn request_minimize(&mut self, now_ms: u64, anchor_offset: (f64, f64)) -> bool {
        if self.is_exiting()
            || matches!(
                self.phase,
                TransitionPhase::Minimizing | TransitionPhase::Minimized
            )
        {
            return false;
        }
        let from = self.frame(now_ms);
        self.exit_intent = Some(ExitIntent::Minimize);
        self.anchor_offset = Some(anchor_offset);
        self.phase = TransitionPhase::Minimizing;
        self.shaking_until_ms = None;
        self.animate(
            now_ms,
            MINIMIZE_DURATION_MS,
            from,
            VisualFrame::toward_anchor(anchor_offset),
            false,
        );
        true
    }

    /// User close request. Intercepting apps get to confirm first.
    pub fn request_close(&mut self, now_ms: u64) -> CloseRequest {
        if self.is_exiting() {
            return CloseRequest::Ignored;
        }
        if self.policy.intercept_close {
            return CloseRequest::Intercepted;
        }
        self.perform_close(now_ms);
        CloseRequest::Closing
    }

    /// Starts the close animation, replacing any pending minimize.
    pub fn perform_close(&mut self, now_ms: u64) -> bool {
        if self.is_exiting() {
            return false;
        }
        let from = self.frame(now_ms);
        self.exit_intent = Some(ExitIntent::Close);
        self.phase = TransitionPhase::Closing;
        self.shaking_until_ms = None;
        self.animate(now_ms, CLOSE_DURATION_MS, from, VisualFrame::popped(), false);
        true
    }

    /// Feeds the registry's `is_minimized` flag; a true → false flip starts the restore.
    ///
    /// A minimize applied to the registry without this machine's animation snaps to `Minimized`.
    pub fn observe_minimized(&mut self, is_minimized: bool, now_ms: u64, fallback_offset: (f64, f64)) -> bool {
        let was_minimized = std::mem::replace(&mut self.last_seen_minimized, is_minimized);
        if self.is_exiting() || was_minimized == is_minimized {
            return false;
        }
        if is_minimized {
            if self.phase != TransitionPhase::Minimizing {
                self.phase = TransitionPhase::Minimized;
                self.animation = None;
                self.anchor_offset.get_or_insert(fallback_offset);
            }
            return false;
        }
        let anchor = self.anchor_offset.unwrap_or(fallback_offset);
        self.exit_intent = None;
        self.phase = TransitionPhase::Restoring;
        self.animate(
            now_ms,
            RESTORE_DURATION_MS,
            VisualFrame::toward_anchor(anchor),
            VisualFrame::RESTING,
            true,
        );
        true
    }

    /// Advances deadline-driven completion. Each finished exit commits exactly once.
    pub fn tick(&mut self, now_ms: u64) -> Option<TransitionCommit> {
        if self
            .shaking_until_ms
            .is_some_and(|until| now_ms >= until)
        {
            self.shaking_until_ms = None;
        }
        let animation = self.animation?;
        if !animation.is_complete(now_ms) {
            return None;
        }
        self.animation = None;
        if animation.generation != self.generation {
            return None;
        }
        match self.phase {
            TransitionPhase::Opening | TransitionPhase::Restoring => {
                self.phase = TransitionPhase::Visible;
                None
            }
            TransitionPhase::Minimizing if self.exit_intent == Some(ExitIntent::Minimize) => {
                self.phase = TransitionPhase::Minimized;
                self.exit_intent = None;
                self.last_seen_minimized = true;
                Some(TransitionCommit::Minimize)
            }
            TransitionPhase::Closing if self.exit_intent == Some(ExitIntent::Close) => {
                self.phase = TransitionPhase::Closed;
                Some(TransitionCommit::Close)
            }
            _ => None,
        }
    }

    /// Nudges the window side to side; only resting windows shake.
    pub fn shake(&mut self, now_ms: u64) -> bool {
        if !matches!(
            self.phase,
            TransitionPhase::Visible | TransitionPhase::Minimized
        ) {
            return false;
        }
        self.shaking_until_ms = Some(now_ms.saturating_add(SHAKE_DURATION_MS));
        true
    }

    pub fn is_shaking(&self, now_ms: u64) -> bool {
        self.shaking_until_ms.is_some_and(|until| now_ms < until)
    }

    /// Earliest stamp at which [`Self::tick`] has work to do.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        let animation = self
            .animation
            .map(|animation| animation.started_at_ms.saturating_add(animation.duration_ms));
        match (animation, self.shaking_until_ms) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Interpolated visual state at `now_ms`.
    pub fn frame(&self, now_ms: u64) -> VisualFrame {
        let mut frame = match (self.animation, self.phase) {
            (Some(animation), _) => animation.frame(now_ms),
            (None, TransitionPhase::Minimized) => {
                VisualFrame::toward_anchor(self.anchor_offset.unwrap_or((0.0, 0.0)))
            }
            (None, TransitionPhase::Closed) => VisualFrame::popped(),
            (None, _) => VisualFrame::RESTING,
        };
        if let Some(until) = self.shaking_until_ms.filter(|until| now_ms < *until) {
            let started = until - SHAKE_DURATION_MS;
            let t = now_ms.saturating_sub(started) as f64 / SHAKE_DURATION_MS as f64;
            frame.offset_x += SHAKE_AMPLITUDE_PX
                * (t * 4.0 * std::f64::consts::TAU).sin()
                * (1.0 - t);
        }
        frame
    }

    /// Closing windows ignore pointer input.
    pub fn accepts_pointer_input(&self) -> bool {
        !self.is_exiting()
    }

    /// Whether app content stays mounted; minimized windows unmount unless the app opts out.
    pub fn content_mounted(&self) -> bool {
        match self.phase {
            TransitionPhase::Minimized => self.policy.keep_mounted_when_minimized,
            TransitionPhase::Closed => false,
            _ => true,
        }
    }
}
