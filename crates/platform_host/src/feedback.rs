//! Sound and haptic feedback hooks invoked by the window runtime.

use std::{cell::RefCell, rc::Rc};

/// Named UI sounds played around window transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// A window opened.
    WindowOpen,
    /// A window started closing.
    WindowClose,
    /// A window grew to its maximized (or full-height) size.
    WindowExpand,
    /// A window shrank back to its default size.
    WindowCollapse,
    /// A window minimized into the dock/taskbar.
    WindowZoomMinimize,
    /// A window restored out of the dock/taskbar.
    WindowZoomMaximize,
    /// A swipe switched the foreground app.
    WindowMoveStop,
}

impl SoundEffect {
    /// Returns a stable token for asset lookup and diagnostics.
    pub const fn token(self) -> &'static str {
        match self {
            Self::WindowOpen => "window-open",
            Self::WindowClose => "window-close",
            Self::WindowExpand => "window-expand",
            Self::WindowCollapse => "window-collapse",
            Self::WindowZoomMinimize => "window-zoom-minimize",
            Self::WindowZoomMaximize => "window-zoom-maximize",
            Self::WindowMoveStop => "window-move-stop",
        }
    }
}

/// Vibration request: one buzz of `duration_ms`.
///
/// `cooldown_ms` is not part of the vibrate sequence. Hosts drop a repeat of the same pattern
/// that arrives within `cooldown_ms` of the previous buzz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VibrationPattern {
    /// Buzz length in milliseconds; the only value handed to the device.
    pub duration_ms: u32,
    /// Throttle window for repeats of this pattern, never vibrated.
    pub cooldown_ms: u32,
}

impl VibrationPattern {
    /// Feedback for maximize toggles.
    pub const MAXIMIZE: Self = Self::new(50, 100);
    /// Feedback for closing a window.
    pub const CLOSE: Self = Self::new(50, 50);
    /// Feedback for swipe-switching apps.
    pub const SWAP: Self = Self::new(30, 50);

    /// Creates a pattern.
    pub const fn new(duration_ms: u32, cooldown_ms: u32) -> Self {
        Self {
            duration_ms,
            cooldown_ms,
        }
    }
}

/// Host service for fire-and-forget feedback side effects.
pub trait FeedbackService {
    /// Plays a named UI sound.
    fn play_sound(&self, sound: SoundEffect);

    /// Triggers device vibration where supported.
    fn vibrate(&self, pattern: VibrationPattern);
}

#[derive(Debug, Clone, Copy, Default)]
/// Feedback service for hosts without audio or haptics.
pub struct NoopFeedbackService;

impl FeedbackService for NoopFeedbackService {
    fn play_sound(&self, _sound: SoundEffect) {}

    fn vibrate(&self, _pattern: VibrationPattern) {}
}

/// One recorded feedback call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackEvent {
    /// A sound was requested.
    Sound(SoundEffect),
    /// A vibration was requested.
    Vibration(VibrationPattern),
}

#[derive(Debug, Clone, Default)]
/// Feedback service that records every request, for tests and diagnostics overlays.
pub struct MemoryFeedbackService {
    events: Rc<RefCell<Vec<FeedbackEvent>>>,
}

impl MemoryFeedbackService {
    /// Returns the recorded requests in call order.
    pub fn events(&self) -> Vec<FeedbackEvent> {
        self.events.borrow().clone()
    }
}

impl FeedbackService for MemoryFeedbackService {
    fn play_sound(&self, sound: SoundEffect) {
        self.events.borrow_mut().push(FeedbackEvent::Sound(sound));
    }

    fn vibrate(&self, pattern: VibrationPattern) {
        self.events
            .borrow_mut()
            .push(FeedbackEvent::Vibration(pattern));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn memory_feedback_records_in_order() {
        let service = MemoryFeedbackService::default();
        let handle: &dyn FeedbackService = &service;
        handle.vibrate(VibrationPattern::CLOSE);
        handle.play_sound(SoundEffect::WindowClose);

        assert_eq!(
            service.events(),
            vec![
                FeedbackEvent::Vibration(VibrationPattern::new(50, 50)),
                FeedbackEvent::Sound(SoundEffect::WindowClose),
            ]
        );
    }
}
