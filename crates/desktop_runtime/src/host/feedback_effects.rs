use platform_host::{unix_time_ms_now, SoundEffect, VibrationPattern};

use crate::host::DesktopHostContext;

pub(super) fn play_sound(host: &DesktopHostContext, sound: SoundEffect) {
    host.feedback_service().play_sound(sound);
}

pub(super) fn vibrate(host: &DesktopHostContext, pattern: VibrationPattern) {
    if host.admit_vibration(pattern, unix_time_ms_now()) {
        host.feedback_service().vibrate(pattern);
    }
}
