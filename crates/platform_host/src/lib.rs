//! Typed host-domain contracts shared by the desktop window runtime and its host adapters.
//!
//! The window runtime never talks to the browser directly. Everything it needs from the
//! environment (preference storage, on-screen anchors for dock/taskbar items, sound and
//! vibration feedback, embedded-shell detection, wall-clock time) crosses this boundary as a
//! trait object or plain value, which keeps the runtime testable off-browser.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod anchor;
pub mod feedback;
pub mod host;
pub mod storage;
pub mod time;

pub use anchor::{AnchorResolver, AnchorTarget, MemoryAnchorResolver, NoopAnchorResolver, ScreenPoint};
pub use feedback::{
    FeedbackEvent, FeedbackService, MemoryFeedbackService, NoopFeedbackService, SoundEffect,
    VibrationPattern,
};
pub use host::{HostServices, HostStrategy};
pub use storage::prefs::{
    load_pref_with, save_pref_with, MemoryPrefsStore, NoopPrefsStore, PrefsStore, PrefsStoreFuture,
};
pub use storage::snapshot::{
    initial_path_pref_key, load_snapshot_with, save_snapshot_with, PersistedSnapshot,
    DESKTOP_MODE_STORAGE_KEY, GLOBE_STORAGE_KEY,
};
pub use time::{iso_timestamp_now, next_monotonic_timestamp_ms, unix_time_ms_now};
