//! Key-value persistence contracts used by the desktop window runtime.

pub mod prefs;
pub mod snapshot;
