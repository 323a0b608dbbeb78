//! Per-app fold of the instance registry for consumers that still think in one-window-per-app.

use std::collections::BTreeMap;

use desktop_app_contract::ApplicationId;

use crate::model::{DesktopState, LegacyAppState};

/// Aggregates every instance into one [`LegacyAppState`] per app id.
///
/// `is_open` and `is_foreground` are ORed across instances. Geometry and launch data come from
/// the foreground instance when there is one, else from the first instance in registry order.
pub fn legacy_app_states(state: &DesktopState) -> BTreeMap<ApplicationId, LegacyAppState> {
    let mut folded: BTreeMap<ApplicationId, LegacyAppState> = BTreeMap::new();
    for instance in &state.instances {
        let candidate = LegacyAppState {
            is_open: instance.is_open,
            is_foreground: instance.is_foreground,
            position: instance.position,
            size: instance.size,
            initial_data: instance.initial_data.clone(),
        };
        match folded.get_mut(&instance.app_id) {
            None => {
                folded.insert(instance.app_id.clone(), candidate);
            }
            Some(existing) => {
                let take_geometry = instance.is_foreground && !existing.is_foreground;
                existing.is_open |= candidate.is_open;
                existing.is_foreground |= candidate.is_foreground;
                if take_geometry {
                    existing.position = candidate.position;
                    existing.size = candidate.size;
                    existing.initial_data = candidate.initial_data;
                }
            }
        }
    }
    folded
}

/// Legacy view of a single app, or `None` when it has no instances.
pub fn legacy_app_state(state: &DesktopState, app_id: &ApplicationId) -> Option<LegacyAppState> {
    legacy_app_states(state).remove(app_id)
}
