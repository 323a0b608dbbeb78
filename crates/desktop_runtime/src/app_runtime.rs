//! Runtime app-session state: per-instance lifecycle and shell-event inboxes.
//!
//! App content renderers read their session to learn whether they are focused or minimized and
//! drain their inbox for [`AppShellEvent::UpdateExisting`] and [`AppShellEvent::CloseRequested`].

use std::collections::BTreeMap;

use desktop_app_contract::{AppLifecycleEvent, AppShellEvent};
use leptos::*;

use crate::model::{InstanceId, InstanceRecord};

const MAX_INBOX_EVENTS: usize = 64;

#[derive(Debug, Clone, PartialEq)]
/// Shell-side session of one app instance.
pub struct WindowAppSession {
    /// Latest lifecycle stage reached by the instance.
    pub lifecycle: AppLifecycleEvent,
    /// Undelivered shell events, oldest first.
    pub inbox: Vec<AppShellEvent>,
}

impl Default for WindowAppSession {
    fn default() -> Self {
        Self {
            lifecycle: AppLifecycleEvent::Opened,
            inbox: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Sessions for every live instance.
pub struct AppRuntimeState {
    sessions: BTreeMap<InstanceId, WindowAppSession>,
}

impl AppRuntimeState {
    pub fn session(&self, instance_id: InstanceId) -> Option<&WindowAppSession> {
        self.sessions.get(&instance_id)
    }

    fn ensure_session(&mut self, instance_id: InstanceId) -> &mut WindowAppSession {
        self.sessions.entry(instance_id).or_default()
    }

    /// Records `event` on the addressed session.
    ///
    /// A `Closed` lifecycle ends the session; events for instances without a session are dropped.
    pub fn apply_event(&mut self, event: AppShellEvent) {
        let instance_id = InstanceId(event.instance_id());
        match event {
            AppShellEvent::Lifecycle {
                event: AppLifecycleEvent::Closed,
                ..
            } => {
                self.sessions.remove(&instance_id);
            }
            AppShellEvent::Lifecycle {
                event: AppLifecycleEvent::Opened,
                ..
            } => {
                self.ensure_session(instance_id).lifecycle = AppLifecycleEvent::Opened;
            }
            AppShellEvent::Lifecycle { event, .. } => {
                if let Some(session) = self.sessions.get_mut(&instance_id) {
                    session.lifecycle = event;
                }
            }
            event => {
                if let Some(session) = self.sessions.get_mut(&instance_id) {
                    session.inbox.push(event);
                    if session.inbox.len() > MAX_INBOX_EVENTS {
                        let overflow = session.inbox.len() - MAX_INBOX_EVENTS;
                        session.inbox.drain(0..overflow);
                    }
                }
            }
        }
    }

    /// Removes and returns the pending events of one instance.
    pub fn take_inbox(&mut self, instance_id: InstanceId) -> Vec<AppShellEvent> {
        self.sessions
            .get_mut(&instance_id)
            .map(|session| std::mem::take(&mut session.inbox))
            .unwrap_or_default()
    }

    /// Opens sessions for registry instances that do not have one yet.
    ///
    /// Sessions of removed instances stay until their `Closed` lifecycle arrives.
    fn sync_instances(&mut self, instances: &[InstanceRecord]) {
        for instance in instances {
            self.ensure_session(instance.instance_id);
        }
    }
}

/// Syncs app sessions with the registry's instances.
pub fn sync_runtime_sessions(runtime_state: RwSignal<AppRuntimeState>, instances: &[InstanceRecord]) {
    let missing = runtime_state.with_untracked(|state| {
        instances
            .iter()
            .any(|instance| state.session(instance.instance_id).is_none())
    });
    if missing {
        runtime_state.update(|state| state.sync_instances(instances));
    }
}

/// Delivers a shell event to its instance session.
pub fn deliver_shell_event(runtime_state: RwSignal<AppRuntimeState>, event: AppShellEvent) {
    runtime_state.update(|state| state.apply_event(event));
}

/// Drains one instance's inbox.
pub fn take_window_inbox(
    runtime_state: RwSignal<AppRuntimeState>,
    instance_id: InstanceId,
) -> Vec<AppShellEvent> {
    let mut events = Vec::new();
    runtime_state.update(|state| events = state.take_inbox(instance_id));
    events
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::ApplicationId;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn lifecycle(instance_id: u64, event: AppLifecycleEvent) -> AppShellEvent {
        AppShellEvent::Lifecycle { instance_id, event }
    }

    #[test]
    fn lifecycle_tracks_latest_stage_until_closed() {
        let mut state = AppRuntimeState::default();
        state.apply_event(lifecycle(1, AppLifecycleEvent::Opened));
        state.apply_event(lifecycle(1, AppLifecycleEvent::Minimized));
        assert_eq!(
            state.session(InstanceId(1)).map(|session| session.lifecycle),
            Some(AppLifecycleEvent::Minimized)
        );

        state.apply_event(lifecycle(1, AppLifecycleEvent::Closed));
        assert_eq!(state.session(InstanceId(1)), None);

        state.apply_event(lifecycle(1, AppLifecycleEvent::Focused));
        assert_eq!(state.session(InstanceId(1)), None);
    }

    #[test]
    fn inbox_is_drained_once_and_bounded() {
        let mut state = AppRuntimeState::default();
        state.apply_event(lifecycle(2, AppLifecycleEvent::Opened));
        for index in 0..(MAX_INBOX_EVENTS + 3) {
            state.apply_event(AppShellEvent::UpdateExisting {
                app_id: ApplicationId::trusted("finder"),
                instance_id: 2,
                initial_data: json!({ "path": index }),
            });
        }
        state.apply_event(AppShellEvent::CloseRequested { instance_id: 9 });

        let inbox = state.take_inbox(InstanceId(2));
        assert_eq!(inbox.len(), MAX_INBOX_EVENTS);
        assert_eq!(
            inbox.first(),
            Some(&AppShellEvent::UpdateExisting {
                app_id: ApplicationId::trusted("finder"),
                instance_id: 2,
                initial_data: json!({ "path": 3 }),
            })
        );
        assert!(state.take_inbox(InstanceId(2)).is_empty());
        assert!(state.take_inbox(InstanceId(9)).is_empty());
    }
}
