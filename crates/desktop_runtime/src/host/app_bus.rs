use desktop_app_contract::AppShellEvent;

use crate::{app_runtime::deliver_shell_event, runtime_context::DesktopRuntimeContext};

pub(super) fn deliver_app_event(runtime: DesktopRuntimeContext, event: AppShellEvent) {
    deliver_shell_event(runtime.app_runtime, event);
}
