//! Drains reducer-emitted [`RuntimeEffect`](crate::reducer::RuntimeEffect)s through the host.

use leptos::*;

use crate::runtime_context::DesktopRuntimeContext;

/// Installs the executor that runs queued window-runtime effects in emission order.
pub fn install(runtime: DesktopRuntimeContext) {
    create_effect(move |_| {
        let queued = runtime.effects.get();
        if queued.is_empty() {
            return;
        }

        // Effects may dispatch again (expose selection); those land in a fresh queue.
        runtime.effects.set(Vec::new());

        let host = runtime.host.get_value();
        for effect in queued {
            host.run_runtime_effect(runtime, effect);
        }
    });
}
