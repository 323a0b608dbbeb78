//! Static app catalog: window constraints, policy flags, and default titles per app id.

use desktop_app_contract::{AppWindowPolicy, ApplicationId};

use crate::model::{ConstraintOverride, Size, SizeBound, WindowConstraints};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppDescriptor {
    pub app_id: &'static str,
    pub name: &'static str,
    pub constraints: WindowConstraints,
    pub policy: AppWindowPolicy,
}

const fn bound(width: Option<i32>, height: Option<i32>) -> SizeBound {
    SizeBound { width, height }
}

const fn constraints(min: SizeBound, max: SizeBound, default_size: Size) -> WindowConstraints {
    WindowConstraints {
        min_size: min,
        max_size: max,
        default_size,
    }
}

const fn policy(
    single_instance: bool,
    keep_mounted_when_minimized: bool,
    intercept_close: bool,
) -> AppWindowPolicy {
    AppWindowPolicy {
        single_instance,
        keep_mounted_when_minimized,
        intercept_close,
    }
}

const APP_CATALOG: [AppDescriptor; 8] = [
    AppDescriptor {
        app_id: "finder",
        name: "Finder",
        constraints: constraints(
            bound(Some(400), Some(300)),
            bound(None, None),
            Size::new(600, 400),
        ),
        policy: policy(false, false, false),
    },
    AppDescriptor {
        app_id: "textedit",
        name: "TextEdit",
        constraints: constraints(
            bound(Some(430), Some(200)),
            bound(None, None),
            Size::new(600, 475),
        ),
        policy: policy(false, false, true),
    },
    AppDescriptor {
        app_id: "internet-explorer",
        name: "Internet Explorer",
        constraints: constraints(
            bound(Some(400), Some(300)),
            bound(None, None),
            Size::new(730, 600),
        ),
        policy: policy(false, false, false),
    },
    AppDescriptor {
        app_id: "terminal",
        name: "Terminal",
        constraints: constraints(
            bound(Some(320), Some(200)),
            bound(None, None),
            Size::new(600, 400),
        ),
        policy: policy(true, false, false),
    },
    AppDescriptor {
        app_id: "ipod",
        name: "iPod",
        constraints: constraints(
            bound(Some(280), Some(400)),
            bound(Some(280), Some(400)),
            Size::new(280, 400),
        ),
        policy: policy(true, true, false),
    },
    AppDescriptor {
        app_id: "photo-booth",
        name: "Photo Booth",
        constraints: constraints(
            bound(Some(400), Some(300)),
            bound(Some(1200), Some(900)),
            Size::new(640, 510),
        ),
        policy: policy(true, false, false),
    },
    AppDescriptor {
        app_id: "control-panels",
        name: "Control Panels",
        constraints: constraints(
            bound(Some(320), Some(415)),
            bound(None, None),
            Size::new(365, 415),
        ),
        policy: policy(true, false, false),
    },
    AppDescriptor {
        app_id: "minesweeper",
        name: "Minesweeper",
        constraints: constraints(
            bound(Some(305), Some(400)),
            bound(Some(305), Some(400)),
            Size::new(305, 400),
        ),
        policy: policy(false, false, false),
    },
];

pub fn app_catalog() -> &'static [AppDescriptor] {
    &APP_CATALOG
}

pub fn app_descriptor(app_id: &ApplicationId) -> Option<&'static AppDescriptor> {
    app_catalog()
        .iter()
        .find(|entry| entry.app_id == app_id.as_str())
}

/// Catalog constraints for `app_id` merged with `overrides`; unknown apps get the defaults.
pub fn window_constraints(app_id: &ApplicationId, overrides: &ConstraintOverride) -> WindowConstraints {
    app_descriptor(app_id)
        .map(|entry| entry.constraints)
        .unwrap_or_default()
        .merged(overrides)
}

pub fn window_policy(app_id: &ApplicationId) -> AppWindowPolicy {
    app_descriptor(app_id)
        .map(|entry| entry.policy)
        .unwrap_or_default()
}

/// Display title for a freshly launched window.
pub fn default_title(app_id: &ApplicationId) -> String {
    app_descriptor(app_id)
        .map(|entry| entry.name.to_string())
        .unwrap_or_else(|| app_id.to_string())
}
