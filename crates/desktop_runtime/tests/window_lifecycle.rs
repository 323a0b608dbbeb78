use desktop_app_contract::{AppLifecycleEvent, AppShellEvent, ApplicationId};
use desktop_runtime::{
    controller::{GestureTarget, MAXIMIZE_COOLDOWN_MS},
    expose::expose_layout,
    legacy::legacy_app_state,
    reduce_desktop, registry,
    theme::ThemeId,
    transition::TransitionPhase,
    DesktopAction, DesktopState, InstanceId, LaunchRequest, Point, Rect, ResizeEdge, RuntimeEffect,
    ShellEnvironment, Size, WindowRuntimeState,
};
use pretty_assertions::assert_eq;
use serde_json::json;

struct Desktop {
    state: DesktopState,
    windows: WindowRuntimeState,
    effects: Vec<RuntimeEffect>,
}

impl Desktop {
    fn new() -> Self {
        Self {
            state: DesktopState::default(),
            windows: WindowRuntimeState::default(),
            effects: Vec::new(),
        }
    }

    fn dispatch(&mut self, action: DesktopAction) {
        let effects = reduce_desktop(&mut self.state, &mut self.windows, action).expect("reduce");
        self.effects.extend(effects);
    }

    fn open(&mut self, app_id: &str) -> InstanceId {
        self.dispatch(DesktopAction::Launch(LaunchRequest {
            suppress_open_transition: true,
            ..LaunchRequest::new(ApplicationId::trusted(app_id))
        }));
        self.state.foreground.expect("launched instance is foreground")
    }

    fn settle(&mut self, from_ms: u64) {
        for now_ms in (from_ms..=from_ms + 1_000).step_by(50) {
            self.dispatch(DesktopAction::Tick { now_ms });
        }
    }

    fn rect(&self, instance_id: InstanceId) -> Rect {
        self.state.instance(instance_id).expect("record").rect()
    }

    fn lifecycle(&self, instance_id: InstanceId) -> Vec<AppLifecycleEvent> {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                RuntimeEffect::DeliverAppEvent(AppShellEvent::Lifecycle {
                    instance_id: id,
                    event,
                }) if *id == instance_id.0 => Some(*event),
                _ => None,
            })
            .collect()
    }

    fn assert_single_foreground(&self) {
        let flagged: Vec<_> = self
            .state
            .instances
            .iter()
            .filter(|instance| instance.is_foreground)
            .map(|instance| instance.instance_id)
            .collect();
        assert!(flagged.len() <= 1, "several foreground instances: {flagged:?}");
        assert_eq!(flagged.first().copied(), self.state.foreground);

        if let Some(foreground) = self.state.foreground {
            let topmost_visible = self.state.z_order.iter().rev().copied().find(|id| {
                self.state
                    .instance(*id)
                    .is_some_and(|instance| instance.is_visible())
            });
            assert_eq!(topmost_visible, Some(foreground));
        }
    }
}

#[test]
fn foreground_stays_unique_and_on_top() {
    let mut desktop = Desktop::new();
    let finder = desktop.open("finder");
    desktop.assert_single_foreground();
    let textedit = desktop.open("textedit");
    desktop.assert_single_foreground();
    let ipod = desktop.open("ipod");
    desktop.assert_single_foreground();

    let script = [
        DesktopAction::BringToForeground {
            instance_id: finder,
            now_ms: 10,
        },
        DesktopAction::RequestMinimize {
            instance_id: ipod,
            anchor: None,
            now_ms: 20,
        },
        DesktopAction::Tick { now_ms: 400 },
        DesktopAction::BringAppToForeground {
            app_id: ApplicationId::trusted("textedit"),
            now_ms: 500,
        },
        DesktopAction::RequestMinimize {
            instance_id: textedit,
            anchor: None,
            now_ms: 600,
        },
        DesktopAction::Tick { now_ms: 900 },
        DesktopAction::BringToForeground {
            instance_id: ipod,
            now_ms: 1_000,
        },
        DesktopAction::PerformClose {
            instance_id: ipod,
            now_ms: 1_100,
        },
        DesktopAction::Tick { now_ms: 1_400 },
    ];
    for action in script {
        desktop.dispatch(action);
        desktop.assert_single_foreground();
    }

    assert!(desktop.state.instance(ipod).is_none());
    assert_eq!(desktop.state.foreground, Some(finder));
}

#[test]
fn minimize_then_restore_keeps_geometry() {
    let mut desktop = Desktop::new();
    let id = desktop.open("finder");
    let before = desktop.rect(id);

    desktop.dispatch(DesktopAction::RequestMinimize {
        instance_id: id,
        anchor: None,
        now_ms: 0,
    });
    desktop.settle(50);
    let record = desktop.state.instance(id).expect("record");
    assert!(record.is_minimized);
    assert!(!record.is_foreground);

    desktop.dispatch(DesktopAction::BringToForeground {
        instance_id: id,
        now_ms: 2_000,
    });
    let record = desktop.state.instance(id).expect("record");
    assert!(record.is_open);
    assert!(record.is_foreground);
    assert!(!record.is_minimized);
    assert_eq!(record.rect(), before);
    assert_eq!(
        desktop.lifecycle(id),
        vec![
            AppLifecycleEvent::Opened,
            AppLifecycleEvent::Focused,
            AppLifecycleEvent::Minimized,
            AppLifecycleEvent::Restored,
            AppLifecycleEvent::Focused,
        ]
    );
}

#[test]
fn double_maximize_returns_to_default_size_centered() {
    let mut desktop = Desktop::new();
    let id = desktop.open("finder");

    desktop.dispatch(DesktopAction::ToggleMaximize {
        instance_id: id,
        now_ms: 1_000,
    });
    assert_eq!(desktop.rect(id), Rect::new(0, 36, 1280, 708));

    // inside the cooldown: dropped
    desktop.dispatch(DesktopAction::ToggleMaximize {
        instance_id: id,
        now_ms: 1_000 + MAXIMIZE_COOLDOWN_MS - 1,
    });
    assert_eq!(desktop.rect(id), Rect::new(0, 36, 1280, 708));

    desktop.dispatch(DesktopAction::ToggleMaximize {
        instance_id: id,
        now_ms: 1_000 + MAXIMIZE_COOLDOWN_MS,
    });
    let viewport = desktop.state.environment.viewport;
    assert_eq!(desktop.rect(id).size(), Size::new(600, 400));
    assert_eq!(
        desktop.rect(id).position(),
        Point::new((viewport.width - 600) / 2, (viewport.height - 400) / 2)
    );
}

#[test]
fn resize_clamps_to_min_and_max_inclusive() {
    let mut desktop = Desktop::new();
    let id = desktop.open("photo-booth");
    let start = desktop.rect(id);
    let corner = Point::new(start.x + start.width, start.y + start.height);

    let mut resize_to = |pointer: Point| {
        for action in [
            DesktopAction::ResizePointerDown {
                instance_id: id,
                edge: ResizeEdge::SouthEast,
                target: GestureTarget::default(),
                pointer: corner,
            },
            DesktopAction::PointerMove {
                instance_id: id,
                pointer,
            },
            DesktopAction::PointerUp {
                instance_id: id,
                pointer,
            },
        ] {
            desktop.dispatch(action);
        }
        desktop.rect(id)
    };

    let grown = resize_to(Point::new(corner.x + 5_000, corner.y + 5_000));
    assert_eq!(grown.size(), Size::new(1200, 900));
    assert_eq!(grown.position(), start.position());

    let shrunk = resize_to(Point::new(-5_000, -5_000));
    assert_eq!(shrunk.size(), Size::new(400, 300));
    assert_eq!(shrunk.position(), start.position());
}

#[test]
fn edge_double_click_toggles_between_default_and_capped_height() {
    let mut desktop = Desktop::new();
    desktop.dispatch(DesktopAction::SetEnvironment {
        environment: ShellEnvironment::for_viewport(ThemeId::MacOsX, Size::new(1920, 1080)),
    });
    let id = desktop.open("photo-booth");
    assert_eq!(desktop.rect(id).height, 510);

    let mut heights = Vec::new();
    for _ in 0..3 {
        desktop.dispatch(DesktopAction::EdgeDoubleClick {
            instance_id: id,
            edge: ResizeEdge::South,
        });
        heights.push(desktop.rect(id).height);
    }
    // 900 is the app's max height, below the 988 px between menu bar and dock
    assert_eq!(heights, vec![900, 510, 900]);
    assert_eq!(desktop.rect(id).y, 36);
}

#[test]
fn relaunching_a_closing_single_instance_app_yields_a_live_window() {
    let mut desktop = Desktop::new();
    let closing = desktop.open("terminal");
    desktop.dispatch(DesktopAction::RequestClose {
        instance_id: closing,
        now_ms: 1_000,
    });
    desktop.dispatch(DesktopAction::Launch(
        LaunchRequest::new(ApplicationId::trusted("terminal")).at(1_050),
    ));
    desktop.settle(1_100);

    let terminals: Vec<_> = desktop
        .state
        .instances_of(&ApplicationId::trusted("terminal"))
        .map(|instance| instance.instance_id)
        .collect();
    assert_eq!(terminals.len(), 1);
    assert_ne!(terminals[0], closing);
    assert_eq!(desktop.state.foreground, Some(terminals[0]));
    desktop.assert_single_foreground();
}

#[test]
fn relaunching_a_minimizing_single_instance_app_keeps_it_on_screen() {
    let mut desktop = Desktop::new();
    let id = desktop.open("photo-booth");
    desktop.dispatch(DesktopAction::RequestMinimize {
        instance_id: id,
        anchor: None,
        now_ms: 0,
    });
    desktop.dispatch(DesktopAction::Launch(
        LaunchRequest::new(ApplicationId::trusted("photo-booth")).at(100),
    ));
    desktop.settle(150);

    let record = desktop.state.instance(id).expect("record");
    assert!(record.is_foreground);
    assert!(!record.is_minimized);
    assert!(!desktop.lifecycle(id).contains(&AppLifecycleEvent::Minimized));
    assert_eq!(
        desktop.windows.transition(id).map(|machine| machine.phase()),
        Some(TransitionPhase::Visible)
    );
}

#[test]
fn dragging_into_left_zone_snaps_to_half_screen() {
    let mut desktop = Desktop::new();
    let id = desktop.open("finder");
    let grab = Point::new(desktop.rect(id).x + 100, desktop.rect(id).y + 10);

    for action in [
        DesktopAction::TitlebarPointerDown {
            instance_id: id,
            target: GestureTarget::titlebar(),
            pointer: grab,
            now_ms: 0,
        },
        DesktopAction::PointerMove {
            instance_id: id,
            pointer: Point::new(20, 300),
        },
        DesktopAction::PointerUp {
            instance_id: id,
            pointer: Point::new(20, 300),
        },
    ] {
        desktop.dispatch(action);
    }

    // macOS theme: 36 px menu bar, 56 px dock
    assert_eq!(desktop.rect(id), Rect::new(0, 36, 640, 800 - 36 - 56));
}

#[test]
fn legacy_view_reports_foreground_finder_geometry() {
    let mut state = DesktopState::default();
    registry::launch(
        &mut state,
        ApplicationId::trusted("finder"),
        "Finder".into(),
        Some(json!({ "path": "/Applications" })),
        Rect::new(10, 10, 600, 400),
    );

    let legacy = legacy_app_state(&state, &ApplicationId::trusted("finder")).expect("finder");
    assert!(legacy.is_open);
    assert!(legacy.is_foreground);
    assert_eq!(legacy.position, Point::new(10, 10));
    assert_eq!(legacy.initial_data, Some(json!({ "path": "/Applications" })));
    assert_eq!(legacy_app_state(&state, &ApplicationId::trusted("ipod")), None);
}

#[test]
fn expose_indices_are_unique_and_stable_across_reentry() {
    let mut desktop = Desktop::new();
    let first = desktop.open("finder");
    desktop.open("textedit");
    desktop.open("terminal");
    desktop.open("minesweeper");
    desktop.dispatch(DesktopAction::BringToForeground {
        instance_id: first,
        now_ms: 0,
    });

    desktop.dispatch(DesktopAction::ToggleExpose);
    let entered = expose_layout(&desktop.state);
    let mut indices: Vec<_> = entered.iter().map(|slot| slot.index).collect();
    indices.sort_unstable();
    assert_eq!(indices, vec![0, 1, 2, 3]);

    desktop.dispatch(DesktopAction::ToggleExpose);
    desktop.dispatch(DesktopAction::ToggleExpose);
    assert_eq!(expose_layout(&desktop.state), entered);
}

#[test]
fn close_during_minimize_commits_only_the_close() {
    let mut desktop = Desktop::new();
    let id = desktop.open("textedit");

    desktop.dispatch(DesktopAction::RequestMinimize {
        instance_id: id,
        anchor: None,
        now_ms: 0,
    });
    desktop.dispatch(DesktopAction::PerformClose {
        instance_id: id,
        now_ms: 100,
    });
    desktop.dispatch(DesktopAction::PerformClose {
        instance_id: id,
        now_ms: 120,
    });
    desktop.settle(150);

    let events = desktop.lifecycle(id);
    assert_eq!(
        events
            .iter()
            .filter(|event| **event == AppLifecycleEvent::Closed)
            .count(),
        1
    );
    assert!(!events.contains(&AppLifecycleEvent::Minimized));
    assert!(desktop.state.instance(id).is_none());
    assert!(desktop.windows.transition(id).is_none());
}
