use std::cell::RefCell;
use std::rc::Rc;

use egui::{Pos2, Rect, Vec2};

use super::{DockEvent, Docker, DockerOptions, PanelId, PanelType};

pub(super) fn container() -> Rect {
    Rect::from_min_size(Pos2::ZERO, Vec2::new(1000.0, 800.0))
}

pub(super) fn test_options() -> DockerOptions {
    DockerOptions {
        debug_integrity: true,
        debug_integrity_panic: true,
        ..Default::default()
    }
}

/// A 1000x800 docker with a plain panel type registered per name, integrity checks panicking.
pub(super) fn docker_with_types(types: &[&str]) -> Docker {
    env_logger::builder().is_test(true).try_init().ok();
    let mut docker = Docker::new(container(), test_options());
    for name in types {
        docker
            .register_panel_type(name, PanelType::new(|_panel, _options| Box::new(())))
            .unwrap();
    }
    docker
}

pub(super) fn assert_tree_ok(docker: &Docker) {
    let issues = docker.integrity_issues();
    assert!(
        issues.is_empty(),
        "tree integrity failed:\n{}\n{}",
        issues.join("\n"),
        docker.debug_summary()
    );
}

pub(super) type EventLog = Rc<RefCell<Vec<(PanelId, DockEvent)>>>;

/// Record `events` delivered to each of `panels`, in delivery order.
pub(super) fn events_of(docker: &mut Docker, panels: &[PanelId], events: &[DockEvent]) -> EventLog {
    let log: EventLog = Rc::default();
    for panel in panels {
        for event in events {
            let log = Rc::clone(&log);
            let id = *panel;
            docker
                .on_panel(id, event.clone(), move |args| {
                    log.borrow_mut().push((id, args.event.clone()));
                })
                .unwrap();
        }
    }
    log
}

/// Record every global delivery of `events`.
pub(super) fn global_events(docker: &mut Docker, events: &[DockEvent]) -> Rc<RefCell<Vec<DockEvent>>> {
    let log: Rc<RefCell<Vec<DockEvent>>> = Rc::default();
    for event in events {
        let log = Rc::clone(&log);
        docker.on(event.clone(), move |args| log.borrow_mut().push(args.event.clone()));
    }
    log
}

#[derive(Clone)]
pub(super) struct Rng(u64);

impl Rng {
    pub(super) fn new(seed: u64) -> Self {
        Self(seed ^ 0xD0C3_D0C3_D0C3_D0C3)
    }

    pub(super) fn next_u64(&mut self) -> u64 {
        // Simple LCG: deterministic, fast, no dependency.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005u64)
            .wrapping_add(1442695040888963407u64);
        self.0 >> 11
    }

    pub(super) fn next_usize(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        (self.next_u64() as usize) % upper
    }

    pub(super) fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        (!items.is_empty()).then(|| items[self.next_usize(items.len())])
    }
}
