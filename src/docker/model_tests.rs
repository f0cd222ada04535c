//! Randomized operation sequences. Every structural operation runs the integrity checker (panicking),
//! and the layout is periodically pushed through save/restore.

use egui::{PointerButton, Pos2};

use super::test_util::{Rng, assert_tree_ok, docker_with_types};
use super::{
    CollapseSide, DockLocation, DockTarget, Docker, NodeId, PanelId, PanelOptions, PanelType, PointerInput,
};

const TYPES: [&str; 4] = ["A", "B", "C", "Tool"];

const LOCATIONS: [DockLocation; 7] = [
    DockLocation::Modal,
    DockLocation::Float,
    DockLocation::Top,
    DockLocation::Left,
    DockLocation::Right,
    DockLocation::Bottom,
    DockLocation::Stacked,
];

fn random_location(rng: &mut Rng) -> DockLocation {
    // Modal frames block gestures, keep them rare.
    loop {
        let location = rng.pick(&LOCATIONS).unwrap_or(DockLocation::Top);
        if location != DockLocation::Modal || rng.next_usize(8) == 0 {
            return location;
        }
    }
}

fn random_target(docker: &Docker, rng: &mut Rng) -> Option<DockTarget> {
    match rng.next_usize(6) {
        0 => None,
        1 => Some(DockTarget::Collapsed),
        2 => docker.root().map(DockTarget::Node),
        3 => {
            let nodes: Vec<NodeId> = docker.frames().iter().chain(docker.splitters()).copied().collect();
            rng.pick(&nodes).map(DockTarget::Node)
        }
        _ => rng.pick(&docker.find_panels(None)).map(DockTarget::Panel),
    }
}

/// The plain types plus "Tool", whose panels are fixed in place (edge-static frames).
fn docker_with_tool() -> Docker {
    let mut docker = docker_with_types(&TYPES[..3]);
    docker
        .register_panel_type(
            "Tool",
            PanelType::new(|panel, _options| {
                panel.set_moveable(false);
                Box::new(())
            }),
        )
        .unwrap();
    docker
}

/// Panels a user could pick up: moveable, and not the placeholder.
fn moveable_panels(docker: &Docker) -> Vec<PanelId> {
    docker
        .find_panels(None)
        .into_iter()
        .filter(|p| {
            docker
                .panel(*p)
                .is_some_and(|p| p.is_moveable() && !p.is_placeholder())
        })
        .collect()
}

fn random_point(rng: &mut Rng) -> Pos2 {
    Pos2::new(rng.next_usize(1000) as f32, rng.next_usize(800) as f32)
}

fn random_gesture(docker: &mut Docker, rng: &mut Rng) {
    docker.force_update();
    let button = match rng.next_usize(6) {
        0 => PointerButton::Middle,
        1 => PointerButton::Secondary,
        _ => PointerButton::Primary,
    };
    let input = |pos| PointerInput::primary(pos).with_button(button);

    docker.pointer_down(input(random_point(rng)));
    for _ in 0..=rng.next_usize(3) {
        docker.pointer_move(input(random_point(rng)));
    }
    if rng.next_usize(5) == 0 {
        docker.cancel();
    } else {
        let pos = docker.ghost().map_or_else(|| random_point(rng), |g| g.pointer());
        docker.pointer_up(input(pos));
    }
    assert!(docker.gesture().is_idle());
}

fn step(docker: &mut Docker, rng: &mut Rng, now: &mut u64) {
    match rng.next_usize(12) {
        0..=2 => {
            let type_name = rng.pick(&TYPES).unwrap_or("A");
            let location = random_location(rng);
            let target = random_target(docker, rng);
            docker
                .add_panel(type_name, location, target, PanelOptions::default())
                .ok();
        }
        3 => {
            if let Some(panel) = rng.pick(&docker.find_panels(None)) {
                docker.remove_panel(panel).ok();
            }
        }
        4 | 5 => {
            if let Some(panel) = rng.pick(&moveable_panels(docker)) {
                let location = random_location(rng);
                let target = random_target(docker, rng);
                docker
                    .move_panel(panel, location, target, PanelOptions::default())
                    .ok();
            }
        }
        6 => {
            let side = rng.pick(&CollapseSide::ALL).unwrap_or(CollapseSide::Left);
            if let Some(panel) = rng.pick(&moveable_panels(docker)) {
                docker.collapse_panel(panel, side).ok();
            }
        }
        7 => {
            let collapsed: Vec<PanelId> = CollapseSide::ALL
                .into_iter()
                .filter_map(|side| docker.collapser(side))
                .filter_map(|frame| docker.frame(frame))
                .flat_map(|f| f.panels().to_vec())
                .collect();
            if let Some(panel) = rng.pick(&collapsed) {
                if rng.next_usize(2) == 0 {
                    docker.expand_collapsed_panel(panel).ok();
                } else {
                    docker.open_drawer(panel).ok();
                }
            }
        }
        8 => {
            if let Some(frame) = rng.pick(docker.frames()) {
                let index = rng.next_usize(3);
                docker.select_tab(frame, index).ok();
            }
            if let Some(splitter) = rng.pick(docker.splitters()) {
                let ratio = rng.next_usize(101) as f32 / 100.0;
                docker.set_splitter_pos(splitter, ratio).ok();
            }
        }
        9 | 10 => random_gesture(docker, rng),
        _ => {
            *now += rng.next_usize(30) as u64;
            docker.tick(*now);
        }
    }
}

fn assert_round_trip(docker: &mut Docker) {
    for side in CollapseSide::ALL {
        docker.close_drawer(side);
    }
    let signature = docker.structure_signature();
    let panels = docker.find_panels(None).len();

    let json = docker.save().unwrap();
    docker.restore(&json).unwrap();
    assert_tree_ok(docker);
    assert_eq!(docker.structure_signature(), signature, "restored from {json}");
    assert_eq!(docker.find_panels(None).len(), panels);
}

fn run(seed: u64, steps: usize) {
    let mut docker = docker_with_tool();
    let mut rng = Rng::new(seed);
    let mut now = 0;

    for i in 0..steps {
        step(&mut docker, &mut rng, &mut now);
        assert_tree_ok(&docker);
        if i % 25 == 24 {
            assert_round_trip(&mut docker);
        }
    }
    docker.clear();
    assert_tree_ok(&docker);
    assert_eq!(docker.find_panels(None).len(), 1);
}

#[test]
fn random_operations_keep_the_tree_consistent() {
    for seed in [1, 7, 42, 1234] {
        run(seed, 300);
    }
}

#[test]
fn empty_layout_round_trips() {
    let mut docker = docker_with_tool();
    assert_round_trip(&mut docker);
    assert!(docker.placeholder().is_some());
}
