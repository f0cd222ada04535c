use egui::{Pos2, Rect};

use super::test_util::docker_with_types;
use super::{Anchor, CollapseSide, DockLocation, DockTarget, Docker, NodeId, PanelOptions};

/// `A | B`, split down the middle: A covers x 0..498, B covers x 502..1000.
fn side_by_side() -> (Docker, NodeId, NodeId) {
    let mut docker = docker_with_types(&["A", "B", "C"]);
    let a = docker
        .add_panel("A", DockLocation::Top, None, PanelOptions::default())
        .unwrap();
    let b = docker
        .add_panel("B", DockLocation::Right, Some(a.into()), PanelOptions::default())
        .unwrap();
    docker.force_update();
    let frame_a = docker.panel_frame(a).unwrap();
    let frame_b = docker.panel_frame(b).unwrap();
    (docker, frame_a, frame_b)
}

fn anchor_at(docker: &Docker, x: f32, y: f32) -> Option<Anchor> {
    docker.compute_anchor(Pos2::new(x, y), None, false, false)
}

#[test]
fn edge_bands_split_docked_frames() {
    let (docker, frame_a, frame_b) = side_by_side();

    let left = anchor_at(&docker, 50.0, 400.0).unwrap();
    assert_eq!(left.location, DockLocation::Left);
    assert_eq!(left.target, DockTarget::Node(frame_a));
    assert!(!left.is_self);
    assert_eq!(
        left.preview,
        Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(249.0, 800.0))
    );

    assert_eq!(anchor_at(&docker, 600.0, 750.0).unwrap().location, DockLocation::Bottom);
    assert_eq!(anchor_at(&docker, 980.0, 400.0).unwrap().target, DockTarget::Node(frame_b));
    assert_eq!(anchor_at(&docker, 980.0, 400.0).unwrap().location, DockLocation::Right);
}

#[test]
fn tab_strip_and_center_stack() {
    let (docker, frame_a, _) = side_by_side();

    let on_tab = anchor_at(&docker, 50.0, 10.0).unwrap();
    assert_eq!(on_tab.location, DockLocation::Stacked);
    assert_eq!(on_tab.tab_index, Some(0));

    let on_strip = anchor_at(&docker, 300.0, 10.0).unwrap();
    assert_eq!(on_strip.location, DockLocation::Stacked);
    assert_eq!(on_strip.tab_index, None);

    let center = anchor_at(&docker, 250.0, 400.0).unwrap();
    assert_eq!(center.location, DockLocation::Stacked);
    assert_eq!(center.frame, frame_a);
}

#[test]
fn splitter_bar_is_not_a_drop_target() {
    let (docker, _, _) = side_by_side();
    assert_eq!(anchor_at(&docker, 500.0, 400.0), None);
}

#[test]
fn dragging_from_a_frame_checks_that_frame_first() {
    let (mut docker, frame_a, frame_b) = side_by_side();
    let b = docker.frame(frame_b).unwrap().panels()[0];
    docker
        .add_panel("B", DockLocation::Stacked, Some(b.into()), PanelOptions::default())
        .unwrap();
    docker.force_update();

    // One of several tabs may split its own frame.
    let own_edge = docker
        .compute_anchor(Pos2::new(990.0, 400.0), Some(frame_b), true, false)
        .unwrap();
    assert!(own_edge.is_self);
    assert_eq!(own_edge.location, DockLocation::Right);

    let own_tab = docker
        .compute_anchor(Pos2::new(650.0, 10.0), Some(frame_b), true, false)
        .unwrap();
    assert!(own_tab.is_self);
    assert_eq!(own_tab.location, DockLocation::Stacked);
    assert_eq!(own_tab.tab_index, Some(1));

    // A single tab over its own body has nowhere to go.
    assert_eq!(
        docker.compute_anchor(Pos2::new(250.0, 400.0), Some(frame_a), true, false),
        None
    );
    // A whole frame never splits itself.
    let whole = docker.compute_anchor(Pos2::new(990.0, 400.0), Some(frame_b), false, false);
    assert_eq!(whole, None);
}

#[test]
fn force_float_ignores_other_frames() {
    let (docker, _, frame_b) = side_by_side();
    assert!(anchor_at(&docker, 980.0, 400.0).is_some());
    assert_eq!(
        docker.compute_anchor(Pos2::new(980.0, 400.0), None, false, true),
        None
    );
    // The source's own tab strip still answers.
    assert!(
        docker
            .compute_anchor(Pos2::new(550.0, 10.0), Some(frame_b), true, true)
            .is_some_and(|a| a.is_self)
    );
}

#[test]
fn floating_frames_occlude_and_only_stack() {
    let (mut docker, frame_a, _) = side_by_side();
    assert_eq!(anchor_at(&docker, 110.0, 250.0).unwrap().location, DockLocation::Left);

    let c = docker
        .add_panel(
            "C",
            DockLocation::Float,
            None,
            PanelOptions::default().with_pos(100.0, 100.0).with_size(300.0, 200.0),
        )
        .unwrap();
    docker.force_update();
    let frame_c = docker.panel_frame(c).unwrap();

    let over_float = anchor_at(&docker, 110.0, 250.0).unwrap();
    assert_eq!(over_float.location, DockLocation::Stacked);
    assert_eq!(over_float.target, DockTarget::Node(frame_c));

    // Outside the floating frame the docked frame is reachable again.
    assert_eq!(anchor_at(&docker, 50.0, 600.0).unwrap().frame, frame_a);
}

#[test]
fn open_modal_blocks_every_anchor() {
    let (mut docker, _, _) = side_by_side();
    docker
        .add_panel(
            "C",
            DockLocation::Modal,
            None,
            PanelOptions::default().with_pos(600.0, 100.0).with_size(200.0, 200.0),
        )
        .unwrap();
    docker.force_update();

    assert_eq!(anchor_at(&docker, 700.0, 200.0), None);
    assert_eq!(anchor_at(&docker, 900.0, 600.0), None);
}

#[test]
fn collapser_bars_map_to_collapsed_targets() {
    let mut docker = docker_with_types(&["A", "B"]);
    docker
        .add_panel("A", DockLocation::Top, None, PanelOptions::default())
        .unwrap();
    docker
        .add_panel("B", DockLocation::Left, Some(DockTarget::Collapsed), PanelOptions::default())
        .unwrap();
    docker.force_update();

    let left_bar = docker.collapser(CollapseSide::Left).unwrap();
    assert!(docker.frame(left_bar).unwrap().rect().contains(Pos2::new(10.0, 400.0)));

    let anchor = anchor_at(&docker, 10.0, 400.0).unwrap();
    assert_eq!(anchor.target, DockTarget::Collapsed);
    assert_eq!(anchor.location, DockLocation::Left);
    assert_eq!(anchor.frame, left_bar);
}

#[test]
fn same_layout_and_pointer_give_the_same_anchor() {
    let (docker, _, _) = side_by_side();
    for y in (0..800).step_by(37) {
        for x in (0..1000).step_by(41) {
            let p = Pos2::new(x as f32, y as f32);
            assert_eq!(
                docker.compute_anchor(p, None, false, false),
                docker.compute_anchor(p, None, false, false)
            );
        }
    }
}
