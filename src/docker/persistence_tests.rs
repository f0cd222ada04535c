use std::cell::RefCell;
use std::rc::Rc;

use egui::Vec2;
use serde_json::{Value, json};

use super::test_util::{assert_tree_ok, container, docker_with_types, test_options};
use super::{
    CollapseSide, CollapsersMarker, DockEvent, DockLocation, DockTarget, Docker, LAYOUT_SNAPSHOT_VERSION, LayoutError,
    NodeSnapshot, PanelOptions, PanelType,
};

/// A "Log" type whose panels keep a pin button and persist `{"lines": n}`.
fn docker_with_log(restored: Rc<RefCell<Vec<Value>>>) -> Docker {
    let mut docker = docker_with_types(&["A", "B"]);
    docker
        .register_panel_type(
            "Log",
            PanelType::new(move |panel, _options| {
                panel.add_button("pin", true);
                panel.on(DockEvent::SaveLayout, |args| {
                    args.data = Some(json!({ "lines": 42 }));
                });
                let restored = Rc::clone(&restored);
                panel.on(DockEvent::RestoreLayout, move |args| {
                    if let Some(data) = &args.data {
                        restored.borrow_mut().push(data.clone());
                    }
                });
                Box::new(())
            }),
        )
        .unwrap();
    docker
}

#[test]
fn split_layout_round_trips_with_panel_settings() {
    let mut docker = docker_with_types(&["A", "B"]);
    let a = docker
        .add_panel("A", DockLocation::Top, None, PanelOptions::default())
        .unwrap();
    let b = docker
        .add_panel("B", DockLocation::Right, Some(a.into()), PanelOptions::default())
        .unwrap();
    docker
        .add_panel("A", DockLocation::Bottom, Some(b.into()), PanelOptions::default())
        .unwrap();
    docker.set_splitter_pos(docker.root().unwrap(), 0.35).unwrap();
    {
        let panel = docker.panel_mut(a).unwrap();
        panel.set_title("Sources");
        panel.set_title_visible(false);
        panel.set_closeable(false);
        panel.set_min_size(Vec2::new(120.0, 80.0));
        panel.set_max_size(Vec2::new(600.0, f32::INFINITY));
    }
    let before = docker.structure_signature();

    let json = docker.save().unwrap();
    docker.restore(&json).unwrap();
    assert_tree_ok(&docker);
    assert_eq!(docker.structure_signature(), before);

    let root = docker.root().unwrap();
    assert!((docker.splitter(root).unwrap().pos() - 0.35).abs() < 1e-6);

    let restored = docker
        .find_panels(Some("A"))
        .into_iter()
        .filter_map(|p| docker.panel(p))
        .find(|p| p.title() == "Sources")
        .unwrap();
    assert!(!restored.is_title_visible());
    assert!(!restored.is_closeable());
    assert!(restored.is_moveable());
    assert_eq!(restored.min_size(), Vec2::new(120.0, 80.0));
    assert_eq!(restored.max_size(), Vec2::new(600.0, f32::INFINITY));
}

#[test]
fn json_uses_tagged_nodes_and_infinity_tokens() {
    let mut docker = docker_with_types(&["A", "B"]);
    let a = docker
        .add_panel("A", DockLocation::Top, None, PanelOptions::default())
        .unwrap();
    docker
        .add_panel("B", DockLocation::Left, Some(a.into()), PanelOptions::default())
        .unwrap();

    let json = docker.save().unwrap();
    assert!(json.contains("\"Infinity\""), "{json}");

    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["version"], json!(LAYOUT_SNAPSHOT_VERSION));
    assert_eq!(value["root"]["type"], "Splitter");
    assert_eq!(value["root"]["horizontal"], true);
    let left = &value["root"]["pane0"];
    assert_eq!(left["type"], "Frame");
    assert_eq!(left["panels"][0]["type"], "Panel");
    assert_eq!(left["panels"][0]["panelType"], "B");
    assert_eq!(left["panels"][0]["maxSize"]["x"], "Infinity");
}

#[test]
fn panels_of_unknown_types_are_skipped() {
    let mut source = docker_with_types(&["A", "B"]);
    let a = source
        .add_panel("A", DockLocation::Top, None, PanelOptions::default())
        .unwrap();
    source
        .add_panel("B", DockLocation::Right, Some(a.into()), PanelOptions::default())
        .unwrap();
    let json = source.save().unwrap();

    let mut docker = docker_with_types(&["A"]);
    docker.restore(&json).unwrap();
    assert_tree_ok(&docker);

    let root = docker.root().unwrap();
    let frame = docker.frame(root).expect("the emptied split collapses into A's frame");
    assert_eq!(frame.panels().len(), 1);
    assert_eq!(docker.panel(frame.panels()[0]).unwrap().type_name(), "A");
    assert!(docker.splitters().is_empty());
    assert_eq!(docker.placeholder(), None);
}

#[test]
fn nothing_restorable_leaves_a_placeholder() {
    let mut source = docker_with_types(&["B"]);
    source
        .add_panel("B", DockLocation::Top, None, PanelOptions::default())
        .unwrap();
    let json = source.save().unwrap();

    let mut docker = docker_with_types(&["A"]);
    docker
        .add_panel("A", DockLocation::Top, None, PanelOptions::default())
        .unwrap();
    docker.restore(&json).unwrap();
    assert_tree_ok(&docker);
    assert!(docker.find_panels(Some("A")).is_empty());
    let placeholder = docker.placeholder().unwrap();
    assert_eq!(docker.frame(docker.root().unwrap()).unwrap().panels(), &[placeholder]);
}

#[test]
fn version_mismatch_is_refused_before_touching_the_layout() {
    let mut docker = docker_with_types(&["A"]);
    docker
        .add_panel("A", DockLocation::Top, None, PanelOptions::default())
        .unwrap();
    let before = docker.structure_signature();

    let mut snapshot = docker.snapshot();
    snapshot.version = LAYOUT_SNAPSHOT_VERSION + 1;
    let err = docker.restore_snapshot(snapshot).unwrap_err();
    assert!(matches!(
        err,
        LayoutError::UnsupportedVersion { found, expected }
            if found == LAYOUT_SNAPSHOT_VERSION + 1 && expected == LAYOUT_SNAPSHOT_VERSION
    ));
    assert_eq!(docker.structure_signature(), before);

    assert!(matches!(docker.restore("{not json"), Err(LayoutError::Json(_))));
    assert_eq!(docker.structure_signature(), before);
}

#[test]
fn panel_handlers_carry_custom_data_and_button_state() {
    let restored: Rc<RefCell<Vec<Value>>> = Rc::default();
    let mut docker = docker_with_log(Rc::clone(&restored));
    let log = docker
        .add_panel("Log", DockLocation::Top, None, PanelOptions::default())
        .unwrap();
    assert!(docker.click_button(log, "pin").unwrap());

    let json = docker.save().unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    let saved = &value["root"]["panels"][0];
    assert_eq!(saved["customData"], json!({ "lines": 42 }));
    assert_eq!(saved["toggledButtons"], json!([["pin", true]]));

    docker.restore(&json).unwrap();
    assert_eq!(*restored.borrow(), vec![json!({ "lines": 42 })]);

    let log = docker.find_panels(Some("Log"))[0];
    let pin = &docker.panel(log).unwrap().buttons()[0];
    assert!(pin.toggled);
}

#[test]
fn floating_frames_keep_their_geometry() {
    let mut docker = docker_with_types(&["A", "B"]);
    docker
        .add_panel("A", DockLocation::Top, None, PanelOptions::default())
        .unwrap();
    let b = docker
        .add_panel(
            "B",
            DockLocation::Float,
            None,
            PanelOptions::default().with_pos(100.0, 100.0).with_size(300.0, 200.0),
        )
        .unwrap();
    let frame = docker.frame(docker.panel_frame(b).unwrap()).unwrap();
    let (pos, size) = (frame.pos(), frame.size());

    let json = docker.save().unwrap();
    docker.restore(&json).unwrap();
    assert_tree_ok(&docker);

    assert_eq!(docker.floating_frames().len(), 1);
    let frame = docker.frame(docker.floating_frames()[0]).unwrap();
    assert_eq!(frame.pos(), pos);
    assert_eq!(frame.size(), size);
    assert!(!frame.is_modal());
}

#[test]
fn collapser_drawer_sizes_survive() {
    let mut docker = docker_with_types(&["A", "B"]);
    docker
        .add_panel("A", DockLocation::Top, None, PanelOptions::default())
        .unwrap();
    let snapshot = {
        docker
            .add_panel("B", DockLocation::Right, Some(DockTarget::Collapsed), PanelOptions::default())
            .unwrap();
        let mut snapshot = docker.snapshot();
        let collapsers = snapshot.collapsers.as_mut().unwrap();
        assert_eq!(collapsers.right.panels.len(), 1);
        collapsers.right.size = 333.0;
        snapshot
    };

    docker.restore_snapshot(snapshot).unwrap();
    assert_tree_ok(&docker);
    let right = docker.collapser(CollapseSide::Right).unwrap();
    assert_eq!(docker.frame(right).unwrap().size().x, 333.0);
    assert!(matches!(
        docker.snapshot().root,
        Some(NodeSnapshot::Collapsers(CollapsersMarker { content: Some(content) }))
            if matches!(*content, NodeSnapshot::Frame(_))
    ));
}

#[test]
fn collapsers_below_a_root_split_stay_in_place() {
    let mut docker = docker_with_types(&["A", "B", "C"]);
    docker
        .add_panel("A", DockLocation::Top, None, PanelOptions::default())
        .unwrap();
    docker
        .add_panel("B", DockLocation::Left, Some(DockTarget::Collapsed), PanelOptions::default())
        .unwrap();
    let root = docker.root().unwrap();
    docker
        .add_panel("C", DockLocation::Left, Some(DockTarget::Node(root)), PanelOptions::default())
        .unwrap();
    let before = docker.structure_signature();

    let json = docker.save().unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["root"]["type"], "Splitter");
    assert_eq!(value["root"]["pane1"]["type"], "Collapsers");

    docker.restore(&json).unwrap();
    assert_tree_ok(&docker);
    assert_eq!(docker.structure_signature(), before);
}

#[test]
fn collapsers_beside_a_static_frame_stay_in_place() {
    let mut docker = docker_with_types(&["A", "B", "C"]);
    docker
        .register_panel_type(
            "Tool",
            PanelType::new(|panel, _options| {
                panel.set_moveable(false);
                Box::new(())
            }),
        )
        .unwrap();
    let a = docker
        .add_panel("A", DockLocation::Top, None, PanelOptions::default())
        .unwrap();
    let tool = docker
        .add_panel("Tool", DockLocation::Top, Some(a.into()), PanelOptions::default())
        .unwrap();
    docker
        .add_panel("B", DockLocation::Left, Some(DockTarget::Collapsed), PanelOptions::default())
        .unwrap();
    docker
        .add_panel("C", DockLocation::Left, Some(tool.into()), PanelOptions::default())
        .unwrap();
    let before = docker.structure_signature();

    let json = docker.save().unwrap();
    docker.restore(&json).unwrap();
    assert_tree_ok(&docker);
    assert_eq!(docker.structure_signature(), before);
    assert_eq!(docker.collapser_content(), docker.panel_frame(docker.find_panels(Some("A"))[0]));
}

#[test]
fn layouts_round_trip_through_files() {
    let mut docker = docker_with_types(&["A", "B"]);
    let a = docker
        .add_panel("A", DockLocation::Top, None, PanelOptions::default())
        .unwrap();
    docker
        .add_panel("B", DockLocation::Stacked, Some(a.into()), PanelOptions::default())
        .unwrap();
    let before = docker.structure_signature();

    let path = std::env::temp_dir().join(format!("dock_layout_{}.json", std::process::id()));
    docker.save_to_file(&path).unwrap();

    let mut other = Docker::new(container(), test_options());
    for name in ["A", "B"] {
        other
            .register_panel_type(name, PanelType::new(|_panel, _options| Box::new(())))
            .unwrap();
    }
    other.restore_from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(other.structure_signature(), before);
    assert!(matches!(other.restore_from_file(&path), Err(LayoutError::Io(_))));
}

#[cfg(feature = "ron")]
#[test]
fn ron_round_trip() {
    let mut docker = docker_with_types(&["A", "B"]);
    let a = docker
        .add_panel("A", DockLocation::Top, None, PanelOptions::default())
        .unwrap();
    docker
        .add_panel("B", DockLocation::Bottom, Some(a.into()), PanelOptions::default())
        .unwrap();
    let before = docker.structure_signature();

    let ron = docker.save_ron().unwrap();
    docker.restore_ron(&ron).unwrap();
    assert_tree_ok(&docker);
    assert_eq!(docker.structure_signature(), before);
}
