use std::path::Path;

use egui::{Pos2, Vec2};
use serde_json::Value;

use super::Docker;
use super::events::DockEvent;
use super::frame::Frame;
use super::panel::{PANEL_PLACEHOLDER, Panel};
use super::splitter::Splitter;
use super::types::{CollapseSide, NodeId, PanelHost, PanelId, TabOrientation};

pub const LAYOUT_SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug)]
pub enum LayoutError {
    UnsupportedVersion { found: u32, expected: u32 },
    Json(serde_json::Error),
    #[cfg(feature = "ron")]
    RonSerialize(ron::Error),
    #[cfg(feature = "ron")]
    RonDeserialize(ron::error::SpannedError),
    Io(std::io::Error),
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedVersion { found, expected } => {
                write!(f, "unsupported layout snapshot version: {found} (expected {expected})")
            }
            Self::Json(err) => write!(f, "json error: {err}"),
            #[cfg(feature = "ron")]
            Self::RonSerialize(err) => write!(f, "ron serialize error: {err}"),
            #[cfg(feature = "ron")]
            Self::RonDeserialize(err) => write!(f, "ron deserialize error: {err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnsupportedVersion { .. } => None,
            Self::Json(err) => Some(err),
            #[cfg(feature = "ron")]
            Self::RonSerialize(err) => Some(err),
            #[cfg(feature = "ron")]
            Self::RonDeserialize(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for LayoutError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for LayoutError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

#[cfg(feature = "ron")]
impl From<ron::Error> for LayoutError {
    fn from(err: ron::Error) -> Self {
        Self::RonSerialize(err)
    }
}

#[cfg(feature = "ron")]
impl From<ron::error::SpannedError> for LayoutError {
    fn from(err: ron::error::SpannedError) -> Self {
        Self::RonDeserialize(err)
    }
}

/// A 2D value whose components may be infinite (maximum sizes).
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PointSnapshot {
    #[serde(with = "super::infinity")]
    pub x: f32,
    #[serde(with = "super::infinity")]
    pub y: f32,
}

impl From<Vec2> for PointSnapshot {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Pos2> for PointSnapshot {
    fn from(p: Pos2) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<PointSnapshot> for Vec2 {
    fn from(p: PointSnapshot) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<PointSnapshot> for Pos2 {
    fn from(p: PointSnapshot) -> Self {
        Self::new(p.x, p.y)
    }
}

/// Serialized form of a whole layout.
///
/// The collapser wrapper splitters are not stored. A [`NodeSnapshot::Collapsers`] node marks where
/// they sat, `collapsers` records the drawers' contents, and the wrappers are rebuilt at the marker.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSnapshot {
    pub version: u32,
    pub root: Option<NodeSnapshot>,
    #[serde(default)]
    pub floating: Vec<FrameSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsers: Option<CollapsersSnapshot>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(tag = "type")]
pub enum NodeSnapshot {
    Splitter(SplitterSnapshot),
    Frame(FrameSnapshot),
    /// Position of the collapser wrappers; `content` is the docked subtree they surround.
    Collapsers(CollapsersMarker),
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CollapsersMarker {
    pub content: Option<Box<NodeSnapshot>>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitterSnapshot {
    pub horizontal: bool,
    pub pos: f32,
    pub pane0: Option<Box<NodeSnapshot>>,
    pub pane1: Option<Box<NodeSnapshot>>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSnapshot {
    #[serde(default)]
    pub floating: bool,
    #[serde(default)]
    pub modal: bool,
    /// Center of a floating frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<PointSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<PointSnapshot>,
    #[serde(default)]
    pub tab_orientation: TabOrientation,
    pub cur_tab: Option<usize>,
    #[serde(default)]
    pub focused: bool,
    pub panels: Vec<PanelSnapshot>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(tag = "type", rename = "Panel", rename_all = "camelCase")]
pub struct PanelSnapshot {
    pub panel_type: String,
    pub title: String,
    pub title_visible: bool,
    pub moveable: bool,
    pub closeable: bool,
    pub min_size: PointSnapshot,
    pub max_size: PointSnapshot,
    /// Toggle state of toggleable buttons, by name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub toggled_buttons: Vec<(String, bool)>,
    /// Whatever the panel's `SaveLayout` handlers put into the event data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CollapsersSnapshot {
    pub left: CollapserSnapshot,
    pub right: CollapserSnapshot,
    pub bottom: CollapserSnapshot,
}

impl CollapsersSnapshot {
    fn get(&self, side: CollapseSide) -> &CollapserSnapshot {
        match side {
            CollapseSide::Left => &self.left,
            CollapseSide::Right => &self.right,
            CollapseSide::Bottom => &self.bottom,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CollapserSnapshot {
    /// Drawer width (left/right) or height (bottom).
    pub size: f32,
    pub panels: Vec<PanelSnapshot>,
}

#[derive(Default)]
struct RestoreState {
    restored: Vec<(PanelId, Option<Value>)>,
    focus: Option<NodeId>,
    collapser_content: Option<NodeId>,
}

#[cfg(feature = "ron")]
fn pretty_ron_config() -> ron::ser::PrettyConfig {
    ron::ser::PrettyConfig::new()
        .depth_limit(128)
        .separate_tuple_members(true)
        .enumerate_arrays(true)
}

impl Docker {
    /// Capture the layout. Each panel's `SaveLayout` handlers may fill in custom data.
    pub fn snapshot(&mut self) -> LayoutSnapshot {
        let root = self.root.and_then(|root| self.snapshot_node(root));
        let floating = self
            .floating
            .clone()
            .into_iter()
            .filter_map(|frame| self.snapshot_frame(frame))
            .collect();
        let collapsers = self.collapsers;
        let collapsers = collapsers.map(|c| CollapsersSnapshot {
            left: self.snapshot_collapser(c.left, CollapseSide::Left),
            right: self.snapshot_collapser(c.right, CollapseSide::Right),
            bottom: self.snapshot_collapser(c.bottom, CollapseSide::Bottom),
        });
        LayoutSnapshot {
            version: LAYOUT_SNAPSHOT_VERSION,
            root,
            floating,
            collapsers,
        }
    }

    /// Serialize the layout to JSON. Infinite sizes are written as `"Infinity"`.
    pub fn save(&mut self) -> Result<String, LayoutError> {
        let snapshot = self.snapshot();
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Replace the current layout with one produced by [`Self::save`].
    pub fn restore(&mut self, json: &str) -> Result<(), LayoutError> {
        let snapshot: LayoutSnapshot = serde_json::from_str(json)?;
        self.restore_snapshot(snapshot)
    }

    pub fn save_to_file(&mut self, path: impl AsRef<Path>) -> Result<(), LayoutError> {
        let json = self.save()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn restore_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), LayoutError> {
        let json = std::fs::read_to_string(path)?;
        self.restore(&json)
    }

    #[cfg(feature = "ron")]
    pub fn save_ron(&mut self) -> Result<String, LayoutError> {
        let snapshot = self.snapshot();
        Ok(ron::ser::to_string_pretty(&snapshot, pretty_ron_config())?)
    }

    #[cfg(feature = "ron")]
    pub fn restore_ron(&mut self, ron: &str) -> Result<(), LayoutError> {
        let snapshot: LayoutSnapshot = ron::from_str(ron)?;
        self.restore_snapshot(snapshot)
    }

    /// Rebuild the layout from `snapshot`, discarding the current one.
    ///
    /// Panels of unregistered types are skipped; frames left without panels are dropped and their
    /// splitters collapsed. Each restored panel receives `RestoreLayout` with its saved custom data.
    /// The version is checked before anything is touched.
    pub fn restore_snapshot(&mut self, snapshot: LayoutSnapshot) -> Result<(), LayoutError> {
        if snapshot.version != LAYOUT_SNAPSHOT_VERSION {
            return Err(LayoutError::UnsupportedVersion {
                found: snapshot.version,
                expected: LAYOUT_SNAPSHOT_VERSION,
            });
        }

        self.clear_layout();
        let mut state = RestoreState::default();

        self.root = snapshot
            .root
            .and_then(|root| self.restore_node(root, None, &mut state));
        for frame in snapshot.floating {
            self.restore_frame(frame, None, &mut state);
        }
        if self.root.is_none() {
            self.add_placeholder(None);
        }

        if let Some(collapsers) = snapshot.collapsers {
            match state.collapser_content.filter(|n| self.nodes.contains_key(n)) {
                Some(content) => self.init_collapsers_around(content),
                None => self.init_collapsers(),
            }
            for side in CollapseSide::ALL {
                if let Some(frame) = self.collapser(side) {
                    self.restore_collapser(frame, side, collapsers.get(side), &mut state);
                }
            }
        }

        let modals = self.modals.clone();
        self.floating.sort_by_key(|f| modals.iter().position(|m| m == f));

        if let Some(focus) = state.focus {
            self.set_focus(Some(focus));
        }
        for (panel, data) in state.restored {
            self.trigger_panel(panel, DockEvent::RestoreLayout, data);
        }
        log::debug!(
            "restored layout: {} frames, {} panels",
            self.frames.len(),
            self.panels.len()
        );
        self.structure_changed("restore");
        self.force_update();
        Ok(())
    }

    fn snapshot_node(&mut self, node: NodeId) -> Option<NodeSnapshot> {
        if self.frame(node).is_some() {
            return self.snapshot_frame(node).map(NodeSnapshot::Frame);
        }
        let s = self.splitter(node)?;
        let (horizontal, pos, [pane0, pane1]) = (s.horizontal, s.ratio, s.panes);

        // The outermost wrapper stands in for all three; the inner ones are never visited.
        if let Some(collapsers) = self.collapsers {
            if [pane0, pane1].into_iter().flatten().any(|p| collapsers.contains(p)) {
                let content = self.collapser_content();
                return Some(NodeSnapshot::Collapsers(CollapsersMarker {
                    content: content.and_then(|c| self.snapshot_node(c)).map(Box::new),
                }));
            }
        }

        Some(NodeSnapshot::Splitter(SplitterSnapshot {
            horizontal,
            pos,
            pane0: pane0.and_then(|p| self.snapshot_node(p)).map(Box::new),
            pane1: pane1.and_then(|p| self.snapshot_node(p)).map(Box::new),
        }))
    }

    fn snapshot_frame(&mut self, frame: NodeId) -> Option<FrameSnapshot> {
        let f = self.frame(frame)?;
        let floating = f.floating;
        let snapshot = FrameSnapshot {
            floating,
            modal: f.modal,
            pos: floating.then(|| f.pos.into()),
            size: floating.then(|| f.size.into()),
            tab_orientation: f.tab_orientation,
            cur_tab: f.cur_tab,
            focused: self.focus == Some(frame),
            panels: Vec::new(),
        };
        let panels = f.panels.clone();
        Some(FrameSnapshot {
            panels: panels
                .into_iter()
                .filter_map(|p| self.snapshot_panel(p))
                .collect(),
            ..snapshot
        })
    }

    fn snapshot_collapser(&mut self, frame: NodeId, side: CollapseSide) -> CollapserSnapshot {
        let (size, panels) = self.frame(frame).map_or((0.0, Vec::new()), |f| {
            let size = match side {
                CollapseSide::Bottom => f.size.y,
                CollapseSide::Left | CollapseSide::Right => f.size.x,
            };
            (size, f.panels.clone())
        });
        CollapserSnapshot {
            size,
            panels: panels
                .into_iter()
                .filter_map(|p| self.snapshot_panel(p))
                .collect(),
        }
    }

    fn snapshot_panel(&mut self, panel: PanelId) -> Option<PanelSnapshot> {
        let custom_data = self.trigger_panel(panel, DockEvent::SaveLayout, None);
        let p = self.panels.get(&panel)?;
        Some(PanelSnapshot {
            panel_type: p.type_name.clone(),
            title: p.title().to_owned(),
            title_visible: p.is_title_visible(),
            moveable: p.moveable,
            closeable: p.is_closeable(),
            min_size: p.min_size.into(),
            max_size: p.max_size.into(),
            toggled_buttons: p
                .buttons
                .iter()
                .filter(|b| b.toggleable)
                .map(|b| (b.name.clone(), b.toggled))
                .collect(),
            custom_data,
        })
    }

    fn restore_node(
        &mut self,
        snapshot: NodeSnapshot,
        parent: Option<NodeId>,
        state: &mut RestoreState,
    ) -> Option<NodeId> {
        let s = match snapshot {
            NodeSnapshot::Frame(frame) => return self.restore_frame(frame, parent, state),
            NodeSnapshot::Collapsers(marker) => {
                let content = marker.content.and_then(|n| self.restore_node(*n, parent, state));
                state.collapser_content = content;
                return content;
            }
            NodeSnapshot::Splitter(s) => s,
        };

        let mut splitter = Splitter::new(parent, s.horizontal);
        splitter.set_pos(s.pos);
        let id = self.insert_splitter(splitter);
        let pane0 = s.pane0.and_then(|n| self.restore_node(*n, Some(id), state));
        let pane1 = s.pane1.and_then(|n| self.restore_node(*n, Some(id), state));

        match (pane0, pane1) {
            (Some(a), Some(b)) => {
                self.set_splitter_pane(id, 0, Some(a));
                self.set_splitter_pane(id, 1, Some(b));
                Some(id)
            }
            (Some(only), None) | (None, Some(only)) => {
                self.destroy_splitter(id);
                self.set_parent(only, parent);
                Some(only)
            }
            (None, None) => {
                self.destroy_splitter(id);
                None
            }
        }
    }

    fn restore_frame(
        &mut self,
        snapshot: FrameSnapshot,
        parent: Option<NodeId>,
        state: &mut RestoreState,
    ) -> Option<NodeId> {
        let mut frame = if snapshot.floating {
            let size = snapshot
                .size
                .map_or(self.options.default_float_size, Vec2::from)
                .max(self.options.min_frame_size);
            let pos = snapshot.pos.map_or(self.container.center(), Pos2::from);
            Frame::floating(pos, size)
        } else {
            Frame::docked(parent)
        };
        frame.tab_orientation = snapshot.tab_orientation;
        let id = self.insert_frame(frame);

        // Saved tab index, remapped past skipped panels.
        let mut cur_tab = None;
        for (index, panel) in snapshot.panels.iter().enumerate() {
            let restored = self.restore_panel(panel, id, state);
            if restored.is_some() && (snapshot.cur_tab == Some(index) || cur_tab.is_none()) {
                cur_tab = self.frame(id).map(|f| f.panels.len() - 1);
            }
        }

        let f = self.frame_mut(id)?;
        if f.panels.is_empty() {
            self.nodes.remove(&id);
            self.frames.retain(|f| *f != id);
            return None;
        }
        f.cur_tab = cur_tab;

        if snapshot.floating {
            f.modal = snapshot.modal;
            self.floating.push(id);
            if snapshot.modal {
                self.modals.push(id);
            }
        }
        if snapshot.focused {
            state.focus = Some(id);
        }
        Some(id)
    }

    fn restore_collapser(
        &mut self,
        frame: NodeId,
        side: CollapseSide,
        snapshot: &CollapserSnapshot,
        state: &mut RestoreState,
    ) {
        for panel in &snapshot.panels {
            self.restore_panel(panel, frame, state);
        }
        if let Some(f) = self.frame_mut(frame) {
            if snapshot.size > 0.0 {
                match side {
                    CollapseSide::Bottom => f.size.y = snapshot.size,
                    CollapseSide::Left | CollapseSide::Right => f.size.x = snapshot.size,
                }
            }
        }
    }

    /// Create a panel from its snapshot and append it to `frame`.
    fn restore_panel(&mut self, snapshot: &PanelSnapshot, frame: NodeId, state: &mut RestoreState) -> Option<PanelId> {
        let type_name = snapshot.panel_type.as_str();
        let panel = if type_name == PANEL_PLACEHOLDER {
            if self.placeholder.is_some() {
                return None;
            }
            let id = PanelId(self.alloc_id());
            self.placeholder = Some(id);
            Panel::new_placeholder(id)
        } else {
            let Some(panel_type) = self.registry.get(type_name) else {
                log::warn!("skipping saved panel of unregistered type {type_name:?}");
                return None;
            };
            if let Some(limit) = panel_type.limit {
                let live = self.panels.values().filter(|p| p.type_name == type_name).count();
                if live >= limit {
                    log::warn!("skipping saved panel: type {type_name:?} is limited to {limit}");
                    return None;
                }
            }
            let id = PanelId(self.alloc_id());
            let mut panel = Panel::new(id, type_name);
            if let Some(panel_type) = self.registry.get(type_name) {
                let content = panel_type.create(&mut panel);
                panel.set_content(content);
            }
            apply_snapshot(&mut panel, snapshot);
            panel
        };

        let id = panel.id;
        self.panels.insert(id, panel);
        if let Some(f) = self.frame_mut(frame) {
            f.push_panel(id, None);
        }
        self.set_panel_host(id, PanelHost::Frame(frame));
        state.restored.push((id, snapshot.custom_data.clone()));
        Some(id)
    }
}

fn apply_snapshot(panel: &mut Panel, snapshot: &PanelSnapshot) {
    panel.set_title(snapshot.title.clone());
    panel.set_title_visible(snapshot.title_visible);
    panel.set_moveable(snapshot.moveable);
    panel.set_closeable(snapshot.closeable);
    panel.set_min_size(snapshot.min_size.into());
    panel.set_max_size(snapshot.max_size.into());
    for (name, toggled) in &snapshot.toggled_buttons {
        if let Some(button) = panel.buttons.iter_mut().find(|b| b.name == *name && b.toggleable) {
            button.toggled = *toggled;
        }
    }
}
