use egui::Vec2;

use super::Docker;
use super::error::DockError;
use super::frame::Frame;
use super::panel::PanelOptions;
use super::types::{CollapseSide, Collapsers, DockLocation, DockTarget, Node, NodeId, PanelId};

impl Docker {
    /// Create the three collapsers if collapsing is enabled and they don't exist yet.
    ///
    /// The wrap point walks down from the root past edge-static frames (all panels fixed in place), so
    /// static toolbars stay outside the drawers. Left wraps first, right wraps the left splitter, bottom
    /// wraps everything.
    pub(super) fn init_collapsers(&mut self) {
        if !self.options.is_collapse_enabled() || self.collapsers.is_some() {
            return;
        }
        let Some(mut anchor) = self.root else {
            return;
        };

        while let Some(s) = self.splitter(anchor) {
            let [Some(a), Some(b)] = s.panes else {
                break;
            };
            match (self.is_static_frame(a), self.is_static_frame(b)) {
                (true, false) => anchor = b,
                (false, true) => anchor = a,
                _ => break,
            }
        }
        self.init_collapsers_around(anchor);
    }

    /// Create the collapsers with `anchor` as their content, wherever it sits in the tree.
    pub(super) fn init_collapsers_around(&mut self, anchor: NodeId) {
        if !self.options.is_collapse_enabled() || self.collapsers.is_some() {
            return;
        }
        let left = self.wrap_collapser(anchor, CollapseSide::Left);
        let right = self.wrap_collapser(self.collapser_parent(left).unwrap_or(anchor), CollapseSide::Right);
        let bottom = self.wrap_collapser(self.collapser_parent(right).unwrap_or(anchor), CollapseSide::Bottom);

        self.collapsers = Some(Collapsers { left, right, bottom });
        log::debug!("collapsers created around {anchor}: left={left} right={right} bottom={bottom}");
        self.update();
    }

    fn wrap_collapser(&mut self, anchor: NodeId, side: CollapseSide) -> NodeId {
        let drawer = match side {
            CollapseSide::Left | CollapseSide::Right => Vec2::new(self.options.default_drawer_size.x, 0.0),
            CollapseSide::Bottom => Vec2::new(0.0, self.options.default_drawer_size.y),
        };
        let frame = self.insert_frame(Frame::collapser(side, drawer));
        let ratio = if side == CollapseSide::Left { 0.0 } else { 1.0 };
        self.wrap_node(anchor, side.location(), frame, ratio);
        frame
    }

    fn collapser_parent(&self, collapser: NodeId) -> Option<NodeId> {
        self.nodes.get(&collapser).and_then(Node::parent)
    }

    /// The docked content the collapsers surround.
    pub(super) fn collapser_content(&self) -> Option<NodeId> {
        let left = self.collapsers?.left;
        let parent = self.collapser_parent(left)?;
        self.splitter(parent)?.other_pane(left)
    }

    /// Move a docked or floating panel into the drawer on `side`.
    pub fn collapse_panel(&mut self, panel: PanelId, side: CollapseSide) -> Result<PanelId, DockError> {
        self.move_panel(panel, side.location(), Some(DockTarget::Collapsed), PanelOptions::default())
    }

    /// Dock a collapsed panel back beside the collapsers, as wide (or tall) as its drawer was.
    pub fn expand_collapsed_panel(&mut self, panel: PanelId) -> Result<PanelId, DockError> {
        let frame = self.panel_frame(panel).ok_or(DockError::PanelDetached(panel))?;
        let Some((side, size)) = self
            .frame(frame)
            .and_then(|f| Some((f.collapser_side()?, f.drawer_rect.map_or(f.size, |r| r.size()))))
        else {
            return Err(DockError::InvalidCollapseLocation(DockLocation::Stacked));
        };

        let options = match side {
            CollapseSide::Bottom => PanelOptions::default().with_height(size.y),
            CollapseSide::Left | CollapseSide::Right => PanelOptions::default().with_width(size.x),
        };
        if let Some(f) = self.frame_mut(frame) {
            f.collapse();
        }
        let target = self.collapser_content().map(DockTarget::Node);
        self.move_panel(panel, side.location(), target, options)
    }

    /// Show a collapsed panel in its drawer and focus it. The drawer closes again when focus leaves.
    pub fn open_drawer(&mut self, panel: PanelId) -> Result<(), DockError> {
        let frame = self.panel_frame(panel).ok_or(DockError::PanelDetached(panel))?;
        if !self.frame(frame).is_some_and(Frame::is_collapser) {
            return Err(DockError::InvalidCollapseLocation(DockLocation::Stacked));
        }
        self.focus_panel(panel)
    }

    pub fn close_drawer(&mut self, side: CollapseSide) {
        let Some(frame) = self.collapser(side) else {
            return;
        };
        if self.frame_mut(frame).is_some_and(Frame::collapse) {
            if self.focus == Some(frame) {
                self.set_focus(None);
            }
            self.update();
        }
    }

    /// The collapser drawer that is currently open, if any.
    pub fn open_collapser(&self) -> Option<NodeId> {
        self.collapsers?
            .iter()
            .map(|(_, frame)| frame)
            .find(|f| self.frame(*f).is_some_and(Frame::is_expanded))
    }
}
