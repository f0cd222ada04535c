use egui::{Pos2, Vec2};

use super::Docker;
use super::frame::Frame;
use super::panel::{Panel, PanelOptions, ResolvedOptions};
use super::types::{DockLocation, DockTarget, Node, NodeId, PanelHost, PanelId};

impl Docker {
    /// Place a detached panel. Preconditions were checked by the caller.
    pub(super) fn place_panel(
        &mut self,
        panel: PanelId,
        location: DockLocation,
        target: Option<DockTarget>,
        options: &PanelOptions,
    ) {
        if location == DockLocation::Stacked {
            self.add_panel_grouped(panel, target, options);
        } else {
            self.add_panel_alone(panel, location, target, options);
        }
    }

    fn target_frame(&self, target: DockTarget) -> Option<NodeId> {
        match target {
            DockTarget::Panel(panel) => self.panel_frame(panel),
            DockTarget::Node(node) => self.frame(node).map(|_| node),
            DockTarget::Collapsed => None,
        }
    }

    /// As a new tab in the target's frame; a left dock when there is no such frame.
    fn add_panel_grouped(&mut self, panel: PanelId, target: Option<DockTarget>, options: &PanelOptions) {
        let Some(frame) = target.and_then(|t| self.target_frame(t)) else {
            self.add_panel_alone(panel, DockLocation::Left, target, options);
            return;
        };
        if let Some(f) = self.frame_mut(frame) {
            if let Some(orientation) = options.tab_orientation {
                f.tab_orientation = orientation;
            }
            f.push_panel(panel, None);
        }
        self.set_panel_host(panel, PanelHost::Frame(frame));
        self.update();
    }

    fn add_panel_alone(
        &mut self,
        panel: PanelId,
        location: DockLocation,
        target: Option<DockTarget>,
        options: &PanelOptions,
    ) {
        let fallback = self.panels.get(&panel).map_or([None, None], Panel::init_size);
        let resolved = options.resolve(self.container.size(), fallback);

        if target == Some(DockTarget::Collapsed) {
            self.add_panel_collapsed(panel, location, &resolved);
            return;
        }

        if location.is_floating() {
            self.add_panel_floating(panel, location, &resolved);
            return;
        }

        let mut frame = Frame::docked(None);
        if let Some(orientation) = options.tab_orientation {
            frame.tab_orientation = orientation;
        }
        let frame = self.insert_frame(frame);
        if let Some(f) = self.frame_mut(frame) {
            f.push_panel(panel, None);
        }
        self.set_panel_host(panel, PanelHost::Frame(frame));

        let anchor = target
            .and_then(|t| self.split_anchor(t))
            .or_else(|| self.dock_root());
        match anchor {
            Some(anchor) => {
                let size = self.node_rect(anchor).size();
                let ratio = self.split_ratio(location, size, &resolved);
                self.wrap_node(anchor, location, frame, ratio);
            }
            None => {
                self.root = Some(frame);
                self.update();
            }
        }
    }

    /// The node a directional dock relative to `target` splits. Floating frames and collapsers
    /// have no slot to split, so docks against them go to the dock root instead.
    fn split_anchor(&self, target: DockTarget) -> Option<NodeId> {
        let node = match target {
            DockTarget::Panel(panel) => self.panel_frame(panel)?,
            DockTarget::Node(node) => node,
            DockTarget::Collapsed => return None,
        };
        // The wrapper chain splits as a whole.
        let node = match self.collapsers {
            Some(c) if self.wraps_collapser(node) => {
                self.nodes.get(&c.bottom).and_then(Node::parent).unwrap_or(node)
            }
            _ => node,
        };
        let in_tree = self.nodes.get(&node)?.parent().is_some() || self.root == Some(node);
        let unsplittable = self
            .frame(node)
            .is_some_and(|f| f.floating || f.is_collapser());
        (in_tree && !unsplittable).then_some(node)
    }

    /// Ratio for a new split of a `size` sized node, so the new pane gets the requested extent.
    fn split_ratio(&self, location: DockLocation, size: Vec2, resolved: &ResolvedOptions) -> f32 {
        let fraction = self.options.default_split_fraction;
        let share = |requested: Option<f32>, total: f32| {
            requested
                .filter(|_| total > 0.0)
                .map_or(fraction, |px| px / total)
        };
        match location {
            DockLocation::Left => share(resolved.width(), size.x),
            DockLocation::Right => 1.0 - share(resolved.width(), size.x),
            DockLocation::Top => share(resolved.height(), size.y),
            DockLocation::Bottom => 1.0 - share(resolved.height(), size.y),
            _ => fraction,
        }
    }

    fn add_panel_floating(&mut self, panel: PanelId, location: DockLocation, resolved: &ResolvedOptions) {
        let container = self.container;
        let layout_pos = self
            .panels
            .get(&panel)
            .map_or(Vec2::splat(0.5), |p| p.layout_pos);
        let size = Vec2::new(
            resolved.width().unwrap_or(self.options.default_float_size.x),
            resolved.height().unwrap_or(self.options.default_float_size.y),
        )
        .max(self.options.min_frame_size);

        let mut pos = container.min + layout_pos * container.size();
        if let Some(x) = resolved.x {
            pos.x = container.left() + x + size.x * 0.5;
        }
        if let Some(y) = resolved.y {
            pos.y = container.top() + y + size.y * 0.5;
        }

        let frame = self.insert_frame(Frame::floating(Pos2::new(pos.x, pos.y), size));
        self.floating.push(frame);
        if let Some(f) = self.frame_mut(frame) {
            f.push_panel(panel, None);
        }
        self.set_panel_host(panel, PanelHost::Frame(frame));

        if location == DockLocation::Modal {
            if let Some(f) = self.frame_mut(frame) {
                f.modal = true;
            }
            self.modals.push(frame);
            if let Some(p) = self.panels.get_mut(&panel) {
                p.moveable = false;
            }
        }
        self.set_focus(Some(frame));
        self.update();
    }

    fn add_panel_collapsed(&mut self, panel: PanelId, location: DockLocation, resolved: &ResolvedOptions) {
        self.init_collapsers();
        let Some(side) = location.collapse_side() else {
            return;
        };
        let Some(frame) = self.collapser(side) else {
            return;
        };
        if let Some(f) = self.frame_mut(frame) {
            f.push_panel(panel, None);
            match location {
                DockLocation::Bottom => {
                    if let Some(h) = resolved.height() {
                        f.size.y = h;
                    }
                }
                _ => {
                    if let Some(w) = resolved.width() {
                        f.size.x = w;
                    }
                }
            }
        }
        self.set_panel_host(panel, PanelHost::Frame(frame));
        self.update();
    }

    /// Create the placeholder panel in `frame`, or docked at the top when `None`.
    pub(super) fn add_placeholder(&mut self, frame: Option<NodeId>) {
        if self.placeholder.is_some() {
            log::warn!("creating a placeholder panel while one already exists");
        }
        let id = PanelId(self.alloc_id());
        self.panels.insert(id, Panel::new_placeholder(id));
        self.placeholder = Some(id);

        match frame {
            Some(frame) => {
                if let Some(f) = self.frame_mut(frame) {
                    f.push_panel(id, None);
                }
                self.set_panel_host(id, PanelHost::Frame(frame));
                self.update();
            }
            None => self.add_panel_alone(id, DockLocation::Top, None, &PanelOptions::default()),
        }
        log::debug!("placeholder panel {id} created");
    }

    /// Remove the placeholder once a real panel can take over as drop target.
    pub(super) fn remove_placeholder(&mut self) {
        let Some(placeholder) = self.placeholder else {
            return;
        };
        if self.is_last_panel(placeholder) {
            return;
        }
        if let Some(frame) = self.panel_frame(placeholder) {
            self.remove_panel_inner(placeholder, frame);
        }
    }
}
