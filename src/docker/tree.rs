use egui::Rect;

use super::Docker;
use super::frame::Frame;
use super::splitter::Splitter;
use super::types::{DockLocation, Node, NodeId, PanelHost, PanelId};

impl Docker {
    pub(super) fn insert_frame(&mut self, frame: Frame) -> NodeId {
        let id = NodeId(self.alloc_id());
        self.nodes.insert(id, Node::Frame(frame));
        self.frames.push(id);
        id
    }

    pub(super) fn insert_splitter(&mut self, splitter: Splitter) -> NodeId {
        let id = NodeId(self.alloc_id());
        self.nodes.insert(id, Node::Splitter(splitter));
        self.splitters.push(id);
        id
    }

    pub(super) fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) {
        if let Some(node) = self.nodes.get_mut(&node) {
            node.set_parent(parent);
        }
    }

    /// Put `child` into `slot` of `splitter`, re-parenting it.
    pub(super) fn set_splitter_pane(&mut self, splitter: NodeId, slot: usize, child: Option<NodeId>) {
        let Some(s) = self.splitter_mut(splitter) else {
            return;
        };
        let Some(pane) = s.panes.get_mut(slot) else {
            return;
        };
        *pane = child;
        if let Some(child) = child {
            self.set_parent(child, Some(splitter));
        }
        self.update();
    }

    /// Hang `new` where `old` currently hangs (a splitter slot or the root). `old` ends up detached.
    pub(super) fn replace_in_parent(&mut self, old: NodeId, new: Option<NodeId>) {
        match self.nodes.get(&old).and_then(Node::parent) {
            Some(parent) => {
                if let Some(slot) = self.splitter(parent).and_then(|s| s.slot_of(old)) {
                    self.set_splitter_pane(parent, slot, new);
                }
            }
            None => {
                if self.root == Some(old) {
                    self.root = new;
                    if let Some(new) = new {
                        self.set_parent(new, None);
                    }
                }
            }
        }
        self.set_parent(old, None);
    }

    /// Split the slot of `target`: a new splitter takes its place, holding `target` and `new_child`
    /// on the side named by `location`. Returns the splitter.
    pub(super) fn wrap_node(
        &mut self,
        target: NodeId,
        location: DockLocation,
        new_child: NodeId,
        ratio: f32,
    ) -> NodeId {
        let parent = self.nodes.get(&target).and_then(Node::parent);
        let mut splitter = Splitter::new(parent, location.splits_horizontally());
        splitter.set_pos(ratio);
        let splitter = self.insert_splitter(splitter);

        self.replace_in_parent(target, Some(splitter));

        let (first, second) = if location.new_pane_index() == 0 {
            (new_child, target)
        } else {
            (target, new_child)
        };
        self.set_splitter_pane(splitter, 0, Some(first));
        self.set_splitter_pane(splitter, 1, Some(second));

        log::debug!("split {target} {location:?}: new splitter {splitter} ratio={ratio:.3}");
        splitter
    }

    /// Take `node` out of the tree. Its parent splitter is collapsed: the sibling is promoted into the
    /// splitter's slot and the splitter destroyed. Nodes that are not in the tree are left alone.
    pub(super) fn detach_from_tree(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get(&node).and_then(Node::parent) else {
            if self.root == Some(node) {
                self.root = None;
                self.update();
            }
            return;
        };

        let sibling = self.splitter(parent).and_then(|s| s.other_pane(node));
        if let Some(s) = self.splitter_mut(parent) {
            s.panes = [None, None];
        }
        self.set_parent(node, None);

        match sibling {
            Some(sibling) => {
                self.replace_in_parent(parent, Some(sibling));
                log::debug!("collapsed splitter {parent}: promoted {sibling}");
            }
            None => self.detach_from_tree(parent),
        }
        self.destroy_splitter(parent);
    }

    pub(super) fn destroy_splitter(&mut self, splitter: NodeId) {
        self.nodes.remove(&splitter);
        self.splitters.retain(|s| *s != splitter);
    }

    /// Drop an emptied frame: out of every list, out of the tree, out of focus.
    pub(super) fn remove_frame(&mut self, frame: NodeId) {
        let was_floating = self.floating.contains(&frame);
        self.floating.retain(|f| *f != frame);
        self.modals.retain(|f| *f != frame);
        self.frames.retain(|f| *f != frame);
        self.detach_from_tree(frame);
        self.nodes.remove(&frame);

        if self.focus == Some(frame) || was_floating {
            if self.focus == Some(frame) {
                self.focus = None;
            }
            if let Some(next) = self.modals.last().or(self.floating.last()).copied() {
                self.set_focus(Some(next));
            }
        }
        log::debug!("destroyed frame {frame}");
        self.update();
    }

    pub(super) fn set_panel_host(&mut self, panel: PanelId, host: PanelHost) {
        if let Some(p) = self.panels.get_mut(&panel) {
            p.host = host;
        }
    }

    /// Minimum extent of each pane of `splitter` along its main axis.
    pub(super) fn pane_minimums(&self, splitter: NodeId) -> [f32; 2] {
        let Some(s) = self.splitter(splitter) else {
            return [0.0, 0.0];
        };
        let horizontal = s.horizontal;
        s.panes.map(|pane| {
            let Some(frame) = pane.and_then(|p| self.frame(p)) else {
                return 0.0;
            };
            if frame.is_collapser() {
                return self.options.collapser_bar_size;
            }
            frame
                .panels
                .iter()
                .filter_map(|p| self.panels.get(p))
                .map(|p| if horizontal { p.min_size.x } else { p.min_size.y })
                .fold(0.0, f32::max)
        })
    }

    /// Current rect of `node`, computed from the container down. Does not need a layout pass.
    pub(super) fn node_rect(&self, node: NodeId) -> Rect {
        let Some(n) = self.nodes.get(&node) else {
            return Rect::NOTHING;
        };
        match n.parent() {
            Some(parent) => {
                let Some(s) = self.splitter(parent) else {
                    return Rect::NOTHING;
                };
                let parent_rect = self.node_rect(parent);
                let (first, _bar, second) = s.layout(
                    parent_rect,
                    self.options.splitter_bar_size,
                    self.pane_minimums(parent),
                );
                if s.slot_of(node) == Some(0) { first } else { second }
            }
            None => match n {
                Node::Frame(f) if f.floating => f.floating_rect(),
                _ if self.root == Some(node) => self.container,
                _ => n.rect(),
            },
        }
    }

    /// The node directional docks without a target split: the content inside the collapsers, or the root.
    pub(super) fn dock_root(&self) -> Option<NodeId> {
        self.collapser_content().or(self.root)
    }

    /// `true` for the splitters that bind a collapser bar to the content. Their bars stay put.
    pub(super) fn wraps_collapser(&self, splitter: NodeId) -> bool {
        self.splitter(splitter).is_some_and(|s| {
            s.panes
                .iter()
                .flatten()
                .any(|p| self.frame(*p).is_some_and(Frame::is_collapser))
        })
    }

    /// `true` for a non-collapser frame whose panels are all fixed in place.
    pub(super) fn is_static_frame(&self, node: NodeId) -> bool {
        self.frame(node).is_some_and(|f| {
            !f.is_collapser()
                && !f.panels.is_empty()
                && f.panels
                    .iter()
                    .all(|p| self.panels.get(p).is_some_and(|p| !p.moveable))
        })
    }
}
