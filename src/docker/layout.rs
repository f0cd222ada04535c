use egui::{Pos2, Rect, Vec2};

use crate::geometry::{Side, clamp_rect_into, take_strip};

use super::Docker;
use super::events::DockEvent;
use super::types::{CollapseSide, Node, NodeId, PanelId};

/// Where the host should draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePlacement {
    pub frame: NodeId,
    /// Outer rect. The edge bar, for a collapser.
    pub rect: Rect,
    pub title_rect: Option<Rect>,
    /// Where the active panel's content goes. `None` for a closed collapser.
    pub content_rect: Option<Rect>,
    pub tabs: Vec<(PanelId, Rect)>,
    pub active_panel: Option<PanelId>,
    pub floating: bool,
    pub modal: bool,
    pub collapser: Option<CollapseSide>,
    pub drawer_rect: Option<Rect>,
    /// Paint order: 0 for docked frames, increasing for floating frames, open drawers on top.
    pub z: usize,
}

/// Everything a renderer needs after a layout pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutPlacements {
    /// In paint order.
    pub frames: Vec<FramePlacement>,
    pub splitter_bars: Vec<(NodeId, Rect)>,
}

impl LayoutPlacements {
    pub fn frame(&self, frame: NodeId) -> Option<&FramePlacement> {
        self.frames.iter().find(|p| p.frame == frame)
    }
}

impl Docker {
    /// One layout pass: push rects down the tree, then into the floating frames, then tell panels.
    pub(super) fn flush_layout(&mut self) {
        if let Some(root) = self.root {
            self.layout_node(root, self.container);
        }
        for frame in self.floating.clone() {
            let container = self.container;
            let Some(f) = self.frame_mut(frame) else {
                continue;
            };
            let rect = clamp_rect_into(f.floating_rect(), container);
            f.pos = rect.center();
            self.layout_frame(frame, rect);
        }
        self.notify_panels();
        log::trace!("layout pass {}", self.layout_pass_count());
    }

    fn layout_node(&mut self, node: NodeId, rect: Rect) {
        match self.nodes.get(&node) {
            Some(Node::Splitter(_)) => {
                let min = self.pane_minimums(node);
                let bar = self.options.splitter_bar_size;
                let Some(s) = self.splitter_mut(node) else {
                    return;
                };
                let (first, bar_rect, second) = s.layout(rect, bar, min);
                s.rect = rect;
                s.bar_rect = bar_rect;
                let panes = s.panes;
                for (pane, pane_rect) in panes.into_iter().zip([first, second]) {
                    if let Some(pane) = pane {
                        self.layout_node(pane, pane_rect);
                    }
                }
            }
            Some(Node::Frame(_)) => self.layout_frame(node, rect),
            None => {}
        }
    }

    fn layout_frame(&mut self, frame: NodeId, rect: Rect) {
        let container = self.container;
        let Some(f) = self.frame_mut(frame) else {
            return;
        };
        f.rect = rect;
        f.drawer_rect = match f.collapser {
            Some(side) if f.is_expanded() => Some(drawer_rect(side, rect, f.size, container)),
            _ => None,
        };
    }

    /// The tab strip of `frame`: the edge bar of a collapser, the title bar of a frame whose active
    /// panel shows its title.
    pub(super) fn title_strip(&self, frame: NodeId) -> Option<Rect> {
        let f = self.frame(frame)?;
        if f.is_collapser() {
            return Some(f.rect);
        }
        let active = f.active_panel().and_then(|p| self.panels.get(&p))?;
        if !active.is_title_visible() {
            return None;
        }
        let (strip, _) = take_strip(f.rect, f.tab_orientation.side(), self.options.title_bar_height);
        Some(strip)
    }

    /// Where the active panel of `frame` draws its content.
    pub(super) fn content_rect(&self, frame: NodeId) -> Option<Rect> {
        let f = self.frame(frame)?;
        if f.is_collapser() {
            return f.drawer_rect;
        }
        Some(match self.title_strip(frame) {
            Some(_) => take_strip(f.rect, f.tab_orientation.side(), self.options.title_bar_height).1,
            None => f.rect,
        })
    }

    /// One cell per tab along the tab strip, `tab_width` long, clipped to the strip.
    pub(super) fn tab_rects(&self, frame: NodeId) -> Vec<(PanelId, Rect)> {
        let (Some(f), Some(strip)) = (self.frame(frame), self.title_strip(frame)) else {
            return Vec::new();
        };
        let along_x = !f.tab_orientation.side().is_horizontal_axis();
        let width = self.options.tab_width;
        f.panels
            .iter()
            .enumerate()
            .map(|(i, panel)| {
                let offset = i as f32 * width;
                let cell = if along_x {
                    Rect::from_min_size(strip.min + Vec2::new(offset, 0.0), Vec2::new(width, strip.height()))
                } else {
                    Rect::from_min_size(strip.min + Vec2::new(0.0, offset), Vec2::new(strip.width(), width))
                };
                (*panel, cell.intersect(strip))
            })
            .filter(|(_, cell)| cell.is_positive())
            .collect()
    }

    /// Compare each panel's new rect and visibility with the last pass and fire
    /// `Init`, `VisibilityChanged`, `Updated` and `Resized` as needed.
    fn notify_panels(&mut self) {
        let mut states: Vec<(PanelId, bool, Rect)> = Vec::new();
        for frame in self.frames.clone() {
            let Some(f) = self.frame(frame) else {
                continue;
            };
            let active = f.active_panel();
            let content = self.content_rect(frame);
            for panel in &f.panels {
                let visible = Some(*panel) == active && content.is_some();
                states.push((*panel, visible, content.unwrap_or(Rect::NOTHING)));
            }
        }

        for (panel, visible, rect) in states {
            let Some(p) = self.panels.get_mut(&panel) else {
                continue;
            };
            let first = !p.initialized;
            let visibility_changed = p.visible != visible;
            let moved = visible && p.rect != rect;
            let resized = visible && p.rect.size() != rect.size();
            p.initialized = true;
            p.visible = visible;
            if visible {
                p.rect = rect;
            }

            if first {
                self.trigger_panel(panel, DockEvent::Init, None);
            }
            if visibility_changed {
                self.trigger_panel(
                    panel,
                    DockEvent::VisibilityChanged,
                    Some(serde_json::Value::Bool(visible)),
                );
            }
            if moved {
                self.trigger_panel(panel, DockEvent::Updated, None);
            }
            if resized {
                self.trigger_panel(panel, DockEvent::Resized, None);
            }
        }
    }

    /// Geometry of every visible frame and splitter bar, in paint order.
    pub fn placements(&self) -> LayoutPlacements {
        let mut placements = LayoutPlacements::default();

        let mut docked = Vec::new();
        if let Some(root) = self.root {
            self.collect_tree(root, &mut docked, &mut placements.splitter_bars);
        }
        for frame in docked {
            placements.frames.push(self.placement(frame, 0));
        }
        for (i, frame) in self.floating.iter().enumerate() {
            placements.frames.push(self.placement(*frame, i + 1));
        }
        if let Some(open) = self.open_collapser() {
            let z = self.floating.len() + 1;
            if let Some(p) = placements.frames.iter_mut().find(|p| p.frame == open) {
                p.z = z;
            }
            placements.frames.sort_by_key(|p| p.z);
        }
        placements
    }

    fn collect_tree(&self, node: NodeId, frames: &mut Vec<NodeId>, bars: &mut Vec<(NodeId, Rect)>) {
        match self.nodes.get(&node) {
            Some(Node::Splitter(s)) => {
                bars.push((node, s.bar_rect));
                for pane in s.panes.into_iter().flatten() {
                    self.collect_tree(pane, frames, bars);
                }
            }
            Some(Node::Frame(_)) => frames.push(node),
            None => {}
        }
    }

    fn placement(&self, frame: NodeId, z: usize) -> FramePlacement {
        let f = self.frame(frame);
        FramePlacement {
            frame,
            rect: f.map_or(Rect::NOTHING, |f| f.rect),
            title_rect: self.title_strip(frame),
            content_rect: self.content_rect(frame),
            tabs: self.tab_rects(frame),
            active_panel: f.and_then(|f| f.active_panel()),
            floating: f.is_some_and(|f| f.floating),
            modal: f.is_some_and(|f| f.modal),
            collapser: f.and_then(|f| f.collapser),
            drawer_rect: f.and_then(|f| f.drawer_rect),
            z,
        }
    }
}

/// The open drawer of a collapser whose edge bar is `bar`, extending towards the content.
fn drawer_rect(side: CollapseSide, bar: Rect, size: Vec2, container: Rect) -> Rect {
    let rect = match side.side() {
        Side::Left => Rect::from_min_size(Pos2::new(bar.right(), bar.top()), Vec2::new(size.x, bar.height())),
        Side::Right => Rect::from_min_max(Pos2::new(bar.left() - size.x, bar.top()), Pos2::new(bar.left(), bar.bottom())),
        Side::Bottom | Side::Top => {
            Rect::from_min_max(Pos2::new(bar.left(), bar.top() - size.y), Pos2::new(bar.right(), bar.top()))
        }
    };
    rect.intersect(container)
}
