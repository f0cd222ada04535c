use egui::{Pos2, Rect};

use crate::geometry::{Side, edge_band};

use super::Docker;
use super::frame::Frame;
use super::options::AnchorTuning;
use super::types::{DockLocation, DockTarget, NodeId};

/// Where a drag would dock if released now.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    pub location: DockLocation,
    /// Placement target for the release: the hovered frame, or `Collapsed` for a collapser.
    pub target: DockTarget,
    pub frame: NodeId,
    /// The hovered frame is the one being dragged from.
    pub is_self: bool,
    pub preview: Rect,
    /// Tab under the pointer, when hovering a tab strip.
    pub tab_index: Option<usize>,
}

/// What a frame accepts from a drag.
#[derive(Clone, Copy, Debug)]
pub(super) struct ZoneRules {
    /// Edge bands split the frame.
    pub(super) can_split: bool,
    /// The body (not just the tab strip) stacks as a tab.
    pub(super) center_stacks: bool,
}

/// Edges in tie-break order.
const EDGE_ORDER: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

/// Classify `pointer` against one frame's anchor zones. Returns the location and its preview rect.
///
/// The tab strip always stacks. Edge bands are `edge_band_fraction` deep; when the pointer is in two
/// bands (a corner), the edge it is relatively nearest wins.
pub(super) fn frame_anchor_zone(
    rect: Rect,
    title: Option<Rect>,
    pointer: Pos2,
    rules: ZoneRules,
    tuning: &AnchorTuning,
) -> Option<(DockLocation, Rect)> {
    if !rect.contains(pointer) {
        return None;
    }
    if title.is_some_and(|t| t.contains(pointer)) {
        return Some((DockLocation::Stacked, rect));
    }

    if rules.can_split {
        let nearest = EDGE_ORDER
            .into_iter()
            .filter(|side| edge_band(rect, *side, tuning.edge_band_fraction).contains(pointer))
            .map(|side| (side, normalized_edge_distance(rect, side, pointer)))
            .fold(None, |best: Option<(Side, f32)>, (side, d)| match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((side, d)),
            });
        if let Some((side, _)) = nearest {
            return Some((location_of(side), edge_band(rect, side, tuning.preview_fraction)));
        }
    }

    (rules.center_stacks && tuning.center_stacks).then_some((DockLocation::Stacked, rect))
}

fn normalized_edge_distance(rect: Rect, side: Side, pointer: Pos2) -> f32 {
    let (d, extent) = match side {
        Side::Left => (pointer.x - rect.left(), rect.width()),
        Side::Right => (rect.right() - pointer.x, rect.width()),
        Side::Top => (pointer.y - rect.top(), rect.height()),
        Side::Bottom => (rect.bottom() - pointer.y, rect.height()),
    };
    if extent > 0.0 { d / extent } else { 0.0 }
}

fn location_of(side: Side) -> DockLocation {
    match side {
        Side::Left => DockLocation::Left,
        Side::Right => DockLocation::Right,
        Side::Top => DockLocation::Top,
        Side::Bottom => DockLocation::Bottom,
    }
}

impl Docker {
    /// Decide where a drag from `source` would land with the pointer at `pointer`.
    ///
    /// `source` is evaluated first: its tab strip re-orders tabs, and when `tab_drag` carries one of
    /// several tabs its edges split it. Other frames are checked only when `force_float` is off, in
    /// order: floating frames from the top, the open drawer, docked frames, collapser bars.
    /// Floating frames and drawers only stack, and they hide whatever lies beneath them.
    ///
    /// Pure: the same layout and pointer always give the same answer.
    pub fn compute_anchor(
        &self,
        pointer: Pos2,
        source: Option<NodeId>,
        tab_drag: bool,
        force_float: bool,
    ) -> Option<Anchor> {
        let tuning = &self.options.anchor;

        // An open modal covers everything: nothing outside it is a target, and it takes no drops.
        if !self.modals.is_empty() {
            return None;
        }

        if let Some(source) = source {
            if let Some(f) = self.frame(source).filter(|f| !f.is_collapser()) {
                let rules = ZoneRules {
                    can_split: tab_drag && f.panel_count() > 1 && !f.floating,
                    center_stacks: false,
                };
                let rect = self.frame_hit_rect(source);
                if let Some((location, preview)) =
                    frame_anchor_zone(rect, self.title_strip(source), pointer, rules, tuning)
                {
                    return Some(self.anchor(source, location, preview, true, pointer));
                }
            }
        }

        if force_float {
            return None;
        }

        let stack_only = ZoneRules {
            can_split: false,
            center_stacks: true,
        };

        for frame in self.floating.iter().rev().copied() {
            let rect = self.frame_hit_rect(frame);
            if Some(frame) == source || !rect.contains(pointer) {
                continue;
            }
            if self.frame(frame).is_some_and(|f| f.modal) {
                return None;
            }
            return frame_anchor_zone(rect, self.title_strip(frame), pointer, stack_only, tuning)
                .map(|(location, preview)| self.anchor(frame, location, preview, false, pointer));
        }

        if let Some(drawer) = self.open_collapser().filter(|d| Some(*d) != source) {
            if let Some(rect) = self.frame(drawer).and_then(|f| f.drawer_rect) {
                if rect.contains(pointer) {
                    return frame_anchor_zone(rect, None, pointer, stack_only, tuning)
                        .map(|(location, preview)| self.anchor(drawer, location, preview, false, pointer));
                }
            }
        }

        let split_rules = ZoneRules {
            can_split: true,
            center_stacks: true,
        };
        for frame in self.frames.iter().copied() {
            if Some(frame) == source {
                continue;
            }
            let Some(f) = self.frame(frame) else {
                continue;
            };
            if f.floating {
                continue;
            }
            let rules = if f.is_collapser() { stack_only } else { split_rules };
            let hit = frame_anchor_zone(f.rect, self.title_strip(frame), pointer, rules, tuning);
            if let Some((location, preview)) = hit {
                return Some(self.anchor(frame, location, preview, false, pointer));
            }
        }
        None
    }

    /// The rect a pointer has to be in to reach `frame`.
    fn frame_hit_rect(&self, frame: NodeId) -> Rect {
        match self.frame(frame) {
            Some(f) if f.floating => f.floating_rect(),
            Some(f) => f.rect,
            None => Rect::NOTHING,
        }
    }

    fn anchor(&self, frame: NodeId, location: DockLocation, preview: Rect, is_self: bool, pointer: Pos2) -> Anchor {
        let collapser = self.frame(frame).and_then(Frame::collapser_side);
        let (location, target) = match collapser {
            Some(side) => (side.location(), DockTarget::Collapsed),
            None => (location, DockTarget::Node(frame)),
        };
        let tab_index = self
            .tab_rects(frame)
            .iter()
            .position(|(_, rect)| rect.contains(pointer));
        Anchor {
            location,
            target,
            frame,
            is_self,
            preview,
            tab_index,
        }
    }
}
