use egui::{Pos2, Rect};

use crate::geometry::split_rect;

use super::types::NodeId;

/// A binary split: two panes and the fraction of the extent given to the first one.
#[derive(Clone, Debug)]
pub struct Splitter {
    pub(super) parent: Option<NodeId>,
    pub(super) horizontal: bool,
    pub(super) ratio: f32,
    pub(super) panes: [Option<NodeId>; 2],
    pub(super) rect: Rect,
    pub(super) bar_rect: Rect,
}

impl Splitter {
    pub(super) fn new(parent: Option<NodeId>, horizontal: bool) -> Self {
        Self {
            parent,
            horizontal,
            ratio: 0.5,
            panes: [None, None],
            rect: Rect::NOTHING,
            bar_rect: Rect::NOTHING,
        }
    }

    /// `true` when the panes sit side by side (left/right).
    pub fn is_horizontal(&self) -> bool {
        self.horizontal
    }

    pub fn pos(&self) -> f32 {
        self.ratio
    }

    /// Set the ratio, clamped to `[0, 1]`. Returns the stored value.
    pub(super) fn set_pos(&mut self, ratio: f32) -> f32 {
        self.ratio = if ratio.is_nan() { 0.5 } else { ratio.clamp(0.0, 1.0) };
        self.ratio
    }

    pub fn pane(&self, index: usize) -> Option<NodeId> {
        self.panes.get(index).copied().flatten()
    }

    pub fn panes(&self) -> [Option<NodeId>; 2] {
        self.panes
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn bar_rect(&self) -> Rect {
        self.bar_rect
    }

    pub(super) fn slot_of(&self, child: NodeId) -> Option<usize> {
        self.panes.iter().position(|p| *p == Some(child))
    }

    pub(super) fn other_pane(&self, child: NodeId) -> Option<NodeId> {
        match self.slot_of(child)? {
            0 => self.panes[1],
            _ => self.panes[0],
        }
    }

    fn extent(&self, rect: Rect) -> f32 {
        if self.horizontal {
            rect.width()
        } else {
            rect.height()
        }
    }

    /// Split position in pixels along the main axis, honouring pane minimums.
    ///
    /// When both minimums cannot fit, the first pane's minimum wins.
    pub(super) fn split_at(&self, rect: Rect, min: [f32; 2]) -> f32 {
        let len = self.extent(rect).max(0.0);
        let split = self.ratio * len;
        let upper = (len - min[1]).max(0.0);
        split.min(upper).max(min[0].min(len))
    }

    /// `(pane0, bar, pane1)` rectangles for `rect`.
    pub(super) fn layout(&self, rect: Rect, bar: f32, min: [f32; 2]) -> (Rect, Rect, Rect) {
        split_rect(rect, self.horizontal, self.split_at(rect, min), bar)
    }

    /// Ratio that puts the bar under `pointer`, honouring pane minimums.
    pub(super) fn ratio_at(&self, pointer: Pos2, min: [f32; 2]) -> f32 {
        let len = self.extent(self.rect);
        if len <= 0.0 {
            return self.ratio;
        }
        let offset = if self.horizontal {
            pointer.x - self.rect.left()
        } else {
            pointer.y - self.rect.top()
        };
        let upper = (len - min[1]).max(0.0);
        offset.min(upper).max(min[0].min(len)) / len
    }
}

#[cfg(test)]
mod tests {
    use egui::Vec2;

    use super::*;

    fn splitter(horizontal: bool, ratio: f32) -> Splitter {
        let mut s = Splitter::new(None, horizontal);
        s.set_pos(ratio);
        s.rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(1000.0, 500.0));
        s
    }

    #[test]
    fn pos_is_clamped() {
        let mut s = Splitter::new(None, true);
        assert_eq!(s.set_pos(1.5), 1.0);
        assert_eq!(s.set_pos(-0.2), 0.0);
        assert_eq!(s.set_pos(f32::NAN), 0.5);
    }

    #[test]
    fn split_honours_minimums() {
        let s = splitter(true, 0.0);
        assert_eq!(s.split_at(s.rect, [24.0, 0.0]), 24.0);
        let s = splitter(true, 1.0);
        assert_eq!(s.split_at(s.rect, [0.0, 24.0]), 976.0);
    }

    #[test]
    fn vertical_layout_splits_height() {
        let s = splitter(false, 0.2);
        let (top, _bar, bottom) = s.layout(s.rect, 0.0, [0.0, 0.0]);
        assert_eq!(top.height(), 100.0);
        assert_eq!(bottom.height(), 400.0);
    }

    #[test]
    fn ratio_follows_pointer() {
        let s = splitter(true, 0.5);
        assert_eq!(s.ratio_at(Pos2::new(250.0, 10.0), [0.0, 0.0]), 0.25);
        assert_eq!(s.ratio_at(Pos2::new(-50.0, 10.0), [0.0, 0.0]), 0.0);
    }
}
