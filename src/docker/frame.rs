use egui::{Pos2, Rect, Vec2};

use super::types::{CollapseSide, NodeId, PanelId, TabOrientation};

/// A tab container. Docked, floating, or bound to an edge as a collapser drawer.
#[derive(Clone, Debug)]
pub struct Frame {
    pub(super) parent: Option<NodeId>,
    pub(super) panels: Vec<PanelId>,
    pub(super) cur_tab: Option<usize>,
    pub(super) floating: bool,
    pub(super) modal: bool,
    /// Center of a floating frame.
    pub(super) pos: Pos2,
    /// Size of a floating frame, or the open drawer size of a collapser.
    pub(super) size: Vec2,
    pub(super) collapser: Option<CollapseSide>,
    pub(super) tab_orientation: TabOrientation,
    pub(super) rect: Rect,
    pub(super) drawer_rect: Option<Rect>,
}

impl Frame {
    pub(super) fn docked(parent: Option<NodeId>) -> Self {
        Self {
            parent,
            panels: Vec::new(),
            cur_tab: None,
            floating: false,
            modal: false,
            pos: Pos2::ZERO,
            size: Vec2::ZERO,
            collapser: None,
            tab_orientation: TabOrientation::Top,
            rect: Rect::NOTHING,
            drawer_rect: None,
        }
    }

    pub(super) fn floating(pos: Pos2, size: Vec2) -> Self {
        Self {
            floating: true,
            pos,
            size,
            ..Self::docked(None)
        }
    }

    pub(super) fn collapser(side: CollapseSide, drawer_size: Vec2) -> Self {
        Self {
            collapser: Some(side),
            size: drawer_size,
            tab_orientation: match side {
                CollapseSide::Left => TabOrientation::Left,
                CollapseSide::Right => TabOrientation::Right,
                CollapseSide::Bottom => TabOrientation::Bottom,
            },
            ..Self::docked(None)
        }
    }

    pub fn panels(&self) -> &[PanelId] {
        &self.panels
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// `None` when empty, or when a collapser's drawer is closed.
    pub fn cur_tab(&self) -> Option<usize> {
        self.cur_tab
    }

    pub fn active_panel(&self) -> Option<PanelId> {
        self.cur_tab.and_then(|i| self.panels.get(i).copied())
    }

    pub fn is_floating(&self) -> bool {
        self.floating
    }

    pub fn is_modal(&self) -> bool {
        self.modal
    }

    pub fn is_collapser(&self) -> bool {
        self.collapser.is_some()
    }

    pub fn collapser_side(&self) -> Option<CollapseSide> {
        self.collapser
    }

    /// A collapser with an open drawer.
    pub fn is_expanded(&self) -> bool {
        self.is_collapser() && self.cur_tab.is_some()
    }

    pub fn tab_orientation(&self) -> TabOrientation {
        self.tab_orientation
    }

    pub fn pos(&self) -> Pos2 {
        self.pos
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Last computed outer rect. For a collapser this is its edge bar.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn drawer_rect(&self) -> Option<Rect> {
        self.drawer_rect
    }

    pub(super) fn floating_rect(&self) -> Rect {
        Rect::from_center_size(self.pos, self.size)
    }

    pub(super) fn index_of(&self, panel: PanelId) -> Option<usize> {
        self.panels.iter().position(|p| *p == panel)
    }

    /// Insert `panel` at `index` (appended when `None`). Returns its index.
    ///
    /// An empty frame selects its first tab; a collapser stays closed.
    pub(super) fn push_panel(&mut self, panel: PanelId, index: Option<usize>) -> usize {
        let index = index.map_or(self.panels.len(), |i| i.min(self.panels.len()));
        self.panels.insert(index, panel);
        match self.cur_tab {
            None if !self.is_collapser() => self.cur_tab = Some(0),
            Some(cur) if cur >= index && self.panels.len() > 1 => self.cur_tab = Some(cur + 1),
            _ => {}
        }
        index
    }

    /// Remove `panel`, keeping `cur_tab` consistent. Returns its former index.
    pub(super) fn take_panel(&mut self, panel: PanelId) -> Option<usize> {
        let index = self.index_of(panel)?;
        self.panels.remove(index);

        if self.is_collapser() {
            self.cur_tab = None;
        } else if let Some(cur) = self.cur_tab {
            if cur >= index {
                self.cur_tab = cur.checked_sub(1);
            }
        }
        if self.panels.is_empty() {
            self.cur_tab = None;
        } else if self.cur_tab.is_none() && !self.is_collapser() {
            self.cur_tab = Some(0);
        }
        Some(index)
    }

    /// Select a tab. Out of range is ignored. Returns whether the selection changed.
    pub(super) fn select(&mut self, index: usize) -> bool {
        if index >= self.panels.len() || self.cur_tab == Some(index) {
            return false;
        }
        self.cur_tab = Some(index);
        true
    }

    /// Close a collapser drawer.
    pub(super) fn collapse(&mut self) -> bool {
        if !self.is_collapser() || self.cur_tab.is_none() {
            return false;
        }
        self.cur_tab = None;
        true
    }

    /// Move the tab at `from` to `to`, keeping the active panel selected.
    pub(super) fn move_tab(&mut self, from: usize, to: usize) -> Option<usize> {
        if from >= self.panels.len() {
            return None;
        }
        let to = to.min(self.panels.len() - 1);
        if from == to {
            return Some(to);
        }
        let active = self.active_panel();
        let panel = self.panels.remove(from);
        self.panels.insert(to, panel);
        if let Some(active) = active {
            self.cur_tab = self.index_of(active);
        }
        Some(to)
    }

    /// Drag the edges named by `handle` of a floating frame to `pointer`.
    pub(super) fn resize_to(&mut self, handle: ResizeHandle, pointer: Pos2, min_size: Vec2) {
        let rect = self.floating_rect();
        let (mut left, mut right, mut top, mut bottom) =
            (rect.left(), rect.right(), rect.top(), rect.bottom());

        match handle.horizontal_edge() {
            Some(false) => left = pointer.x.min(right - min_size.x),
            Some(true) => right = pointer.x.max(left + min_size.x),
            None => {}
        }
        match handle.vertical_edge() {
            Some(false) => top = pointer.y.min(bottom - min_size.y),
            Some(true) => bottom = pointer.y.max(top + min_size.y),
            None => {}
        }

        let rect = Rect::from_min_max(Pos2::new(left, top), Pos2::new(right, bottom));
        self.pos = rect.center();
        self.size = rect.size();
    }
}

/// Edge or corner grabbed when resizing a floating frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeHandle {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeHandle {
    /// `Some(false)` for the left edge, `Some(true)` for the right edge.
    fn horizontal_edge(self) -> Option<bool> {
        match self {
            Self::Left | Self::TopLeft | Self::BottomLeft => Some(false),
            Self::Right | Self::TopRight | Self::BottomRight => Some(true),
            Self::Top | Self::Bottom => None,
        }
    }

    /// `Some(false)` for the top edge, `Some(true)` for the bottom edge.
    fn vertical_edge(self) -> Option<bool> {
        match self {
            Self::Top | Self::TopLeft | Self::TopRight => Some(false),
            Self::Bottom | Self::BottomLeft | Self::BottomRight => Some(true),
            Self::Left | Self::Right => None,
        }
    }

    /// Classify `pointer` against the border of `rect`, `inset` points thick on each side.
    pub(super) fn classify(rect: Rect, pointer: Pos2, inset: f32) -> Option<Self> {
        if !rect.expand(inset).contains(pointer) {
            return None;
        }
        let near_left = (pointer.x - rect.left()).abs() <= inset;
        let near_right = (pointer.x - rect.right()).abs() <= inset;
        let near_top = (pointer.y - rect.top()).abs() <= inset;
        let near_bottom = (pointer.y - rect.bottom()).abs() <= inset;

        match (near_left, near_right, near_top, near_bottom) {
            (true, false, true, false) => Some(Self::TopLeft),
            (false, true, true, false) => Some(Self::TopRight),
            (true, false, false, true) => Some(Self::BottomLeft),
            (false, true, false, true) => Some(Self::BottomRight),
            (true, false, false, false) => Some(Self::Left),
            (false, true, false, false) => Some(Self::Right),
            (false, false, true, false) => Some(Self::Top),
            (false, false, false, true) => Some(Self::Bottom),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: u64) -> Vec<PanelId> {
        (1..=n).map(PanelId).collect()
    }

    fn frame_with(n: u64) -> Frame {
        let mut frame = Frame::docked(None);
        for id in ids(n) {
            frame.push_panel(id, None);
        }
        frame
    }

    #[test]
    fn push_selects_first_tab_only_once() {
        let frame = frame_with(3);
        assert_eq!(frame.cur_tab(), Some(0));
        assert_eq!(frame.panels(), ids(3).as_slice());
    }

    #[test]
    fn removing_earlier_tab_decrements_cur_tab() {
        let mut frame = frame_with(3);
        frame.select(2);
        frame.take_panel(PanelId(1));
        assert_eq!(frame.cur_tab(), Some(1));
        assert_eq!(frame.active_panel(), Some(PanelId(3)));
    }

    #[test]
    fn removing_active_first_tab_keeps_a_selection() {
        let mut frame = frame_with(2);
        frame.take_panel(PanelId(1));
        assert_eq!(frame.cur_tab(), Some(0));
        frame.take_panel(PanelId(2));
        assert_eq!(frame.cur_tab(), None);
        frame.push_panel(PanelId(9), None);
        assert_eq!(frame.cur_tab(), Some(0));
    }

    #[test]
    fn collapser_stays_closed() {
        let mut frame = Frame::collapser(CollapseSide::Left, Vec2::new(200.0, 0.0));
        frame.push_panel(PanelId(1), None);
        frame.push_panel(PanelId(2), None);
        assert_eq!(frame.cur_tab(), None);
        frame.select(1);
        assert!(frame.is_expanded());
        frame.take_panel(PanelId(1));
        assert_eq!(frame.cur_tab(), None);
    }

    #[test]
    fn move_tab_keeps_active_panel() {
        let mut frame = frame_with(3);
        frame.select(0);
        assert_eq!(frame.move_tab(0, 2), Some(2));
        assert_eq!(frame.panels(), &[PanelId(2), PanelId(3), PanelId(1)]);
        assert_eq!(frame.active_panel(), Some(PanelId(1)));
    }

    #[test]
    fn resize_respects_min_size() {
        let mut frame = Frame::floating(Pos2::new(100.0, 100.0), Vec2::new(100.0, 100.0));
        frame.resize_to(ResizeHandle::BottomRight, Pos2::new(60.0, 200.0), Vec2::splat(50.0));
        let rect = frame.floating_rect();
        assert_eq!(rect.width(), 50.0);
        assert_eq!(rect.bottom(), 200.0);
        assert_eq!(rect.top(), 50.0);
    }

    #[test]
    fn classify_corners_before_edges() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::splat(100.0));
        assert_eq!(ResizeHandle::classify(rect, Pos2::new(1.0, 1.0), 4.0), Some(ResizeHandle::TopLeft));
        assert_eq!(ResizeHandle::classify(rect, Pos2::new(50.0, 99.0), 4.0), Some(ResizeHandle::Bottom));
        assert_eq!(ResizeHandle::classify(rect, Pos2::new(50.0, 50.0), 4.0), None);
    }
}
