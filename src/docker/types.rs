use std::fmt;

use crate::geometry::Side;

use super::frame::Frame;
use super::splitter::Splitter;

/// Arena index of a [`Node`] (splitter or frame).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(super) u64);

/// Arena index of a [`super::Panel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelId(pub(super) u64);

impl NodeId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl PanelId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Where a panel should be placed by `add_panel` / `move_panel`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DockLocation {
    /// Floating and blocking everything below it.
    Modal,
    Float,
    Top,
    Left,
    Right,
    Bottom,
    /// As a new tab in the target's frame.
    Stacked,
}

impl DockLocation {
    pub fn is_floating(self) -> bool {
        matches!(self, Self::Modal | Self::Float)
    }

    /// Left/right docks create a horizontal (side-by-side) split.
    pub(super) fn splits_horizontally(self) -> bool {
        !matches!(self, Self::Top | Self::Bottom)
    }

    /// Which splitter pane the newly inserted node occupies.
    pub(super) fn new_pane_index(self) -> usize {
        match self {
            Self::Left | Self::Top => 0,
            _ => 1,
        }
    }

    pub fn collapse_side(self) -> Option<CollapseSide> {
        match self {
            Self::Left => Some(CollapseSide::Left),
            Self::Right => Some(CollapseSide::Right),
            Self::Bottom => Some(CollapseSide::Bottom),
            _ => None,
        }
    }

    pub(super) fn side(self) -> Option<Side> {
        match self {
            Self::Left => Some(Side::Left),
            Self::Right => Some(Side::Right),
            Self::Top => Some(Side::Top),
            Self::Bottom => Some(Side::Bottom),
            _ => None,
        }
    }
}

/// The edges that can host a collapser drawer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollapseSide {
    Left,
    Right,
    Bottom,
}

impl CollapseSide {
    pub const ALL: [Self; 3] = [Self::Left, Self::Right, Self::Bottom];

    pub fn location(self) -> DockLocation {
        match self {
            Self::Left => DockLocation::Left,
            Self::Right => DockLocation::Right,
            Self::Bottom => DockLocation::Bottom,
        }
    }

    pub(super) fn side(self) -> Side {
        match self {
            Self::Left => Side::Left,
            Self::Right => Side::Right,
            Self::Bottom => Side::Bottom,
        }
    }
}

/// Side of a frame its tab strip is drawn on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabOrientation {
    #[default]
    Top,
    Left,
    Right,
    Bottom,
}

impl TabOrientation {
    pub(super) fn side(self) -> Side {
        match self {
            Self::Top => Side::Top,
            Self::Left => Side::Left,
            Self::Right => Side::Right,
            Self::Bottom => Side::Bottom,
        }
    }
}

/// What a placement is relative to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DockTarget {
    /// The frame currently holding this panel.
    Panel(PanelId),
    /// Any splitter or frame in the tree.
    Node(NodeId),
    /// The collapser on the side named by the location.
    Collapsed,
}

impl From<PanelId> for DockTarget {
    fn from(panel: PanelId) -> Self {
        Self::Panel(panel)
    }
}

impl From<NodeId> for DockTarget {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

/// One entry of the layout arena.
#[derive(Debug)]
pub enum Node {
    Splitter(Splitter),
    Frame(Frame),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Splitter,
    Frame,
    Collapser,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Splitter(_) => NodeKind::Splitter,
            Self::Frame(frame) if frame.is_collapser() => NodeKind::Collapser,
            Self::Frame(_) => NodeKind::Frame,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        match self {
            Self::Splitter(s) => s.parent,
            Self::Frame(f) => f.parent,
        }
    }

    pub(super) fn set_parent(&mut self, parent: Option<NodeId>) {
        match self {
            Self::Splitter(s) => s.parent = parent,
            Self::Frame(f) => f.parent = parent,
        }
    }

    pub fn rect(&self) -> egui::Rect {
        match self {
            Self::Splitter(s) => s.rect,
            Self::Frame(f) => f.rect,
        }
    }

    pub fn as_frame(&self) -> Option<&Frame> {
        match self {
            Self::Frame(f) => Some(f),
            Self::Splitter(_) => None,
        }
    }

    pub fn as_splitter(&self) -> Option<&Splitter> {
        match self {
            Self::Splitter(s) => Some(s),
            Self::Frame(_) => None,
        }
    }

    pub(super) fn as_frame_mut(&mut self) -> Option<&mut Frame> {
        match self {
            Self::Frame(f) => Some(f),
            Self::Splitter(_) => None,
        }
    }

    pub(super) fn as_splitter_mut(&mut self) -> Option<&mut Splitter> {
        match self {
            Self::Splitter(s) => Some(s),
            Self::Frame(_) => None,
        }
    }
}

/// Where a panel currently lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelHost {
    Frame(NodeId),
    /// Detached while a move is in progress.
    Transition,
}

/// The collapser frames, once created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct Collapsers {
    pub(super) left: NodeId,
    pub(super) right: NodeId,
    pub(super) bottom: NodeId,
}

impl Collapsers {
    pub(super) fn get(self, side: CollapseSide) -> NodeId {
        match side {
            CollapseSide::Left => self.left,
            CollapseSide::Right => self.right,
            CollapseSide::Bottom => self.bottom,
        }
    }

    pub(super) fn iter(self) -> impl Iterator<Item = (CollapseSide, NodeId)> {
        CollapseSide::ALL.into_iter().map(move |side| (side, self.get(side)))
    }

    pub(super) fn contains(self, node: NodeId) -> bool {
        self.left == node || self.right == node || self.bottom == node
    }
}
