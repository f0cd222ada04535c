//! Docking layout engine.
//!
//! A [`Docker`] owns a tree of splitters and tabbed frames, plus floating and modal frames and
//! three collapsible side drawers. Panels are created from registered [`PanelType`]s and moved
//! around either through the API or by feeding pointer input to the drag engine.
//! Layouts serialize to JSON (and RON with the `ron` feature).
//!
//! Rendering is left to the host: read placements and rects after [`Docker::tick`].

#![forbid(unsafe_code)]

pub mod docker;
pub mod geometry;

pub use docker::{
    Anchor, AnchorTuning, CollapseSide, DockError, DockEvent, DockLocation, DockTarget, Docker,
    DockerOptions, EventArgs, Frame, FramePlacement, Gesture, Ghost, HandlerId, HitTarget,
    LAYOUT_SNAPSHOT_VERSION, LayoutError, LayoutPlacements, LayoutSnapshot, NodeId, Panel,
    PanelId, PanelOptions, PanelType, PointerInput, Splitter, TabOrientation,
};
pub use geometry::SizeValue;
