use egui::Rect;

mod anchor;
mod collapser;
mod debug;
mod error;
mod events;
mod focus;
mod frame;
mod gesture;
mod ghost;
mod infinity;
mod insert;
mod integrity;
mod layout;
mod ops;
mod options;
mod panel;
mod persistence;
mod registry;
mod scheduler;
mod splitter;
mod tree;
mod types;

#[cfg(test)]
mod anchor_tests;
#[cfg(test)]
mod model_tests;
#[cfg(test)]
mod persistence_tests;
#[cfg(test)]
mod test_util;

pub use anchor::Anchor;
pub use error::DockError;
pub use events::{DockEvent, EventArgs, EventHandler, HandlerId};
pub use frame::{Frame, ResizeHandle};
pub use gesture::{Gesture, HitTarget, PointerInput};
pub use ghost::Ghost;
pub use layout::{FramePlacement, LayoutPlacements};
pub use options::{AnchorTuning, DockerOptions};
pub use panel::{PANEL_PLACEHOLDER, Panel, PanelButton, PanelOptions};
pub use persistence::{
    CollapserSnapshot, CollapsersMarker, CollapsersSnapshot, FrameSnapshot, LAYOUT_SNAPSHOT_VERSION,
    LayoutError, LayoutSnapshot, NodeSnapshot, PanelSnapshot, SplitterSnapshot,
};
pub use registry::{PanelFactory, PanelType};
pub use splitter::Splitter;
pub use types::{
    CollapseSide, DockLocation, DockTarget, Node, NodeId, NodeKind, PanelHost, PanelId,
    TabOrientation,
};

use events::EventBus;
use registry::PanelRegistry;
use scheduler::{ResizeDebounce, UpdateScheduler};
use types::Collapsers;

/// Docking layout manager for one top-level surface.
///
/// Owns the splitter/frame tree, the floating and modal frames, the collapser drawers and every panel.
/// Structural operations mark the layout dirty; geometry is recomputed by [`Docker::tick`] at most once
/// per `response_rate_ms`, or immediately by [`Docker::force_update`].
///
/// A freshly created docker holds a single placeholder panel, so there is always a docked drop target.
#[derive(Debug)]
pub struct Docker {
    pub options: DockerOptions,

    registry: PanelRegistry,
    nodes: ahash::HashMap<NodeId, Node>,
    panels: ahash::HashMap<PanelId, Panel>,
    next_id: u64,

    root: Option<NodeId>,
    /// Every frame, docked, floating and collapser, in creation order.
    frames: Vec<NodeId>,
    splitters: Vec<NodeId>,
    /// Floating frames in z-order, topmost last.
    floating: Vec<NodeId>,
    modals: Vec<NodeId>,
    collapsers: Option<Collapsers>,
    focus: Option<NodeId>,
    placeholder: Option<PanelId>,

    container: Rect,
    scheduler: UpdateScheduler,
    resize: ResizeDebounce,
    events: EventBus,
    gesture: Gesture,
    last_integrity_hash: u64,
}

impl Docker {
    pub fn new(container: Rect, options: DockerOptions) -> Self {
        let mut docker = Self {
            options,
            registry: PanelRegistry::default(),
            nodes: Default::default(),
            panels: Default::default(),
            next_id: 0,
            root: None,
            frames: Vec::new(),
            splitters: Vec::new(),
            floating: Vec::new(),
            modals: Vec::new(),
            collapsers: None,
            focus: None,
            placeholder: None,
            container,
            scheduler: UpdateScheduler::default(),
            resize: ResizeDebounce::default(),
            events: EventBus::default(),
            gesture: Gesture::Idle,
            last_integrity_hash: 0,
        };
        docker.add_placeholder(None);
        docker.force_update();
        docker
    }

    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn container_rect(&self) -> Rect {
        self.container
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn frame(&self, id: NodeId) -> Option<&Frame> {
        self.nodes.get(&id).and_then(Node::as_frame)
    }

    pub fn splitter(&self, id: NodeId) -> Option<&Splitter> {
        self.nodes.get(&id).and_then(Node::as_splitter)
    }

    pub(super) fn frame_mut(&mut self, id: NodeId) -> Option<&mut Frame> {
        self.nodes.get_mut(&id).and_then(Node::as_frame_mut)
    }

    pub(super) fn splitter_mut(&mut self, id: NodeId) -> Option<&mut Splitter> {
        self.nodes.get_mut(&id).and_then(Node::as_splitter_mut)
    }

    pub fn panel(&self, id: PanelId) -> Option<&Panel> {
        self.panels.get(&id)
    }

    pub fn panel_mut(&mut self, id: PanelId) -> Option<&mut Panel> {
        self.panels.get_mut(&id)
    }

    /// The frame currently holding `panel`.
    pub fn panel_frame(&self, panel: PanelId) -> Option<NodeId> {
        match self.panels.get(&panel)?.host {
            PanelHost::Frame(frame) => Some(frame),
            PanelHost::Transition => None,
        }
    }

    pub fn frames(&self) -> &[NodeId] {
        &self.frames
    }

    pub fn splitters(&self) -> &[NodeId] {
        &self.splitters
    }

    /// Floating frames, bottom to top.
    pub fn floating_frames(&self) -> &[NodeId] {
        &self.floating
    }

    /// The modal stack, topmost last.
    pub fn modal_frames(&self) -> &[NodeId] {
        &self.modals
    }

    pub fn focused_frame(&self) -> Option<NodeId> {
        self.focus
    }

    pub fn placeholder(&self) -> Option<PanelId> {
        self.placeholder
    }

    pub fn collapser(&self, side: CollapseSide) -> Option<NodeId> {
        self.collapsers.map(|c| c.get(side))
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// The drag preview, while a drag-to-dock gesture is active.
    pub fn ghost(&self) -> Option<&Ghost> {
        self.gesture.ghost()
    }

    // ------------------------------------------------------------------------
    // Events

    /// Subscribe to an event globally.
    pub fn on(&mut self, event: DockEvent, handler: impl FnMut(&mut EventArgs) + 'static) -> HandlerId {
        self.events.on(event, handler)
    }

    /// Remove a global handler, or all global handlers for `event` when `id` is `None`.
    pub fn off(&mut self, event: &DockEvent, id: Option<HandlerId>) -> usize {
        self.events.off(event, id)
    }

    /// Subscribe to an event on one panel.
    pub fn on_panel(
        &mut self,
        panel: PanelId,
        event: DockEvent,
        handler: impl FnMut(&mut EventArgs) + 'static,
    ) -> Result<HandlerId, DockError> {
        let panel = self
            .panels
            .get_mut(&panel)
            .ok_or(DockError::PanelNotFound(panel))?;
        Ok(panel.on(event, handler))
    }

    pub fn off_panel(&mut self, panel: PanelId, event: &DockEvent, id: Option<HandlerId>) -> usize {
        self.panels
            .get_mut(&panel)
            .map_or(0, |p| p.events.off(event, id))
    }

    /// Deliver `event` to every panel (in frame order), then to the global handlers.
    pub fn trigger(&mut self, event: DockEvent, data: Option<serde_json::Value>) {
        let panels: Vec<PanelId> = self.docked_panel_order();
        for panel in panels {
            self.trigger_panel(panel, event.clone(), data.clone());
        }
        self.trigger_global(event, data);
    }

    pub(super) fn trigger_global(&mut self, event: DockEvent, data: Option<serde_json::Value>) {
        let mut args = EventArgs {
            event,
            panel: None,
            data,
        };
        self.events.emit(&mut args);
    }

    /// Returns the event data after every handler had a chance to replace it.
    pub(super) fn trigger_panel(
        &mut self,
        panel: PanelId,
        event: DockEvent,
        data: Option<serde_json::Value>,
    ) -> Option<serde_json::Value> {
        let panel = self.panels.get_mut(&panel)?;
        panel::emit(panel, event, data)
    }

    pub(super) fn trigger_frame(&mut self, frame: NodeId, event: &DockEvent) {
        let panels = self.frame(frame).map(|f| f.panels.clone()).unwrap_or_default();
        for panel in panels {
            self.trigger_panel(panel, event.clone(), None);
        }
    }

    /// Panels in frame order, followed by panels caught mid-move.
    pub(super) fn docked_panel_order(&self) -> Vec<PanelId> {
        let mut order: Vec<PanelId> = self
            .frames
            .iter()
            .filter_map(|f| self.frame(*f))
            .flat_map(|f| f.panels.iter().copied())
            .collect();
        let mut stray: Vec<PanelId> = self
            .panels
            .values()
            .filter(|p| p.host == PanelHost::Transition)
            .map(|p| p.id)
            .collect();
        stray.sort();
        order.extend(stray);
        order
    }
}
