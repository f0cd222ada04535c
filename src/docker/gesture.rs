//! Pointer input: hit testing and the one drag gesture that may be active at a time.
//!
//! Every drag is a [`Gesture`] variant held by the docker. Releasing the pointer or cancelling always
//! takes the whole variant, so there is no state left over from an earlier drag.

use std::mem;

use egui::{Modifiers, PointerButton, Pos2, Rect, Vec2};

use super::Docker;
use super::anchor::Anchor;
use super::error::DockError;
use super::events::DockEvent;
use super::frame::ResizeHandle;
use super::ghost::Ghost;
use super::panel::PanelOptions;
use super::types::{DockLocation, DockTarget, NodeId, PanelId};

/// One pointer event, in container coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    pub pos: Pos2,
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

impl PointerInput {
    pub fn primary(pos: Pos2) -> Self {
        Self {
            pos,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// What is under a point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    Nothing,
    /// Outside the topmost modal frame while one is open.
    ModalBlocker,
    SplitterBar(NodeId),
    ResizeHandle(NodeId, ResizeHandle),
    Tab {
        frame: NodeId,
        panel: PanelId,
        index: usize,
    },
    TitleBar(NodeId),
    Content(NodeId),
}

/// The active pointer gesture. At most one exists; the ghost lives inside the variants that need one.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    SplitterDrag {
        splitter: NodeId,
        origin: f32,
    },
    /// Dragging a frame by its title bar. Without a ghost this is a plain floating window move.
    FrameMove {
        frame: NodeId,
        /// Pointer offset from the frame centre.
        grab: Vec2,
        origin: Pos2,
        ghost: Option<Ghost>,
        force_float: bool,
    },
    FrameResize {
        frame: NodeId,
        handle: ResizeHandle,
        origin: Rect,
    },
    /// Dragging one tab: live re-order inside its frame, docking anywhere else.
    TabReorder {
        frame: NodeId,
        panel: PanelId,
        origin: usize,
        ghost: Ghost,
        force_float: bool,
    },
    /// Placing a panel that does not exist yet.
    PanelCreation {
        type_name: String,
        ghost: Ghost,
    },
    /// Middle button pressed on a closeable tab; it closes if released on the same tab.
    TabClose {
        panel: PanelId,
    },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn ghost(&self) -> Option<&Ghost> {
        match self {
            Self::FrameMove { ghost, .. } => ghost.as_ref(),
            Self::TabReorder { ghost, .. } | Self::PanelCreation { ghost, .. } => Some(ghost),
            Self::Idle
            | Self::SplitterDrag { .. }
            | Self::FrameResize { .. }
            | Self::TabClose { .. } => None,
        }
    }

    fn is_docking(&self) -> bool {
        self.ghost().is_some()
    }
}

impl Docker {
    /// What the pointer would hit at `pos`, topmost first.
    pub fn hit_test(&self, pos: Pos2) -> HitTarget {
        if let Some(modal) = self.modals.last().copied() {
            let rect = self.frame(modal).map_or(Rect::NOTHING, |f| f.rect);
            if !rect.expand(self.options.resize_handle_size).contains(pos) {
                return HitTarget::ModalBlocker;
            }
        }

        for frame in self.floating.iter().rev().copied() {
            let Some(f) = self.frame(frame) else {
                continue;
            };
            if let Some(handle) = ResizeHandle::classify(f.rect, pos, self.options.resize_handle_size) {
                return HitTarget::ResizeHandle(frame, handle);
            }
            if f.rect.contains(pos) {
                return self.hit_frame(frame, pos);
            }
        }

        if let Some(drawer) = self.open_collapser() {
            if self
                .frame(drawer)
                .and_then(|f| f.drawer_rect)
                .is_some_and(|r| r.contains(pos))
            {
                return HitTarget::Content(drawer);
            }
        }

        for splitter in self.splitters.iter().copied() {
            let Some(s) = self.splitter(splitter) else {
                continue;
            };
            if !self.wraps_collapser(splitter) && s.bar_rect.is_positive() && s.bar_rect.contains(pos) {
                return HitTarget::SplitterBar(splitter);
            }
        }

        self.frames
            .iter()
            .copied()
            .filter(|f| self.frame(*f).is_some_and(|f| !f.floating && f.rect.contains(pos)))
            .map(|f| self.hit_frame(f, pos))
            .next()
            .unwrap_or(HitTarget::Nothing)
    }

    fn hit_frame(&self, frame: NodeId, pos: Pos2) -> HitTarget {
        let tabs = self.tab_rects(frame);
        if let Some((index, (panel, _))) = tabs.iter().enumerate().find(|(_, (_, r))| r.contains(pos)) {
            return HitTarget::Tab {
                frame,
                panel: *panel,
                index,
            };
        }
        if self.title_strip(frame).is_some_and(|r| r.contains(pos)) {
            return HitTarget::TitleBar(frame);
        }
        HitTarget::Content(frame)
    }

    /// Pointer pressed. Focuses what was hit and may start a gesture. Returns the hit.
    pub fn pointer_down(&mut self, input: PointerInput) -> HitTarget {
        let hit = self.hit_test(input.pos);
        if !self.gesture.is_idle() {
            return hit;
        }
        let primary = input.button == PointerButton::Primary;

        match hit {
            HitTarget::Nothing => {}
            HitTarget::ModalBlocker => {
                if let Some(modal) = self.modals.last().copied() {
                    self.set_focus(Some(modal));
                }
            }
            HitTarget::SplitterBar(splitter) => {
                if primary {
                    let origin = self.splitter(splitter).map_or(0.5, |s| s.ratio);
                    self.gesture = Gesture::SplitterDrag { splitter, origin };
                }
            }
            HitTarget::ResizeHandle(frame, handle) => {
                self.set_focus(Some(frame));
                if primary {
                    let origin = self.frame(frame).map_or(Rect::NOTHING, |f| f.floating_rect());
                    self.gesture = Gesture::FrameResize { frame, handle, origin };
                }
            }
            HitTarget::Tab { frame, panel, index } => self.press_tab(input, frame, panel, index),
            HitTarget::TitleBar(frame) => self.press_title(input, frame),
            HitTarget::Content(frame) => self.set_focus(Some(frame)),
        }

        if !self.gesture.is_idle() {
            log::trace!("gesture started: {:?}", self.gesture);
        }
        hit
    }

    fn press_tab(&mut self, input: PointerInput, frame: NodeId, panel: PanelId, index: usize) {
        let (moveable, closeable) = self
            .panels
            .get(&panel)
            .map_or((false, false), |p| (p.moveable, p.is_closeable()));

        match input.button {
            PointerButton::Middle => {
                if closeable {
                    self.gesture = Gesture::TabClose { panel };
                }
            }
            PointerButton::Primary => {
                if self.focus_panel(panel).is_err() {
                    return;
                }
                let modal = self.frame(frame).is_some_and(|f| f.modal);
                if moveable && !modal {
                    let ghost = self.source_ghost(frame, input.pos);
                    self.gesture = Gesture::TabReorder {
                        frame,
                        panel,
                        origin: index,
                        ghost,
                        force_float: false,
                    };
                    self.trigger(DockEvent::BeginDock, None);
                }
            }
            _ => {
                if let Err(err) = self.focus_panel(panel) {
                    log::warn!("focusing {panel} failed: {err}");
                }
            }
        }
    }

    fn press_title(&mut self, input: PointerInput, frame: NodeId) {
        self.set_focus(Some(frame));
        let Some(f) = self.frame(frame) else {
            return;
        };
        let floating = f.floating;
        let modal = f.modal;
        let collapser = f.is_collapser();
        let origin = f.pos;
        let grab = input.pos - f.floating_rect().center();
        let all_moveable = f
            .panels
            .iter()
            .all(|p| self.panels.get(p).is_some_and(|p| p.moveable));
        let primary = input.button == PointerButton::Primary;

        if floating && primary && (input.modifiers.is_none() || modal) {
            self.gesture = Gesture::FrameMove {
                frame,
                grab,
                origin,
                ghost: None,
                force_float: false,
            };
            self.trigger_frame(frame, &DockEvent::MoveStarted);
            return;
        }

        let can_dock = all_moveable && !modal && !collapser;
        if can_dock && matches!(input.button, PointerButton::Primary | PointerButton::Middle) {
            let ghost = self.source_ghost(frame, input.pos);
            self.gesture = Gesture::FrameMove {
                frame,
                grab,
                origin,
                ghost: Some(ghost),
                force_float: !(floating || primary),
            };
            self.trigger(DockEvent::BeginDock, None);
        }
    }

    fn source_ghost(&self, frame: NodeId, pointer: Pos2) -> Ghost {
        let rect = self.frame(frame).map_or(Rect::NOTHING, |f| {
            if f.floating {
                f.floating_rect()
            } else {
                f.drawer_rect.unwrap_or(f.rect)
            }
        });
        let size = if rect.is_positive() {
            rect.size()
        } else {
            self.options.default_float_size
        };
        Ghost::from_source(pointer, rect, size.max(self.options.min_frame_size))
    }

    /// Start dragging a new panel of `type_name` from outside the layout (a "create panel" menu).
    pub fn begin_panel_creation(&mut self, type_name: &str, pointer: Pos2) -> Result<(), DockError> {
        if self.registry.get(type_name).is_none() {
            return Err(DockError::UnknownPanelType(type_name.to_owned()));
        }
        self.cancel();
        let size = self.options.default_float_size;
        let mut ghost = Ghost::new(pointer, size, Vec2::new(size.x * 0.5, 10.0));
        ghost.update(pointer, self.compute_anchor(pointer, None, false, false));
        self.gesture = Gesture::PanelCreation {
            type_name: type_name.to_owned(),
            ghost,
        };
        self.trigger(DockEvent::BeginDock, None);
        Ok(())
    }

    /// Pointer moved. Returns whether a gesture is in progress.
    pub fn pointer_move(&mut self, input: PointerInput) -> bool {
        let pos = input.pos;
        let mut gesture = mem::take(&mut self.gesture);
        match &mut gesture {
            Gesture::Idle | Gesture::TabClose { .. } => {}
            Gesture::SplitterDrag { splitter, .. } => {
                let min = self.pane_minimums(*splitter);
                if let Some(s) = self.splitter_mut(*splitter) {
                    let ratio = s.ratio_at(pos, min);
                    s.set_pos(ratio);
                    self.update();
                }
            }
            Gesture::FrameResize { frame, handle, .. } => {
                let min = self.options.min_frame_size;
                if let Some(f) = self.frame_mut(*frame) {
                    f.resize_to(*handle, pos, min);
                    self.update();
                }
            }
            Gesture::FrameMove {
                frame,
                grab,
                ghost: None,
                ..
            } => {
                if let Some(f) = self.frame_mut(*frame) {
                    f.pos = pos - *grab;
                    self.update();
                }
            }
            Gesture::FrameMove {
                frame,
                ghost: Some(ghost),
                force_float,
                ..
            } => {
                let anchor = self.compute_anchor(pos, Some(*frame), false, *force_float);
                ghost.update(pos, anchor);
            }
            Gesture::TabReorder {
                frame,
                panel,
                ghost,
                force_float,
                ..
            } => {
                let anchor = self.compute_anchor(pos, Some(*frame), true, *force_float);
                if let Some(Anchor {
                    is_self: true,
                    location: DockLocation::Stacked,
                    tab_index: Some(to),
                    ..
                }) = anchor
                {
                    let from = self.frame(*frame).and_then(|f| f.index_of(*panel));
                    if let Some(from) = from.filter(|from| *from != to) {
                        self.move_tab(*frame, from, to);
                    }
                }
                ghost.update(pos, anchor);
            }
            Gesture::PanelCreation { ghost, .. } => {
                let anchor = self.compute_anchor(pos, None, false, false);
                ghost.update(pos, anchor);
            }
        }
        self.gesture = gesture;
        !self.gesture.is_idle()
    }

    /// Pointer released: finish the active gesture. Returns whether one was active.
    pub fn pointer_up(&mut self, input: PointerInput) -> bool {
        let gesture = mem::take(&mut self.gesture);
        let docking = gesture.is_docking();
        log::trace!("gesture released: {gesture:?}");

        match gesture {
            Gesture::Idle => return false,
            Gesture::SplitterDrag { .. } | Gesture::FrameResize { .. } => self.update(),
            Gesture::FrameMove {
                frame, ghost: None, ..
            } => {
                self.trigger_frame(frame, &DockEvent::MoveEnded);
                self.update();
            }
            Gesture::FrameMove {
                frame,
                ghost: Some(ghost),
                ..
            } => self.release_frame(frame, &ghost),
            Gesture::TabReorder {
                frame, panel, ghost, ..
            } => self.release_tab(frame, panel, &ghost),
            Gesture::PanelCreation { type_name, ghost } => self.release_creation(&type_name, &ghost),
            Gesture::TabClose { panel } => {
                let still_over = matches!(
                    self.hit_test(input.pos),
                    HitTarget::Tab { panel: p, .. } if p == panel
                );
                if still_over {
                    if let Err(err) = self.close_panel(panel) {
                        log::warn!("middle-click close of {panel} refused: {err}");
                    }
                }
            }
        }

        if docking {
            self.trigger(DockEvent::EndDock, None);
        }
        true
    }

    /// Abort the active gesture. The layout is put back as it was when the gesture started.
    pub fn cancel(&mut self) {
        let gesture = mem::take(&mut self.gesture);
        let docking = gesture.is_docking();
        match gesture {
            Gesture::Idle => return,
            Gesture::SplitterDrag { splitter, origin } => {
                if let Some(s) = self.splitter_mut(splitter) {
                    s.set_pos(origin);
                }
            }
            Gesture::FrameMove { frame, origin, ghost, .. } => {
                if let Some(f) = self.frame_mut(frame) {
                    f.pos = origin;
                }
                if ghost.is_none() {
                    self.trigger_frame(frame, &DockEvent::MoveEnded);
                }
            }
            Gesture::FrameResize { frame, origin, .. } => {
                if let Some(f) = self.frame_mut(frame) {
                    f.pos = origin.center();
                    f.size = origin.size();
                }
            }
            Gesture::TabReorder {
                frame, panel, origin, ..
            } => {
                let from = self.frame(frame).and_then(|f| f.index_of(panel));
                if let Some(from) = from {
                    self.move_tab(frame, from, origin);
                }
            }
            Gesture::PanelCreation { .. } | Gesture::TabClose { .. } => {}
        }
        if docking {
            self.trigger(DockEvent::EndDock, None);
        }
        log::trace!("gesture cancelled");
        self.update();
    }

    /// Options that float content at `rect` (absolute coordinates).
    fn float_options(&self, rect: Rect) -> PanelOptions {
        PanelOptions::from_rect(rect.translate(-self.container.min.to_vec2()))
    }

    fn release_frame(&mut self, frame: NodeId, ghost: &Ghost) {
        let Some(f) = self.frame(frame) else {
            return;
        };
        let panels = f.panels.clone();
        let active = f.active_panel();
        let floating = f.floating;

        let (location, target, options) = match ghost.anchor() {
            Some(anchor) if anchor.is_self => return,
            Some(anchor) => (anchor.location, Some(anchor.target), PanelOptions::default()),
            None if floating => {
                let center = ghost.float_rect().center();
                if let Some(f) = self.frame_mut(frame) {
                    f.pos = center;
                }
                self.update();
                return;
            }
            None => {
                if self.is_last_frame(frame) {
                    log::debug!("not floating {frame}: it is the last docked frame");
                    return;
                }
                (DockLocation::Float, None, self.float_options(ghost.float_rect()))
            }
        };

        let Some((first, rest)) = panels.split_first() else {
            return;
        };
        if let Err(err) = self.move_panel(*first, location, target, options) {
            log::warn!("dropping {frame} failed: {err}");
            return;
        }
        for panel in rest {
            if let Err(err) = self.move_panel(*panel, DockLocation::Stacked, Some(DockTarget::Panel(*first)), PanelOptions::default()) {
                log::warn!("stacking {panel} after drop failed: {err}");
            }
        }
        if let Some(active) = active {
            if let Err(err) = self.focus_panel(active) {
                log::warn!("focusing {active} failed: {err}");
            }
        }
    }

    fn release_tab(&mut self, frame: NodeId, panel: PanelId, ghost: &Ghost) {
        let result = match ghost.anchor() {
            Some(Anchor {
                is_self: true,
                location: DockLocation::Stacked,
                ..
            }) => return,
            Some(anchor) => self.move_panel(panel, anchor.location, Some(anchor.target), PanelOptions::default()),
            None => {
                let single_docked = self
                    .frame(frame)
                    .is_some_and(|f| !f.floating && f.panels.len() == 1)
                    && self.is_last_panel(panel);
                if single_docked {
                    log::debug!("not floating {panel}: it is the last docked panel");
                    return;
                }
                let options = self.float_options(ghost.float_rect());
                self.move_panel(panel, DockLocation::Float, None, options)
            }
        };
        match result {
            Ok(panel) => {
                if let Err(err) = self.focus_panel(panel) {
                    log::warn!("focusing {panel} failed: {err}");
                }
            }
            Err(err) => log::warn!("dropping tab {panel} failed: {err}"),
        }
    }

    fn release_creation(&mut self, type_name: &str, ghost: &Ghost) {
        let (location, target, options) = match ghost.anchor() {
            Some(anchor) => (anchor.location, Some(anchor.target), PanelOptions::default()),
            None => (DockLocation::Float, None, self.float_options(ghost.float_rect())),
        };
        match self.add_panel(type_name, location, target, options) {
            Ok(panel) => {
                if let Err(err) = self.focus_panel(panel) {
                    log::warn!("focusing {panel} failed: {err}");
                }
            }
            Err(err) => log::warn!("creating {type_name:?} by drag failed: {err}"),
        }
    }
}
