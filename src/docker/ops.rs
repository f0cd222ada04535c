use egui::{Rect, Vec2};

use crate::geometry::SizeValue;

use super::error::DockError;
use super::{Docker, Frame, Gesture};
use super::events::DockEvent;
use super::panel::{Panel, PanelOptions};
use super::registry::PanelType;
use super::types::{DockLocation, DockTarget, NodeId, PanelHost, PanelId};

impl Docker {
    // ------------------------------------------------------------------------
    // Panel types

    pub fn register_panel_type(&mut self, name: &str, panel_type: PanelType) -> Result<(), DockError> {
        if self.registry.register(name, panel_type) {
            Ok(())
        } else {
            log::warn!("panel type {name:?} is already registered");
            Err(DockError::DuplicatePanelType(name.to_owned()))
        }
    }

    /// Registered type names in registration order.
    pub fn panel_types(&self, include_private: bool) -> Vec<&str> {
        self.registry.names(include_private)
    }

    pub fn panel_type_info(&self, name: &str) -> Option<&PanelType> {
        self.registry.get(name)
    }

    // ------------------------------------------------------------------------
    // Placement

    fn validate_placement(&self, location: DockLocation, target: Option<DockTarget>) -> Result<(), DockError> {
        match target {
            Some(DockTarget::Collapsed) => {
                if !self.options.is_collapse_enabled() {
                    log::warn!("cannot collapse a panel: collapsers are disabled");
                    return Err(DockError::CollapseDisabled);
                }
                if location.collapse_side().is_none() {
                    log::warn!("cannot collapse a panel to {location:?}");
                    return Err(DockError::InvalidCollapseLocation(location));
                }
                if self.collapsers.is_none() && self.root.is_none() {
                    log::warn!("cannot create collapsers without a docked layout");
                    return Err(DockError::CollapseDisabled);
                }
                Ok(())
            }
            Some(DockTarget::Panel(panel)) if !self.panels.contains_key(&panel) => {
                Err(DockError::PanelNotFound(panel))
            }
            Some(DockTarget::Node(node)) if !self.nodes.contains_key(&node) => {
                Err(DockError::NodeNotFound(node))
            }
            _ => Ok(()),
        }
    }

    /// Create a panel of a registered type and place it.
    ///
    /// - `Stacked` adds a tab to the frame holding `target`, or docks left when there is none.
    /// - `Top`/`Left`/`Right`/`Bottom` split the slot of `target` (the dock root when `None`), the new
    ///   pane sized by `options` or the panel's init size, half of the space otherwise. With
    ///   [`DockTarget::Collapsed`] the panel goes into that side's collapser drawer instead.
    /// - `Float`/`Modal` create a floating frame; modal frames block everything else and fix the panel.
    ///
    /// A moveable docked panel replaces the placeholder.
    pub fn add_panel(
        &mut self,
        type_name: &str,
        location: DockLocation,
        target: Option<DockTarget>,
        options: PanelOptions,
    ) -> Result<PanelId, DockError> {
        self.validate_placement(location, target)?;

        let Some(panel_type) = self.registry.get(type_name) else {
            log::warn!("cannot add panel: type {type_name:?} is not registered");
            return Err(DockError::UnknownPanelType(type_name.to_owned()));
        };
        if let Some(limit) = panel_type.limit {
            if self.find_panels(Some(type_name)).len() >= limit {
                log::warn!("cannot add panel: type {type_name:?} is limited to {limit}");
                return Err(DockError::PanelLimitReached {
                    type_name: type_name.to_owned(),
                    limit,
                });
            }
        }

        let id = PanelId(self.alloc_id());
        let mut panel = Panel::new(id, type_name);
        if let Some(panel_type) = self.registry.get(type_name) {
            let content = panel_type.create(&mut panel);
            panel.set_content(content);
        }
        let moveable = panel.moveable;
        self.panels.insert(id, panel);

        self.place_panel(id, location, target, &options);

        let lands_docked = !location.is_floating() && target != Some(DockTarget::Collapsed);
        if moveable && lands_docked && self.placeholder.is_some_and(|p| p != id) {
            self.remove_placeholder();
        }
        self.structure_changed("add_panel");
        Ok(id)
    }

    /// Close a panel and destroy its content. Emits `Closed` first.
    ///
    /// An emptied frame is removed and the tree collapsed, unless it held the last moveable docked
    /// panel, in which case the placeholder takes its place.
    pub fn remove_panel(&mut self, panel: PanelId) -> Result<(), DockError> {
        let p = self.panels.get(&panel).ok_or(DockError::PanelNotFound(panel))?;
        let PanelHost::Frame(frame) = p.host else {
            return Err(DockError::PanelDetached(panel));
        };
        if p.placeholder && self.is_last_panel(panel) {
            log::warn!("refusing to remove the last placeholder panel");
            return Err(DockError::LastPlaceholder);
        }
        self.remove_panel_inner(panel, frame);
        self.structure_changed("remove_panel");
        Ok(())
    }

    /// Like [`Self::remove_panel`], but honours the panel's closeable flag.
    pub fn close_panel(&mut self, panel: PanelId) -> Result<(), DockError> {
        let p = self.panels.get(&panel).ok_or(DockError::PanelNotFound(panel))?;
        if !p.is_closeable() {
            return Err(DockError::NotCloseable(panel));
        }
        self.remove_panel(panel)
    }

    pub(super) fn remove_panel_inner(&mut self, panel: PanelId, frame: NodeId) {
        let last = self.is_last_panel(panel);
        self.trigger_panel(panel, DockEvent::Closed, None);
        if self.placeholder == Some(panel) {
            self.placeholder = None;
        }
        self.detach_panel(panel, frame, last);
        self.panels.remove(&panel);
        log::debug!("removed panel {panel}");
    }

    /// Take `panel` out of `frame` into the transition state and clean up the frame.
    fn detach_panel(&mut self, panel: PanelId, frame: NodeId, last: bool) {
        let Some(f) = self.frame_mut(frame) else {
            return;
        };
        f.take_panel(panel);
        let emptied = f.panels.is_empty() && !f.is_collapser();
        let floating = f.floating;
        self.set_panel_host(panel, PanelHost::Transition);

        if emptied {
            // The collapsers need content to surround.
            if (last && !floating) || self.collapser_content() == Some(frame) {
                self.add_placeholder(Some(frame));
            } else {
                self.remove_frame(frame);
            }
        }
        self.update();
    }

    /// Re-place an existing panel, keeping its content.
    ///
    /// The panel keeps its on-screen size as its new init size. Emits `Attached`/`Detached` when the
    /// floating state changes, and `Moved` always.
    pub fn move_panel(
        &mut self,
        panel: PanelId,
        location: DockLocation,
        target: Option<DockTarget>,
        options: PanelOptions,
    ) -> Result<PanelId, DockError> {
        let p = self.panels.get(&panel).ok_or(DockError::PanelNotFound(panel))?;
        self.validate_placement(location, target)?;
        let moveable = p.moveable;
        let source_frame = self.panel_frame(panel);

        let last = self.is_last_panel(panel);
        let pre_rect = match source_frame {
            Some(frame) => self.frame_rect_for_move(frame),
            None => p.rect,
        };
        let was_floating = source_frame
            .and_then(|f| self.frame(f))
            .is_some_and(|f| f.floating);

        if let Some(frame) = source_frame {
            self.detach_panel(panel, frame, last);
        }

        if pre_rect.is_positive() {
            if let Some(p) = self.panels.get_mut(&panel) {
                p.init_size = [
                    Some(SizeValue::Pixels(pre_rect.width())),
                    Some(SizeValue::Pixels(pre_rect.height())),
                ];
            }
        }

        // The target may have been swept away with the emptied source frame.
        let target = target.filter(|t| match *t {
            DockTarget::Panel(p) => p != panel && self.panel_frame(p).is_some(),
            DockTarget::Node(n) => self.nodes.contains_key(&n),
            DockTarget::Collapsed => true,
        });
        let onto_placeholder = matches!(target, Some(DockTarget::Panel(p)) if Some(p) == self.placeholder);

        self.place_panel(panel, location, target, &options);

        let new_frame = self.panel_frame(panel);
        if let Some(frame) = new_frame {
            let cascade = self.options.float_cascade_offset;
            let explicit_pos = options.x.is_some() || options.y.is_some();
            if let Some(f) = self.frame_mut(frame) {
                if f.floating && f.panels.len() == 1 && !explicit_pos && pre_rect.is_positive() {
                    f.pos = pre_rect.center() + Vec2::splat(cascade);
                }
            }
        }

        let lands_docked =
            moveable && !location.is_floating() && target != Some(DockTarget::Collapsed);
        if onto_placeholder || (lands_docked && self.placeholder.is_some_and(|p| p != panel)) {
            self.remove_placeholder();
        }
        self.structure_changed("move_panel");

        let now_floating = self
            .panel_frame(panel)
            .and_then(|f| self.frame(f))
            .is_some_and(|f| f.floating);
        if now_floating != was_floating {
            let event = if now_floating {
                DockEvent::Detached
            } else {
                DockEvent::Attached
            };
            self.trigger_panel(panel, event, None);
        }
        self.trigger_panel(panel, DockEvent::Moved, None);
        Ok(panel)
    }

    /// On-screen rect used as the pre-move geometry: a collapser reports its drawer.
    fn frame_rect_for_move(&self, frame: NodeId) -> Rect {
        match self.frame(frame) {
            Some(f) if f.is_collapser() => f.drawer_rect.unwrap_or(Rect::from_min_size(f.rect.min, f.size)),
            _ => self.node_rect(frame),
        }
    }

    /// All panels of `type_name` (every panel when `None`), in frame order.
    pub fn find_panels(&self, type_name: Option<&str>) -> Vec<PanelId> {
        self.frames
            .iter()
            .filter_map(|f| self.frame(*f))
            .flat_map(|f| f.panels.iter())
            .filter(|p| {
                type_name.is_none_or(|name| self.panels.get(p).is_some_and(|p| p.type_name == name))
            })
            .copied()
            .collect()
    }

    /// `true` when no other moveable panel sits in a docked, non-collapser frame.
    pub fn is_last_panel(&self, panel: PanelId) -> bool {
        !self.docked_frames().any(|f| {
            f.panels
                .iter()
                .any(|p| *p != panel && self.panels.get(p).is_some_and(|p| p.moveable))
        })
    }

    /// `true` when no other docked, non-collapser frame holds a moveable panel.
    pub fn is_last_frame(&self, frame: NodeId) -> bool {
        !self
            .frames
            .iter()
            .filter(|f| **f != frame)
            .filter_map(|f| self.frame(*f))
            .filter(|f| !f.floating && !f.is_collapser())
            .any(|f| {
                f.panels
                    .iter()
                    .any(|p| self.panels.get(p).is_some_and(|p| p.moveable))
            })
    }

    fn docked_frames(&self) -> impl Iterator<Item = &Frame> {
        self.frames
            .iter()
            .filter_map(|f| self.frame(*f))
            .filter(|f| !f.floating && !f.is_collapser())
    }

    /// Close every panel and destroy the whole layout, leaving only a fresh placeholder.
    pub fn clear(&mut self) {
        self.clear_layout();
        self.add_placeholder(None);
        self.structure_changed("clear");
    }

    pub(super) fn clear_layout(&mut self) {
        for panel in self.docked_panel_order() {
            self.trigger_panel(panel, DockEvent::Closed, None);
        }
        self.nodes.clear();
        self.panels.clear();
        self.root = None;
        self.frames.clear();
        self.splitters.clear();
        self.floating.clear();
        self.modals.clear();
        self.collapsers = None;
        self.focus = None;
        self.placeholder = None;
        self.gesture = Gesture::Idle;
        self.update();
    }

    // ------------------------------------------------------------------------
    // Tabs, splitters, buttons

    /// Make `panel` the active tab of its frame and focus the frame. Opens a collapser drawer.
    pub fn focus_panel(&mut self, panel: PanelId) -> Result<(), DockError> {
        let frame = self.panel_frame(panel).ok_or(DockError::PanelDetached(panel))?;
        if let Some(f) = self.frame_mut(frame) {
            if let Some(index) = f.index_of(panel) {
                f.select(index);
            }
        }
        self.set_focus(Some(frame));
        self.update();
        Ok(())
    }

    /// Show the tab at `index`. Returns whether the selection changed; out of range is ignored.
    /// Selecting in a collapser opens its drawer, which then closes when focus leaves it.
    pub fn select_tab(&mut self, frame: NodeId, index: usize) -> Result<bool, DockError> {
        let f = self.frame_mut(frame).ok_or(DockError::NodeNotFound(frame))?;
        let changed = f.select(index);
        let collapser = f.is_collapser();
        if changed {
            if collapser {
                self.set_focus(Some(frame));
            }
            self.update();
        }
        Ok(changed)
    }

    /// Reorder a tab within its frame. Returns the new index.
    pub fn move_tab(&mut self, frame: NodeId, from: usize, to: usize) -> Option<usize> {
        let index = self.frame_mut(frame)?.move_tab(from, to)?;
        self.update();
        Some(index)
    }

    /// Set a splitter's ratio (clamped to `[0, 1]`). Returns the stored value.
    ///
    /// The splitters holding collapser bars keep their ratio.
    pub fn set_splitter_pos(&mut self, splitter: NodeId, ratio: f32) -> Result<f32, DockError> {
        if self.wraps_collapser(splitter) {
            log::debug!("splitter {splitter} holds a collapser bar; ratio left alone");
            return self.splitter(splitter).map(|s| s.ratio).ok_or(DockError::NodeNotFound(splitter));
        }
        let s = self
            .splitter_mut(splitter)
            .ok_or(DockError::NodeNotFound(splitter))?;
        let ratio = s.set_pos(ratio);
        self.update();
        Ok(ratio)
    }

    /// Press a panel button. Toggleable buttons flip state. Emits `Button` with `{name, isToggled}`.
    pub fn click_button(&mut self, panel: PanelId, name: &str) -> Result<bool, DockError> {
        let p = self
            .panels
            .get_mut(&panel)
            .ok_or(DockError::PanelNotFound(panel))?;
        let Some(button) = p.buttons.iter_mut().find(|b| b.name == name) else {
            log::warn!("panel {panel} has no button named {name:?}");
            return Ok(false);
        };
        if button.toggleable {
            button.toggled = !button.toggled;
        }
        let toggled = button.toggled;
        self.trigger_panel(
            panel,
            DockEvent::Button,
            Some(serde_json::json!({ "name": name, "isToggled": toggled })),
        );
        Ok(toggled)
    }
}
