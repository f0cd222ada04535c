use std::any::Any;
use std::fmt;

use egui::{Rect, Vec2};

use crate::geometry::SizeValue;

use super::events::{DockEvent, EventArgs, EventBus, HandlerId};
use super::types::{PanelHost, PanelId, TabOrientation};

/// Type name of the stand-in panel that keeps one docked frame alive.
pub const PANEL_PLACEHOLDER: &str = "__dockPlaceholderPanel";

/// A toggleable or plain button shown in a panel's title area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelButton {
    pub name: String,
    pub toggleable: bool,
    pub toggled: bool,
}

/// A leaf content unit. The content object is built once by the registered factory and kept across moves.
pub struct Panel {
    pub(super) id: PanelId,
    pub(super) type_name: String,
    pub(super) host: PanelHost,
    title: String,
    title_visible: bool,
    pub(super) moveable: bool,
    closeable: bool,
    pub(super) placeholder: bool,
    /// Desired size; `None` per axis means "no preference" (half split).
    pub(super) init_size: [Option<SizeValue>; 2],
    pub(super) min_size: Vec2,
    pub(super) max_size: Vec2,
    /// Preferred floating position as a fraction of the container.
    pub(super) layout_pos: Vec2,
    pub(super) buttons: Vec<PanelButton>,
    pub(super) events: EventBus,
    pub(super) rect: Rect,
    pub(super) visible: bool,
    pub(super) initialized: bool,
    content: Option<Box<dyn Any>>,
}

impl fmt::Debug for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panel")
            .field("id", &self.id)
            .field("type_name", &self.type_name)
            .field("host", &self.host)
            .field("title", &self.title)
            .field("moveable", &self.moveable)
            .field("closeable", &self.closeable)
            .field("placeholder", &self.placeholder)
            .field("rect", &self.rect)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

impl Panel {
    pub(super) fn new(id: PanelId, type_name: &str) -> Self {
        Self {
            id,
            type_name: type_name.to_owned(),
            host: PanelHost::Transition,
            title: type_name.to_owned(),
            title_visible: true,
            moveable: true,
            closeable: true,
            placeholder: false,
            init_size: [None, None],
            min_size: Vec2::ZERO,
            max_size: Vec2::INFINITY,
            layout_pos: Vec2::splat(0.5),
            buttons: Vec::new(),
            events: EventBus::default(),
            rect: Rect::NOTHING,
            visible: false,
            initialized: false,
            content: None,
        }
    }

    pub(super) fn new_placeholder(id: PanelId) -> Self {
        let mut panel = Self::new(id, PANEL_PLACEHOLDER);
        panel.placeholder = true;
        panel.title_visible = false;
        panel.closeable = false;
        panel
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn host(&self) -> PanelHost {
        self.host
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn is_title_visible(&self) -> bool {
        self.title_visible
    }

    pub fn set_title_visible(&mut self, visible: bool) {
        self.title_visible = visible;
    }

    pub fn is_moveable(&self) -> bool {
        self.moveable
    }

    pub fn set_moveable(&mut self, moveable: bool) {
        self.moveable = moveable;
    }

    pub fn is_closeable(&self) -> bool {
        self.closeable
    }

    pub fn set_closeable(&mut self, closeable: bool) {
        self.closeable = closeable;
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn init_size(&self) -> [Option<SizeValue>; 2] {
        self.init_size
    }

    /// Preferred size when docked or floated without explicit options.
    pub fn set_init_size(&mut self, width: impl Into<SizeValue>, height: impl Into<SizeValue>) {
        self.init_size = [Some(width.into()), Some(height.into())];
    }

    pub fn min_size(&self) -> Vec2 {
        self.min_size
    }

    pub fn set_min_size(&mut self, size: Vec2) {
        self.min_size = size.max(Vec2::ZERO);
    }

    /// Defaults to infinite on both axes.
    pub fn max_size(&self) -> Vec2 {
        self.max_size
    }

    pub fn set_max_size(&mut self, size: Vec2) {
        self.max_size = size.max(self.min_size);
    }

    /// Floating position as a fraction of the container, `(0.5, 0.5)` by default.
    pub fn set_layout_pos(&mut self, fraction: Vec2) {
        self.layout_pos = fraction.clamp(Vec2::ZERO, Vec2::splat(1.0));
    }

    pub fn add_button(&mut self, name: impl Into<String>, toggleable: bool) {
        let name = name.into();
        if self.buttons.iter().any(|b| b.name == name) {
            log::warn!("panel {} already has a button named {name:?}", self.id);
            return;
        }
        self.buttons.push(PanelButton {
            name,
            toggleable,
            toggled: false,
        });
    }

    pub fn buttons(&self) -> &[PanelButton] {
        &self.buttons
    }

    /// Subscribe to an event on this panel. Usually called from the type factory.
    pub fn on(&mut self, event: DockEvent, handler: impl FnMut(&mut EventArgs) + 'static) -> HandlerId {
        self.events.on(event, handler)
    }

    /// Content rect from the last layout pass.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn content(&self) -> Option<&dyn Any> {
        self.content.as_deref()
    }

    pub fn content_mut(&mut self) -> Option<&mut dyn Any> {
        self.content.as_deref_mut()
    }

    pub fn content_as<T: 'static>(&self) -> Option<&T> {
        self.content.as_deref()?.downcast_ref()
    }

    pub(super) fn set_content(&mut self, content: Box<dyn Any>) {
        self.content = Some(content);
    }
}

/// Optional placement geometry for `add_panel` / `move_panel`.
///
/// Sizes resolve against the container being split (or the whole docker for floating frames).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PanelOptions {
    pub x: Option<SizeValue>,
    pub y: Option<SizeValue>,
    pub w: Option<SizeValue>,
    pub h: Option<SizeValue>,
    pub tab_orientation: Option<TabOrientation>,
}

impl PanelOptions {
    pub fn with_pos(mut self, x: impl Into<SizeValue>, y: impl Into<SizeValue>) -> Self {
        self.x = Some(x.into());
        self.y = Some(y.into());
        self
    }

    pub fn with_width(mut self, w: impl Into<SizeValue>) -> Self {
        self.w = Some(w.into());
        self
    }

    pub fn with_height(mut self, h: impl Into<SizeValue>) -> Self {
        self.h = Some(h.into());
        self
    }

    pub fn with_size(self, w: impl Into<SizeValue>, h: impl Into<SizeValue>) -> Self {
        self.with_width(w).with_height(h)
    }

    pub fn with_tab_orientation(mut self, orientation: TabOrientation) -> Self {
        self.tab_orientation = Some(orientation);
        self
    }

    /// Options describing `rect` exactly, in pixels.
    pub fn from_rect(rect: Rect) -> Self {
        Self::default()
            .with_pos(rect.left(), rect.top())
            .with_size(rect.width(), rect.height())
    }

    pub(super) fn resolve(&self, container: Vec2, fallback: [Option<SizeValue>; 2]) -> ResolvedOptions {
        ResolvedOptions {
            x: self.x.map(|v| v.to_pixels(container.x)),
            y: self.y.map(|v| v.to_pixels(container.y)),
            w: self.w.or(fallback[0]).map(|v| v.to_pixels(container.x)),
            h: self.h.or(fallback[1]).map(|v| v.to_pixels(container.y)),
        }
    }
}

/// [`PanelOptions`] resolved to pixels. A missing or negative size means "half".
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(super) struct ResolvedOptions {
    pub(super) x: Option<f32>,
    pub(super) y: Option<f32>,
    pub(super) w: Option<f32>,
    pub(super) h: Option<f32>,
}

impl ResolvedOptions {
    pub(super) fn width(&self) -> Option<f32> {
        self.w.filter(|w| *w >= 0.0)
    }

    pub(super) fn height(&self) -> Option<f32> {
        self.h.filter(|h| *h >= 0.0)
    }

    pub(super) fn has_size(&self) -> bool {
        self.width().is_some() || self.height().is_some()
    }
}

pub(super) fn emit(panel: &mut Panel, event: DockEvent, data: Option<serde_json::Value>) -> Option<serde_json::Value> {
    let mut args = EventArgs {
        event,
        panel: Some(panel.id),
        data,
    };
    panel.events.emit(&mut args);
    args.data
}
