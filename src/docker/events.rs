use std::fmt;

use super::types::PanelId;

/// Notifications delivered to panel and global subscribers.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DockEvent {
    Init,
    Updated,
    VisibilityChanged,
    BeginDock,
    EndDock,
    GainFocus,
    LostFocus,
    Closed,
    Button,
    Attached,
    Detached,
    MoveStarted,
    MoveEnded,
    Moved,
    ResizeStarted,
    ResizeEnded,
    Resized,
    Scrolled,
    SaveLayout,
    RestoreLayout,
    CustomTabChanged,
    CustomTabClosed,
    /// Application-defined event name.
    Custom(String),
}

impl DockEvent {
    /// Stable wire name, as used in persisted data and by `Custom` lookups.
    pub fn name(&self) -> &str {
        match self {
            Self::Init => "panelInit",
            Self::Updated => "panelUpdated",
            Self::VisibilityChanged => "panelVisibilityChanged",
            Self::BeginDock => "panelBeginDock",
            Self::EndDock => "panelEndDock",
            Self::GainFocus => "panelGainFocus",
            Self::LostFocus => "panelLostFocus",
            Self::Closed => "panelClosed",
            Self::Button => "panelButton",
            Self::Attached => "panelAttached",
            Self::Detached => "panelDetached",
            Self::MoveStarted => "panelMoveStarted",
            Self::MoveEnded => "panelMoveEnded",
            Self::Moved => "panelMoved",
            Self::ResizeStarted => "panelResizeStarted",
            Self::ResizeEnded => "panelResizeEnded",
            Self::Resized => "panelResized",
            Self::Scrolled => "panelScrolled",
            Self::SaveLayout => "layoutSave",
            Self::RestoreLayout => "layoutRestore",
            Self::CustomTabChanged => "customTabChanged",
            Self::CustomTabClosed => "customTabClosed",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for DockEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Passed to every handler. Handlers may replace `data` (used by [`DockEvent::SaveLayout`]).
#[derive(Clone, Debug, PartialEq)]
pub struct EventArgs {
    pub event: DockEvent,
    pub panel: Option<PanelId>,
    pub data: Option<serde_json::Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

pub type EventHandler = Box<dyn FnMut(&mut EventArgs)>;

/// Handlers in registration order.
#[derive(Default)]
pub(super) struct EventBus {
    next_id: u64,
    handlers: Vec<(HandlerId, DockEvent, EventHandler)>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl EventBus {
    pub(super) fn on(&mut self, event: DockEvent, handler: impl FnMut(&mut EventArgs) + 'static) -> HandlerId {
        self.next_id += 1;
        let id = HandlerId(self.next_id);
        self.handlers.push((id, event, Box::new(handler)));
        id
    }

    /// Remove one handler, or every handler for `event` when `id` is `None`. Returns how many were removed.
    pub(super) fn off(&mut self, event: &DockEvent, id: Option<HandlerId>) -> usize {
        let before = self.handlers.len();
        self.handlers
            .retain(|(hid, ev, _)| ev != event || id.is_some_and(|id| id != *hid));
        before - self.handlers.len()
    }

    pub(super) fn emit(&mut self, args: &mut EventArgs) -> usize {
        let mut called = 0;
        for (_id, event, handler) in &mut self.handlers {
            if *event == args.event {
                handler(args);
                called += 1;
            }
        }
        called
    }

    #[cfg(test)]
    pub(super) fn len(&self) -> usize {
        self.handlers.len()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn args(event: DockEvent) -> EventArgs {
        EventArgs {
            event,
            panel: None,
            data: None,
        }
    }

    #[test]
    fn emits_only_matching_handlers_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::default();
        for tag in ["a", "b"] {
            let seen = Rc::clone(&seen);
            bus.on(DockEvent::Closed, move |_| seen.borrow_mut().push(tag));
        }
        let other = Rc::clone(&seen);
        bus.on(DockEvent::Moved, move |_| other.borrow_mut().push("moved"));

        assert_eq!(bus.emit(&mut args(DockEvent::Closed)), 2);
        assert_eq!(*seen.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn off_removes_one_or_all() {
        let mut bus = EventBus::default();
        let first = bus.on(DockEvent::Init, |_| {});
        bus.on(DockEvent::Init, |_| {});
        bus.on(DockEvent::Custom("ping".to_owned()), |_| {});

        assert_eq!(bus.off(&DockEvent::Init, Some(first)), 1);
        assert_eq!(bus.off(&DockEvent::Init, None), 1);
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn handlers_can_fill_data() {
        let mut bus = EventBus::default();
        bus.on(DockEvent::SaveLayout, |args| {
            args.data = Some(serde_json::json!({ "scroll": 12 }));
        });
        let mut a = args(DockEvent::SaveLayout);
        bus.emit(&mut a);
        assert_eq!(a.data, Some(serde_json::json!({ "scroll": 12 })));
    }

    #[test]
    fn custom_event_name_round_trips() {
        assert_eq!(DockEvent::Custom("refresh".to_owned()).name(), "refresh");
        assert_eq!(DockEvent::Closed.to_string(), "panelClosed");
    }
}
