//! Deferred layout: structural changes only mark the layout dirty, and the host's periodic
//! [`Docker::tick`] recomputes geometry at most once per `response_rate_ms`.

use egui::Rect;

use super::Docker;
use super::events::DockEvent;

/// Dirty flag plus the time of the last flush.
#[derive(Clone, Copy, Debug, Default)]
pub(super) struct UpdateScheduler {
    dirty: bool,
    last_flush_ms: Option<u64>,
    passes: u64,
}

impl UpdateScheduler {
    fn is_due(&self, now_ms: u64, rate_ms: u64) -> bool {
        self.dirty
            && self
                .last_flush_ms
                .is_none_or(|last| now_ms.saturating_sub(last) >= rate_ms)
    }
}

/// State of a burst of container resizes.
#[derive(Clone, Copy, Debug, Default)]
pub(super) struct ResizeDebounce {
    active: bool,
    last_event_ms: u64,
}

impl ResizeDebounce {
    /// Record a resize event. Returns `true` for the first event of a burst.
    fn record(&mut self, now_ms: u64) -> bool {
        let started = !self.active;
        self.active = true;
        self.last_event_ms = now_ms;
        started
    }

    /// Returns `true` once, when the burst has been quiet for `quiet_ms`.
    fn settle(&mut self, now_ms: u64, quiet_ms: u64) -> bool {
        if self.active && now_ms.saturating_sub(self.last_event_ms) >= quiet_ms {
            self.active = false;
            return true;
        }
        false
    }
}

impl Docker {
    /// Mark the layout dirty. Geometry is recomputed on the next due [`Self::tick`].
    pub fn update(&mut self) {
        self.scheduler.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.scheduler.dirty
    }

    /// Drive deferred work. Call periodically with a monotonic clock.
    ///
    /// Ends a resize burst that has been quiet long enough, then flushes the layout if it is dirty and
    /// `response_rate_ms` has passed since the last flush. Returns whether a layout pass ran.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if self.resize.settle(now_ms, self.options.resize_debounce_ms) {
            log::trace!("container resize ended");
            self.trigger(DockEvent::ResizeEnded, None);
            self.update();
        }

        if !self.scheduler.is_due(now_ms, self.options.response_rate_ms) {
            return false;
        }
        self.scheduler.last_flush_ms = Some(now_ms);
        self.force_update();
        true
    }

    /// Recompute geometry now, regardless of the response rate.
    pub fn force_update(&mut self) {
        self.scheduler.dirty = false;
        self.scheduler.passes += 1;
        self.flush_layout();
    }

    /// Number of layout passes run so far.
    pub fn layout_pass_count(&self) -> u64 {
        self.scheduler.passes
    }

    /// The host surface changed size. Emits `ResizeStarted` on the first call of a burst and
    /// `Resized` on every call; `ResizeEnded` follows from [`Self::tick`] after `resize_debounce_ms`.
    pub fn resize_container(&mut self, rect: Rect, now_ms: u64) {
        self.container = rect;
        if self.resize.record(now_ms) {
            log::trace!("container resize started");
            self.trigger(DockEvent::ResizeStarted, None);
        }
        self.trigger(DockEvent::Resized, None);
        self.update();
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.active
    }

    /// `true` while a resize burst is in progress and `hide_on_resize` is set: the host should skip
    /// drawing panel content.
    pub fn is_content_hidden(&self) -> bool {
        self.options.hide_on_resize && self.resize.active
    }
}
