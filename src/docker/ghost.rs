use egui::{Pos2, Rect, Vec2};

use super::anchor::Anchor;

/// Drop preview of a drag-to-dock gesture.
///
/// Follows the pointer as a floating-size rect until an anchor is found, then shows the anchor's
/// preview rect instead.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ghost {
    float_size: Vec2,
    /// Pointer position relative to the top-left of the floating rect.
    grab_offset: Vec2,
    pointer: Pos2,
    anchor: Option<Anchor>,
}

impl Ghost {
    pub(super) fn new(pointer: Pos2, float_size: Vec2, grab_offset: Vec2) -> Self {
        Self {
            float_size,
            grab_offset: grab_offset.clamp(Vec2::ZERO, float_size),
            pointer,
            anchor: None,
        }
    }

    /// Ghost for dragging out of `source`, grabbed at `pointer`.
    pub(super) fn from_source(pointer: Pos2, source: Rect, float_size: Vec2) -> Self {
        let grab = if source.contains(pointer) {
            pointer - source.min
        } else {
            Vec2::new(float_size.x * 0.5, 10.0)
        };
        Self::new(pointer, float_size, grab)
    }

    pub(super) fn update(&mut self, pointer: Pos2, anchor: Option<Anchor>) {
        self.pointer = pointer;
        self.anchor = anchor;
    }

    /// The rect to draw.
    pub fn rect(&self) -> Rect {
        self.anchor.map_or_else(|| self.float_rect(), |a| a.preview)
    }

    /// Where the content lands if released without an anchor.
    pub fn float_rect(&self) -> Rect {
        Rect::from_min_size(self.pointer - self.grab_offset, self.float_size)
    }

    pub fn anchor(&self) -> Option<&Anchor> {
        self.anchor.as_ref()
    }

    pub fn pointer(&self) -> Pos2 {
        self.pointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docker::{DockLocation, DockTarget};

    #[test]
    fn follows_pointer_until_anchored() {
        let source = Rect::from_min_size(Pos2::new(100.0, 100.0), Vec2::new(200.0, 100.0));
        let mut ghost = Ghost::from_source(Pos2::new(150.0, 110.0), source, Vec2::new(300.0, 200.0));
        assert_eq!(ghost.rect().min, Pos2::new(100.0, 100.0));

        ghost.update(Pos2::new(450.0, 310.0), None);
        assert_eq!(ghost.float_rect().min, Pos2::new(400.0, 300.0));

        let preview = Rect::from_min_size(Pos2::ZERO, Vec2::splat(10.0));
        let frame = crate::docker::NodeId(1);
        ghost.update(
            Pos2::new(5.0, 5.0),
            Some(Anchor {
                location: DockLocation::Left,
                target: DockTarget::Node(frame),
                frame,
                is_self: false,
                preview,
                tab_index: None,
            }),
        );
        assert_eq!(ghost.rect(), preview);
    }
}
