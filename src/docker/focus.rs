use super::Docker;
use super::events::DockEvent;
use super::types::NodeId;

impl Docker {
    /// Give `frame` the focus. Raises floating frames; a collapser losing focus closes its drawer.
    pub fn focus_frame(&mut self, frame: NodeId) {
        if self.frame(frame).is_some() {
            self.set_focus(Some(frame));
        }
    }

    pub(super) fn set_focus(&mut self, frame: Option<NodeId>) {
        if let Some(frame) = frame {
            self.raise_floating(frame);
        }
        let previous = self.focus;
        if previous == frame {
            return;
        }

        if let Some(previous) = previous {
            self.trigger_frame(previous, &DockEvent::LostFocus);
            if let Some(f) = self.frame_mut(previous) {
                if f.collapse() {
                    log::trace!("collapser {previous} closed on focus loss");
                }
            }
        }

        self.focus = frame;
        if let Some(frame) = frame {
            self.trigger_frame(frame, &DockEvent::GainFocus);
        }
        self.update();
    }

    /// Move a floating frame to the top of the z-order, below any modal frames.
    fn raise_floating(&mut self, frame: NodeId) {
        let Some(index) = self.floating.iter().position(|f| *f == frame) else {
            return;
        };
        self.floating.remove(index);
        self.floating.push(frame);
        let modals = &self.modals;
        // Stable: relative order within each group is kept.
        self.floating.sort_by_key(|f| modals.iter().position(|m| m == f));
        self.update();
    }
}

#[cfg(test)]
mod tests {
    use crate::docker::test_util::{docker_with_types, events_of};
    use crate::docker::{DockEvent, DockLocation, PanelOptions};

    #[test]
    fn focus_moves_between_frames_with_events() {
        let mut docker = docker_with_types(&["A", "B"]);
        let a = docker
            .add_panel("A", DockLocation::Left, None, PanelOptions::default())
            .unwrap();
        let b = docker
            .add_panel("B", DockLocation::Right, None, PanelOptions::default())
            .unwrap();
        let seen = events_of(&mut docker, &[a, b], &[DockEvent::GainFocus, DockEvent::LostFocus]);

        let frame_a = docker.panel_frame(a).unwrap();
        let frame_b = docker.panel_frame(b).unwrap();
        docker.focus_frame(frame_a);
        docker.focus_frame(frame_b);

        assert_eq!(docker.focused_frame(), Some(frame_b));
        assert_eq!(
            *seen.borrow(),
            vec![
                (a, DockEvent::GainFocus),
                (a, DockEvent::LostFocus),
                (b, DockEvent::GainFocus),
            ]
        );
    }

    #[test]
    fn focusing_floating_frame_raises_it_below_modals() {
        let mut docker = docker_with_types(&["A"]);
        let f1 = docker
            .add_panel("A", DockLocation::Float, None, PanelOptions::default())
            .unwrap();
        let modal = docker
            .add_panel("A", DockLocation::Modal, None, PanelOptions::default())
            .unwrap();
        let f2 = docker
            .add_panel("A", DockLocation::Float, None, PanelOptions::default())
            .unwrap();
        let frame = |docker: &crate::docker::Docker, p| docker.panel_frame(p).unwrap();

        docker.focus_frame(frame(&docker, f1));
        assert_eq!(
            docker.floating_frames(),
            &[frame(&docker, f2), frame(&docker, f1), frame(&docker, modal)]
        );
    }
}
