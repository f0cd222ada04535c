use itertools::Itertools as _;

use super::Docker;
use super::types::{Node, NodeId};

/// One line per reachable node, depth-first from the root, then the floating frames.
fn debug_tree_summary(docker: &Docker, max_nodes: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut stack: Vec<(NodeId, usize)> = docker.root.map(|r| (r, 0)).into_iter().collect();

    while let Some((id, depth)) = stack.pop() {
        if lines.len() >= max_nodes {
            lines.push("...".to_owned());
            break;
        }
        let indent = "  ".repeat(depth);
        match docker.nodes.get(&id) {
            None => lines.push(format!("{indent}{id} MISSING")),
            Some(Node::Splitter(s)) => {
                lines.push(format!(
                    "{indent}{id} Splitter({}) pos={:.3} rect={:?}",
                    if s.horizontal { "h" } else { "v" },
                    s.ratio,
                    s.rect
                ));
                stack.extend(s.panes.iter().rev().flatten().map(|p| (*p, depth + 1)));
            }
            Some(Node::Frame(_)) => lines.push(format!("{indent}{}", frame_line(docker, id))),
        }
    }
    for id in &docker.floating {
        lines.push(format!("floating {}", frame_line(docker, *id)));
    }

    format!(
        "root={:?} nodes={} panels={} focus={:?}\n{}",
        docker.root,
        docker.nodes.len(),
        docker.panels.len(),
        docker.focus,
        lines.join("\n")
    )
}

fn frame_line(docker: &Docker, id: NodeId) -> String {
    let Some(f) = docker.frame(id) else {
        return format!("{id} MISSING");
    };
    let kind = match f.collapser_side() {
        Some(side) => format!("Collapser({side:?})"),
        None if f.modal => "Modal".to_owned(),
        None => "Frame".to_owned(),
    };
    let panels = f
        .panels
        .iter()
        .map(|p| match docker.panels.get(p) {
            Some(panel) => format!("{p}:{}", panel.type_name),
            None => format!("{p}:MISSING"),
        })
        .join(", ");
    format!("{id} {kind} cur={:?} [{panels}]", f.cur_tab)
}

impl Docker {
    /// Human-readable dump of the layout, for logs and failing tests.
    pub fn debug_summary(&self) -> String {
        debug_tree_summary(self, 256)
    }

    /// Shape of the layout without ids or pixel geometry: node kinds, split directions and ratios,
    /// panel types, selected tabs. Two layouts with the same signature look the same.
    pub fn structure_signature(&self) -> String {
        let mut out = String::new();
        match self.root {
            Some(root) => self.write_signature(root, &mut out),
            None => out.push('-'),
        }
        for id in &self.floating {
            out.push_str(" +");
            self.write_signature(*id, &mut out);
        }
        out
    }

    fn write_signature(&self, node: NodeId, out: &mut String) {
        match self.nodes.get(&node) {
            None => out.push('?'),
            Some(Node::Splitter(s)) => {
                out.push_str(&format!("{}{:.2}(", if s.horizontal { 'H' } else { 'V' }, s.ratio));
                for (i, pane) in s.panes.iter().enumerate() {
                    if i > 0 {
                        out.push('|');
                    }
                    match pane {
                        Some(pane) => self.write_signature(*pane, out),
                        None => out.push('-'),
                    }
                }
                out.push(')');
            }
            Some(Node::Frame(f)) => {
                match f.collapser_side() {
                    Some(side) => out.push_str(&format!("C{side:?}")),
                    None if f.modal => out.push('M'),
                    None => out.push('F'),
                }
                let types = f
                    .panels
                    .iter()
                    .filter_map(|p| self.panels.get(p))
                    .map(|p| p.type_name.as_str())
                    .join(",");
                out.push_str(&format!("[{types}]"));
                if let Some(cur) = f.cur_tab {
                    out.push_str(&format!("@{cur}"));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::docker::test_util::docker_with_types;
    use crate::docker::{DockLocation, PanelOptions};

    #[test]
    fn signature_ignores_ids() {
        let mut a = docker_with_types(&["Log", "Chart"]);
        let mut b = docker_with_types(&["Log", "Chart"]);
        // Burn some ids in `b` so the two trees differ only in numbering.
        let tmp = b.add_panel("Log", DockLocation::Float, None, PanelOptions::default()).unwrap();
        b.remove_panel(tmp).unwrap();

        for docker in [&mut a, &mut b] {
            docker.add_panel("Log", DockLocation::Left, None, PanelOptions::default()).unwrap();
            docker.add_panel("Chart", DockLocation::Bottom, None, PanelOptions::default()).unwrap();
        }
        assert_eq!(a.structure_signature(), b.structure_signature());
        assert_eq!(a.structure_signature(), "V0.50(F[Log]@0|F[Chart]@0)");
        assert!(a.debug_summary().contains("Splitter(v)"));
    }
}
