use std::hash::{Hash as _, Hasher as _};

use ahash::{HashMap, HashSet};

use super::Docker;
use super::types::{Node, NodeId, PanelHost, PanelId};

/// Every structural invariant violated by `docker`, one line each. Empty when healthy.
pub(super) fn tree_integrity_issues(docker: &Docker) -> Vec<String> {
    let mut issues: Vec<String> = Vec::new();

    for id in docker.frames.iter().chain(&docker.splitters) {
        if !docker.nodes.contains_key(id) {
            issues.push(format!("integrity: listed node {id} missing"));
        }
    }
    let listed = docker.frames.len() + docker.splitters.len();
    if listed != docker.nodes.len() {
        issues.push(format!(
            "integrity: {} nodes but {listed} listed",
            docker.nodes.len()
        ));
    }

    let visited = check_tree(docker, &mut issues);

    for id in &docker.frames {
        let Some(frame) = docker.frame(*id) else {
            continue;
        };
        let docked = !frame.floating;
        if docked && !visited.contains(id) {
            issues.push(format!("integrity: docked frame {id} unreachable from root"));
        }
        if frame.floating != docker.floating.contains(id) {
            issues.push(format!("integrity: frame {id} floating flag disagrees with floating list"));
        }
        if frame.floating && frame.parent.is_some() {
            issues.push(format!("integrity: floating frame {id} has a parent"));
        }
        if frame.modal != docker.modals.contains(id) {
            issues.push(format!("integrity: frame {id} modal flag disagrees with modal list"));
        }
        if frame.panels.is_empty() && !frame.is_collapser() {
            issues.push(format!("integrity: frame {id} is empty"));
        }
        match frame.cur_tab {
            Some(cur) if cur >= frame.panels.len() => {
                issues.push(format!(
                    "integrity: frame {id} cur_tab {cur} out of range ({} tabs)",
                    frame.panels.len()
                ));
            }
            None if !frame.panels.is_empty() && !frame.is_collapser() => {
                issues.push(format!("integrity: frame {id} has tabs but none selected"));
            }
            _ => {}
        }
    }
    for id in &docker.splitters {
        if !visited.contains(id) {
            issues.push(format!("integrity: splitter {id} unreachable from root"));
        }
    }

    check_panels(docker, &mut issues);

    if let Some(collapsers) = docker.collapsers {
        for (side, frame) in collapsers.iter() {
            if docker.frame(frame).and_then(|f| f.collapser_side()) != Some(side) {
                issues.push(format!("integrity: collapser {side:?} ({frame}) is not a {side:?} collapser"));
            }
        }
    }
    if let Some(placeholder) = docker.placeholder {
        if !docker.panels.get(&placeholder).is_some_and(|p| p.placeholder) {
            issues.push(format!("integrity: placeholder {placeholder} missing"));
        }
    }
    if let Some(focus) = docker.focus {
        if docker.frame(focus).is_none() {
            issues.push(format!("integrity: focused frame {focus} missing"));
        }
    }
    if docker.root.is_none() {
        issues.push("integrity: no docked layout".to_owned());
    }

    issues
}

/// Walk the docked tree from the root. Returns the reachable nodes.
fn check_tree(docker: &Docker, issues: &mut Vec<String>) -> HashSet<NodeId> {
    let mut visited: HashSet<NodeId> = HashSet::default();
    let Some(root) = docker.root else {
        return visited;
    };
    match docker.nodes.get(&root) {
        None => {
            issues.push(format!("integrity: root {root} missing"));
            return visited;
        }
        Some(node) if node.parent().is_some() => {
            issues.push(format!("integrity: root {root} has a parent"));
        }
        Some(_) => {}
    }

    let mut stack: Vec<NodeId> = vec![root];
    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            issues.push(format!("integrity: node {id} reachable twice"));
            continue;
        }
        let Some(Node::Splitter(splitter)) = docker.nodes.get(&id) else {
            continue;
        };
        for (slot, pane) in splitter.panes.iter().enumerate() {
            let Some(child) = *pane else {
                issues.push(format!("integrity: splitter {id} pane {slot} empty"));
                continue;
            };
            let Some(node) = docker.nodes.get(&child) else {
                issues.push(format!("integrity: splitter {id} references missing child {child}"));
                continue;
            };
            if node.parent() != Some(id) {
                issues.push(format!(
                    "integrity: child {child} of {id} has parent {:?}",
                    node.parent()
                ));
            }
            if node.as_frame().is_some_and(|f| f.floating) {
                issues.push(format!("integrity: floating frame {child} inside splitter {id}"));
            }
            stack.push(child);
        }
    }
    visited
}

fn check_panels(docker: &Docker, issues: &mut Vec<String>) {
    let mut owner: HashMap<PanelId, NodeId> = HashMap::default();
    for id in &docker.frames {
        let Some(frame) = docker.frame(*id) else {
            continue;
        };
        for panel in &frame.panels {
            if let Some(previous) = owner.insert(*panel, *id) {
                issues.push(format!("integrity: panel {panel} in frames {previous} and {id}"));
            }
            match docker.panels.get(panel) {
                None => issues.push(format!("integrity: frame {id} references missing panel {panel}")),
                Some(p) if p.host != PanelHost::Frame(*id) => {
                    issues.push(format!("integrity: panel {panel} in {id} has host {:?}", p.host));
                }
                Some(_) => {}
            }
        }
    }

    let mut orphans: Vec<PanelId> = docker
        .panels
        .keys()
        .filter(|p| !owner.contains_key(p))
        .copied()
        .collect();
    if !orphans.is_empty() && docker.gesture.is_idle() {
        orphans.sort();
        issues.push(format!("integrity: panels outside any frame: {orphans:?}"));
    }
}

pub(super) fn hash_issues(lines: &[String]) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    for line in lines {
        line.hash(&mut hasher);
    }
    hasher.finish()
}

impl Docker {
    /// Check every structural invariant. Empty when the layout is healthy.
    pub fn integrity_issues(&self) -> Vec<String> {
        tree_integrity_issues(self)
    }

    /// Bookkeeping after a structural operation: schedule a layout pass and, when
    /// `debug_integrity` is on, verify the tree.
    pub(super) fn structure_changed(&mut self, op: &str) {
        self.update();
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("{op}: {}", self.structure_signature());
        }
        if !self.options.debug_integrity {
            return;
        }

        let issues = tree_integrity_issues(self);
        let hash = hash_issues(&issues);
        if hash == self.last_integrity_hash {
            return;
        }
        self.last_integrity_hash = hash;
        if issues.is_empty() {
            log::debug!("integrity OK after {op}");
            return;
        }

        assert!(
            !self.options.debug_integrity_panic,
            "integrity FAIL after {op}:\n{}\n{}",
            issues.join("\n"),
            self.debug_summary()
        );
        log::error!("integrity FAIL after {op}: {} issue(s)", issues.len());
        for issue in &issues {
            log::error!("{issue}");
        }
    }
}
