use super::types::{DockLocation, NodeId, PanelId};

/// Why a layout operation was refused. The tree is left untouched whenever one of these is returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DockError {
    UnknownPanelType(String),
    DuplicatePanelType(String),
    PanelLimitReached { type_name: String, limit: usize },
    PanelNotFound(PanelId),
    /// The panel is not inside a frame (mid-move).
    PanelDetached(PanelId),
    NotCloseable(PanelId),
    NodeNotFound(NodeId),
    InvalidCollapseLocation(DockLocation),
    CollapseDisabled,
    /// The placeholder is the only docked drop target left.
    LastPlaceholder,
}

impl std::fmt::Display for DockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownPanelType(name) => write!(f, "panel type {name:?} is not registered"),
            Self::DuplicatePanelType(name) => {
                write!(f, "panel type {name:?} is already registered")
            }
            Self::PanelLimitReached { type_name, limit } => {
                write!(f, "panel type {type_name:?} is limited to {limit} instance(s)")
            }
            Self::PanelNotFound(id) => write!(f, "panel {id} does not exist"),
            Self::PanelDetached(id) => write!(f, "panel {id} is not docked in a frame"),
            Self::NotCloseable(id) => write!(f, "panel {id} cannot be closed"),
            Self::NodeNotFound(id) => write!(f, "layout node {id} does not exist"),
            Self::InvalidCollapseLocation(loc) => {
                write!(f, "cannot collapse to {loc:?}; expected Left, Right or Bottom")
            }
            Self::CollapseDisabled => write!(f, "collapsers are disabled"),
            Self::LastPlaceholder => {
                write!(f, "the placeholder is the last docked target and cannot be removed")
            }
        }
    }
}

impl std::error::Error for DockError {}
