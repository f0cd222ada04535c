use std::any::Any;
use std::fmt;

use super::panel::Panel;

/// Builds the content object of a new panel. Called once per panel instance.
///
/// The factory may configure the panel (title, sizes, buttons, event handlers) before it is placed.
pub type PanelFactory = Box<dyn Fn(&mut Panel, Option<&serde_json::Value>) -> Box<dyn Any>>;

/// A registered panel type.
pub struct PanelType {
    on_create: PanelFactory,
    pub(super) options: Option<serde_json::Value>,
    pub(super) is_private: bool,
    pub(super) limit: Option<usize>,
    pub(super) title: Option<String>,
    pub(super) icon: Option<String>,
}

impl fmt::Debug for PanelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelType")
            .field("options", &self.options)
            .field("is_private", &self.is_private)
            .field("limit", &self.limit)
            .field("title", &self.title)
            .field("icon", &self.icon)
            .finish_non_exhaustive()
    }
}

impl PanelType {
    pub fn new(
        on_create: impl Fn(&mut Panel, Option<&serde_json::Value>) -> Box<dyn Any> + 'static,
    ) -> Self {
        Self {
            on_create: Box::new(on_create),
            options: None,
            is_private: false,
            limit: None,
            title: None,
            icon: None,
        }
    }

    /// Opaque arguments handed to the factory.
    pub fn with_options(mut self, options: serde_json::Value) -> Self {
        self.options = Some(options);
        self
    }

    /// Hidden from [`super::Docker::panel_types`] unless private types are requested.
    pub fn private(mut self) -> Self {
        self.is_private = true;
        self
    }

    /// Maximum number of live panels of this type.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn is_private(&self) -> bool {
        self.is_private
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Apply type-level defaults to `panel` and run the factory.
    pub(super) fn create(&self, panel: &mut Panel) -> Box<dyn Any> {
        if let Some(title) = &self.title {
            panel.set_title(title.clone());
        }
        (self.on_create)(panel, self.options.as_ref())
    }
}

/// Panel types by name, in registration order.
#[derive(Debug, Default)]
pub(super) struct PanelRegistry {
    order: Vec<String>,
    types: ahash::HashMap<String, PanelType>,
}

impl PanelRegistry {
    /// `false` if the name is already taken; the existing type is kept.
    pub(super) fn register(&mut self, name: &str, panel_type: PanelType) -> bool {
        if self.types.contains_key(name) {
            return false;
        }
        self.order.push(name.to_owned());
        self.types.insert(name.to_owned(), panel_type);
        true
    }

    pub(super) fn get(&self, name: &str) -> Option<&PanelType> {
        self.types.get(name)
    }

    pub(super) fn names(&self, include_private: bool) -> Vec<&str> {
        self.order
            .iter()
            .filter(|name| {
                include_private || self.types.get(name.as_str()).is_some_and(|t| !t.is_private)
            })
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_type() -> PanelType {
        PanelType::new(|_panel, _options| Box::new(()))
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = PanelRegistry::default();
        assert!(registry.register("Log", unit_type().with_limit(1)));
        assert!(!registry.register("Log", unit_type()));
        assert_eq!(registry.get("Log").and_then(PanelType::limit), Some(1));
    }

    #[test]
    fn private_types_are_hidden_by_default() {
        let mut registry = PanelRegistry::default();
        registry.register("Log", unit_type());
        registry.register("Secret", unit_type().private());
        registry.register("Chart", unit_type());
        assert_eq!(registry.names(false), vec!["Log", "Chart"]);
        assert_eq!(registry.names(true), vec!["Log", "Secret", "Chart"]);
    }
}
