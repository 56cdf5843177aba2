use crate::{View, ViewError, ViewOutput};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of dashboard views.
///
/// The registry is responsible for:
/// - Registering views in tab order
/// - Tracking the default tab
/// - Looking up and rendering views by name
/// - Describing the views to the presentation layer
#[derive(Default)]
pub struct ViewRegistry {
    views: HashMap<String, Arc<dyn View>>,
    order: Vec<String>,
    default_view: Option<String>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view as the next tab.
    /// Returns false if a view with the same name is already registered.
    pub fn register(&mut self, view: Arc<dyn View>) -> bool {
        let name = view.name().to_string();
        if self.views.contains_key(&name) {
            return false;
        }

        self.order.push(name.clone());
        self.views.insert(name, view);
        true
    }

    /// Select the tab shown first. Returns false for an unknown name.
    pub fn set_default(&mut self, name: &str) -> bool {
        if !self.views.contains_key(name) {
            return false;
        }
        self.default_view = Some(name.to_string());
        true
    }

    /// The default tab, or the first registered one.
    pub fn default_view(&self) -> Option<&Arc<dyn View>> {
        self.default_view
            .as_deref()
            .or_else(|| self.order.first().map(String::as_str))
            .and_then(|name| self.views.get(name))
    }

    /// Get a view by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn View>> {
        self.views.get(name)
    }

    /// All views in tab order.
    pub fn all(&self) -> Vec<&Arc<dyn View>> {
        self.order
            .iter()
            .filter_map(|name| self.views.get(name))
            .collect()
    }

    /// Render a view by name.
    pub fn render(&self, name: &str, params: Value) -> Result<ViewOutput, ViewError> {
        let view = self
            .get(name)
            .ok_or_else(|| ViewError::Other(format!("Unknown view: {}", name)))?;

        view.render(params)
    }

    /// View descriptions in tab order, for building the tab bar and selectors.
    pub fn view_specs(&self) -> Vec<Value> {
        let default = self.default_view().map(|v| v.name().to_string());
        self.all()
            .into_iter()
            .map(|view| {
                serde_json::json!({
                    "name": view.name(),
                    "title": view.title(),
                    "description": view.description(),
                    "parameters": view.parameter_schema(),
                    "default": default.as_deref() == Some(view.name()),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestView(&'static str);

    impl View for TestView {
        fn name(&self) -> &str {
            self.0
        }

        fn title(&self) -> &str {
            "Test"
        }

        fn description(&self) -> &str {
            "A test view"
        }

        fn parameter_schema(&self) -> Value {
            serde_json::json!({})
        }

        fn render(&self, _params: Value) -> crate::Result<ViewOutput> {
            Ok(ViewOutput::new(format!("{} output", self.0)))
        }
    }

    #[test]
    fn test_registry_keeps_tab_order() {
        let mut registry = ViewRegistry::new();
        assert!(registry.register(Arc::new(TestView("b"))));
        assert!(registry.register(Arc::new(TestView("a"))));

        let names: Vec<&str> = registry.all().into_iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let mut registry = ViewRegistry::new();
        assert!(registry.register(Arc::new(TestView("a"))));
        assert!(!registry.register(Arc::new(TestView("a"))));
        assert_eq!(registry.all().len(), 1);
    }

    #[test]
    fn test_default_view() {
        let mut registry = ViewRegistry::new();
        assert!(registry.default_view().is_none());

        registry.register(Arc::new(TestView("a")));
        registry.register(Arc::new(TestView("b")));
        assert_eq!(registry.default_view().map(|v| v.name()), Some("a"));

        assert!(registry.set_default("b"));
        assert!(!registry.set_default("missing"));
        assert_eq!(registry.default_view().map(|v| v.name()), Some("b"));

        let specs = registry.view_specs();
        assert_eq!(specs[1]["default"], true);
        assert_eq!(specs[0]["default"], false);
    }

    #[test]
    fn test_render_by_name() {
        let mut registry = ViewRegistry::new();
        registry.register(Arc::new(TestView("a")));

        let output = registry.render("a", Value::Null).unwrap();
        assert_eq!(output.content, "a output");
        assert!(matches!(
            registry.render("missing", Value::Null),
            Err(ViewError::Other(_))
        ));
    }
}
