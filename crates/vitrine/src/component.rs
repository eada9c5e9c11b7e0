//! Component base: a bound element map plus an event emitter

use vitrine_dom::{Document, NodeId};

use crate::binder::{ElementBinder, ElementMap, ResolvedElements};
use crate::emitter::Emitter;

/// Shared base of the preloader and other bound widgets.
///
/// Binding happens at construction and again on every [`Component::bind`].
pub struct Component<E> {
    binder: ElementBinder,
    element: Option<NodeId>,
    elements: ResolvedElements,
    events: Emitter<E>,
}

impl<E> Component<E> {
    pub fn new(doc: &Document, root_selector: &str, selectors: ElementMap) -> Self {
        let mut component = Self {
            binder: ElementBinder::new(root_selector, selectors),
            element: None,
            elements: ResolvedElements::default(),
            events: Emitter::new(),
        };
        component.bind(doc);
        component
    }

    /// Re-resolve the root and element map
    pub fn bind(&mut self, doc: &Document) {
        let binding = self.binder.bind(doc);
        if binding.root.is_none() {
            tracing::debug!(selector = self.binder.root_selector(), "component root not found");
        }
        self.element = binding.root;
        self.elements = binding.elements;
    }

    pub fn element(&self) -> Option<NodeId> {
        self.element
    }

    pub fn elements(&self) -> &ResolvedElements {
        &self.elements
    }

    pub fn events(&self) -> &Emitter<E> {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebind_follows_document() {
        let mut doc = vitrine_html::parse(r#"<div class="box"><b class="label">x</b></div>"#);
        let mut component: Component<()> = Component::new(&doc, ".box", ElementMap::new().with("label", ".label"));
        assert!(component.element().is_some());
        assert!(component.elements().single("label").is_some());

        let root = component.element().unwrap();
        doc.remove(root);
        component.bind(&doc);
        assert!(component.element().is_none());
        assert!(component.elements().get("label").is_none());
    }
}
