//! Element binding
//!
//! Components describe the elements they need as a map from names to
//! selectors. Binding resolves that map against the live document, scoped
//! to the component's root element.

use std::collections::BTreeMap;

use vitrine_dom::{Document, NodeId};

/// How a named element is located
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementSelector {
    /// CSS selector, queried under the component root
    Raw(String),
    /// Already-resolved element
    Single(NodeId),
    /// Already-resolved element collection
    Many(Vec<NodeId>),
}

impl From<&str> for ElementSelector {
    fn from(selector: &str) -> Self {
        Self::Raw(selector.to_string())
    }
}

impl From<String> for ElementSelector {
    fn from(selector: String) -> Self {
        Self::Raw(selector)
    }
}

impl From<NodeId> for ElementSelector {
    fn from(node: NodeId) -> Self {
        Self::Single(node)
    }
}

impl From<Vec<NodeId>> for ElementSelector {
    fn from(nodes: Vec<NodeId>) -> Self {
        Self::Many(nodes)
    }
}

/// Ordered name to selector map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementMap {
    entries: Vec<(String, ElementSelector)>,
}

impl ElementMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a named entry
    pub fn with(mut self, name: &str, selector: impl Into<ElementSelector>) -> Self {
        let selector = selector.into();
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = selector,
            None => self.entries.push((name.to_string(), selector)),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ElementSelector)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s))
    }
}

/// A resolved entry. Unmatched entries are absent from [`ResolvedElements`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Single(NodeId),
    Many(Vec<NodeId>),
}

impl Resolved {
    /// Normalize a query result: one match is `Single`, several are `Many`
    pub fn from_matches(mut matches: Vec<NodeId>) -> Option<Self> {
        match matches.len() {
            0 => None,
            1 => matches.pop().map(Self::Single),
            _ => Some(Self::Many(matches)),
        }
    }

    pub fn nodes(&self) -> &[NodeId] {
        match self {
            Self::Single(node) => std::slice::from_ref(node),
            Self::Many(nodes) => nodes,
        }
    }
}

/// Name to resolved element map, rebuilt on every bind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedElements {
    entries: BTreeMap<String, Option<Resolved>>,
}

impl ResolvedElements {
    /// Resolution of `name`; `None` when unmatched or never declared
    pub fn get(&self, name: &str) -> Option<&Resolved> {
        self.entries.get(name).and_then(Option::as_ref)
    }

    /// The element for `name` when it resolved to exactly one node
    pub fn single(&self, name: &str) -> Option<NodeId> {
        match self.get(name) {
            Some(Resolved::Single(node)) => Some(*node),
            _ => None,
        }
    }

    /// Every node resolved for `name` (empty when unmatched)
    pub fn all(&self, name: &str) -> Vec<NodeId> {
        self.get(name).map(|r| r.nodes().to_vec()).unwrap_or_default()
    }

    /// Whether `name` was part of the bound map, matched or not
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of [`ElementBinder::bind`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binding {
    pub root: Option<NodeId>,
    pub elements: ResolvedElements,
}

/// Resolves a component's root and element map against a document
#[derive(Debug, Clone)]
pub struct ElementBinder {
    root_selector: String,
    selectors: ElementMap,
}

impl ElementBinder {
    pub fn new(root_selector: &str, selectors: ElementMap) -> Self {
        Self {
            root_selector: root_selector.to_string(),
            selectors,
        }
    }

    pub fn root_selector(&self) -> &str {
        &self.root_selector
    }

    pub fn selectors(&self) -> &ElementMap {
        &self.selectors
    }

    /// Resolve the root (first document-wide match) and every named entry.
    ///
    /// Raw selectors only search inside the root, so nothing matches when
    /// the root is absent. Pre-resolved entries pass through unchanged.
    pub fn bind(&self, doc: &Document) -> Binding {
        let root = doc.query_selector(doc.root(), &self.root_selector);

        let entries = self.selectors.iter()
            .map(|(name, selector)| {
                let resolved = match selector {
                    ElementSelector::Single(node) => Some(Resolved::Single(*node)),
                    ElementSelector::Many(nodes) => Some(Resolved::Many(nodes.clone())),
                    ElementSelector::Raw(selector) => root.and_then(|root| {
                        Resolved::from_matches(doc.query_selector_all(root, selector))
                    }),
                };
                (name.to_string(), resolved)
            })
            .collect();

        tracing::trace!(root = %self.root_selector, found = root.is_some(), "bound elements");

        Binding {
            root,
            elements: ResolvedElements { entries },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> Document {
        vitrine_html::parse(
            r#"<div class="home">
                <h1 class="title">Shop</h1>
                <span class="tag">a</span><span class="tag">b</span>
            </div>
            <p class="outside">x</p>"#,
        )
    }

    #[test]
    fn test_zero_one_many() {
        let doc = document();
        let binder = ElementBinder::new(
            ".home",
            ElementMap::new()
                .with("title", ".title")
                .with("tags", ".tag")
                .with("missing", ".nothing"),
        );
        let binding = binder.bind(&doc);

        assert!(binding.root.is_some());
        assert!(matches!(binding.elements.get("title"), Some(Resolved::Single(_))));
        assert_eq!(binding.elements.all("tags").len(), 2);
        assert!(binding.elements.get("missing").is_none());
        assert!(binding.elements.contains("missing"));
    }

    #[test]
    fn test_queries_are_scoped_to_root() {
        let doc = document();
        let binding = ElementBinder::new(".home", ElementMap::new().with("outside", ".outside")).bind(&doc);
        assert!(binding.elements.get("outside").is_none());
    }

    #[test]
    fn test_missing_root() {
        let doc = document();
        let binding = ElementBinder::new(".about", ElementMap::new().with("title", ".title")).bind(&doc);
        assert_eq!(binding.root, None);
        assert!(binding.elements.get("title").is_none());
    }

    #[test]
    fn test_pre_resolved_pass_through() {
        let doc = document();
        let outside = doc.query_selector(doc.root(), ".outside").unwrap();
        let binding = ElementBinder::new(
            ".about",
            ElementMap::new().with("outside", outside).with("none", Vec::new()),
        )
        .bind(&doc);

        assert_eq!(binding.elements.single("outside"), Some(outside));
        assert_eq!(binding.elements.get("none"), Some(&Resolved::Many(Vec::new())));
    }

    #[test]
    fn test_map_replaces_duplicate_names() {
        let map = ElementMap::new().with("a", ".x").with("a", ".y");
        assert_eq!(map.len(), 1);
        assert_eq!(map.iter().next(), Some(("a", &ElementSelector::Raw(".y".into()))));
    }
}
