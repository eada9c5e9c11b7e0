//! Document - High-level document API

use std::collections::HashMap;

use crate::{DomTree, EventType, Listener, NodeData, NodeId, SelectorList};

struct Registration {
    event_type: EventType,
    listener: Listener,
    /// `on<event>` handler slot (replaced rather than stacked)
    slot: bool,
}

/// HTML Document
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
    listeners: HashMap<NodeId, Vec<Registration>>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("url", &self.url)
            .field("nodes", &self.tree.len())
            .field("listening_nodes", &self.listeners.len())
            .finish()
    }
}

impl Document {
    /// Create a document with an empty html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut doc = Self::empty(url);
        let tree = &mut doc.tree;
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");
        tree.append_child(tree.root(), html);
        tree.append_child(html, head);
        tree.append_child(html, body);
        doc.finalize();
        doc
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            listeners: HashMap::new(),
        }
    }

    /// Locate html/head/body after the tree was built externally
    pub fn finalize(&mut self) {
        let tree = &self.tree;
        let find = |parent: NodeId, tag: &str| {
            tree.children(parent)
                .find(|(id, _)| tree.tag_name(*id) == Some(tag))
                .map(|(id, _)| id)
                .unwrap_or(NodeId::NONE)
        };
        let html = find(tree.root(), "html");
        let (head, body) = if html.is_valid() {
            (find(html, "head"), find(html, "body"))
        } else {
            (NodeId::NONE, NodeId::NONE)
        };
        self.html_element = html;
        self.head_element = head;
        self.body_element = body;
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url(&mut self, url: &str) {
        self.url = url.to_string();
    }

    /// Document title from `<head><title>`
    pub fn title(&self) -> String {
        self.head_element.to_option()
            .and_then(|head| self.query_selector(head, "title"))
            .map(|title| self.tree.text_content(title).trim().to_string())
            .unwrap_or_default()
    }

    pub fn document_element(&self) -> Option<NodeId> {
        self.html_element.to_option()
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head_element.to_option()
    }

    pub fn body(&self) -> Option<NodeId> {
        self.body_element.to_option()
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    // === Queries ===

    /// First descendant of `scope` matching `selector`
    pub fn query_selector(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
        self.query_selector_all(scope, selector).into_iter().next()
    }

    /// All descendants of `scope` matching `selector`, in document order.
    ///
    /// An unsupported selector matches nothing.
    pub fn query_selector_all(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        let Some(list) = SelectorList::parse(selector) else {
            tracing::debug!(selector, "unsupported selector");
            return Vec::new();
        };
        self.tree.descendants(scope)
            .into_iter()
            .filter(|&id| list.matches(&self.tree, id))
            .collect()
    }

    /// Whether `node` matches `selector`
    pub fn matches(&self, node: NodeId, selector: &str) -> bool {
        SelectorList::parse(selector).is_some_and(|list| list.matches(&self.tree, node))
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.descendants(self.root()).into_iter().find(|&node| {
            self.tree.get(node)
                .and_then(|n| n.as_element())
                .is_some_and(|e| e.id.as_deref() == Some(id))
        })
    }

    // === Attributes and content ===

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.tree.tag_name(node)
    }

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        let name = self.tree.interner().lookup(&name.to_ascii_lowercase())?;
        self.tree.get(node)?.as_element()?.get_attr(name)
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.get_attribute(node, name).is_some()
    }

    /// Set an attribute; ignored for non-element nodes
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let name = self.tree.interner_mut().intern(&name.to_ascii_lowercase());
        if let Some(elem) = self.tree.get_mut(node).and_then(|n| n.as_element_mut()) {
            elem.set_attr(name, value.to_string());
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Option<String> {
        let name = self.tree.interner().lookup(&name.to_ascii_lowercase())?;
        self.tree.get_mut(node)?.as_element_mut()?.remove_attr(name)
    }

    pub fn text_content(&self, node: NodeId) -> String {
        self.tree.text_content(node)
    }

    /// Replace all children with a single text node
    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        self.clear_children(node);
        if !text.is_empty() {
            let child = self.tree.create_text(text);
            self.tree.append_child(node, child);
        }
    }

    /// Element children of a node
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree.children(node)
            .filter(|(_, n)| n.is_element())
            .map(|(id, _)| id)
            .collect()
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.tree.append_child(parent, child);
    }

    // === Removal and import ===

    /// Remove a node and its subtree. Listeners are dropped and the slots
    /// reclaimed, so ids into the removed subtree must not be used again.
    pub fn remove(&mut self, node: NodeId) {
        if node == self.tree.root() {
            return;
        }
        self.forget_listeners(node);
        for descendant in self.tree.descendants(node) {
            self.forget_listeners(descendant);
        }
        self.tree.reclaim(node);
    }

    /// Remove every child of `node`
    pub fn clear_children(&mut self, node: NodeId) {
        let children: Vec<NodeId> = self.tree.children(node).map(|(id, _)| id).collect();
        for child in children {
            self.remove(child);
        }
    }

    /// Deep-copy the children of `source` (in another document) under `target`.
    ///
    /// Names are re-interned into this document's tree. Returns the copied
    /// top-level nodes.
    pub fn import_children(&mut self, target: NodeId, other: &Document, source: NodeId) -> Vec<NodeId> {
        let sources: Vec<NodeId> = other.tree.children(source).map(|(id, _)| id).collect();
        sources.into_iter()
            .filter_map(|child| {
                let copy = self.import_node(other, child)?;
                self.tree.append_child(target, copy);
                Some(copy)
            })
            .collect()
    }

    fn import_node(&mut self, other: &Document, source: NodeId) -> Option<NodeId> {
        let node = other.tree.get(source)?;
        let copy = match &node.data {
            NodeData::Element(elem) => {
                let id = self.tree.create_element(other.tree.resolve(elem.name));
                for attr in &elem.attrs {
                    let name = other.tree.resolve(attr.name);
                    self.set_attribute(id, name, &attr.value);
                }
                id
            }
            NodeData::Text(text) => self.tree.create_text(&text.content),
            NodeData::Comment(text) => self.tree.create_comment(text),
            NodeData::Doctype { name } => self.tree.create_doctype(name),
            NodeData::Document => return None,
        };

        let children: Vec<NodeId> = other.tree.children(source).map(|(id, _)| id).collect();
        for child in children {
            if let Some(child_copy) = self.import_node(other, child) {
                self.tree.append_child(copy, child_copy);
            }
        }
        Some(copy)
    }

    // === Events ===

    /// Add a listener (stacks with existing ones)
    pub fn add_event_listener(&mut self, node: NodeId, event_type: EventType, listener: Listener) {
        self.listeners.entry(node).or_default().push(Registration {
            event_type,
            listener,
            slot: false,
        });
    }

    /// Assign the `on<event>` handler slot, replacing any previous handler
    pub fn set_event_handler(&mut self, node: NodeId, event_type: EventType, listener: Listener) {
        let registrations = self.listeners.entry(node).or_default();
        registrations.retain(|r| !(r.slot && r.event_type == event_type));
        registrations.push(Registration {
            event_type,
            listener,
            slot: true,
        });
    }

    /// Drop every listener registered on `node`
    pub fn remove_event_listeners(&mut self, node: NodeId) {
        self.forget_listeners(node);
    }

    pub fn listener_count(&self, node: NodeId, event_type: EventType) -> usize {
        self.listeners.get(&node)
            .map(|regs| regs.iter().filter(|r| r.event_type == event_type).count())
            .unwrap_or(0)
    }

    fn forget_listeners(&mut self, node: NodeId) {
        self.listeners.remove(&node);
    }

    /// Listeners to run for an event on `target`: the target first, then
    /// ancestors when the event type bubbles.
    pub fn event_path(&self, event_type: EventType, target: NodeId) -> Vec<(NodeId, Listener)> {
        let mut nodes = vec![target];
        if event_type.bubbles() {
            nodes.extend(self.tree.ancestors(target));
        }

        nodes.into_iter()
            .flat_map(|node| {
                self.listeners.get(&node)
                    .into_iter()
                    .flatten()
                    .filter(move |r| r.event_type == event_type)
                    .map(move |r| (node, r.listener.clone()))
            })
            .collect()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn element(doc: &mut Document, parent: NodeId, tag: &str, class: &str) -> NodeId {
        let id = doc.tree_mut().create_element(tag);
        if !class.is_empty() {
            doc.set_attribute(id, "class", class);
        }
        doc.append_child(parent, id);
        id
    }

    #[test]
    fn test_skeleton() {
        let doc = Document::new("https://shop.test/");
        assert!(doc.document_element().is_some());
        assert!(doc.head().is_some());
        assert!(doc.body().is_some());
        assert_eq!(doc.title(), "");
    }

    #[test]
    fn test_query_order_and_scope() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let home = element(&mut doc, body, "div", "home");
        let first = element(&mut doc, home, "a", "home__link");
        let outside = element(&mut doc, body, "a", "home__link");

        assert_eq!(doc.query_selector_all(home, ".home__link"), vec![first]);
        assert_eq!(doc.query_selector_all(doc.root(), "a"), vec![first, outside]);
        assert_eq!(doc.query_selector(home, ".missing"), None);
    }

    #[test]
    fn test_attributes() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let content = element(&mut doc, body, "div", "content");
        doc.set_attribute(content, "data-template", "home");
        assert_eq!(doc.get_attribute(content, "data-template"), Some("home"));

        doc.set_attribute(content, "data-template", "about");
        assert_eq!(doc.get_attribute(content, "DATA-TEMPLATE"), Some("about"));
        assert!(doc.matches(content, "[data-template=about]"));
    }

    #[test]
    fn test_remove_drops_subtree_listeners() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let wrapper = element(&mut doc, body, "div", "");
        let link = element(&mut doc, wrapper, "a", "");
        doc.add_event_listener(link, EventType::Click, Rc::new(|_| {}));
        assert_eq!(doc.listener_count(link, EventType::Click), 1);

        doc.clear_children(body);
        assert_eq!(doc.listener_count(link, EventType::Click), 0);
        assert!(!doc.tree().is_connected(link));
    }

    #[test]
    fn test_handler_slot_replaces() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let link = element(&mut doc, body, "a", "");
        let hits = Rc::new(Cell::new(0));

        for _ in 0..3 {
            let hits = hits.clone();
            doc.set_event_handler(link, EventType::Click, Rc::new(move |_| hits.set(hits.get() + 1)));
        }
        doc.add_event_listener(link, EventType::Click, Rc::new(|_| {}));
        assert_eq!(doc.listener_count(link, EventType::Click), 2);

        let path = doc.event_path(EventType::Click, link);
        crate::dispatch(path, &mut crate::DomEvent::click(link));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_event_path_bubbles_click_only() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let link = element(&mut doc, body, "a", "");
        let span = element(&mut doc, link, "span", "");
        doc.add_event_listener(link, EventType::Click, Rc::new(|_| {}));
        doc.add_event_listener(link, EventType::Load, Rc::new(|_| {}));

        assert_eq!(doc.event_path(EventType::Click, span).len(), 1);
        assert!(doc.event_path(EventType::Load, span).is_empty());
    }

    #[test]
    fn test_import_children() {
        let mut source = Document::default();
        let src_body = source.body().unwrap();
        let section = element(&mut source, src_body, "section", "about");
        let text = source.tree_mut().create_text("Our story");
        source.append_child(section, text);

        let mut target = Document::default();
        let dst_body = target.body().unwrap();
        let copied = target.import_children(dst_body, &source, src_body);

        assert_eq!(copied.len(), 1);
        assert!(target.matches(copied[0], "section.about"));
        assert_eq!(target.text_content(copied[0]), "Our story");
    }

    #[test]
    fn test_repeated_swaps_keep_arena_bounded() {
        let mut page = Document::default();
        let page_body = page.body().unwrap();
        for class in ["hero", "story", "footer"] {
            let section = element(&mut page, page_body, "section", class);
            let text = page.tree_mut().create_text("Spring line");
            page.append_child(section, text);
        }

        let mut live = Document::default();
        let main = live.body().unwrap();
        live.import_children(main, &page, page_body);
        let settled = live.tree().len();

        for _ in 0..10 {
            live.clear_children(main);
            live.import_children(main, &page, page_body);
        }

        assert_eq!(live.tree().len(), settled);
        assert_eq!(live.query_selector_all(main, "section").len(), 3);
        assert_eq!(live.text_content(main), "Spring lineSpring lineSpring line");
    }
}
