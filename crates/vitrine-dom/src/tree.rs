//! DOM Tree (arena-based allocation)
//!
//! Detaching a subtree only unlinks it. Reclaiming it blanks its slots and
//! puts them on a free list, so the arena stays bounded across repeated
//! content swaps. A reclaimed `NodeId` may later name an unrelated node.

use crate::{Node, NodeData, NodeId, InternedString, StringInterner};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    /// Reclaimed slots, reused before the arena grows
    free: Vec<NodeId>,
    interner: StringInterner,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            free: Vec::new(),
            interner: StringInterner::new(),
        }
    }

    /// Document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of arena slots (attached, detached or free)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Number of slots waiting to be reused
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn interner_mut(&mut self) -> &mut StringInterner {
        &mut self.interner
    }

    /// Resolve an interned name
    #[inline]
    pub fn resolve(&self, id: InternedString) -> &str {
        self.interner.get(id)
    }

    fn push(&mut self, node: Node) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.index()] = node;
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let name = self.interner.intern(&tag.to_ascii_lowercase());
        self.push(Node::element(name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content.to_string()))
    }

    /// Create a detached doctype node
    pub fn create_doctype(&mut self, name: &str) -> NodeId {
        self.push(Node::doctype(name.to_string()))
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.get(parent).is_none() || self.get(child).is_none() {
            return;
        }
        self.detach(child);

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
    }

    /// Unlink a node (and its subtree) from its parent
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Detach a subtree and release its slots for reuse.
    ///
    /// The document node is never reclaimed.
    pub fn reclaim(&mut self, id: NodeId) {
        if id == NodeId::ROOT || self.get(id).is_none() {
            return;
        }
        self.detach(id);

        let mut released = self.descendants(id);
        released.push(id);
        for slot in released {
            self.nodes[slot.index()] = Node::comment(String::new());
            self.free.push(slot);
        }
    }

    /// Iterate over direct children
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        let next = self.get(parent).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        Children { tree: self, next }
    }

    /// All descendants in document (pre-)order, excluding `node` itself
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).map(|(id, _)| id).collect();
        stack.reverse();

        while let Some(id) = stack.pop() {
            out.push(id);
            let start = stack.len();
            stack.extend(self.children(id).map(|(child, _)| child));
            stack[start..].reverse();
        }
        out
    }

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent.to_option())
    }

    /// Ancestors from the parent upwards
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Whether `node` lives inside `ancestor`'s subtree
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Whether the node is reachable from the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(NodeId::ROOT, id)
    }

    /// Lowercase tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element().map(|e| self.resolve(e.name))
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Text(text)) => text.content.clone(),
            Some(_) => self.descendants(id)
                .into_iter()
                .filter_map(|d| self.get(d).and_then(Node::as_text))
                .collect(),
            None => String::new(),
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a node's direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.to_option()?;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let div = tree.create_element("DIV");
        let a = tree.create_element("a");
        let text = tree.create_text("shop");
        tree.append_child(tree.root(), div);
        tree.append_child(div, a);
        tree.append_child(a, text);
        (tree, div, a, text)
    }

    #[test]
    fn test_append_and_children() {
        let (tree, div, a, _) = sample();
        let children: Vec<_> = tree.children(div).map(|(id, _)| id).collect();
        assert_eq!(children, vec![a]);
        assert_eq!(tree.tag_name(div), Some("div"));
        assert_eq!(tree.parent(a), Some(div));
    }

    #[test]
    fn test_reclaim_reuses_slots() {
        let (mut tree, div, a, text) = sample();
        let len = tree.len();

        tree.reclaim(a);
        assert_eq!(tree.free_count(), 2);
        assert!(tree.children(div).next().is_none());
        assert_eq!(tree.text_content(text), "");

        let p = tree.create_element("p");
        let em = tree.create_element("em");
        assert!(p == a || p == text);
        assert!(em == a || em == text);
        assert_eq!(tree.len(), len);
        assert_eq!(tree.free_count(), 0);
        assert_eq!(tree.tag_name(p), Some("p"));
        assert_eq!(tree.parent(p), None);

        tree.reclaim(tree.root());
        assert!(tree.is_connected(div));
    }

    #[test]
    fn test_descendants_preorder() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let first = tree.create_element("p");
        let nested = tree.create_element("span");
        let second = tree.create_element("p");
        tree.append_child(tree.root(), outer);
        tree.append_child(outer, first);
        tree.append_child(first, nested);
        tree.append_child(outer, second);

        assert_eq!(tree.descendants(outer), vec![first, nested, second]);
    }

    #[test]
    fn test_detach_middle_child() {
        let mut tree = DomTree::new();
        let parent = tree.create_element("ul");
        let items: Vec<_> = (0..3).map(|_| tree.create_element("li")).collect();
        for &item in &items {
            tree.append_child(parent, item);
        }

        tree.detach(items[1]);
        let left: Vec<_> = tree.children(parent).map(|(id, _)| id).collect();
        assert_eq!(left, vec![items[0], items[2]]);
        assert_eq!(tree.parent(items[1]), None);
    }

    #[test]
    fn test_text_content_and_connection() {
        let (mut tree, div, a, _) = sample();
        assert_eq!(tree.text_content(div), "shop");
        assert!(tree.is_connected(a));

        tree.detach(div);
        assert!(!tree.is_connected(a));
        assert!(tree.contains(div, a));
    }
}
