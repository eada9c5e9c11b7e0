//! DOM Node - Compact representation
//!
//! Nodes link to each other through `NodeId` indices instead of pointers,
//! so the whole tree lives in one arena vector.

use crate::{NodeId, InternedString};

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (NONE if detached or root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(name: InternedString) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(name)))
    }

    /// Create a new text node
    pub fn text(content: String) -> Self {
        Self::with_data(NodeData::Text(TextData { content }))
    }

    /// Create a comment node
    pub fn comment(content: String) -> Self {
        Self::with_data(NodeData::Comment(content))
    }

    /// Create a doctype node
    pub fn doctype(name: String) -> Self {
        Self::with_data(NodeData::Doctype { name })
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(&t.content),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// DOCTYPE
    Doctype { name: String },
    /// Element
    Element(ElementData),
    /// Text content
    Text(TextData),
    /// Comment
    Comment(String),
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Local tag name
    pub name: InternedString,
    /// Attributes in source order
    pub attrs: Vec<Attribute>,
    /// Cached id attribute
    pub id: Option<String>,
    /// Cached class list
    pub classes: Vec<String>,
}

impl ElementData {
    pub fn new(name: InternedString) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            id: None,
            classes: Vec::new(),
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: InternedString) -> Option<&str> {
        self.attrs.iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, keeping the id/class caches in sync
    pub fn set_attr(&mut self, name: InternedString, value: String) {
        if name == InternedString::ID {
            self.id = Some(value.clone());
        } else if name == InternedString::CLASS {
            self.classes = value.split_whitespace().map(str::to_string).collect();
        }

        match self.attrs.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value,
            None => self.attrs.push(Attribute { name, value }),
        }
    }

    /// Remove an attribute, returning its old value
    pub fn remove_attr(&mut self, name: InternedString) -> Option<String> {
        let index = self.attrs.iter().position(|a| a.name == name)?;
        if name == InternedString::ID {
            self.id = None;
        } else if name == InternedString::CLASS {
            self.classes.clear();
        }
        Some(self.attrs.remove(index).value)
    }

    /// Check the cached class list
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Text node data
#[derive(Debug, Clone)]
pub struct TextData {
    pub content: String,
}

/// Attribute
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: InternedString,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_cache() {
        let mut elem = ElementData::new(InternedString(5));
        elem.set_attr(InternedString::CLASS, "home  home--active".to_string());
        assert!(elem.has_class("home"));
        assert!(elem.has_class("home--active"));

        elem.set_attr(InternedString::CLASS, "about".to_string());
        assert!(!elem.has_class("home"));
        assert_eq!(elem.attrs.len(), 1);
    }

    #[test]
    fn test_remove_attr() {
        let mut elem = ElementData::new(InternedString(5));
        elem.set_attr(InternedString::ID, "main".to_string());
        assert_eq!(elem.id.as_deref(), Some("main"));
        assert_eq!(elem.remove_attr(InternedString::ID), Some("main".to_string()));
        assert!(elem.id.is_none());
        assert_eq!(elem.remove_attr(InternedString::ID), None);
    }
}
