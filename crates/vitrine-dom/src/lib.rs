//! Vitrine DOM - Document Object Model
//!
//! Arena-backed DOM tree for the storefront engine: node storage, selector
//! queries, attributes and a small click/load event model.

mod interner;
mod node;
mod tree;
mod document;
mod selector;
mod events;

pub use interner::{InternedString, StringInterner};
pub use node::{Node, NodeData, ElementData, TextData, Attribute};
pub use tree::{DomTree, Children};
pub use document::Document;
pub use selector::{SelectorList, Selector, Compound, AttrMatch};
pub use events::{DomEvent, EventType, Listener, dispatch};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Whether this ID points at a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Option view of the sentinel
    #[inline]
    pub fn to_option(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}
