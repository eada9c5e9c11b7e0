//! HTML5 Parser implementation
//!
//! Parses with html5ever into an `RcDom` and converts the result into the
//! arena DOM.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use vitrine_dom::{Document, NodeId};

/// HTML5 parser
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Document {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a document URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Document {
        tracing::debug!(url, bytes = html.len(), "parsing HTML document");

        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let mut document = Document::empty(url);
        let root = document.root();
        self.convert_node(&dom.document, &mut document, root);
        document.finalize();

        tracing::debug!(nodes = document.tree().len(), "parsed document");
        document
    }

    /// Parse markup meant for an element's content.
    ///
    /// The markup is parsed as a document body; callers import the body's
    /// children into the live tree.
    pub fn parse_fragment(&self, markup: &str) -> Document {
        self.parse(markup)
    }

    fn convert_node(&self, handle: &Handle, doc: &mut Document, parent: NodeId) {
        match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, doc, parent);
                }
            }
            RcNodeData::Doctype { name, .. } => {
                let id = doc.tree_mut().create_doctype(name);
                doc.append_child(parent, id);
            }
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                let id = doc.tree_mut().create_text(&text);
                doc.append_child(parent, id);
            }
            RcNodeData::Comment { contents } => {
                let id = doc.tree_mut().create_comment(contents);
                doc.append_child(parent, id);
            }
            RcNodeData::Element { name, attrs, .. } => {
                let id = doc.tree_mut().create_element(&name.local);
                for attr in attrs.borrow().iter() {
                    doc.set_attribute(id, &attr.name.local, &attr.value);
                }
                doc.append_child(parent, id);

                for child in handle.children.borrow().iter() {
                    self.convert_node(child, doc, id);
                }
            }
            RcNodeData::ProcessingInstruction { .. } => {}
        }
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}
