//! HTML Serialization (innerHTML/outerHTML)
//!
//! Output follows what browsers produce for `innerHTML`: HTML5 void tags
//! without a slash, `&nbsp;` for U+00A0, escaped text and attributes.

use vitrine_dom::{Document, DomTree, NodeData, NodeId};

/// Void elements (no end tag)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];

/// Raw text elements (no escaping for content)
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// HTML serializer
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlSerializer;

impl HtmlSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Serialize innerHTML of a node (children only)
    pub fn serialize_inner(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_children(tree, node_id, &mut output);
        output
    }

    /// Serialize outerHTML of a node
    pub fn serialize_outer(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_node(tree, node_id, &mut output);
        output
    }

    fn serialize_node(&self, tree: &DomTree, node_id: NodeId, output: &mut String) {
        let Some(node) = tree.get(node_id) else {
            return;
        };

        match &node.data {
            NodeData::Document => self.serialize_children(tree, node_id, output),
            NodeData::Element(elem) => {
                let tag = tree.resolve(elem.name);

                output.push('<');
                output.push_str(tag);
                for attr in &elem.attrs {
                    output.push(' ');
                    output.push_str(tree.resolve(attr.name));
                    output.push_str("=\"");
                    escape_attribute(&attr.value, output);
                    output.push('"');
                }
                output.push('>');

                if VOID_ELEMENTS.contains(&tag) {
                    return;
                }

                if RAW_TEXT_ELEMENTS.contains(&tag) {
                    for (_, child) in tree.children(node_id) {
                        if let Some(text) = child.as_text() {
                            output.push_str(text);
                        }
                    }
                } else {
                    self.serialize_children(tree, node_id, output);
                }

                output.push_str("</");
                output.push_str(tag);
                output.push('>');
            }
            NodeData::Text(text) => escape_text(&text.content, output),
            NodeData::Comment(text) => {
                output.push_str("<!--");
                output.push_str(text);
                output.push_str("-->");
            }
            NodeData::Doctype { name } => {
                output.push_str("<!DOCTYPE ");
                output.push_str(name);
                output.push('>');
            }
        }
    }

    fn serialize_children(&self, tree: &DomTree, parent_id: NodeId, output: &mut String) {
        for (child_id, _) in tree.children(parent_id) {
            self.serialize_node(tree, child_id, output);
        }
    }
}

/// Escape text content for HTML
fn escape_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}

/// Escape attribute value
fn escape_attribute(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}

/// innerHTML of an element
pub fn inner_html(doc: &Document, node_id: NodeId) -> String {
    HtmlSerializer::new().serialize_inner(doc.tree(), node_id)
}

/// outerHTML of an element
pub fn outer_html(doc: &Document, node_id: NodeId) -> String {
    HtmlSerializer::new().serialize_outer(doc.tree(), node_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        let mut output = String::new();
        escape_text("Hello <world> & \"friends\"\u{a0}", &mut output);
        assert_eq!(output, "Hello &lt;world&gt; &amp; \"friends\"&nbsp;");
    }

    #[test]
    fn test_escape_attribute() {
        let mut output = String::new();
        escape_attribute("a \"b\" & <c>", &mut output);
        assert_eq!(output, "a &quot;b&quot; &amp; <c>");
    }

    #[test]
    fn test_void_elements() {
        assert!(VOID_ELEMENTS.contains(&"br"));
        assert!(VOID_ELEMENTS.contains(&"img"));
        assert!(!VOID_ELEMENTS.contains(&"span"));
    }

    #[test]
    fn test_serialize_built_tree() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let p = doc.tree_mut().create_element("p");
        let text = doc.tree_mut().create_text("one");
        let br = doc.tree_mut().create_element("br");
        doc.append_child(body, p);
        doc.append_child(p, text);
        doc.append_child(p, br);
        doc.set_attribute(p, "class", "intro");

        assert_eq!(outer_html(&doc, p), r#"<p class="intro">one<br></p>"#);
        assert_eq!(inner_html(&doc, p), "one<br>");
    }
}
