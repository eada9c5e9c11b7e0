//! Vitrine HTML
//!
//! HTML5 parsing built on html5ever, plus the inner-markup serializer used
//! for content swaps and text segmentation.

mod parser;
mod serializer;

pub use parser::HtmlParser;
pub use serializer::{HtmlSerializer, inner_html, outer_html};
pub use vitrine_dom::Document;

use vitrine_dom::NodeId;

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Document {
    HtmlParser::new().parse(html)
}

/// Parse an HTML string fetched from `url`
pub fn parse_with_url(html: &str, url: &str) -> Document {
    HtmlParser::new().parse_with_url(html, url)
}

/// Replace the children of `node` with the parsed `markup` (innerHTML assignment).
///
/// Listeners on the removed children are dropped. Returns the new top-level
/// nodes.
pub fn set_inner_html(doc: &mut Document, node: NodeId, markup: &str) -> Vec<NodeId> {
    let fragment = HtmlParser::new().parse_fragment(markup);
    doc.clear_children(node);
    match fragment.body() {
        Some(body) => doc.import_children(node, &fragment, body),
        None => Vec::new(),
    }
}
