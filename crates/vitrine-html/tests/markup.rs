//! Integration tests for vitrine-html
//!
//! Parsing storefront documents and round-tripping content roots.

use vitrine_html::{inner_html, parse, parse_with_url, set_inner_html, Document};

// ============================================================================
// DOCUMENT PARSING
// ============================================================================

#[test]
fn test_parse_storefront_document() {
    let html = r#"
        <!DOCTYPE html>
        <html>
            <head><title>About</title></head>
            <body>
                <nav class="navigation"><a href="/">Home</a></nav>
                <div class="content" data-template="about">
                    <section class="about"><h1>About us</h1></section>
                </div>
            </body>
        </html>
    "#;

    let doc = parse_with_url(html, "https://shop.test/about");
    let content = doc.query_selector(doc.root(), ".content").expect("content root");

    assert_eq!(doc.url(), "https://shop.test/about");
    assert_eq!(doc.title(), "About");
    assert_eq!(doc.get_attribute(content, "data-template"), Some("about"));
    assert!(doc.query_selector(content, ".about h1").is_some());
}

#[test]
fn test_parse_malformed_html() {
    let html = r#"
        <div class="content" data-template="home">
            <p>Unclosed paragraph
            <span>Unclosed span
        </div>
        <p>Another paragraph without closing
    "#;

    let doc = parse(html);
    assert!(doc.query_selector(doc.root(), ".content").is_some());
}

#[test]
fn test_parse_empty() {
    let doc = parse("");
    assert!(doc.body().is_some(), "html5ever always builds a body");
    assert!(doc.query_selector(doc.root(), ".content").is_none());
}

#[test]
fn test_entities_decoded_in_text() {
    let doc = parse("<p>Fish &amp; Chips&nbsp;</p>");
    let p = doc.query_selector(doc.root(), "p").unwrap();

    assert_eq!(doc.text_content(p), "Fish & Chips\u{a0}");
    assert_eq!(inner_html(&doc, p), "Fish &amp; Chips&nbsp;");
}

// ============================================================================
// INNER HTML
// ============================================================================

#[test]
fn test_set_inner_html_replaces_children() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let title = doc.tree_mut().create_element("h1");
    doc.append_child(body, title);
    doc.set_text_content(title, "old");

    let nodes = set_inner_html(&mut doc, title, "<span>New</span><br><span>line</span>");

    assert_eq!(nodes.len(), 3);
    assert_eq!(inner_html(&doc, title), "<span>New</span><br><span>line</span>");
    assert_eq!(doc.query_selector_all(title, "span").len(), 2);
}

#[test]
fn test_inner_html_roundtrip_preserves_whitespace_and_links() {
    let markup = r#"<span>Hello</span> <span><a href="/x">world</a></span> "#;
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let p = doc.tree_mut().create_element("p");
    doc.append_child(body, p);

    set_inner_html(&mut doc, p, markup);
    assert_eq!(inner_html(&doc, p), markup);
}
