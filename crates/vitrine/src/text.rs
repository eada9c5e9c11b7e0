//! Text segmentation
//!
//! Splits an element's inner markup into one `<span>` per word so each word
//! can be animated on its own. Inline `<a>`, `<strong>` and `<em>` runs are
//! never split: a run that spans several words becomes a single token.

use vitrine_dom::{Document, NodeId};

/// Line separator inside segmented markup
pub const LINE_BREAK: &str = "<br>";

const NBSP: &str = "\u{a0}";

/// Inline tags kept atomic, with their closing form
const ATOMIC_TAGS: [(&str, &str); 3] = [("a", "</a>"), ("strong", "</strong>"), ("em", "</em>")];

/// A segmentation unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextToken {
    /// Plain word
    Word(String),
    /// Markup fragment that must not be split
    Markup(String),
    LineBreak,
}

/// How words are separated within a line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// Any run of whitespace, re-joined with a single space
    #[default]
    Whitespace,
    /// A literal separator. Empty keeps each line whole.
    Literal(String),
}

impl Delimiter {
    fn words<'a>(&self, line: &'a str) -> Vec<&'a str> {
        match self {
            Delimiter::Whitespace => line.split_whitespace().collect(),
            Delimiter::Literal(sep) if sep.is_empty() => vec![line],
            Delimiter::Literal(sep) => line.split(sep.as_str()).collect(),
        }
    }

    fn joiner(&self) -> &str {
        match self {
            Delimiter::Whitespace => " ",
            Delimiter::Literal(sep) => sep,
        }
    }
}

/// Split raw markup into tokens.
///
/// Lines are separated by `<br>`, words by `delimiter`. Words from an opening
/// atomic tag up to its closing tag are re-joined with the delimiter. An
/// unterminated run is flushed as one token at the end of its line.
pub fn tokenize(markup: &str, delimiter: &Delimiter) -> Vec<TextToken> {
    let mut tokens = Vec::new();
    let joiner = delimiter.joiner();

    for (index, line) in markup.split(LINE_BREAK).enumerate() {
        if index > 0 {
            tokens.push(TextToken::LineBreak);
        }

        let mut open: Option<(String, &str)> = None;
        for word in delimiter.words(line) {
            if let Some((run, closer)) = open.as_mut() {
                run.push_str(joiner);
                run.push_str(word);
                if word.contains(*closer) {
                    if let Some((run, _)) = open.take() {
                        tokens.push(TextToken::Markup(run));
                    }
                }
                continue;
            }

            match opening_tag(word) {
                Some(closer) if !word.contains(closer) => open = Some((word.to_string(), closer)),
                Some(_) => tokens.push(TextToken::Markup(word.to_string())),
                None => tokens.push(TextToken::Word(word.to_string())),
            }
        }

        if let Some((run, _)) = open {
            tokens.push(TextToken::Markup(run));
        }
    }

    tokens
}

/// Closing tag of the first atomic tag opened in `word`
fn opening_tag(word: &str) -> Option<&'static str> {
    ATOMIC_TAGS.iter()
        .filter_map(|(name, closer)| {
            let pattern = format!("<{}", name);
            word.match_indices(&pattern)
                .find(|(at, _)| {
                    let next = word[at + pattern.len()..].chars().next();
                    next.is_none_or(|c| c.is_whitespace() || c == '>' || c == '/')
                })
                .map(|(at, _)| (at, *closer))
        })
        .min_by_key(|(at, _)| *at)
        .map(|(_, closer)| closer)
}

/// Wrap a single token. Tokens longer than one character get a trailing
/// space so words stay apart once wrapped.
fn wrap(text: &str, out: &mut String) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if text == LINE_BREAK {
        out.push_str(LINE_BREAK);
        return;
    }
    out.push_str("<span>");
    out.push_str(text);
    out.push_str("</span>");
    if text.chars().count() > 1 {
        out.push(' ');
    }
}

/// Segment raw markup into span-wrapped markup
pub fn segment(markup: &str, delimiter: &Delimiter) -> String {
    let mut out = String::with_capacity(markup.len() * 2);
    for token in tokenize(markup.trim(), delimiter) {
        match token {
            TextToken::Word(text) | TextToken::Markup(text) => wrap(&text, &mut out),
            TextToken::LineBreak => out.push_str(LINE_BREAK),
        }
    }
    out
}

/// Options for [`split`]
#[derive(Debug, Clone)]
pub struct SplitOptions {
    pub delimiter: Delimiter,
    /// Append a non-breaking space to single-character spans
    pub append_spacer: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::Whitespace,
            append_spacer: true,
        }
    }
}

/// Whether a span's text needs a trailing non-breaking space
pub fn needs_spacer(text: &str) -> bool {
    text.chars().count() == 1 && !text.trim().is_empty() && text != "&" && text != "-"
}

/// Replace `element`'s content with segmented markup.
///
/// Returns the word spans (direct span children of `element`).
pub fn split(doc: &mut Document, element: NodeId, options: &SplitOptions) -> Vec<NodeId> {
    let markup = vitrine_html::inner_html(doc, element);
    let segmented = segment(&markup, &options.delimiter);
    vitrine_html::set_inner_html(doc, element, &segmented);

    let spans: Vec<NodeId> = doc.element_children(element)
        .into_iter()
        .filter(|&child| doc.tag_name(child) == Some("span"))
        .collect();

    if options.append_spacer {
        for &span in &spans {
            if needs_spacer(&doc.text_content(span)) {
                let spacer = doc.tree_mut().create_text(NBSP);
                doc.append_child(span, spacer);
            }
        }
    }

    tracing::debug!(spans = spans.len(), "split text");
    spans
}

/// Vertical placement of laid-out nodes
pub trait LineMetrics {
    fn offset_top(&self, node: NodeId) -> f64;
}

impl<F: Fn(NodeId) -> f64> LineMetrics for F {
    fn offset_top(&self, node: NodeId) -> f64 {
        self(node)
    }
}

/// Group spans into visual lines: consecutive spans sharing a top offset
/// form one line. Never yields an empty line.
pub fn group_by_line(spans: &[NodeId], metrics: &impl LineMetrics) -> Vec<Vec<NodeId>> {
    let mut lines = Vec::new();
    let mut current = Vec::new();
    let mut position = None;

    for &span in spans {
        let top = metrics.offset_top(span);
        if position.is_some_and(|p| p != top) && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        position = Some(top);
        current.push(span);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
