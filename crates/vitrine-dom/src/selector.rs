//! Selector matching
//!
//! A small subset of CSS selectors, enough for declarative element maps:
//! type, universal, `#id`, `.class`, `[attr]`, `[attr=value]`, compound
//! selectors, the descendant combinator and comma-separated lists.

use crate::{DomTree, NodeId};

/// Attribute condition inside a compound selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrMatch {
    Exists(String),
    Equals(String, String),
}

/// Compound selector (no combinators), e.g. `a.nav__link[href]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<AttrMatch>,
}

impl Compound {
    /// Parse a compound selector
    pub fn parse(s: &str) -> Option<Self> {
        let mut compound = Compound::default();
        let chars: Vec<char> = s.chars().collect();
        let mut i = 0;

        if chars.first() == Some(&'*') {
            i = 1;
        } else {
            let tag = take_ident(&chars, &mut i);
            if !tag.is_empty() {
                compound.tag = Some(tag.to_ascii_lowercase());
            }
        }

        while i < chars.len() {
            match chars[i] {
                '#' => {
                    i += 1;
                    let id = take_ident(&chars, &mut i);
                    if id.is_empty() {
                        return None;
                    }
                    compound.id = Some(id);
                }
                '.' => {
                    i += 1;
                    let class = take_ident(&chars, &mut i);
                    if class.is_empty() {
                        return None;
                    }
                    compound.classes.push(class);
                }
                '[' => {
                    let close = chars[i..].iter().position(|&c| c == ']')? + i;
                    let inner: String = chars[i + 1..close].iter().collect();
                    compound.attrs.push(parse_attr(&inner)?);
                    i = close + 1;
                }
                _ => return None,
            }
        }

        Some(compound)
    }

    /// Check a single element against this compound
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some(elem) = tree.get(node).and_then(|n| n.as_element()) else {
            return false;
        };

        if let Some(tag) = &self.tag {
            if tree.resolve(elem.name) != tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if elem.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| elem.has_class(c)) {
            return false;
        }

        self.attrs.iter().all(|cond| {
            let (name, expected) = match cond {
                AttrMatch::Exists(name) => (name, None),
                AttrMatch::Equals(name, value) => (name, Some(value)),
            };
            let value = elem.attrs.iter()
                .find(|a| tree.resolve(a.name) == name)
                .map(|a| a.value.as_str());
            match (value, expected) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
                (None, _) => false,
            }
        })
    }
}

/// Complex selector: compounds joined by descendant combinators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<Compound>,
}

impl Selector {
    pub fn parse(s: &str) -> Option<Self> {
        let compounds = s.split_whitespace()
            .map(Compound::parse)
            .collect::<Option<Vec<_>>>()?;
        if compounds.is_empty() {
            return None;
        }
        Some(Self { compounds })
    }

    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some((last, rest)) = self.compounds.split_last() else {
            return false;
        };
        if !last.matches(tree, node) {
            return false;
        }

        // Nearest-ancestor matching is exact for descendant-only chains
        let mut ancestors = tree.ancestors(node);
        rest.iter().rev().all(|compound| {
            ancestors.any(|ancestor| compound.matches(tree, ancestor))
        })
    }
}

/// Comma-separated selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(Vec<Selector>);

impl SelectorList {
    /// Parse a selector list; `None` if any part is unsupported
    pub fn parse(s: &str) -> Option<Self> {
        let selectors = s.split(',')
            .map(|part| Selector::parse(part.trim()))
            .collect::<Option<Vec<_>>>()?;
        Some(Self(selectors))
    }

    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.0.iter().any(|s| s.matches(tree, node))
    }
}

fn take_ident(chars: &[char], i: &mut usize) -> String {
    let start = *i;
    while *i < chars.len() && (chars[*i].is_alphanumeric() || chars[*i] == '-' || chars[*i] == '_') {
        *i += 1;
    }
    chars[start..*i].iter().collect()
}

fn parse_attr(inner: &str) -> Option<AttrMatch> {
    match inner.split_once('=') {
        Some((name, value)) => {
            let name = name.trim();
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            (!name.is_empty()).then(|| AttrMatch::Equals(name.to_ascii_lowercase(), value.to_string()))
        }
        None => {
            let name = inner.trim();
            (!name.is_empty()).then(|| AttrMatch::Exists(name.to_ascii_lowercase()))
        }
    }
}
