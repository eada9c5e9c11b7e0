//! String Interner - Deduplicate tag and attribute names
//!
//! Tag names ("div", "span", "a") and attribute names ("class", "href")
//! are stored once per tree and referenced by a 4-byte ID.

use std::collections::HashMap;

/// Interned string ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct InternedString(pub u32);

impl InternedString {
    /// Empty string
    pub const EMPTY: InternedString = InternedString(0);
    /// The `id` attribute name
    pub const ID: InternedString = InternedString(1);
    /// The `class` attribute name
    pub const CLASS: InternedString = InternedString(2);
}

/// String interner for deduplicating names
#[derive(Debug)]
pub struct StringInterner {
    strings: Vec<Box<str>>,
    map: HashMap<Box<str>, u32>,
}

impl StringInterner {
    /// Create an interner with the fixed entries and common HTML names pre-interned
    pub fn new() -> Self {
        let mut interner = Self {
            strings: Vec::with_capacity(64),
            map: HashMap::with_capacity(64),
        };

        // Order matters: these back the InternedString constants
        interner.intern("");
        interner.intern("id");
        interner.intern("class");

        const COMMON: &[&str] = &[
            "html", "head", "body", "div", "span", "p", "a", "img", "br",
            "strong", "em", "section", "nav", "main", "title",
            "href", "src", "data-src", "data-template", "alt",
        ];
        for name in COMMON {
            interner.intern(name);
        }

        interner
    }

    /// Intern a string, returning its ID
    pub fn intern(&mut self, s: &str) -> InternedString {
        if let Some(&idx) = self.map.get(s) {
            return InternedString(idx);
        }

        let idx = self.strings.len() as u32;
        self.strings.push(s.into());
        self.map.insert(s.into(), idx);
        InternedString(idx)
    }

    /// Look up a string without interning it
    pub fn lookup(&self, s: &str) -> Option<InternedString> {
        self.map.get(s).map(|&idx| InternedString(idx))
    }

    /// Get the string for an interned ID
    #[inline]
    pub fn get(&self, id: InternedString) -> &str {
        self.strings.get(id.0 as usize).map(|s| &**s).unwrap_or("")
    }

    /// Number of interned strings
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
