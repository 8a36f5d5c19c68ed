//! Element Query
//!
//! querySelector / querySelectorAll / matches over a small selector grammar:
//! compound selectors made of `tag`, `*`, `.class`, `#id` and attribute
//! selectors, joined by descendant (` `) or child (`>`) combinators, in
//! comma-separated lists. That covers `[data-name="X"]` lookups and the
//! selectors design exports emit.

use crate::{DomTree, NodeId};

/// Attribute selector operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOp {
    /// `[attr]`
    Exists,
    /// `[attr=v]`
    Equals,
    /// `[attr~=v]`
    Includes,
    /// `[attr|=v]`
    DashMatch,
    /// `[attr^=v]`
    StartsWith,
    /// `[attr$=v]`
    EndsWith,
    /// `[attr*=v]`
    Contains,
}

impl AttrOp {
    fn matches(self, actual: &str, expected: &str) -> bool {
        match self {
            Self::Exists => true,
            Self::Equals => actual == expected,
            Self::Includes => actual.split_whitespace().any(|w| w == expected),
            Self::DashMatch => {
                actual == expected
                    || (actual.starts_with(expected) && actual[expected.len()..].starts_with('-'))
            }
            Self::StartsWith => !expected.is_empty() && actual.starts_with(expected),
            Self::EndsWith => !expected.is_empty() && actual.ends_with(expected),
            Self::Contains => !expected.is_empty() && actual.contains(expected),
        }
    }
}

/// Simple selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Universal,
    Tag(String),
    Id(String),
    Class(String),
    Attribute { name: String, op: AttrOp, value: String },
}

/// Sequence of simple selectors that all apply to one element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compound {
    pub parts: Vec<SimpleSelector>,
}

/// Relationship between two compounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
}

/// Selector specificity (ids, classes/attributes, tags)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity(pub u32, pub u32, pub u32);

/// Complex selector, compounds left to right
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub compounds: Vec<Compound>,
    /// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`
    pub combinators: Vec<Combinator>,
}

impl Selector {
    /// Parse a single complex selector
    pub fn parse(input: &str) -> Option<Self> {
        let mut cursor = Cursor::new(input.trim());
        let mut compounds = Vec::new();
        let mut combinators = Vec::new();
        let mut pending: Option<Combinator> = None;

        loop {
            let skipped = cursor.skip_whitespace();
            if skipped && !compounds.is_empty() && pending.is_none() {
                pending = Some(Combinator::Descendant);
            }
            match cursor.peek() {
                None => break,
                Some('>') => {
                    if compounds.is_empty() {
                        return None;
                    }
                    cursor.bump();
                    pending = Some(Combinator::Child);
                }
                Some(_) => {
                    let compound = parse_compound(&mut cursor)?;
                    if !compounds.is_empty() {
                        combinators.push(pending.take()?);
                    }
                    compounds.push(compound);
                }
            }
        }

        if compounds.is_empty() || pending == Some(Combinator::Child) {
            return None;
        }
        Some(Self { compounds, combinators })
    }

    pub fn specificity(&self) -> Specificity {
        let mut spec = Specificity::default();
        for part in self.compounds.iter().flat_map(|c| c.parts.iter()) {
            match part {
                SimpleSelector::Id(_) => spec.0 += 1,
                SimpleSelector::Class(_) | SimpleSelector::Attribute { .. } => spec.1 += 1,
                SimpleSelector::Tag(_) => spec.2 += 1,
                SimpleSelector::Universal => {}
            }
        }
        spec
    }
}

/// Comma-separated selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(pub Vec<Selector>);

impl SelectorList {
    /// Parse a selector list; any invalid member invalidates the list
    pub fn parse(input: &str) -> Option<Self> {
        let selectors = split_top_level(input, ',')
            .into_iter()
            .map(Selector::parse)
            .collect::<Option<Vec<_>>>()?;
        (!selectors.is_empty()).then_some(Self(selectors))
    }
}

/// Split on `sep` outside brackets, parentheses and quotes
pub(crate) fn split_top_level(input: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[' | '(') => depth += 1,
            (None, ']' | ')') => depth = depth.saturating_sub(1),
            (None, c) if c == sep && depth == 0 => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

struct Cursor<'a> {
    rest: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            rest: input.chars().peekable(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.rest.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        self.rest.next()
    }

    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
            skipped = true;
        }
        skipped
    }

    fn ident(&mut self) -> Option<String> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.bump();
                out.push(self.bump()?);
            } else if c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
                out.push(c);
                self.bump();
            } else {
                break;
            }
        }
        (!out.is_empty()).then_some(out)
    }

    fn quoted(&mut self, quote: char) -> Option<String> {
        let mut out = String::new();
        loop {
            match self.bump()? {
                '\\' => out.push(self.bump()?),
                c if c == quote => return Some(out),
                c => out.push(c),
            }
        }
    }
}

fn parse_compound(cursor: &mut Cursor<'_>) -> Option<Compound> {
    let mut parts = Vec::new();
    while let Some(c) = cursor.peek() {
        match c {
            '*' => {
                cursor.bump();
                parts.push(SimpleSelector::Universal);
            }
            '.' => {
                cursor.bump();
                parts.push(SimpleSelector::Class(cursor.ident()?));
            }
            '#' => {
                cursor.bump();
                parts.push(SimpleSelector::Id(cursor.ident()?));
            }
            '[' => {
                cursor.bump();
                parts.push(parse_attribute(cursor)?);
            }
            c if parts.is_empty() && (c.is_alphanumeric() || c == '-' || c == '_') => {
                parts.push(SimpleSelector::Tag(cursor.ident()?.to_ascii_lowercase()));
            }
            c if c.is_whitespace() || c == '>' => break,
            // pseudo-classes and anything else are unsupported
            _ => return None,
        }
    }
    (!parts.is_empty()).then_some(Compound { parts })
}

fn parse_attribute(cursor: &mut Cursor<'_>) -> Option<SimpleSelector> {
    cursor.skip_whitespace();
    let name = cursor.ident()?.to_ascii_lowercase();
    cursor.skip_whitespace();
    let op = match cursor.bump()? {
        ']' => {
            return Some(SimpleSelector::Attribute {
                name,
                op: AttrOp::Exists,
                value: String::new(),
            });
        }
        '=' => AttrOp::Equals,
        c => {
            if cursor.bump()? != '=' {
                return None;
            }
            match c {
                '~' => AttrOp::Includes,
                '|' => AttrOp::DashMatch,
                '^' => AttrOp::StartsWith,
                '$' => AttrOp::EndsWith,
                '*' => AttrOp::Contains,
                _ => return None,
            }
        }
    };
    cursor.skip_whitespace();
    let value = match cursor.peek()? {
        q @ ('"' | '\'') => {
            cursor.bump();
            cursor.quoted(q)?
        }
        _ => cursor.ident()?,
    };
    cursor.skip_whitespace();
    (cursor.bump()? == ']').then_some(SimpleSelector::Attribute { name, op, value })
}

impl DomTree {
    /// First descendant of `root` matching `selector`, in document order
    pub fn query_selector(&self, root: NodeId, selector: &str) -> Option<NodeId> {
        let list = SelectorList::parse(selector)?;
        self.descendants(root)
            .find(|&id| self.matches_list(id, &list))
    }

    /// All descendants of `root` matching `selector`, in document order
    pub fn query_selector_all(&self, root: NodeId, selector: &str) -> Vec<NodeId> {
        let Some(list) = SelectorList::parse(selector) else {
            return Vec::new();
        };
        self.descendants(root)
            .filter(|&id| self.matches_list(id, &list))
            .collect()
    }

    /// Check if an element matches a selector string
    pub fn matches(&self, node: NodeId, selector: &str) -> bool {
        SelectorList::parse(selector).is_some_and(|list| self.matches_list(node, &list))
    }

    /// Check if an element matches any selector of a parsed list
    pub fn matches_list(&self, node: NodeId, list: &SelectorList) -> bool {
        list.0.iter().any(|sel| self.matches_selector(node, sel))
    }

    /// Check if an element matches a parsed complex selector
    pub fn matches_selector(&self, node: NodeId, selector: &Selector) -> bool {
        match selector.compounds.len() {
            0 => false,
            n => self.match_from(node, selector, n - 1),
        }
    }

    fn match_from(&self, node: NodeId, selector: &Selector, idx: usize) -> bool {
        if !self.matches_compound(node, &selector.compounds[idx]) {
            return false;
        }
        if idx == 0 {
            return true;
        }
        match selector.combinators[idx - 1] {
            Combinator::Child => self
                .parent(node)
                .is_some_and(|p| self.match_from(p, selector, idx - 1)),
            Combinator::Descendant => {
                let mut current = self.parent(node);
                while let Some(ancestor) = current {
                    if self.match_from(ancestor, selector, idx - 1) {
                        return true;
                    }
                    current = self.parent(ancestor);
                }
                false
            }
        }
    }

    fn matches_compound(&self, node: NodeId, compound: &Compound) -> bool {
        let Some(elem) = self.element(node) else {
            return false;
        };
        compound.parts.iter().all(|part| match part {
            SimpleSelector::Universal => true,
            SimpleSelector::Tag(tag) => elem.tag == *tag,
            SimpleSelector::Id(id) => elem.attr("id") == Some(id.as_str()),
            SimpleSelector::Class(class) => elem.class_list.contains(class),
            SimpleSelector::Attribute { name, op, value } => elem
                .get_attr(name)
                .is_some_and(|actual| op.matches(&actual, value)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attribute_selector() {
        let sel = Selector::parse(r#"[data-name="Frame \"A\""]"#).unwrap();
        assert_eq!(
            sel.compounds[0].parts[0],
            SimpleSelector::Attribute {
                name: "data-name".into(),
                op: AttrOp::Equals,
                value: "Frame \"A\"".into(),
            }
        );
    }

    #[test]
    fn test_parse_unquoted_and_combinators() {
        let sel = Selector::parse("div.card>[data-name=title] span").unwrap();
        assert_eq!(sel.compounds.len(), 3);
        assert_eq!(
            sel.combinators,
            vec![Combinator::Child, Combinator::Descendant]
        );
    }

    #[test]
    fn test_reject_unsupported() {
        assert!(Selector::parse("a:hover").is_none());
        assert!(Selector::parse("> a").is_none());
        assert!(Selector::parse("a >").is_none());
        assert!(SelectorList::parse("a, :root").is_none());
    }

    #[test]
    fn test_specificity() {
        let sel = Selector::parse("div#main .a[data-x]").unwrap();
        assert_eq!(sel.specificity(), Specificity(1, 2, 1));
    }

    #[test]
    fn test_split_top_level_respects_brackets() {
        let parts = split_top_level(r#"[data-name="a,b"], .c"#, ',');
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn test_dash_match() {
        assert!(AttrOp::DashMatch.matches("en-US", "en"));
        assert!(AttrOp::DashMatch.matches("en", "en"));
        assert!(!AttrOp::DashMatch.matches("english", "en"));
    }
}
