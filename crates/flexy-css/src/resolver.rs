//! Style Cascade & Resolver
//!
//! Computes the styles of an element by:
//! 1. Matching author rules against the element
//! 2. Sorting by importance, specificity and source order
//! 3. Applying the inline `style` attribute
//! 4. Inheriting text properties from the parent
//!
//! Only properties that some rule or inline style sets (or that are
//! inherited) appear in the result; there are no initial values.
//! Declarations cascade as longhands; four-side groups such as
//! `border-color` are reported when every side is set.

use std::collections::BTreeMap;

use flexy_dom::{CssStyleDeclaration, DomTree, NodeId, Specificity};

use crate::{CssParser, CssResult, Stylesheet};

/// Properties that inherit from the parent element
pub const INHERITED_PROPERTIES: &[&str] = &[
    "color",
    "cursor",
    "direction",
    "font-family",
    "font-size",
    "font-style",
    "font-variant",
    "font-weight",
    "letter-spacing",
    "line-height",
    "text-align",
    "text-indent",
    "text-shadow",
    "text-transform",
    "visibility",
    "white-space",
    "word-spacing",
];

/// Shorthands reported from their four longhands, in
/// top/right/bottom/left order
const BOX_SHORTHANDS: &[(&str, [&str; 4])] = &[
    ("margin", ["margin-top", "margin-right", "margin-bottom", "margin-left"]),
    ("padding", ["padding-top", "padding-right", "padding-bottom", "padding-left"]),
    (
        "border-width",
        ["border-top-width", "border-right-width", "border-bottom-width", "border-left-width"],
    ),
    (
        "border-style",
        ["border-top-style", "border-right-style", "border-bottom-style", "border-left-style"],
    ),
    (
        "border-color",
        ["border-top-color", "border-right-color", "border-bottom-color", "border-left-color"],
    ),
    (
        "border-radius",
        [
            "border-top-left-radius",
            "border-top-right-radius",
            "border-bottom-right-radius",
            "border-bottom-left-radius",
        ],
    ),
];

/// Shortest `top right bottom left` form
fn box_value([top, right, bottom, left]: [&str; 4]) -> String {
    if left != right {
        format!("{top} {right} {bottom} {left}")
    } else if top != bottom {
        format!("{top} {right} {bottom}")
    } else if top != right {
        format!("{top} {right}")
    } else {
        top.to_string()
    }
}

/// Resolved style values, keyed by kebab-case property name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputedStyle {
    properties: BTreeMap<String, String>,
}

impl ComputedStyle {
    /// Value of a property (`getPropertyValue`)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.properties.insert(name.to_string(), value.to_string());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Add the shorthands whose longhands are all present. Multi-part side
    /// values (elliptical radii, layered backgrounds) are left as longhands.
    fn add_shorthands(&mut self) {
        for (name, sides) in BOX_SHORTHANDS {
            let values = sides.map(|side| self.get(side));
            let [Some(top), Some(right), Some(bottom), Some(left)] = values else {
                continue;
            };
            if [top, right, bottom, left].iter().any(|v| v.contains(' ')) {
                continue;
            }
            let value = box_value([top, right, bottom, left]);
            self.set(name, &value);
        }

        let position = match (self.get("background-position-x"), self.get("background-position-y")) {
            (Some(x), Some(y)) if !x.contains(',') && !y.contains(',') => Some(format!("{x} {y}")),
            _ => None,
        };
        if let Some(value) = position {
            self.set("background-position", &value);
        }
    }
}

/// Inline style with shorthands expanded like stylesheet rules
fn expand_inline(style: &CssStyleDeclaration) -> CssStyleDeclaration {
    if style.is_empty() {
        return CssStyleDeclaration::new();
    }
    match CssParser::new().parse_declarations(&style.css_text()) {
        Ok(expanded) => expanded,
        Err(e) => {
            tracing::trace!("inline style kept as written: {e}");
            style.clone()
        }
    }
}

/// Cascade position of a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Precedence {
    important: bool,
    inline: bool,
    specificity: Specificity,
    order: (usize, usize),
}

/// Style resolver - computes styles for DOM elements
#[derive(Debug, Clone, Default)]
pub struct StyleResolver {
    sheets: Vec<Stylesheet>,
}

impl StyleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an author stylesheet
    pub fn add_stylesheet(&mut self, sheet: Stylesheet) {
        self.sheets.push(sheet);
    }

    /// Parse and add an author stylesheet
    pub fn add_css(&mut self, css: &str) -> CssResult<()> {
        let sheet = CssParser::new().parse(css)?;
        self.add_stylesheet(sheet);
        Ok(())
    }

    /// Collect stylesheets from the `<style>` elements of a tree
    pub fn from_document(tree: &DomTree) -> Self {
        let mut resolver = Self::new();
        for style in tree.query_selector_all(tree.root(), "style") {
            let css = tree.text_content(style);
            if let Err(e) = resolver.add_css(&css) {
                tracing::warn!("ignoring <style> {style}: {e}");
            }
        }
        resolver
    }

    pub fn stylesheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Compute the style of an element (`getComputedStyle`)
    pub fn compute_style(&self, tree: &DomTree, node: NodeId) -> ComputedStyle {
        let Some(elem) = tree.element(node) else {
            return ComputedStyle::default();
        };

        let mut style = ComputedStyle::default();
        if let Some(parent) = tree.parent(node).filter(|&p| tree.element(p).is_some()) {
            let inherited = self.compute_style(tree, parent);
            for name in INHERITED_PROPERTIES {
                if let Some(value) = inherited.get(name) {
                    style.set(name, value);
                }
            }
        }

        let inline = expand_inline(&elem.style);
        let mut matched: Vec<(Precedence, &str, &str)> = Vec::new();
        for (sheet_idx, sheet) in self.sheets.iter().enumerate() {
            for (rule_idx, rule) in sheet.rules.iter().enumerate() {
                let Some(specificity) = rule
                    .selectors
                    .0
                    .iter()
                    .filter(|sel| tree.matches_selector(node, sel))
                    .map(|sel| sel.specificity())
                    .max()
                else {
                    continue;
                };
                for decl in rule.declarations.iter() {
                    let precedence = Precedence {
                        important: decl.important,
                        inline: false,
                        specificity,
                        order: (sheet_idx, rule_idx),
                    };
                    matched.push((precedence, &decl.name, &decl.value));
                }
            }
        }
        for (i, decl) in inline.iter().enumerate() {
            let precedence = Precedence {
                important: decl.important,
                inline: true,
                specificity: Specificity::default(),
                order: (usize::MAX, i),
            };
            matched.push((precedence, &decl.name, &decl.value));
        }

        matched.sort_by(|a, b| a.0.cmp(&b.0));
        for (_, name, value) in matched {
            style.set(name, value);
        }
        style.add_shorthands();
        style
    }
}
