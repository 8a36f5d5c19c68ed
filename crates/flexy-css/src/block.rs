//! Scoped style blocks
//!
//! A block belongs to one element, identified by a unique class. Selectors
//! use `&` for that element (`& > [flexy-container]`); a selector without
//! `&` is taken as a descendant of it. Global rules (`body`, `html`) are
//! emitted as written.

use flexy_dom::StyleEntry;

/// One rule of a [`StyleBlock`]
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub selector: String,
    pub declarations: Vec<StyleEntry>,
}

impl StyleRule {
    fn new(selector: String) -> Self {
        Self {
            selector,
            declarations: Vec::new(),
        }
    }

    /// Add a normal declaration
    pub fn decl(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.push(name, value.into(), false)
    }

    /// Add an `!important` declaration
    pub fn important(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.push(name, value.into(), true)
    }

    fn push(&mut self, name: &str, value: String, important: bool) -> &mut Self {
        self.declarations.push(StyleEntry {
            name: name.to_string(),
            value,
            important,
        });
        self
    }

    fn write_css(&self, out: &mut String) {
        out.push_str(&self.selector);
        out.push_str(" {");
        for decl in &self.declarations {
            out.push(' ');
            out.push_str(&decl.name);
            out.push_str(": ");
            out.push_str(&decl.value);
            if decl.important {
                out.push_str(" !important");
            }
            out.push(';');
        }
        out.push_str(" }");
    }
}

/// Rules scoped to one element
#[derive(Debug, Clone, PartialEq)]
pub struct StyleBlock {
    scope: String,
    rules: Vec<StyleRule>,
}

impl StyleBlock {
    /// Create a block for the element carrying class `scope`
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            rules: Vec::new(),
        }
    }

    /// The scoping class (without the dot)
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Expand `&` to the scope class
    pub fn scope_selector(&self, selector: &str) -> String {
        let class = format!(".{}", self.scope);
        if selector.contains('&') {
            selector.replace('&', &class)
        } else {
            format!("{class} {selector}")
        }
    }

    /// Start a rule for a scoped selector
    pub fn rule(&mut self, selector: &str) -> &mut StyleRule {
        let scoped = self.scope_selector(selector);
        self.rules.push(StyleRule::new(scoped));
        let last = self.rules.len() - 1;
        &mut self.rules[last]
    }

    /// Start a rule whose selector is used verbatim
    pub fn global(&mut self, selector: &str) -> &mut StyleRule {
        self.rules.push(StyleRule::new(selector.to_string()));
        let last = self.rules.len() - 1;
        &mut self.rules[last]
    }

    /// Rules with at least one declaration
    pub fn rules(&self) -> impl Iterator<Item = &StyleRule> {
        self.rules.iter().filter(|r| !r.declarations.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.rules().next().is_none()
    }

    /// Readable CSS text, one rule per line
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        for rule in self.rules() {
            if !out.is_empty() {
                out.push('\n');
            }
            rule.write_css(&mut out);
        }
        out
    }
}
