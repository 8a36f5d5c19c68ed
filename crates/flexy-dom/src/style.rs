//! Inline style (CSSStyleDeclaration)
//!
//! Ordered `property: value [!important]` entries of a `style` attribute.
//! Property names are stored kebab-case; camelCase names (as used by
//! `element.style.fontSize`) are accepted and converted.

/// A single inline style entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleEntry {
    pub name: String,
    pub value: String,
    pub important: bool,
}

/// Inline style declaration block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssStyleDeclaration {
    entries: Vec<StyleEntry>,
}

impl CssStyleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `style` attribute value
    pub fn parse(css_text: &str) -> Self {
        let mut decl = Self::new();
        decl.set_css_text(css_text);
        decl
    }

    /// Replace all entries from a `style` attribute value
    pub fn set_css_text(&mut self, css_text: &str) {
        self.entries.clear();
        for part in split_declarations(css_text) {
            let Some((name, value)) = part.split_once(':') else {
                continue;
            };
            let name = name.trim();
            let mut value = value.trim();
            let mut important = false;
            if let Some(stripped) = value.strip_suffix("!important") {
                value = stripped.trim_end();
                important = true;
            }
            if name.is_empty() || value.is_empty() {
                continue;
            }
            self.set_property_with_priority(name, value, important);
        }
    }

    /// Serialize back to `style` attribute syntax
    pub fn css_text(&self) -> String {
        self.entries
            .iter()
            .map(|e| {
                if e.important {
                    format!("{}: {} !important;", e.name, e.value)
                } else {
                    format!("{}: {};", e.name, e.value)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Get a property value
    pub fn get_property_value(&self, name: &str) -> Option<&str> {
        let name = to_kebab_case(name);
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value.as_str())
    }

    /// Set a property (empty value removes it, like the DOM)
    pub fn set_property(&mut self, name: &str, value: &str) {
        self.set_property_with_priority(name, value, false);
    }

    /// Set a property with `!important` priority
    pub fn set_property_with_priority(&mut self, name: &str, value: &str, important: bool) {
        let name = to_kebab_case(name);
        if value.is_empty() {
            self.remove_property(&name);
            return;
        }
        if let Some(entry) = self.entries.iter_mut().find(|e| e.name == name) {
            entry.value = value.to_string();
            entry.important = important;
        } else {
            self.entries.push(StyleEntry {
                name,
                value: value.to_string(),
                important,
            });
        }
    }

    /// Remove a property, returning its old value
    pub fn remove_property(&mut self, name: &str) -> Option<String> {
        let name = to_kebab_case(name);
        let pos = self.entries.iter().position(|e| e.name == name)?;
        Some(self.entries.remove(pos).value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleEntry> {
        self.entries.iter()
    }
}

/// Split a declaration block on `;`, ignoring separators inside quotes or
/// parentheses (`url(data:...;base64,...)`).
pub(crate) fn split_declarations(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts.into_iter().filter(|p| !p.trim().is_empty()).collect()
}

/// Convert camelCase to kebab-case (`backgroundColor` -> `background-color`).
/// Custom properties and names already in kebab-case pass through.
pub fn to_kebab_case(s: &str) -> String {
    if s.starts_with("--") {
        return s.to_string();
    }
    let mut result = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        if c.is_ascii_uppercase() {
            result.push('-');
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_serialize() {
        let style = CssStyleDeclaration::parse("width: 400px; height:800px ; color: red !important");
        assert_eq!(style.len(), 3);
        assert_eq!(style.get_property_value("width"), Some("400px"));
        assert_eq!(style.get_property_value("height"), Some("800px"));
        assert_eq!(
            style.css_text(),
            "width: 400px; height: 800px; color: red !important;"
        );
    }

    #[test]
    fn test_camel_case_access() {
        let mut style = CssStyleDeclaration::new();
        style.set_property("backgroundColor", "#fff");
        assert_eq!(style.get_property_value("background-color"), Some("#fff"));
        assert_eq!(style.get_property_value("backgroundColor"), Some("#fff"));
    }

    #[test]
    fn test_empty_value_removes() {
        let mut style = CssStyleDeclaration::parse("visibility: hidden");
        style.set_property("visibility", "");
        assert!(style.is_empty());
    }

    #[test]
    fn test_split_ignores_nested_semicolons() {
        let parts = split_declarations("background: url(data:image/png;base64,AA); top: 0");
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn test_kebab_case() {
        assert_eq!(to_kebab_case("letterSpacing"), "letter-spacing");
        assert_eq!(to_kebab_case("font-size"), "font-size");
        assert_eq!(to_kebab_case("--brandColor"), "--brandColor");
    }
}
