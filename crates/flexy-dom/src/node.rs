//! DOM Node
//!
//! Nodes are linked through [`NodeId`]s rather than pointers, the same way
//! the arena hands them out. `class` and `style` are kept structured
//! (`classList`, `style`) and reflected back when attributes are read.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ClientBox, CssStyleDeclaration, DOMTokenList, Listener, NodeId};

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if detached or document)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// DOCTYPE
    Doctype { name: String },
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
}

/// Element-specific data
#[derive(Debug, Default)]
pub struct ElementData {
    /// Lower-case tag name
    pub tag: String,
    /// Attributes other than `class` and `style`, in insertion order.
    /// Names are stored lower-case and matched case-insensitively.
    attrs: Vec<(String, String)>,
    /// `class` attribute
    pub class_list: DOMTokenList,
    /// `style` attribute
    pub style: CssStyleDeclaration,
    /// Expando properties assigned through the property API
    pub properties: BTreeMap<String, PropValue>,
    /// Host-reported client box
    pub client_box: Option<ClientBox>,
    pub(crate) listeners: Vec<Listener>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<String> {
        match name {
            "class" if !self.class_list.is_empty() => Some(self.class_list.value()),
            "class" => None,
            "style" if !self.style.is_empty() => Some(self.style.css_text()),
            "style" => None,
            _ => self
                .attrs
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.clone()),
        }
    }

    /// Borrow a plain (non class/style) attribute
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Check attribute presence
    pub fn has_attr(&self, name: &str) -> bool {
        match name {
            "class" => !self.class_list.is_empty(),
            "style" => !self.style.is_empty(),
            _ => self.attrs.iter().any(|(n, _)| n.eq_ignore_ascii_case(name)),
        }
    }

    /// Set an attribute
    pub fn set_attr(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "class" => self.class_list.set_value(value),
            "style" => self.style.set_css_text(value),
            _ => {
                if let Some(slot) = self.attrs.iter_mut().find(|(n, _)| *n == name) {
                    slot.1 = value.to_string();
                } else {
                    self.attrs.push((name, value.to_string()));
                }
            }
        }
    }

    /// Remove an attribute, returns whether it was present
    pub fn remove_attr(&mut self, name: &str) -> bool {
        match name {
            "class" => {
                let had = !self.class_list.is_empty();
                self.class_list.set_value("");
                had
            }
            "style" => {
                let had = !self.style.is_empty();
                self.style.set_css_text("");
                had
            }
            _ => {
                let before = self.attrs.len();
                self.attrs.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
                self.attrs.len() != before
            }
        }
    }

    /// All attributes in serialization order: `class`, the rest, `style`
    pub fn attributes(&self) -> Vec<(String, String)> {
        let mut out = Vec::with_capacity(self.attrs.len() + 2);
        if !self.class_list.is_empty() {
            out.push(("class".to_string(), self.class_list.value()));
        }
        out.extend(self.attrs.iter().cloned());
        if !self.style.is_empty() {
            out.push(("style".to_string(), self.style.css_text()));
        }
        out
    }

    /// Registered listeners
    pub fn listeners(&self) -> &[Listener] {
        &self.listeners
    }

    /// Copy of this element without listeners (what `cloneNode` produces)
    pub(crate) fn shallow_clone(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            attrs: self.attrs.clone(),
            class_list: self.class_list.clone(),
            style: self.style.clone(),
            properties: BTreeMap::new(),
            client_box: self.client_box,
            listeners: Vec::new(),
        }
    }
}

/// Value assigned to a DOM property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl PropValue {
    /// JavaScript-style truthiness
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_and_style_reflect() {
        let mut elem = ElementData::new("DIV");
        elem.set_attr("class", "frame frame-1");
        elem.set_attr("style", "width: 10px");
        elem.set_attr("data-name", "Frame 1");

        assert_eq!(elem.tag, "div");
        assert!(elem.class_list.contains("frame-1"));
        assert_eq!(elem.get_attr("style").as_deref(), Some("width: 10px;"));
        assert_eq!(
            elem.attributes(),
            vec![
                ("class".to_string(), "frame frame-1".to_string()),
                ("data-name".to_string(), "Frame 1".to_string()),
                ("style".to_string(), "width: 10px;".to_string()),
            ]
        );
    }

    #[test]
    fn test_prop_value_untagged() {
        let values: Vec<PropValue> = serde_json::from_str(r#"[true, 2, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![PropValue::Bool(true), PropValue::Number(2.0), PropValue::from("x")]
        );
        assert!(!PropValue::Number(0.0).is_truthy());
    }
}
