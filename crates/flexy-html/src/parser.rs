//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts the result into the arena tree.
//! Whitespace-only text between elements is dropped; design exports are
//! indented heavily and the overlay never needs those nodes.

use std::io::Read;

use flexy_dom::{DomResult, DomTree, ElementData, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::HtmlResult;

/// HTML5 parser
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse an HTML string into a new tree
    pub fn parse(&self, html: &str) -> DomTree {
        let dom = parse_document(RcDom::default(), Default::default()).one(html);
        self.build(&dom)
    }

    /// Parse UTF-8 HTML from a reader
    pub fn parse_reader<R: Read>(&self, reader: &mut R) -> HtmlResult<DomTree> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(reader)?;
        Ok(self.build(&dom))
    }

    /// Parse a markup fragment as `<body>` content and append the resulting
    /// nodes to `parent`. Returns the top-level nodes that were appended.
    pub fn parse_fragment_into(
        &self,
        tree: &mut DomTree,
        parent: NodeId,
        html: &str,
    ) -> DomResult<Vec<NodeId>> {
        let wrapped = format!("<!DOCTYPE html><html><head></head><body>{html}</body></html>");
        let dom = parse_document(RcDom::default(), Default::default()).one(wrapped);
        let Some(body) = find_element(&dom.document, "body") else {
            return Ok(Vec::new());
        };

        let mut added = Vec::new();
        for child in body.children.borrow().iter() {
            if let Some(id) = self.convert_node(child, tree, parent)? {
                added.push(id);
            }
        }
        tracing::trace!("parsed fragment into {} top-level nodes", added.len());
        Ok(added)
    }

    fn build(&self, dom: &RcDom) -> DomTree {
        let mut tree = DomTree::new();
        for child in dom.document.children.borrow().iter() {
            if let Err(e) = self.convert_node(child, &mut tree, NodeId::ROOT) {
                tracing::warn!("dropping node while building tree: {e}");
            }
        }
        tracing::debug!("parsed {} nodes", tree.len());
        tree
    }

    /// Convert an RcDom node (and its subtree) under `parent`
    fn convert_node(
        &self,
        handle: &Handle,
        tree: &mut DomTree,
        parent: NodeId,
    ) -> DomResult<Option<NodeId>> {
        let id = match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent)?;
                }
                return Ok(None);
            }
            RcNodeData::Doctype { name, .. } => tree.create_doctype(name),
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if text.trim().is_empty() {
                    return Ok(None);
                }
                tree.create_text(&text)
            }
            RcNodeData::Comment { contents } => tree.create_comment(contents),
            RcNodeData::Element {
                name,
                attrs,
                template_contents,
                ..
            } => {
                let mut elem = ElementData::new(&name.local);
                for attr in attrs.borrow().iter() {
                    elem.set_attr(&attr.name.local, &attr.value);
                }
                let id = tree.create_element_with(elem);
                tree.append_child(parent, id)?;

                // <template> keeps its markup in a separate fragment
                if let Some(contents) = template_contents.borrow().as_ref() {
                    for child in contents.children.borrow().iter() {
                        self.convert_node(child, tree, id)?;
                    }
                }
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, id)?;
                }
                return Ok(Some(id));
            }
            RcNodeData::ProcessingInstruction { .. } => return Ok(None),
        };
        tree.append_child(parent, id)?;
        Ok(Some(id))
    }
}

fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    for child in handle.children.borrow().iter() {
        if let RcNodeData::Element { name, .. } = &child.data {
            if &*name.local == tag {
                return Some(child.clone());
            }
        }
        if let Some(found) = find_element(child, tag) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let tree = HtmlParser::new().parse("<html><body><p>Hello</p></body></html>");
        let p = tree.query_selector(NodeId::ROOT, "p").unwrap();
        assert_eq!(tree.text_content(p), "Hello");
    }

    #[test]
    fn test_attributes_are_kept() {
        let tree = HtmlParser::new()
            .parse(r#"<div data-name="Frame 1" class="a b" style="width: 10px"></div>"#);
        let frame = tree.query_selector(NodeId::ROOT, r#"[data-name="Frame 1"]"#).unwrap();
        let elem = tree.element(frame).unwrap();
        assert!(elem.class_list.contains("b"));
        assert_eq!(elem.style.get_property_value("width"), Some("10px"));
    }

    #[test]
    fn test_fragment_into_parent() {
        let mut tree = DomTree::new();
        let host = tree.create_element("div");
        tree.append_child(NodeId::ROOT, host).unwrap();

        let added = HtmlParser::new()
            .parse_fragment_into(&mut tree, host, "<span>a</span><span>b</span>")
            .unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(tree.child_ids(host), added);
        assert_eq!(tree.text_content(host), "ab");
    }

    #[test]
    fn test_whitespace_text_dropped() {
        let tree = HtmlParser::new().parse("<body>\n  <div></div>\n</body>");
        let body = tree.query_selector(NodeId::ROOT, "body").unwrap();
        assert_eq!(tree.child_ids(body).len(), 1);
    }

    #[test]
    fn test_parse_reader() {
        let mut bytes: &[u8] = b"<div id=\"x\"></div>";
        let tree = HtmlParser::new().parse_reader(&mut bytes).unwrap();
        assert!(tree.query_selector(NodeId::ROOT, "#x").is_some());
    }
}
