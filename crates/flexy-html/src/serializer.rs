//! HTML Serialization (innerHTML/outerHTML)

use flexy_dom::{DomTree, NodeData, NodeId};

/// Void elements (no end tag)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Raw text elements (no escaping for content)
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// HTML serializer
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSerializer;

impl HtmlSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Serialize innerHTML of a node (children only)
    pub fn serialize_inner(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        if is_raw_text(tree, node_id) {
            raw_text(tree, node_id, &mut output);
        } else {
            self.serialize_children(tree, node_id, &mut output);
        }
        output
    }

    /// Serialize outerHTML of a node (including the node itself)
    pub fn serialize_outer(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_node(tree, node_id, &mut output);
        output
    }

    fn serialize_node(&self, tree: &DomTree, node_id: NodeId, output: &mut String) {
        let Some(node) = tree.get(node_id) else {
            return;
        };

        match &node.data {
            NodeData::Document => self.serialize_children(tree, node_id, output),
            NodeData::Element(elem) => {
                let tag = elem.tag.as_str();

                output.push('<');
                output.push_str(tag);
                for (name, value) in elem.attributes() {
                    output.push(' ');
                    output.push_str(&name);
                    if !value.is_empty() {
                        output.push_str("=\"");
                        escape_attribute(&value, output);
                        output.push('"');
                    }
                }

                if VOID_ELEMENTS.contains(&tag) {
                    output.push_str(" />");
                    return;
                }
                output.push('>');

                if RAW_TEXT_ELEMENTS.contains(&tag) {
                    raw_text(tree, node_id, output);
                } else {
                    self.serialize_children(tree, node_id, output);
                }

                output.push_str("</");
                output.push_str(tag);
                output.push('>');
            }
            NodeData::Text(text) => escape_text(text, output),
            NodeData::Comment(text) => {
                output.push_str("<!--");
                output.push_str(text);
                output.push_str("-->");
            }
            NodeData::Doctype { name } => {
                output.push_str("<!DOCTYPE ");
                output.push_str(name);
                output.push('>');
            }
        }
    }

    fn serialize_children(&self, tree: &DomTree, parent: NodeId, output: &mut String) {
        for (child, _) in tree.children(parent) {
            self.serialize_node(tree, child, output);
        }
    }
}

fn is_raw_text(tree: &DomTree, node: NodeId) -> bool {
    tree.element(node)
        .is_some_and(|elem| RAW_TEXT_ELEMENTS.contains(&elem.tag.as_str()))
}

/// Text children as written
fn raw_text(tree: &DomTree, parent: NodeId, output: &mut String) {
    for (_, child) in tree.children(parent) {
        if let Some(text) = child.as_text() {
            output.push_str(text);
        }
    }
}

/// `element.innerHTML`
pub fn inner_html(tree: &DomTree, node: NodeId) -> String {
    HtmlSerializer::new().serialize_inner(tree, node)
}

/// `element.outerHTML`
pub fn outer_html(tree: &DomTree, node: NodeId) -> String {
    HtmlSerializer::new().serialize_outer(tree, node)
}

/// Escape text content for HTML
fn escape_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}

/// Escape attribute value
fn escape_attribute(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outer_html() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.set_attribute(div, "data-name", "Card \"A\"").unwrap();
        let img = tree.create_element("img");
        let text = tree.create_text("a < b");
        tree.append_child(div, img).unwrap();
        tree.append_child(div, text).unwrap();

        assert_eq!(
            outer_html(&tree, div),
            r#"<div data-name="Card &quot;A&quot;"><img />a &lt; b</div>"#
        );
    }

    #[test]
    fn test_style_content_is_raw() {
        let mut tree = DomTree::new();
        let style = tree.create_element("style");
        let css = tree.create_text(".a > .b { color: red }");
        tree.append_child(style, css).unwrap();
        assert_eq!(inner_html(&tree, style), ".a > .b { color: red }");
    }

    #[test]
    fn test_script_outer_and_inner_agree() {
        let mut tree = DomTree::new();
        let script = tree.create_element("script");
        let code = tree.create_text("if (a < b && c) {}");
        tree.append_child(script, code).unwrap();
        assert_eq!(inner_html(&tree, script), "if (a < b && c) {}");
        assert_eq!(outer_html(&tree, script), "<script>if (a < b && c) {}</script>");
    }

    #[test]
    fn test_inner_html_of_div_escapes_text() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let text = tree.create_text("a > b");
        tree.append_child(div, text).unwrap();
        assert_eq!(inner_html(&tree, div), "a &gt; b");
    }
}
