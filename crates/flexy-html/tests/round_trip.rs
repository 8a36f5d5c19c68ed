//! Parse/serialize tests for design-export markup

use flexy_dom::{DomTree, NodeId};
use flexy_html::{inner_html, outer_html, parse, set_inner_html, HtmlParser, TrustedHtml};

const EXPORT: &str = r#"<!DOCTYPE html>
<html>
  <head><style>.frame { width: 400px; }</style></head>
  <body>
    <div data-name="Frame 1" class="frame" style="width: 400px; height: 800px">
      <div data-name="Title">Hello</div>
      <div data-name="List">
        <div data-name="Item" class="item"><span data-name="Label">One</span></div>
      </div>
    </div>
  </body>
</html>"#;

#[test]
fn test_export_structure() {
    let tree = parse(EXPORT);
    let frame = tree.query_selector(NodeId::ROOT, r#"[data-name="Frame 1"]"#).unwrap();
    let title = tree.query_selector(frame, r#"[data-name="Title"]"#).unwrap();
    assert_eq!(tree.text_content(title), "Hello");
    assert_eq!(tree.client_box(frame).map(|b| b.height), Some(800.0));
}

#[test]
fn test_template_html_reparses_to_same_markup() {
    let tree = parse(EXPORT);
    let item = tree.query_selector(NodeId::ROOT, r#"[data-name="Item"]"#).unwrap();
    let html = outer_html(&tree, item);

    let mut target = DomTree::new();
    let host = target.create_element("div");
    target.append_child(NodeId::ROOT, host).unwrap();
    set_inner_html(&mut target, host, &TrustedHtml::assume_sanitized(html.clone())).unwrap();

    assert_eq!(inner_html(&target, host), html);
}

#[test]
fn test_set_inner_html_replaces_children() {
    let mut tree = DomTree::new();
    let host = tree.create_element("div");
    tree.append_child(NodeId::ROOT, host).unwrap();
    let old = tree.create_text("old");
    tree.append_child(host, old).unwrap();

    let added = set_inner_html(&mut tree, host, &TrustedHtml::assume_sanitized("<b>new</b>")).unwrap();
    assert_eq!(added.len(), 1);
    assert_eq!(tree.text_content(host), "new");
    assert_eq!(tree.parent(old), None);
}

#[test]
fn test_set_inner_html_on_text_node_fails() {
    let mut tree = DomTree::new();
    let text = tree.create_text("x");
    assert!(set_inner_html(&mut tree, text, &TrustedHtml::assume_sanitized("<b></b>")).is_err());
}

#[test]
fn test_empty_fragment() {
    let mut tree = DomTree::new();
    let host = tree.create_element("div");
    let added = HtmlParser::new().parse_fragment_into(&mut tree, host, "").unwrap();
    assert!(added.is_empty());
}
