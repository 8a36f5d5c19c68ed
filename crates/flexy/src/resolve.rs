//! Named-node lookup
//!
//! Design layers are addressed by `data-name`. Lookups are never cached: a
//! layer can be removed or replaced between passes, so every pass resolves
//! again.

use flexy_dom::{DomTree, NodeId, NAME_ATTR};

/// `[data-name="..."]` selector for a layer name
pub fn name_selector(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        if matches!(c, '"' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("[{NAME_ATTR}=\"{escaped}\"]")
}

/// First element under `root` named `name`, in document order.
///
/// `None` means "not ready": the root is not mounted yet or the layer does
/// not exist (yet).
pub fn select(tree: &DomTree, root: Option<NodeId>, name: &str) -> Option<NodeId> {
    let root = root?;
    tree.query_selector(root, &name_selector(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_selector_escapes() {
        assert_eq!(name_selector("Frame 1"), r#"[data-name="Frame 1"]"#);
        assert_eq!(name_selector(r#"a"b\c"#), r#"[data-name="a\"b\\c"]"#);
    }

    #[test]
    fn test_select() {
        let mut tree = DomTree::new();
        let root = tree.create_element("div");
        tree.append_child(NodeId::ROOT, root).unwrap();
        let layer = tree.create_element("div");
        tree.set_attribute(layer, NAME_ATTR, r#"Say "hi""#).unwrap();
        tree.append_child(root, layer).unwrap();

        assert_eq!(select(&tree, Some(root), r#"Say "hi""#), Some(layer));
        assert_eq!(select(&tree, None, r#"Say "hi""#), None);
        assert_eq!(select(&tree, Some(root), "Missing"), None);
    }
}
