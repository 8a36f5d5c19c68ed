//! Injected style blocks
//!
//! Each scoped [`StyleBlock`] becomes one `<style data-flexy-scope="...">`
//! element. Blocks are upserted in place so the element count stays equal
//! to the number of live scopes.

use std::collections::BTreeMap;

use flexy_css::StyleBlock;
use flexy_dom::{DomTree, NodeId};

/// Attribute identifying an injected style element
pub const SCOPE_ATTR: &str = "data-flexy-scope";

/// Live `<style>` elements keyed by scope class
#[derive(Debug, Default)]
pub struct StyleRegistry {
    host: Option<NodeId>,
    blocks: BTreeMap<String, NodeId>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Element new style blocks are appended to
    pub fn host(&self) -> Option<NodeId> {
        self.host
    }

    pub fn set_host(&mut self, host: Option<NodeId>) {
        self.host = host;
    }

    /// Insert or replace the block for `block.scope()`. An empty block
    /// removes it.
    pub fn upsert(&mut self, tree: &mut DomTree, block: &StyleBlock) {
        if block.is_empty() {
            self.remove(tree, block.scope());
            return;
        }
        let css = block.to_css();
        if let Err(e) = flexy_css::normalize(&css) {
            tracing::warn!("style block {} does not validate: {e}", block.scope());
        }

        let node = match self.blocks.get(block.scope()) {
            Some(&node) => node,
            None => {
                let Some(host) = self.host else {
                    tracing::trace!("no style host for {}", block.scope());
                    return;
                };
                let node = tree.create_element("style");
                if let Err(e) = tree
                    .set_attribute(node, SCOPE_ATTR, block.scope())
                    .and_then(|_| tree.append_child(host, node))
                {
                    tracing::trace!("style block {} not injected: {e}", block.scope());
                    return;
                }
                self.blocks.insert(block.scope().to_string(), node);
                node
            }
        };
        if tree.text_content(node) != css {
            if let Err(e) = tree.set_text_content(node, &css) {
                tracing::trace!("style block {} not updated: {e}", block.scope());
            }
        }
    }

    /// Remove the block of a scope
    pub fn remove(&mut self, tree: &mut DomTree, scope: &str) -> bool {
        match self.blocks.remove(scope) {
            Some(node) => {
                tree.detach(node);
                true
            }
            None => false,
        }
    }

    /// Remove every block
    pub fn clear(&mut self, tree: &mut DomTree) {
        for (_, node) in std::mem::take(&mut self.blocks) {
            tree.detach(node);
        }
    }

    /// Injected CSS of a scope
    pub fn css(&self, tree: &DomTree, scope: &str) -> Option<String> {
        self.blocks.get(scope).map(|&node| tree.text_content(node))
    }

    /// Style element of a scope
    pub fn node(&self, scope: &str) -> Option<NodeId> {
        self.blocks.get(scope).copied()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> (DomTree, StyleRegistry, NodeId) {
        let mut tree = DomTree::new();
        let head = tree.create_element("head");
        tree.append_child(NodeId::ROOT, head).unwrap();
        let mut styles = StyleRegistry::new();
        styles.set_host(Some(head));
        (tree, styles, head)
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let (mut tree, mut styles, head) = registry();
        let mut block = StyleBlock::new("uc");
        block.rule("&").decl("transform", "scale(0.5)");
        styles.upsert(&mut tree, &block);

        let mut block = StyleBlock::new("uc");
        block.rule("&").decl("transform", "scale(2)");
        styles.upsert(&mut tree, &block);

        assert_eq!(styles.len(), 1);
        assert_eq!(tree.child_ids(head).len(), 1);
        assert_eq!(styles.css(&tree, "uc").as_deref(), Some(".uc { transform: scale(2); }"));
    }

    #[test]
    fn test_empty_block_removes() {
        let (mut tree, mut styles, head) = registry();
        let mut block = StyleBlock::new("uc");
        block.rule("&").decl("bottom", "0");
        styles.upsert(&mut tree, &block);
        styles.upsert(&mut tree, &StyleBlock::new("uc"));

        assert!(styles.is_empty());
        assert!(tree.child_ids(head).is_empty());
    }

    #[test]
    fn test_without_host_nothing_is_injected() {
        let mut tree = DomTree::new();
        let mut styles = StyleRegistry::new();
        let mut block = StyleBlock::new("uc");
        block.rule("&").decl("bottom", "0");
        styles.upsert(&mut tree, &block);
        assert!(styles.is_empty());
    }
}
