//! flexy DOM - Document Object Model
//!
//! Arena-backed DOM tree for design exports. Layers exported from a design
//! tool are addressed by their `data-name` attribute; everything else here is
//! the small slice of the DOM the overlay engine needs: attributes, class
//! lists, inline style, expando properties, event listeners and client-box
//! geometry.

mod classlist;
mod events;
mod geometry;
mod node;
mod operations;
mod query;
mod style;
mod tree;

pub use classlist::DOMTokenList;
pub use events::{handler, DomEvent, EventHandler, Listener};
pub use geometry::{parse_px, ClientBox};
pub use node::{ElementData, Node, NodeData, PropValue};
pub use operations::{DomError, DomResult};
pub use query::{AttrOp, Combinator, Compound, Selector, SelectorList, SimpleSelector, Specificity};
pub use style::{to_kebab_case, CssStyleDeclaration, StyleEntry};
pub use tree::{Children, Descendants, DomTree};

/// Attribute carrying a design layer's name
pub const NAME_ATTR: &str = "data-name";

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Document node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node" in sibling/parent links
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn option(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
