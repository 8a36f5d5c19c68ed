//! flexy HTML
//!
//! HTML5 parsing built on html5ever, plus the serializer behind
//! `innerHTML`/`outerHTML`. Design exports arrive as full documents; list
//! items arrive as markup fragments produced from a template.

mod parser;
mod serializer;

pub use parser::HtmlParser;
pub use serializer::{inner_html, outer_html, HtmlSerializer};

use flexy_dom::{DomTree, NodeId};

/// Result type for HTML operations
pub type HtmlResult<T> = Result<T, HtmlError>;

/// HTML errors
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Dom(#[from] flexy_dom::DomError),
}

/// Parse an HTML document into a fresh tree
pub fn parse(html: &str) -> DomTree {
    HtmlParser::new().parse(html)
}

/// Markup that may be assigned through [`set_inner_html`].
///
/// Raw markup is only ever accepted through this wrapper so that the call
/// site has to state where the markup came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedHtml(String);

impl TrustedHtml {
    /// Wrap markup the caller vouches for (for example, a serialized
    /// template from the same document)
    pub fn assume_sanitized(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Replace the children of `node` with the parsed fragment
/// (`element.innerHTML = html`). Returns the new child IDs.
pub fn set_inner_html(tree: &mut DomTree, node: NodeId, html: &TrustedHtml) -> HtmlResult<Vec<NodeId>> {
    tree.element(node)
        .ok_or(flexy_dom::DomError::InvalidNodeType(node))?;
    tree.clear_children(node);
    Ok(HtmlParser::new().parse_fragment_into(tree, node, html.as_str())?)
}
