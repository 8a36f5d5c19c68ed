//! flexy CSS
//!
//! - [`StyleBlock`]: rules scoped to one element through its unique class
//! - [`CssParser`]: stylesheet text to matchable rules, validated by
//!   lightningcss
//! - [`StyleResolver`]: cascade + inheritance, the `getComputedStyle` the
//!   overlay needs

mod block;
mod parser;
mod resolver;

pub use block::{StyleBlock, StyleRule};
pub use parser::{minify, normalize, CssParser, Rule, Stylesheet};
pub use resolver::{ComputedStyle, StyleResolver, INHERITED_PROPERTIES};

/// Result type for CSS operations
pub type CssResult<T> = Result<T, CssError>;

/// CSS errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CssError {
    #[error("CSS parse error: {0}")]
    Parse(String),

    #[error("CSS print error: {0}")]
    Print(String),
}
