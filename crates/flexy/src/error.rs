//! Runtime errors

use flexy_dom::DomError;

/// Result type for fallible runtime entry points
pub type FlexyResult<T> = Result<T, FlexyError>;

/// Errors from mounting, stylesheet loading and configuration.
///
/// Binder passes never produce these; a binder that cannot find its nodes
/// simply waits for the next pass.
#[derive(Debug, thiserror::Error)]
pub enum FlexyError {
    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Html(#[from] flexy_html::HtmlError),

    #[error(transparent)]
    Css(#[from] flexy_css::CssError),

    #[error("invalid overlay config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("container is not mounted")]
    NotMounted,
}
