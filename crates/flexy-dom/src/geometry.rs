//! Geometry
//!
//! Client box of an element. Layout is done by the host; it reports sizes
//! through [`DomTree::set_client_box`](crate::DomTree::set_client_box).
//! Design exports usually pin frames with inline `width`/`height` in pixels,
//! which is used when the host has not reported anything.

use crate::CssStyleDeclaration;

/// Client box (content + padding, no scrollbar)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClientBox {
    pub width: f64,
    pub height: f64,
}

impl ClientBox {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Derive from inline `width`/`height` pixel values
    pub fn from_inline_style(style: &CssStyleDeclaration) -> Option<Self> {
        let width = parse_px(style.get_property_value("width")?)?;
        let height = parse_px(style.get_property_value("height")?)?;
        Some(Self { width, height })
    }

    /// A box with no area cannot express an aspect ratio
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Parse `"12px"` or a bare number
pub fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_inline_style() {
        let style = CssStyleDeclaration::parse("width: 400px; height: 800px");
        assert_eq!(
            ClientBox::from_inline_style(&style),
            Some(ClientBox::new(400.0, 800.0))
        );
    }

    #[test]
    fn test_relative_units_are_ignored() {
        let style = CssStyleDeclaration::parse("width: 100%; height: 800px");
        assert_eq!(ClientBox::from_inline_style(&style), None);
    }

    #[test]
    fn test_parse_px() {
        assert_eq!(parse_px("12.5px"), Some(12.5));
        assert_eq!(parse_px(" 3 "), Some(3.0));
        assert_eq!(parse_px("auto"), None);
    }
}
