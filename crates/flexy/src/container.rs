//! Container
//!
//! The root scaling boundary. The mounted root gets a unique class; one style
//! block scoped to that class carries the fit transform and the page-level
//! rules the design needs.

use std::fmt;

use flexy_css::{StyleBlock, StyleResolver};
use flexy_dom::{DomTree, NodeId};
use serde::{Deserialize, Serialize};

use crate::fit::{self, FitGeometry, FitMode};
use crate::{Window, CONTAINER_ATTR, LIST_ATTR};

/// `backgroundColor` option: a color, or `"auto"` to take the design's own
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BackgroundColor {
    Auto,
    Color(String),
}

impl From<String> for BackgroundColor {
    fn from(value: String) -> Self {
        if value == "auto" {
            Self::Auto
        } else {
            Self::Color(value)
        }
    }
}

impl From<BackgroundColor> for String {
    fn from(value: BackgroundColor) -> Self {
        match value {
            BackgroundColor::Auto => "auto".to_string(),
            BackgroundColor::Color(c) => c,
        }
    }
}

/// `overflow` option of the `[flexy-container]` element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    Auto,
    Hidden,
    Scroll,
    Visible,
    Initial,
}

impl fmt::Display for Overflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Hidden => "hidden",
            Self::Scroll => "scroll",
            Self::Visible => "visible",
            Self::Initial => "initial",
        })
    }
}

/// Container configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerOptions {
    pub fit: Option<FitMode>,
    pub adjust_text_size: bool,
    pub adjust_inline_svg_size: bool,
    pub background_color: Option<BackgroundColor>,
    pub border_color: Option<String>,
    pub overflow: Option<Overflow>,
}

impl ContainerOptions {
    pub fn fit(mut self, mode: FitMode) -> Self {
        self.fit = Some(mode);
        self
    }

    pub fn background_color(mut self, color: BackgroundColor) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn border_color(mut self, color: impl Into<String>) -> Self {
        self.border_color = Some(color.into());
        self
    }

    pub fn overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = Some(overflow);
        self
    }

    pub fn adjust_text_size(mut self, on: bool) -> Self {
        self.adjust_text_size = on;
        self
    }

    pub fn adjust_inline_svg_size(mut self, on: bool) -> Self {
        self.adjust_inline_svg_size = on;
        self
    }
}

/// State of the mounted container
#[derive(Debug, Clone, Default)]
pub struct ContainerState {
    /// Mounted root element
    pub root: Option<NodeId>,
    /// Unique class added to the root
    pub class_name: Option<String>,
    pub options: ContainerOptions,
    /// Last fit computation; `None` without a viewport or container box
    pub geometry: Option<FitGeometry>,
    /// Scale applied through `transform`
    pub scale: Option<f64>,
    /// Background of the `[flexy-container]` element, for `"auto"`
    pub auto_background: Option<String>,
}

impl ContainerState {
    pub fn is_mounted(&self) -> bool {
        self.root.is_some()
    }

    /// Recompute fit, background and svg sizes against the current tree
    pub(crate) fn refresh(&mut self, tree: &mut DomTree, window: &Window, resolver: &StyleResolver) {
        let Some(root) = self.root else {
            return;
        };

        self.geometry = window.viewport.and_then(|vp| fit::measure(tree, root, vp));
        self.scale = match (self.options.fit, self.geometry) {
            (Some(mode), Some(geometry)) => Some(geometry.scale_for(mode)),
            _ => None,
        };
        if self.options.background_color == Some(BackgroundColor::Auto) {
            self.auto_background = fit::find_container(tree, root)
                .and_then(|container| background_of(tree, resolver, container));
        }
        if self.options.adjust_inline_svg_size {
            adjust_inline_svg_size(tree, root);
        }
        tracing::trace!(
            "container refreshed: scale={:?} background={:?}",
            self.scale,
            self.auto_background
        );
    }

    /// Style block for the current state
    pub fn style_block(&self) -> Option<StyleBlock> {
        let class = self.class_name.as_deref()?;
        let options = &self.options;
        let mut block = StyleBlock::new(class);

        let background = match &options.background_color {
            Some(BackgroundColor::Color(c)) => Some(c.clone()),
            Some(BackgroundColor::Auto) => self.auto_background.clone(),
            None => None,
        };
        if let Some(color) = background {
            block.global("body").decl("background-color", color);
        }
        if let Some(overflow) = options.overflow {
            block
                .global(&format!("[{CONTAINER_ATTR}]"))
                .important("overflow", overflow.to_string());
        }
        if let Some(scale) = self.scale {
            block.rule("&").decl("transform", format!("scale({scale})"));
        }
        if let Some(color) = &options.border_color {
            block
                .rule(&format!("& > [{CONTAINER_ATTR}]"))
                .decl("border-left", format!("1px solid {color}"))
                .decl("border-right", format!("1px solid {color}"));
        }
        if options.adjust_text_size {
            block
                .rule("&, & *")
                .decl("-webkit-text-size-adjust", "none")
                .decl("text-size-adjust", "none");
        }

        let marked = format!("[{LIST_ATTR}], [{CONTAINER_ATTR}]");
        block
            .global(&marked)
            .decl("user-select", "none")
            .decl("scrollbar-width", "none")
            .decl("-ms-overflow-style", "none");
        block
            .global(&format!(
                "[{LIST_ATTR}]::-webkit-scrollbar, [{CONTAINER_ATTR}]::-webkit-scrollbar"
            ))
            .decl("display", "none")
            .decl("width", "0");
        block
            .global(&format!(
                "[{LIST_ATTR}]::-webkit-scrollbar-button, [{CONTAINER_ATTR}]::-webkit-scrollbar-button"
            ))
            .decl("display", "none");
        Some(block)
    }
}

/// Computed background color, ignoring fully transparent values
fn background_of(tree: &DomTree, resolver: &StyleResolver, node: NodeId) -> Option<String> {
    let style = resolver.compute_style(tree, node);
    let color = style.get("background-color")?;
    let transparent = matches!(color, "transparent" | "none" | "rgba(0, 0, 0, 0)" | "#0000");
    (!transparent).then(|| color.to_string())
}

/// Give inline `<svg>`s with a `viewBox` but no size explicit
/// `width`/`height` attributes taken from the `viewBox`
pub fn adjust_inline_svg_size(tree: &mut DomTree, root: NodeId) -> usize {
    let mut adjusted = 0;
    for svg in tree.query_selector_all(root, "svg") {
        let Some(elem) = tree.element(svg) else {
            continue;
        };
        if elem.has_attr("width") || elem.has_attr("height") {
            continue;
        }
        let Some((width, height)) = elem.attr("viewbox").and_then(parse_view_box) else {
            continue;
        };
        let sized = tree
            .set_attribute(svg, "width", &width.to_string())
            .and_then(|_| tree.set_attribute(svg, "height", &height.to_string()));
        if sized.is_ok() {
            adjusted += 1;
        }
    }
    adjusted
}

/// Width and height of a `viewBox="min-x min-y width height"`
fn parse_view_box(value: &str) -> Option<(f64, f64)> {
    let parts: Vec<f64> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        [_, _, w, h] if *w > 0.0 && *h > 0.0 => Some((*w, *h)),
        _ => None,
    }
}
