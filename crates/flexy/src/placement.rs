//! Placement binders
//!
//! [`Floating`] pins a layer to a viewport edge once the design fits the
//! viewport's height, [`Fullsize`] stretches a layer across the viewport in
//! the constrained dimension, [`Deletion`] removes a layer. The first two
//! tag their layer with a unique class and re-derive their rules on resize.

use flexy_css::StyleBlock;
use flexy_dom::NodeId;
use serde::{Deserialize, Serialize};

use crate::fit::FitGeometry;
use crate::{Binder, Scope, Viewport};

/// Edge a floating layer snaps to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatPosition {
    #[default]
    Bottom,
}

/// Named layer tagged with a unique class
#[derive(Debug, Clone)]
struct Tagged {
    node: NodeId,
    class: String,
}

/// Tag the named layer and subscribe to resize; `None` while it is missing
fn tag(scope: &mut Scope<'_>, name: &str) -> Option<Tagged> {
    let node = scope.select(name)?;
    let class = scope.class_names.allocate();
    if let Err(e) = scope.tree.add_class(node, &class) {
        tracing::trace!("{name:?} not tagged: {e}");
        return None;
    }
    scope.window.subscribe(scope.key);
    Some(Tagged { node, class })
}

fn untag(scope: &mut Scope<'_>, tagged: Tagged) {
    scope.window.unsubscribe(scope.key);
    scope.styles.remove(scope.tree, &tagged.class);
    if scope.tree.remove_class(tagged.node, &tagged.class).is_err() {
        tracing::trace!("tagged node {} is gone", tagged.node);
    }
}

/// Pins a layer to the viewport edge
#[derive(Debug)]
pub struct Floating {
    name: String,
    position: FloatPosition,
    tagged: Option<Tagged>,
    floating: bool,
}

impl Floating {
    pub fn new(name: impl Into<String>, position: FloatPosition) -> Self {
        Self {
            name: name.into(),
            position,
            tagged: None,
            floating: false,
        }
    }

    pub fn bottom(name: impl Into<String>) -> Self {
        Self::new(name, FloatPosition::Bottom)
    }

    pub fn is_floating(&self) -> bool {
        self.floating
    }

    /// Unique class of the tagged layer
    pub fn class_name(&self) -> Option<&str> {
        self.tagged.as_ref().map(|t| t.class.as_str())
    }

    fn recompute(&mut self, scope: &mut Scope<'_>) {
        let Some(tagged) = &self.tagged else {
            return;
        };
        self.floating = scope.geometry().is_some_and(|g| g.is_floating());

        let mut block = StyleBlock::new(tagged.class.clone());
        if self.floating {
            match self.position {
                FloatPosition::Bottom => {
                    block
                        .rule("&")
                        .important("position", "fixed")
                        .decl("bottom", "0")
                        .important("top", "initial");
                }
            }
        }
        scope.styles.upsert(scope.tree, &block);
    }
}

impl Binder for Floating {
    fn update(&mut self, scope: &mut Scope<'_>) {
        if scope.root.is_none() {
            return;
        }
        if self.tagged.is_none() {
            self.tagged = tag(scope, &self.name);
        }
        self.recompute(scope);
    }

    fn resize(&mut self, scope: &mut Scope<'_>) {
        self.recompute(scope);
    }

    fn unmount(&mut self, scope: &mut Scope<'_>) {
        if let Some(tagged) = self.tagged.take() {
            untag(scope, tagged);
        }
        self.floating = false;
    }
}

/// Stretches a layer to cover the viewport
#[derive(Debug)]
pub struct Fullsize {
    name: String,
    tagged: Option<Tagged>,
}

impl Fullsize {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tagged: None,
        }
    }

    pub fn class_name(&self) -> Option<&str> {
        self.tagged.as_ref().map(|t| t.class.as_str())
    }

    /// Rules for one geometry. Narrow designs (scale below 1) are widened to
    /// the viewport and re-centred; otherwise the height is pinned.
    pub fn rules(block: &mut StyleBlock, geometry: FitGeometry, viewport: Viewport) {
        let rule = block.rule("&");
        if geometry.fit_scale < 1.0 {
            let updated_width = viewport.width * (1.0 / geometry.fit_scale);
            let margin_left =
                ((updated_width - geometry.current_width_px * (1.0 / geometry.fit_scale)) / 2.0) * -1.0;
            rule.important("width", format!("{updated_width}px"))
                .important("margin-left", format!("{margin_left}px"));
        } else {
            rule.important("height", format!("{}px", viewport.height));
        }
        rule.important("left", "initial").important("top", "initial");
    }

    fn recompute(&mut self, scope: &mut Scope<'_>) {
        let Some(tagged) = &self.tagged else {
            return;
        };
        let mut block = StyleBlock::new(tagged.class.clone());
        if let (Some(geometry), Some(viewport)) = (scope.geometry(), scope.window.viewport) {
            Self::rules(&mut block, geometry, viewport);
        }
        scope.styles.upsert(scope.tree, &block);
    }
}

impl Binder for Fullsize {
    fn update(&mut self, scope: &mut Scope<'_>) {
        if scope.root.is_none() {
            return;
        }
        if self.tagged.is_none() {
            self.tagged = tag(scope, &self.name);
        }
        self.recompute(scope);
    }

    fn resize(&mut self, scope: &mut Scope<'_>) {
        self.recompute(scope);
    }

    fn unmount(&mut self, scope: &mut Scope<'_>) {
        if let Some(tagged) = self.tagged.take() {
            untag(scope, tagged);
        }
    }
}

/// Removes a named layer
#[derive(Debug)]
pub struct Deletion {
    name: String,
    removed: usize,
}

impl Deletion {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            removed: 0,
        }
    }

    /// Number of nodes removed so far
    pub fn removed(&self) -> usize {
        self.removed
    }
}

impl Binder for Deletion {
    fn update(&mut self, scope: &mut Scope<'_>) {
        if let Some(node) = scope.select(&self.name) {
            scope.tree.detach(node);
            self.removed += 1;
            tracing::trace!("deleted {:?}", self.name);
        }
    }

    fn unmount(&mut self, _scope: &mut Scope<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexy_dom::ClientBox;

    #[test]
    fn test_fullsize_narrow_design() {
        let viewport = Viewport::new(1000.0, 1000.0);
        let geometry = FitGeometry::compute(ClientBox::new(400.0, 800.0), viewport).unwrap();
        let mut block = StyleBlock::new("uc");
        Fullsize::rules(&mut block, geometry, viewport);

        assert_eq!(
            block.to_css(),
            ".uc { width: 2000px !important; margin-left: -500px !important; \
             left: initial !important; top: initial !important; }"
        );
    }

    #[test]
    fn test_fullsize_wide_design() {
        let viewport = Viewport::new(1000.0, 500.0);
        let geometry = FitGeometry::compute(ClientBox::new(1000.0, 250.0), viewport).unwrap();
        assert_eq!(geometry.fit_scale, 2.0);
        let mut block = StyleBlock::new("uc");
        Fullsize::rules(&mut block, geometry, viewport);

        assert_eq!(
            block.to_css(),
            ".uc { height: 500px !important; left: initial !important; top: initial !important; }"
        );
    }
}
