//! Fit-ratio engine
//!
//! A design is authored at a fixed aspect ratio. The `[flexy-container]`
//! element keeps that ratio in CSS (its height is expressed in `vw`), so
//! rendering it at the viewport's width and scaling by
//! `viewport height / rendered height` makes the whole design fit the
//! viewport's height.

use flexy_dom::{ClientBox, DomTree, NodeId};
use serde::{Deserialize, Serialize};

use crate::{Viewport, CONTAINER_ATTR};

/// Round to `digits` decimal places
pub fn round(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

/// Authored fit mode of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Design spans the viewport width; content scrolls
    Width,
    /// Design is scaled so its height fits the viewport
    Height,
}

/// Geometry of one fit computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitGeometry {
    /// Design height as a percentage of its width
    pub fit_height_vw: f64,
    /// Design height when rendered at the viewport's width
    pub current_height_px: f64,
    /// Design width when rendered at the viewport's height
    pub current_width_px: f64,
    /// Uniform scale that makes the design height equal the viewport height
    pub fit_scale: f64,
}

impl FitGeometry {
    /// Compute against a container box. `None` when the box or the
    /// viewport has no area.
    pub fn compute(container: ClientBox, viewport: Viewport) -> Option<Self> {
        if container.is_empty() || viewport.width <= 0.0 || viewport.height <= 0.0 {
            return None;
        }
        let fit_height_vw = round(container.height / container.width * 100.0, 4);
        let current_height_px = viewport.width * (fit_height_vw / 100.0);
        let current_width_px = viewport.height / (fit_height_vw / 100.0);
        let fit_scale = viewport.height / current_height_px;
        Some(Self {
            fit_height_vw,
            current_height_px,
            current_width_px,
            fit_scale,
        })
    }

    /// Scale applied to the container for a fit mode
    pub fn scale_for(&self, mode: FitMode) -> f64 {
        match mode {
            FitMode::Height => self.fit_scale,
            FitMode::Width => 1.0,
        }
    }

    /// Whether floating elements snap to the viewport edge
    pub fn is_floating(&self) -> bool {
        self.fit_scale >= 1.0
    }
}

/// `computeScale`: the fit scale of a container element in a viewport
pub fn compute_scale(tree: &DomTree, container: NodeId, viewport: Viewport) -> Option<f64> {
    let client = tree.client_box(container)?;
    FitGeometry::compute(client, viewport).map(|g| g.fit_scale)
}

/// The `[flexy-container]` element of a mounted root: the root itself when
/// it carries the marker, else the first marked descendant
pub fn find_container(tree: &DomTree, root: NodeId) -> Option<NodeId> {
    if tree
        .element(root)
        .is_some_and(|e| e.has_attr(CONTAINER_ATTR))
    {
        return Some(root);
    }
    tree.query_selector(root, &format!("[{CONTAINER_ATTR}]"))
}

/// Fit geometry of a mounted root in a viewport
pub fn measure(tree: &DomTree, root: NodeId, viewport: Viewport) -> Option<FitGeometry> {
    let container = find_container(tree, root)?;
    FitGeometry::compute(tree.client_box(container)?, viewport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round() {
        assert_eq!(round(66.666666, 4), 66.6667);
        assert_eq!(round(200.0, 4), 200.0);
    }

    #[test]
    fn test_portrait_design_in_square_viewport() {
        let g = FitGeometry::compute(ClientBox::new(400.0, 800.0), Viewport::new(1000.0, 1000.0))
            .unwrap();
        assert_eq!(g.fit_height_vw, 200.0);
        assert_eq!(g.current_height_px, 2000.0);
        assert_eq!(g.current_width_px, 500.0);
        assert_eq!(g.fit_scale, 0.5);
        assert!(!g.is_floating());
        assert_eq!(g.scale_for(FitMode::Width), 1.0);
    }

    #[test]
    fn test_empty_viewport_has_no_geometry() {
        let design = ClientBox::new(400.0, 800.0);
        assert!(FitGeometry::compute(design, Viewport::new(0.0, 800.0)).is_none());
        assert!(FitGeometry::compute(design, Viewport::new(1000.0, 0.0)).is_none());
        assert!(FitGeometry::compute(design, Viewport::new(-1.0, 800.0)).is_none());
    }

    #[test]
    fn test_scale_invariant_under_uniform_scaling() {
        let viewport = Viewport::new(1280.0, 720.0);
        let base = FitGeometry::compute(ClientBox::new(375.0, 812.0), viewport).unwrap();
        for k in [0.5, 2.0, 3.0, 10.0] {
            let scaled =
                FitGeometry::compute(ClientBox::new(375.0 * k, 812.0 * k), viewport).unwrap();
            assert_eq!(scaled.fit_scale, base.fit_scale);
        }
    }

    #[test]
    fn test_empty_box_has_no_geometry() {
        assert!(FitGeometry::compute(ClientBox::new(0.0, 800.0), Viewport::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn test_find_container() {
        let mut tree = DomTree::new();
        let root = tree.create_element("div");
        let inner = tree.create_element("div");
        tree.set_attribute(inner, CONTAINER_ATTR, "").unwrap();
        tree.set_attribute(inner, "style", "width: 400px; height: 800px").unwrap();
        tree.append_child(NodeId::ROOT, root).unwrap();
        tree.append_child(root, inner).unwrap();

        assert_eq!(find_container(&tree, root), Some(inner));
        assert_eq!(find_container(&tree, inner), Some(inner));
        assert_eq!(
            compute_scale(&tree, inner, Viewport::new(1000.0, 1000.0)),
            Some(0.5)
        );
    }
}
