//! flexy - dynamic overlays for static design exports
//!
//! A design tool exports a frame as HTML where every layer carries its name
//! in `data-name`. flexy mounts a container on that markup, scales it to
//! the viewport while keeping the authored aspect ratio, and lets callers
//! bind properties and event handlers to layers by name, stamp list items
//! from a template layer, inject portals, replace placeholder boxes with
//! real inputs and gate parts of the overlay by device.
//!
//! ```no_run
//! use flexy::{Component, ContainerOptions, FitMode, Flexy, Viewport, Window};
//!
//! let html = r#"<div id="app"><div flexy-container style="width: 400px; height: 800px">
//!     <div data-name="Title">Hello</div>
//! </div></div>"#;
//! let mut flexy = Flexy::from_html(html, Window::new(Viewport::new(1000.0, 1000.0)));
//! let root = flexy.tree().query_selector(flexy::NodeId::ROOT, "#app").unwrap();
//! flexy.mount(root, ContainerOptions::default().fit(FitMode::Height)).unwrap();
//! flexy.add(Component::new("Title").property("innerText", "Welcome"));
//! flexy.render();
//! ```

pub mod binder;
pub mod binding;
pub mod component;
pub mod config;
pub mod container;
pub mod device;
pub mod error;
pub mod fit;
pub mod input;
pub mod list;
pub mod placement;
pub mod portal;
pub mod resolve;
pub mod runtime;
pub mod styles;
pub mod unique;
pub mod window;

pub use binder::{AsAny, Binder, BinderKey, Scope};
pub use binding::{AttachedBinding, Binding, BindingSlot};
pub use component::{Component, Property};
pub use config::OverlayConfig;
pub use container::{BackgroundColor, ContainerOptions, ContainerState, Overflow};
pub use device::{Bounds, Breakpoint, DeviceGate, DeviceType, OneOrMany, Orientation};
pub use error::{FlexyError, FlexyResult};
pub use fit::{compute_scale, FitGeometry, FitMode};
pub use input::Input;
pub use list::{
    use_list, Direction, Gap, Item, List, ListController, ListOptions, ListPreset, Scroll,
};
pub use placement::{Deletion, FloatPosition, Floating, Fullsize};
pub use portal::{Portal, PortalContent, PortalOptions, PortalState};
pub use runtime::Flexy;
pub use styles::StyleRegistry;
pub use unique::{ClassNameAllocator, ProcessClassNames, SequentialClassNames};
pub use window::{Viewport, Window};

pub use flexy_dom::{handler, DomEvent, DomTree, EventHandler, NodeId, PropValue};

/// Marker attribute of the element that carries the design's aspect ratio
pub const CONTAINER_ATTR: &str = "flexy-container";

/// Marker attribute set on established list layers
pub const LIST_ATTR: &str = "flexy-list";
