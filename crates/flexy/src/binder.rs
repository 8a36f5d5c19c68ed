//! Binder trait
//!
//! Every overlay piece (component, list, portal, input, ...) is a binder
//! owned by the runtime. On each pass the runtime hands it a [`Scope`]: the
//! tree, the window and the container it lives in. Binders resolve their
//! named nodes from the scope every time.

use std::any::Any;
use std::fmt;

use flexy_css::StyleResolver;
use flexy_dom::{DomTree, NodeId};

use crate::container::ContainerState;
use crate::fit::FitGeometry;
use crate::{resolve, ClassNameAllocator, StyleRegistry, Window};

/// Handle of a binder registered with the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BinderKey(pub u64);

impl BinderKey {
    /// Key the container itself uses for its subscriptions
    pub const CONTAINER: BinderKey = BinderKey(0);
}

impl fmt::Display for BinderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "binder#{}", self.0)
    }
}

/// Everything a binder may touch during a pass
pub struct Scope<'a> {
    pub tree: &'a mut DomTree,
    pub window: &'a mut Window,
    pub styles: &'a mut StyleRegistry,
    pub resolver: &'a StyleResolver,
    pub class_names: &'a dyn ClassNameAllocator,
    pub container: &'a ContainerState,
    /// Element named lookups are resolved under; `None` until mounted
    pub root: Option<NodeId>,
    pub key: BinderKey,
}

impl Scope<'_> {
    /// Resolve a named node under the scope root
    pub fn select(&self, name: &str) -> Option<NodeId> {
        resolve::select(self.tree, self.root, name)
    }

    /// Current fit geometry of the container
    pub fn geometry(&self) -> Option<FitGeometry> {
        self.container.geometry
    }

    /// Same scope with lookups rooted at `root`
    pub fn within(&mut self, root: Option<NodeId>) -> Scope<'_> {
        Scope {
            tree: &mut *self.tree,
            window: &mut *self.window,
            styles: &mut *self.styles,
            resolver: self.resolver,
            class_names: self.class_names,
            container: self.container,
            root,
            key: self.key,
        }
    }
}

/// Downcast support for boxed binders
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// An overlay piece with a mount/update/unmount lifecycle.
///
/// `update` runs on every pass while mounted and must release whatever the
/// previous pass attached before attaching again. `unmount` releases
/// everything. Neither reports errors: a missing node means "not ready".
pub trait Binder: AsAny {
    fn update(&mut self, scope: &mut Scope<'_>);

    /// Called on window resize when subscribed through
    /// [`Window::subscribe`](crate::Window::subscribe)
    fn resize(&mut self, _scope: &mut Scope<'_>) {}

    fn unmount(&mut self, scope: &mut Scope<'_>);
}
