//! Component and Property binders
//!
//! Both bind a [`Binding`] to one named node and re-attach on every pass.
//! A component resolves under the container and also drives visibility; a
//! property resolves under the enclosing list item.

use flexy_dom::{EventHandler, PropValue};

use crate::binding::{Binding, BindingSlot};
use crate::{Binder, Scope};

/// Binds properties, handlers and visibility to a named layer
#[derive(Debug)]
pub struct Component {
    name: String,
    binding: Binding,
    visible: bool,
    slot: BindingSlot,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            binding: Binding::new(),
            visible: true,
            slot: BindingSlot::Unbound,
        }
    }

    pub fn property(mut self, key: &str, value: impl Into<PropValue>) -> Self {
        self.binding.set_property(key, value);
        self
    }

    pub fn on(mut self, key: &str, handler: EventHandler) -> Self {
        self.binding.set_event(key, handler);
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Properties and handlers for the next pass
    pub fn binding_mut(&mut self) -> &mut Binding {
        &mut self.binding
    }

    pub fn is_bound(&self) -> bool {
        self.slot.is_bound()
    }
}

impl Binder for Component {
    fn update(&mut self, scope: &mut Scope<'_>) {
        let node = scope.select(&self.name);
        if let Some(node) = node {
            if let Some(elem) = scope.tree.element_mut(node) {
                let visibility = if self.visible { "visible" } else { "hidden" };
                elem.style.set_property("visibility", visibility);
            }
        }
        self.slot.rebind(scope.tree, node, &self.binding);
    }

    fn unmount(&mut self, scope: &mut Scope<'_>) {
        self.slot.release(scope.tree);
    }
}

/// Binds properties and handlers to a named layer inside a list item
#[derive(Debug)]
pub struct Property {
    name: String,
    binding: Binding,
    slot: BindingSlot,
}

impl Property {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            binding: Binding::new(),
            slot: BindingSlot::Unbound,
        }
    }

    pub fn property(mut self, key: &str, value: impl Into<PropValue>) -> Self {
        self.binding.set_property(key, value);
        self
    }

    pub fn on(mut self, key: &str, handler: EventHandler) -> Self {
        self.binding.set_event(key, handler);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binding_mut(&mut self) -> &mut Binding {
        &mut self.binding
    }

    pub fn is_bound(&self) -> bool {
        self.slot.is_bound()
    }
}

impl Binder for Property {
    fn update(&mut self, scope: &mut Scope<'_>) {
        let node = scope.select(&self.name);
        self.slot.rebind(scope.tree, node, &self.binding);
    }

    fn unmount(&mut self, scope: &mut Scope<'_>) {
        self.slot.release(scope.tree);
    }
}
