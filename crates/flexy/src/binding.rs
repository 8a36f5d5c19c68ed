//! Binding layer
//!
//! A [`Binding`] is a bag of DOM properties and event handlers for one
//! element. Attaching assigns the properties and registers the listeners;
//! the returned [`AttachedBinding`] remembers exactly which listeners it
//! registered so that detaching removes each of them once. Property
//! assignments are not undone.

use flexy_dom::{DomTree, EventHandler, NodeId, PropValue};

/// Event type for a handler key: `onClick` -> `click`
pub fn event_type(key: &str) -> String {
    key.strip_prefix("on").unwrap_or(key).to_ascii_lowercase()
}

/// Properties and event handlers to apply to an element
#[derive(Clone, Default)]
pub struct Binding {
    properties: Vec<(String, PropValue)>,
    events: Vec<(String, EventHandler)>,
}

impl Binding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set_property`](Self::set_property)
    pub fn property(mut self, key: &str, value: impl Into<PropValue>) -> Self {
        self.set_property(key, value);
        self
    }

    /// Builder form of [`set_event`](Self::set_event)
    pub fn on(mut self, key: &str, handler: EventHandler) -> Self {
        self.set_event(key, handler);
        self
    }

    /// Set a property, replacing an earlier value for the same key
    pub fn set_property(&mut self, key: &str, value: impl Into<PropValue>) {
        let value = value.into();
        match self.properties.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.properties.push((key.to_string(), value)),
        }
    }

    /// Set an event handler (`onClick`, `onInput`, ...), replacing an
    /// earlier handler for the same key
    pub fn set_event(&mut self, key: &str, handler: EventHandler) {
        match self.events.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = handler,
            None => self.events.push((key.to_string(), handler)),
        }
    }

    pub fn remove_event(&mut self, key: &str) -> bool {
        let before = self.events.len();
        self.events.retain(|(k, _)| k != key);
        self.events.len() != before
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn event_keys(&self) -> impl Iterator<Item = &str> {
        self.events.iter().map(|(k, _)| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.events.is_empty()
    }

    /// Apply to `node`
    pub fn attach(&self, tree: &mut DomTree, node: NodeId) -> AttachedBinding {
        for (key, value) in &self.properties {
            if let Err(e) = tree.set_property(node, key, value) {
                tracing::trace!("property {key} not applied to {node}: {e}");
            }
        }

        let mut listeners = Vec::with_capacity(self.events.len());
        for (key, handler) in &self.events {
            let event = event_type(key);
            match tree.add_event_listener(node, &event, handler.clone()) {
                Ok(true) => listeners.push((event, handler.clone())),
                Ok(false) => {}
                Err(e) => tracing::trace!("listener {event} not added to {node}: {e}"),
            }
        }
        tracing::trace!("attached {} listeners to {node}", listeners.len());
        AttachedBinding { node, listeners }
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("properties", &self.properties)
            .field("events", &self.events.iter().map(|(k, _)| k).collect::<Vec<_>>())
            .finish()
    }
}

/// Listeners registered by one attach
#[must_use = "listeners stay registered until the binding is detached"]
pub struct AttachedBinding {
    node: NodeId,
    listeners: Vec<(String, EventHandler)>,
}

impl std::fmt::Debug for AttachedBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachedBinding")
            .field("node", &self.node)
            .field("listeners", &self.listeners.iter().map(|(k, _)| k).collect::<Vec<_>>())
            .finish()
    }
}

impl AttachedBinding {
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Remove the registered listeners. A node that is gone is skipped.
    pub fn detach(self, tree: &mut DomTree) {
        for (event, handler) in &self.listeners {
            if let Err(e) = tree.remove_event_listener(self.node, event, handler) {
                tracing::trace!("listener {event} on {} already gone: {e}", self.node);
            }
        }
    }
}

/// Attach state of a binder's element: Unbound -> Bound -> Unbound
#[derive(Debug, Default)]
pub enum BindingSlot {
    #[default]
    Unbound,
    Bound(AttachedBinding),
}

impl BindingSlot {
    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound(_))
    }

    /// Node of the current attach
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Self::Bound(attached) => Some(attached.node()),
            Self::Unbound => None,
        }
    }

    /// Detach the previous attach, if any
    pub fn release(&mut self, tree: &mut DomTree) {
        if let Self::Bound(attached) = std::mem::take(self) {
            attached.detach(tree);
        }
    }

    /// Release, then attach `binding` to `node` when there is one
    pub fn rebind(&mut self, tree: &mut DomTree, node: Option<NodeId>, binding: &Binding) {
        self.release(tree);
        if let Some(node) = node {
            *self = Self::Bound(binding.attach(tree, node));
        }
    }
}
