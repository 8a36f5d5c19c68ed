//! DOM Events
//!
//! Listener registration with handler identity. Two listeners are the same
//! listener when they share an event type and point at the same handler
//! allocation, which is what `removeEventListener` relies on.

use std::fmt;
use std::rc::Rc;

use crate::NodeId;

/// Event handler callback
pub type EventHandler = Rc<dyn Fn(&DomEvent)>;

/// Wrap a closure as an [`EventHandler`]
pub fn handler(f: impl Fn(&DomEvent) + 'static) -> EventHandler {
    Rc::new(f)
}

/// Dispatched event
#[derive(Debug, Clone, PartialEq)]
pub struct DomEvent {
    /// Event type, lower-case (`click`, `input`, ...)
    pub event_type: String,
    /// Node the event was dispatched on
    pub target: NodeId,
    /// Node whose listener is running
    pub current_target: NodeId,
    /// Whether the event walks up the ancestors
    pub bubbles: bool,
}

impl DomEvent {
    pub fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            bubbles: true,
        }
    }

    /// Non-bubbling event
    pub fn local(event_type: &str, target: NodeId) -> Self {
        Self {
            bubbles: false,
            ..Self::new(event_type, target)
        }
    }
}

/// Registered listener
#[derive(Clone)]
pub struct Listener {
    pub event_type: String,
    pub handler: EventHandler,
}

impl Listener {
    pub fn new(event_type: &str, handler: EventHandler) -> Self {
        Self {
            event_type: event_type.to_string(),
            handler,
        }
    }

    /// Same event type and same handler allocation
    pub fn is(&self, event_type: &str, handler: &EventHandler) -> bool {
        self.event_type == event_type && Rc::ptr_eq(&self.handler, handler)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("event_type", &self.event_type)
            .field("handler", &Rc::as_ptr(&self.handler))
            .finish()
    }
}
