//! Portal injector
//!
//! Creates a `<div>` under a named layer (or the container root) and projects
//! content into it. The portal is rebuilt when its target name or content
//! changes, and removed on unmount.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use flexy_dom::{to_kebab_case, DomTree, EventHandler, NodeId};
use serde::{Deserialize, Serialize};

use crate::binding::event_type;
use crate::{resolve, Binder, Scope};

/// Non-event props of the portal element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalOptions {
    /// Target layer; the container root when absent
    #[serde(default)]
    pub name: Option<String>,
    /// Attributes, `className` meaning `class`
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Style properties (camelCase or kebab-case)
    #[serde(default)]
    pub style: BTreeMap<String, String>,
}

/// Content projected into the portal
#[derive(Clone)]
pub enum PortalContent {
    Empty,
    Text(String),
    Build(Rc<dyn Fn(&mut DomTree, NodeId)>),
}

impl fmt::Debug for PortalContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Text(t) => f.debug_tuple("Text").field(t).finish(),
            Self::Build(_) => f.write_str("Build(..)"),
        }
    }
}

/// Portal lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum PortalState {
    Unset,
    Mounted {
        node: NodeId,
        name: Option<String>,
        revision: u64,
        root: NodeId,
    },
}

/// Portal binder
pub struct Portal {
    options: PortalOptions,
    events: Vec<(String, EventHandler)>,
    content: PortalContent,
    revision: u64,
    state: PortalState,
}

impl fmt::Debug for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Portal")
            .field("options", &self.options)
            .field("events", &self.events.iter().map(|(k, _)| k).collect::<Vec<_>>())
            .field("content", &self.content)
            .field("revision", &self.revision)
            .field("state", &self.state)
            .finish()
    }
}

impl Portal {
    pub fn new(options: PortalOptions) -> Self {
        Self {
            options,
            events: Vec::new(),
            content: PortalContent::Empty,
            revision: 0,
            state: PortalState::Unset,
        }
    }

    /// Portal under the container root
    pub fn at_root() -> Self {
        Self::new(PortalOptions::default())
    }

    /// Portal under a named layer
    pub fn under(name: impl Into<String>) -> Self {
        Self::new(PortalOptions {
            name: Some(name.into()),
            ..PortalOptions::default()
        })
    }

    pub fn attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.options.attributes.insert(name.to_string(), value.into());
        self
    }

    pub fn style(mut self, name: &str, value: impl Into<String>) -> Self {
        self.options.style.insert(name.to_string(), value.into());
        self
    }

    pub fn on(mut self, key: &str, handler: EventHandler) -> Self {
        self.events.push((key.to_string(), handler));
        self
    }

    pub fn content(mut self, content: PortalContent) -> Self {
        self.content = content;
        self
    }

    /// Replace the content; the portal is rebuilt on the next pass
    pub fn set_content(&mut self, content: PortalContent) {
        self.content = content;
        self.revision += 1;
    }

    /// Retarget; the portal is rebuilt on the next pass
    pub fn set_name(&mut self, name: Option<String>) {
        self.options.name = name;
    }

    pub fn state(&self) -> &PortalState {
        &self.state
    }

    /// The portal element while mounted
    pub fn node(&self) -> Option<NodeId> {
        match self.state {
            PortalState::Mounted { node, .. } => Some(node),
            PortalState::Unset => None,
        }
    }

    fn is_stale(&self, root: Option<NodeId>) -> bool {
        match &self.state {
            PortalState::Unset => false,
            PortalState::Mounted {
                name,
                revision,
                root: mounted_root,
                ..
            } => {
                *name != self.options.name
                    || *revision != self.revision
                    || Some(*mounted_root) != root
            }
        }
    }

    fn build(&self, tree: &mut DomTree, target: NodeId) -> Option<NodeId> {
        let node = tree.create_element("div");
        for (key, value) in &self.options.attributes {
            let name = if key == "className" { "class" } else { key.as_str() };
            if let Err(e) = tree.set_attribute(node, name, value) {
                tracing::trace!("portal attribute {name} not set: {e}");
            }
        }
        if let Some(elem) = tree.element_mut(node) {
            for (name, value) in &self.options.style {
                elem.style.set_property(&to_kebab_case(name), value);
            }
        }
        for (key, handler) in &self.events {
            if let Err(e) = tree.add_event_listener(node, &event_type(key), handler.clone()) {
                tracing::trace!("portal listener {key} not added: {e}");
            }
        }
        if let Err(e) = tree.append_child(target, node) {
            tracing::trace!("portal not attached: {e}");
            return None;
        }
        match &self.content {
            PortalContent::Empty => {}
            PortalContent::Text(text) => {
                if let Err(e) = tree.set_text_content(node, text) {
                    tracing::trace!("portal text not set: {e}");
                }
            }
            PortalContent::Build(build) => build(tree, node),
        }
        Some(node)
    }

    fn teardown(&mut self, tree: &mut DomTree) {
        let PortalState::Mounted {
            node, name, root, ..
        } = std::mem::replace(&mut self.state, PortalState::Unset)
        else {
            return;
        };
        let parent = match &name {
            Some(name) => resolve::select(tree, Some(root), name),
            None => Some(root),
        };
        // the target may be gone already
        if let Some(parent) = parent {
            if tree.remove_child(parent, node).is_err() {
                tracing::trace!("portal {node} no longer under its target");
            }
        }
    }
}

impl Binder for Portal {
    fn update(&mut self, scope: &mut Scope<'_>) {
        if self.is_stale(scope.root) {
            self.teardown(scope.tree);
        }
        if self.state != PortalState::Unset {
            return;
        }
        let Some(root) = scope.root else {
            return;
        };
        let target = match &self.options.name {
            Some(name) => scope.select(name),
            None => Some(root),
        };
        let Some(target) = target else {
            return;
        };
        if let Some(node) = self.build(scope.tree, target) {
            tracing::debug!("portal mounted under {target}");
            self.state = PortalState::Mounted {
                node,
                name: self.options.name.clone(),
                revision: self.revision,
                root,
            };
        }
    }

    fn unmount(&mut self, scope: &mut Scope<'_>) {
        self.teardown(scope.tree);
    }
}
