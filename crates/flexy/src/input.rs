//! Input transplant
//!
//! Replaces a placeholder "box" layer with a real `<input>` that looks like
//! the design: the box's classes plus the computed text styling of a "text"
//! layer and the fill/border of an optional "background" layer.

use flexy_css::StyleResolver;
use flexy_dom::{DomTree, EventHandler, NodeId, PropValue};

use crate::binding::{AttachedBinding, Binding};
use crate::{Binder, Scope};

/// Properties copied from the text layer
pub const TEXT_PROPERTIES: &[&str] = &[
    "font-size",
    "font-family",
    "font-weight",
    "font-style",
    "letter-spacing",
    "white-space",
    "line-height",
    "display",
    "flex-wrap",
    "text-align",
    "text-transform",
    "text-decoration-line",
    "text-decoration-style",
    "text-decoration-color",
    "text-shadow",
    "justify-content",
    "align-items",
    "align-content",
    "color",
];

/// Properties copied from the background layer
pub const BACKGROUND_PROPERTIES: &[&str] = &[
    "background-color",
    "border-color",
    "border-width",
    "border-style",
    "border-radius",
    "box-shadow",
    "background-image",
    "background-size",
    "background-position",
    "background-repeat",
    "background-clip",
    "background-origin",
    "background-attachment",
];

#[derive(Debug, Default)]
enum InputState {
    #[default]
    Pending,
    Replaced {
        input: NodeId,
        attached: AttachedBinding,
    },
}

/// Input binder
#[derive(Debug)]
pub struct Input {
    box_name: String,
    text_name: Option<String>,
    background_name: Option<String>,
    binding: Binding,
    state: InputState,
}

impl Input {
    pub fn new(box_name: impl Into<String>) -> Self {
        Self {
            box_name: box_name.into(),
            text_name: None,
            background_name: None,
            binding: Binding::new(),
            state: InputState::Pending,
        }
    }

    /// Layer whose text styling the input takes
    pub fn text(mut self, name: impl Into<String>) -> Self {
        self.text_name = Some(name.into());
        self
    }

    pub fn background(mut self, name: impl Into<String>) -> Self {
        self.background_name = Some(name.into());
        self
    }

    pub fn property(mut self, key: &str, value: impl Into<PropValue>) -> Self {
        self.binding.set_property(key, value);
        self
    }

    pub fn on(mut self, key: &str, handler: EventHandler) -> Self {
        self.binding.set_event(key, handler);
        self
    }

    /// The live input once the box has been replaced
    pub fn input(&self) -> Option<NodeId> {
        match &self.state {
            InputState::Replaced { input, .. } => Some(*input),
            InputState::Pending => None,
        }
    }
}

/// Copy the listed computed properties of `from` onto `to`'s inline style
fn copy_computed(
    tree: &mut DomTree,
    resolver: &StyleResolver,
    from: NodeId,
    to: NodeId,
    properties: &[&str],
) {
    let computed = resolver.compute_style(tree, from);
    let Some(elem) = tree.element_mut(to) else {
        return;
    };
    for name in properties {
        if let Some(value) = computed.get(name).filter(|v| !v.is_empty()) {
            elem.style.set_property(name, value);
        }
    }
}

impl Binder for Input {
    fn update(&mut self, scope: &mut Scope<'_>) {
        if matches!(self.state, InputState::Replaced { .. }) {
            return;
        }
        let Some(design_box) = scope.select(&self.box_name) else {
            return;
        };
        let text = self
            .text_name
            .as_deref()
            .and_then(|name| scope.select(name));
        let background = self
            .background_name
            .as_deref()
            .and_then(|name| scope.select(name));

        let tree = &mut *scope.tree;
        let input = tree.create_element("input");
        let classes = tree
            .element(design_box)
            .map(|e| e.class_list.value())
            .unwrap_or_default();
        if let Some(elem) = tree.element_mut(input) {
            elem.class_list.set_value(&classes);
            elem.style.set_property("box-sizing", "border-box");
        }
        if let Some(text) = text {
            copy_computed(tree, scope.resolver, text, input, TEXT_PROPERTIES);
        }
        if let Some(background) = background {
            copy_computed(tree, scope.resolver, background, input, BACKGROUND_PROPERTIES);
        }

        let attached = self.binding.attach(tree, input);
        if let Err(e) = tree.replace_with(design_box, input) {
            tracing::trace!("input not transplanted: {e}");
            attached.detach(tree);
            return;
        }
        tracing::debug!("replaced {:?} with input {input}", self.box_name);
        self.state = InputState::Replaced { input, attached };
    }

    fn unmount(&mut self, scope: &mut Scope<'_>) {
        if let InputState::Replaced { attached, .. } = std::mem::take(&mut self.state) {
            attached.detach(scope.tree);
        }
    }
}
