//! List/Item templating
//!
//! One named layer is the list, another (inside it) the item template. The
//! template is taken out of the list while the list is established; each
//! [`Item`] then stamps the template's markup into its own node under the
//! list. A [`ListController`] exposes the same operations to callers that
//! want to stamp instances themselves.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use flexy_dom::{DomResult, DomTree, EventHandler, NodeId, PropValue};
use flexy_html::TrustedHtml;
use serde::{Deserialize, Serialize};

use crate::binding::{Binding, BindingSlot};
use crate::component::Property;
use crate::{resolve, Binder, Scope, LIST_ATTR};

/// Scroll axis of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scroll {
    Vertical,
    Horizontal,
}

/// Flex direction of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Row,
    Column,
}

impl Direction {
    fn as_css(self) -> &'static str {
        match self {
            Self::Row => "row",
            Self::Column => "column",
        }
    }
}

/// `gap` as a number or any CSS length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Gap {
    Number(f64),
    Text(String),
}

impl fmt::Display for Gap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Layout preset of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListPreset {
    ColumnList,
    RowList,
}

impl ListPreset {
    pub fn direction(self) -> Direction {
        match self {
            Self::ColumnList => Direction::Column,
            Self::RowList => Direction::Row,
        }
    }
}

/// List configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOptions {
    /// Name of the list layer
    pub list: String,
    /// Name of the item template layer
    pub item: String,
    #[serde(default)]
    pub scroll: Option<Scroll>,
    #[serde(default)]
    pub direction: Option<Direction>,
    #[serde(default)]
    pub gap: Option<Gap>,
    /// Supplies the direction when none is set
    #[serde(default)]
    pub preset: Option<ListPreset>,
}

impl ListOptions {
    pub fn new(list: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            list: list.into(),
            item: item.into(),
            ..Self::default()
        }
    }

    pub fn scroll(mut self, scroll: Scroll) -> Self {
        self.scroll = Some(scroll);
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn gap(mut self, gap: Gap) -> Self {
        self.gap = Some(gap);
        self
    }

    pub fn preset(mut self, preset: ListPreset) -> Self {
        self.preset = Some(preset);
        self
    }

    /// Explicit direction, else the preset's
    pub fn flex_direction(&self) -> Option<Direction> {
        self.direction.or(self.preset.map(ListPreset::direction))
    }
}

/// Operations on an established list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListController {
    list: NodeId,
    template: NodeId,
    item_name: String,
}

impl ListController {
    pub fn list(&self) -> NodeId {
        self.list
    }

    pub fn template(&self) -> NodeId {
        self.template
    }

    /// Clone the template and append the clone to the list
    pub fn create(&self, tree: &mut DomTree) -> DomResult<NodeId> {
        let clone = tree.clone_node(self.template, true)?;
        tree.append_child(self.list, clone)?;
        Ok(clone)
    }

    /// Query within the list
    pub fn select(&self, tree: &DomTree, selector: &str) -> Vec<NodeId> {
        tree.query_selector_all(self.list, selector)
    }

    /// Template instances currently in the list
    pub fn instances(&self, tree: &DomTree) -> Vec<NodeId> {
        self.select(tree, &resolve::name_selector(&self.item_name))
    }

    /// Markup of the template, or of one instance
    pub fn get_html(&self, tree: &DomTree, instance: Option<NodeId>) -> String {
        flexy_html::outer_html(tree, instance.unwrap_or(self.template))
    }
}

/// Controller shared between a list and its items
pub type ControllerCell = Rc<RefCell<Option<ListController>>>;

/// Resolve the list and template layers under `root` and hand a controller
/// to `render`. Returns the controller, or `None` while either layer is
/// missing.
pub fn use_list(
    tree: &DomTree,
    root: Option<NodeId>,
    options: &ListOptions,
    render: impl FnOnce(ListController),
) -> Option<ListController> {
    let list = resolve::select(tree, root, &options.list)?;
    let template = resolve::select(tree, Some(list), &options.item)
        .or_else(|| resolve::select(tree, root, &options.item))?;
    let controller = ListController {
        list,
        template,
        item_name: options.item.clone(),
    };
    render(controller.clone());
    Some(controller)
}

/// Where the template sat before it was taken out
#[derive(Debug, Clone, Copy)]
struct Established {
    root: NodeId,
    template: NodeId,
    parent: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

/// List binder
pub struct List {
    options: ListOptions,
    binding: Binding,
    cell: ControllerCell,
    established: Option<Established>,
    slot: BindingSlot,
    items: Vec<Item>,
}

impl List {
    pub fn new(options: ListOptions) -> Self {
        Self {
            options,
            binding: Binding::new(),
            cell: Rc::new(RefCell::new(None)),
            established: None,
            slot: BindingSlot::Unbound,
            items: Vec::new(),
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

    /// Add an item rendered from this list's template
    pub fn item(mut self, item: Item) -> Self {
        self.push_item(item);
        self
    }

    pub fn push_item(&mut self, mut item: Item) {
        item.cell = self.cell.clone();
        self.items.push(item);
    }

    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    /// Shared controller cell
    pub fn controller_cell(&self) -> ControllerCell {
        self.cell.clone()
    }

    pub fn controller(&self) -> Option<ListController> {
        self.cell.borrow().clone()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [Item] {
        &mut self.items
    }

    fn establish(&mut self, scope: &mut Scope<'_>) {
        let Some(root) = scope.root else {
            return;
        };
        let cell = self.cell.clone();
        let Some(controller) = use_list(scope.tree, Some(root), &self.options, |c| {
            *cell.borrow_mut() = Some(c);
        }) else {
            return;
        };

        let template = controller.template();
        let parent = scope.tree.parent(template);
        let next_sibling = scope.tree.get(template).and_then(|n| {
            let next = n.next_sibling;
            next.is_valid().then_some(next)
        });
        scope.tree.detach(template);
        if let Err(e) = scope.tree.set_attribute(controller.list(), LIST_ATTR, "") {
            tracing::trace!("list marker not set: {e}");
        }
        tracing::debug!(
            "list {:?} established with template {:?}",
            self.options.list,
            self.options.item
        );
        self.established = Some(Established {
            root,
            template,
            parent,
            next_sibling,
        });
    }

    fn teardown(&mut self, scope: &mut Scope<'_>) {
        for item in self.items.iter_mut().rev() {
            item.unmount(scope);
        }
        if let Some(est) = self.established.take() {
            if let Some(parent) = est.parent {
                let reference = est
                    .next_sibling
                    .filter(|&n| scope.tree.parent(n) == Some(parent));
                if let Err(e) = scope.tree.insert_before(parent, est.template, reference) {
                    tracing::trace!("template not restored: {e}");
                }
            }
        }
        *self.cell.borrow_mut() = None;
    }

    fn apply_layout(&self, scope: &mut Scope<'_>, list: NodeId) {
        let Some(elem) = scope.tree.element_mut(list) else {
            return;
        };
        match self.options.scroll {
            Some(Scroll::Horizontal) => elem.style.set_property("overflow-y", "scroll"),
            Some(Scroll::Vertical) => elem.style.set_property("overflow-x", "scroll"),
            None => {}
        }
        if let Some(direction) = self.options.flex_direction() {
            elem.style.set_property("flex-direction", direction.as_css());
        }
        if let Some(gap) = &self.options.gap {
            elem.style.set_property("gap", &gap.to_string());
        }
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("options", &self.options)
            .field("established", &self.established.is_some())
            .field("items", &self.items.len())
            .finish()
    }
}

impl Binder for List {
    fn update(&mut self, scope: &mut Scope<'_>) {
        if self.established.is_some_and(|e| Some(e.root) != scope.root) {
            self.teardown(scope);
        }
        if self.established.is_none() {
            self.establish(scope);
        }

        let list = self.controller().map(|c| c.list());
        if let Some(list) = list {
            self.apply_layout(scope, list);
        }
        self.slot.rebind(scope.tree, list, &self.binding);

        for item in &mut self.items {
            item.update(scope);
        }
    }

    fn unmount(&mut self, scope: &mut Scope<'_>) {
        self.slot.release(scope.tree);
        self.teardown(scope);
    }
}

/// One rendered instance of a list's template
pub struct Item {
    binding: Binding,
    properties: Vec<Property>,
    cell: ControllerCell,
    node: Option<NodeId>,
    stamped: bool,
    slot: BindingSlot,
}

impl Default for Item {
    fn default() -> Self {
        Self::new()
    }
}

impl Item {
    pub fn new() -> Self {
        Self {
            binding: Binding::new(),
            properties: Vec::new(),
            cell: Rc::new(RefCell::new(None)),
            node: None,
            stamped: false,
            slot: BindingSlot::Unbound,
        }
    }

    /// Item fed by an existing controller cell
    pub fn with_controller(cell: ControllerCell) -> Self {
        Self {
            cell,
            ..Self::new()
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

    /// Bind a layer inside this item
    pub fn child(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Node holding the stamped markup
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn properties_mut(&mut self) -> &mut [Property] {
        &mut self.properties
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("node", &self.node)
            .field("stamped", &self.stamped)
            .field("properties", &self.properties)
            .finish()
    }
}

impl Binder for Item {
    fn update(&mut self, scope: &mut Scope<'_>) {
        let Some(controller) = self.cell.borrow().clone() else {
            return;
        };

        let node = match self.node.filter(|&n| scope.tree.parent(n) == Some(controller.list())) {
            Some(node) => node,
            None => {
                let node = scope.tree.create_element("div");
                if let Err(e) = scope.tree.append_child(controller.list(), node) {
                    tracing::trace!("item node not attached: {e}");
                    return;
                }
                self.stamped = false;
                node
            }
        };
        self.node = Some(node);

        if !self.stamped {
            let html = TrustedHtml::assume_sanitized(controller.get_html(scope.tree, None));
            match flexy_html::set_inner_html(scope.tree, node, &html) {
                Ok(_) => self.stamped = true,
                Err(e) => tracing::trace!("item markup not stamped: {e}"),
            }
        }

        self.slot.rebind(scope.tree, Some(node), &self.binding);
        let mut inner = scope.within(Some(node));
        for property in &mut self.properties {
            property.update(&mut inner);
        }
    }

    fn unmount(&mut self, scope: &mut Scope<'_>) {
        for property in self.properties.iter_mut().rev() {
            property.unmount(scope);
        }
        self.slot.release(scope.tree);
        if let Some(node) = self.node.take() {
            scope.tree.detach(node);
        }
        self.stamped = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexy_dom::NAME_ATTR;

    fn list_tree() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let root = tree.create_element("div");
        let list = tree.create_element("div");
        let item = tree.create_element("div");
        tree.set_attribute(list, NAME_ATTR, "List").unwrap();
        tree.set_attribute(item, NAME_ATTR, "Item").unwrap();
        tree.append_child(NodeId::ROOT, root).unwrap();
        tree.append_child(root, list).unwrap();
        tree.append_child(list, item).unwrap();
        (tree, root, list, item)
    }

    #[test]
    fn test_use_list_controller() {
        let (mut tree, root, list, item) = list_tree();
        let mut seen = None;
        let controller =
            use_list(&tree, Some(root), &ListOptions::new("List", "Item"), |c| seen = Some(c)).unwrap();
        assert_eq!(seen.as_ref(), Some(&controller));
        assert_eq!(controller.template(), item);

        let clone = controller.create(&mut tree).unwrap();
        assert_eq!(tree.parent(clone), Some(list));
        assert_eq!(controller.instances(&tree), vec![item, clone]);
        assert_eq!(
            controller.get_html(&tree, None),
            r#"<div data-name="Item"></div>"#
        );
    }

    #[test]
    fn test_use_list_not_ready() {
        let (tree, root, _, _) = list_tree();
        let mut called = false;
        assert!(use_list(&tree, None, &ListOptions::new("List", "Item"), |_| called = true).is_none());
        assert!(use_list(&tree, Some(root), &ListOptions::new("List", "Nope"), |_| called = true).is_none());
        assert!(!called);
    }

    #[test]
    fn test_options_deserialize() {
        let options: ListOptions = serde_json::from_str(
            r#"{ "list": "L", "item": "I", "scroll": "horizontal", "direction": "row", "gap": 12 }"#,
        )
        .unwrap();
        assert_eq!(options.scroll, Some(Scroll::Horizontal));
        assert_eq!(options.direction, Some(Direction::Row));
        assert_eq!(options.gap.map(|g| g.to_string()).as_deref(), Some("12"));
        assert_eq!(options.preset, None);
    }

    #[test]
    fn test_preset_supplies_default_direction() {
        let options: ListOptions =
            serde_json::from_str(r#"{ "list": "Cards", "item": "Card", "preset": "row-list" }"#)
                .unwrap();
        assert_eq!(options.preset, Some(ListPreset::RowList));
        assert_eq!(options.flex_direction(), Some(Direction::Row));

        let explicit = options.direction(Direction::Column);
        assert_eq!(explicit.flex_direction(), Some(Direction::Column));
        assert_eq!(ListOptions::new("L", "I").flex_direction(), None);
    }
}
