//! DOM Tree (arena-based allocation)
//!
//! Nodes are never freed: removing a node only unlinks it, so a `NodeId`
//! held across a removal still resolves (to a detached subtree). Callers that
//! care whether a node is still part of the document use
//! [`DomTree::is_connected`].

use crate::{
    events::{DomEvent, EventHandler, Listener},
    ClientBox, DomError, DomResult, ElementData, Node, NodeData, NodeId, PropValue,
};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
        }
    }

    /// Document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the arena (including detached ones)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree holds only the document node
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Element data of a node
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id)?.as_element()
    }

    /// Mutable element data of a node
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id)?.as_element_mut()
    }

    fn element_or_err(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        let node = self.nodes.get_mut(id.index()).ok_or(DomError::NotFound(id))?;
        node.as_element_mut().ok_or(DomError::InvalidNodeType(id))
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(data));
        id
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a detached element from prepared data
    pub fn create_element_with(&mut self, data: ElementData) -> NodeId {
        self.push(NodeData::Element(data))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Comment(text.to_string()))
    }

    /// Create a detached doctype node
    pub fn create_doctype(&mut self, name: &str) -> NodeId {
        self.push(NodeData::Doctype {
            name: name.to_string(),
        })
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent.option()
    }

    /// Iterate over direct children
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Direct child IDs
    pub fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).map(|(child, _)| child).collect()
    }

    /// Pre-order descendants of `root`, excluding `root`
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root,
            next: self.get(root).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Check if `node` is `ancestor` or one of its descendants
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Check if a node is attached to the document
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.get(node).is_some() && self.contains(NodeId::ROOT, node)
    }

    /// Lower-case tag name
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Append `child` as the last child of `parent`, moving it if attached
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference` (or at the end when `None`)
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        if self.get(parent).is_none() {
            return Err(DomError::NotFound(parent));
        }
        if self.get(child).is_none() {
            return Err(DomError::NotFound(child));
        }
        if child == NodeId::ROOT || self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if let Some(reference) = reference {
            if reference == child {
                return Ok(child);
            }
            if self.parent(reference) != Some(parent) {
                return Err(DomError::NotAChild {
                    parent,
                    child: reference,
                });
            }
        }

        self.detach(child);

        let prev = match reference {
            Some(r) => self.nodes[r.index()].prev_sibling,
            None => self.nodes[parent.index()].last_child,
        };
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference.unwrap_or(NodeId::NONE);
        }
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        match reference {
            Some(r) => self.nodes[r.index()].prev_sibling = child,
            None => self.nodes[parent.index()].last_child = child,
        }
        Ok(child)
    }

    /// Remove `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if self.get(child).is_none() {
            return Err(DomError::NotFound(child));
        }
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child);
        Ok(child)
    }

    /// Unlink a node from its parent (`element.remove()`); no-op if detached
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }
        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Put `replacement` where `old` is (`old.replaceWith(replacement)`)
    pub fn replace_with(&mut self, old: NodeId, replacement: NodeId) -> DomResult<NodeId> {
        let parent = self.parent(old).ok_or(DomError::NotFound(old))?;
        if old == replacement {
            return Ok(old);
        }
        self.insert_before(parent, replacement, Some(old))?;
        self.detach(old);
        Ok(old)
    }

    /// Clone a node; `deep` clones the subtree. Listeners and expando
    /// properties are not copied, matching `cloneNode`.
    pub fn clone_node(&mut self, id: NodeId, deep: bool) -> DomResult<NodeId> {
        let data = match &self.get(id).ok_or(DomError::NotFound(id))?.data {
            NodeData::Document => return Err(DomError::InvalidNodeType(id)),
            NodeData::Element(e) => NodeData::Element(e.shallow_clone()),
            NodeData::Text(t) => NodeData::Text(t.clone()),
            NodeData::Comment(c) => NodeData::Comment(c.clone()),
            NodeData::Doctype { name } => NodeData::Doctype { name: name.clone() },
        };
        let copy = self.push(data);
        if deep {
            for child in self.child_ids(id) {
                let child_copy = self.clone_node(child, true)?;
                self.append_child(copy, child_copy)?;
            }
        }
        Ok(copy)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|d| self.get(d).and_then(Node::as_text))
            .collect()
    }

    /// Replace all children with a single text node
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        match self.get_mut(id).map(|n| &mut n.data) {
            None => return Err(DomError::NotFound(id)),
            Some(NodeData::Text(t)) | Some(NodeData::Comment(t)) => {
                *t = text.to_string();
                return Ok(());
            }
            Some(_) => {}
        }
        self.clear_children(id);
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.append_child(id, text_node)?;
        }
        Ok(())
    }

    /// Detach every child of a node
    pub fn clear_children(&mut self, id: NodeId) {
        for child in self.child_ids(id) {
            self.detach(child);
        }
    }

    // ------------------------------------------------------------------
    // Attributes & properties
    // ------------------------------------------------------------------

    /// Get an attribute
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<String> {
        self.element(id)?.get_attr(name)
    }

    /// Set an attribute
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.element_or_err(id)?.set_attr(name, value);
        Ok(())
    }

    /// Remove an attribute
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<bool> {
        Ok(self.element_or_err(id)?.remove_attr(name))
    }

    /// Add a class (`classList.add`)
    pub fn add_class(&mut self, id: NodeId, class: &str) -> DomResult<()> {
        self.element_or_err(id)?.class_list.add(class);
        Ok(())
    }

    /// Remove a class (`classList.remove`)
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> DomResult<bool> {
        Ok(self.element_or_err(id)?.class_list.remove(class))
    }

    /// Assign a DOM property (`element[key] = value`).
    ///
    /// Reflected properties update the matching attribute or content; any
    /// other key is stored as an expando property.
    pub fn set_property(&mut self, id: NodeId, key: &str, value: &PropValue) -> DomResult<()> {
        match key {
            "innerText" | "textContent" => {
                self.element_or_err(id)?;
                return self.set_text_content(id, &value.to_string());
            }
            "className" => self.element_or_err(id)?.class_list.set_value(&value.to_string()),
            "style" => self.element_or_err(id)?.style.set_css_text(&value.to_string()),
            "hidden" | "disabled" | "checked" | "readOnly" | "required" | "multiple" | "autofocus" => {
                let elem = self.element_or_err(id)?;
                let attr = key.to_ascii_lowercase();
                if value.is_truthy() {
                    elem.set_attr(&attr, "");
                } else {
                    elem.remove_attr(&attr);
                }
            }
            "id" | "title" | "value" | "placeholder" | "type" | "name" | "href" | "src" | "alt"
            | "role" | "lang" | "dir" | "tabIndex" | "maxLength" | "minLength" | "autocomplete" => {
                let attr = key.to_ascii_lowercase();
                self.element_or_err(id)?.set_attr(&attr, &value.to_string());
            }
            _ => {
                self.element_or_err(id)?
                    .properties
                    .insert(key.to_string(), value.clone());
            }
        }
        Ok(())
    }

    /// Read back an expando property
    pub fn property(&self, id: NodeId, key: &str) -> Option<&PropValue> {
        self.element(id)?.properties.get(key)
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// Record the client box reported by the host's layout
    pub fn set_client_box(&mut self, id: NodeId, client: ClientBox) -> DomResult<()> {
        self.element_or_err(id)?.client_box = Some(client);
        Ok(())
    }

    /// Client box: host-reported, else inline pixel `width`/`height`
    pub fn client_box(&self, id: NodeId) -> Option<ClientBox> {
        let elem = self.element(id)?;
        elem.client_box
            .or_else(|| ClientBox::from_inline_style(&elem.style))
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Register a listener. Registering the same (type, handler) pair twice
    /// is a no-op; returns whether a listener was added.
    pub fn add_event_listener(
        &mut self,
        id: NodeId,
        event_type: &str,
        handler: EventHandler,
    ) -> DomResult<bool> {
        let elem = self.element_or_err(id)?;
        if elem.listeners.iter().any(|l| l.is(event_type, &handler)) {
            return Ok(false);
        }
        elem.listeners.push(Listener::new(event_type, handler));
        Ok(true)
    }

    /// Remove a listener; returns whether one was removed
    pub fn remove_event_listener(
        &mut self,
        id: NodeId,
        event_type: &str,
        handler: &EventHandler,
    ) -> DomResult<bool> {
        let elem = self.element_or_err(id)?;
        let before = elem.listeners.len();
        elem.listeners.retain(|l| !l.is(event_type, handler));
        Ok(elem.listeners.len() != before)
    }

    /// Number of listeners on a node
    pub fn listener_count(&self, id: NodeId) -> usize {
        self.element(id).map_or(0, |e| e.listeners.len())
    }

    /// Number of listeners of one type on a node
    pub fn listener_count_for(&self, id: NodeId, event_type: &str) -> usize {
        self.element(id).map_or(0, |e| {
            e.listeners
                .iter()
                .filter(|l| l.event_type == event_type)
                .count()
        })
    }

    /// Dispatch an event at `event.target`, bubbling to ancestors when the
    /// event bubbles. Returns the number of handlers invoked.
    pub fn dispatch_event(&self, event: &DomEvent) -> usize {
        let mut path = vec![event.target];
        if event.bubbles {
            let mut current = self.parent(event.target);
            while let Some(id) = current {
                path.push(id);
                current = self.parent(id);
            }
        }

        let mut invoked = 0;
        for current_target in path {
            let handlers: Vec<EventHandler> = match self.element(current_target) {
                Some(e) => e
                    .listeners
                    .iter()
                    .filter(|l| l.event_type == event.event_type)
                    .map(|l| l.handler.clone())
                    .collect(),
                None => continue,
            };
            let scoped = DomEvent {
                current_target,
                ..event.clone()
            };
            for h in handlers {
                h(&scoped);
                invoked += 1;
            }
        }
        tracing::trace!("dispatched {} to {} handlers", event.event_type, invoked);
        invoked
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.option()?;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Pre-order iterator over descendants
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next.option()?;
        let node = self.tree.get(current)?;

        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            let mut cursor = current;
            loop {
                if cursor == self.root {
                    break NodeId::NONE;
                }
                let n = &self.tree.nodes[cursor.index()];
                if n.next_sibling.is_valid() {
                    break n.next_sibling;
                }
                match n.parent.option() {
                    Some(p) if p != self.root => cursor = p,
                    _ => break NodeId::NONE,
                }
            }
        };
        Some(current)
    }
}
