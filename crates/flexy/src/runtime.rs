//! Overlay runtime
//!
//! [`Flexy`] owns the document, the window and every registered binder. One
//! call to [`Flexy::render`] is one effect pass: the container is measured,
//! its style block refreshed, then each binder is updated (or unmounted when
//! its device gate closes) in registration order.

use std::rc::Rc;

use flexy_css::StyleResolver;
use flexy_dom::{DomError, DomEvent, DomTree, NodeId};

use crate::container::{ContainerOptions, ContainerState};
use crate::{
    Binder, BinderKey, ClassNameAllocator, DeviceGate, FlexyError, FlexyResult,
    ProcessClassNames, Scope, StyleRegistry, Viewport, Window,
};

struct Entry {
    key: BinderKey,
    gate: Option<DeviceGate>,
    mounted: bool,
    binder: Box<dyn Binder>,
}

/// Container provider and binder host
pub struct Flexy {
    tree: DomTree,
    window: Window,
    resolver: StyleResolver,
    styles: StyleRegistry,
    class_names: Rc<dyn ClassNameAllocator>,
    container: ContainerState,
    entries: Vec<Entry>,
    next_key: u64,
}

impl Flexy {
    pub fn new(tree: DomTree, window: Window) -> Self {
        Self {
            tree,
            window,
            resolver: StyleResolver::new(),
            styles: StyleRegistry::new(),
            class_names: Rc::new(ProcessClassNames),
            container: ContainerState::default(),
            entries: Vec::new(),
            next_key: 1,
        }
    }

    /// Parse a design export; its `<style>` elements feed computed styles
    pub fn from_html(html: &str, window: Window) -> Self {
        let tree = flexy_html::parse(html);
        let resolver = StyleResolver::from_document(&tree);
        tracing::debug!(
            "parsed export: {} nodes, {} stylesheets",
            tree.len(),
            resolver.stylesheet_count()
        );
        Self {
            resolver,
            ..Self::new(tree, window)
        }
    }

    /// Use another class name source
    pub fn with_class_names(mut self, class_names: impl ClassNameAllocator + 'static) -> Self {
        self.class_names = Rc::new(class_names);
        self
    }

    /// Add a stylesheet to the computed-style cascade
    pub fn add_stylesheet(&mut self, css: &str) -> FlexyResult<()> {
        self.resolver.add_css(css)?;
        Ok(())
    }

    /// Mount the container at `root`.
    ///
    /// The root gets a unique class; injected style blocks go to `<head>`
    /// when there is one, else next to the root. Mounting again re-points
    /// the container and keeps the class.
    pub fn mount(&mut self, root: NodeId, options: ContainerOptions) -> FlexyResult<()> {
        if self.tree.element(root).is_none() {
            return Err(DomError::InvalidNodeType(root).into());
        }

        let class = match (&self.container.class_name, self.container.root) {
            (Some(class), Some(old)) => {
                if old != root && self.tree.remove_class(old, class).is_err() {
                    tracing::trace!("previous root {old} is gone");
                }
                class.clone()
            }
            _ => self.class_names.allocate(),
        };
        self.tree.add_class(root, &class)?;

        let host = self
            .tree
            .query_selector(NodeId::ROOT, "head")
            .or_else(|| self.tree.parent(root))
            .unwrap_or(root);
        self.styles.set_host(Some(host));
        self.window.subscribe(BinderKey::CONTAINER);

        self.container.root = Some(root);
        self.container.class_name = Some(class);
        self.container.options = options;
        self.container
            .refresh(&mut self.tree, &self.window, &self.resolver);
        tracing::debug!(
            "mounted container at {root} as {:?}",
            self.container.class_name
        );
        Ok(())
    }

    /// Replace the container options; applied on the next pass
    pub fn set_container_options(&mut self, options: ContainerOptions) {
        self.container.options = options;
    }

    /// Register a binder; it is updated from the next pass on
    pub fn add(&mut self, binder: impl Binder + 'static) -> BinderKey {
        self.push(None, Box::new(binder))
    }

    /// Register a binder that only renders while `gate` matches the window
    pub fn add_gated(&mut self, gate: DeviceGate, binder: impl Binder + 'static) -> BinderKey {
        self.push(Some(gate), Box::new(binder))
    }

    fn push(&mut self, gate: Option<DeviceGate>, binder: Box<dyn Binder>) -> BinderKey {
        let key = BinderKey(self.next_key);
        self.next_key += 1;
        self.entries.push(Entry {
            key,
            gate,
            mounted: false,
            binder,
        });
        key
    }

    /// Borrow a registered binder as its concrete type
    pub fn binder<T: Binder + 'static>(&self, key: BinderKey) -> Option<&T> {
        let entry = self.entries.iter().find(|e| e.key == key)?;
        let binder: &dyn Binder = entry.binder.as_ref();
        binder.as_any().downcast_ref::<T>()
    }

    pub fn binder_mut<T: Binder + 'static>(&mut self, key: BinderKey) -> Option<&mut T> {
        let entry = self.entries.iter_mut().find(|e| e.key == key)?;
        let binder: &mut dyn Binder = entry.binder.as_mut();
        binder.as_any_mut().downcast_mut::<T>()
    }

    /// Whether the binder was updated by the last pass
    pub fn is_rendered(&self, key: BinderKey) -> bool {
        self.entries.iter().any(|e| e.key == key && e.mounted)
    }

    /// Number of registered binders
    pub fn binder_count(&self) -> usize {
        self.entries.len()
    }

    /// One effect pass
    pub fn render(&mut self) {
        let Self {
            tree,
            window,
            resolver,
            styles,
            class_names,
            container,
            entries,
            ..
        } = self;

        container.refresh(tree, window, resolver);
        if let Some(block) = container.style_block() {
            styles.upsert(tree, &block);
        }
        let Some(root) = container.root else {
            tracing::trace!("render before mount");
            return;
        };

        for entry in entries.iter_mut() {
            let open = entry.gate.as_ref().is_none_or(|g| g.matches(window));
            let mut scope = Scope {
                tree: &mut *tree,
                window: &mut *window,
                styles: &mut *styles,
                resolver: &*resolver,
                class_names: &**class_names,
                container: &*container,
                root: Some(root),
                key: entry.key,
            };
            if open {
                entry.binder.update(&mut scope);
                entry.mounted = true;
            } else if entry.mounted {
                tracing::debug!("{} gated out", entry.key);
                entry.binder.unmount(&mut scope);
                entry.mounted = false;
            }
        }
    }

    /// Apply a new viewport: subscribed binders get `resize`, then a pass runs
    pub fn resize(&mut self, viewport: Viewport) {
        self.window.viewport = Some(viewport);
        tracing::trace!("resize to {}x{}", viewport.width, viewport.height);

        let Self {
            tree,
            window,
            resolver,
            styles,
            class_names,
            container,
            entries,
            ..
        } = self;

        if window.is_subscribed(BinderKey::CONTAINER) {
            container.refresh(tree, window, resolver);
        }
        for entry in entries.iter_mut() {
            if !entry.mounted || !window.is_subscribed(entry.key) {
                continue;
            }
            let mut scope = Scope {
                tree: &mut *tree,
                window: &mut *window,
                styles: &mut *styles,
                resolver: &*resolver,
                class_names: &**class_names,
                container: &*container,
                root: container.root,
                key: entry.key,
            };
            entry.binder.resize(&mut scope);
        }
        self.render();
    }

    /// Unmount and drop one binder. Returns whether it was registered.
    pub fn remove(&mut self, key: BinderKey) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.key == key) else {
            return false;
        };
        let mut entry = self.entries.remove(index);
        if entry.mounted {
            let mut scope = Scope {
                tree: &mut self.tree,
                window: &mut self.window,
                styles: &mut self.styles,
                resolver: &self.resolver,
                class_names: &*self.class_names,
                container: &self.container,
                root: self.container.root,
                key,
            };
            entry.binder.unmount(&mut scope);
        }
        true
    }

    /// Unmount every binder (last registered first), drop them and release
    /// the container's class, style blocks and subscription
    pub fn unmount(&mut self) -> FlexyResult<()> {
        let Some(root) = self.container.root else {
            return Err(FlexyError::NotMounted);
        };

        for mut entry in self.entries.drain(..).rev() {
            if !entry.mounted {
                continue;
            }
            let mut scope = Scope {
                tree: &mut self.tree,
                window: &mut self.window,
                styles: &mut self.styles,
                resolver: &self.resolver,
                class_names: &*self.class_names,
                container: &self.container,
                root: Some(root),
                key: entry.key,
            };
            entry.binder.unmount(&mut scope);
        }

        self.styles.clear(&mut self.tree);
        self.window.unsubscribe(BinderKey::CONTAINER);
        if let Some(class) = &self.container.class_name {
            if self.tree.remove_class(root, class).is_err() {
                tracing::trace!("container root {root} is gone");
            }
        }
        self.container = ContainerState {
            options: std::mem::take(&mut self.container.options),
            ..ContainerState::default()
        };
        tracing::debug!("container unmounted");
        Ok(())
    }

    /// Dispatch a bubbling event; returns the number of handlers run
    pub fn dispatch(&self, node: NodeId, event_type: &str) -> usize {
        self.tree.dispatch_event(&DomEvent::new(event_type, node))
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    pub fn container(&self) -> &ContainerState {
        &self.container
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    pub fn resolver(&self) -> &StyleResolver {
        &self.resolver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Component, Deletion, SequentialClassNames};

    const EXPORT: &str = r#"<html><head></head><body>
        <div id="app"><div flexy-container style="width: 400px; height: 800px">
            <div data-name="Title">Hello</div>
            <div data-name="Ad">Buy</div>
        </div></div>
    </body></html>"#;

    fn runtime(viewport: Viewport) -> (Flexy, NodeId) {
        let mut flexy = Flexy::from_html(EXPORT, Window::new(viewport))
            .with_class_names(SequentialClassNames::new());
        let root = flexy.tree().query_selector(NodeId::ROOT, "#app").unwrap();
        (flexy, root)
    }

    #[test]
    fn test_mount_tags_root_and_injects_styles() {
        let (mut flexy, root) = runtime(Viewport::new(1000.0, 1000.0));
        flexy
            .mount(root, ContainerOptions::default().fit(crate::FitMode::Height))
            .unwrap();
        flexy.render();

        assert!(flexy.tree().element(root).unwrap().class_list.contains("flexy-uc-0"));
        assert_eq!(flexy.container().scale, Some(0.5));
        let css = flexy.styles().css(flexy.tree(), "flexy-uc-0").unwrap();
        assert!(css.contains(".flexy-uc-0 { transform: scale(0.5); }"));

        let head = flexy.tree().query_selector(NodeId::ROOT, "head").unwrap();
        assert_eq!(flexy.styles().host(), Some(head));
    }

    #[test]
    fn test_collapsed_viewport_drops_transform() {
        let (mut flexy, root) = runtime(Viewport::new(1000.0, 1000.0));
        flexy
            .mount(root, ContainerOptions::default().fit(crate::FitMode::Height))
            .unwrap();
        flexy.render();

        flexy.resize(Viewport::new(0.0, 1000.0));
        assert_eq!(flexy.container().scale, None);
        let css = flexy.styles().css(flexy.tree(), "flexy-uc-0").unwrap();
        assert!(!css.contains("transform"));
    }

    #[test]
    fn test_mount_rejects_text_node() {
        let (mut flexy, root) = runtime(Viewport::new(1000.0, 1000.0));
        let text = flexy.tree_mut().create_text("x");
        flexy.tree_mut().append_child(root, text).unwrap();
        assert!(matches!(
            flexy.mount(text, ContainerOptions::default()),
            Err(FlexyError::Dom(DomError::InvalidNodeType(_)))
        ));
    }

    #[test]
    fn test_binders_wait_for_mount() {
        let (mut flexy, root) = runtime(Viewport::new(1000.0, 1000.0));
        let key = flexy.add(Deletion::new("Ad"));
        flexy.render();
        assert!(!flexy.is_rendered(key));

        flexy.mount(root, ContainerOptions::default()).unwrap();
        flexy.render();
        assert!(flexy.is_rendered(key));
        assert_eq!(flexy.binder::<Deletion>(key).unwrap().removed(), 1);
        assert!(flexy.binder::<Component>(key).is_none());
    }

    #[test]
    fn test_unmount_releases_everything() {
        let (mut flexy, root) = runtime(Viewport::new(1000.0, 1000.0));
        flexy.mount(root, ContainerOptions::default()).unwrap();
        flexy.add(Component::new("Title").on("onClick", flexy_dom::handler(|_| {})));
        flexy.render();
        let title = flexy
            .tree()
            .query_selector(root, r#"[data-name="Title"]"#)
            .unwrap();
        assert_eq!(flexy.tree().listener_count(title), 1);

        flexy.unmount().unwrap();
        assert_eq!(flexy.tree().listener_count(title), 0);
        assert!(flexy.styles().is_empty());
        assert_eq!(flexy.window().resize_listener_count(), 0);
        assert_eq!(flexy.binder_count(), 0);
        assert!(flexy.tree().element(root).unwrap().class_list.is_empty());
        assert!(matches!(flexy.unmount(), Err(FlexyError::NotMounted)));
    }

    #[test]
    fn test_remove_unmounts_binder() {
        let (mut flexy, root) = runtime(Viewport::new(1000.0, 1000.0));
        flexy.mount(root, ContainerOptions::default()).unwrap();
        let key = flexy.add(Component::new("Title").on("onClick", flexy_dom::handler(|_| {})));
        flexy.render();
        let title = flexy
            .tree()
            .query_selector(root, r#"[data-name="Title"]"#)
            .unwrap();

        assert!(flexy.remove(key));
        assert!(!flexy.remove(key));
        assert_eq!(flexy.tree().listener_count(title), 0);
    }
}
