//! Window state
//!
//! The display surface the overlay renders into. `viewport: None` models a
//! context without one (server rendering): fit is not computed and device
//! gates fall back to their `default` flag.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::BinderKey;

/// Inner size of the window in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Parse `WIDTHxHEIGHT`
    pub fn parse(s: &str) -> Option<Self> {
        let (w, h) = s.split_once(['x', 'X'])?;
        let width = w.trim().parse::<f64>().ok()?;
        let height = h.trim().parse::<f64>().ok()?;
        (width > 0.0 && height > 0.0).then_some(Self { width, height })
    }
}

/// Viewport, navigator language and resize subscriptions
#[derive(Debug, Clone)]
pub struct Window {
    pub viewport: Option<Viewport>,
    /// `navigator.language`
    pub language: String,
    resize_listeners: BTreeSet<BinderKey>,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            viewport: None,
            language: "en-US".to_string(),
            resize_listeners: BTreeSet::new(),
        }
    }
}

impl Window {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport: Some(viewport),
            ..Self::default()
        }
    }

    /// A window without a display surface
    pub fn headless() -> Self {
        Self::default()
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Subscribe to resize notifications; returns false if already subscribed
    pub fn subscribe(&mut self, key: BinderKey) -> bool {
        self.resize_listeners.insert(key)
    }

    /// Returns whether a subscription was removed
    pub fn unsubscribe(&mut self, key: BinderKey) -> bool {
        self.resize_listeners.remove(&key)
    }

    pub fn is_subscribed(&self, key: BinderKey) -> bool {
        self.resize_listeners.contains(&key)
    }

    /// Number of live resize subscriptions
    pub fn resize_listener_count(&self) -> usize {
        self.resize_listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_viewport() {
        assert_eq!(Viewport::parse("1000x800"), Some(Viewport::new(1000.0, 800.0)));
        assert_eq!(Viewport::parse("0x800"), None);
        assert_eq!(Viewport::parse("wide"), None);
    }

    #[test]
    fn test_subscriptions() {
        let mut window = Window::headless();
        assert!(window.subscribe(BinderKey(3)));
        assert!(!window.subscribe(BinderKey(3)));
        assert_eq!(window.resize_listener_count(), 1);
        assert!(window.unsubscribe(BinderKey(3)));
        assert!(!window.unsubscribe(BinderKey(3)));
        assert_eq!(window.resize_listener_count(), 0);
    }
}
