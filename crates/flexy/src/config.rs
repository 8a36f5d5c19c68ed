//! Declarative overlays
//!
//! An [`OverlayConfig`] is the JSON form of an overlay: container options
//! plus the binders to register. Only properties can be expressed; event
//! handlers need code.

use std::collections::BTreeMap;

use flexy_dom::PropValue;
use serde::Deserialize;

use crate::container::ContainerOptions;
use crate::list::{Item, List, ListOptions};
use crate::placement::{Deletion, Floating, Fullsize};
use crate::portal::{Portal, PortalContent, PortalOptions};
use crate::{BinderKey, Component, DeviceGate, Flexy, FlexyResult, Input, Property};

type Props = BTreeMap<String, PropValue>;

fn visible_by_default() -> bool {
    true
}

/// A named layer with properties
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentConfig {
    pub name: String,
    #[serde(default)]
    pub properties: Props,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
}

impl ComponentConfig {
    fn build(&self) -> Component {
        let mut component = Component::new(&self.name).visible(self.visible);
        for (key, value) in &self.properties {
            component = component.property(key, value.clone());
        }
        component
    }
}

/// One list instance: its own properties plus properties of layers inside it
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemConfig {
    pub properties: Props,
    pub layers: BTreeMap<String, Props>,
}

impl ItemConfig {
    fn build(&self) -> Item {
        let mut item = Item::new();
        for (key, value) in &self.properties {
            item = item.property(key, value.clone());
        }
        for (name, props) in &self.layers {
            let mut property = Property::new(name);
            for (key, value) in props {
                property = property.property(key, value.clone());
            }
            item = item.child(property);
        }
        item
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListConfig {
    #[serde(flatten)]
    pub options: ListOptions,
    #[serde(default)]
    pub properties: Props,
    #[serde(default)]
    pub items: Vec<ItemConfig>,
    /// Minimum number of instances; missing ones are plain items
    #[serde(default)]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalConfig {
    #[serde(flatten)]
    pub options: PortalOptions,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputConfig {
    pub box_name: String,
    #[serde(default)]
    pub text_name: Option<String>,
    #[serde(default)]
    pub background_name: Option<String>,
    #[serde(default)]
    pub properties: Props,
}

/// Components that only render while a device gate matches
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceConfig {
    #[serde(flatten)]
    pub gate: DeviceGate,
    #[serde(default)]
    pub components: Vec<ComponentConfig>,
}

/// Whole overlay
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverlayConfig {
    pub container: ContainerOptions,
    pub components: Vec<ComponentConfig>,
    pub deletions: Vec<String>,
    pub floating: Vec<String>,
    pub fullsize: Vec<String>,
    pub lists: Vec<ListConfig>,
    pub portals: Vec<PortalConfig>,
    pub inputs: Vec<InputConfig>,
    pub devices: Vec<DeviceConfig>,
}

impl OverlayConfig {
    pub fn from_json(json: &str) -> FlexyResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the container options and register every binder, in the order
    /// deletions, inputs, lists, components, portals, floating, fullsize,
    /// device-gated components
    pub fn apply(&self, flexy: &mut Flexy) -> Vec<BinderKey> {
        flexy.set_container_options(self.container.clone());
        let mut keys = Vec::new();

        for name in &self.deletions {
            keys.push(flexy.add(Deletion::new(name)));
        }
        for input in &self.inputs {
            let mut binder = Input::new(&input.box_name);
            if let Some(text) = &input.text_name {
                binder = binder.text(text);
            }
            if let Some(background) = &input.background_name {
                binder = binder.background(background);
            }
            for (key, value) in &input.properties {
                binder = binder.property(key, value.clone());
            }
            keys.push(flexy.add(binder));
        }
        for list in &self.lists {
            let mut binder = List::new(list.options.clone());
            for (key, value) in &list.properties {
                binder = binder.property(key, value.clone());
            }
            for item in &list.items {
                binder.push_item(item.build());
            }
            for _ in list.items.len()..list.count {
                binder.push_item(Item::new());
            }
            keys.push(flexy.add(binder));
        }
        for component in &self.components {
            keys.push(flexy.add(component.build()));
        }
        for portal in &self.portals {
            let content = portal
                .text
                .clone()
                .map_or(PortalContent::Empty, PortalContent::Text);
            keys.push(flexy.add(Portal::new(portal.options.clone()).content(content)));
        }
        for name in &self.floating {
            keys.push(flexy.add(Floating::bottom(name)));
        }
        for name in &self.fullsize {
            keys.push(flexy.add(Fullsize::new(name)));
        }
        for device in &self.devices {
            for component in &device.components {
                keys.push(flexy.add_gated(device.gate.clone(), component.build()));
            }
        }

        tracing::debug!("overlay config registered {} binders", keys.len());
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::Direction;
    use crate::{DeviceType, FitMode};

    const CONFIG: &str = r#"{
        "container": { "fit": "height", "backgroundColor": "auto" },
        "components": [
            { "name": "Title", "properties": { "innerText": "Hi", "hidden": false } },
            { "name": "Badge", "visible": false }
        ],
        "deletions": ["Ad"],
        "floating": ["Footer"],
        "lists": [{
            "list": "Cards",
            "item": "Card",
            "direction": "row",
            "gap": 12,
            "count": 3,
            "items": [
                { "layers": { "Label": { "innerText": "One" } } },
                { "properties": { "title": "second" } }
            ]
        }],
        "portals": [{ "name": "Slot", "attributes": { "id": "p" }, "text": "hello" }],
        "inputs": [{ "boxName": "Field", "textName": "Placeholder" }],
        "devices": [{
            "deviceTypes": "mobile",
            "breakpoints": [{ "max": [500] }],
            "components": [{ "name": "MobileOnly" }]
        }]
    }"#;

    #[test]
    fn test_parse_camel_case_config() {
        let config = OverlayConfig::from_json(CONFIG).unwrap();
        assert_eq!(config.container.fit, Some(FitMode::Height));
        assert!(config.components[0].visible);
        assert!(!config.components[1].visible);
        assert_eq!(
            config.components[0].properties.get("hidden"),
            Some(&PropValue::Bool(false))
        );
        assert_eq!(config.lists[0].options.direction, Some(Direction::Row));
        assert_eq!(config.lists[0].items.len(), 2);
        assert_eq!(config.portals[0].options.name.as_deref(), Some("Slot"));
        assert_eq!(config.portals[0].text.as_deref(), Some("hello"));
        assert_eq!(config.inputs[0].text_name.as_deref(), Some("Placeholder"));
        assert_eq!(config.inputs[0].background_name, None);
        let gate = &config.devices[0].gate;
        assert!(gate.device_types.as_ref().unwrap().contains(&DeviceType::Mobile));
        assert_eq!(gate.breakpoints.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(matches!(
            OverlayConfig::from_json(r#"{ "deletions": 3 }"#),
            Err(crate::FlexyError::Config(_))
        ));
    }

    #[test]
    fn test_apply_registers_every_binder() {
        let config = OverlayConfig::from_json(CONFIG).unwrap();
        let mut flexy = Flexy::new(flexy_dom::DomTree::new(), crate::Window::headless());
        let keys = config.apply(&mut flexy);

        assert_eq!(keys.len(), 8);
        assert_eq!(flexy.binder_count(), 8);
        assert_eq!(flexy.container().options.fit, Some(FitMode::Height));
        assert_eq!(flexy.binder::<List>(keys[2]).unwrap().items().len(), 3);
    }
}
