//! End-to-end overlays on a parsed design export

use std::cell::Cell;
use std::rc::Rc;

use flexy::{
    handler, Breakpoint, Bounds, Component, ContainerOptions, Deletion, DeviceGate, DeviceType,
    Direction, FitMode, Flexy, Floating, Fullsize, Input, Item, List, ListOptions, ListPreset,
    NodeId, Portal, PortalContent, PortalState, Property, SequentialClassNames, Viewport, Window,
};

const EXPORT: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <style>
      .label { font-size: 14px; font-family: Arial; text-align: center; }
      .field-bg { border-radius: 8px; }
    </style>
  </head>
  <body>
    <div id="app">
      <div flexy-container style="width: 400px; height: 800px">
        <div data-name="Title">Hello</div>
        <div data-name="Background" style="left: 10px"></div>
        <div data-name="Cards"><div data-name="Card"><span data-name="Label">Card</span></div></div>
        <div data-name="Field" class="field">
          <div data-name="FieldBg" class="field-bg"></div>
          <span data-name="Placeholder" class="label">Type here</span>
        </div>
        <div data-name="Ad">Sale</div>
      </div>
    </div>
  </body>
</html>"#;

fn mounted(viewport: Viewport) -> (Flexy, NodeId) {
    mounted_with(EXPORT, viewport)
}

fn mounted_with(html: &str, viewport: Viewport) -> (Flexy, NodeId) {
    let mut flexy = Flexy::from_html(html, Window::new(viewport))
        .with_class_names(SequentialClassNames::new());
    let root = flexy.tree().query_selector(NodeId::ROOT, "#app").unwrap();
    flexy
        .mount(root, ContainerOptions::default().fit(FitMode::Height))
        .unwrap();
    (flexy, root)
}

fn named(flexy: &Flexy, name: &str) -> Option<NodeId> {
    flexy::resolve::select(flexy.tree(), Some(NodeId::ROOT), name)
}

#[test]
fn test_portrait_design_scales_and_fullsize_widens() {
    let (mut flexy, _) = mounted(Viewport::new(1000.0, 1000.0));
    let key = flexy.add(Fullsize::new("Background"));
    flexy.render();

    let geometry = flexy.container().geometry.unwrap();
    assert_eq!(geometry.fit_height_vw, 200.0);
    assert_eq!(geometry.current_height_px, 2000.0);
    assert_eq!(geometry.fit_scale, 0.5);

    let class = flexy.binder::<Fullsize>(key).unwrap().class_name().unwrap().to_string();
    let background = named(&flexy, "Background").unwrap();
    assert!(flexy.tree().element(background).unwrap().class_list.contains(&class));

    let css = flexy.styles().css(flexy.tree(), &class).unwrap();
    assert!(css.contains("width: 2000px !important"));
    assert!(css.contains("margin-left: -500px !important"));
    assert!(css.contains("left: initial !important"));
}

#[test]
fn test_floating_follows_resize() {
    let wide = r#"<body><div id="app"><div flexy-container style="width: 400px; height: 200px">
        <div data-name="Footer">Buy now</div>
    </div></div></body>"#;
    let (mut flexy, _) = mounted_with(wide, Viewport::new(1000.0, 1000.0));
    let key = flexy.add(Floating::bottom("Footer"));
    flexy.render();

    let floating = flexy.binder::<Floating>(key).unwrap();
    assert!(floating.is_floating());
    let class = floating.class_name().unwrap().to_string();
    let css = flexy.styles().css(flexy.tree(), &class).unwrap();
    assert!(css.contains("position: fixed !important"));
    assert!(css.contains("bottom: 0"));
    // container plus the floating layer
    assert_eq!(flexy.window().resize_listener_count(), 2);

    flexy.resize(Viewport::new(1000.0, 200.0));
    assert!(!flexy.binder::<Floating>(key).unwrap().is_floating());
    assert!(flexy.styles().node(&class).is_none());

    flexy.unmount().unwrap();
    assert_eq!(flexy.window().resize_listener_count(), 0);
    let footer = named(&flexy, "Footer").unwrap();
    assert!(!flexy.tree().element(footer).unwrap().class_list.contains(&class));
}

#[test]
fn test_breakpoint_gate_mounts_and_unmounts() {
    let (mut flexy, _) = mounted(Viewport::new(600.0, 800.0));
    let gate = DeviceGate::new().breakpoint(Breakpoint::max(Bounds::width(500.0)));
    let clicks = Rc::new(Cell::new(0));
    let counter = clicks.clone();
    let key = flexy.add_gated(
        gate,
        Component::new("Title")
            .property("innerText", "Compact")
            .on("onClick", handler(move |_| counter.set(counter.get() + 1))),
    );
    let title = named(&flexy, "Title").unwrap();

    flexy.render();
    assert!(!flexy.is_rendered(key));
    assert_eq!(flexy.tree().text_content(title), "Hello");

    flexy.resize(Viewport::new(400.0, 800.0));
    assert!(flexy.is_rendered(key));
    assert_eq!(flexy.tree().text_content(title), "Compact");
    assert_eq!(flexy.dispatch(title, "click"), 1);
    assert_eq!(clicks.get(), 1);

    flexy.resize(Viewport::new(600.0, 800.0));
    assert!(!flexy.is_rendered(key));
    assert_eq!(flexy.tree().listener_count(title), 0);
    assert_eq!(flexy.dispatch(title, "click"), 0);
}

#[test]
fn test_gate_without_display_surface_uses_default() {
    let mut flexy = Flexy::from_html(EXPORT, Window::headless());
    let root = flexy.tree().query_selector(NodeId::ROOT, "#app").unwrap();
    flexy.mount(root, ContainerOptions::default()).unwrap();
    let shown = flexy.add_gated(
        DeviceGate::new().device_types(DeviceType::Mobile).with_default(true),
        Component::new("Title"),
    );
    let hidden = flexy.add_gated(
        DeviceGate::new().device_types(DeviceType::Mobile),
        Component::new("Ad"),
    );
    flexy.render();

    assert!(flexy.is_rendered(shown));
    assert!(!flexy.is_rendered(hidden));
    assert!(flexy.container().geometry.is_none());
}

#[test]
fn test_row_list_stamps_items() {
    let (mut flexy, _) = mounted(Viewport::new(1000.0, 1000.0));
    let list = List::new(ListOptions::new("Cards", "Card").direction(Direction::Row))
        .item(Item::new().child(Property::new("Label").property("innerText", "One")))
        .item(Item::new().property("title", "second"));
    let key = flexy.add(list);
    flexy.render();

    let cards = named(&flexy, "Cards").unwrap();
    let tree = flexy.tree();
    let cards_elem = tree.element(cards).unwrap();
    assert_eq!(cards_elem.style.get_property_value("flex-direction"), Some("row"));
    assert!(cards_elem.has_attr(flexy::LIST_ATTR));

    let list = flexy.binder::<List>(key).unwrap();
    let nodes: Vec<NodeId> = list.items().iter().filter_map(Item::node).collect();
    assert_eq!(nodes.len(), 2);
    assert_eq!(tree.child_ids(cards), nodes);

    let label = flexy::resolve::select(tree, Some(nodes[0]), "Label").unwrap();
    assert_eq!(tree.text_content(label), "One");
    assert_eq!(tree.get_attribute(nodes[1], "title").as_deref(), Some("second"));

    // a second pass neither restamps nor duplicates
    flexy.render();
    assert_eq!(flexy.tree().child_ids(cards).len(), 2);

    flexy.remove(key);
    let template = named(&flexy, "Card").unwrap();
    assert_eq!(flexy.tree().child_ids(cards), vec![template]);
}

#[test]
fn test_row_preset_lays_out_list() {
    let (mut flexy, _) = mounted(Viewport::new(1000.0, 1000.0));
    let options = ListOptions::new("Cards", "Card").preset(ListPreset::RowList);
    flexy.add(List::new(options).item(Item::new()));
    flexy.render();

    let cards = named(&flexy, "Cards").unwrap();
    assert_eq!(
        flexy.tree().element(cards).unwrap().style.get_property_value("flex-direction"),
        Some("row")
    );
}

#[test]
fn test_portal_waits_for_missing_target() {
    let (mut flexy, root) = mounted(Viewport::new(1000.0, 1000.0));
    let key = flexy.add(
        Portal::under("Slot")
            .attribute("id", "portal")
            .style("backgroundColor", "red")
            .content(PortalContent::Text("Injected".to_string())),
    );
    flexy.render();
    assert_eq!(flexy.binder::<Portal>(key).unwrap().state(), &PortalState::Unset);

    let tree = flexy.tree_mut();
    let slot = tree.create_element("div");
    tree.set_attribute(slot, "data-name", "Slot").unwrap();
    tree.append_child(root, slot).unwrap();
    flexy.render();

    let portal = flexy.binder::<Portal>(key).unwrap().node().unwrap();
    let tree = flexy.tree();
    assert_eq!(tree.parent(portal), Some(slot));
    assert_eq!(tree.text_content(portal), "Injected");
    assert_eq!(tree.get_attribute(portal, "id").as_deref(), Some("portal"));
    assert_eq!(
        tree.element(portal).unwrap().style.get_property_value("background-color"),
        Some("red")
    );

    flexy.unmount().unwrap();
    assert!(flexy.tree().child_ids(slot).is_empty());
}

#[test]
fn test_rebinding_leaves_no_residual_listeners() {
    let (mut flexy, _) = mounted(Viewport::new(1000.0, 1000.0));
    let noop = handler(|_| {});
    let key = flexy.add(
        Component::new("Title")
            .on("onClick", noop.clone())
            .on("onMouseEnter", noop),
    );
    let title = named(&flexy, "Title").unwrap();

    for _ in 0..3 {
        flexy.render();
        assert_eq!(flexy.tree().listener_count(title), 2);
    }
    assert_eq!(flexy.tree().listener_count_for(title, "mouseenter"), 1);

    assert!(flexy.remove(key));
    assert_eq!(flexy.tree().listener_count(title), 0);
}

#[test]
fn test_input_takes_design_styling() {
    let (mut flexy, root) = mounted(Viewport::new(1000.0, 1000.0));
    let changes = Rc::new(Cell::new(0));
    let counter = changes.clone();
    let key = flexy.add(
        Input::new("Field")
            .text("Placeholder")
            .background("FieldBg")
            .property("placeholder", "Type here")
            .on("onInput", handler(move |_| counter.set(counter.get() + 1))),
    );
    flexy.render();

    assert!(named(&flexy, "Field").is_none());
    let input = flexy.binder::<Input>(key).unwrap().input().unwrap();
    let tree = flexy.tree();
    assert_eq!(tree.query_selector(root, "input"), Some(input));
    let elem = tree.element(input).unwrap();
    assert!(elem.class_list.contains("field"));
    assert_eq!(elem.style.get_property_value("font-size"), Some("14px"));
    assert_eq!(elem.style.get_property_value("font-family"), Some("Arial"));
    assert_eq!(elem.style.get_property_value("text-align"), Some("center"));
    assert_eq!(elem.style.get_property_value("border-radius"), Some("8px"));
    assert_eq!(elem.style.get_property_value("box-sizing"), Some("border-box"));
    assert_eq!(tree.get_attribute(input, "placeholder").as_deref(), Some("Type here"));

    assert_eq!(flexy.dispatch(input, "input"), 1);
    assert_eq!(changes.get(), 1);

    // one-time per mount
    flexy.render();
    assert_eq!(flexy.tree().query_selector_all(root, "input").len(), 1);
}

#[test]
fn test_input_takes_shorthand_styling() {
    let export = r#"<html><head><style>
        .txt { font: italic 700 14px Arial; text-decoration: underline; }
        .bg { background: #ffffff; border: 1px solid red; border-radius: 4px 8px; }
    </style></head><body><div id="app"><div flexy-container style="width: 400px; height: 800px">
        <div data-name="Field">
            <div data-name="Bg" class="bg"></div>
            <span data-name="Txt" class="txt">Email</span>
        </div>
    </div></div></body></html>"#;
    let (mut flexy, _) = mounted_with(export, Viewport::new(1000.0, 1000.0));
    let key = flexy.add(Input::new("Field").text("Txt").background("Bg"));
    flexy.render();

    let input = flexy.binder::<Input>(key).unwrap().input().unwrap();
    let style = &flexy.tree().element(input).unwrap().style;
    assert_eq!(style.get_property_value("font-size"), Some("14px"));
    assert_eq!(style.get_property_value("font-style"), Some("italic"));
    assert_eq!(style.get_property_value("font-family"), Some("Arial"));
    assert!(style.get_property_value("font-weight").is_some());
    assert_eq!(style.get_property_value("text-decoration-line"), Some("underline"));
    assert_eq!(style.get_property_value("background-color"), Some("#fff"));
    assert_eq!(style.get_property_value("border-color"), Some("red"));
    assert_eq!(style.get_property_value("border-width"), Some("1px"));
    assert_eq!(style.get_property_value("border-style"), Some("solid"));
    assert_eq!(style.get_property_value("border-radius"), Some("4px 8px"));
}

#[test]
fn test_deletion_and_visibility() {
    let (mut flexy, _) = mounted(Viewport::new(1000.0, 1000.0));
    flexy.add(Deletion::new("Ad"));
    flexy.add(Component::new("Title").visible(false));
    flexy.render();

    assert!(named(&flexy, "Ad").is_none());
    let title = named(&flexy, "Title").unwrap();
    assert_eq!(
        flexy.tree().element(title).unwrap().style.get_property_value("visibility"),
        Some("hidden")
    );
}

#[test]
fn test_device_thresholds() {
    assert_eq!(DeviceType::for_width(768.0), DeviceType::Mobile);
    assert_eq!(DeviceType::for_width(769.0), DeviceType::Tablet);
    assert_eq!(DeviceType::for_width(1024.0), DeviceType::Tablet);
    assert_eq!(DeviceType::for_width(1025.0), DeviceType::Desktop);
}
