//! Overlays described as JSON

use flexy::{Flexy, NodeId, OverlayConfig, SequentialClassNames, Viewport, Window};

const EXPORT: &str = r#"<html><head></head><body>
  <div id="app">
    <div flexy-container style="width: 400px; height: 800px; background-color: rgb(10, 20, 30)">
      <div data-name="Title">Hello</div>
      <div data-name="Ad">Sale</div>
      <div data-name="Banner">Mobile only</div>
    </div>
  </div>
</body></html>"#;

const CONFIG: &str = r##"{
    "container": { "fit": "height", "backgroundColor": "#fafafa", "adjustTextSize": true },
    "components": [{ "name": "Title", "properties": { "innerText": "Welcome" } }],
    "deletions": ["Ad"],
    "portals": [{ "text": "footer", "attributes": { "className": "injected" } }],
    "devices": [{
        "deviceTypes": ["mobile"],
        "components": [{ "name": "Banner", "visible": false }]
    }]
}"##;

fn overlay(viewport: Viewport) -> Flexy {
    let mut flexy = Flexy::from_html(EXPORT, Window::new(viewport))
        .with_class_names(SequentialClassNames::new());
    let config = OverlayConfig::from_json(CONFIG).unwrap();
    let root = flexy.tree().query_selector(NodeId::ROOT, "#app").unwrap();
    flexy.mount(root, config.container.clone()).unwrap();
    config.apply(&mut flexy);
    flexy.render();
    flexy
}

#[test]
fn test_config_renders_overlay() {
    let flexy = overlay(Viewport::new(1000.0, 1000.0));
    let tree = flexy.tree();
    let root = flexy.container().root.unwrap();

    let title = tree.query_selector(root, r#"[data-name="Title"]"#).unwrap();
    assert_eq!(tree.text_content(title), "Welcome");
    assert!(tree.query_selector(root, r#"[data-name="Ad"]"#).is_none());

    let portal = tree.query_selector(root, ".injected").unwrap();
    assert_eq!(tree.parent(portal), Some(root));
    assert_eq!(tree.text_content(portal), "footer");

    let css = flexy.styles().css(tree, "flexy-uc-0").unwrap();
    assert!(css.contains("transform: scale(0.5)"));
    assert!(css.contains("body { background-color: #fafafa; }"));
    assert!(css.contains("text-size-adjust: none"));

    let html = flexy_html::outer_html(tree, NodeId::ROOT);
    assert!(html.contains("data-flexy-scope=\"flexy-uc-0\""));
}

#[test]
fn test_device_section_follows_viewport() {
    let desktop = overlay(Viewport::new(1400.0, 900.0));
    let banner = desktop
        .tree()
        .query_selector(NodeId::ROOT, r#"[data-name="Banner"]"#)
        .unwrap();
    assert_eq!(
        desktop.tree().element(banner).unwrap().style.get_property_value("visibility"),
        None
    );

    let mobile = overlay(Viewport::new(375.0, 812.0));
    let banner = mobile
        .tree()
        .query_selector(NodeId::ROOT, r#"[data-name="Banner"]"#)
        .unwrap();
    assert_eq!(
        mobile.tree().element(banner).unwrap().style.get_property_value("visibility"),
        Some("hidden")
    );
}
