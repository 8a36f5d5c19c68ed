//! flexy-preview - apply an overlay to a design export and print the result
//!
//! Usage: `flexy-preview <export.html> [config.json] [WIDTHxHEIGHT] [lang]`

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use flexy::{Flexy, NodeId, OverlayConfig, Viewport, Window, CONTAINER_ATTR};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: flexy-preview <export.html> [config.json] [WIDTHxHEIGHT] [lang]";

struct Args {
    export: PathBuf,
    config: Option<PathBuf>,
    viewport: Viewport,
    language: Option<String>,
}

fn parse_viewport(raw: &str) -> Result<Viewport> {
    Viewport::parse(raw).ok_or_else(|| anyhow!("viewport must be formatted as WxH, got {raw:?}"))
}

fn parse_args() -> Result<Args> {
    let mut args = std::env::args().skip(1);
    let Some(export) = args.next() else {
        bail!(USAGE);
    };
    let mut parsed = Args {
        export: PathBuf::from(export),
        config: None,
        viewport: Viewport::new(1280.0, 720.0),
        language: None,
    };
    for arg in args {
        if arg.ends_with(".json") {
            parsed.config = Some(PathBuf::from(arg));
        } else if arg.contains('x') && arg.starts_with(|c: char| c.is_ascii_digit()) {
            parsed.viewport = parse_viewport(&arg)?;
        } else if parsed.language.is_none() {
            parsed.language = Some(arg);
        } else {
            bail!("unexpected argument {arg:?}\n{USAGE}");
        }
    }
    Ok(parsed)
}

/// `[flexy-container]`'s parent, else `<body>`
fn container_root(flexy: &Flexy) -> Option<NodeId> {
    let tree = flexy.tree();
    tree.query_selector(NodeId::ROOT, &format!("[{CONTAINER_ATTR}]"))
        .and_then(|container| tree.parent(container))
        .filter(|&parent| tree.element(parent).is_some())
        .or_else(|| tree.query_selector(NodeId::ROOT, "body"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let html = fs::read_to_string(&args.export)
        .with_context(|| format!("failed to read {}", args.export.display()))?;
    let config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            OverlayConfig::from_json(&json)
                .with_context(|| format!("invalid overlay config {}", path.display()))?
        }
        None => OverlayConfig::default(),
    };

    let mut window = Window::new(args.viewport);
    if let Some(language) = args.language {
        window = window.with_language(language);
    }
    let mut flexy = Flexy::from_html(&html, window);
    let root = container_root(&flexy).ok_or_else(|| anyhow!("export has no <body>"))?;
    flexy
        .mount(root, config.container.clone())
        .context("failed to mount container")?;
    let keys = config.apply(&mut flexy);
    flexy.render();

    tracing::info!(
        "rendered {} at {}x{} with {} binders, scale {:?}",
        args.export.display(),
        args.viewport.width,
        args.viewport.height,
        keys.len(),
        flexy.container().scale
    );
    println!("{}", flexy_html::outer_html(flexy.tree(), NodeId::ROOT));
    Ok(())
}
