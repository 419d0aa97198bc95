use std::path::Path;

use anyhow::{bail, Context, Result};

use curtain_core::{parse_page, AppConfig};

use crate::scenario;

pub fn run(config: &AppConfig, page_path: &Path, scenario_path: Option<&Path>) -> Result<()> {
    let content = std::fs::read_to_string(page_path)
        .with_context(|| format!("reading page {}", page_path.display()))?;
    let doc = parse_page(&content)?;
    let markers = &config.markers;

    let targets = doc.with_class(&markers.reveal_class);
    let loader = doc.by_element_id(&markers.loader_id);
    let hero = doc.with_class(&markers.hero_class).into_iter().next();

    println!("page: {}", page_path.display());
    println!("  reveal targets: {}", targets.len());
    match loader {
        Some(_) => println!("  loader: '{}' present", markers.loader_id),
        None => println!("  loader: absent (loading orchestration will be skipped)"),
    }
    match hero {
        Some(node) => {
            let gated = doc.descendants_with_class(node, &markers.reveal_class);
            println!("  hero: present with {} gated elements", gated.len());
            if gated.is_empty() {
                println!("  note: hero container has no reveal-eligible children");
            }
        }
        None => println!("  hero: absent (gate stays inactive)"),
    }
    if targets.is_empty() {
        println!("  warning: no elements carry the '{}' class", markers.reveal_class);
    }

    if let Some(path) = scenario_path {
        let scenario = scenario::load(path)?;
        if scenario.steps.is_empty() {
            bail!("scenario {} has no steps", path.display());
        }
        println!("scenario: {} ({} steps)", path.display(), scenario.steps.len());
    }

    Ok(())
}
