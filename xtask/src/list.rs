use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use hal_select::{HalName, HalSelector, LinkStatus};

pub fn run(base_dir: &Path) -> Result<()> {
    let selector = HalSelector::new(base_dir);
    let variants = selector
        .available_variants()
        .with_context(|| format!("Failed to list HALs in {}", selector.source_dir().display()))?;
    let current = current_variant(&selector.status()?);

    println!();
    println!("{}", "📦 Available HAL variants".cyan().bold());
    if variants.is_empty() {
        println!("   {}", "none found".yellow());
    }
    for line in render(&variants, current.as_ref()) {
        println!("{line}");
    }
    println!();

    Ok(())
}

fn current_variant(status: &LinkStatus) -> Option<HalName> {
    match status {
        LinkStatus::Linked { variant, .. } => variant.clone(),
        LinkStatus::Missing | LinkStatus::NotALink => None,
    }
}

/// One line per variant; the linked one is starred.
fn render(variants: &[HalName], current: Option<&HalName>) -> Vec<String> {
    variants
        .iter()
        .map(|v| {
            if Some(v) == current {
                format!("  {} {}", "*".green().bold(), v.as_str().green())
            } else {
                format!("    {v}")
            }
        })
        .collect()
}
