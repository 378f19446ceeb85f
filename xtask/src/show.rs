use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use hal_select::{HalSelector, LinkStatus};

pub fn run(base_dir: &Path) -> Result<()> {
    let selector = HalSelector::new(base_dir);
    let link = selector.link_path();
    let status = selector
        .status()
        .with_context(|| format!("Failed to inspect {}", link.display()))?;

    println!();
    match status {
        LinkStatus::Linked {
            target,
            variant: Some(variant),
        } => {
            println!("{}", format!("✓ HAL: {variant}").green().bold());
            println!(
                "   {}",
                format!("{} -> {}", link.display(), target.display()).dimmed()
            );
        }
        LinkStatus::Linked {
            target,
            variant: None,
        } => {
            println!(
                "{}",
                format!("⚠ {} points outside the HAL variants", link.display())
                    .yellow()
                    .bold()
            );
            println!("   {}", format!("-> {}", target.display()).dimmed());
        }
        LinkStatus::NotALink => {
            println!(
                "{}",
                format!("⚠ {} exists but is not a symlink", link.display())
                    .yellow()
                    .bold()
            );
        }
        LinkStatus::Missing => {
            println!("{}", format!("✗ {} does not exist", link.display()).red().bold());
            println!(
                "   {}",
                "Run 'cargo xtask select-hal --allow-missing' to create it".dimmed()
            );
        }
    }
    println!();

    Ok(())
}
