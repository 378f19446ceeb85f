use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;
use hal_select::{
    parse_cflags, Define, HalSelector, RemovePolicy, Selection, SelectionSource, SelectorConfig,
};
use tracing::debug;

pub fn run(
    defines: Vec<Define>,
    cflags: Option<&str>,
    base_dir: &Path,
    allow_missing: bool,
) -> Result<()> {
    println!();
    println!("{}", "🔗 Selecting HAL...".cyan().bold());

    let start = Instant::now();
    let defines = collect_defines(defines, cflags)?;
    let selection = match select(&defines, base_dir, allow_missing) {
        Ok(selection) => selection,
        Err(e) => {
            eprintln!("{}", "  ✗ HAL selection failed".red().bold());
            return Err(e);
        }
    };

    let origin = match selection.source {
        SelectionSource::Defined => "from HAL define",
        SelectionSource::Default => "default",
    };
    println!(
        "{}",
        format!(
            "  ✓ HAL {} ({}) in {:.2}s",
            selection.variant,
            origin,
            start.elapsed().as_secs_f64()
        )
        .green()
    );
    println!(
        "   {}",
        format!(
            "{} -> {}",
            selection.link.display(),
            selection.target.display()
        )
        .dimmed()
    );
    println!();

    Ok(())
}

/// Explicit `-D` arguments first, then definitions from the flag string.
pub(crate) fn collect_defines(mut defines: Vec<Define>, cflags: Option<&str>) -> Result<Vec<Define>> {
    if let Some(flags) = cflags {
        let parsed = parse_cflags(flags).context("Failed to parse --cflags")?;
        defines.extend(parsed);
    }
    debug!(count = defines.len(), "collected definitions");
    Ok(defines)
}

pub(crate) fn select(defines: &[Define], base_dir: &Path, allow_missing: bool) -> Result<Selection> {
    let policy = if allow_missing {
        RemovePolicy::IfExists
    } else {
        RemovePolicy::Strict
    };
    let config = SelectorConfig::default().with_remove_policy(policy);
    HalSelector::with_config(base_dir, config)
        .select(defines)
        .with_context(|| format!("Failed to select HAL in {}", base_dir.display()))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_fake_project(dir: &TempDir) {
        for name in ["hal_posix", "hal_stm32"] {
            fs::create_dir_all(dir.path().join("src").join(name)).unwrap();
        }
    }

    #[test]
    fn explicit_defines_precede_cflags() {
        let defines = collect_defines(
            vec![Define::pair("HAL", "stm32")],
            Some("-DHAL=posix -DDEBUG"),
        )
        .unwrap();
        assert_eq!(
            defines,
            vec![
                Define::pair("HAL", "stm32"),
                Define::pair("HAL", "posix"),
                Define::bare("DEBUG"),
            ]
        );
    }

    #[test]
    fn bad_cflags_are_reported() {
        let err = collect_defines(Vec::new(), Some("-D=1")).unwrap_err();
        assert!(err.to_string().contains("--cflags"));
    }

    #[cfg(unix)]
    #[test]
    fn allow_missing_creates_first_link() {
        let tmp = TempDir::new().unwrap();
        create_fake_project(&tmp);

        let err = select(&[], tmp.path(), false).unwrap_err();
        assert!(err.to_string().contains("Failed to select HAL"));

        let selection = select(&[Define::pair("HAL", "STM32")], tmp.path(), true).unwrap();
        assert_eq!(selection.variant.as_str(), "stm32");
        assert!(tmp.path().join("src/hal").is_dir());
    }
}
