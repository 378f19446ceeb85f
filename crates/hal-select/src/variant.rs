//! HAL variant names and discovery.
//!
//! A variant named `stm32` lives in `<source_dir>/hal_stm32`. Names are always
//! lowercase: a definition `HAL=STM32` selects `hal_stm32`.

use core::fmt;
use std::fs;
use std::path::Path;

use crate::error::{SelectError, SelectResult};

/// Lowercase name of a HAL variant.
///
/// Cannot be empty and cannot contain path separators or be `.`/`..`, so
/// joining it onto the source directory always yields a direct child.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HalName(String);

impl HalName {
    /// Lowercase `value` and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::InvalidHalName`] for empty values, `.`/`..`, or
    /// values containing `/`, `\` or NUL.
    pub fn new(value: &str) -> SelectResult<Self> {
        let lowered = value.to_lowercase();
        let bad_char = lowered.contains(['/', '\\', '\0']);
        if lowered.is_empty() || lowered == "." || lowered == ".." || bad_char {
            return Err(SelectError::InvalidHalName {
                value: value.to_owned(),
            });
        }
        Ok(Self(lowered))
    }

    /// Recover a variant name from a directory name such as `hal_posix`.
    ///
    /// Returns `None` when the prefix is absent, the remainder is empty, or
    /// the remainder is not already lowercase (such a directory can never be
    /// selected).
    #[must_use]
    pub fn from_dir_name(dir_name: &str, prefix: &str) -> Option<Self> {
        let rest = dir_name.strip_prefix(prefix)?;
        let name = Self::new(rest).ok()?;
        (name.0 == rest).then_some(name)
    }

    /// The lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory name for this variant under `prefix`.
    #[must_use]
    pub fn dir_name(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.0)
    }
}

impl fmt::Display for HalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// List the variant directories under `source_dir`, sorted by name.
///
/// Entries that are not directories (after following symlinks) are skipped.
///
/// # Errors
///
/// Returns [`SelectError::Io`] if `source_dir` cannot be read.
pub fn scan_variants(source_dir: &Path, prefix: &str) -> SelectResult<Vec<HalName>> {
    let io_err = |source| SelectError::Io {
        path: source_dir.to_path_buf(),
        source,
    };
    let mut names = Vec::new();
    for entry in fs::read_dir(source_dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        let Some(name) = HalName::from_dir_name(&file_name, prefix) else {
            continue;
        };
        if entry.path().is_dir() {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn new_lowercases() {
        assert_eq!(HalName::new("STM32").unwrap().as_str(), "stm32");
        assert_eq!(HalName::new("Posix").unwrap().as_str(), "posix");
    }

    #[test]
    fn new_rejects_path_escapes() {
        for bad in ["", ".", "..", "../etc", "a/b", "a\\b", "x\0y"] {
            assert!(
                matches!(HalName::new(bad), Err(SelectError::InvalidHalName { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn dir_name_uses_prefix() {
        assert_eq!(HalName::new("PSoC5LP").unwrap().dir_name("hal_"), "hal_psoc5lp");
    }

    #[test]
    fn from_dir_name_requires_lowercase_suffix() {
        assert_eq!(
            HalName::from_dir_name("hal_posix", "hal_").map(|n| n.to_string()),
            Some("posix".to_owned())
        );
        assert!(HalName::from_dir_name("hal_STM32", "hal_").is_none());
        assert!(HalName::from_dir_name("hal_", "hal_").is_none());
        assert!(HalName::from_dir_name("hal", "hal_").is_none());
        assert!(HalName::from_dir_name("main.c", "hal_").is_none());
    }

    #[test]
    fn scan_lists_only_variant_dirs_sorted() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path();
        fs::create_dir(src.join("hal_stm32")).unwrap();
        fs::create_dir(src.join("hal_posix")).unwrap();
        fs::create_dir(src.join("hal_esp32")).unwrap();
        fs::create_dir(src.join("core")).unwrap();
        fs::write(src.join("hal_notes.txt"), b"not a dir").unwrap();

        let names: Vec<String> = scan_variants(src, "hal_")
            .unwrap()
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, ["esp32", "posix", "stm32"]);
    }

    #[test]
    fn scan_missing_dir_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = scan_variants(&tmp.path().join("nope"), "hal_").unwrap_err();
        assert!(matches!(err, SelectError::Io { .. }));
    }
}
