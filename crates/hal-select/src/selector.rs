//! The HAL selector: point `<base>/src/hal` at one variant directory.
//!
//! # Sequence
//!
//! 1. Under [`RemovePolicy::Strict`], fail if nothing sits at the link path.
//! 2. Resolve the variant from the definitions (first `HAL=<name>` pair, else
//!    the default). Invalid names fail here, before the tree is touched.
//!    Then remove whatever sits at the link path.
//! 3. Create the link to the canonical path of `hal_<name>`. A missing
//!    variant directory fails; there is no silent fallback to the default.
//! 4. If the link is still absent afterwards, link the default variant.
//!
//! Single attempt, no locking. Two concurrent runs on one tree race and the
//! last writer wins.

use std::env;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{RemovePolicy, SelectorConfig};
use crate::define::{self, Define};
use crate::error::{SelectError, SelectResult};
use crate::variant::{self, HalName};

/// Why a variant was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    /// A `HAL=<name>` definition named it.
    Defined,
    /// No definition matched; the configured default was used.
    Default,
}

/// Outcome of a successful [`HalSelector::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Variant the link now points at.
    pub variant: HalName,
    /// How the variant was chosen.
    pub source: SelectionSource,
    /// Absolute path of the link.
    pub link: PathBuf,
    /// Canonical path of the variant directory (the link's target).
    pub target: PathBuf,
}

/// What currently occupies the link path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
    /// Nothing exists at the link path.
    Missing,
    /// A regular file or directory, not a symlink.
    NotALink,
    /// A symlink.
    Linked {
        /// Raw link target as stored in the link.
        target: PathBuf,
        /// Variant the target names, if it is a variant directory.
        variant: Option<HalName>,
    },
}

/// Selects a HAL variant inside one source tree.
#[derive(Debug, Clone)]
pub struct HalSelector {
    base_dir: PathBuf,
    config: SelectorConfig,
}

impl HalSelector {
    /// Selector for `base_dir` with the default conventions.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self::with_config(base_dir, SelectorConfig::default())
    }

    /// Selector for `base_dir` with custom conventions.
    pub fn with_config(base_dir: impl Into<PathBuf>, config: SelectorConfig) -> Self {
        Self {
            base_dir: base_dir.into(),
            config,
        }
    }

    /// Directory holding the variants and the link, as given (not absolutized).
    #[must_use]
    pub fn source_dir(&self) -> PathBuf {
        self.base_dir.join(&self.config.source_dir)
    }

    /// Link location, as given (not absolutized).
    #[must_use]
    pub fn link_path(&self) -> PathBuf {
        self.source_dir().join(&self.config.link_name)
    }

    /// Directory for `name`, as given (not absolutized).
    #[must_use]
    pub fn variant_dir(&self, name: &HalName) -> PathBuf {
        self.source_dir()
            .join(name.dir_name(&self.config.variant_prefix))
    }

    /// Pick the variant the definitions ask for, without touching the tree.
    ///
    /// The first pair whose name equals the configured key wins; later ones
    /// are ignored. Without a match the default variant is returned.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::InvalidHalName`] if the chosen value (or the
    /// configured default) cannot name a directory.
    pub fn resolve_variant(&self, defines: &[Define]) -> SelectResult<(HalName, SelectionSource)> {
        match define::find_value(defines, &self.config.define_key) {
            Some(value) => Ok((HalName::new(value)?, SelectionSource::Defined)),
            None => Ok((self.default_variant()?, SelectionSource::Default)),
        }
    }

    /// Re-point the link according to `defines`.
    ///
    /// # Errors
    ///
    /// - [`SelectError::MissingLink`] under the strict policy when the link
    ///   path is empty, checked first.
    /// - [`SelectError::InvalidHalName`] before anything is removed.
    /// - [`SelectError::RemoveFailed`] if the old entry cannot be removed.
    /// - [`SelectError::UnknownHal`] if the variant directory does not exist.
    /// - [`SelectError::LinkCreation`] if the link cannot be created.
    pub fn select(&self, defines: &[Define]) -> SelectResult<Selection> {
        let link = self.absolute(&self.link_path())?;
        if self.config.remove_policy == RemovePolicy::Strict && !entry_exists(&link) {
            return Err(SelectError::MissingLink { path: link });
        }
        let (variant, source) = self.resolve_variant(defines)?;

        self.remove_link(&link)?;

        let mut selection = Selection {
            target: self.link_variant(&link, &variant)?,
            variant,
            source,
            link,
        };

        if !is_symlink(&selection.link) {
            let fallback = self.default_variant()?;
            warn!(
                link = %selection.link.display(),
                fallback = %fallback,
                "link missing after creation, falling back to default HAL"
            );
            selection.target = self.link_variant(&selection.link, &fallback)?;
            selection.variant = fallback;
            selection.source = SelectionSource::Default;
        }

        info!(
            variant = %selection.variant,
            target = %selection.target.display(),
            defined = selection.source == SelectionSource::Defined,
            "HAL selected"
        );
        Ok(selection)
    }

    /// Variant directories present in the source tree, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::Io`] if the source directory cannot be read.
    pub fn available_variants(&self) -> SelectResult<Vec<HalName>> {
        variant::scan_variants(&self.source_dir(), &self.config.variant_prefix)
    }

    /// Inspect the link path without modifying it.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::Io`] if the entry exists but cannot be read.
    pub fn status(&self) -> SelectResult<LinkStatus> {
        let link = self.link_path();
        let meta = match fs::symlink_metadata(&link) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LinkStatus::Missing),
            Err(source) => return Err(SelectError::Io { path: link, source }),
        };
        if !meta.file_type().is_symlink() {
            return Ok(LinkStatus::NotALink);
        }
        let target = fs::read_link(&link).map_err(|source| SelectError::Io {
            path: link.clone(),
            source,
        })?;
        let variant = target
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| HalName::from_dir_name(n, &self.config.variant_prefix));
        Ok(LinkStatus::Linked { target, variant })
    }

    fn default_variant(&self) -> SelectResult<HalName> {
        HalName::new(&self.config.default_variant)
    }

    fn absolute(&self, path: &Path) -> SelectResult<PathBuf> {
        if path.is_absolute() {
            return Ok(absolute_in(Path::new(""), path));
        }
        let cwd = env::current_dir().map_err(|source| SelectError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(absolute_in(&cwd, path))
    }

    fn remove_link(&self, link: &Path) -> SelectResult<()> {
        let meta = match fs::symlink_metadata(link) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return match self.config.remove_policy {
                    RemovePolicy::Strict => Err(SelectError::MissingLink {
                        path: link.to_path_buf(),
                    }),
                    RemovePolicy::IfExists => {
                        debug!(link = %link.display(), "no previous HAL link");
                        Ok(())
                    }
                };
            }
            Err(source) => {
                return Err(SelectError::RemoveFailed {
                    path: link.to_path_buf(),
                    source,
                })
            }
        };

        // A real directory is only removed when empty.
        let removed = if meta.is_dir() {
            fs::remove_dir(link)
        } else {
            fs::remove_file(link)
        };
        // Directory symlinks on Windows need remove_dir.
        #[cfg(windows)]
        let removed = removed.or_else(|_| fs::remove_dir(link));

        removed.map_err(|source| SelectError::RemoveFailed {
            path: link.to_path_buf(),
            source,
        })?;
        debug!(link = %link.display(), "removed previous HAL link");
        Ok(())
    }

    /// Create `link` pointing at the canonical directory of `name`.
    fn link_variant(&self, link: &Path, name: &HalName) -> SelectResult<PathBuf> {
        let dir = self.variant_dir(name);
        let unknown = || SelectError::UnknownHal {
            name: name.to_string(),
            path: dir.clone(),
        };
        let target = match fs::canonicalize(&dir) {
            Ok(target) if target.is_dir() => target,
            Ok(_) => return Err(unknown()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(unknown()),
            Err(source) => return Err(SelectError::Io { path: dir, source }),
        };

        symlink_dir(&target, link).map_err(|source| SelectError::LinkCreation {
            path: link.to_path_buf(),
            target: target.clone(),
            source,
        })?;
        debug!(link = %link.display(), target = %target.display(), "created HAL link");
        Ok(target)
    }
}

/// Point `<base_dir>/src/hal` at the variant selected by `defines`, using the
/// default conventions and strict removal.
///
/// # Errors
///
/// See [`HalSelector::select`].
pub fn select_hal(defines: &[Define], base_dir: impl AsRef<Path>) -> SelectResult<Selection> {
    HalSelector::new(base_dir.as_ref()).select(defines)
}

/// Join `path` onto `cwd`, dropping `.` segments. `..` is kept as is.
fn absolute_in(cwd: &Path, path: &Path) -> PathBuf {
    cwd.join(path)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

#[cfg(not(any(unix, windows)))]
fn symlink_dir(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symbolic links are not supported on this platform",
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_conventions() {
        let sel = HalSelector::new("/work/proj");
        assert_eq!(sel.source_dir(), PathBuf::from("/work/proj/src"));
        assert_eq!(sel.link_path(), PathBuf::from("/work/proj/src/hal"));
        let stm32 = HalName::new("STM32").unwrap();
        assert_eq!(sel.variant_dir(&stm32), PathBuf::from("/work/proj/src/hal_stm32"));
    }

    #[test]
    fn absolute_drops_current_dir_segments() {
        assert_eq!(
            absolute_in(Path::new("/tmp/work"), Path::new("./src/hal")),
            PathBuf::from("/tmp/work/src/hal")
        );
        assert_eq!(
            absolute_in(Path::new("/tmp/work/."), Path::new("./proj/./src/hal")),
            PathBuf::from("/tmp/work/proj/src/hal")
        );
        assert_eq!(
            absolute_in(Path::new(""), Path::new("/abs/./src/hal")),
            PathBuf::from("/abs/src/hal")
        );
    }

    #[test]
    fn resolve_defaults_to_posix() {
        let sel = HalSelector::new("/work/proj");
        let (name, source) = sel.resolve_variant(&[Define::bare("DEBUG")]).unwrap();
        assert_eq!(name.as_str(), "posix");
        assert_eq!(source, SelectionSource::Default);
    }

    #[test]
    fn resolve_first_hal_pair_wins() {
        let sel = HalSelector::new("/work/proj");
        let defs = [
            Define::pair("OTHER", "x"),
            Define::pair("HAL", "Posix"),
            Define::pair("HAL", "STM32"),
        ];
        let (name, source) = sel.resolve_variant(&defs).unwrap();
        assert_eq!(name.as_str(), "posix");
        assert_eq!(source, SelectionSource::Defined);
    }

    #[test]
    fn resolve_honours_custom_key_and_default() {
        let cfg = SelectorConfig::default()
            .with_define_key("BOARD_HAL")
            .with_default_variant("Linux");
        let sel = HalSelector::with_config("/work/proj", cfg);
        let (name, _) = sel.resolve_variant(&[Define::pair("HAL", "stm32")]).unwrap();
        assert_eq!(name.as_str(), "linux");
        let (name, _) = sel
            .resolve_variant(&[Define::pair("BOARD_HAL", "ESP32")])
            .unwrap();
        assert_eq!(name.as_str(), "esp32");
    }

    #[test]
    fn resolve_rejects_escaping_value() {
        let sel = HalSelector::new("/work/proj");
        let err = sel
            .resolve_variant(&[Define::pair("HAL", "../etc")])
            .unwrap_err();
        assert!(matches!(err, SelectError::InvalidHalName { .. }));
    }
}
