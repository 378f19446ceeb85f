//! Source-tree conventions and selector configuration.
//!
//! The names below describe where HAL variants live and where the selected one
//! is exposed. Every path the selector touches is derived from these values
//! and an explicit base directory; nothing depends on the process working
//! directory.

/// Directory under the base directory that holds the HAL variants.
pub const SOURCE_DIR: &str = "src";

/// Name of the symlink inside [`SOURCE_DIR`] that the compiler includes.
pub const LINK_NAME: &str = "hal";

/// Prefix shared by every variant directory (`hal_posix`, `hal_stm32`, ...).
pub const VARIANT_PREFIX: &str = "hal_";

/// Variant linked when no definition selects one.
pub const DEFAULT_VARIANT: &str = "posix";

/// Definition name whose value selects the variant.
pub const DEFINE_KEY: &str = "HAL";

/// What to do when nothing exists at the link path before selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemovePolicy {
    /// A previous link (or placeholder) must exist; its absence is an error.
    #[default]
    Strict,
    /// Remove whatever is there, skip silently when nothing is.
    IfExists,
}

/// Naming conventions and removal behaviour used by a
/// [`HalSelector`](crate::HalSelector).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Directory under the base directory holding variants and the link.
    pub source_dir: String,
    /// File name of the link inside `source_dir`.
    pub link_name: String,
    /// Prefix of variant directory names.
    pub variant_prefix: String,
    /// Variant used when no definition matches.
    pub default_variant: String,
    /// Definition name that selects a variant (compared case-sensitively).
    pub define_key: String,
    /// Behaviour when the link path is empty before selection.
    pub remove_policy: RemovePolicy,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            source_dir: SOURCE_DIR.to_owned(),
            link_name: LINK_NAME.to_owned(),
            variant_prefix: VARIANT_PREFIX.to_owned(),
            default_variant: DEFAULT_VARIANT.to_owned(),
            define_key: DEFINE_KEY.to_owned(),
            remove_policy: RemovePolicy::Strict,
        }
    }
}

impl SelectorConfig {
    /// Set the removal policy.
    #[must_use]
    pub fn with_remove_policy(mut self, policy: RemovePolicy) -> Self {
        self.remove_policy = policy;
        self
    }

    /// Set the source directory name.
    #[must_use]
    pub fn with_source_dir(mut self, dir: impl Into<String>) -> Self {
        self.source_dir = dir.into();
        self
    }

    /// Set the link file name.
    #[must_use]
    pub fn with_link_name(mut self, name: impl Into<String>) -> Self {
        self.link_name = name.into();
        self
    }

    /// Set the variant directory prefix.
    #[must_use]
    pub fn with_variant_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.variant_prefix = prefix.into();
        self
    }

    /// Set the fallback variant. Lowercased when resolved.
    #[must_use]
    pub fn with_default_variant(mut self, name: impl Into<String>) -> Self {
        self.default_variant = name.into();
        self
    }

    /// Set the definition name that selects a variant.
    #[must_use]
    pub fn with_define_key(mut self, key: impl Into<String>) -> Self {
        self.define_key = key.into();
        self
    }
}
