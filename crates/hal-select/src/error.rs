//! Error type for HAL selection.

use std::io;
use std::path::PathBuf;

/// Errors returned by [`HalSelector`](crate::HalSelector) operations.
///
/// Every variant carries the path involved so the build log names the entry
/// that needs attention. Nothing is retried; the orchestrator re-invokes the
/// selector after fixing the tree.
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    /// Strict removal found nothing at the link path.
    #[error("no existing HAL link at {path} to replace")]
    MissingLink {
        /// Expected link location.
        path: PathBuf,
    },

    /// The selected variant has no directory under the source dir.
    #[error("HAL variant `{name}` not found (expected directory {path})")]
    UnknownHal {
        /// Lowercased variant name.
        name: String,
        /// Directory that was looked up.
        path: PathBuf,
    },

    /// The symlink could not be created.
    #[error("failed to link {path} -> {target}")]
    LinkCreation {
        /// Link location.
        path: PathBuf,
        /// Directory the link should have pointed to.
        target: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The entry at the link path exists but could not be removed.
    #[error("failed to remove {path}")]
    RemoveFailed {
        /// Link location.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// A definition value cannot name a variant directory.
    #[error("invalid HAL name `{value}`")]
    InvalidHalName {
        /// The raw definition value.
        value: String,
    },

    /// Reading the source tree failed.
    #[error("I/O error at {path}")]
    Io {
        /// Path being inspected.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
}

/// Result alias for selector operations.
pub type SelectResult<T> = Result<T, SelectError>;
