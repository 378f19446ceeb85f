//! Build-time HAL selection.
//!
//! A source tree carries several hardware-abstraction-layer implementations
//! side by side (`src/hal_posix`, `src/hal_stm32`, ...) and the compiler only
//! ever includes `src/hal`. Before each build the orchestrator calls
//! [`select_hal`] with its preprocessor definitions; the first `HAL=<name>`
//! definition decides which `hal_<name>` directory `src/hal` links to, and
//! `hal_posix` is used when none is given.
//!
//! # Modules
//!
//! - [`define`] — `Define` list model and `-D` flag parsing
//! - [`variant`] — `HalName` and variant directory discovery
//! - [`selector`] — `HalSelector`, the link swap itself
//! - [`config`] — naming conventions and removal policy
//! - [`error`] — `SelectError`
//!
//! # Example
//!
//! ```no_run
//! use hal_select::{select_hal, Define};
//!
//! let defines = [Define::pair("HAL", "STM32"), Define::bare("DEBUG")];
//! let selection = select_hal(&defines, "/path/to/project")?;
//! assert_eq!(selection.variant.as_str(), "stm32");
//! # Ok::<(), hal_select::SelectError>(())
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]
#![warn(clippy::print_stdout)] // prefer tracing over println! in lib code

pub mod config;
pub mod define;
pub mod error;
pub mod selector;
pub mod variant;

pub use config::{RemovePolicy, SelectorConfig};
pub use define::{parse_cflags, Define, ParseDefineError};
pub use error::{SelectError, SelectResult};
pub use selector::{select_hal, HalSelector, LinkStatus, Selection, SelectionSource};
pub use variant::HalName;
