//! # HardInfo Core
//!
//! Foundational pieces shared by the HardInfo crates:
//! - Error types
//! - String formatting helpers
//! - sysfs readers and program lookup
//! - Runtime path discovery and the user configuration directory
//! - Deferred release of values on the event loop

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod browser;
pub mod deferred;
pub mod error;
pub mod filetypes;
pub mod paths;
pub mod programs;
pub mod sysfs;
pub mod text;

pub use deferred::{defer_release, DEFAULT_RELEASE_DELAY};
pub use error::{Error, Result};
pub use filetypes::FileType;
pub use paths::{ensure_config_dir, RuntimePaths};
pub use programs::find_program;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::paths::RuntimePaths;
    pub use crate::text::{seconds_to_string, size_human_readable};
}
