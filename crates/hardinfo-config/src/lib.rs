//! # HardInfo Configuration
//!
//! Settings for the module runtime and the command line front end: where
//! the runtime data and modules live, which modules to load, how missing
//! module dependencies are handled, and logging.
//!
//! A file named `config` with one of the [`ConfigFormat::EXTENSIONS`] is
//! looked up in the user configuration directory. `${VAR}` and
//! `${VAR:-default}` references are expanded before parsing, and the result
//! is validated. Command line flags are layered on top with
//! [`ConfigBuilder`].
//!
//! ```rust
//! use hardinfo_config::{load_from_str, ConfigFormat};
//!
//! let config = load_from_str("[modules]\nload = [\"cpu.so\"]\n", ConfigFormat::Toml).unwrap();
//! assert_eq!(config.modules.load, vec!["cpu.so"]);
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod builder;
pub mod loader;
pub mod types;
pub mod validator;

pub use builder::ConfigBuilder;
pub use loader::{find_config, load_config, load_from_file, load_from_str, ConfigFormat};
pub use types::{Config, LogFormat, LoggingConfig, ModulesConfig, PathsConfig};
pub use validator::validate_config;
