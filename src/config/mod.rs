//! Configuration management for xeno
//!
//! The user's settings live in a single INI file, `~/.xenoconfig`. A
//! [`ConfigurationStore`] resolves that path, loads the file lazily into a
//! [`ConfigurationHandle`] and writes it back on request. Errors are returned
//! as [`ConfigError`]; deciding whether to exit is left to the caller.

mod error;
mod handle;
mod store;

pub use error::ConfigError;
pub use handle::ConfigurationHandle;
pub use store::{CONFIG_FILE_NAME, ConfigurationStore};
