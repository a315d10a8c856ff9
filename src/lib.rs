//! # xeno - configuration core
//!
//! Persistent per-user settings for the xeno command-line tool.
//!
//! Settings live in an INI file at `~/.xenoconfig`. The [`ConfigurationStore`]
//! loads it lazily, at most once, and writes it back on request:
//!
//! ```no_run
//! use xeno::ConfigurationStore;
//!
//! let mut store = ConfigurationStore::new();
//! let config = store.configuration()?;
//! if !config.has_section("core") {
//!     config.add_section("core")?;
//! }
//! config.set("core", "editor", "vim")?;
//! store.save()?;
//! # Ok::<(), xeno::ConfigError>(())
//! ```

pub mod cli;
pub mod config;

pub use cli::{Cli, Output};
pub use config::{ConfigError, ConfigurationHandle, ConfigurationStore};

/// Result type alias for xeno operations
pub type Result<T> = anyhow::Result<T>;
