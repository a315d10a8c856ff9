//! Error types for configuration loading, editing and saving

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by [`ConfigurationStore`](super::ConfigurationStore) and
/// [`ConfigurationHandle`](super::ConfigurationHandle)
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The user's home directory could not be determined
    #[error("Unable to determine the home directory for the configuration file")]
    HomeDirectoryUnresolvable,

    /// Something other than a regular file sits at the configuration path
    #[error("Configuration path ({}) exists but is not a file", path.display())]
    InvalidPath { path: PathBuf },

    /// The configuration file exists but could not be read
    #[error("Unable to read configuration file ({}): {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file was read but is not valid INI
    #[error("Unable to read configuration file ({}): {cause}", path.display())]
    Parse { path: PathBuf, cause: String },

    /// The configuration file could not be created or written
    #[error("Unable to save configuration to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No section: '{section}'")]
    NoSection { section: String },

    #[error("Section '{section}' already exists")]
    DuplicateSection { section: String },

    /// A section or option name that the file format cannot represent
    #[error("Invalid {kind} name '{name}': {reason}")]
    InvalidName {
        kind: &'static str,
        name: String,
        reason: &'static str,
    },

    /// A value that would not read back unchanged after a save
    #[error("Invalid value for option '{key}': {reason}")]
    InvalidValue { key: String, reason: &'static str },

    #[error("Option '{key}' in section '{section}' is not a boolean: '{value}'")]
    InvalidBoolean {
        section: String,
        key: String,
        value: String,
    },
}
