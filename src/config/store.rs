//! Loading and saving of the per-user configuration file

use super::error::ConfigError;
use super::handle::ConfigurationHandle;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// File name of the configuration file inside the home directory
pub const CONFIG_FILE_NAME: &str = ".xenoconfig";

/// Where the home directory comes from
#[derive(Debug, Clone)]
enum HomeDir {
    /// Platform lookup on every request (`$HOME` on Unix)
    Platform,
    Fixed(PathBuf),
}

/// Owner of the user configuration
///
/// The configuration is read from disk at most once, on the first call to
/// [`configuration`](Self::configuration) or [`save`](Self::save). Later calls
/// hand out the same [`ConfigurationHandle`] without touching the filesystem.
#[derive(Debug)]
pub struct ConfigurationStore {
    home: HomeDir,
    handle: Option<ConfigurationHandle>,
}

impl ConfigurationStore {
    /// Create a store rooted at the current user's home directory
    pub fn new() -> Self {
        Self {
            home: HomeDir::Platform,
            handle: None,
        }
    }

    /// Create a store rooted at an explicit home directory
    pub fn with_home_dir<P: Into<PathBuf>>(home: P) -> Self {
        Self {
            home: HomeDir::Fixed(home.into()),
            handle: None,
        }
    }

    /// Compute the configuration file path
    ///
    /// With `validate`, an existing entry at the path must be a regular file
    /// or a symlink to one. A missing entry is fine.
    pub fn path(&self, validate: bool) -> Result<PathBuf, ConfigError> {
        let home = match &self.home {
            HomeDir::Platform => dirs::home_dir().ok_or(ConfigError::HomeDirectoryUnresolvable)?,
            HomeDir::Fixed(home) => home.clone(),
        };
        let path = home.join(CONFIG_FILE_NAME);
        tracing::debug!("Configuration path: {}", path.display());

        if validate && path.exists() && !path.is_file() {
            return Err(ConfigError::InvalidPath { path });
        }

        Ok(path)
    }

    /// Whether the configuration has been read from disk yet
    pub fn is_loaded(&self) -> bool {
        self.handle.is_some()
    }

    /// Get the configuration, loading it on first use
    ///
    /// A missing file yields an empty configuration. If loading fails the
    /// store stays unloaded.
    pub fn configuration(&mut self) -> Result<&mut ConfigurationHandle, ConfigError> {
        let handle = match self.handle.take() {
            Some(handle) => {
                tracing::debug!("Using cached configuration");
                handle
            }
            None => self.load()?,
        };
        Ok(self.handle.insert(handle))
    }

    /// Write the configuration back to disk
    ///
    /// Loads first if nothing has been loaded yet, so saving an untouched
    /// store rewrites the file with its own contents.
    pub fn save(&mut self) -> Result<(), ConfigError> {
        self.configuration()?;
        let path = self.path(true)?;
        let handle = self.configuration()?;

        write_file(handle, &path).map_err(|source| ConfigError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::info!("Saved configuration to {}", path.display());
        Ok(())
    }

    fn load(&self) -> Result<ConfigurationHandle, ConfigError> {
        let path = self.path(true)?;

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No configuration at {}, starting empty", path.display());
                return Ok(ConfigurationHandle::new());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        let handle = ConfigurationHandle::parse(&content, &path)?;
        tracing::debug!(
            "Loaded {} configuration sections from {}",
            handle.section_count(),
            path.display()
        );
        Ok(handle)
    }
}

impl Default for ConfigurationStore {
    fn default() -> Self {
        Self::new()
    }
}

fn write_file(handle: &ConfigurationHandle, path: &Path) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    handle.write_to(&mut writer)?;
    writer.flush()
}
