//! OS-specific directories.

use std::path::PathBuf;
use crate::constants::APP_NAME;
use crate::error::{NmError, NmResult};

/// Per-user directories for the current OS.
pub struct Platform;

impl Platform {
    /// Get the platform-specific application data directory.
    ///
    /// - Windows: `%APPDATA%/NotionMail`
    /// - macOS: `~/Library/Application Support/NotionMail`
    /// - Linux: `~/.local/share/NotionMail`
    pub fn data_dir() -> NmResult<PathBuf> {
        let base = dirs::data_dir()
            .ok_or_else(|| NmError::Config("could not determine data directory".into()))?;
        Ok(base.join(APP_NAME))
    }

    /// Get the platform-specific configuration directory.
    ///
    /// - Windows: `%APPDATA%/NotionMail`
    /// - macOS: `~/Library/Application Support/NotionMail`
    /// - Linux: `~/.config/NotionMail`
    pub fn config_dir() -> NmResult<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| NmError::Config("could not determine config directory".into()))?;
        Ok(base.join(APP_NAME))
    }
}
