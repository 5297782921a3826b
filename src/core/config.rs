// src/core/config.rs

use crate::constants::{
    INSTALL_DIR_SEGMENTS, POWERSHELL_SCRIPT_URL, TOOL_NAME, UNIX_SCRIPT_URL, WINDOWS_WRAPPER,
};
use crate::error::LaunchError;
use serde::Deserialize;
use std::path::PathBuf;

/// Describes the tool being launched and where to get it from.
///
/// The defaults describe JBang. A partial TOML document can override any field:
///
/// ```toml
/// install_dir = "~/tools/jbang/bin"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Command name looked up on `PATH`, also the file name inside `install_dir`.
    pub name: String,
    /// Per-user installation directory. `~` and environment variables are expanded.
    /// `None` means `<home>/.jbang/bin`.
    pub install_dir: Option<String>,
    /// Project-local wrapper script, probed first on Windows.
    pub windows_wrapper: String,
    /// Installer script piped into `bash`.
    pub unix_script_url: String,
    /// Installer script evaluated by PowerShell.
    pub powershell_script_url: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            name: TOOL_NAME.to_string(),
            install_dir: None,
            windows_wrapper: WINDOWS_WRAPPER.to_string(),
            unix_script_url: UNIX_SCRIPT_URL.to_string(),
            powershell_script_url: POWERSHELL_SCRIPT_URL.to_string(),
        }
    }
}

impl ToolConfig {
    /// Parses a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, LaunchError> {
        Ok(toml::from_str(content)?)
    }

    /// The resolved installation directory, if one can be determined.
    pub fn install_dir(&self) -> Option<PathBuf> {
        match &self.install_dir {
            Some(template) => match shellexpand::full(template) {
                Ok(expanded) => Some(PathBuf::from(expanded.into_owned())),
                Err(e) => {
                    log::warn!("Ignoring install_dir '{}': {}", template, e);
                    None
                }
            },
            None => dirs::home_dir().map(|home| {
                INSTALL_DIR_SEGMENTS
                    .iter()
                    .fold(home, |path, segment| path.join(segment))
            }),
        }
    }
}
