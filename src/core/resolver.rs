// src/core/resolver.rs

use crate::{
    core::config::ToolConfig,
    error::LaunchError,
    models::{BootstrapStrategy, Resolution},
    system::probe::Probe,
};

/// Finds a way to run the tool: an installed executable first, a bootstrap
/// strategy second, nothing else.
#[derive(Debug)]
pub struct Resolver<'a, P: Probe> {
    config: &'a ToolConfig,
    probe: &'a P,
    windows: bool,
}

impl<'a, P: Probe> Resolver<'a, P> {
    /// A resolver for the current operating system.
    pub fn new(config: &'a ToolConfig, probe: &'a P) -> Self {
        Self::for_os(config, probe, cfg!(windows))
    }

    /// A resolver that probes the candidates of the given OS family.
    pub fn for_os(config: &'a ToolConfig, probe: &'a P, windows: bool) -> Self {
        Self {
            config,
            probe,
            windows,
        }
    }

    /// Installed-tool candidates, highest priority first.
    pub fn candidates(&self) -> Vec<String> {
        let mut candidates = Vec::with_capacity(3);
        if self.windows {
            candidates.push(self.config.windows_wrapper.clone());
        }
        candidates.push(self.config.name.clone());
        if let Some(dir) = self.config.install_dir() {
            let file_name = if self.windows {
                format!("{}.cmd", self.config.name)
            } else {
                self.config.name.clone()
            };
            candidates.push(dir.join(file_name).to_string_lossy().into_owned());
        }
        candidates
    }

    /// Resolves the tool, or fails with [`LaunchError::ResolutionFailed`].
    pub fn resolve(&self) -> Result<Resolution, LaunchError> {
        log::debug!("Searching for {} executable...", self.config.name);

        for candidate in self.candidates() {
            if let Some(path) = self.probe.find(&candidate) {
                log::debug!(
                    "Found existing {} installation at: {}",
                    self.config.name,
                    path.display()
                );
                return Ok(Resolution::Installed(path));
            }
        }

        if let Some(strategy) = self.bootstrap_strategy() {
            log::debug!("No installation found, bootstrapping with {:?}", strategy);
            return Ok(Resolution::Bootstrap(strategy));
        }

        log::debug!("No {} installation and no way to bootstrap one", self.config.name);
        Err(LaunchError::ResolutionFailed {
            tool: self.config.name.clone(),
        })
    }

    fn bootstrap_strategy(&self) -> Option<BootstrapStrategy> {
        let available = |program: &str| self.probe.find(program).is_some();

        if available("curl") && available("bash") {
            Some(BootstrapStrategy::CurlBash)
        } else if available("powershell") {
            Some(BootstrapStrategy::PowerShell)
        } else {
            None
        }
    }
}
