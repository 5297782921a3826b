// src/launcher.rs

use crate::{
    core::{
        command_builder,
        config::ToolConfig,
        quoting::Dialect,
        resolver::Resolver,
    },
    error::LaunchError,
    models::{CommandInput, CommandLine, ExecutionMode, ExecutionResult},
    system::{
        executor,
        probe::{Probe, SystemProbe},
    },
};
use std::future::Future;

/// Locates the tool, builds its command line and runs it.
///
/// `Launcher::jbang()` launches JBang through the real `PATH`. Every call resolves
/// afresh and owns its child exclusively, so a `Launcher` can be reused and shared.
#[derive(Debug, Clone)]
pub struct Launcher<P: Probe = SystemProbe> {
    config: ToolConfig,
    probe: P,
    dialect: Dialect,
}

impl Default for Launcher<SystemProbe> {
    fn default() -> Self {
        Self::jbang()
    }
}

impl Launcher<SystemProbe> {
    /// A launcher for JBang with the stock locations and installers.
    pub fn jbang() -> Self {
        Self::new(ToolConfig::default())
    }

    /// A launcher for `config`, probing the real system.
    pub fn new(config: ToolConfig) -> Self {
        Self {
            config,
            probe: SystemProbe,
            dialect: Dialect::host(),
        }
    }
}

impl<P: Probe> Launcher<P> {
    /// Replaces the probe used to look for executables.
    pub fn with_probe<Q: Probe>(self, probe: Q) -> Launcher<Q> {
        Launcher {
            config: self.config,
            probe,
            dialect: self.dialect,
        }
    }

    /// The tool description in use.
    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Resolves the tool and builds the full command line for `input`.
    pub fn command_line(&self, input: &CommandInput) -> Result<CommandLine, LaunchError> {
        let resolution = Resolver::new(&self.config, &self.probe).resolve()?;
        Ok(command_builder::build_command_line(
            &resolution,
            input,
            &self.config,
            self.dialect,
        ))
    }

    /// Runs the tool with its output captured.
    pub async fn exec_async(
        &self,
        input: impl Into<CommandInput>,
        stdin: Option<&[u8]>,
    ) -> Result<ExecutionResult, LaunchError> {
        let input = input.into();
        log::debug!("Try to execute captured command: {:?}", input);
        let line = self.command_line(&input)?;
        executor::execute(&line, ExecutionMode::Captured, stdin).await
    }

    /// Runs the tool attached to this process's terminal, relaying signals to it.
    pub async fn spawn_async(
        &self,
        input: impl Into<CommandInput>,
    ) -> Result<ExecutionResult, LaunchError> {
        let input = input.into();
        log::debug!("Try to execute interactive command: {:?}", input);
        let line = self.command_line(&input)?;
        executor::execute(&line, ExecutionMode::Interactive, None).await
    }

    /// Blocking form of [`exec_async`](Self::exec_async) without stdin data.
    pub fn exec(&self, input: impl Into<CommandInput>) -> Result<ExecutionResult, LaunchError> {
        block_on(self.exec_async(input, None))?
    }

    /// Blocking form of [`exec_async`](Self::exec_async) feeding `stdin` to the tool.
    pub fn exec_with_input(
        &self,
        input: impl Into<CommandInput>,
        stdin: &[u8],
    ) -> Result<ExecutionResult, LaunchError> {
        block_on(self.exec_async(input, Some(stdin)))?
    }

    /// Blocking form of [`spawn_async`](Self::spawn_async).
    pub fn spawn_sync(
        &self,
        input: impl Into<CommandInput>,
    ) -> Result<ExecutionResult, LaunchError> {
        block_on(self.spawn_async(input))?
    }
}

/// Drives `future` on a private current-thread runtime.
///
/// Must not be called from inside another tokio runtime; use the `_async` forms there.
fn block_on<F: Future>(future: F) -> Result<F::Output, LaunchError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(LaunchError::Runtime)?;
    Ok(runtime.block_on(future))
}

/// Runs JBang with captured output. See [`Launcher::exec`].
pub fn exec(input: impl Into<CommandInput>) -> Result<ExecutionResult, LaunchError> {
    Launcher::jbang().exec(input)
}

/// Runs JBang with captured output, feeding `stdin`. See [`Launcher::exec_with_input`].
pub fn exec_with_input(
    input: impl Into<CommandInput>,
    stdin: &[u8],
) -> Result<ExecutionResult, LaunchError> {
    Launcher::jbang().exec_with_input(input, stdin)
}

/// Runs JBang on this terminal. See [`Launcher::spawn_sync`].
pub fn spawn_sync(input: impl Into<CommandInput>) -> Result<ExecutionResult, LaunchError> {
    Launcher::jbang().spawn_sync(input)
}
