// src/system/relay.rs

//! Signal relay for interactive runs.
//!
//! An interactive child leads a process group of its own and, when the launcher
//! owns the terminal, is made the terminal's foreground group for the length of
//! the run. While it runs, termination signals sent to the launcher are caught
//! and forwarded to the child's whole group; the child is waited for and the run
//! ends as interrupted. With no run active the signals keep their default action.

use crate::error::LaunchError;
use std::process::ExitStatus;
use tokio::process::Child;

/// The one child an execution owns. Dropping it before the child was reaped
/// kills the child's group.
#[derive(Debug)]
pub struct ActiveChild {
    child: Child,
    pid: Option<u32>,
    command: String,
    reaped: bool,
    #[cfg(unix)]
    terminal: Option<TerminalLease>,
}

impl ActiveChild {
    /// Takes ownership of a freshly spawned child.
    pub fn new(child: Child, command: &str) -> Self {
        let pid = child.id();
        log::debug!("Active child set (PID: {:?})", pid);
        Self {
            child,
            pid,
            command: command.to_string(),
            reaped: false,
            #[cfg(unix)]
            terminal: None,
        }
    }

    /// The child's process id, as seen right after spawn.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Makes the child's group the terminal's foreground group, if the launcher
    /// is the foreground group of the terminal on its stdin.
    /// The terminal is given back once the child is reaped.
    #[cfg(unix)]
    pub fn take_terminal(&mut self) {
        if self.terminal.is_none() {
            self.terminal = self.group().and_then(TerminalLease::hand_to);
        }
    }

    /// Windows consoles have no foreground process group.
    #[cfg(windows)]
    pub fn take_terminal(&mut self) {}

    /// Waits for the child to exit.
    pub async fn wait(&mut self) -> Result<ExitStatus, LaunchError> {
        let waited = self.child.wait().await;
        self.return_terminal();
        let status = waited.map_err(|e| LaunchError::Wait {
            command: self.command.clone(),
            source: e,
        })?;
        self.reaped = true;
        Ok(status)
    }

    #[cfg(unix)]
    fn group(&self) -> Option<nix::unistd::Pid> {
        self.pid
            .and_then(|pid| i32::try_from(pid).ok())
            .map(nix::unistd::Pid::from_raw)
    }

    #[cfg(unix)]
    fn return_terminal(&mut self) {
        if let Some(lease) = self.terminal.take() {
            lease.give_back();
        }
    }

    #[cfg(windows)]
    fn return_terminal(&mut self) {}

    /// Sends `signal` to every process in the child's group.
    #[cfg(unix)]
    pub fn forward(&mut self, signal: i32) {
        use nix::sys::signal::{Signal, killpg};

        let Some(group) = self.group() else {
            return;
        };
        let sig = match Signal::try_from(signal) {
            Ok(sig) => sig,
            Err(e) => {
                log::warn!("Cannot forward signal {}: {}", signal, e);
                return;
            }
        };
        log::debug!("Forwarding {} to process group {}", sig, group);
        if let Err(e) = killpg(group, sig) {
            // ESRCH: the group is already gone.
            log::debug!("killpg({}, {}) failed: {}", group, sig, e);
        }
    }

    /// Terminates the child; Windows has no signals to forward.
    #[cfg(windows)]
    pub fn forward(&mut self, signal: i32) {
        log::debug!(
            "Terminating child (PID: {:?}) after signal {}",
            self.pid,
            signal
        );
        if let Err(e) = self.child.start_kill() {
            log::debug!("Terminate failed: {}", e);
        }
    }
}

impl Drop for ActiveChild {
    fn drop(&mut self) {
        if !self.reaped && matches!(self.child.try_wait(), Ok(None)) {
            log::warn!(
                "Child (PID: {:?}) still running when released, killing it",
                self.pid
            );
            #[cfg(unix)]
            self.forward(nix::sys::signal::Signal::SIGKILL as i32);
            #[cfg(windows)]
            self.forward(crate::constants::SIGINT_NUMBER);
        }
        self.return_terminal();
        log::debug!("Active child cleared (PID: {:?})", self.pid);
    }
}

/// The terminal on stdin, lent to a child's process group.
#[cfg(unix)]
#[derive(Debug)]
struct TerminalLease {
    launcher_group: nix::unistd::Pid,
}

#[cfg(unix)]
impl TerminalLease {
    fn hand_to(group: nix::unistd::Pid) -> Option<Self> {
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::{getpgrp, isatty, tcgetpgrp, tcsetpgrp};

        let stdin = std::io::stdin();
        if !isatty(&stdin).unwrap_or(false) {
            return None;
        }
        let launcher_group = getpgrp();
        // A launcher started in the background leaves the terminal alone.
        if tcgetpgrp(&stdin).ok()? != launcher_group {
            return None;
        }
        if let Err(e) = tcsetpgrp(&stdin, group) {
            log::debug!("Could not hand the terminal to group {}: {}", group, e);
            return None;
        }
        // The child may have touched the terminal before it was its own.
        let _ = killpg(group, Signal::SIGCONT);
        log::debug!("Terminal handed to process group {}", group);
        Some(Self { launcher_group })
    }

    fn give_back(self) {
        use nix::sys::signal::{SigSet, SigmaskHow, Signal, pthread_sigmask};
        use nix::unistd::tcsetpgrp;

        // A background group may only take the terminal back with SIGTTOU blocked.
        let mut ttou = SigSet::empty();
        ttou.add(Signal::SIGTTOU);
        let mut previous = SigSet::empty();
        let blocked =
            pthread_sigmask(SigmaskHow::SIG_BLOCK, Some(&ttou), Some(&mut previous)).is_ok();

        match tcsetpgrp(std::io::stdin(), self.launcher_group) {
            Ok(()) => log::debug!("Terminal returned to process group {}", self.launcher_group),
            Err(e) => log::warn!("Could not take the terminal back: {}", e),
        }

        if blocked {
            let _ = pthread_sigmask(SigmaskHow::SIG_SETMASK, Some(&previous), None);
        }
    }
}

#[cfg(unix)]
mod hooks {
    use super::LaunchError;
    use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
    use signal_hook::{SigId, flag, low_level};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex, PoisonError};

    /// Signals relayed to an interactive child.
    pub(super) const RELAYED: [i32; 4] = [SIGINT, SIGTERM, SIGHUP, SIGQUIT];

    #[derive(Debug)]
    struct Registry {
        runs: usize,
        idle: Option<Arc<AtomicBool>>,
    }

    static REGISTRY: Mutex<Registry> = Mutex::new(Registry {
        runs: 0,
        idle: None,
    });

    #[derive(Debug)]
    pub(super) struct Caught {
        pub(super) signal: i32,
        pub(super) flag: Arc<AtomicBool>,
        id: SigId,
    }

    /// Registers a flag per relayed signal and marks a run as active.
    pub(super) fn enter() -> Result<Vec<Caught>, LaunchError> {
        let mut registry = REGISTRY.lock().unwrap_or_else(PoisonError::into_inner);
        let idle = match &registry.idle {
            Some(idle) => Arc::clone(idle),
            None => {
                // Process-wide: while `idle` holds, a relayed signal takes its default action.
                let idle = Arc::new(AtomicBool::new(true));
                for signal in RELAYED {
                    flag::register_conditional_default(signal, Arc::clone(&idle))
                        .map_err(LaunchError::Signals)?;
                }
                registry.idle = Some(Arc::clone(&idle));
                idle
            }
        };

        let mut caught = Vec::with_capacity(RELAYED.len());
        for signal in RELAYED {
            let flag = Arc::new(AtomicBool::new(false));
            match flag::register(signal, Arc::clone(&flag)) {
                Ok(id) => caught.push(Caught { signal, flag, id }),
                Err(e) => {
                    release(&caught);
                    return Err(LaunchError::Signals(e));
                }
            }
        }

        registry.runs += 1;
        idle.store(false, Ordering::SeqCst);
        log::debug!("Signal relay active ({} run(s))", registry.runs);
        Ok(caught)
    }

    /// Drops the run's flags; the last run out restores the default actions.
    pub(super) fn leave(caught: &[Caught]) {
        release(caught);
        let mut registry = REGISTRY.lock().unwrap_or_else(PoisonError::into_inner);
        registry.runs = registry.runs.saturating_sub(1);
        if registry.runs == 0 {
            if let Some(idle) = &registry.idle {
                idle.store(true, Ordering::SeqCst);
            }
            log::debug!("Signal relay idle, default signal actions restored");
        }
    }

    fn release(caught: &[Caught]) {
        for c in caught {
            low_level::unregister(c.id);
        }
    }
}

/// Termination signals caught for the length of one interactive run.
///
/// Dropping it ends the run's interest in the signals; once no run holds one,
/// SIGINT, SIGTERM, SIGHUP and SIGQUIT terminate the launcher as usual.
#[cfg(unix)]
#[derive(Debug)]
pub struct TerminationSignals {
    caught: Vec<hooks::Caught>,
}

#[cfg(unix)]
impl TerminationSignals {
    /// Starts catching SIGINT, SIGTERM, SIGHUP and SIGQUIT.
    pub fn install() -> Result<Self, LaunchError> {
        Ok(Self {
            caught: hooks::enter()?,
        })
    }

    /// Resolves with the number of the next signal received.
    pub async fn recv(&mut self) -> i32 {
        loop {
            if let Some(signal) = self.take_caught() {
                return signal;
            }
            tokio::time::sleep(crate::constants::RELAY_POLL_INTERVAL).await;
        }
    }

    fn take_caught(&self) -> Option<i32> {
        use std::sync::atomic::Ordering;

        self.caught
            .iter()
            .find(|c| c.flag.swap(false, Ordering::SeqCst))
            .map(|c| c.signal)
    }
}

#[cfg(unix)]
impl Drop for TerminationSignals {
    fn drop(&mut self) {
        hooks::leave(&self.caught);
    }
}

/// Console control events delivered to the launcher.
#[cfg(windows)]
#[derive(Debug)]
pub struct TerminationSignals {
    ctrl_c: tokio::signal::windows::CtrlC,
    ctrl_break: tokio::signal::windows::CtrlBreak,
    ctrl_close: tokio::signal::windows::CtrlClose,
}

#[cfg(windows)]
impl TerminationSignals {
    /// Starts catching Ctrl-C, Ctrl-Break and console close.
    pub fn install() -> Result<Self, LaunchError> {
        use tokio::signal::windows;

        Ok(Self {
            ctrl_c: windows::ctrl_c().map_err(LaunchError::Signals)?,
            ctrl_break: windows::ctrl_break().map_err(LaunchError::Signals)?,
            ctrl_close: windows::ctrl_close().map_err(LaunchError::Signals)?,
        })
    }

    /// Resolves with the signal number matching the next console event
    /// (2 for Ctrl-C, 21 for Ctrl-Break, 15 for close).
    pub async fn recv(&mut self) -> i32 {
        tokio::select! {
            Some(()) = self.ctrl_c.recv() => crate::constants::SIGINT_NUMBER,
            Some(()) = self.ctrl_break.recv() => 21,
            Some(()) = self.ctrl_close.recv() => 15,
            else => std::future::pending().await,
        }
    }
}

/// Waits for `active` to exit while relaying termination signals to it.
///
/// Returns the child's status when it exits on its own. When a signal arrives
/// first, it is forwarded, the child is waited for, and the run ends with
/// [`LaunchError::Interrupted`].
pub async fn wait_relaying(
    active: &mut ActiveChild,
    signals: &mut TerminationSignals,
) -> Result<ExitStatus, LaunchError> {
    tokio::select! {
        status = active.wait() => status,
        signal = signals.recv() => {
            log::debug!("Received signal {} while child is active", signal);
            active.forward(signal);
            match active.wait().await {
                Ok(status) => log::debug!("Child exited after signal with {}", status),
                Err(e) => log::warn!("{}", e),
            }
            Err(LaunchError::Interrupted { signal })
        }
    }
}
