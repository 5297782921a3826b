// src/system/executor.rs

use crate::{
    constants::EXIT_FAILURE,
    error::LaunchError,
    models::{CommandLine, ExecutionMode, ExecutionResult},
    system::relay::{self, ActiveChild, TerminationSignals},
};
use std::io::ErrorKind;
use std::process::{Command as StdCommand, ExitStatus, Stdio};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Wraps a finished command line in the host shell.
///
/// Unix runs `sh -c <line>` as the leader of a new process group, so the tool
/// and everything it starts can be signalled together. Windows runs
/// `cmd /d /s /c "<line>"`, handing the line over raw so no second layer of
/// quoting is added on the way.
pub fn shell_command(line: &CommandLine) -> Command {
    #[cfg(unix)]
    let command = {
        use std::os::unix::process::CommandExt;

        let mut command = StdCommand::new("sh");
        command.arg("-c").arg(line.as_str()).process_group(0);
        command
    };

    #[cfg(windows)]
    let command = {
        use std::os::windows::process::CommandExt;

        let mut command = StdCommand::new("cmd");
        command.raw_arg(format!("/d /s /c \"{}\"", line.as_str()));
        command
    };

    let mut command = Command::from(command);
    command.kill_on_drop(true);
    command
}

/// Runs `line` to completion and reports how it went.
///
/// A non-zero exit is returned in the result, not as an error. In `Captured` mode
/// `input` is written to the child's stdin, which is then closed.
pub async fn execute(
    line: &CommandLine,
    mode: ExecutionMode,
    input: Option<&[u8]>,
) -> Result<ExecutionResult, LaunchError> {
    log::debug!("Executing command ({:?}): '{}'", mode, line);

    let result = match mode {
        ExecutionMode::Captured => execute_captured(line, input).await?,
        ExecutionMode::Interactive => execute_interactive(line).await?,
    };

    log::debug!("Command finished with exit code {}", result.exit_code);
    Ok(result)
}

async fn execute_captured(
    line: &CommandLine,
    input: Option<&[u8]>,
) -> Result<ExecutionResult, LaunchError> {
    let mut command = shell_command(line);
    command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn().map_err(|e| spawn_failed(line, e))?;
    log::debug!("Spawned captured child (PID: {:?})", child.id());

    let stdin = child.stdin.take();
    let feed = async move {
        let Some(mut stdin) = stdin else {
            return Ok(());
        };
        if let Some(data) = input {
            stdin.write_all(data).await?;
        }
        stdin.shutdown().await
    };

    // Both pipes are drained while waiting, so a chatty child cannot block on a full pipe.
    let (fed, output) = tokio::join!(feed, child.wait_with_output());
    match fed {
        Err(e) if e.kind() == ErrorKind::BrokenPipe => {
            log::debug!("Child closed stdin before reading all input");
        }
        Err(e) => log::warn!("Could not write to child stdin: {}", e),
        Ok(()) => {}
    }

    let output = output.map_err(|e| LaunchError::Wait {
        command: line.to_string(),
        source: e,
    })?;

    Ok(ExecutionResult {
        exit_code: exit_code(output.status),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Inherited handles are passed as they are: a terminal, file or pipe works the
/// same, and a handle the launcher had closed stays closed in the child.
async fn execute_interactive(line: &CommandLine) -> Result<ExecutionResult, LaunchError> {
    // Listen before spawning so an early Ctrl+C is relayed, not lost.
    let mut signals = TerminationSignals::install()?;

    let mut command = shell_command(line);
    command
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    let child = command.spawn().map_err(|e| spawn_failed(line, e))?;
    let mut active = ActiveChild::new(child, line.as_str());
    active.take_terminal();
    let status = relay::wait_relaying(&mut active, &mut signals).await?;

    Ok(ExecutionResult {
        exit_code: exit_code(status),
        ..Default::default()
    })
}

fn spawn_failed(line: &CommandLine, source: std::io::Error) -> LaunchError {
    LaunchError::SpawnFailed {
        command: line.to_string(),
        source,
    }
}

/// The child's exit code; `128 + signal` when a signal ended it.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use crate::constants::EXIT_SIGNAL_BASE;
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return EXIT_SIGNAL_BASE + signal;
        }
    }

    log::warn!("Child exited without a code: {}", status);
    EXIT_FAILURE
}
