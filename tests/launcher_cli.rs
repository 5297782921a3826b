// tests/launcher_cli.rs

#![cfg(unix)]

mod common;

use common::{install_fake_tool, parse_bracketed, wait_for_exit, wait_for_file};
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

const BIN: &str = env!("CARGO_BIN_EXE_jbang-launcher");

/// Runs the launcher binary with `dir` first on `PATH` and an empty home.
fn launcher(dir: &Path, home: &Path) -> Command {
    let path = std::env::var("PATH").unwrap_or_default();
    let mut command = Command::new(BIN);
    command
        .env("PATH", format!("{}:{}", dir.display(), path))
        .env("HOME", home)
        .env_remove("DEBUG")
        .stdin(Stdio::null());
    command
}

#[test]
fn test_exit_code_is_propagated() {
    let dir = tempfile::tempdir().unwrap();
    let home = tempfile::tempdir().unwrap();
    install_fake_tool(dir.path(), "jbang");

    for code in [0, 1, 3, 42, 255] {
        let status = launcher(dir.path(), home.path())
            .args(["exit", &code.to_string()])
            .status()
            .unwrap();
        assert_eq!(status.code(), Some(code));
    }
}

#[test]
fn test_arguments_are_forwarded_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let home = tempfile::tempdir().unwrap();
    install_fake_tool(dir.path(), "jbang");

    let args = ["--help", "-Dx=funky bear", "", "it's $HOME", "--", "a|b"];
    let output = launcher(dir.path(), home.path())
        .arg("args")
        .args(args)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        parse_bracketed(&String::from_utf8_lossy(&output.stdout)),
        args.to_vec()
    );
}

#[test]
fn test_missing_tool_exits_with_two_and_advice() {
    let empty = tempfile::tempdir().unwrap();
    let home = tempfile::tempdir().unwrap();

    let output = Command::new(BIN)
        .env("PATH", empty.path())
        .env("HOME", home.path())
        .env_remove("DEBUG")
        .arg("--version")
        .stdin(Stdio::null())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("jbang"), "stderr: {}", stderr);
}

#[test]
fn test_user_install_dir_is_used() {
    let empty = tempfile::tempdir().unwrap();
    let home = tempfile::tempdir().unwrap();
    let bin_dir = home.path().join(".jbang").join("bin");
    std::fs::create_dir_all(&bin_dir).unwrap();
    install_fake_tool(&bin_dir, "jbang");

    let path = std::env::var("PATH").unwrap_or_default();
    let status = Command::new(BIN)
        // The fake tool itself still needs `sh` and `printf`.
        .env("PATH", format!("{}:{}", empty.path().display(), path))
        .env("HOME", home.path())
        .env_remove("DEBUG")
        .args(["exit", "9"])
        .stdin(Stdio::null())
        .status()
        .unwrap();
    // A `jbang` elsewhere on PATH would take priority; only assert when there is none.
    if which::which("jbang").is_err() {
        assert_eq!(status.code(), Some(9));
    }
}

#[test]
fn test_debug_logging_is_opt_in() {
    let dir = tempfile::tempdir().unwrap();
    let home = tempfile::tempdir().unwrap();
    install_fake_tool(dir.path(), "jbang");

    let quiet = launcher(dir.path(), home.path())
        .args(["exit", "0"])
        .output()
        .unwrap();
    assert!(quiet.stderr.is_empty());

    let verbose = launcher(dir.path(), home.path())
        .env("DEBUG", "jbang")
        .args(["exit", "0"])
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&verbose.stderr);
    assert!(stderr.contains("DEBUG"), "stderr: {}", stderr);
}

/// Starts the fake tool in `wait` mode, signals the launcher and checks both sides.
fn assert_signal_is_relayed(signal: Signal, expected_code: i32) {
    let dir = tempfile::tempdir().unwrap();
    let home = tempfile::tempdir().unwrap();
    install_fake_tool(dir.path(), "jbang");
    let marker = dir.path().join("got-signal");
    let ready = dir.path().join("ready");

    let mut child = launcher(dir.path(), home.path())
        .arg("wait")
        .arg(&marker)
        .arg(&ready)
        .spawn()
        .unwrap();

    assert!(wait_for_file(&ready, Duration::from_secs(10)), "tool never started");

    let pid = Pid::from_raw(i32::try_from(child.id()).unwrap());
    kill(pid, signal).unwrap();

    let status = child.wait().unwrap();
    assert_eq!(status.code(), Some(expected_code), "after {}", signal);
    assert!(
        wait_for_file(&marker, Duration::from_secs(5)),
        "child never saw the forwarded {}",
        signal
    );
}

#[test]
fn test_interrupt_is_relayed_to_the_child() {
    assert_signal_is_relayed(Signal::SIGINT, 130);
}

#[test]
fn test_terminate_is_relayed_with_its_own_code() {
    assert_signal_is_relayed(Signal::SIGTERM, 143);
}

#[test]
fn test_hangup_is_relayed_with_its_own_code() {
    assert_signal_is_relayed(Signal::SIGHUP, 129);
}

#[test]
fn test_quit_is_relayed_with_its_own_code() {
    assert_signal_is_relayed(Signal::SIGQUIT, 131);
}

#[test]
fn test_relayed_signal_reaches_processes_the_tool_started() {
    let dir = tempfile::tempdir().unwrap();
    let home = tempfile::tempdir().unwrap();
    install_fake_tool(dir.path(), "jbang");
    let pidfile = dir.path().join("grandchild");
    let ready = dir.path().join("ready");

    let mut child = launcher(dir.path(), home.path())
        .arg("tree")
        .arg(&pidfile)
        .arg(&ready)
        .spawn()
        .unwrap();

    assert!(wait_for_file(&ready, Duration::from_secs(10)), "tool never started");
    let grandchild: i32 = std::fs::read_to_string(&pidfile)
        .unwrap()
        .trim()
        .parse()
        .unwrap();

    let pid = Pid::from_raw(i32::try_from(child.id()).unwrap());
    kill(pid, Signal::SIGTERM).unwrap();

    let status = child.wait().unwrap();
    assert_eq!(status.code(), Some(143));
    assert!(
        wait_for_exit(grandchild, Duration::from_secs(5)),
        "background process {} outlived the launcher",
        grandchild
    );
}
