// tests/common/mod.rs

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// A stand-in for the real tool. Sub-commands:
/// - `exit N`: exits with N.
/// - `args ...`: prints every following argument as `[arg]` on its own line.
/// - `wait MARKER READY`: touches READY, then loops until INT/TERM/HUP/QUIT, which touches MARKER
///   and exits 7.
/// - `tree PIDFILE READY`: starts a background `sleep`, writes its pid to PIDFILE, touches READY
///   and waits.
const FAKE_TOOL: &str = r#"#!/bin/sh
case "$1" in
  exit) exit "$2" ;;
  args) shift; for a in "$@"; do printf '[%s]\n' "$a"; done ;;
  wait) trap 'touch "$2"; exit 7' INT TERM HUP QUIT; touch "$3"; while :; do sleep 0.1; done ;;
  tree) sleep 300 & echo $! > "$2"; touch "$3"; wait ;;
  *) echo "unknown command: $1" >&2; exit 2 ;;
esac
"#;

/// Writes the fake tool as `dir/name`, executable.
pub fn install_fake_tool(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, FAKE_TOOL).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Polls until `path` exists or `timeout` passes.
pub fn wait_for_file(path: &Path, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if path.exists() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    path.exists()
}

/// Whether `pid` is gone (or a zombie) within `timeout`.
pub fn wait_for_exit(pid: i32, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        let stat = fs::read_to_string(format!("/proc/{}/stat", pid)).unwrap_or_default();
        if stat.is_empty() || stat.contains(") Z") {
            return true;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    false
}

/// Splits the fake tool's `args` output back into arguments.
pub fn parse_bracketed(stdout: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current: Option<String> = None;
    for line in stdout.split_inclusive('\n') {
        let line = line.strip_suffix('\n').unwrap_or(line);
        match current.take() {
            None => {
                let body = line.strip_prefix('[').unwrap();
                match body.strip_suffix(']') {
                    Some(done) => args.push(done.to_string()),
                    None => current = Some(format!("{}\n", body)),
                }
            }
            Some(mut partial) => match line.strip_suffix(']') {
                Some(done) => {
                    partial.push_str(done);
                    args.push(partial);
                }
                None => {
                    partial.push_str(line);
                    partial.push('\n');
                    current = Some(partial);
                }
            },
        }
    }
    args
}
