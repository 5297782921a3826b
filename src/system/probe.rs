// src/system/probe.rs

use std::path::PathBuf;

/// Answers "is this program runnable here, and where is it?".
///
/// The resolver only ever asks through this trait, so probing stays read-only
/// and can be replaced in tests.
pub trait Probe {
    /// Returns the executable `program` resolves to, if any. `program` may be a bare
    /// name looked up on `PATH`, a relative path or an absolute path.
    fn find(&self, program: &str) -> Option<PathBuf>;
}

/// Probes the real filesystem and `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProbe;

impl Probe for SystemProbe {
    fn find(&self, program: &str) -> Option<PathBuf> {
        match which::which(program) {
            Ok(path) => Some(dunce::simplified(&path).to_path_buf()),
            Err(e) => {
                log::debug!("'{}' is not runnable: {}", program, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_not_found() {
        assert!(SystemProbe.find("surely-not-a-real-program-4f1c9b").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_is_found_on_path() {
        let found = SystemProbe.find("sh");
        assert!(found.is_some_and(|p| p.is_absolute()));
    }

    #[cfg(unix)]
    #[test]
    fn test_absolute_executable_is_found() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("jbang");
        std::fs::write(&tool, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(SystemProbe.find(tool.to_str().unwrap()), Some(tool));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("jbang");
        std::fs::write(&tool, "not executable").unwrap();

        assert!(SystemProbe.find(tool.to_str().unwrap()).is_none());
    }
}
