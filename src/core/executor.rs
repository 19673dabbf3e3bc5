use crate::core::error::{Result, TermsageError};
use crate::system::SystemInfo;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use tracing::debug;

/// Captured outcome of one delegated command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_status: i32,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_status == 0
    }
}

/// Exit status the shell reports when it cannot find the program.
pub const COMMAND_NOT_FOUND: i32 = 127;

/// Runs `command` through the user's shell in `working_dir`. A non-zero exit
/// status is a normal result; only a failure to spawn is an error.
pub fn execute_command(
    command: &str,
    working_dir: &Path,
    system_info: &SystemInfo,
) -> Result<CommandResult> {
    let mut cmd = Command::new(&system_info.shell_path);
    cmd.arg(system_info.shell_type.command_flag())
        .arg(command)
        .current_dir(working_dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!(shell = %system_info.shell_path, dir = %working_dir.display(), "spawning: {}", command);

    let output = cmd.output().map_err(|e| {
        TermsageError::Execution(format!("could not run {}: {}", system_info.shell_path, e))
    })?;

    Ok(CommandResult {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_status: exit_code(output.status),
    })
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::system::ShellType;
    use tempfile::TempDir;

    fn sh() -> SystemInfo {
        SystemInfo {
            os_info: "test".to_string(),
            shell_path: "/bin/sh".to_string(),
            shell_type: ShellType::Posix,
        }
    }

    #[test]
    fn echo_succeeds_with_captured_stdout() {
        let dir = TempDir::new().unwrap();
        let result = execute_command("echo hello", dir.path(), &sh()).unwrap();

        assert_eq!(result.exit_status, 0);
        assert!(result.stdout.contains("hello"));
        assert!(result.stderr.is_empty());
    }

    #[test]
    fn non_zero_exit_is_a_result_not_an_error() {
        let dir = TempDir::new().unwrap();
        let result = execute_command("echo oops >&2; exit 3", dir.path(), &sh()).unwrap();

        assert_eq!(result.exit_status, 3);
        assert!(!result.success());
        assert!(result.stderr.contains("oops"));
    }

    #[test]
    fn pipes_are_interpreted_by_the_shell() {
        let dir = TempDir::new().unwrap();
        let result = execute_command("printf 'b\\na\\n' | sort | head -n 1", dir.path(), &sh())
            .unwrap();

        assert_eq!(result.stdout.trim(), "a");
    }

    #[test]
    fn runs_in_the_given_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "").unwrap();

        let result = execute_command("ls", dir.path(), &sh()).unwrap();
        assert!(result.stdout.contains("marker.txt"));
    }

    #[test]
    fn missing_program_reports_127() {
        let dir = TempDir::new().unwrap();
        let result =
            execute_command("definitely-not-a-real-program-xyz", dir.path(), &sh()).unwrap();

        assert_eq!(result.exit_status, COMMAND_NOT_FOUND);
    }
}
