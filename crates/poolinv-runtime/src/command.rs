use crate::error::{Result, RuntimeError};
use std::process::Command;
use tracing::debug;

/// Output from a command execution
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Execute a command and fail on non-zero exit code
pub fn exec(program: &str, args: &[&str]) -> Result<CommandOutput> {
    let output = exec_unchecked(program, args)?;

    if output.exit_code != 0 {
        return Err(RuntimeError::command_failed(
            format!("{} {}", program, args.join(" ")),
            output.exit_code,
            &output.stderr,
        ));
    }

    Ok(output)
}

/// Execute a command and return output regardless of exit code
///
/// Blocks the calling thread until the child exits.
pub fn exec_unchecked(program: &str, args: &[&str]) -> Result<CommandOutput> {
    debug!("Executing: {} {}", program, args.join(" "));

    let output = Command::new(program).args(args).output().map_err(|e| {
        RuntimeError::command_failed(
            format!("{} {}", program, args.join(" ")),
            -1,
            e.to_string(),
        )
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    debug!(
        "Command exited with code {}: {} {}",
        exit_code,
        program,
        args.join(" ")
    );

    Ok(CommandOutput {
        stdout,
        stderr,
        exit_code,
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_exec_captures_stdout() {
        let output = exec("sh", &["-c", "printf 'tank\\n'"]).unwrap();
        assert_eq!(output.stdout, "tank\n");
        assert_eq!(output.exit_code, 0);
    }

    #[test]
    fn test_exec_fails_on_non_zero_exit() {
        let err = exec("sh", &["-c", "echo oops >&2; exit 3"]).unwrap_err();
        match err {
            RuntimeError::CommandFailed {
                exit_code, stderr, ..
            } => {
                assert_eq!(exit_code, 3);
                assert_eq!(stderr.trim(), "oops");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_exec_missing_program() {
        let err = exec_unchecked("/nonexistent/poolinv-zpool", &["list"]).unwrap_err();
        assert!(matches!(err, RuntimeError::CommandFailed { exit_code: -1, .. }));
    }
}
