use std::ffi::OsString;
use std::process::{ExitStatus, Stdio};

use crate::docker::DockerError;

/// Program used when no other docker binary is configured.
pub const DEFAULT_PROGRAM: &str = "docker";

/// Runs docker subcommands.
///
/// [`RealExecutor`] spawns the CLI; tests substitute a mockall mock.
#[allow(async_fn_in_trait)]
pub trait DockerExecutor: Send + Sync {
    /// Run to completion and return stdout. Non-zero exit is an error
    /// carrying both output streams.
    async fn exec(&self, args: &[String]) -> Result<String, DockerError>;

    /// Run with stdout/stderr attached to ours, for long builds and pushes.
    async fn exec_streaming(&self, args: &[String]) -> Result<(), DockerError>;
}

/// Spawns the docker CLI through `tokio::process`.
pub struct RealExecutor {
    program: OsString,
}

impl RealExecutor {
    pub fn new() -> Self {
        Self::with_program(DEFAULT_PROGRAM)
    }

    /// Use another docker-compatible binary (a full path, `podman`, ...).
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, args: &[String], output: fn() -> Stdio) -> tokio::process::Command {
        tracing::debug!(program = ?self.program, ?args, "spawning");
        let mut command = tokio::process::Command::new(&self.program);
        command.args(args).stdout(output()).stderr(output());
        command
    }

    fn unavailable(&self, source: std::io::Error) -> DockerError {
        DockerError::Unavailable {
            program: self.program.to_string_lossy().into_owned(),
            source,
        }
    }
}

impl Default for RealExecutor {
    fn default() -> Self {
        Self::new()
    }
}

fn failed(args: &[String], status: ExitStatus, stdout: &[u8], stderr: &[u8]) -> DockerError {
    DockerError::CommandFailed {
        args: args.to_vec(),
        status: status.to_string(),
        stdout: String::from_utf8_lossy(stdout).into_owned(),
        stderr: String::from_utf8_lossy(stderr).into_owned(),
    }
}

impl DockerExecutor for RealExecutor {
    async fn exec(&self, args: &[String]) -> Result<String, DockerError> {
        let output = self
            .command(args, Stdio::piped)
            .output()
            .await
            .map_err(|e| self.unavailable(e))?;

        if !output.status.success() {
            return Err(failed(args, output.status, &output.stdout, &output.stderr));
        }
        String::from_utf8(output.stdout).map_err(|e| DockerError::InvalidUtf8 { source: e })
    }

    async fn exec_streaming(&self, args: &[String]) -> Result<(), DockerError> {
        let status = self
            .command(args, Stdio::inherit)
            .status()
            .await
            .map_err(|e| self.unavailable(e))?;

        if !status.success() {
            return Err(failed(args, status, &[], &[]));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_program_is_unavailable() {
        let executor = RealExecutor::with_program("warship-no-such-docker-binary");
        let result = executor.exec(&["version".to_owned()]).await;

        match result {
            Err(DockerError::Unavailable { program, .. }) => {
                assert_eq!(program, "warship-no-such-docker-binary");
            }
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }
}
