//! External process invocation.
//!
//! Every subprocess the engine starts (interpreter version probes, the venv
//! bootstrap, activation shells) goes through `ProcessRunner`, so unit tests
//! can substitute deterministic fakes instead of spawning real interpreters
//! and shells.

use std::ffi::OsStr;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} did not finish within {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("failed waiting for {program}: {source}")]
    Wait {
        program: String,
        source: std::io::Error,
    },
}

pub trait ProcessRunner {
    /// Runs a program to completion, capturing its output. With a timeout,
    /// the process is killed once the deadline passes and the call fails.
    fn run(
        &self,
        program: &Path,
        args: &[&OsStr],
        timeout: Option<Duration>,
    ) -> Result<RunOutput, RunError>;

    /// Starts a program and returns immediately. The child inherits the
    /// terminal and is never waited on.
    fn spawn_detached(&self, program: &Path, args: &[&OsStr]) -> Result<(), RunError>;
}

pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(
        &self,
        program: &Path,
        args: &[&OsStr],
        timeout: Option<Duration>,
    ) -> Result<RunOutput, RunError> {
        let label = program.display().to_string();

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RunError::Spawn {
                program: label.clone(),
                source,
            })?;

        let status = match timeout {
            None => child.wait().map_err(|source| RunError::Wait {
                program: label.clone(),
                source,
            })?,
            Some(limit) => {
                let start = Instant::now();
                loop {
                    match child.try_wait() {
                        Ok(Some(status)) => break status,
                        Ok(None) => {
                            if start.elapsed() > limit {
                                let _ = child.kill();
                                let _ = child.wait();
                                return Err(RunError::Timeout {
                                    program: label,
                                    timeout: limit,
                                });
                            }
                            std::thread::sleep(Duration::from_millis(50));
                        }
                        Err(source) => {
                            return Err(RunError::Wait {
                                program: label,
                                source,
                            });
                        }
                    }
                }
            }
        };

        let mut stdout = String::new();
        if let Some(mut pipe) = child.stdout.take() {
            let _ = pipe.read_to_string(&mut stdout);
        }

        let mut stderr = String::new();
        if let Some(mut pipe) = child.stderr.take() {
            let _ = pipe.read_to_string(&mut stderr);
        }

        Ok(RunOutput {
            success: status.success(),
            stdout,
            stderr,
        })
    }

    fn spawn_detached(&self, program: &Path, args: &[&OsStr]) -> Result<(), RunError> {
        Command::new(program)
            .args(args)
            .spawn()
            .map(|_| ())
            .map_err(|source| RunError::Spawn {
                program: program.display().to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn run_captures_output_and_status() {
        let output = SystemRunner
            .run(
                Path::new("/bin/sh"),
                &[OsStr::new("-c"), OsStr::new("printf hello")],
                Some(Duration::from_secs(5)),
            )
            .unwrap();

        assert!(output.success);
        assert_eq!(output.stdout, "hello");
    }

    #[cfg(unix)]
    #[test]
    fn run_kills_on_timeout() {
        let result = SystemRunner.run(
            Path::new("/bin/sh"),
            &[OsStr::new("-c"), OsStr::new("sleep 5")],
            Some(Duration::from_millis(100)),
        );

        assert!(matches!(result, Err(RunError::Timeout { .. })));
    }

    #[test]
    fn spawn_failure_is_reported() {
        let result = SystemRunner.run(
            Path::new("/definitely/not/a/real/binary"),
            &[],
            Some(Duration::from_secs(1)),
        );

        assert!(matches!(result, Err(RunError::Spawn { .. })));
    }
}
