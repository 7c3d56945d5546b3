//! Create, delete, and activation operations for a single environment.
//!
//! Each operation is an imperative one-shot: nothing is persisted between
//! calls, failures are surfaced once with the underlying cause attached, and
//! there are no retries or rollbacks. Two callers racing create/delete on
//! the same path get no protection here; callers needing exclusivity must
//! serialize themselves.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use crate::errors::VenvyError;
use crate::platform::{ActivationInstruction, PlatformOps};
use crate::process::ProcessRunner;
use crate::scan::classify;

/// Outcome of a delete request. Cancellation is an ordinary outcome, not an
/// error: the caller declined the destructive step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// Bootstraps a new environment at `target` with the chosen interpreter.
///
/// The caller is responsible for checking that the parent exists and that
/// `target` is not already an environment; this function invokes the
/// bootstrap exactly once and reports its failure verbatim.
pub fn create(
    target: &Path,
    interpreter: &Path,
    runner: &dyn ProcessRunner,
) -> Result<(), VenvyError> {
    tracing::debug!(
        target = %target.display(),
        interpreter = %interpreter.display(),
        "bootstrapping environment"
    );

    let output = runner
        .run(
            interpreter,
            &[OsStr::new("-m"), OsStr::new("venv"), target.as_os_str()],
            None,
        )
        .map_err(|e| VenvyError::CreationFailed {
            path: target.to_path_buf(),
            reason: e.to_string(),
        })?;

    if !output.success {
        let stderr = output.stderr.trim();
        let reason = if stderr.is_empty() {
            String::from("bootstrap exited with a failure status")
        } else {
            stderr.to_string()
        };
        return Err(VenvyError::CreationFailed {
            path: target.to_path_buf(),
            reason,
        });
    }

    Ok(())
}

/// Removes an environment's directory tree.
///
/// The target must classify as an environment; anything else is refused with
/// no filesystem mutation. Without the confirmation token the request is
/// cancelled, also with no mutation. A failure partway through leaves
/// whatever was already removed removed.
pub fn delete(path: &Path, confirmed: bool) -> Result<DeleteOutcome, VenvyError> {
    if !classify::is_environment(path) {
        return Err(VenvyError::NotAnEnvironment(path.to_path_buf()));
    }

    if !confirmed {
        return Ok(DeleteOutcome::Cancelled);
    }

    tracing::debug!(path = %path.display(), "removing environment tree");

    fs::remove_dir_all(path).map_err(|e| VenvyError::DeletionFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(DeleteOutcome::Deleted)
}

/// Builds the platform-correct activation instruction for an environment.
/// Activation only has meaning inside a freshly spawned interactive shell;
/// this never modifies the current process.
pub fn activation_instruction(
    path: &Path,
    platform: &dyn PlatformOps,
) -> Result<ActivationInstruction, VenvyError> {
    let script = platform.activation_script(path);
    if !script.is_file() {
        return Err(VenvyError::ActivationScriptMissing(path.to_path_buf()));
    }

    platform
        .activation_instruction(path, &script)
        .map_err(VenvyError::Io)
}

/// Spawns the interactive session that applies an activation instruction.
/// Fire-and-forget: the engine holds no relationship with the child after
/// spawn.
pub fn spawn_activated_shell(
    instruction: &ActivationInstruction,
    platform: &dyn PlatformOps,
    runner: &dyn ProcessRunner,
) -> Result<(), VenvyError> {
    let (program, args) = platform.shell_invocation(instruction);
    let arg_refs: Vec<&OsStr> = args.iter().map(|a| a.as_os_str()).collect();

    tracing::debug!(program = %program.display(), "spawning activation shell");

    runner
        .spawn_detached(&program, &arg_refs)
        .map_err(|e| VenvyError::Io(std::io::Error::other(e.to_string())))
}
