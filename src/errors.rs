//! Error taxonomy for the lifecycle contract.
//!
//! Scan-time problems (missing roots, unreadable subtrees) are not errors;
//! they surface as diagnostics on the scan result. The variants here are the
//! outcomes a front end has to present to the user, with the underlying
//! cause carried verbatim.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VenvyError {
    #[error("{} is not a recognized virtual environment", .0.display())]
    NotAnEnvironment(PathBuf),

    #[error("failed to create environment at {}: {}", .path.display(), .reason)]
    CreationFailed { path: PathBuf, reason: String },

    #[error("failed to delete environment at {}: {}", .path.display(), .reason)]
    DeletionFailed { path: PathBuf, reason: String },

    #[error("no activation script found under {}", .0.display())]
    ActivationScriptMissing(PathBuf),

    #[error("no usable Python interpreter found on this machine")]
    NoInterpreterFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
