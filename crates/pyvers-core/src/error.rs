use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::Version;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallationState {
    Present,
    Absent,
}

impl InstallationState {
    pub fn from_present(present: bool) -> Self {
        if present {
            Self::Present
        } else {
            Self::Absent
        }
    }
}

impl fmt::Display for InstallationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => f.write_str("already installed"),
            Self::Absent => f.write_str("not installed"),
        }
    }
}

/// A lifecycle command found the version in the wrong starting state. Raised
/// before any disk mutation, after the recovery action has run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{version} is {actual}")]
pub struct PreconditionError {
    pub version: Version,
    pub expected: InstallationState,
    pub actual: InstallationState,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized build at {}", .root.display())]
pub struct InvalidBuildError {
    pub root: PathBuf,
}

/// A shim could not be written or removed. Link state for the version may be
/// partial; re-running the lifecycle command repairs it.
#[derive(Debug, thiserror::Error)]
#[error("failed to update command shim '{command}': {cause}")]
pub struct LinkError {
    pub command: String,
    #[source]
    pub cause: io::Error,
}

impl LinkError {
    pub fn new(command: impl Into<String>, cause: io::Error) -> Self {
        Self {
            command: command.into(),
            cause,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    #[error(transparent)]
    InvalidBuild(#[from] InvalidBuildError),
    #[error(transparent)]
    Link(#[from] LinkError),
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}
