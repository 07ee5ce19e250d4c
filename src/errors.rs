//! Error taxonomy shared by every repository area.
//!
//! Commands return `anyhow::Result`, but anything a caller may want to react
//! to is raised as a [`VcsError`] first, so the binary can recover its
//! [`ErrorKind`] from the error chain and pick a distinct exit code.

use thiserror::Error;

/// Broad classification of a failure, used for exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad user input caught before any mutation.
    Validation,
    /// I/O failure while touching repository files.
    Runtime,
    /// Damaged object store content.
    Corrupt,
}

impl ErrorKind {
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorKind::Runtime => 1,
            ErrorKind::Validation => 2,
            ErrorKind::Corrupt => 3,
        }
    }
}

#[derive(Error, Debug)]
pub enum VcsError {
    /// A hash that is not exactly 40 hexadecimal characters.
    #[error("not a valid object name: {0}")]
    InvalidHash(String),

    /// A syntactically valid hash with no stored object behind it.
    #[error("object not found: {0}")]
    NotFound(String),

    /// Stored bytes that cannot be decoded.
    #[error("corrupt object {oid}: {reason}")]
    Corrupt { oid: String, reason: String },

    /// Arguments or repository state that make the command inapplicable.
    #[error("{0}")]
    Validation(String),

    /// Reading or writing a repository file failed.
    #[error("{context}")]
    Runtime {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl VcsError {
    pub fn validation(message: impl Into<String>) -> Self {
        VcsError::Validation(message.into())
    }

    pub fn corrupt(oid: impl Into<String>, reason: impl Into<String>) -> Self {
        VcsError::Corrupt {
            oid: oid.into(),
            reason: reason.into(),
        }
    }

    pub fn runtime(context: impl Into<String>, source: std::io::Error) -> Self {
        VcsError::Runtime {
            context: context.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            VcsError::InvalidHash(_) | VcsError::NotFound(_) | VcsError::Validation(_) => {
                ErrorKind::Validation
            }
            VcsError::Corrupt { .. } => ErrorKind::Corrupt,
            VcsError::Runtime { .. } => ErrorKind::Runtime,
        }
    }
}

/// Classify an arbitrary error by the first [`VcsError`] in its chain.
///
/// Errors that never passed through a [`VcsError`] are I/O or plumbing
/// failures and count as runtime errors.
pub fn classify(error: &anyhow::Error) -> ErrorKind {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<VcsError>())
        .map(VcsError::kind)
        .unwrap_or(ErrorKind::Runtime)
}
