use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Payload-free discriminant of [`JailError`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidDirectory,
    CannotReadDirectory,
    NotADirectory,
    InvalidMode,
    InvalidRoot,
    EscapesRoot,
    Storage,
}

/// Errors returned by jail operations.
///
/// Paths carried by the variants are the virtual paths the caller supplied, so messages can be
/// relayed to a remote client without disclosing where the jail lives on the host.
#[derive(Debug, Error)]
pub enum JailError {
    #[error("{0} does not exist")]
    NotFound(String),

    #[error("not a valid directory: {0}")]
    InvalidDirectory(String),

    #[error("cannot read a directory: {0}")]
    CannotReadDirectory(String),

    #[error("{0} is not a directory")]
    NotADirectory(String),

    #[error("invalid mode: {0:o}")]
    InvalidMode(u32),

    #[error("the root path must be absolute: {}", .0.display())]
    InvalidRoot(PathBuf),

    #[error("path escapes the jail root: {0}")]
    EscapesRoot(String),

    /// Any other backend failure, passed through unmodified.
    #[error("storage error on {path}: {source}")]
    Storage {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl JailError {
    /// Classifies a backend failure on the virtual path `path`.
    pub(crate) fn from_io(path: &str, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => JailError::NotFound(path.to_string()),
            _ => JailError::Storage {
                path: path.to_string(),
                source: err,
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            JailError::NotFound(_) => ErrorKind::NotFound,
            JailError::InvalidDirectory(_) => ErrorKind::InvalidDirectory,
            JailError::CannotReadDirectory(_) => ErrorKind::CannotReadDirectory,
            JailError::NotADirectory(_) => ErrorKind::NotADirectory,
            JailError::InvalidMode(_) => ErrorKind::InvalidMode,
            JailError::InvalidRoot(_) => ErrorKind::InvalidRoot,
            JailError::EscapesRoot(_) => ErrorKind::EscapesRoot,
            JailError::Storage { .. } => ErrorKind::Storage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_not_found() {
        let err = JailError::from_io("/missing.txt", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "/missing.txt does not exist");
    }

    #[test]
    fn test_from_io_passes_other_errors_through() {
        let err = JailError::from_io(
            "/locked",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.kind(), ErrorKind::Storage);
        match err {
            JailError::Storage { path, source } => {
                assert_eq!(path, "/locked");
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_storage_error_exposes_source() {
        use std::error::Error as _;

        let err = JailError::from_io("/x", io::Error::other("disk on fire"));
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "storage error on /x: disk on fire");
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            JailError::InvalidDirectory("/report.txt".into()).to_string(),
            "not a valid directory: /report.txt"
        );
        assert_eq!(JailError::InvalidMode(0o17777).to_string(), "invalid mode: 17777");
        assert_eq!(
            JailError::InvalidRoot(PathBuf::from("srv")).to_string(),
            "the root path must be absolute: srv"
        );
    }
}
