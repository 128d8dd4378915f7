/*!
 * Error Types
 * File layer error taxonomy with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::Fd;
use crate::vfs::types::VfsError;

/// Errors surfaced by the descriptor layer and its syscalls
///
/// Every variant maps to a stable errno through [`FsError::errno`].
/// Collaborator errors (VFS, file objects) pass through as their
/// matching variant.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum FsError {
    #[error("Invalid argument: {0}")]
    #[diagnostic(
        code(fs::invalid_argument),
        help("Check open flags, whence values and path syntax.")
    )]
    InvalidArgument(String),

    #[error("Bad file descriptor: {0}")]
    #[diagnostic(
        code(fs::bad_descriptor),
        help("The descriptor is out of range or does not name an open file.")
    )]
    BadDescriptor(Fd),

    #[error("File descriptor {0} is not open")]
    #[diagnostic(
        code(fs::not_open),
        help("The descriptor was never opened or has already been closed.")
    )]
    NotOpen(Fd),

    #[error("Access denied: {0}")]
    #[diagnostic(
        code(fs::access_denied),
        help("The descriptor's access mode does not allow this operation.")
    )]
    AccessDenied(String),

    #[error("Too many open files")]
    #[diagnostic(
        code(fs::too_many_open_files),
        help("The process file table is full. Close unused descriptors.")
    )]
    TooManyOpenFiles,

    #[error("Not found: {0}")]
    #[diagnostic(code(fs::not_found))]
    NotFound(String),

    #[error("Permission denied: {0}")]
    #[diagnostic(code(fs::permission_denied))]
    PermissionDenied(String),

    #[error("Is a directory: {0}")]
    #[diagnostic(code(fs::is_a_directory))]
    IsADirectory(String),

    #[error("Not a directory: {0}")]
    #[diagnostic(code(fs::not_a_directory))]
    NotADirectory(String),

    #[error("Already exists: {0}")]
    #[diagnostic(code(fs::already_exists))]
    AlreadyExists(String),

    #[error("Name too long: {0} bytes")]
    #[diagnostic(code(fs::name_too_long), help("Paths are limited to PATH_MAX bytes."))]
    NameTooLong(usize),

    #[error("I/O error: {0}")]
    #[diagnostic(code(fs::io_error))]
    IoError(String),

    #[error("No space left on device")]
    #[diagnostic(code(fs::no_space))]
    NoSpace,

    #[error("Out of memory")]
    #[diagnostic(
        code(fs::out_of_memory),
        help("The system-wide open file pool is exhausted.")
    )]
    OutOfMemory,

    #[error("Bad address: {0}")]
    #[diagnostic(code(fs::bad_address))]
    BadAddress(String),

    #[error("Illegal seek")]
    #[diagnostic(code(fs::illegal_seek), help("The underlying object is not seekable."))]
    IllegalSeek,

    #[error("Read-only filesystem")]
    #[diagnostic(code(fs::read_only))]
    ReadOnlyFs,
}

impl FsError {
    /// Stable errno reported to user space
    ///
    /// `NotOpen` shares EBADF with `BadDescriptor`; the variant keeps the
    /// distinction for logs and diagnostics.
    #[must_use]
    pub const fn errno(&self) -> i32 {
        match self {
            FsError::PermissionDenied(_) => 1,
            FsError::NotFound(_) => 2,
            FsError::IoError(_) => 5,
            FsError::BadDescriptor(_) | FsError::NotOpen(_) => 9,
            FsError::OutOfMemory => 12,
            FsError::AccessDenied(_) => 13,
            FsError::BadAddress(_) => 14,
            FsError::AlreadyExists(_) => 17,
            FsError::NotADirectory(_) => 20,
            FsError::IsADirectory(_) => 21,
            FsError::InvalidArgument(_) => 22,
            FsError::TooManyOpenFiles => 24,
            FsError::NoSpace => 28,
            FsError::IllegalSeek => 29,
            FsError::ReadOnlyFs => 30,
            FsError::NameTooLong(_) => 36,
        }
    }

    /// Create an invalid argument error
    #[inline]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an access denied error
    #[inline]
    pub fn access_denied(msg: impl Into<String>) -> Self {
        Self::AccessDenied(msg.into())
    }
}

impl From<VfsError> for FsError {
    fn from(err: VfsError) -> Self {
        match err {
            VfsError::NotFound(p) => FsError::NotFound(p),
            VfsError::AlreadyExists(p) => FsError::AlreadyExists(p),
            VfsError::PermissionDenied(p) => FsError::PermissionDenied(p),
            VfsError::NotADirectory(p) => FsError::NotADirectory(p),
            VfsError::IsADirectory(p) => FsError::IsADirectory(p),
            VfsError::NameTooLong(len) => FsError::NameTooLong(len),
            VfsError::InvalidPath(p) | VfsError::InvalidArgument(p) => FsError::InvalidArgument(p),
            VfsError::IoError(msg) => FsError::IoError(msg),
            VfsError::OutOfSpace => FsError::NoSpace,
            VfsError::NotSeekable => FsError::IllegalSeek,
            VfsError::ReadOnly => FsError::ReadOnlyFs,
        }
    }
}
