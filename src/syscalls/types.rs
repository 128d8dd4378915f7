/*!
 * Syscall Types
 * Request and result types for the descriptor syscalls
 */

use serde::{Deserialize, Serialize};

use crate::core::{Fd, FsError};

/// Offset is set to `offset`
pub const SEEK_SET: u32 = 0;
/// Offset is set to its current value plus `offset`
pub const SEEK_CUR: u32 = 1;
/// Offset is set to the file size plus `offset`
pub const SEEK_END: u32 = 2;

/// Descriptor syscall request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "syscall")]
pub enum Syscall {
    Open {
        path: String,
        /// POSIX-style `O_*` bits
        flags: u32,
        /// Permission bits for a created file
        #[serde(default = "default_mode")]
        mode: u32,
    },
    Read {
        fd: Fd,
        len: usize,
    },
    Write {
        fd: Fd,
        data: Vec<u8>,
    },
    Close {
        fd: Fd,
    },
    Lseek {
        fd: Fd,
        offset: i64,
        whence: u32,
    },
}

fn default_mode() -> u32 {
    0o644
}

impl Syscall {
    /// Name used in spans and logs
    pub fn name(&self) -> &'static str {
        match self {
            Syscall::Open { .. } => "open",
            Syscall::Read { .. } => "read",
            Syscall::Write { .. } => "write",
            Syscall::Close { .. } => "close",
            Syscall::Lseek { .. } => "lseek",
        }
    }
}

/// Syscall outcome as returned to user space
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum SyscallResult {
    Success {
        /// Descriptor, byte count or offset, depending on the call
        value: u64,
        /// Bytes produced by `read`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Vec<u8>>,
    },
    Error {
        errno: i32,
        error: FsError,
    },
}

impl SyscallResult {
    #[inline]
    #[must_use]
    pub fn success(value: u64) -> Self {
        Self::Success { value, data: None }
    }

    #[inline]
    #[must_use]
    pub fn success_with_data(data: Vec<u8>) -> Self {
        Self::Success {
            value: data.len() as u64,
            data: Some(data),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[inline]
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Return value on success
    pub fn value(&self) -> Option<u64> {
        match self {
            Self::Success { value, .. } => Some(*value),
            Self::Error { .. } => None,
        }
    }

    /// Payload of a successful read
    pub fn data(&self) -> Option<&[u8]> {
        match self {
            Self::Success { data, .. } => data.as_deref(),
            Self::Error { .. } => None,
        }
    }

    /// Error of a failed call
    pub fn error(&self) -> Option<&FsError> {
        match self {
            Self::Error { error, .. } => Some(error),
            Self::Success { .. } => None,
        }
    }

    /// errno of a failed call
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::Error { errno, .. } => Some(*errno),
            Self::Success { .. } => None,
        }
    }
}

impl From<FsError> for SyscallResult {
    fn from(error: FsError) -> Self {
        Self::Error {
            errno: error.errno(),
            error,
        }
    }
}
