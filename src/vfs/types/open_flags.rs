/*!
 * VFS Open Flags and Mode
 * Flags and modes for file opening operations
 */

use super::errors::VfsError;
use super::permissions::Permissions;
use serde::{Deserialize, Serialize};

/// Open for reading only
pub const O_RDONLY: u32 = 0x0000;
/// Open for writing only
pub const O_WRONLY: u32 = 0x0001;
/// Open for reading and writing
pub const O_RDWR: u32 = 0x0002;
/// Mask for the access mode group
pub const O_ACCMODE: u32 = 0x0003;
/// Create the file if it does not exist
pub const O_CREAT: u32 = 0x0004;
/// With O_CREAT, fail if the file exists
pub const O_EXCL: u32 = 0x0008;
/// Truncate to zero length on open
pub const O_TRUNC: u32 = 0x0010;
/// Every write lands at end of file
pub const O_APPEND: u32 = 0x0020;
/// Do not acquire a controlling terminal
pub const O_NOCTTY: u32 = 0x0040;

/// Every bit `open` understands
pub const O_ALLFLAGS: u32 = O_ACCMODE | O_CREAT | O_EXCL | O_TRUNC | O_APPEND | O_NOCTTY;

/// Access mode of an open file, fixed at open time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    #[default]
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl AccessMode {
    /// Whether reads are permitted
    #[inline]
    #[must_use]
    pub const fn can_read(self) -> bool {
        !matches!(self, AccessMode::WriteOnly)
    }

    /// Whether writes are permitted
    #[inline]
    #[must_use]
    pub const fn can_write(self) -> bool {
        !matches!(self, AccessMode::ReadOnly)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AccessMode::ReadOnly => "read-only",
            AccessMode::WriteOnly => "write-only",
            AccessMode::ReadWrite => "read-write",
        }
    }
}

/// Decoded open flags
///
/// Built from the raw syscall bitmask with [`OpenFlags::from_posix`], which
/// rejects unknown bits and the reserved access mode `3`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", default, deny_unknown_fields)]
pub struct OpenFlags {
    pub access: AccessMode,
    pub append: bool,
    pub truncate: bool,
    pub create: bool,
    pub exclusive: bool,
    pub noctty: bool,
}

impl OpenFlags {
    /// Create read-only flags
    #[inline]
    #[must_use]
    pub fn read_only() -> Self {
        Self::default()
    }

    /// Create write-only flags
    #[inline]
    #[must_use]
    pub fn write_only() -> Self {
        Self {
            access: AccessMode::WriteOnly,
            ..Default::default()
        }
    }

    /// Create read-write flags
    #[inline]
    #[must_use]
    pub fn read_write() -> Self {
        Self {
            access: AccessMode::ReadWrite,
            ..Default::default()
        }
    }

    /// Create flags for creating a file (read-write + create)
    #[inline]
    #[must_use]
    pub fn create() -> Self {
        Self {
            access: AccessMode::ReadWrite,
            create: true,
            ..Default::default()
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_readable(&self) -> bool {
        self.access.can_read()
    }

    /// Check if any write operation is possible
    #[inline]
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        self.access.can_write()
    }

    /// Decode a raw flag word, rejecting anything outside [`O_ALLFLAGS`]
    pub fn from_posix(flags: u32) -> Result<Self, VfsError> {
        let unknown = flags & !O_ALLFLAGS;
        if unknown != 0 {
            return Err(VfsError::InvalidArgument(format!(
                "unrecognized open flags 0x{:x}",
                unknown
            )));
        }

        let access = match flags & O_ACCMODE {
            O_RDONLY => AccessMode::ReadOnly,
            O_WRONLY => AccessMode::WriteOnly,
            O_RDWR => AccessMode::ReadWrite,
            _ => {
                return Err(VfsError::InvalidArgument(
                    "access mode must be one of O_RDONLY, O_WRONLY, O_RDWR".into(),
                ))
            }
        };

        let create = flags & O_CREAT != 0;
        Ok(Self {
            access,
            append: flags & O_APPEND != 0,
            truncate: flags & O_TRUNC != 0,
            create,
            // O_EXCL only has meaning together with O_CREAT
            exclusive: create && flags & O_EXCL != 0,
            noctty: flags & O_NOCTTY != 0,
        })
    }
}

/// File open mode (for creation)
///
/// Specifies permissions for newly created files. Defaults to read-write (0o644).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenMode {
    pub permissions: Permissions,
}

impl OpenMode {
    /// Create mode with specified permissions
    #[inline]
    #[must_use]
    pub const fn new(mode: u32) -> Self {
        Self {
            permissions: Permissions::new(mode),
        }
    }

    /// Create mode with read-only permissions
    #[inline]
    #[must_use]
    pub const fn readonly() -> Self {
        Self {
            permissions: Permissions::readonly(),
        }
    }
}

impl Default for OpenMode {
    fn default() -> Self {
        Self {
            permissions: Permissions::readwrite(),
        }
    }
}
