/*!
 * Core Types
 * Common types used across the kernel
 */

/// Process ID type
pub type Pid = u32;

/// File descriptor type (index into a process file table)
pub type Fd = u32;

/// Byte position within a file object
pub type Offset = u64;

/// Common result type for file layer operations
pub type FsResult<T> = Result<T, super::errors::FsError>;
