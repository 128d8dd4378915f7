/*!
 * System Limits and Constants
 *
 * Centralized location for the file layer's limits and magic numbers.
 * These are compile-time defaults; `KernelConfig` may override them at boot.
 *
 * - Linux-compatible values are marked with [LINUX-COMPAT]
 */

// =============================================================================
// FILE DESCRIPTOR LIMITS
// =============================================================================

/// Slots in a per-process descriptor table
/// [LINUX-COMPAT] Matches the default RLIMIT_NOFILE soft limit
pub const DEFAULT_MAX_OPEN_FILES: usize = 1024;

/// Descriptors reserved for stdin, stdout and stderr
/// `place` never hands these out; they are installed explicitly at process start
pub const RESERVED_FDS: usize = 3;

/// Standard input descriptor
pub const STDIN_FD: u32 = 0;

/// Standard output descriptor
pub const STDOUT_FD: u32 = 1;

/// Standard error descriptor
pub const STDERR_FD: u32 = 2;

/// Live OpenFile objects across every process table
/// Exceeding this makes OpenFile creation fail with OutOfMemory
pub const SYSTEM_MAX_OPEN_FILES: usize = 64 * 1024;

// =============================================================================
// PATH LIMITS
// =============================================================================

/// Longest path accepted by open(), in bytes
pub const PATH_MAX: usize = 1024;

// =============================================================================
// I/O LIMITS
// =============================================================================

/// Largest kernel buffer a single Read syscall allocates (1MB)
/// Longer requests return a short read
pub const MAX_READ_LEN: usize = 1024 * 1024;

// =============================================================================
// FILESYSTEM LIMITS
// =============================================================================

/// Default in-memory filesystem capacity (100MB)
pub const MEMFS_DEFAULT_CAPACITY: usize = 100 * 1024 * 1024;
