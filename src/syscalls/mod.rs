/*!
 * Syscalls Module
 * Descriptor syscalls and their request/result types
 */

mod executor;
mod fd;
mod types;

// Re-export public API
pub use executor::SyscallExecutor;
pub use types::{Syscall, SyscallResult, SEEK_CUR, SEEK_END, SEEK_SET};
