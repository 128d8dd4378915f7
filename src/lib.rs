/*!
 * File Descriptor Kernel Library
 * Per-process descriptor tables, shared open files and the syscalls over them
 */

pub mod config;
pub mod core;
pub mod fd;
pub mod monitoring;
pub mod process;
pub mod syscalls;
pub mod vfs;

// Re-exports
pub use config::{ConfigError, KernelConfig, TableConfig};
pub use core::{Fd, FsError, FsResult, Offset, Pid};
pub use fd::{FdTable, FdToken, OpenFile, OpenFilePool, PinnedFile};
pub use monitoring::init_tracing;
pub use process::Process;
pub use syscalls::{Syscall, SyscallExecutor, SyscallResult, SEEK_CUR, SEEK_END, SEEK_SET};
pub use vfs::{Console, FileObject, FileSystem, MemFS};
#[cfg(unix)]
pub use vfs::LocalFS;
