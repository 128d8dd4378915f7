/*!
 * Syscall Executor
 * Dispatches descriptor syscalls on behalf of a calling process
 */

use std::sync::Arc;
use tracing::{error, warn};

use super::types::{Syscall, SyscallResult};
use crate::config::KernelConfig;
use crate::core::limits::{MAX_READ_LEN, PATH_MAX};
use crate::core::{Fd, FsError, FsResult};
use crate::fd::OpenFilePool;
use crate::monitoring::SyscallSpan;
use crate::process::Process;
use crate::vfs::FileSystem;

/// Syscall front end
///
/// Holds only what every process shares: the path resolver, the system
/// open file pool and the path limit. Per-process state arrives with each
/// call as the caller's descriptor table.
#[derive(Clone)]
pub struct SyscallExecutor {
    pub(super) vfs: Arc<dyn FileSystem>,
    pub(super) pool: OpenFilePool,
    pub(super) path_max: usize,
}

impl SyscallExecutor {
    pub fn new(vfs: Arc<dyn FileSystem>, pool: OpenFilePool) -> Self {
        Self {
            vfs,
            pool,
            path_max: PATH_MAX,
        }
    }

    pub fn from_config(vfs: Arc<dyn FileSystem>, config: &KernelConfig) -> Self {
        Self {
            vfs,
            pool: OpenFilePool::new(config.system_max_open_files),
            path_max: config.path_max,
        }
    }

    /// Override the longest accepted path
    #[must_use]
    pub fn with_path_max(mut self, path_max: usize) -> Self {
        self.path_max = path_max;
        self
    }

    /// Pool shared by every OpenFile this executor creates
    pub fn pool(&self) -> &OpenFilePool {
        &self.pool
    }

    /// Execute a syscall for `process`
    pub fn execute(&self, process: &Process, syscall: Syscall) -> SyscallResult {
        let span = SyscallSpan::new(syscall.name(), process.pid());
        let _entered = span.enter();

        let result = self.dispatch(process, syscall);
        match &result {
            SyscallResult::Success { value, .. } => span.record_return(*value),
            SyscallResult::Error { errno, error: err } => {
                span.record_error(*errno, &err.to_string());
                match err {
                    FsError::IoError(_) => {
                        error!(pid = process.pid(), errno, error = %err, "syscall I/O failure")
                    }
                    _ => warn!(pid = process.pid(), errno, error = %err, "syscall rejected"),
                }
            }
        }
        result
    }

    fn dispatch(&self, process: &Process, syscall: Syscall) -> SyscallResult {
        let table = process.files();
        let outcome = match syscall {
            Syscall::Open { path, flags, mode } => self
                .open(table, &path, flags, mode)
                .map(|fd| SyscallResult::success(u64::from(fd))),
            Syscall::Read { fd, len } => self.read_to_vec(process, fd, len),
            Syscall::Write { fd, data } => self
                .write(table, fd, &data)
                .map(|n| SyscallResult::success(n as u64)),
            Syscall::Close { fd } => self.close(table, fd).map(|()| SyscallResult::success(0)),
            Syscall::Lseek { fd, offset, whence } => self
                .lseek(table, fd, offset, whence)
                .map(SyscallResult::success),
        };
        outcome.unwrap_or_else(SyscallResult::from)
    }

    /// Read into a kernel buffer of at most `MAX_READ_LEN` bytes
    ///
    /// The descriptor and its mode are checked before anything is allocated.
    fn read_to_vec(&self, process: &Process, fd: Fd, len: usize) -> FsResult<SyscallResult> {
        let table = process.files();
        let pinned = table.get(fd)?;
        pinned.check_readable()?;

        let len = len.min(MAX_READ_LEN);
        let mut buf = Vec::new();
        buf.try_reserve_exact(len).map_err(|_| FsError::OutOfMemory)?;
        buf.resize(len, 0);

        let result = pinned.read(&mut buf);
        table.release(pinned);
        buf.truncate(result?);
        Ok(SyscallResult::success_with_data(buf))
    }
}
