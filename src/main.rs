/*!
 * Kernel Demo Entry Point
 *
 * Boots the descriptor layer over an in-memory filesystem (or a local
 * directory when KERNEL_STORAGE_PATH is set) and runs a short session
 * through the syscall executor.
 */

use miette::{IntoDiagnostic, Result};
use std::sync::Arc;
use tracing::{info, warn};

use fd_kernel::core::limits::MEMFS_DEFAULT_CAPACITY;
use fd_kernel::vfs::types::{O_CREAT, O_RDWR, O_TRUNC};
use fd_kernel::{
    init_tracing, Console, FileSystem, KernelConfig, MemFS, Process, Syscall, SyscallExecutor,
    SyscallResult, SEEK_SET,
};

fn main() -> Result<()> {
    init_tracing();

    let config = KernelConfig::load()?;
    info!(
        max_open_files = config.table.capacity,
        reserved = config.table.reserved,
        system_max_open_files = config.system_max_open_files,
        path_max = config.path_max,
        "kernel starting"
    );

    let vfs = mount_root()?;
    info!(fs = vfs.name(), "root filesystem ready");

    let executor = SyscallExecutor::from_config(vfs, &config);
    let console = Arc::new(Console::new());
    let process = Process::with_stdio(1, config.table, executor.pool(), console.clone())?;

    let session = |syscall: Syscall| -> SyscallResult {
        let name = syscall.name();
        let result = executor.execute(&process, syscall);
        match &result {
            SyscallResult::Success { value, .. } => info!(syscall = name, value, "ok"),
            SyscallResult::Error { errno, error } => {
                warn!(syscall = name, errno, error = %error, "failed")
            }
        }
        result
    };

    let fd = match session(Syscall::Open {
        path: "/hello.txt".into(),
        flags: O_RDWR | O_CREAT | O_TRUNC,
        mode: 0o644,
    }) {
        SyscallResult::Success { value, .. } => u32::try_from(value).into_diagnostic()?,
        SyscallResult::Error { error, .. } => return Err(error.into()),
    };

    session(Syscall::Write {
        fd,
        data: b"hello, descriptor table\n".to_vec(),
    });
    session(Syscall::Lseek {
        fd,
        offset: 7,
        whence: SEEK_SET,
    });
    if let Some(data) = session(Syscall::Read { fd, len: 64 }).data() {
        session(Syscall::Write {
            fd: 1,
            data: data.to_vec(),
        });
    }
    session(Syscall::Close { fd });
    session(Syscall::Close { fd });

    info!(
        console = %String::from_utf8_lossy(&console.take_output()).trim_end(),
        "console output"
    );

    let closed = process.exit();
    info!(closed, live = executor.pool().live(), "kernel shutting down");
    Ok(())
}

fn mount_root() -> Result<Arc<dyn FileSystem>> {
    #[cfg(unix)]
    {
        if let Ok(path) = std::env::var("KERNEL_STORAGE_PATH") {
            std::fs::create_dir_all(&path).into_diagnostic()?;
            return Ok(Arc::new(fd_kernel::LocalFS::new(path)));
        }
    }

    Ok(Arc::new(MemFS::with_capacity(MEMFS_DEFAULT_CAPACITY)))
}
