/*!
 * LocalFS Tests
 */

use fd_kernel::fd::OpenFilePool;
use fd_kernel::vfs::types::{O_APPEND, O_CREAT, O_EXCL, O_RDONLY, O_RDWR, O_WRONLY};
use fd_kernel::vfs::{FileSystem, LocalFS, OpenFlags, OpenMode, VfsError};
use fd_kernel::{FsError, Process, SyscallExecutor, TableConfig, SEEK_SET};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn setup() -> (TempDir, SyscallExecutor, Process) {
    let dir = TempDir::new().unwrap();
    let executor = SyscallExecutor::new(Arc::new(LocalFS::new(dir.path())), OpenFilePool::new(16));
    let process = Process::new(1, TableConfig::new(8, 3));
    (dir, executor, process)
}

#[test]
fn test_create_write_read() {
    let (dir, executor, process) = setup();
    let files = process.files();

    let fd = executor.open(files, "/notes.txt", O_RDWR | O_CREAT, 0o600).unwrap();
    assert_eq!(executor.write(files, fd, b"on disk"), Ok(7));
    assert_eq!(executor.lseek(files, fd, 3, SEEK_SET), Ok(3));

    let mut buf = [0u8; 16];
    assert_eq!(executor.read(files, fd, &mut buf), Ok(4));
    assert_eq!(&buf[..4], b"disk");

    let on_disk = dir.path().join("notes.txt");
    assert_eq!(std::fs::read(&on_disk).unwrap(), b"on disk");
    let mode = std::fs::metadata(&on_disk).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_append_and_exclusive() {
    let (dir, executor, process) = setup();
    let files = process.files();
    std::fs::write(dir.path().join("log"), b"one").unwrap();

    assert!(matches!(
        executor.open(files, "/log", O_WRONLY | O_CREAT | O_EXCL, 0o644),
        Err(FsError::AlreadyExists(_))
    ));

    let fd = executor.open(files, "/log", O_WRONLY | O_APPEND, 0).unwrap();
    executor.write(files, fd, b"+two").unwrap();
    assert_eq!(std::fs::read(dir.path().join("log")).unwrap(), b"one+two");
}

#[test]
fn test_root_confinement() {
    let (dir, executor, process) = setup();
    std::fs::write(dir.path().join("inside"), b"ok").unwrap();

    let fd = executor
        .open(process.files(), "/../../inside", O_RDONLY, 0)
        .unwrap();
    let mut buf = [0u8; 2];
    assert_eq!(executor.read(process.files(), fd, &mut buf), Ok(2));
}

#[test]
fn test_readonly_fs() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("r"), b"read me").unwrap();
    let fs = LocalFS::readonly(dir.path());

    assert!(fs.readonly());
    assert!(matches!(
        fs.resolve(Path::new("/r"), OpenFlags::write_only(), OpenMode::default()),
        Err(VfsError::ReadOnly)
    ));
    assert!(fs
        .resolve(Path::new("/r"), OpenFlags::read_only(), OpenMode::default())
        .is_ok());
}

#[test]
fn test_directory_and_missing() {
    let (dir, executor, process) = setup();
    std::fs::create_dir(dir.path().join("sub")).unwrap();

    assert!(matches!(
        executor.open(process.files(), "/sub", O_RDONLY, 0),
        Err(FsError::IsADirectory(_))
    ));
    assert!(matches!(
        executor.open(process.files(), "/absent", O_RDONLY, 0),
        Err(FsError::NotFound(_))
    ));
    assert!(process.files().is_empty());
}
