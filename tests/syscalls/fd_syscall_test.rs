/*!
 * Descriptor Syscall Tests
 * open/read/write/close/lseek semantics and error reporting
 */

use fd_kernel::core::limits::STDOUT_FD;
use fd_kernel::fd::OpenFilePool;
use fd_kernel::vfs::types::{O_APPEND, O_CREAT, O_EXCL, O_RDONLY, O_RDWR, O_TRUNC, O_WRONLY};
use fd_kernel::vfs::{Console, MemFS};
use fd_kernel::{
    FsError, Process, Syscall, SyscallExecutor, TableConfig, SEEK_CUR, SEEK_END, SEEK_SET,
};
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;

struct Harness {
    fs: MemFS,
    executor: SyscallExecutor,
    process: Process,
}

fn harness() -> Harness {
    let fs = MemFS::new();
    let executor = SyscallExecutor::new(Arc::new(fs.clone()), OpenFilePool::new(64));
    let process = Process::new(100, TableConfig::new(16, 3));
    Harness {
        fs,
        executor,
        process,
    }
}

impl Harness {
    fn open(&self, path: &str, flags: u32) -> Result<u32, FsError> {
        self.executor.open(self.process.files(), path, flags, 0o644)
    }
}

#[test]
fn test_open_returns_lowest_fd_above_reserved() {
    let h = harness();
    assert_eq!(h.open("/a", O_RDWR | O_CREAT), Ok(3));
    assert_eq!(h.open("/b", O_RDWR | O_CREAT), Ok(4));
    h.executor.close(h.process.files(), 3).unwrap();
    assert_eq!(h.open("/c", O_RDWR | O_CREAT), Ok(3));
}

#[test]
fn test_open_rejects_bad_flags() {
    let h = harness();
    assert!(matches!(
        h.open("/a", O_RDWR | O_CREAT | 0x1000),
        Err(FsError::InvalidArgument(_))
    ));
    assert!(matches!(h.open("/a", 3), Err(FsError::InvalidArgument(_))));
    assert!(!h.fs.exists(Path::new("/a")));
}

#[test]
fn test_open_path_validation() {
    let h = harness();
    assert!(matches!(h.open("", O_RDONLY), Err(FsError::InvalidArgument(_))));
    assert!(matches!(
        h.open("/bad\0path", O_RDONLY),
        Err(FsError::BadAddress(_))
    ));

    let executor = h.executor.clone().with_path_max(8);
    assert_eq!(
        executor.open(h.process.files(), "/a/long/path", O_RDONLY, 0),
        Err(FsError::NameTooLong(12))
    );
}

#[test]
fn test_open_passes_through_vfs_errors() {
    let h = harness();
    assert!(matches!(h.open("/missing", O_RDONLY), Err(FsError::NotFound(_))));

    h.fs.create_dir(Path::new("/dir")).unwrap();
    let err = h.open("/dir", O_RDONLY).unwrap_err();
    assert!(matches!(err, FsError::IsADirectory(_)));
    assert_eq!(err.errno(), 21);

    h.open("/once", O_WRONLY | O_CREAT | O_EXCL).unwrap();
    assert!(matches!(
        h.open("/once", O_WRONLY | O_CREAT | O_EXCL),
        Err(FsError::AlreadyExists(_))
    ));
    assert_eq!(h.fs.open_handles(), 1);
}

#[test]
fn test_write_then_read_back() {
    let h = harness();
    let files = h.process.files();
    let fd = h.open("/data", O_RDWR | O_CREAT).unwrap();

    assert_eq!(h.executor.write(files, fd, b"hello world"), Ok(11));
    assert_eq!(h.executor.lseek(files, fd, 0, SEEK_SET), Ok(0));

    let mut buf = [0u8; 5];
    assert_eq!(h.executor.read(files, fd, &mut buf), Ok(5));
    assert_eq!(&buf, b"hello");
    assert_eq!(h.executor.lseek(files, fd, 0, SEEK_CUR), Ok(5));
}

#[test]
fn test_mode_enforced() {
    let h = harness();
    let files = h.process.files();
    h.fs.write_file(Path::new("/f"), b"content").unwrap();

    let ro = h.open("/f", O_RDONLY).unwrap();
    let wo = h.open("/f", O_WRONLY).unwrap();

    h.executor.lseek(files, ro, 2, SEEK_SET).unwrap();
    h.executor.lseek(files, wo, 3, SEEK_SET).unwrap();

    let err = h.executor.write(files, ro, b"x").unwrap_err();
    assert!(matches!(err, FsError::AccessDenied(_)));
    assert_eq!(err.errno(), 13);

    let mut buf = [0u8; 4];
    assert!(matches!(
        h.executor.read(files, wo, &mut buf),
        Err(FsError::AccessDenied(_))
    ));
    assert_eq!(buf, [0u8; 4]);
    assert_eq!(h.executor.lseek(files, ro, 0, SEEK_CUR), Ok(2));
    assert_eq!(h.executor.lseek(files, wo, 0, SEEK_CUR), Ok(3));
    assert_eq!(h.fs.read_file(Path::new("/f")).unwrap(), b"content".to_vec());
}

#[test]
fn test_bad_descriptors() {
    let h = harness();
    let files = h.process.files();
    let mut buf = [0u8; 4];

    assert_eq!(h.executor.read(files, 7, &mut buf), Err(FsError::BadDescriptor(7)));
    assert_eq!(h.executor.write(files, 99, b"x"), Err(FsError::BadDescriptor(99)));
    assert_eq!(h.executor.close(files, 16), Err(FsError::BadDescriptor(16)));
    assert_eq!(h.executor.close(files, 5), Err(FsError::NotOpen(5)));
    assert_eq!(h.executor.lseek(files, 5, 0, SEEK_SET), Err(FsError::BadDescriptor(5)));
}

#[test]
fn test_double_close() {
    let h = harness();
    let files = h.process.files();
    let fd = h.open("/x", O_RDWR | O_CREAT).unwrap();

    assert_eq!(h.executor.close(files, fd), Ok(()));
    let err = h.executor.close(files, fd).unwrap_err();
    assert_eq!(err, FsError::NotOpen(fd));
    assert_eq!(err.errno(), 9);
    assert_eq!(h.executor.pool().live(), 0);
    assert_eq!(h.fs.open_handles(), 0);
}

#[test]
fn test_io_after_close_is_bad_descriptor() {
    let h = harness();
    let files = h.process.files();
    let fd = h.open("/gone", O_RDWR | O_CREAT).unwrap();
    h.executor.write(files, fd, b"data").unwrap();
    h.executor.close(files, fd).unwrap();

    let mut buf = [0u8; 4];
    assert_eq!(h.executor.read(files, fd, &mut buf), Err(FsError::BadDescriptor(fd)));
    assert_eq!(h.executor.write(files, fd, b"x"), Err(FsError::BadDescriptor(fd)));
    assert_eq!(h.executor.lseek(files, fd, 0, SEEK_SET), Err(FsError::BadDescriptor(fd)));
    assert_eq!(h.fs.read_file(Path::new("/gone")).unwrap(), b"data".to_vec());
}

#[test]
fn test_zero_length_io() {
    let h = harness();
    let files = h.process.files();
    let fd = h.open("/z", O_RDWR | O_CREAT).unwrap();

    assert_eq!(h.executor.write(files, fd, &[]), Ok(0));
    assert_eq!(h.executor.read(files, fd, &mut []), Ok(0));
    assert_eq!(h.executor.lseek(files, fd, 0, SEEK_CUR), Ok(0));
}

#[test]
fn test_lseek_whence() {
    let h = harness();
    let files = h.process.files();
    h.fs.write_file(Path::new("/s"), b"0123456789").unwrap();
    let fd = h.open("/s", O_RDONLY).unwrap();

    assert_eq!(h.executor.lseek(files, fd, 4, SEEK_SET), Ok(4));
    assert_eq!(h.executor.lseek(files, fd, -2, SEEK_CUR), Ok(2));
    assert_eq!(h.executor.lseek(files, fd, -1, SEEK_END), Ok(9));

    assert!(matches!(
        h.executor.lseek(files, fd, -1, SEEK_SET),
        Err(FsError::InvalidArgument(_))
    ));
    assert!(matches!(
        h.executor.lseek(files, fd, -20, SEEK_END),
        Err(FsError::InvalidArgument(_))
    ));
    assert!(matches!(
        h.executor.lseek(files, fd, 0, 7),
        Err(FsError::InvalidArgument(_))
    ));
    assert_eq!(h.executor.lseek(files, fd, 0, SEEK_CUR), Ok(9));
}

#[test]
fn test_trunc_and_append_flags() {
    let h = harness();
    let files = h.process.files();
    h.fs.write_file(Path::new("/t"), b"old contents").unwrap();

    let fd = h.open("/t", O_WRONLY | O_TRUNC).unwrap();
    h.executor.write(files, fd, b"new").unwrap();
    let fd2 = h.open("/t", O_WRONLY | O_APPEND).unwrap();
    h.executor.write(files, fd2, b"+more").unwrap();
    h.executor.write(files, fd, b"NEW").unwrap();

    assert_eq!(h.fs.read_file(Path::new("/t")).unwrap(), b"newNEWre".to_vec());
}

#[test]
fn test_stdio_console() {
    let fs = MemFS::new();
    let executor = SyscallExecutor::new(Arc::new(fs), OpenFilePool::new(8));
    let console = Arc::new(Console::new());
    let process =
        Process::with_stdio(1, TableConfig::default(), executor.pool(), console.clone()).unwrap();

    assert_eq!(executor.write(process.files(), STDOUT_FD, b"out"), Ok(3));
    assert_eq!(console.take_output(), b"out".to_vec());
    assert_eq!(
        executor.lseek(process.files(), STDOUT_FD, 0, SEEK_SET),
        Err(FsError::IllegalSeek)
    );
}

#[test]
fn test_execute_reports_errno() {
    let h = harness();
    let result = h.executor.execute(&h.process, Syscall::Close { fd: 4 });
    assert_eq!(result.errno(), Some(9));

    let result = h.executor.execute(
        &h.process,
        Syscall::Open {
            path: "/e".into(),
            flags: O_RDWR | O_CREAT,
            mode: 0o600,
        },
    );
    assert_eq!(result.value(), Some(3));

    let result = h.executor.execute(&h.process, Syscall::Read { fd: 3, len: 32 });
    assert_eq!(result.data(), Some(&[][..]));

    let result = h.executor.execute(&h.process, Syscall::Read { fd: 9, len: usize::MAX });
    assert_eq!(result.errno(), Some(9));

    let wo = h.open("/e", O_WRONLY).unwrap();
    let result = h.executor.execute(&h.process, Syscall::Read { fd: wo, len: usize::MAX });
    assert_eq!(result.errno(), Some(13));
}

#[test]
fn test_fork_and_exit() {
    let h = harness();
    let fd = h.open("/shared", O_RDWR | O_CREAT).unwrap();
    h.executor.write(h.process.files(), fd, b"abc").unwrap();

    let child = h.process.fork(101);
    assert_eq!(h.executor.lseek(child.files(), fd, 0, SEEK_CUR), Ok(3));

    h.executor.close(h.process.files(), fd).unwrap();
    assert_eq!(h.executor.write(child.files(), fd, b"d"), Ok(1));
    assert_eq!(h.executor.pool().live(), 1);

    assert_eq!(child.exit(), 1);
    assert_eq!(h.executor.pool().live(), 0);
    assert_eq!(h.fs.read_file(Path::new("/shared")).unwrap(), b"abcd".to_vec());
}
