/*!
 * Concurrency Tests
 * Shared-offset serialization and close/I-O races
 */

use fd_kernel::fd::OpenFilePool;
use fd_kernel::vfs::types::{O_CREAT, O_RDWR};
use fd_kernel::vfs::MemFS;
use fd_kernel::{Process, SyscallExecutor, TableConfig, SEEK_CUR};
use proptest::prelude::*;
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;

fn setup() -> (MemFS, SyscallExecutor, Arc<Process>, u32) {
    let fs = MemFS::new();
    let executor = SyscallExecutor::new(Arc::new(fs.clone()), OpenFilePool::new(16));
    let process = Arc::new(Process::new(7, TableConfig::new(8, 0)));
    let fd = executor
        .open(process.files(), "/shared", O_RDWR | O_CREAT, 0o644)
        .unwrap();
    (fs, executor, process, fd)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn concurrent_writes_never_overlap(a in 1usize..512, b in 1usize..512) {
        let (fs, executor, process, fd) = setup();
        let barrier = Arc::new(Barrier::new(2));

        let writers: Vec<_> = [(b'a', a), (b'b', b)]
            .into_iter()
            .map(|(byte, len)| {
                let (executor, process, barrier) =
                    (executor.clone(), process.clone(), barrier.clone());
                thread::spawn(move || {
                    barrier.wait();
                    executor.write(process.files(), fd, &vec![byte; len]).unwrap()
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let contents = fs.read_file(Path::new("/shared")).unwrap();
        prop_assert_eq!(contents.len(), a + b);
        prop_assert_eq!(
            executor.lseek(process.files(), fd, 0, SEEK_CUR).unwrap(),
            (a + b) as u64
        );

        // One writer's bytes form a prefix, the other's the suffix
        let first = contents[0];
        let first_len = if first == b'a' { a } else { b };
        prop_assert!(contents[..first_len].iter().all(|&c| c == first));
        prop_assert!(contents[first_len..].iter().all(|&c| c != first));
    }
}

#[test]
fn test_close_racing_io_is_safe() {
    const ROUNDS: usize = 200;

    for _ in 0..ROUNDS {
        let (_fs, executor, process, fd) = setup();
        let barrier = Arc::new(Barrier::new(2));

        let io = {
            let (executor, process, barrier) =
                (executor.clone(), process.clone(), barrier.clone());
            thread::spawn(move || {
                barrier.wait();
                // Either the write completes on a pinned file or the slot is already empty
                executor.write(process.files(), fd, b"payload").map(|n| assert_eq!(n, 7))
            })
        };

        barrier.wait();
        executor.close(process.files(), fd).unwrap();
        let _ = io.join().unwrap();

        assert_eq!(executor.pool().live(), 0);
    }
}

#[test]
fn test_concurrent_open_close_keeps_accounting() {
    const THREADS: usize = 4;
    const ROUNDS: usize = 100;

    let fs = MemFS::new();
    let executor = SyscallExecutor::new(Arc::new(fs.clone()), OpenFilePool::new(THREADS));
    let process = Arc::new(Process::new(9, TableConfig::new(THREADS, 0)));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let (executor, process) = (executor.clone(), process.clone());
            thread::spawn(move || {
                let path = format!("/worker{t}");
                for _ in 0..ROUNDS {
                    let fd = executor
                        .open(process.files(), &path, O_RDWR | O_CREAT, 0o644)
                        .unwrap();
                    executor.write(process.files(), fd, b"x").unwrap();
                    executor.close(process.files(), fd).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(process.files().is_empty());
    assert_eq!(executor.pool().live(), 0);
    assert_eq!(fs.open_handles(), 0);
}
