/*!
 * File Descriptor Syscalls
 * open, read, write, close and lseek against a caller's descriptor table
 */

use std::io::SeekFrom;
use std::path::Path;
use tracing::debug;

use super::executor::SyscallExecutor;
use super::types::{SEEK_CUR, SEEK_END, SEEK_SET};
use crate::core::{Fd, FsError, FsResult, Offset};
use crate::fd::{FdTable, OpenFile};
use crate::vfs::{OpenFlags, OpenMode};

impl SyscallExecutor {
    /// Open `path` and install it in the lowest free descriptor
    pub fn open(&self, table: &FdTable, path: &str, flags: u32, mode: u32) -> FsResult<Fd> {
        let flags = OpenFlags::from_posix(flags)?;
        let path = self.copy_in_path(path)?;

        let object = self.vfs.resolve(path, flags, OpenMode::new(mode))?;
        let file = OpenFile::create(&self.pool, object, flags.access, flags.append)?;
        let file_id = file.id();
        let fd = table.place(file)?;

        debug!(
            pid = table.owner(),
            fd,
            file_id,
            path = %path.display(),
            mode = flags.access.as_str(),
            "file opened"
        );
        Ok(fd)
    }

    /// Read into `buf` at the descriptor's offset
    pub fn read(&self, table: &FdTable, fd: Fd, buf: &mut [u8]) -> FsResult<usize> {
        let pinned = table.get(fd)?;
        let result = pinned.read(buf);
        table.release(pinned);
        result
    }

    /// Write `buf` at the descriptor's offset
    pub fn write(&self, table: &FdTable, fd: Fd, buf: &[u8]) -> FsResult<usize> {
        let pinned = table.get(fd)?;
        let result = pinned.write(buf);
        table.release(pinned);
        result
    }

    /// Empty the slot and drop its reference
    pub fn close(&self, table: &FdTable, fd: Fd) -> FsResult<()> {
        if !table.in_range(fd) {
            return Err(FsError::BadDescriptor(fd));
        }

        let Some(file) = table.replace_at(fd, None)? else {
            return Err(FsError::NotOpen(fd));
        };

        let file_id = file.id();
        let destroyed = file.decrement_ref();
        debug!(pid = table.owner(), fd, file_id, destroyed, "file closed");
        Ok(())
    }

    /// Reposition the descriptor's offset
    pub fn lseek(&self, table: &FdTable, fd: Fd, offset: i64, whence: u32) -> FsResult<Offset> {
        let pinned = table.get(fd)?;

        let pos = match whence {
            SEEK_SET => u64::try_from(offset).map(SeekFrom::Start).map_err(|_| {
                FsError::invalid_argument(format!("negative offset {offset} with SEEK_SET"))
            })?,
            SEEK_CUR => SeekFrom::Current(offset),
            SEEK_END => SeekFrom::End(offset),
            other => return Err(FsError::invalid_argument(format!("unknown whence {other}"))),
        };

        let result = pinned.seek(pos);
        table.release(pinned);
        result
    }

    /// Validate a user-supplied path before it reaches the filesystem
    fn copy_in_path<'a>(&self, path: &'a str) -> FsResult<&'a Path> {
        if path.is_empty() {
            return Err(FsError::invalid_argument("empty path"));
        }
        if path.contains('\0') {
            return Err(FsError::BadAddress("path contains a NUL byte".into()));
        }
        if path.len() > self.path_max {
            return Err(FsError::NameTooLong(path.len()));
        }
        Ok(Path::new(path))
    }
}
