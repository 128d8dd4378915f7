/*!
 * Open File
 * Reference-counted handle pairing a file object with an access mode
 * and a lock-protected seek offset
 */

use parking_lot::Mutex;
use std::fmt;
use std::io::SeekFrom;
use std::sync::Arc;
use tracing::debug;

use super::pool::{OpenFilePool, PoolSlot};
use crate::core::{FsError, FsResult, Offset};
use crate::vfs::{AccessMode, FileObject};

/// Kernel-level open file
///
/// Shared by every descriptor slot that refers to it (`Arc` strong count
/// is the reference count). The offset is only reachable through its
/// mutex, and every read, write and seek holds that mutex across the
/// file-object call and the offset update.
pub struct OpenFile {
    object: Arc<dyn FileObject>,
    mode: AccessMode,
    append: bool,
    offset: Mutex<Offset>,
    slot: PoolSlot,
}

impl OpenFile {
    /// Create an OpenFile at offset 0 with a reference count of 1
    ///
    /// On failure `object` is dropped, releasing the caller's reference.
    pub fn create(
        pool: &OpenFilePool,
        object: Arc<dyn FileObject>,
        mode: AccessMode,
        append: bool,
    ) -> FsResult<Arc<Self>> {
        let slot = pool.acquire()?;
        debug!(file_id = slot.id(), mode = mode.as_str(), append, "open file created");

        Ok(Arc::new(Self {
            object,
            mode,
            append,
            offset: Mutex::new(0),
            slot,
        }))
    }

    /// Pool-unique identifier, for logs
    #[inline]
    pub fn id(&self) -> u64 {
        self.slot.id()
    }

    #[inline]
    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    #[inline]
    pub fn is_append(&self) -> bool {
        self.append
    }

    /// Take another reference (table copy, duplication)
    #[inline]
    #[must_use]
    pub fn increment_ref(self: &Arc<Self>) -> Arc<Self> {
        Arc::clone(self)
    }

    /// Give up one reference; returns `true` when this call destroyed the file
    pub fn decrement_ref(self: Arc<Self>) -> bool {
        let id = self.id();
        match Arc::into_inner(self) {
            Some(file) => {
                drop(file);
                debug!(file_id = id, "open file destroyed");
                true
            }
            None => false,
        }
    }

    /// Current number of references
    #[inline]
    pub fn refcount(self: &Arc<Self>) -> usize {
        Arc::strong_count(self)
    }

    /// Fail with `AccessDenied` unless the file was opened for reading
    pub fn check_readable(&self) -> FsResult<()> {
        if self.mode.can_read() {
            Ok(())
        } else {
            Err(self.denied())
        }
    }

    fn denied(&self) -> FsError {
        FsError::access_denied(format!("file opened {}", self.mode.as_str()))
    }

    /// Snapshot of the seek offset
    pub fn offset(&self) -> Offset {
        *self.offset.lock()
    }

    /// Read at the current offset and advance it by the bytes transferred
    pub fn read(&self, buf: &mut [u8]) -> FsResult<usize> {
        self.check_readable()?;
        if buf.is_empty() {
            return Ok(0);
        }

        let mut offset = self.offset.lock();
        let transfer = self.object.read_at(*offset, buf)?;
        *offset = transfer.offset;
        Ok(transfer.bytes)
    }

    /// Write at the current offset (or end, in append mode) and advance it
    pub fn write(&self, buf: &[u8]) -> FsResult<usize> {
        if !self.mode.can_write() {
            return Err(self.denied());
        }
        if buf.is_empty() {
            return Ok(0);
        }

        let mut offset = self.offset.lock();
        let transfer = self.object.write_at(*offset, buf, self.append)?;
        *offset = transfer.offset;
        Ok(transfer.bytes)
    }

    /// Reposition the offset; the offset is unchanged on failure
    pub fn seek(&self, pos: SeekFrom) -> FsResult<Offset> {
        if !self.object.is_seekable() {
            return Err(FsError::IllegalSeek);
        }

        let mut offset = self.offset.lock();
        let target = match pos {
            SeekFrom::Start(n) => Some(n),
            SeekFrom::Current(delta) => offset.checked_add_signed(delta),
            SeekFrom::End(delta) => self.object.size()?.checked_add_signed(delta),
        };

        let target = target.ok_or_else(|| {
            FsError::invalid_argument(format!("seek to {:?} leaves the valid range", pos))
        })?;
        *offset = target;
        Ok(target)
    }
}

impl fmt::Debug for OpenFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenFile")
            .field("id", &self.id())
            .field("mode", &self.mode)
            .field("append", &self.append)
            .finish_non_exhaustive()
    }
}
