/*!
 * File Handle Implementation
 * In-memory file object for positioned read/write
 */

use parking_lot::RwLock;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::super::traits::FileObject;
use super::super::types::*;
use super::MemFS;

/// In-memory file object
///
/// Shares the node's byte buffer, so every handle on the same path sees
/// the same contents.
pub(super) struct MemFile {
    fs: MemFS,
    data: Arc<RwLock<Vec<u8>>>,
}

impl MemFile {
    pub(super) fn new(fs: MemFS, data: Arc<RwLock<Vec<u8>>>) -> Self {
        fs.open_handles.fetch_add(1, Ordering::SeqCst);
        Self { fs, data }
    }
}

impl FileObject for MemFile {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> VfsResult<Transfer> {
        let data = self.data.read();

        let Ok(start) = usize::try_from(offset) else {
            return Ok(Transfer::empty(offset));
        };
        if start >= data.len() {
            return Ok(Transfer::empty(offset));
        }

        let n = buf.len().min(data.len() - start);
        buf[..n].copy_from_slice(&data[start..start + n]);
        Ok(Transfer::new(n, offset + n as u64))
    }

    fn write_at(&self, offset: u64, buf: &[u8], append: bool) -> VfsResult<Transfer> {
        let mut data = self.data.write();

        let start = if append {
            data.len()
        } else {
            usize::try_from(offset)
                .map_err(|_| VfsError::InvalidArgument(format!("offset {} too large", offset)))?
        };
        let end = start
            .checked_add(buf.len())
            .ok_or_else(|| VfsError::InvalidArgument("write extends past address space".into()))?;

        let growth = end.saturating_sub(data.len());
        if growth > 0 {
            self.fs.check_and_reserve_space(growth)?;
            if data.try_reserve_exact(growth).is_err() {
                self.fs.release_space(growth);
                return Err(VfsError::OutOfSpace);
            }
            data.resize(end, 0);
        }

        data[start..end].copy_from_slice(buf);
        Ok(Transfer::new(buf.len(), end as u64))
    }

    fn size(&self) -> VfsResult<u64> {
        Ok(self.data.read().len() as u64)
    }
}

impl Drop for MemFile {
    fn drop(&mut self) {
        self.fs.open_handles.fetch_sub(1, Ordering::SeqCst);
    }
}
