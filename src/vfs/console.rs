/*!
 * Console Device
 * Non-seekable file object backing the standard streams
 */

use parking_lot::Mutex;
use std::collections::VecDeque;
use tracing::debug;

use super::traits::FileObject;
use super::types::*;

/// Console device with a queued input side and a captured output side
///
/// Reads drain pending input; writes are appended to the output buffer.
/// The offset argument is ignored in both directions.
#[derive(Debug, Default)]
pub struct Console {
    input: Mutex<VecDeque<u8>>,
    output: Mutex<Vec<u8>>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes for subsequent reads
    pub fn push_input(&self, bytes: &[u8]) {
        self.input.lock().extend(bytes);
    }

    /// Take everything written so far
    pub fn take_output(&self) -> Vec<u8> {
        std::mem::take(&mut *self.output.lock())
    }
}

impl FileObject for Console {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> VfsResult<Transfer> {
        let mut input = self.input.lock();
        let n = buf.len().min(input.len());
        for (slot, byte) in buf.iter_mut().zip(input.drain(..n)) {
            *slot = byte;
        }
        Ok(Transfer::new(n, offset + n as u64))
    }

    fn write_at(&self, offset: u64, buf: &[u8], _append: bool) -> VfsResult<Transfer> {
        self.output.lock().extend_from_slice(buf);
        debug!(bytes = buf.len(), "console write");
        Ok(Transfer::new(buf.len(), offset + buf.len() as u64))
    }

    fn size(&self) -> VfsResult<u64> {
        Err(VfsError::NotSeekable)
    }

    fn is_seekable(&self) -> bool {
        false
    }
}
