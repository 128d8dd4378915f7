/*!
 * Open File Pool
 * System-wide accounting of live OpenFile objects
 */

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::core::{FsError, FsResult};

/// Bounded pool of OpenFile slots shared by every process table
///
/// Clones share the same counters. Each OpenFile holds one [`PoolSlot`] for
/// its whole life; the slot returns to the pool when the OpenFile is
/// destroyed.
#[derive(Debug, Clone)]
pub struct OpenFilePool {
    inner: Arc<PoolInner>,
}

#[derive(Debug)]
struct PoolInner {
    capacity: usize,
    live: AtomicUsize,
    next_id: AtomicU64,
}

impl OpenFilePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                capacity,
                live: AtomicUsize::new(0),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Number of OpenFiles currently alive
    #[inline]
    pub fn live(&self) -> usize {
        self.inner.live.load(Ordering::SeqCst)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Reserve one slot, failing with `OutOfMemory` when the pool is exhausted
    pub(crate) fn acquire(&self) -> FsResult<PoolSlot> {
        loop {
            let current = self.inner.live.load(Ordering::SeqCst);
            if current >= self.inner.capacity {
                return Err(FsError::OutOfMemory);
            }
            if self
                .inner
                .live
                .compare_exchange(current, current + 1, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                break;
            }
        }

        Ok(PoolSlot {
            pool: self.clone(),
            id: self.inner.next_id.fetch_add(1, Ordering::Relaxed),
        })
    }
}

/// One reserved pool entry; released on drop
#[derive(Debug)]
pub(crate) struct PoolSlot {
    pool: OpenFilePool,
    id: u64,
}

impl PoolSlot {
    #[inline]
    pub(crate) fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for PoolSlot {
    fn drop(&mut self) {
        self.pool.inner.live.fetch_sub(1, Ordering::SeqCst);
    }
}
