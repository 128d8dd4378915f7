/*!
 * File Descriptor Table
 * Fixed-capacity per-process mapping from descriptors to open files
 */

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;
use tracing::debug;

use super::open_file::OpenFile;
use super::pool::OpenFilePool;
use crate::config::TableConfig;
use crate::core::limits::{STDERR_FD, STDIN_FD, STDOUT_FD};
use crate::core::{Fd, FsError, FsResult, Pid};
use crate::vfs::{AccessMode, FileObject};

#[derive(Debug, Default, Clone)]
struct Slot {
    generation: u64,
    file: Option<Arc<OpenFile>>,
}

/// Per-process descriptor table
///
/// One mutex guards every slot. It is held only for scan-and-install,
/// swaps and the reference clone done by [`FdTable::get`]; I/O runs
/// outside it on a [`PinnedFile`].
///
/// Dropping the table closes every occupied slot.
#[derive(Debug)]
pub struct FdTable {
    owner: Pid,
    capacity: usize,
    reserved: usize,
    slots: Mutex<Box<[Slot]>>,
}

/// Generation-stamped descriptor
///
/// Remains valid only while the slot keeps the occupant it had when the
/// token was taken; a close (and any reuse of the number) invalidates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FdToken {
    pub fd: Fd,
    pub generation: u64,
}

/// Open file pinned by a descriptor lookup
///
/// Holds its own reference, so a concurrent close cannot destroy the
/// file while I/O is in flight. Dropping the pin releases it.
#[derive(Debug)]
pub struct PinnedFile {
    fd: Fd,
    generation: u64,
    file: Arc<OpenFile>,
}

impl PinnedFile {
    #[inline]
    pub fn fd(&self) -> Fd {
        self.fd
    }

    /// Token naming the slot occupant this pin was taken from
    #[inline]
    pub fn token(&self) -> FdToken {
        FdToken {
            fd: self.fd,
            generation: self.generation,
        }
    }

    #[inline]
    pub fn file(&self) -> &Arc<OpenFile> {
        &self.file
    }

    /// Release the pin
    #[inline]
    pub fn release(self) {}
}

impl Deref for PinnedFile {
    type Target = OpenFile;

    fn deref(&self) -> &OpenFile {
        &self.file
    }
}

impl FdTable {
    /// Create an empty table for `owner`
    pub fn new(owner: Pid, config: TableConfig) -> Self {
        Self {
            owner,
            capacity: config.capacity,
            reserved: config.reserved.min(config.capacity),
            slots: Mutex::new(vec![Slot::default(); config.capacity].into_boxed_slice()),
        }
    }

    /// Create a table with stdin, stdout and stderr bound to `console`
    pub fn with_stdio(
        owner: Pid,
        config: TableConfig,
        pool: &OpenFilePool,
        console: Arc<dyn FileObject>,
    ) -> FsResult<Self> {
        let table = Self::new(owner, config);

        let streams = [
            (STDIN_FD, AccessMode::ReadOnly),
            (STDOUT_FD, AccessMode::WriteOnly),
            (STDERR_FD, AccessMode::WriteOnly),
        ];
        for (fd, mode) in streams {
            let file = OpenFile::create(pool, Arc::clone(&console), mode, false)?;
            table.place_at(fd, file)?;
        }

        Ok(table)
    }

    #[inline]
    pub fn owner(&self) -> Pid {
        self.owner
    }

    /// Total number of slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lowest descriptor `place` may hand out
    #[inline]
    pub fn reserved(&self) -> usize {
        self.reserved
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.lock().iter().filter(|s| s.file.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `fd` names a slot in this table
    #[inline]
    pub fn in_range(&self, fd: Fd) -> bool {
        (fd as usize) < self.capacity
    }

    /// Whether `fd` currently holds an open file
    pub fn is_open(&self, fd: Fd) -> bool {
        self.slots
            .lock()
            .get(fd as usize)
            .is_some_and(|s| s.file.is_some())
    }

    /// Install `file` in the lowest free slot at or above the reservation
    ///
    /// On failure the file is dropped, releasing the caller's reference.
    pub fn place(&self, file: Arc<OpenFile>) -> FsResult<Fd> {
        let mut slots = self.slots.lock();

        let Some(index) = (self.reserved..slots.len()).find(|&i| slots[i].file.is_none()) else {
            debug!(pid = self.owner, file_id = file.id(), "descriptor table full");
            return Err(FsError::TooManyOpenFiles);
        };

        let slot = &mut slots[index];
        slot.generation += 1;
        debug!(pid = self.owner, fd = index, file_id = file.id(), "descriptor placed");
        slot.file = Some(file);

        Ok(index as Fd)
    }

    /// Install `file` at a specific descriptor, closing any previous occupant
    pub fn place_at(&self, fd: Fd, file: Arc<OpenFile>) -> FsResult<()> {
        if let Some(previous) = self.replace_at(fd, Some(file))? {
            previous.decrement_ref();
        }
        Ok(())
    }

    /// Look up and pin the open file behind `fd`
    pub fn get(&self, fd: Fd) -> FsResult<PinnedFile> {
        let slots = self.slots.lock();
        let slot = slots.get(fd as usize).ok_or(FsError::BadDescriptor(fd))?;
        let file = slot.file.as_ref().ok_or(FsError::BadDescriptor(fd))?;

        Ok(PinnedFile {
            fd,
            generation: slot.generation,
            file: Arc::clone(file),
        })
    }

    /// Counterpart of [`FdTable::get`]
    #[inline]
    pub fn release(&self, pinned: PinnedFile) {
        pinned.release();
    }

    /// Generation-stamped token for the current occupant of `fd`
    pub fn token(&self, fd: Fd) -> FsResult<FdToken> {
        self.get(fd).map(|pinned| pinned.token())
    }

    /// Pin through a token; stale tokens fail with `BadDescriptor`
    pub fn get_by_token(&self, token: FdToken) -> FsResult<PinnedFile> {
        let pinned = self.get(token.fd)?;
        if pinned.generation != token.generation {
            return Err(FsError::BadDescriptor(token.fd));
        }
        Ok(pinned)
    }

    /// Swap the contents of slot `fd`, returning the previous occupant
    ///
    /// The caller owns exactly one decrement of the returned file.
    pub fn replace_at(
        &self,
        fd: Fd,
        file: Option<Arc<OpenFile>>,
    ) -> FsResult<Option<Arc<OpenFile>>> {
        let mut slots = self.slots.lock();
        let slot = slots
            .get_mut(fd as usize)
            .ok_or(FsError::BadDescriptor(fd))?;

        let previous = std::mem::replace(&mut slot.file, file);
        if previous.is_some() || slot.file.is_some() {
            slot.generation += 1;
        }
        Ok(previous)
    }

    /// Copy the table for a child process
    ///
    /// Slots are copied, not shared: each copied occupant gains one
    /// reference and the child keeps the same descriptor numbers.
    pub fn fork_copy(&self, child: Pid) -> FdTable {
        let slots = self.slots.lock();
        let copied: Box<[Slot]> = slots
            .iter()
            .map(|slot| Slot {
                generation: 0,
                file: slot.file.as_ref().map(|f| f.increment_ref()),
            })
            .collect();

        debug!(parent = self.owner, child, "descriptor table copied");
        FdTable {
            owner: child,
            capacity: self.capacity,
            reserved: self.reserved,
            slots: Mutex::new(copied),
        }
    }

    /// Empty every slot, dropping one reference per occupant
    ///
    /// Returns how many descriptors were closed. References are dropped
    /// after the table lock is released.
    pub fn close_all(&self) -> usize {
        let closed: Vec<Arc<OpenFile>> = {
            let mut slots = self.slots.lock();
            slots
                .iter_mut()
                .filter_map(|slot| {
                    let file = slot.file.take();
                    if file.is_some() {
                        slot.generation += 1;
                    }
                    file
                })
                .collect()
        };

        let count = closed.len();
        let destroyed = closed
            .into_iter()
            .map(OpenFile::decrement_ref)
            .filter(|&destroyed| destroyed)
            .count();
        if count > 0 {
            debug!(pid = self.owner, closed = count, destroyed, "descriptor table cleared");
        }
        count
    }
}

impl Drop for FdTable {
    fn drop(&mut self) {
        self.close_all();
    }
}
