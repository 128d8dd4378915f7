/*!
 * Process Types
 * A process as seen by the descriptor layer: a pid and its file table
 */

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::config::TableConfig;
use crate::core::{FsResult, Pid};
use crate::fd::{FdTable, OpenFilePool};
use crate::vfs::FileObject;

/// Process owning one descriptor table
///
/// Tables are never shared between processes. `fork` copies the table
/// (sharing the open files), and `exit` or drop closes every descriptor.
#[derive(Debug)]
pub struct Process {
    pid: Pid,
    files: FdTable,
}

/// Serializable process snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessInfo {
    pub pid: Pid,
    pub open_files: usize,
    pub max_files: usize,
}

impl Process {
    /// Process with an empty table
    pub fn new(pid: Pid, config: TableConfig) -> Self {
        info!(pid, capacity = config.capacity, "process created");
        Self {
            pid,
            files: FdTable::new(pid, config),
        }
    }

    /// Process whose standard streams are bound to `console`
    pub fn with_stdio(
        pid: Pid,
        config: TableConfig,
        pool: &OpenFilePool,
        console: Arc<dyn FileObject>,
    ) -> FsResult<Self> {
        let files = FdTable::with_stdio(pid, config, pool, console)?;
        info!(pid, capacity = config.capacity, "process created with stdio");
        Ok(Self { pid, files })
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    #[inline]
    pub fn files(&self) -> &FdTable {
        &self.files
    }

    pub fn info(&self) -> ProcessInfo {
        ProcessInfo {
            pid: self.pid,
            open_files: self.files.len(),
            max_files: self.files.capacity(),
        }
    }

    /// Create a child holding a copy of this process's table
    pub fn fork(&self, child: Pid) -> Process {
        let files = self.files.fork_copy(child);
        info!(parent = self.pid, child, open_files = files.len(), "process forked");
        Process { pid: child, files }
    }

    /// Tear the process down, returning how many descriptors were closed
    pub fn exit(self) -> usize {
        let closed = self.files.close_all();
        info!(pid = self.pid, closed, "process exited");
        closed
    }
}
