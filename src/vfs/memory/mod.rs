/*!
 * In-Memory Filesystem Backend
 * Fast, volatile filesystem for testing and temporary storage
 */

mod dir_ops;
mod file_handle;
mod file_ops;
mod node;

use ahash::RandomState;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::traits::{FileObject, FileSystem};
use super::types::*;
use node::Node;

/// Longest single path component, in bytes
pub const NAME_MAX: usize = 255;

/// In-memory filesystem implementation
///
/// Clones share the same tree, size accounting and handle counter.
///
/// # Performance
/// - Cache-line aligned to prevent false sharing of the atomic size counter
#[repr(C, align(64))]
#[derive(Debug, Clone)]
pub struct MemFS {
    pub(super) nodes: Arc<DashMap<PathBuf, Node, RandomState>>,
    pub(super) max_size: Option<usize>,
    pub(super) current_size: Arc<AtomicUsize>,
    pub(super) open_handles: Arc<AtomicUsize>,
}

impl MemFS {
    /// Create new in-memory filesystem
    pub fn new() -> Self {
        let nodes = DashMap::with_hasher(RandomState::new());

        // Create root directory
        nodes.insert(PathBuf::from("/"), Node::directory(Permissions::new(0o755)));

        Self {
            nodes: Arc::new(nodes),
            max_size: None,
            current_size: Arc::new(AtomicUsize::new(0)),
            open_handles: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create with size limit
    pub fn with_capacity(max_size: usize) -> Self {
        let mut fs = Self::new();
        fs.max_size = Some(max_size);
        fs
    }

    /// File objects handed out by `resolve` and not yet dropped
    #[inline]
    pub fn open_handles(&self) -> usize {
        self.open_handles.load(Ordering::SeqCst)
    }

    /// Bytes currently stored across all files
    #[inline]
    pub fn used_bytes(&self) -> usize {
        self.current_size.load(Ordering::SeqCst)
    }

    /// Normalize path (make absolute and clean)
    pub(super) fn normalize(&self, path: &Path) -> PathBuf {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            Path::new("/").join(path)
        };

        PathBuf::from(path_clean::clean(&path))
    }

    /// Reject paths with an over-long component
    pub(super) fn check_name_lengths(&self, path: &Path) -> VfsResult<()> {
        for component in path.components() {
            let len = component.as_os_str().len();
            if len > NAME_MAX {
                return Err(VfsError::NameTooLong(len));
            }
        }
        Ok(())
    }

    /// Check if space is available and reserve it atomically
    pub(super) fn check_and_reserve_space(&self, additional: usize) -> VfsResult<()> {
        match self.max_size {
            Some(max) => loop {
                let current = self.current_size.load(Ordering::SeqCst);
                let wanted = current
                    .checked_add(additional)
                    .filter(|&wanted| wanted <= max)
                    .ok_or(VfsError::OutOfSpace)?;
                if self
                    .current_size
                    .compare_exchange(current, wanted, Ordering::SeqCst, Ordering::SeqCst)
                    .is_ok()
                {
                    return Ok(());
                }
            },
            None => {
                self.current_size
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                        current.checked_add(additional)
                    })
                    .map_err(|_| VfsError::OutOfSpace)?;
                Ok(())
            }
        }
    }

    /// Return space to the pool (truncate, overwrite with shorter data)
    pub(super) fn release_space(&self, amount: usize) {
        self.current_size.fetch_sub(amount, Ordering::SeqCst);
    }

    /// Ensure parent directory exists
    pub(super) fn ensure_parent(&self, path: &Path) -> VfsResult<()> {
        let Some(parent) = path.parent() else {
            return Ok(());
        };

        match self.nodes.get(parent) {
            Some(node) if node.is_dir() => Ok(()),
            Some(_) => Err(VfsError::NotADirectory(parent.display().to_string())),
            None => Err(VfsError::NotFound(format!(
                "parent directory not found: {}",
                parent.display()
            ))),
        }
    }
}

impl Default for MemFS {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MemFS {
    fn resolve(
        &self,
        path: &Path,
        flags: OpenFlags,
        mode: OpenMode,
    ) -> VfsResult<Arc<dyn FileObject>> {
        self.resolve_impl(path, flags, mode)
    }

    fn name(&self) -> &str {
        "memfs"
    }
}
