/*!
 * VFS Traits
 * Collaborator interfaces consumed by the descriptor layer
 */

use std::path::Path;
use std::sync::Arc;

use super::types::*;

/// Path resolution
///
/// Turns a path plus open flags into a file object. Creation, exclusive
/// create and truncation are the resolver's business; the descriptor layer
/// only sees the resulting object.
pub trait FileSystem: Send + Sync {
    /// Resolve `path` to an open file object
    fn resolve(
        &self,
        path: &Path,
        flags: OpenFlags,
        mode: OpenMode,
    ) -> VfsResult<Arc<dyn FileObject>>;

    /// Get filesystem name/type
    fn name(&self) -> &str;

    /// Check if filesystem is read-only
    fn readonly(&self) -> bool {
        false
    }
}

/// Positioned I/O on an opened resource
///
/// Implementations are shared by every OpenFile referencing them and must
/// tolerate concurrent calls. A call either transfers some bytes (possibly
/// fewer than asked) or fails without transferring anything. Dropping the
/// last reference releases the resource.
pub trait FileObject: Send + Sync {
    /// Read up to `buf.len()` bytes starting at `offset`
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> VfsResult<Transfer>;

    /// Write `buf` at `offset`, or at the current end when `append` is set
    fn write_at(&self, offset: u64, buf: &[u8], append: bool) -> VfsResult<Transfer>;

    /// Current size in bytes, used for `SEEK_END`
    fn size(&self) -> VfsResult<u64>;

    /// Whether the seek position is meaningful for this object
    fn is_seekable(&self) -> bool {
        true
    }
}
