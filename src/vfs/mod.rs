/*!
 * Virtual File System Module
 * Path resolution and file object interfaces consumed by the descriptor layer
 */

pub mod console;
#[cfg(unix)]
pub mod local;
pub mod memory;
pub mod traits;
pub mod types;

// Re-exports
pub use console::Console;
#[cfg(unix)]
pub use local::LocalFS;
pub use memory::MemFS;
pub use traits::{FileObject, FileSystem};
pub use types::{
    AccessMode, OpenFlags, OpenMode, Permissions, Transfer, VfsError, VfsResult,
};
