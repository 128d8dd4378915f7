/*!
 * VFS Types
 * Shared types for filesystem operations
 */

mod errors;
mod open_flags;
mod permissions;
mod transfer;

pub use errors::{VfsError, VfsResult};
pub use open_flags::{
    AccessMode, OpenFlags, OpenMode, O_ACCMODE, O_ALLFLAGS, O_APPEND, O_CREAT, O_EXCL, O_NOCTTY,
    O_RDONLY, O_RDWR, O_TRUNC, O_WRONLY,
};
pub use permissions::Permissions;
pub use transfer::Transfer;
