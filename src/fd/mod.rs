/*!
 * File Descriptor Layer
 * Open files, the system-wide open file pool and per-process descriptor tables
 */

pub mod open_file;
pub mod pool;
pub mod table;

pub use open_file::OpenFile;
pub use pool::OpenFilePool;
pub use table::{FdTable, FdToken, PinnedFile};
