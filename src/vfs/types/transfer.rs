/*!
 * Transfer Result
 * Outcome of a positioned read or write on a file object
 */

use serde::{Deserialize, Serialize};

/// Bytes moved by one `read_at`/`write_at` call and the position after it
///
/// `bytes` may be shorter than requested; `0` on a read means end of object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub bytes: usize,
    pub offset: u64,
}

impl Transfer {
    #[inline]
    #[must_use]
    pub const fn new(bytes: usize, offset: u64) -> Self {
        Self { bytes, offset }
    }

    /// A transfer that moved nothing and left the position at `offset`
    #[inline]
    #[must_use]
    pub const fn empty(offset: u64) -> Self {
        Self { bytes: 0, offset }
    }
}
