/*!
 * Filesystem Node Types
 * Internal representation of files and directories
 */

use parking_lot::RwLock;
use std::sync::Arc;

use super::super::types::Permissions;

/// In-memory filesystem node
///
/// File contents live behind their own lock so open file objects can do
/// I/O without touching the node map.
#[derive(Debug, Clone)]
pub(in crate::vfs) enum Node {
    File {
        data: Arc<RwLock<Vec<u8>>>,
        permissions: Permissions,
    },
    Directory {
        permissions: Permissions,
    },
}

impl Node {
    pub fn file(data: Vec<u8>, permissions: Permissions) -> Self {
        Node::File {
            data: Arc::new(RwLock::new(data)),
            permissions,
        }
    }

    pub fn directory(permissions: Permissions) -> Self {
        Node::Directory {
            permissions,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Directory { .. })
    }

    pub fn permissions(&self) -> Permissions {
        match self {
            Node::File { permissions, .. } => *permissions,
            Node::Directory { permissions, .. } => *permissions,
        }
    }
}
