/*!
 * File Operations Implementation
 * Path resolution and whole-file helpers
 */

use dashmap::mapref::entry::Entry;
use std::path::Path;
use std::sync::Arc;

use super::super::traits::FileObject;
use super::super::types::*;
use super::file_handle::MemFile;
use super::node::Node;
use super::MemFS;

impl MemFS {
    pub(super) fn resolve_impl(
        &self,
        path: &Path,
        flags: OpenFlags,
        mode: OpenMode,
    ) -> VfsResult<Arc<dyn FileObject>> {
        let path = self.normalize(path);
        self.check_name_lengths(&path)?;

        let (node, created) = if flags.create {
            // Parent lookup must happen before the entry lock on `path`
            self.ensure_parent(&path)?;
            match self.nodes.entry(path.clone()) {
                Entry::Occupied(entry) => {
                    if flags.exclusive {
                        return Err(VfsError::AlreadyExists(path.display().to_string()));
                    }
                    (entry.get().clone(), false)
                }
                Entry::Vacant(entry) => {
                    let node = Node::file(Vec::new(), mode.permissions);
                    entry.insert(node.clone());
                    (node, true)
                }
            }
        } else {
            let node = self
                .nodes
                .get(&path)
                .map(|n| n.value().clone())
                .ok_or_else(|| VfsError::NotFound(path.display().to_string()))?;
            (node, false)
        };

        let data = match node {
            Node::Directory { .. } => {
                return Err(VfsError::IsADirectory(path.display().to_string()));
            }
            Node::File {
                data, permissions, ..
            } => {
                // The creating open is granted whatever mode it asked for
                if !created {
                    if flags.is_readable() && !permissions.is_readable() {
                        return Err(VfsError::PermissionDenied(format!(
                            "file is not readable: {}",
                            path.display()
                        )));
                    }
                    if flags.is_writable() && permissions.is_readonly() {
                        return Err(VfsError::PermissionDenied(format!(
                            "file is readonly: {}",
                            path.display()
                        )));
                    }
                }
                data
            }
        };

        if flags.truncate && flags.is_writable() {
            let mut contents = data.write();
            self.release_space(contents.len());
            contents.clear();
        }

        Ok(Arc::new(MemFile::new(self.clone(), data)))
    }

    /// Write entire file contents (create or overwrite)
    pub fn write_file(&self, path: &Path, contents: &[u8]) -> VfsResult<()> {
        let path = self.normalize(path);
        self.check_name_lengths(&path)?;
        self.ensure_parent(&path)?;

        let existing = self.nodes.get(&path).map(|n| n.value().clone());
        match existing {
            Some(Node::Directory { .. }) => {
                Err(VfsError::IsADirectory(path.display().to_string()))
            }
            Some(Node::File { data, .. }) => {
                let mut data = data.write();
                if contents.len() > data.len() {
                    self.check_and_reserve_space(contents.len() - data.len())?;
                } else {
                    self.release_space(data.len() - contents.len());
                }
                data.clear();
                data.extend_from_slice(contents);
                Ok(())
            }
            None => {
                self.check_and_reserve_space(contents.len())?;
                self.nodes
                    .insert(path, Node::file(contents.to_vec(), Permissions::readwrite()));
                Ok(())
            }
        }
    }

    /// Read entire file contents
    pub fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        let path = self.normalize(path);

        match self.nodes.get(&path).map(|n| n.value().clone()) {
            Some(Node::File { data, .. }) => Ok(data.read().clone()),
            Some(Node::Directory { .. }) => {
                Err(VfsError::IsADirectory(path.display().to_string()))
            }
            None => Err(VfsError::NotFound(path.display().to_string())),
        }
    }

    /// Get permissions of a file or directory
    pub fn permissions(&self, path: &Path) -> VfsResult<Permissions> {
        let path = self.normalize(path);
        self.nodes
            .get(&path)
            .map(|n| n.permissions())
            .ok_or_else(|| VfsError::NotFound(path.display().to_string()))
    }

    /// Set file permissions
    pub fn set_permissions(&self, path: &Path, perms: Permissions) -> VfsResult<()> {
        let path = self.normalize(path);

        let mut node = self
            .nodes
            .get_mut(&path)
            .ok_or_else(|| VfsError::NotFound(path.display().to_string()))?;

        match node.value_mut() {
            Node::File { permissions, .. } | Node::Directory { permissions, .. } => {
                *permissions = perms;
            }
        }
        Ok(())
    }
}
