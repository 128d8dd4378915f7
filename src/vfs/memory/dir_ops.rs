/*!
 * Directory Operations Implementation
 */

use std::path::{Path, PathBuf};

use super::super::types::*;
use super::node::Node;
use super::MemFS;

impl MemFS {
    /// Create directory (including parents)
    pub fn create_dir(&self, path: &Path) -> VfsResult<()> {
        let path = self.normalize(path);
        self.check_name_lengths(&path)?;

        let mut current = PathBuf::from("/");
        for component in path.components().skip(1) {
            current.push(component);

            if let Some(node) = self.nodes.get(&current) {
                if !node.is_dir() {
                    return Err(VfsError::NotADirectory(current.display().to_string()));
                }
                continue;
            }

            self.nodes
                .entry(current.clone())
                .or_insert_with(|| Node::directory(Permissions::new(0o755)));
        }

        Ok(())
    }

    /// Check if file/directory exists
    pub fn exists(&self, path: &Path) -> bool {
        let path = self.normalize(path);
        self.nodes.contains_key(&path)
    }
}
