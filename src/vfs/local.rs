/*!
 * Local Filesystem Backend
 * Wraps std::fs for host filesystem access
 */

use std::fs;
use std::os::unix::fs::{FileExt, PermissionsExt};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use super::traits::{FileObject, FileSystem};
use super::types::*;

/// Local filesystem implementation using std::fs, confined to `root`
#[derive(Debug, Clone)]
pub struct LocalFS {
    root: PathBuf,
    readonly: bool,
}

impl LocalFS {
    /// Create new local filesystem rooted at specified path
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            readonly: false,
        }
    }

    /// Create read-only local filesystem
    pub fn readonly<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            readonly: true,
        }
    }

    /// Resolve path relative to root
    ///
    /// `..` never climbs above the root; `.` and prefixes are dropped.
    fn resolve_path(&self, path: &Path) -> PathBuf {
        let mut components = Vec::with_capacity(8);

        for component in path.components() {
            match component {
                Component::Normal(name) => components.push(name),
                Component::ParentDir => {
                    components.pop();
                }
                _ => {}
            }
        }

        let mut result = self.root.clone();
        for component in components {
            result.push(component);
        }
        result
    }

    /// Map std I/O errors to VFS errors
    fn io_error(e: std::io::Error, context: impl Into<String>) -> VfsError {
        use std::io::ErrorKind;
        match e.kind() {
            ErrorKind::NotFound => VfsError::NotFound(context.into()),
            ErrorKind::PermissionDenied => VfsError::PermissionDenied(context.into()),
            ErrorKind::AlreadyExists => VfsError::AlreadyExists(context.into()),
            _ => VfsError::IoError(format!("{}: {}", context.into(), e)),
        }
    }
}

impl FileSystem for LocalFS {
    fn resolve(
        &self,
        path: &Path,
        flags: OpenFlags,
        mode: OpenMode,
    ) -> VfsResult<Arc<dyn FileObject>> {
        if (flags.is_writable() || flags.create || flags.truncate) && self.readonly {
            return Err(VfsError::ReadOnly);
        }

        let full_path = self.resolve_path(path);
        if full_path.is_dir() {
            return Err(VfsError::IsADirectory(path.display().to_string()));
        }
        let existed = full_path.exists();

        let mut options = fs::OpenOptions::new();
        options.read(flags.is_readable());
        options.write(flags.is_writable());
        options.truncate(flags.truncate && flags.is_writable());

        if flags.exclusive {
            options.create_new(true);
        } else {
            options.create(flags.create);
        }
        // std refuses create without write; the creating open needs a writable handle
        if flags.create && !flags.is_writable() && !existed {
            options.write(true);
        }

        let file = options
            .open(&full_path)
            .map_err(|e| Self::io_error(e, format!("open {}", path.display())))?;

        if flags.create && !existed {
            let perms = fs::Permissions::from_mode(mode.permissions.mode);
            fs::set_permissions(&full_path, perms)
                .map_err(|e| Self::io_error(e, format!("chmod {}", path.display())))?;
        }

        Ok(Arc::new(LocalFile { file }))
    }

    fn name(&self) -> &str {
        "local"
    }

    fn readonly(&self) -> bool {
        self.readonly
    }
}

/// Local file object
struct LocalFile {
    file: fs::File,
}

impl FileObject for LocalFile {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> VfsResult<Transfer> {
        let n = FileExt::read_at(&self.file, buf, offset)
            .map_err(|e| LocalFS::io_error(e, "read"))?;
        Ok(Transfer::new(n, offset + n as u64))
    }

    fn write_at(&self, offset: u64, buf: &[u8], append: bool) -> VfsResult<Transfer> {
        let position = if append { self.size()? } else { offset };
        let n = FileExt::write_at(&self.file, buf, position)
            .map_err(|e| LocalFS::io_error(e, "write"))?;
        Ok(Transfer::new(n, position + n as u64))
    }

    fn size(&self) -> VfsResult<u64> {
        self.file
            .metadata()
            .map(|m| m.len())
            .map_err(|e| LocalFS::io_error(e, "metadata"))
    }
}
