//! Working tree access
//!
//! Every path handed in or out of the workspace is relative to the
//! repository root. Ignored paths (see [`IgnoreList`]) are invisible to
//! listing and survive cleaning.

use crate::artifacts::core::ignore::IgnoreList;
use crate::artifacts::index::index_entry::{EntryMetadata, IndexEntry};
use crate::artifacts::objects::blob::Blob;
use crate::errors::VcsError;
use bytes::Bytes;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every non-ignored file (or symlink) in the working tree, sorted.
    pub fn list_files(&self, ignore: &IgnoreList) -> anyhow::Result<Vec<PathBuf>> {
        self.list_files_under(Path::new(""), ignore)
    }

    /// Non-ignored files at or below `start`, sorted.
    pub fn list_files_under(
        &self,
        start: &Path,
        ignore: &IgnoreList,
    ) -> anyhow::Result<Vec<PathBuf>> {
        let root = self.path.join(start);
        let mut files = Vec::new();

        let walker = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| match self.relative(entry.path()) {
                Some(relative) if !relative.as_os_str().is_empty() => {
                    !ignore.is_path_ignored(&relative, entry.file_type().is_dir())
                }
                _ => true,
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    warn!(%error, "skipping unreadable path");
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            if let Some(relative) = self.relative(entry.path()) {
                files.push(relative);
            }
        }

        files.sort();
        Ok(files)
    }

    fn relative(&self, path: &Path) -> Option<PathBuf> {
        path.strip_prefix(self.path.as_ref())
            .ok()
            .map(Path::to_path_buf)
    }

    /// Turn a user supplied path into a repository-relative one.
    ///
    /// The path must be relative, stay inside the working tree and exist.
    /// `.` stands for the whole tree and maps to the empty path.
    pub fn resolve_user_path(&self, input: &Path) -> Result<PathBuf, VcsError> {
        if input.is_absolute() {
            return Err(VcsError::validation(format!(
                "path must be relative to the repository root: {}",
                input.display()
            )));
        }

        let mut resolved = PathBuf::new();
        for component in input.components() {
            match component {
                Component::CurDir => {}
                Component::Normal(part) => resolved.push(part),
                Component::ParentDir => {
                    if !resolved.pop() {
                        return Err(VcsError::validation(format!(
                            "path is outside the repository: {}",
                            input.display()
                        )));
                    }
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(VcsError::validation(format!(
                        "path must be relative to the repository root: {}",
                        input.display()
                    )));
                }
            }
        }

        if std::fs::symlink_metadata(self.path.join(&resolved)).is_err() {
            return Err(VcsError::validation(format!(
                "pathspec '{}' did not match any files",
                input.display()
            )));
        }

        Ok(resolved)
    }

    pub fn exists(&self, file_path: &Path) -> bool {
        std::fs::symlink_metadata(self.path.join(file_path)).is_ok()
    }

    pub fn is_dir(&self, file_path: &Path) -> bool {
        std::fs::symlink_metadata(self.path.join(file_path))
            .map(|metadata| metadata.is_dir())
            .unwrap_or(false)
    }

    /// File content; for a symlink, the link target.
    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let path = self.path.join(file_path);
        let io_error =
            |source| VcsError::runtime(format!("unable to read {}", file_path.display()), source);

        let metadata = std::fs::symlink_metadata(&path).map_err(io_error)?;
        if metadata.file_type().is_symlink() {
            let target = std::fs::read_link(&path).map_err(io_error)?;
            return Ok(Bytes::from(target.to_string_lossy().into_owned()));
        }

        Ok(std::fs::read(&path).map_err(io_error)?.into())
    }

    pub fn parse_blob(&self, file_path: &Path) -> anyhow::Result<Blob> {
        Ok(Blob::new(self.read_file(file_path)?))
    }

    pub fn stat_file(&self, file_path: &Path) -> anyhow::Result<EntryMetadata> {
        let path = self.path.join(file_path);
        let metadata = std::fs::symlink_metadata(&path).map_err(|source| {
            VcsError::runtime(format!("unable to stat {}", file_path.display()), source)
        })?;

        (path.as_path(), metadata).try_into()
    }

    /// Delete every non-ignored entry of the working tree.
    pub fn clean(&self, ignore: &IgnoreList) -> anyhow::Result<()> {
        self.clean_dir(&self.path, ignore)?;
        debug!("working tree cleaned");

        Ok(())
    }

    fn clean_dir(&self, dir: &Path, ignore: &IgnoreList) -> anyhow::Result<bool> {
        let io_error =
            |source| VcsError::runtime(format!("unable to clean {}", dir.display()), source);
        let mut emptied = true;

        for child in std::fs::read_dir(dir).map_err(io_error)? {
            let child = child.map_err(io_error)?;
            let path = child.path();
            let file_type = child.file_type().map_err(io_error)?;
            let Some(relative) = self.relative(&path) else {
                continue;
            };

            if ignore.is_path_ignored(&relative, file_type.is_dir()) {
                emptied = false;
                continue;
            }

            if file_type.is_dir() {
                if self.clean_dir(&path, ignore)? {
                    std::fs::remove_dir(&path).map_err(io_error)?;
                } else {
                    emptied = false;
                }
            } else {
                std::fs::remove_file(&path).map_err(io_error)?;
            }
        }

        Ok(emptied)
    }

    /// Materialize an index entry with the given content.
    ///
    /// Anything in the way is removed first, including files standing where
    /// a parent directory has to go.
    pub fn write_entry(&self, entry: &IndexEntry, content: &[u8]) -> anyhow::Result<()> {
        let path = self.path.join(&entry.name);
        let io_error = |source| {
            VcsError::runtime(format!("unable to write {}", entry.name.display()), source)
        };

        for parent in entry.parent_dirs() {
            let parent = self.path.join(parent);
            if std::fs::symlink_metadata(&parent).is_ok_and(|metadata| !metadata.is_dir()) {
                std::fs::remove_file(&parent).map_err(io_error)?;
            }
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        if let Ok(metadata) = std::fs::symlink_metadata(&path) {
            if metadata.is_dir() {
                std::fs::remove_dir_all(&path).map_err(io_error)?;
            } else {
                std::fs::remove_file(&path).map_err(io_error)?;
            }
        }

        if entry.metadata.mode.is_symlink() {
            #[cfg(unix)]
            {
                let target = PathBuf::from(String::from_utf8_lossy(content).into_owned());
                std::os::unix::fs::symlink(target, &path).map_err(io_error)?;
                return Ok(());
            }
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(io_error)?;
        file.write_all(content).map_err(io_error)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(entry.metadata.mode.permissions());
            std::fs::set_permissions(&path, permissions).map_err(io_error)?;
        }

        Ok(())
    }

    /// Overwrite a file's content, keeping its permissions.
    pub fn write_text(&self, file_path: &Path, content: &str) -> anyhow::Result<()> {
        let path = self.path.join(file_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| {
                VcsError::runtime(format!("unable to create {}", parent.display()), source)
            })?;
        }

        std::fs::write(&path, content).map_err(|source| {
            VcsError::runtime(format!("unable to write {}", file_path.display()), source)
        })?;

        Ok(())
    }
}
