//! Staging area
//!
//! The index is the flat table of files that make up the next commit. It is
//! independent of the last commit's tree until `commit` snapshots it.
//!
//! ## Index File Format
//!
//! The file is zlib-compressed text, one row per staged file, sorted by path:
//!
//! ```text
//! <path> <hash> <size> <mode> <mtime>
//! ```
//!
//! An empty file is an empty index.
//!
//! ## Data Structures
//!
//! - `entries`: staged files keyed by path
//! - `children`: directory paths mapped to the staged files below them, so a
//!   file replacing a directory (or the reverse) evicts the stale rows

use crate::areas::database::{compress, decompress};
use crate::artifacts::index::index_entry::IndexEntry;
use crate::errors::VcsError;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (`.vcs/index`)
    path: Box<Path>,
    entries: BTreeMap<PathBuf, IndexEntry>,
    children: BTreeMap<PathBuf, BTreeSet<PathBuf>>,
    /// Set when entries changed since the last load or write
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            children: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry_by_path(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.children.clear();
        self.changed = false;
    }

    /// Load the index from disk under a shared lock.
    ///
    /// A missing index file is created empty.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.clear();

        if !self.path.exists() {
            File::create(&self.path).map_err(|source| {
                VcsError::runtime(format!("unable to create {}", self.path.display()), source)
            })?;
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new()
            .read(true)
            .open(&self.path)
            .map_err(|source| {
                VcsError::runtime(format!("unable to open {}", self.path.display()), source)
            })?;
        let lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        let mut content = Vec::new();
        let mut file: &File = &lock;
        file.read_to_end(&mut content).map_err(|source| {
            VcsError::runtime(format!("unable to read {}", self.path.display()), source)
        })?;

        if content.is_empty() {
            return Ok(());
        }

        let text = decompress(content.into())
            .map_err(|_| VcsError::corrupt("index", "cannot inflate index file"))?;
        self.load_text(&String::from_utf8_lossy(&text))?;
        self.changed = false;

        debug!(entries = self.entries.len(), "index loaded");
        Ok(())
    }

    /// Replace every entry with the rows of a decoded index.
    pub fn load_text(&mut self, text: &str) -> Result<(), VcsError> {
        let entries = text
            .lines()
            .filter(|row| !row.trim().is_empty())
            .map(IndexEntry::parse_row)
            .collect::<Result<Vec<_>, _>>()?;

        self.replace_all(entries);
        Ok(())
    }

    /// The decoded index: one row per entry, sorted by path.
    pub fn to_text(&self) -> String {
        self.entries
            .values()
            .map(|entry| format!("{}\n", entry.to_row()))
            .collect()
    }

    /// Swap the whole index for `entries`.
    pub fn replace_all(&mut self, entries: impl IntoIterator<Item = IndexEntry>) {
        self.entries.clear();
        self.children.clear();

        for entry in entries {
            self.store_entry(entry);
        }
        self.changed = true;
    }

    fn discard_conflicts(&mut self, entry: &IndexEntry) {
        let parents = entry
            .parent_dirs()
            .into_iter()
            .map(Path::to_path_buf)
            .collect::<Vec<_>>();

        for parent in parents {
            self.remove_entry(&parent);
        }
        self.remove_children(&entry.name);
    }

    fn store_entry(&mut self, entry: IndexEntry) {
        for parent in entry.parent_dirs() {
            self.children
                .entry(parent.to_path_buf())
                .or_default()
                .insert(entry.name.clone());
        }

        self.entries.insert(entry.name.clone(), entry);
    }

    fn remove_children(&mut self, path: &Path) {
        if let Some(children) = self.children.remove(path) {
            for child in children {
                self.remove_entry(&child);
            }
        }
    }

    fn remove_entry(&mut self, path: &Path) {
        let Some(entry) = self.entries.remove(path) else {
            return;
        };

        for parent in entry.parent_dirs() {
            if let Some(children) = self.children.get_mut(parent) {
                children.remove(path);
                if children.is_empty() {
                    self.children.remove(parent);
                }
            }
        }
    }

    pub fn add(&mut self, entry: IndexEntry) {
        self.discard_conflicts(&entry);
        self.store_entry(entry);
        self.changed = true;
    }

    /// Unstage a file, or every file below a directory.
    pub fn remove(&mut self, path: &Path) {
        self.remove_entry(path);
        self.remove_children(path);
        self.changed = true;
    }

    /// Persist the index under an exclusive lock.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|source| {
                VcsError::runtime(format!("unable to open {}", self.path.display()), source)
            })?;
        let lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)?;

        let content = compress(Bytes::from(self.to_text()))?;
        let mut file: &File = &lock;
        file.write_all(&content).map_err(|source| {
            VcsError::runtime(format!("unable to write {}", self.path.display()), source)
        })?;

        self.changed = false;
        debug!(entries = self.entries.len(), "index written");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::index::entry_mode::{EntryMode, FileMode};
    use crate::artifacts::index::index_entry::EntryMetadata;
    use crate::artifacts::objects::object_id::ObjectId;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    fn entry(path: &str) -> IndexEntry {
        IndexEntry::new(
            PathBuf::from(path),
            ObjectId::try_parse("e".repeat(40)).unwrap(),
            EntryMetadata::new(1, EntryMode::File(FileMode::Regular), 100),
        )
    }

    fn names(index: &Index) -> Vec<String> {
        index
            .entries()
            .map(|entry| entry.name.display().to_string())
            .collect()
    }

    #[fixture]
    fn index() -> (TempDir, Index) {
        let dir = TempDir::new().unwrap();
        let index = Index::new(dir.path().join("index").into_boxed_path());
        (dir, index)
    }

    #[rstest]
    fn written_index_reloads_sorted(index: (TempDir, Index)) {
        let (_dir, mut index) = index;
        index.add(entry("z.txt"));
        index.add(entry("a/b.txt"));
        index.write_updates().unwrap();

        let mut reloaded = Index::new(index.path().into());
        reloaded.rehydrate().unwrap();

        assert_eq!(names(&reloaded), vec!["a/b.txt", "z.txt"]);
        assert!(!reloaded.is_changed());
    }

    #[rstest]
    fn missing_index_file_is_created_empty(index: (TempDir, Index)) {
        let (_dir, mut index) = index;

        index.rehydrate().unwrap();

        assert!(index.is_empty());
        assert!(index.path().exists());
    }

    #[rstest]
    fn file_replaces_directory_with_children(index: (TempDir, Index)) {
        let (_dir, mut index) = index;
        index.add(entry("nested/one.txt"));
        index.add(entry("nested/deeper/two.txt"));

        index.add(entry("nested"));

        assert_eq!(names(&index), vec!["nested"]);
        assert!(index.children.is_empty());
    }

    #[rstest]
    fn directory_replaces_file(index: (TempDir, Index)) {
        let (_dir, mut index) = index;
        index.add(entry("alice.txt"));
        index.add(entry("bob.txt"));

        index.add(entry("alice.txt/nested.txt"));

        assert_eq!(names(&index), vec!["alice.txt/nested.txt", "bob.txt"]);
    }

    #[test]
    fn short_rows_take_default_fields() {
        let mut index = Index::new(PathBuf::from("unused").into_boxed_path());

        index
            .load_text(&format!("docs/readme.md {}\n\n", "1".repeat(40)))
            .unwrap();

        let loaded = index.entry_by_path(Path::new("docs/readme.md")).unwrap();
        assert_eq!(loaded.metadata, EntryMetadata::default());
    }

    #[test]
    fn rows_without_hash_are_corrupt() {
        let mut index = Index::new(PathBuf::from("unused").into_boxed_path());

        assert!(matches!(
            index.load_text("lonely-path\n"),
            Err(VcsError::Corrupt { .. })
        ));
    }
}
