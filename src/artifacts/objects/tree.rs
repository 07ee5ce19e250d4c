//! Tree object
//!
//! Trees are directory snapshots. Each child contributes one row:
//!
//! ```text
//! <mode> <type> <hash> <mtime> <size> <name>
//! ```
//!
//! Every row is preceded by a newline, so a decompressed tree reads
//! `tree <len>\0\n<row>\n<row>...`. Children are ordered by name, which
//! makes the hash a pure function of the staged content.
//!
//! ## Tree Building
//!
//! A tree is built from flat index entries by walking each path and
//! creating intermediate directories on the way. Directories report the
//! newest mtime and the total size of everything below them. Trees read
//! back from the database only keep their rows, since child trees are
//! loaded on demand.

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

#[derive(Debug, Clone)]
enum TreeEntry {
    File(IndexEntry),
    Directory(Tree),
}

impl TreeEntry {
    fn to_database_entry(&self) -> anyhow::Result<DatabaseEntry> {
        match self {
            TreeEntry::File(entry) => Ok(DatabaseEntry::new(
                entry.oid.clone(),
                entry.metadata.mode,
                entry.metadata.mtime,
                entry.metadata.size,
            )),
            TreeEntry::Directory(tree) => Ok(DatabaseEntry::new(
                tree.object_id()?,
                EntryMode::Directory,
                tree.mtime(),
                tree.size(),
            )),
        }
    }

    fn mtime(&self) -> i64 {
        match self {
            TreeEntry::File(entry) => entry.metadata.mtime,
            TreeEntry::Directory(tree) => tree.mtime(),
        }
    }

    fn size(&self) -> u64 {
        match self {
            TreeEntry::File(entry) => entry.metadata.size,
            TreeEntry::Directory(tree) => tree.size(),
        }
    }
}

/// Tree object, either under construction or read back from storage.
///
/// - `writeable_entries`: nodes built from the index, owning their subtrees
/// - `readable_entries`: rows decoded from a stored tree
#[derive(Debug, Clone, Default)]
pub struct Tree {
    readable_entries: BTreeMap<String, DatabaseEntry>,
    writeable_entries: BTreeMap<String, TreeEntry>,
}

impl Tree {
    /// Build a tree hierarchy from flat index entries.
    pub fn build<'e>(entries: impl Iterator<Item = &'e IndexEntry>) -> anyhow::Result<Self> {
        let mut root = Self::default();

        for entry in entries {
            let parents = entry.parent_dirs();
            root.add_entry(&parents, entry)?;
        }

        Ok(root)
    }

    pub fn is_empty(&self) -> bool {
        self.readable_entries.is_empty() && self.writeable_entries.is_empty()
    }

    /// Visit subtrees depth-first, children before parents.
    ///
    /// Children must be stored before their parent references them, so the
    /// callback sees each node only after its whole subtree. The path
    /// passed along is relative to the root (empty for the root itself).
    pub fn traverse<F>(&self, path: &Path, func: &mut F) -> anyhow::Result<()>
    where
        F: FnMut(&Path, &Tree) -> anyhow::Result<()>,
    {
        for (name, entry) in &self.writeable_entries {
            if let TreeEntry::Directory(tree) = entry {
                tree.traverse(&path.join(name), func)?;
            }
        }
        func(path, self)
    }

    fn add_entry(&mut self, parents: &[&Path], entry: &IndexEntry) -> anyhow::Result<()> {
        match parents.split_first() {
            None => {
                self.writeable_entries.insert(
                    entry.basename()?.to_string(),
                    TreeEntry::File(entry.clone()),
                );
            }
            Some((parent, rest)) => {
                let name = parent
                    .file_name()
                    .and_then(|name| name.to_str())
                    .context("invalid directory name")?
                    .to_string();

                let child = self
                    .writeable_entries
                    .entry(name)
                    .or_insert_with(|| TreeEntry::Directory(Tree::default()));

                // a staged file whose name is now a directory gives way to it
                if matches!(child, TreeEntry::File(_)) {
                    *child = TreeEntry::Directory(Tree::default());
                }

                if let TreeEntry::Directory(tree) = child {
                    tree.add_entry(rest, entry)?;
                }
            }
        }

        Ok(())
    }

    /// Newest modification time among the children.
    pub fn mtime(&self) -> i64 {
        let built = self.writeable_entries.values().map(TreeEntry::mtime);
        let read = self.readable_entries.values().map(|entry| entry.mtime);

        built.chain(read).max().unwrap_or_default()
    }

    /// Total size of everything below this tree.
    pub fn size(&self) -> u64 {
        let built = self.writeable_entries.values().map(TreeEntry::size);
        let read = self.readable_entries.values().map(|entry| entry.size);

        built.chain(read).sum()
    }

    /// Rows of a tree read from the database.
    pub fn entries(&self) -> impl Iterator<Item = (&String, &DatabaseEntry)> {
        self.readable_entries.iter()
    }

    pub fn into_entries(self) -> impl Iterator<Item = (String, DatabaseEntry)> {
        self.readable_entries.into_iter()
    }

    fn rows(&self) -> anyhow::Result<Vec<String>> {
        if self.writeable_entries.is_empty() {
            return Ok(self
                .readable_entries
                .iter()
                .map(|(name, entry)| entry.to_row(name))
                .collect());
        }

        self.writeable_entries
            .iter()
            .map(|(name, entry)| Ok(entry.to_database_entry()?.to_row(name)))
            .collect()
    }
}

impl Packable for Tree {
    fn payload(&self) -> anyhow::Result<Bytes> {
        let payload = self
            .rows()?
            .into_iter()
            .map(|row| format!("\n{}", row))
            .collect::<String>();

        Ok(Bytes::from(payload))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut tree = Tree::default();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let (name, entry) = DatabaseEntry::parse_row(&line)?;
            tree.readable_entries.insert(name, entry);
        }

        Ok(tree)
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.rows().map(|rows| rows.join("\n")).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::index::entry_mode::FileMode;
    use crate::artifacts::index::index_entry::EntryMetadata;
    use crate::artifacts::objects::blob::Blob;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::{fixture, rstest};
    use std::io::Cursor;
    use std::path::PathBuf;

    fn entry(path: &str, content: &str, mtime: i64) -> IndexEntry {
        let blob = Blob::from_text(content);
        IndexEntry::new(
            PathBuf::from(path),
            blob.object_id().unwrap(),
            EntryMetadata::new(
                content.len() as u64,
                EntryMode::File(FileMode::Regular),
                mtime,
            ),
        )
    }

    #[fixture]
    fn nested_entries() -> Vec<IndexEntry> {
        vec![
            entry("1.txt", "one", 10),
            entry("a/2.txt", "two", 30),
            entry("a/b/3.txt", "three", 20),
        ]
    }

    #[rstest]
    fn directories_aggregate_mtime_and_size(nested_entries: Vec<IndexEntry>) {
        let tree = Tree::build(nested_entries.iter()).unwrap();

        assert_eq!(tree.mtime(), 30);
        assert_eq!(tree.size(), 3 + 3 + 5);
    }

    #[rstest]
    fn traversal_is_post_order_with_full_paths(nested_entries: Vec<IndexEntry>) {
        let tree = Tree::build(nested_entries.iter()).unwrap();
        let mut visited = Vec::new();

        tree.traverse(Path::new(""), &mut |path, _| {
            visited.push(path.to_path_buf());
            Ok(())
        })
        .unwrap();

        assert_eq!(
            visited,
            vec![
                PathBuf::from("a/b"),
                PathBuf::from("a"),
                PathBuf::from(""),
            ]
        );
    }

    #[rstest]
    fn payload_rows_start_with_newline(nested_entries: Vec<IndexEntry>) {
        let tree = Tree::build(nested_entries.iter()).unwrap();
        let payload = String::from_utf8(tree.payload().unwrap().to_vec()).unwrap();

        let rows = payload.split('\n').collect::<Vec<_>>();

        assert_eq!(rows[0], "");
        assert_eq!(
            rows[1],
            format!("100644 blob {} 10 3 1.txt", nested_entries[0].oid)
        );
        assert!(rows[2].starts_with("040000 tree "));
        assert!(rows[2].ends_with(" 30 8 a"));
    }

    #[rstest]
    fn stored_rows_decode_to_same_payload(nested_entries: Vec<IndexEntry>) {
        let built = Tree::build(nested_entries.iter()).unwrap();
        let payload = built.payload().unwrap();

        let read = Tree::deserialize(Cursor::new(payload.clone())).unwrap();

        assert_eq!(read.payload().unwrap(), payload);
        assert_eq!(read.object_id().unwrap(), built.object_id().unwrap());
        assert_eq!(read.entries().count(), 2);
    }

    #[test]
    fn insertion_order_does_not_change_the_hash() {
        let forward = vec![entry("x/1", "1", 1), entry("y", "2", 2), entry("x/0", "0", 3)];
        let backward = forward.iter().rev().cloned().collect::<Vec<_>>();

        assert_eq!(
            Tree::build(forward.iter()).unwrap().object_id().unwrap(),
            Tree::build(backward.iter()).unwrap().object_id().unwrap()
        );
    }

    proptest! {
        #[test]
        fn building_is_deterministic(
            files in proptest::collection::btree_map("[a-c]{1,2}(/[a-c]{1,2}){0,2}\\.txt", "[a-z]{0,8}", 1..8)
        ) {
            let entries = files
                .iter()
                .map(|(path, content)| entry(path, content, content.len() as i64))
                .collect::<Vec<_>>();

            let first = Tree::build(entries.iter()).unwrap().object_id().unwrap();
            let second = Tree::build(entries.iter().rev()).unwrap().object_id().unwrap();

            prop_assert_eq!(first, second);
        }
    }
}
