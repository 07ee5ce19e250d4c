use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::{EntryMetadata, IndexEntry};
use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use crate::artifacts::status::inspector::Inspector;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

pub type FileStatSet = BTreeMap<PathBuf, EntryMetadata>;
pub type FileSet = BTreeSet<PathBuf>;
pub type HeadTree = BTreeMap<PathBuf, IndexEntry>;

#[derive(Debug, Clone, Default)]
pub struct StatusInfo {
    pub(crate) file_stats: FileStatSet,
    /// In the working tree but not in the index
    pub(crate) untracked_files: FileSet,
    /// Index against working tree: modified or deleted
    pub(crate) workspace_changeset: BTreeMap<PathBuf, WorkspaceChangeType>,
    /// HEAD commit against index: added, modified or deleted
    pub(crate) index_changeset: BTreeMap<PathBuf, IndexChangeType>,
    pub(crate) head_tree: HeadTree,
}

impl StatusInfo {
    pub fn untracked_files(&self) -> &FileSet {
        &self.untracked_files
    }

    pub fn workspace_changeset(&self) -> &BTreeMap<PathBuf, WorkspaceChangeType> {
        &self.workspace_changeset
    }

    pub fn index_changeset(&self) -> &BTreeMap<PathBuf, IndexChangeType> {
        &self.index_changeset
    }

    pub fn head_tree(&self) -> &HeadTree {
        &self.head_tree
    }

    /// Tracked files whose working copy differs from the index.
    pub fn has_tracked_changes(&self) -> bool {
        !self.workspace_changeset.is_empty()
    }

    pub fn has_workspace_changes(&self) -> bool {
        self.has_tracked_changes() || !self.untracked_files.is_empty()
    }

    pub fn has_staged_changes(&self) -> bool {
        !self.index_changeset.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_workspace_changes() && !self.has_staged_changes()
    }
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl Status<'_> {
    pub fn initialize(&self, index: &Index) -> anyhow::Result<StatusInfo> {
        let workspace = self.repository.workspace();
        let inspector = Inspector::new(workspace);
        let ignore = self.repository.ignore_list()?;

        let mut info = StatusInfo::default();

        for file in workspace.list_files(&ignore)? {
            if index.entry_by_path(&file).is_none() {
                info.untracked_files.insert(file);
                continue;
            }

            let stat = workspace.stat_file(&file)?;
            info.file_stats.insert(file, stat);
        }

        for entry in index.entries() {
            let change = inspector
                .check_index_against_workspace(Some(entry), info.file_stats.get(&entry.name))?;
            if change != WorkspaceChangeType::None {
                info.workspace_changeset.insert(entry.name.clone(), change);
            }
        }

        info.head_tree = self
            .repository
            .database()
            .commit_files(&self.repository.refs().head_commit()?)?;

        let paths = index
            .entries()
            .map(|entry| entry.name.clone())
            .chain(info.head_tree.keys().cloned())
            .collect::<BTreeSet<_>>();
        for path in paths {
            let change = inspector
                .check_index_against_head_tree(index.entry_by_path(&path), info.head_tree.get(&path));
            if change != IndexChangeType::None {
                info.index_changeset.insert(path, change);
            }
        }

        Ok(info)
    }
}
