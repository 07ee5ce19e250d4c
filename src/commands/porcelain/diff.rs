use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::diff::diff_target::DiffTarget;
use crate::artifacts::diff::render::render_file_diff;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use crate::artifacts::status::status_info::StatusInfo;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Path, PathBuf};

/// What `diff` compares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffMode {
    /// Index against working tree
    Workspace,
    /// HEAD commit against index
    Staged,
    /// A commit's tree against the working tree
    CommitWorkspace(String),
    /// One commit's tree against another's
    Commits(String, String),
}

impl Repository {
    pub async fn diff(&mut self, mode: &DiffMode) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        match mode {
            DiffMode::Workspace => {
                let status_info = self.status().initialize(&index)?;
                self.diff_index_workspace(&status_info, &index)
            }
            DiffMode::Staged => {
                let status_info = self.status().initialize(&index)?;
                self.diff_head_index(&status_info, &index)
            }
            DiffMode::CommitWorkspace(commit) => self.diff_commit_workspace(commit),
            DiffMode::Commits(old, new) => self.diff_commits(old, new),
        }
    }

    fn diff_index_workspace(&self, status_info: &StatusInfo, index: &Index) -> anyhow::Result<()> {
        for (file, change) in status_info.workspace_changeset() {
            let Some(entry) = index.entry_by_path(file) else {
                continue;
            };
            let old = DiffTarget::from_entry(entry, self.database())?;

            let new = match change {
                WorkspaceChangeType::Modified => DiffTarget::from_file(file, self.workspace())?,
                WorkspaceChangeType::Deleted => DiffTarget::from_nothing(file),
                _ => continue,
            };

            self.print_diff(&old, &new)?;
        }

        Ok(())
    }

    fn diff_head_index(&self, status_info: &StatusInfo, index: &Index) -> anyhow::Result<()> {
        let head_tree = status_info.head_tree();

        for file in status_info.index_changeset().keys() {
            let old = self.target_from(head_tree.get(file), file)?;
            let new = self.target_from(index.entry_by_path(file), file)?;

            self.print_diff(&old, &new)?;
        }

        Ok(())
    }

    fn diff_commit_workspace(&self, commit: &str) -> anyhow::Result<()> {
        let commit_oid = self.resolve_commit(commit)?;
        let old_files = self.database().commit_files(&commit_oid)?;
        let workspace_files = self.workspace().list_files(&self.ignore_list()?)?;

        let paths = old_files
            .keys()
            .cloned()
            .chain(workspace_files.iter().cloned())
            .collect::<BTreeSet<PathBuf>>();

        for file in paths {
            let old = self.target_from(old_files.get(&file), &file)?;
            let new = if self.workspace().exists(&file) && !self.workspace().is_dir(&file) {
                DiffTarget::from_file(&file, self.workspace())?
            } else {
                DiffTarget::from_nothing(&file)
            };

            self.print_diff(&old, &new)?;
        }

        Ok(())
    }

    fn diff_commits(&self, old: &str, new: &str) -> anyhow::Result<()> {
        let old_files = self.database().commit_files(&self.resolve_commit(old)?)?;
        let new_files = self.database().commit_files(&self.resolve_commit(new)?)?;

        self.diff_file_sets(&old_files, &new_files)
    }

    /// Print the diff of every path present in either set.
    pub(crate) fn diff_file_sets(
        &self,
        old_files: &BTreeMap<PathBuf, IndexEntry>,
        new_files: &BTreeMap<PathBuf, IndexEntry>,
    ) -> anyhow::Result<()> {
        let paths = old_files
            .keys()
            .chain(new_files.keys())
            .collect::<BTreeSet<_>>();

        for file in paths {
            let old = self.target_from(old_files.get(file), file)?;
            let new = self.target_from(new_files.get(file), file)?;

            self.print_diff(&old, &new)?;
        }

        Ok(())
    }

    fn target_from(
        &self,
        entry: Option<&IndexEntry>,
        file: &Path,
    ) -> anyhow::Result<DiffTarget> {
        match entry {
            Some(entry) => DiffTarget::from_entry(entry, self.database()),
            None => Ok(DiffTarget::from_nothing(file)),
        }
    }

    fn print_diff(&self, old: &DiffTarget, new: &DiffTarget) -> anyhow::Result<()> {
        let mut writer = self.writer();
        for line in render_file_diff(old, new) {
            writeln!(writer, "{}", line)?;
        }

        Ok(())
    }
}
