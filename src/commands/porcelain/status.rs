use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::branch::head::Head;
use crate::artifacts::status::file_change::FileChangeType;
use crate::artifacts::status::status_info::StatusInfo;
use crate::errors::VcsError;
use colored::Colorize;
use std::io::Write;

const UNTRACKED_INDENT: usize = 8;

// Terminology:
// - untracked files: in the working tree but not in the index
// - not staged: tracked by the index, modified or deleted in the working tree
// - to be committed: the index compared with the tree of the HEAD commit
impl Repository {
    pub async fn show_status(&mut self) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let status_info = self.status().initialize(&index)?;
        self.print_status(&status_info)?;

        Ok(())
    }

    pub(crate) fn print_status(&self, status_info: &StatusInfo) -> anyhow::Result<()> {
        let head = self.refs().head()?;
        let mut writer = self.writer();

        match &head {
            Head::Attached(branch) => writeln!(writer, "On branch {}", branch.to_string().blue())?,
            Head::Detached(oid) => writeln!(writer, "HEAD detached at {}", oid.to_short_oid())?,
        }

        if status_info.has_staged_changes() {
            writeln!(writer)?;
            writeln!(writer, "Changes to be committed:")?;
            for (file, change) in status_info.index_changeset() {
                writeln!(
                    writer,
                    "{}{}",
                    FileChangeType::Index(*change),
                    file.display().to_string().green()
                )?;
            }
        }

        if status_info.has_tracked_changes() {
            writeln!(writer)?;
            writeln!(writer, "Changes not staged for commit:")?;
            for (file, change) in status_info.workspace_changeset() {
                writeln!(
                    writer,
                    "{}{}",
                    FileChangeType::Workspace(*change),
                    file.display().to_string().red()
                )?;
            }
        }

        if !status_info.untracked_files().is_empty() {
            writeln!(writer)?;
            writeln!(writer, "Untracked files:")?;
            for file in status_info.untracked_files() {
                writeln!(
                    writer,
                    "{:>width$}{}",
                    "",
                    file.display().to_string().red(),
                    width = UNTRACKED_INDENT
                )?;
            }
        }

        if status_info.is_clean() {
            writeln!(writer)?;
            writeln!(writer, "nothing to commit, working tree clean")?;
        }

        Ok(())
    }

    /// Refuse to go on when anything differs between working tree, index
    /// and the HEAD commit.
    pub(crate) fn ensure_clean(&self, index: &Index, action: &str) -> anyhow::Result<()> {
        let status_info = self.status().initialize(index)?;
        if status_info.is_clean() {
            return Ok(());
        }

        Err(VcsError::validation(format!(
            "cannot {} with local changes; commit or stash them first",
            action
        ))
        .into())
    }
}
