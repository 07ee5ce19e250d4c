use crate::areas::repository::Repository;
use crate::artifacts::branch::head::Head;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::log::log_line::LogLine;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::VcsError;
use std::io::Write;
use tracing::debug;

impl Repository {
    pub async fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        let branch = match self.refs().head()? {
            Head::Attached(branch) => branch,
            Head::Detached(_) => {
                return Err(VcsError::validation(
                    "HEAD is detached; create a branch with `checkout -b <name>` to commit",
                )
                .into());
            }
        };

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let status_info = self.status().initialize(&index)?;
        if status_info.has_tracked_changes() {
            self.print_status(&status_info)?;
            writeln!(self.writer())?;
            writeln!(self.writer(), "No changes added to commit (use \"vcs add\")")?;
            return Ok(());
        }
        if !status_info.has_staged_changes() {
            writeln!(self.writer(), "Everything is up to date")?;
            return Ok(());
        }

        let parent = self.refs().read_branch(&branch)?;
        let message = message.trim().to_string();
        let (commit_id, commit) = self.write_commit(index.entries(), parent.clone(), message)?;

        self.refs().update_branch(&branch, &commit_id)?;
        self.refs().append_branch_log(
            &branch,
            &LogLine::new(
                parent,
                commit_id.clone(),
                commit.author().name().to_string(),
                commit.timestamp(),
                commit.message().to_string(),
            ),
        )?;

        writeln!(
            self.writer(),
            "[{} {}] {}",
            branch,
            commit_id.to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }

    /// Store the trees of `entries` and a commit on top of `parent`.
    pub(crate) fn write_commit<'e>(
        &self,
        entries: impl Iterator<Item = &'e IndexEntry>,
        parent: ObjectId,
        message: String,
    ) -> anyhow::Result<(ObjectId, Commit)> {
        let tree_id = self.store_tree(entries, |_, _| {})?;

        let commit = Commit::new(parent, tree_id, Author::load_from_env(), message);
        let commit_id = self.database().store(&commit)?;
        debug!(oid = %commit_id, "commit written");

        Ok((commit_id, commit))
    }
}
