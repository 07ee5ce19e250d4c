use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::head::Head;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::VcsError;
use std::collections::HashSet;
use std::io::Write;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMode {
    /// Move the branch only
    Soft,
    /// Move the branch and replace the index
    Mixed,
    /// Move the branch, replace the index and the working tree
    Hard,
}

impl Repository {
    /// Point the current branch at an earlier commit of its history.
    pub async fn reset(&mut self, mode: ResetMode, target: &str) -> anyhow::Result<()> {
        let branch = match self.refs().head()? {
            Head::Attached(branch) => branch,
            Head::Detached(_) => {
                return Err(VcsError::validation("cannot reset while HEAD is detached").into());
            }
        };

        let target_oid = ObjectId::try_parse(target)?;
        if !self.database().contains(&target_oid) {
            return Err(VcsError::NotFound(target_oid.to_string()).into());
        }
        let commit = self.database().load_commit(&target_oid)?;

        if !self.is_in_history(&branch, &target_oid)? {
            return Err(VcsError::validation(format!(
                "{} is not part of the history of branch {}",
                target_oid, branch
            ))
            .into());
        }

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        match mode {
            ResetMode::Soft => {}
            ResetMode::Mixed => {
                let files = self.database().commit_files(&target_oid)?;
                index.replace_all(files.into_values());
                index.write_updates()?;
            }
            ResetMode::Hard => {
                if !self.confirm(
                    "Resetting discards the staging area and every uncommitted change. Continue?",
                )? {
                    writeln!(self.writer(), "Reset aborted")?;
                    return Ok(());
                }

                let files = self.database().commit_files(&target_oid)?;
                self.materialize(&mut index, files.into_values())?;
            }
        }

        self.refs().update_branch(&branch, &target_oid)?;
        debug!(branch = %branch, oid = %target_oid, ?mode, "branch reset");

        writeln!(
            self.writer(),
            "HEAD is now at {} {}",
            target_oid.to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }

    /// Whether `oid` was ever on `branch`: recorded in its log or reachable
    /// from its tip through parent links.
    fn is_in_history(&self, branch: &BranchName, oid: &ObjectId) -> anyhow::Result<bool> {
        if self
            .refs()
            .read_branch_log(branch)?
            .iter()
            .any(|line| &line.commit == oid)
        {
            return Ok(true);
        }

        let mut seen = HashSet::new();
        let mut current = self.refs().read_branch(branch)?;
        while !current.is_zero() && seen.insert(current.clone()) {
            if &current == oid {
                return Ok(true);
            }
            current = self
                .database()
                .load_commit(&current)?
                .parent()
                .cloned()
                .unwrap_or_default();
        }

        Ok(false)
    }
}
