use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::head::Head;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::VcsError;
use std::io::Write;
use tracing::debug;

const DETACHMENT_NOTICE: &str = r#"You are in 'detached HEAD' state. You can look around, but commits are
refused until HEAD names a branch again. To keep working from here,
create a branch:

    vcs checkout -b <new-branch-name>
"#;

impl Repository {
    /// Switch HEAD to a branch or a commit, materializing its tree.
    ///
    /// With `create`, `target` names a new branch made at `start_point`
    /// (default: the HEAD commit) before switching to it.
    pub async fn checkout(
        &mut self,
        target: &str,
        create: bool,
        start_point: Option<&str>,
    ) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let current = self.refs().head()?;
        let current_oid = self.refs().head_commit()?;

        if create {
            let branch = BranchName::try_parse(target)?;
            let start_oid = match start_point {
                Some(start_point) => self.resolve_commit(start_point)?,
                None => current_oid.clone(),
            };
            if self.refs().branch_exists(&branch) {
                return Err(VcsError::validation(format!("branch {} already exists", branch)).into());
            }

            if start_oid != current_oid && !self.switch_tree(&mut index, &start_oid)? {
                return Ok(());
            }

            self.refs().create_branch(&branch, &start_oid)?;
            self.refs().set_head(&Head::Attached(branch.clone()))?;
            writeln!(
                self.writer(),
                "Switched to a new branch '{}' at {}",
                branch,
                start_oid.to_short_oid()
            )?;
            return Ok(());
        }

        if let Ok(branch) = BranchName::try_parse(target)
            && self.refs().branch_exists(&branch)
        {
            if current.branch() == Some(&branch) {
                writeln!(self.writer(), "Already on '{}'", branch)?;
                return Ok(());
            }

            let target_oid = self.refs().read_branch(&branch)?;
            if !self.switch_tree(&mut index, &target_oid)? {
                return Ok(());
            }

            self.refs().set_head(&Head::Attached(branch.clone()))?;
            writeln!(self.writer(), "Switched to branch '{}'", branch)?;
            return Ok(());
        }

        let target_oid = self.resolve_commit(target)?;
        if current == Head::Detached(target_oid.clone()) {
            writeln!(self.writer(), "Already on '{}'", target_oid)?;
            return Ok(());
        }

        if !self.switch_tree(&mut index, &target_oid)? {
            return Ok(());
        }

        self.refs().set_head(&Head::Detached(target_oid.clone()))?;
        let commit = self.database().load_commit(&target_oid)?;

        let mut writer = self.writer();
        writeln!(writer, "Note: checking out '{}'.", target_oid)?;
        writeln!(writer)?;
        write!(writer, "{}", DETACHMENT_NOTICE)?;
        writeln!(writer)?;
        writeln!(
            writer,
            "HEAD is now at {} {}",
            target_oid.to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }

    /// Replace index and working tree with the files of `target_oid`.
    ///
    /// Returns `false` when the user declined; nothing was touched then.
    fn switch_tree(&self, index: &mut Index, target_oid: &ObjectId) -> anyhow::Result<bool> {
        self.ensure_clean(index, "checkout")?;

        if !self.confirm("Checkout replaces every non-ignored file in the working tree. Continue?")? {
            writeln!(self.writer(), "Checkout aborted")?;
            return Ok(false);
        }

        let files = self.database().commit_files(target_oid)?;
        self.materialize(index, files.into_values())?;
        debug!(oid = %target_oid, "checked out tree");

        Ok(true)
    }
}
