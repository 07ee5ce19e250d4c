use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::VcsError;
use std::io::Write;

impl Repository {
    /// Create `branch_name` at `source` (default: the HEAD commit), or list
    /// branches when no name is given. Neither HEAD nor the working tree
    /// move.
    pub async fn branch(
        &mut self,
        branch_name: Option<&str>,
        source: Option<&str>,
    ) -> anyhow::Result<()> {
        let Some(branch_name) = branch_name else {
            return self.list_branches();
        };
        let branch_name = BranchName::try_parse(branch_name)?;

        let source_oid = match source {
            Some(source) => self.resolve_commit(source)?,
            None => self.refs().head_commit()?,
        };
        if source_oid.is_zero() {
            return Err(VcsError::validation(format!(
                "cannot create branch {}: there is no commit to start from",
                branch_name
            ))
            .into());
        }

        self.refs().create_branch(&branch_name, &source_oid)?;
        writeln!(
            self.writer(),
            "Created branch '{}' at {}",
            branch_name,
            source_oid.to_short_oid()
        )?;

        Ok(())
    }

    fn list_branches(&self) -> anyhow::Result<()> {
        let current = self.refs().head()?;
        let mut writer = self.writer();

        for branch in self.refs().list_branches()? {
            let marker = if current.branch() == Some(&branch) { "* " } else { "  " };
            writeln!(writer, "{}{}", marker, branch)?;
        }

        Ok(())
    }

    /// Resolve a branch name to its tip, or else a literal hash to a
    /// stored commit.
    pub(crate) fn resolve_commit(&self, target: &str) -> anyhow::Result<ObjectId> {
        let branch = BranchName::try_parse(target).ok();
        if let Some(branch) = &branch
            && self.refs().branch_exists(branch)
        {
            return self.refs().read_branch(branch);
        }

        let oid = match (ObjectId::try_parse(target), branch) {
            (Ok(oid), _) => oid,
            (Err(_), Some(branch)) => {
                return Err(VcsError::validation(format!("branch {} does not exist", branch)).into());
            }
            (Err(error), None) => return Err(error.into()),
        };
        if !self.database().contains(&oid) {
            return Err(VcsError::NotFound(oid.to_string()).into());
        }
        self.database().load_commit(&oid)?;

        Ok(oid)
    }
}
