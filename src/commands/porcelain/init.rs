use crate::areas::refs::write_ref_file;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::head::Head;
use crate::artifacts::core::ignore::{DEFAULT_IGNORE_FILE, IGNORE_FILE_NAME};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use std::fs;
use std::io::Write;
use tracing::info;

impl Repository {
    pub async fn init(&mut self) -> anyhow::Result<()> {
        let reinitialized = self.is_initialized();

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .vcs/objects directory")?;
        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .vcs/refs/heads directory")?;

        if !reinitialized {
            let master = BranchName::master();
            let zero = ObjectId::zero();

            write_ref_file(&self.refs().branch_path(&master), zero.as_ref())?;
            write_ref_file(&self.refs().branch_log_path(&master), "")?;
            write_ref_file(&self.refs().stash_path(), zero.as_ref())?;
            write_ref_file(&self.refs().stash_log_path(), "")?;
            self.refs()
                .set_head(&Head::Attached(master))
                .context("Failed to create initial HEAD reference")?;
        }

        {
            let index = self.index();
            let mut index = index.lock().await;
            // creates the index file when missing
            index.rehydrate()?;
        }

        let ignore_path = self.path().join(IGNORE_FILE_NAME);
        if !ignore_path.exists() {
            fs::write(&ignore_path, DEFAULT_IGNORE_FILE)
                .with_context(|| format!("Failed to create {}", IGNORE_FILE_NAME))?;
        }

        info!(path = %self.vcs_path().display(), reinitialized, "repository ready");

        if reinitialized {
            writeln!(
                self.writer(),
                "Reinitialized existing repository in {}",
                self.vcs_path().display()
            )?;
        } else {
            writeln!(
                self.writer(),
                "Initialized empty repository in {}",
                self.vcs_path().display()
            )?;
        }

        Ok(())
    }
}
