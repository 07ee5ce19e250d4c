use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::head::Head;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::merge::reconcile::{ConflictLabels, reconcile};
use crate::artifacts::objects::blob::Blob;
use crate::errors::VcsError;
use std::io::Write;
use tracing::debug;

impl Repository {
    /// Bring the files of `branch` into the working tree.
    ///
    /// Files only the incoming branch has are written and staged. Files both
    /// tips hold with different content are reconciled line by line and
    /// left unstaged for review. No commit is made.
    pub async fn merge(&mut self, branch: &str) -> anyhow::Result<()> {
        let incoming = BranchName::try_parse(branch)?;
        if !self.refs().branch_exists(&incoming) {
            return Err(VcsError::validation(format!("branch {} does not exist", incoming)).into());
        }

        let current = match self.refs().head()? {
            Head::Attached(current) => current,
            Head::Detached(_) => {
                return Err(VcsError::validation("cannot merge while HEAD is detached").into());
            }
        };
        if current == incoming {
            return Err(VcsError::validation(format!(
                "cannot merge branch {} into itself",
                incoming
            ))
            .into());
        }

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;
        self.ensure_clean(&index, "merge")?;

        let ours_oid = self.refs().read_branch(&current)?;
        let theirs_oid = self.refs().read_branch(&incoming)?;
        if theirs_oid.is_zero() || theirs_oid == ours_oid {
            writeln!(self.writer(), "Already up to date")?;
            return Ok(());
        }

        let ours_files = self.database().commit_files(&ours_oid)?;
        let theirs_files = self.database().commit_files(&theirs_oid)?;
        let labels = ConflictLabels::merge(incoming.as_ref());
        let mut conflicts = 0;

        for (path, theirs) in &theirs_files {
            match ours_files.get(path) {
                None => {
                    let blob = self.load_blob(theirs)?;
                    self.workspace().write_entry(theirs, blob.content())?;

                    let stat = self.workspace().stat_file(path)?;
                    index.add(IndexEntry::new(path.clone(), theirs.oid.clone(), stat));
                    writeln!(self.writer(), "Added {}", path.display())?;
                }
                Some(ours) if ours.oid == theirs.oid => {}
                Some(ours) => {
                    let ours_lines = self.load_blob(ours)?.lines();
                    let theirs_lines = self.load_blob(theirs)?.lines();
                    let reconciled = reconcile(&ours_lines, &theirs_lines, &labels);

                    self.workspace().write_text(path, &reconciled.to_content())?;
                    if reconciled.conflicted {
                        conflicts += 1;
                        writeln!(
                            self.writer(),
                            "CONFLICT (content): Merge conflict in {}",
                            path.display()
                        )?;
                    } else {
                        writeln!(self.writer(), "Auto-merged {}", path.display())?;
                    }
                }
            }
        }

        index.write_updates()?;
        debug!(from = %incoming, into = %current, conflicts, "merge applied");

        if conflicts > 0 {
            writeln!(
                self.writer(),
                "Automatic merge failed; fix conflicts and then commit the result."
            )?;
        }

        Ok(())
    }

    /// The blob an index or tree entry points at.
    pub(crate) fn load_blob(&self, entry: &IndexEntry) -> anyhow::Result<Blob> {
        self.database()
            .parse_object_as_blob(&entry.oid)?
            .ok_or_else(|| {
                VcsError::corrupt(
                    entry.oid.as_ref(),
                    format!("{} is not a blob", entry.name.display()),
                )
                .into()
            })
    }
}
