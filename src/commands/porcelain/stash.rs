use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::merge::reconcile::{ConflictLabels, reconcile};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::readable_timestamp;
use crate::artifacts::objects::object::Object;
use crate::artifacts::stash::stash_entry::StashEntry;
use crate::artifacts::stash::stash_tag::StashTag;
use crate::errors::VcsError;
use std::io::Write;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StashAction {
    /// Save the working tree and index, then restore the HEAD commit
    Save(String),
    List,
    Apply(String),
    Pop(String),
    Drop(String),
    Show(String),
}

impl Repository {
    pub async fn stash(&mut self, action: &StashAction) -> anyhow::Result<()> {
        match action {
            StashAction::Save(message) => self.stash_save(message).await,
            StashAction::List => self.stash_list(),
            StashAction::Apply(tag) => self.stash_apply(StashTag::try_parse(tag)?, false).await,
            StashAction::Pop(tag) => self.stash_apply(StashTag::try_parse(tag)?, true).await,
            StashAction::Drop(tag) => self.stash_drop(StashTag::try_parse(tag)?),
            StashAction::Show(tag) => self.stash_show(StashTag::try_parse(tag)?),
        }
    }

    async fn stash_save(&self, message: &str) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        if self.status().initialize(&index)?.is_clean() {
            writeln!(self.writer(), "No local changes to save")?;
            return Ok(());
        }

        let snapshot = self.snapshot_workspace()?;
        let index_blob = self.database().store(&Blob::from_text(&index.to_text()))?;

        let parent = self.refs().stash_tip()?;
        let (commit_id, commit) =
            self.write_commit(snapshot.iter(), parent.clone(), message.trim().to_string())?;

        let head = self.refs().head()?;
        let mut log = self.refs().read_stash_log()?;
        log.push(StashEntry::new(
            parent,
            commit_id.clone(),
            index_blob,
            head.label(),
            commit.timestamp(),
            commit.message().to_string(),
        ));
        self.refs().write_stash(&log, &commit_id)?;

        let head_files = self.database().commit_files(&self.refs().head_commit()?)?;
        self.materialize(&mut index, head_files.into_values())?;

        writeln!(
            self.writer(),
            "Saved working directory and index state WIP on {}: {}",
            head.label(),
            commit.short_message()
        )?;

        Ok(())
    }

    /// Store every non-ignored working file as a blob.
    fn snapshot_workspace(&self) -> anyhow::Result<Vec<IndexEntry>> {
        let ignore = self.ignore_list()?;
        let mut snapshot = Vec::new();

        for file in self.workspace().list_files(&ignore)? {
            if file.to_string_lossy().contains(char::is_whitespace) {
                warn!(path = %file.display(), "skipping path containing whitespace");
                continue;
            }

            let blob = self.workspace().parse_blob(&file)?;
            let stat = self.workspace().stat_file(&file)?;
            let blob_id = self.database().store(&blob)?;
            snapshot.push(IndexEntry::new(file, blob_id, stat));
        }

        Ok(snapshot)
    }

    fn stash_list(&self) -> anyhow::Result<()> {
        let log = self.refs().read_stash_log()?;
        if log.is_empty() {
            writeln!(self.writer(), "Stash is empty.")?;
            return Ok(());
        }

        let mut writer = self.writer();
        for (tag, entry) in log.tagged() {
            writeln!(writer, "{}", describe(tag, entry))?;
        }

        Ok(())
    }

    /// Restore the stashed index, then bring the stashed files back into the
    /// working tree. With `pop` the entry is removed afterwards.
    async fn stash_apply(&self, tag: StashTag, pop: bool) -> anyhow::Result<()> {
        let mut log = self.refs().read_stash_log()?;
        let entry = log.get(tag)?.clone();

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let index_text = self
            .database()
            .parse_object_as_blob(&entry.index_blob)?
            .ok_or_else(|| VcsError::corrupt(entry.index_blob.as_ref(), "stashed index is not a blob"))?
            .text();
        index.load_text(&index_text)?;
        index.write_updates()?;

        self.restore_stashed_files(&entry, tag)?;

        writeln!(self.writer(), "Applied {}", describe(tag, &entry))?;

        if pop {
            let (removed, tip) = log.remove(tag)?;
            self.refs().write_stash(&log, &tip)?;
            writeln!(self.writer(), "Dropped {} ({})", tag, removed.commit)?;
        }

        Ok(())
    }

    /// A working file still equal to the HEAD version takes the stashed
    /// version; a locally edited one is reconciled with it line by line.
    /// Files deleted in the stash are left alone.
    fn restore_stashed_files(&self, entry: &StashEntry, tag: StashTag) -> anyhow::Result<()> {
        let stash_files = self.database().commit_files(&entry.commit)?;
        let head_files = self.database().commit_files(&self.refs().head_commit()?)?;
        let labels = ConflictLabels::stash(&tag.to_string());

        for (path, stashed) in &stash_files {
            let stashed_blob = self.load_blob(stashed)?;

            if !self.workspace().exists(path) || self.workspace().is_dir(path) {
                self.workspace().write_entry(stashed, stashed_blob.content())?;
                continue;
            }

            let current = self.workspace().parse_blob(path)?;
            let current_oid = current.object_id()?;
            if current_oid == stashed.oid {
                continue;
            }

            let pristine = head_files
                .get(path)
                .is_some_and(|head_entry| head_entry.oid == current_oid);
            if pristine {
                self.workspace().write_entry(stashed, stashed_blob.content())?;
                continue;
            }

            let reconciled = reconcile(&current.lines(), &stashed_blob.lines(), &labels);
            self.workspace().write_text(path, &reconciled.to_content())?;
            if reconciled.conflicted {
                writeln!(
                    self.writer(),
                    "CONFLICT (content): Merge conflict in {}",
                    path.display()
                )?;
            } else {
                writeln!(self.writer(), "Auto-merged {}", path.display())?;
            }
        }

        debug!(files = stash_files.len(), "stash restored");

        Ok(())
    }

    fn stash_drop(&self, tag: StashTag) -> anyhow::Result<()> {
        let mut log = self.refs().read_stash_log()?;
        let (removed, tip) = log.remove(tag)?;
        self.refs().write_stash(&log, &tip)?;

        writeln!(self.writer(), "Dropped {} ({})", tag, removed.commit)?;

        Ok(())
    }

    /// Diff from the HEAD commit to the stashed snapshot: `-` rows are HEAD
    /// lines, `+` rows are stashed lines.
    fn stash_show(&self, tag: StashTag) -> anyhow::Result<()> {
        let log = self.refs().read_stash_log()?;
        let entry = log.get(tag)?;

        writeln!(self.writer(), "{}", describe(tag, entry))?;

        let head_files = self.database().commit_files(&self.refs().head_commit()?)?;
        let stash_files = self.database().commit_files(&entry.commit)?;
        self.diff_file_sets(&head_files, &stash_files)
    }
}

fn describe(tag: StashTag, entry: &StashEntry) -> String {
    format!(
        "{}: {} WIP on {}: {}",
        tag,
        readable_timestamp(entry.timestamp),
        entry.branch,
        entry.message
    )
}
