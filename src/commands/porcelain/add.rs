use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Object;
use crate::errors::VcsError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

impl Repository {
    /// Stage every file at or below `path`.
    ///
    /// Entries anywhere in the index whose file vanished or became ignored
    /// are unstaged first. With `show_status`, each newly stored blob is
    /// reported as `<hash> <path>`.
    pub async fn add(&mut self, path: &Path, show_status: bool) -> anyhow::Result<()> {
        let target = self.workspace().resolve_user_path(path)?;
        let ignore = self.ignore_list()?;
        if ignore.is_ignored(&target, self.workspace().is_dir(&target)) {
            return Err(
                VcsError::validation(format!("path is ignored: {}", path.display())).into(),
            );
        }

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let stale = index
            .entries()
            .filter(|entry| {
                !self.workspace().exists(&entry.name)
                    || self.workspace().is_dir(&entry.name)
                    || ignore.is_ignored(&entry.name, false)
            })
            .map(|entry| entry.name.clone())
            .collect::<Vec<PathBuf>>();
        for name in stale {
            debug!(path = %name.display(), "unstaging vanished file");
            index.remove(&name);
        }

        for file in self.workspace().list_files_under(&target, &ignore)? {
            if file.to_string_lossy().contains(char::is_whitespace) {
                warn!(path = %file.display(), "skipping path containing whitespace");
                continue;
            }

            let blob = self.workspace().parse_blob(&file)?;
            let stat = self.workspace().stat_file(&file)?;
            let blob_id = blob.object_id()?;

            if let Some(existing) = index.entry_by_path(&file)
                && existing.oid == blob_id
                && existing.metadata.mode == stat.mode
            {
                continue;
            }

            let newly_stored = !self.database().contains(&blob_id);
            self.database().store(&blob)?;
            if show_status && newly_stored {
                writeln!(self.writer(), "{} {}", blob_id, file.display())?;
            }

            index.add(IndexEntry::new(file, blob_id, stat));
        }

        if index.is_changed() {
            index.write_updates()?;
        }

        Ok(())
    }
}
