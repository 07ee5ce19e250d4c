use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Store the index as a tree hierarchy and print the root id.
    pub async fn write_tree(&mut self, show_created: bool) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        if index.is_empty() {
            writeln!(self.writer(), "Already up to date")?;
            return Ok(());
        }

        let mut created = Vec::new();
        let tree_id = self.store_tree(index.entries(), |path, oid| {
            created.push(format!("created {} {}", oid, display_tree_path(path)));
        })?;

        let mut writer = self.writer();
        if show_created {
            for line in created {
                writeln!(writer, "{}", line)?;
            }
        }
        writeln!(writer, "{}", tree_id)?;

        Ok(())
    }

    /// Store every tree above `entries` bottom-up and return the root id.
    ///
    /// `on_stored` sees each tree with its path relative to the root.
    pub(crate) fn store_tree<'e>(
        &self,
        entries: impl Iterator<Item = &'e IndexEntry>,
        mut on_stored: impl FnMut(&Path, &ObjectId),
    ) -> anyhow::Result<ObjectId> {
        let tree = Tree::build(entries)?;

        tree.traverse(Path::new(""), &mut |path, subtree| {
            let oid = self.database().store(subtree)?;
            on_stored(path, &oid);
            Ok(())
        })?;

        tree.object_id()
    }
}

fn display_tree_path(path: &Path) -> String {
    if path.as_os_str().is_empty() {
        ".".to_string()
    } else {
        format!("./{}", path.display())
    }
}
