use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::VcsError;
use std::io::{Cursor, Write};

impl Repository {
    /// List the rows of a stored tree below its `tree <size>` header.
    pub async fn ls_tree(&mut self, hash: &str) -> anyhow::Result<()> {
        let raw = self.database().read(hash)?;
        if raw.object_type != ObjectType::Tree {
            return Err(VcsError::validation(format!(
                "{} is a {}, not a tree",
                hash, raw.object_type
            ))
            .into());
        }

        let tree = Tree::deserialize(Cursor::new(raw.payload))
            .map_err(|error| VcsError::corrupt(hash, format!("{:#}", error)))?;
        let size_width = tree
            .entries()
            .map(|(_, entry)| entry.size.to_string().len())
            .max()
            .unwrap_or(1);

        let mut writer = self.writer();
        writeln!(writer, "{} {}", ObjectType::Tree, raw.size)?;
        for (name, entry) in tree.entries() {
            writeln!(
                writer,
                "{} {} {} {} {:>width$} {}",
                entry.mode,
                entry.object_type(),
                entry.oid,
                entry.mtime,
                entry.size,
                name,
                width = size_width
            )?;
        }

        Ok(())
    }
}
