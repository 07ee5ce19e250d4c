use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Print the blob id of a file, storing the blob when `write` is set.
    pub async fn hash_object(&mut self, file: &Path, write: bool) -> anyhow::Result<()> {
        let file = self.workspace().resolve_user_path(file)?;
        let blob = self.workspace().parse_blob(&file)?;

        let object_id = if write {
            self.database().store(&blob)?
        } else {
            blob.object_id()?
        };

        writeln!(self.writer(), "{}", object_id)?;

        Ok(())
    }
}
