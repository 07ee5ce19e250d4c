use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatFileMode {
    /// `-e`: report whether the object exists
    Exists,
    /// `-p`: print the decoded payload
    Pretty,
    /// `-t`: print the object kind
    Type,
}

impl Repository {
    pub async fn cat_file(&mut self, hash: &str, mode: CatFileMode) -> anyhow::Result<()> {
        let object_id = ObjectId::try_parse(hash)?;

        match mode {
            CatFileMode::Exists => {
                if self.database().exists(object_id.as_ref()) {
                    writeln!(self.writer(), "Object exists: {}", object_id)?;
                } else {
                    writeln!(self.writer(), "Object not found: {}", object_id)?;
                }
            }
            CatFileMode::Type => {
                let raw = self.database().load(&object_id)?;
                writeln!(self.writer(), "{}", raw.object_type)?;
            }
            CatFileMode::Pretty => {
                let object = self.database().parse_object(&object_id)?;
                let content = object.display();

                write!(self.writer(), "{}", content)?;
                if !content.ends_with('\n') {
                    writeln!(self.writer())?;
                }
            }
        }

        Ok(())
    }
}
