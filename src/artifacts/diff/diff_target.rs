use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::VcsError;
use std::path::{Path, PathBuf};

const NULL_PATH: &str = "/dev/null";

pub type LineSet = Vec<String>;

/// One side of a file comparison.
///
/// A side without `oid`/`mode` stands for "file absent", which is how
/// additions and deletions are rendered.
#[derive(Debug, Clone)]
pub struct DiffTarget {
    pub(crate) file: PathBuf,
    pub(crate) oid: Option<ObjectId>,
    pub(crate) mode: Option<EntryMode>,
    pub(crate) data: LineSet,
}

impl DiffTarget {
    /// A staged or committed version of a file.
    pub fn from_entry(entry: &IndexEntry, database: &Database) -> anyhow::Result<Self> {
        let blob = database.parse_object_as_blob(&entry.oid)?.ok_or_else(|| {
            VcsError::corrupt(entry.oid.as_ref(), format!("{} is not a blob", entry.name.display()))
        })?;

        Ok(Self {
            file: entry.name.clone(),
            oid: Some(entry.oid.clone()),
            mode: Some(entry.metadata.mode),
            data: blob.lines(),
        })
    }

    pub fn from_file(file: &Path, workspace: &Workspace) -> anyhow::Result<Self> {
        let blob = workspace.parse_blob(file)?;
        let metadata = workspace.stat_file(file)?;

        Ok(Self {
            file: file.to_path_buf(),
            oid: Some(blob.object_id()?),
            mode: Some(metadata.mode),
            data: blob.lines(),
        })
    }

    pub fn from_nothing(file: &Path) -> Self {
        Self {
            file: file.to_path_buf(),
            oid: None,
            mode: None,
            data: Vec::new(),
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn is_same_as(&self, other: &DiffTarget) -> bool {
        self.oid == other.oid && self.mode == other.mode
    }

    /// Path shown on the `---`/`+++` lines, `/dev/null` for a missing side.
    pub fn diff_path(&self, prefix: &str) -> String {
        if self.mode.is_some() {
            format!("{}/{}", prefix, self.file.display())
        } else {
            NULL_PATH.to_string()
        }
    }

    pub fn pretty_mode(&self) -> &str {
        self.mode.as_ref().map(EntryMode::as_str).unwrap_or("100644")
    }
}
