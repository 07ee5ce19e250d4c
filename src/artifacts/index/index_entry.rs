//! Index entry representation
//!
//! Each row of the index describes one staged file:
//!
//! ```text
//! <path> <hash> <size> <mode> <mtime>
//! ```
//!
//! Fields are whitespace separated. Decoding only insists on the path and
//! the hash; trailing fields that are missing fall back to their defaults.

use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::VcsError;
use derive_new::new;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, new)]
pub struct IndexEntry {
    /// File path relative to the repository root
    pub name: PathBuf,
    /// Blob hash of the staged content
    pub oid: ObjectId,
    pub metadata: EntryMetadata,
}

/// The slice of file metadata the index keeps per row.
#[derive(Debug, Clone, Default, PartialEq, Eq, new)]
pub struct EntryMetadata {
    pub size: u64,
    pub mode: EntryMode,
    /// Modification time in seconds since the Unix epoch
    pub mtime: i64,
}

impl IndexEntry {
    pub fn basename(&self) -> anyhow::Result<&str> {
        self.name
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow::anyhow!("invalid file name: {}", self.name.display()))
    }

    /// Directory components leading to the entry, outermost first.
    pub fn parent_dirs(&self) -> Vec<&Path> {
        let mut dirs = self
            .name
            .ancestors()
            .skip(1)
            .filter(|dir| !dir.as_os_str().is_empty())
            .collect::<Vec<_>>();
        dirs.reverse();

        dirs
    }

    /// Render the entry as one index row.
    pub fn to_row(&self) -> String {
        format!(
            "{} {} {} {} {}",
            path_to_row_field(&self.name),
            self.oid,
            self.metadata.size,
            self.metadata.mode,
            self.metadata.mtime
        )
    }

    /// Parse one index row, tolerating missing trailing fields.
    pub fn parse_row(row: &str) -> Result<Self, VcsError> {
        let mut fields = row.split_whitespace();

        let name = fields.next().ok_or_else(|| malformed("row without a path", row))?;
        let oid = fields
            .next()
            .and_then(|oid| ObjectId::try_parse(oid).ok())
            .ok_or_else(|| malformed("row without a valid hash", row))?;

        let size = match fields.next() {
            Some(size) => size
                .parse::<u64>()
                .map_err(|_| malformed("invalid size", row))?,
            None => 0,
        };
        let mode = match fields.next() {
            Some(mode) => EntryMode::try_from(mode).map_err(|_| malformed("invalid mode", row))?,
            None => EntryMode::default(),
        };
        let mtime = match fields.next() {
            Some(mtime) => mtime
                .parse::<i64>()
                .map_err(|_| malformed("invalid mtime", row))?,
            None => 0,
        };

        Ok(IndexEntry::new(
            PathBuf::from(name),
            oid,
            EntryMetadata::new(size, mode, mtime),
        ))
    }
}

fn malformed(reason: &str, row: &str) -> VcsError {
    VcsError::corrupt("index", format!("{}: {:?}", reason, row))
}

/// Paths are stored with `/` separators regardless of platform.
pub fn path_to_row_field(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

impl TryFrom<(&Path, Metadata)> for EntryMetadata {
    type Error = anyhow::Error;

    fn try_from((path, metadata): (&Path, Metadata)) -> anyhow::Result<Self> {
        let mtime = metadata
            .modified()?
            .duration_since(std::time::UNIX_EPOCH)
            .map(|duration| duration.as_secs() as i64)
            .unwrap_or_default();

        Ok(EntryMetadata::new(
            metadata.len(),
            EntryMode::from_metadata(path, &metadata),
            mtime,
        ))
    }
}

impl PartialOrd for IndexEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}
