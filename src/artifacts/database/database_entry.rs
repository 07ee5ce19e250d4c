use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::VcsError;
use derive_new::new;

/// One row of a stored tree: `<mode> <type> <hash> <mtime> <size> <name>`.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct DatabaseEntry {
    pub oid: ObjectId,
    pub mode: EntryMode,
    pub mtime: i64,
    pub size: u64,
}

impl DatabaseEntry {
    pub fn is_tree(&self) -> bool {
        self.mode.is_tree()
    }

    pub fn object_type(&self) -> ObjectType {
        if self.is_tree() {
            ObjectType::Tree
        } else {
            ObjectType::Blob
        }
    }

    pub fn to_row(&self, name: &str) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.mode,
            self.object_type(),
            self.oid,
            self.mtime,
            self.size,
            name
        )
    }

    /// Parse a tree row into its name and entry.
    pub fn parse_row(row: &str) -> Result<(String, Self), VcsError> {
        let fields = row.split_whitespace().collect::<Vec<_>>();
        let [mode, object_type, oid, mtime, size, name] = fields[..] else {
            return Err(VcsError::corrupt("tree", format!("malformed row {:?}", row)));
        };

        let malformed = |what: &str| VcsError::corrupt("tree", format!("{} in row {:?}", what, row));

        let mode = EntryMode::try_from(mode).map_err(|_| malformed("invalid mode"))?;
        let object_type = ObjectType::try_from(object_type).map_err(|_| malformed("invalid type"))?;
        let oid = ObjectId::try_parse(oid).map_err(|_| malformed("non-40-hex hash"))?;
        let mtime = mtime.parse::<i64>().map_err(|_| malformed("invalid mtime"))?;
        let size = size.parse::<u64>().map_err(|_| malformed("invalid size"))?;

        let entry = DatabaseEntry::new(oid, mode, mtime, size);
        if entry.object_type() != object_type {
            return Err(malformed("type does not match mode"));
        }

        Ok((name.to_string(), entry))
    }
}
