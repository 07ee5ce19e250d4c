use crate::artifacts::log::log_line::{MESSAGE_MARKER, single_line};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::VcsError;
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct StashEntry {
    /// Previous stash commit, zero for the oldest entry
    pub parent: ObjectId,
    pub commit: ObjectId,
    /// Blob holding the decoded index at stash time
    pub index_blob: ObjectId,
    pub branch: String,
    pub timestamp: i64,
    pub message: String,
}

impl StashEntry {
    pub fn parse(line: &str) -> Result<Self, VcsError> {
        let corrupt = || VcsError::corrupt("stash log", format!("malformed line {:?}", line));

        let (fields, message) = line.split_once(MESSAGE_MARKER).ok_or_else(corrupt)?;
        let [parent, commit, index_blob, branch, timestamp] =
            fields.split_whitespace().collect::<Vec<_>>()[..]
        else {
            return Err(corrupt());
        };

        Ok(StashEntry::new(
            ObjectId::try_parse(parent).map_err(|_| corrupt())?,
            ObjectId::try_parse(commit).map_err(|_| corrupt())?,
            ObjectId::try_parse(index_blob).map_err(|_| corrupt())?,
            branch.to_string(),
            timestamp.parse().map_err(|_| corrupt())?,
            message.to_string(),
        ))
    }
}

impl std::fmt::Display for StashEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}{}",
            self.parent,
            self.commit,
            self.index_blob,
            self.branch,
            self.timestamp,
            MESSAGE_MARKER,
            single_line(&self.message)
        )
    }
}
