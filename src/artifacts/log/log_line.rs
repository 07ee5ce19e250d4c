use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::VcsError;
use derive_new::new;

/// Separator between the fixed fields and the message.
pub const MESSAGE_MARKER: &str = "commit: ";

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct LogLine {
    pub parent: ObjectId,
    pub commit: ObjectId,
    pub user: String,
    pub timestamp: i64,
    pub message: String,
}

impl LogLine {
    pub fn parse(line: &str) -> Result<Self, VcsError> {
        let corrupt = || VcsError::corrupt("branch log", format!("malformed line {:?}", line));

        let (fields, message) = line.split_once(MESSAGE_MARKER).ok_or_else(corrupt)?;
        let [parent, commit, user, timestamp] = fields.split_whitespace().collect::<Vec<_>>()[..]
        else {
            return Err(corrupt());
        };

        Ok(LogLine::new(
            ObjectId::try_parse(parent).map_err(|_| corrupt())?,
            ObjectId::try_parse(commit).map_err(|_| corrupt())?,
            user.to_string(),
            timestamp.parse().map_err(|_| corrupt())?,
            message.to_string(),
        ))
    }

    pub fn parse_all(text: &str) -> Result<Vec<Self>, VcsError> {
        text.lines()
            .filter(|line| !line.trim().is_empty())
            .map(Self::parse)
            .collect()
    }
}

impl std::fmt::Display for LogLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {} {}{}",
            self.parent,
            self.commit,
            self.user,
            self.timestamp,
            MESSAGE_MARKER,
            single_line(&self.message)
        )
    }
}

/// Logs are line based, so multi-line messages are folded.
pub fn single_line(message: &str) -> String {
    message.lines().collect::<Vec<_>>().join(" ")
}
