//! Commit object
//!
//! Commits snapshot the index at a point in time and link to exactly one
//! parent. The first commit of a history points at the all-zero sentinel.
//!
//! ## Format
//!
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <user> <unix-timestamp>
//! committer <user> <unix-timestamp>
//! <commit message>
//! ```
//!
//! The payload starts with an empty line, and the message follows the
//! committer line directly.

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::io::BufRead;

/// Environment variable overriding the commit timestamp (unix seconds).
pub const COMMIT_TIMESTAMP_ENV: &str = "VCS_COMMIT_TIMESTAMP";

/// Author or committer: a user name and the moment they acted.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    timestamp: i64,
}

impl Author {
    pub fn new(name: String, timestamp: i64) -> Self {
        Author { name, timestamp }
    }

    /// Identity of whoever runs the command.
    ///
    /// The name comes from `$USER` (or `$USERNAME`), falling back to
    /// `unknown`. The timestamp is now, unless `VCS_COMMIT_TIMESTAMP` pins it.
    pub fn load_from_env() -> Self {
        let name = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .ok()
            .map(|name| name.split_whitespace().collect::<Vec<_>>().join("_"))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        Author::new(name, current_timestamp())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn display(&self) -> String {
        format!("{} {}", self.name, self.timestamp)
    }

    /// Local time as `Mon Jan 01 12:34:56 2024`.
    pub fn readable_timestamp(&self) -> String {
        readable_timestamp(self.timestamp)
    }
}

/// Seconds since the epoch, honouring `VCS_COMMIT_TIMESTAMP`.
pub fn current_timestamp() -> i64 {
    std::env::var(COMMIT_TIMESTAMP_ENV)
        .ok()
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .unwrap_or_else(|| chrono::Utc::now().timestamp())
}

pub fn readable_timestamp(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|datetime| {
            datetime
                .with_timezone(&chrono::Local)
                .format("%a %b %d %H:%M:%S %Y")
                .to_string()
        })
        .unwrap_or_else(|| timestamp.to_string())
}

impl TryFrom<&str> for Author {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // Format: "name timestamp"
        let (name, timestamp) = value
            .rsplit_once(' ')
            .context("invalid author format")?;
        let timestamp = timestamp
            .trim()
            .parse::<i64>()
            .context("invalid author timestamp")?;

        Ok(Author::new(name.to_string(), timestamp))
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// The previous commit, or the zero sentinel for a root commit
    parent: ObjectId,
    tree_oid: ObjectId,
    author: Author,
    committer: Author,
    message: String,
}

impl Commit {
    pub fn new(parent: ObjectId, tree_oid: ObjectId, author: Author, message: String) -> Self {
        Commit {
            parent,
            tree_oid,
            author: author.clone(),
            committer: author,
            message,
        }
    }

    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    /// Parent commit, `None` for a root commit.
    pub fn parent(&self) -> Option<&ObjectId> {
        (!self.parent.is_zero()).then_some(&self.parent)
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn timestamp(&self) -> i64 {
        self.author.timestamp()
    }

    fn header_lines(&self) -> Vec<String> {
        vec![
            format!("tree {}", self.tree_oid),
            format!("parent {}", self.parent),
            format!("author {}", self.author.display()),
            format!("committer {}", self.committer.display()),
        ]
    }
}

impl Packable for Commit {
    fn payload(&self) -> anyhow::Result<Bytes> {
        let payload = self
            .header_lines()
            .into_iter()
            .chain(std::iter::once(self.message.clone()))
            .map(|line| format!("\n{}", line))
            .collect::<String>();

        Ok(Bytes::from(payload))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
        let mut lines = lines.iter().skip_while(|line| line.is_empty());

        let tree_oid = lines
            .next()
            .and_then(|line| line.strip_prefix("tree "))
            .context("invalid commit object: missing tree line")?;
        let tree_oid = ObjectId::try_parse(tree_oid.trim())?;

        let parent = lines
            .next()
            .and_then(|line| line.strip_prefix("parent "))
            .context("invalid commit object: missing parent line")?;
        let parent = ObjectId::try_parse(parent.trim())?;

        let author = lines
            .next()
            .and_then(|line| line.strip_prefix("author "))
            .context("invalid commit object: missing author line")?;
        let author = Author::try_from(author)?;

        let committer = lines
            .next()
            .and_then(|line| line.strip_prefix("committer "))
            .context("invalid commit object: missing committer line")?;
        let committer = Author::try_from(committer)?;

        let message = lines.map(String::as_str).collect::<Vec<_>>().join("\n");

        Ok(Commit {
            parent,
            tree_oid,
            author,
            committer,
            message,
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        let mut lines = self.header_lines();
        lines.push(String::new());
        lines.push(self.message.clone());

        lines.join("\n")
    }
}
