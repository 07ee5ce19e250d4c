//! Positional stash log
//!
//! The file keeps entries oldest first, while tags count from the newest.
//! With `n` entries, `stash{N}` lives at line `n - 1 - N`.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::stash::stash_entry::StashEntry;
use crate::artifacts::stash::stash_tag::StashTag;
use crate::errors::VcsError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StashLog {
    entries: Vec<StashEntry>,
}

impl StashLog {
    pub fn parse(text: &str) -> Result<Self, VcsError> {
        let entries = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(StashEntry::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(StashLog { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn position(&self, tag: StashTag) -> Result<usize, VcsError> {
        self.entries
            .len()
            .checked_sub(tag.ordinal() + 1)
            .ok_or_else(|| VcsError::validation(format!("{} does not exist", tag)))
    }

    pub fn get(&self, tag: StashTag) -> Result<&StashEntry, VcsError> {
        Ok(&self.entries[self.position(tag)?])
    }

    pub fn push(&mut self, entry: StashEntry) {
        self.entries.push(entry);
    }

    /// Entries with their current tags, newest first.
    pub fn tagged(&self) -> impl Iterator<Item = (StashTag, &StashEntry)> {
        self.entries
            .iter()
            .rev()
            .enumerate()
            .map(|(ordinal, entry)| (StashTag::new(ordinal), entry))
    }

    /// Remove an entry and stitch the chain back together.
    ///
    /// Returns the removed entry and the new stash tip.
    pub fn remove(&mut self, tag: StashTag) -> Result<(StashEntry, ObjectId), VcsError> {
        let position = self.position(tag)?;
        let last = self.entries.len() - 1;

        let tip = if self.entries.len() == 1 {
            ObjectId::zero()
        } else if position == last {
            self.entries[position - 1].commit.clone()
        } else {
            let successor_parent = match position {
                0 => ObjectId::zero(),
                _ => self.entries[position - 1].commit.clone(),
            };
            self.entries[position + 1].parent = successor_parent;
            self.entries[last].commit.clone()
        };

        let removed = self.entries.remove(position);
        Ok((removed, tip))
    }
}

impl std::fmt::Display for StashLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}
