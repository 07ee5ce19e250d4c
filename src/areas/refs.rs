//! References: HEAD, branches, the stash tip and their logs
//!
//! ## Layout
//!
//! ```text
//! .vcs/HEAD                      ref: refs/heads/<branch> | <hash>
//! .vcs/refs/heads/<branch>       <hash>
//! .vcs/refs/stash                <hash>
//! .vcs/logs/refs/heads/<branch>  branch log lines
//! .vcs/logs/refs/stash           stash log lines
//! ```
//!
//! A fresh branch or an empty stash holds the all-zero sentinel.

use crate::artifacts::branch::REF_PREFIX;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::head::Head;
use crate::artifacts::log::log_line::LogLine;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::stash::stash_log::StashLog;
use crate::errors::VcsError;
use derive_new::new;
use file_guard::Lock;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

pub const HEAD_REF_NAME: &str = "HEAD";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository marker directory (`.vcs`)
    path: Box<Path>,
}

impl Refs {
    pub fn head(&self) -> anyhow::Result<Head> {
        let content = read_ref_file(&self.head_path())?;
        Ok(Head::parse(&content)?)
    }

    pub fn set_head(&self, head: &Head) -> anyhow::Result<()> {
        write_ref_file(&self.head_path(), &head.to_file_content())?;
        debug!(head = %head.to_file_content(), "HEAD rewritten");

        Ok(())
    }

    /// The commit HEAD resolves to; the sentinel before the first commit.
    pub fn head_commit(&self) -> anyhow::Result<ObjectId> {
        match self.head()? {
            Head::Attached(branch) => self.read_branch(&branch),
            Head::Detached(oid) => Ok(oid),
        }
    }

    pub fn branch_exists(&self, name: &BranchName) -> bool {
        self.branch_path(name).is_file()
    }

    pub fn read_branch(&self, name: &BranchName) -> anyhow::Result<ObjectId> {
        if !self.branch_exists(name) {
            return Err(VcsError::validation(format!("branch {} does not exist", name)).into());
        }

        let content = read_ref_file(&self.branch_path(name))?;
        ObjectId::try_parse(content.trim()).map_err(|_| {
            VcsError::corrupt(
                format!("{}{}", REF_PREFIX, name),
                format!("ref holds {:?}", content.trim()),
            )
            .into()
        })
    }

    /// Create a branch ref at `oid` together with its empty log.
    pub fn create_branch(&self, name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        if self.branch_exists(name) {
            return Err(VcsError::validation(format!("branch {} already exists", name)).into());
        }

        write_ref_file(&self.branch_path(name), oid.as_ref())?;
        write_ref_file(&self.branch_log_path(name), "")?;
        debug!(branch = %name, oid = %oid, "branch created");

        Ok(())
    }

    pub fn update_branch(&self, name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        write_ref_file(&self.branch_path(name), oid.as_ref())?;
        debug!(branch = %name, oid = %oid, "branch moved");

        Ok(())
    }

    /// Every branch with a valid name, sorted.
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads = self.heads_path();
        let mut branches = WalkDir::new(&heads)
            .min_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(&heads).ok()?;
                BranchName::try_parse(relative.to_string_lossy()).ok()
            })
            .collect::<Vec<_>>();
        branches.sort();

        Ok(branches)
    }

    pub fn append_branch_log(&self, name: &BranchName, line: &LogLine) -> anyhow::Result<()> {
        append_line(&self.branch_log_path(name), &line.to_string())
    }

    pub fn read_branch_log(&self, name: &BranchName) -> anyhow::Result<Vec<LogLine>> {
        let path = self.branch_log_path(name);
        if !path.exists() {
            return Ok(Vec::new());
        }

        Ok(LogLine::parse_all(&read_ref_file(&path)?)?)
    }

    pub fn stash_tip(&self) -> anyhow::Result<ObjectId> {
        let path = self.stash_path();
        if !path.exists() {
            return Ok(ObjectId::zero());
        }

        let content = read_ref_file(&path)?;
        match content.trim() {
            "" => Ok(ObjectId::zero()),
            tip => Ok(ObjectId::try_parse(tip)
                .map_err(|_| VcsError::corrupt("refs/stash", format!("ref holds {:?}", tip)))?),
        }
    }

    pub fn read_stash_log(&self) -> anyhow::Result<StashLog> {
        let path = self.stash_log_path();
        if !path.exists() {
            return Ok(StashLog::default());
        }

        Ok(StashLog::parse(&read_ref_file(&path)?)?)
    }

    /// Rewrite the whole stash log and its tip.
    pub fn write_stash(&self, log: &StashLog, tip: &ObjectId) -> anyhow::Result<()> {
        write_ref_file(&self.stash_log_path(), &log.to_string())?;
        write_ref_file(&self.stash_path(), tip.as_ref())?;
        debug!(entries = log.len(), tip = %tip, "stash log rewritten");

        Ok(())
    }

    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    pub fn heads_path(&self) -> PathBuf {
        self.path.join(REF_PREFIX)
    }

    pub fn branch_path(&self, name: &BranchName) -> PathBuf {
        self.heads_path().join(name.as_ref())
    }

    pub fn branch_log_path(&self, name: &BranchName) -> PathBuf {
        self.path.join("logs").join(REF_PREFIX).join(name.as_ref())
    }

    pub fn stash_path(&self) -> PathBuf {
        self.path.join("refs").join("stash")
    }

    pub fn stash_log_path(&self) -> PathBuf {
        self.path.join("logs").join("refs").join("stash")
    }
}

fn read_ref_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).map_err(|source| {
        VcsError::runtime(format!("failed to read ref file {}", path.display()), source).into()
    })
}

/// Truncate and rewrite a ref file under an exclusive lock.
pub(crate) fn write_ref_file(path: &Path, content: &str) -> anyhow::Result<()> {
    let io_error = |source| VcsError::runtime(format!("failed to write {}", path.display()), source);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }

    let mut ref_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(io_error)?;
    let lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1).map_err(io_error)?;

    let mut file: &File = &lock;
    file.write_all(content.as_bytes()).map_err(io_error)?;

    Ok(())
}

fn append_line(path: &Path, line: &str) -> anyhow::Result<()> {
    let io_error = |source| VcsError::runtime(format!("failed to append to {}", path.display()), source);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }

    let mut log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_error)?;
    let lock = file_guard::lock(&mut log_file, Lock::Exclusive, 0, 1).map_err(io_error)?;

    let mut file: &File = &lock;
    writeln!(file, "{}", line).map_err(io_error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::stash::stash_entry::StashEntry;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn refs() -> (TempDir, Refs) {
        let dir = TempDir::new().unwrap();
        let refs = Refs::new(dir.path().into());
        refs.set_head(&Head::Attached(BranchName::master())).unwrap();
        write_ref_file(&refs.branch_path(&BranchName::master()), &ObjectId::zero().to_string())
            .unwrap();
        (dir, refs)
    }

    fn oid(digit: char) -> ObjectId {
        ObjectId::try_parse(digit.to_string().repeat(40)).unwrap()
    }

    #[rstest]
    fn head_follows_the_attached_branch(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;
        assert!(refs.head_commit().unwrap().is_zero());

        refs.update_branch(&BranchName::master(), &oid('a')).unwrap();

        assert_eq!(refs.head_commit().unwrap(), oid('a'));
    }

    #[rstest]
    fn detached_head_resolves_to_its_hash(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;

        refs.set_head(&Head::Detached(oid('b'))).unwrap();

        assert_eq!(refs.head_commit().unwrap(), oid('b'));
        assert!(refs.head().unwrap().is_detached());
    }

    #[rstest]
    fn duplicate_branches_are_rejected(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;
        let name = BranchName::try_parse("topic").unwrap();
        refs.create_branch(&name, &oid('c')).unwrap();

        let error = refs.create_branch(&name, &oid('d')).unwrap_err();

        assert!(matches!(error.downcast_ref::<VcsError>(), Some(VcsError::Validation(_))));
        assert_eq!(refs.read_branch(&name).unwrap(), oid('c'));
        assert!(refs.read_branch_log(&name).unwrap().is_empty());
    }

    #[rstest]
    fn branches_are_listed_sorted(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;
        for name in ["zeta", "alpha"] {
            refs.create_branch(&BranchName::try_parse(name).unwrap(), &oid('1'))
                .unwrap();
        }

        let names = refs
            .list_branches()
            .unwrap()
            .into_iter()
            .map(|name| name.to_string())
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["alpha", "master", "zeta"]);
    }

    #[rstest]
    fn branch_log_appends_lines(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;
        let master = BranchName::master();
        let first = LogLine::new(ObjectId::zero(), oid('1'), "u".into(), 1, "one".into());
        let second = LogLine::new(oid('1'), oid('2'), "u".into(), 2, "two".into());

        refs.append_branch_log(&master, &first).unwrap();
        refs.append_branch_log(&master, &second).unwrap();

        assert_eq!(refs.read_branch_log(&master).unwrap(), vec![first, second]);
    }

    #[rstest]
    fn stash_state_round_trips_through_disk(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;
        assert!(refs.stash_tip().unwrap().is_zero());

        let mut log = StashLog::default();
        log.push(StashEntry::new(
            ObjectId::zero(),
            oid('5'),
            oid('6'),
            "master".into(),
            9,
            "wip".into(),
        ));
        refs.write_stash(&log, &oid('5')).unwrap();

        assert_eq!(refs.stash_tip().unwrap(), oid('5'));
        assert_eq!(refs.read_stash_log().unwrap(), log);
    }
}
