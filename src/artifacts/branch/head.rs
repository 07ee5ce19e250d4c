//! HEAD state
//!
//! HEAD either names a branch (`ref: refs/heads/<branch>`) or holds a raw
//! commit hash. Commits are only allowed while attached.

use crate::artifacts::branch::REF_PREFIX;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::VcsError;
use std::sync::LazyLock;

const SYMREF_REGEX: &str = r"^ref: (.+)$";

static SYMREF: LazyLock<Option<regex::Regex>> =
    LazyLock::new(|| regex::Regex::new(SYMREF_REGEX).ok());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    Attached(BranchName),
    Detached(ObjectId),
}

impl Head {
    /// Decode the content of the HEAD file.
    pub fn parse(content: &str) -> Result<Self, VcsError> {
        let content = content.trim();
        let corrupt = || VcsError::corrupt("HEAD", format!("unreadable HEAD {:?}", content));

        let symref = SYMREF
            .as_ref()
            .and_then(|regex| regex.captures(content))
            .and_then(|captures| captures.get(1))
            .map(|target| target.as_str().to_string());

        match symref {
            Some(target) => {
                let branch = target.strip_prefix(REF_PREFIX).ok_or_else(corrupt)?;
                BranchName::try_parse(branch)
                    .map(Head::Attached)
                    .map_err(|_| corrupt())
            }
            None => ObjectId::try_parse(content)
                .map(Head::Detached)
                .map_err(|_| corrupt()),
        }
    }

    /// The HEAD file content for this state.
    pub fn to_file_content(&self) -> String {
        match self {
            Head::Attached(branch) => format!("ref: {}{}", REF_PREFIX, branch),
            Head::Detached(oid) => oid.to_string(),
        }
    }

    pub fn branch(&self) -> Option<&BranchName> {
        match self {
            Head::Attached(branch) => Some(branch),
            Head::Detached(_) => None,
        }
    }

    pub fn is_detached(&self) -> bool {
        matches!(self, Head::Detached(_))
    }

    /// Branch name for logs and stash records; `HEAD` when detached.
    pub fn label(&self) -> String {
        match self {
            Head::Attached(branch) => branch.to_string(),
            Head::Detached(_) => "HEAD".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn symbolic_head_is_attached() {
        let head = Head::parse("ref: refs/heads/feature-x\n").unwrap();

        assert_eq!(head, Head::Attached(BranchName::try_parse("feature-x").unwrap()));
        assert_eq!(head.to_file_content(), "ref: refs/heads/feature-x");
    }

    #[test]
    fn raw_hash_is_detached() {
        let head = Head::parse(&"a".repeat(40)).unwrap();

        assert!(head.is_detached());
        assert_eq!(head.label(), "HEAD");
    }

    #[rstest]
    #[case("ref: refs/tags/v1")]
    #[case("garbage")]
    #[case("")]
    fn anything_else_is_corrupt(#[case] content: &str) {
        assert!(matches!(Head::parse(content), Err(VcsError::Corrupt { .. })));
    }
}
