//! Object identifier (SHA-1 hash)
//!
//! Object IDs are 40-character hexadecimal strings. They name every stored
//! blob, tree and commit, and double as the on-disk location of the object:
//! `.vcs/objects/<first-2-chars>/<remaining-38-chars>`.
//!
//! The all-zero ID is reserved as the "no commit" sentinel used by fresh
//! branches, root commits and the empty stash.

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::errors::VcsError;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID.
    ///
    /// Anything that is not exactly 40 hex characters is rejected with
    /// [`VcsError::InvalidHash`]. Every path derived from user input goes
    /// through here first.
    pub fn try_parse(id: impl Into<String>) -> Result<Self, VcsError> {
        let id = id.into();

        if id.len() != OBJECT_ID_LENGTH || !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(VcsError::InvalidHash(id));
        }

        Ok(Self(id.to_ascii_lowercase()))
    }

    pub fn zero() -> Self {
        Self("0".repeat(OBJECT_ID_LENGTH))
    }

    pub fn is_zero(&self) -> bool {
        self.0.bytes().all(|b| b == b'0')
    }

    /// Split as `XX/YYYY...` for object storage.
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::zero()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::proptest;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("g123456789012345678901234567890123456789")]
    #[case("0123456789abcdef0123456789abcdef012345678")]
    #[case("../../../../../../../../../../etc/passwd0")]
    fn malformed_hashes_are_rejected(#[case] raw: &str) {
        assert!(matches!(
            ObjectId::try_parse(raw),
            Err(VcsError::InvalidHash(_))
        ));
    }

    #[test]
    fn path_splits_after_two_characters() {
        let oid = ObjectId::try_parse("ab".to_string() + &"c".repeat(38)).unwrap();

        assert_eq!(oid.to_path(), PathBuf::from("ab").join("c".repeat(38)));
        assert_eq!(oid.to_short_oid(), "abccccc");
    }

    #[test]
    fn zero_is_the_default_sentinel() {
        assert!(ObjectId::default().is_zero());
        assert_eq!(ObjectId::zero().as_ref().len(), OBJECT_ID_LENGTH);
    }

    proptest! {
        #[test]
        fn any_40_hex_chars_parse(id in "[0-9a-f]{40}") {
            let oid = ObjectId::try_parse(id.clone()).unwrap();
            assert_eq!(oid.as_ref(), id.as_str());
        }
    }
}
