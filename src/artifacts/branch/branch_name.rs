use crate::artifacts::branch::BRANCH_NAME_REGEX;
use crate::errors::VcsError;
use std::sync::LazyLock;

static BRANCH_NAME: LazyLock<Option<regex::Regex>> =
    LazyLock::new(|| regex::Regex::new(BRANCH_NAME_REGEX).ok());

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: impl Into<String>) -> Result<Self, VcsError> {
        let name = name.into();

        if name.is_empty() {
            return Err(VcsError::validation("branch name cannot be empty"));
        }

        let valid = BRANCH_NAME
            .as_ref()
            .is_some_and(|regex| regex.is_match(&name));
        if !valid {
            return Err(VcsError::validation(format!(
                "invalid branch name: {} (expected lowercase words joined by '-')",
                name
            )));
        }

        Ok(Self(name))
    }

    pub fn master() -> Self {
        Self("master".to_string())
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::proptest;
    use rstest::rstest;

    #[rstest]
    #[case("master")]
    #[case("feature-login")]
    #[case("a-b-c")]
    fn accepts_hyphenated_lowercase_words(#[case] name: &str) {
        assert!(BranchName::try_parse(name).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("Master")]
    #[case("-lead")]
    #[case("trail-")]
    #[case("double--hyphen")]
    #[case("with1digit")]
    #[case("nested/name")]
    #[case("under_score")]
    fn rejects_everything_else(#[case] name: &str) {
        assert!(matches!(
            BranchName::try_parse(name),
            Err(VcsError::Validation(_))
        ));
    }

    proptest! {
        #[test]
        fn generated_valid_names_parse(name in "[a-z](-?[a-z]){0,12}") {
            assert!(BranchName::try_parse(name).is_ok());
        }

        #[test]
        fn names_with_foreign_characters_fail(
            prefix in "[a-z]{1,4}",
            special in "[A-Z0-9_./ ]",
            suffix in "[a-z]{1,4}"
        ) {
            assert!(BranchName::try_parse(format!("{}{}{}", prefix, special, suffix)).is_err());
        }
    }
}
