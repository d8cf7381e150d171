use derive_more::{AsRef, Display};

/// A display name for routines and exercises.
///
/// The length limit counts characters, not bytes, so accented names such as "Miércoles" are not
/// penalized.
#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub const MAX_LENGTH: usize = 64;

    pub fn new(name: &str) -> Result<Self, NameError> {
        let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");

        if collapsed.is_empty() {
            return Err(NameError::Empty);
        }

        let len = collapsed.chars().count();

        if len > Self::MAX_LENGTH {
            return Err(NameError::TooLong(len));
        }

        Ok(Name(collapsed))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("Name must not be empty")]
    Empty,
    #[error("Name must be 64 characters or fewer ({0} > 64)")]
    TooLong(usize),
}
