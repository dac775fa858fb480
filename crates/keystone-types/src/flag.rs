//! Feature flag names.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::MAX_FLAG_NAME_LEN;

/// Reasons a flag name is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlagNameError {
    /// The name exceeds [`MAX_FLAG_NAME_LEN`].
    #[error("flag name is {len} characters, maximum is {max}")]
    TooLong {
        /// Actual length.
        len: usize,
        /// Permitted maximum.
        max: usize,
    },

    /// The name contains a character outside printable ASCII.
    #[error("flag name contains non-printable or non-ASCII character {0:?}")]
    InvalidChar(char),
}

/// Bounded ASCII feature flag name (0 to [`MAX_FLAG_NAME_LEN`] printable characters).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FlagName(String);

impl FlagName {
    /// Validate and wrap a flag name.
    ///
    /// # Errors
    ///
    /// - [`FlagNameError::TooLong`] past [`MAX_FLAG_NAME_LEN`] characters
    /// - [`FlagNameError::InvalidChar`] for anything outside `' '..='~'`
    pub fn new(name: impl Into<String>) -> Result<Self, FlagNameError> {
        let name = name.into();
        if let Some(c) = name.chars().find(|c| !(' '..='~').contains(c)) {
            return Err(FlagNameError::InvalidChar(c));
        }
        // All characters are ASCII at this point, so bytes == chars.
        if name.len() > MAX_FLAG_NAME_LEN {
            return Err(FlagNameError::TooLong {
                len: name.len(),
                max: MAX_FLAG_NAME_LEN,
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FlagName {
    type Error = FlagNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for FlagName {
    type Error = FlagNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FlagName> for String {
    fn from(name: FlagName) -> Self {
        name.0
    }
}

impl fmt::Display for FlagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
