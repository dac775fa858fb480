//! Caller identities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identity of a caller, as supplied by the execution environment.
///
/// The core never inspects the contents; it only compares and orders
/// principals so they can key the per-actor tables.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ts_rs::TS)]
#[serde(transparent)]
#[ts(export)]
pub struct Principal(String);

impl Principal {
    /// Wrap an address string.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The underlying address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for Principal {
    fn from(address: String) -> Self {
        Self(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_plain_string() {
        let p = Principal::new("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM");
        let json = serde_json::to_string(&p).expect("serialize");
        assert_eq!(json, "\"ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM\"");
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let a = Principal::from("ST1A");
        let b = Principal::from("ST1B");
        assert!(a < b);
        assert_eq!(a.to_string(), "ST1A");
    }
}
