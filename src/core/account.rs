use serde::{Deserialize, Serialize};
use std::fmt;

/// String-backed identifier for an account (a vertex of the loan graph).
///
/// The graph itself is generic over any ordered identifier; `AccountId`
/// is the ready-made choice for host programs that key parties by name.
///
/// # Examples
///
/// ```
/// use debt_graph::core::account::AccountId;
///
/// let alice = AccountId::new("ALICE");
/// let bob = AccountId::from("BOB");
/// assert!(alice < bob);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
