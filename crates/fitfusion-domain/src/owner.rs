//! Owner account types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Account role stored on the `users/{id}` document.
///
/// Wire format: lowercase string (`"trainer"`, `"client"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerRole {
    Trainer,
    Client,
}

impl OwnerRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trainer => "trainer",
            Self::Client => "client",
        }
    }
}

impl fmt::Display for OwnerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown owner role: {0}")]
pub struct UnknownRoleError(pub String);

impl FromStr for OwnerRole {
    type Err = UnknownRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trainer" => Ok(Self::Trainer),
            "client" => Ok(Self::Client),
            other => Err(UnknownRoleError(other.to_owned())),
        }
    }
}
