//! Global role types

use serde::{Deserialize, Serialize};

/// Role granted to a user independently of any client membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlobalRole {
    /// Platform administrator; bypasses all client-type scoping.
    #[serde(rename = "BVS_ADMIN")]
    BvsAdmin,
}

impl GlobalRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BvsAdmin => "BVS_ADMIN",
        }
    }
}

impl std::fmt::Display for GlobalRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GlobalRole {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BVS_ADMIN" => Ok(Self::BvsAdmin),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}

/// Error parsing a role string
#[derive(Debug, Clone)]
pub struct RoleParseError(pub String);

impl std::fmt::Display for RoleParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid role: {}", self.0)
    }
}

impl std::error::Error for RoleParseError {}
