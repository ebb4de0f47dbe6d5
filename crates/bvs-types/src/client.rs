//! Tenant client types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique client (tenant organization) identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub Uuid);

impl ClientId {
    /// Create a new random client ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ClientId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Kind of tenant a client is. Fixed once the client exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientType {
    VesselOwner,
    VesselCharterer,
}

impl ClientType {
    /// Storage / wire representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::VesselOwner => "VESSEL_OWNER",
            Self::VesselCharterer => "VESSEL_CHARTERER",
        }
    }
}

impl std::fmt::Display for ClientType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClientType {
    type Err = ClientTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VESSEL_OWNER" => Ok(Self::VesselOwner),
            "VESSEL_CHARTERER" => Ok(Self::VesselCharterer),
            _ => Err(ClientTypeParseError(s.to_string())),
        }
    }
}

/// Error parsing a client type string
#[derive(Debug, Clone)]
pub struct ClientTypeParseError(pub String);

impl std::fmt::Display for ClientTypeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid client type: {}", self.0)
    }
}

impl std::error::Error for ClientTypeParseError {}

/// Membership of a user in a client, as carried in tokens and `/me`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipSummary {
    pub client_id: ClientId,
    pub client_type: ClientType,
}

impl MembershipSummary {
    pub fn new(client_id: ClientId, client_type: ClientType) -> Self {
        Self {
            client_id,
            client_type,
        }
    }
}
