//! Boundary DTOs for remote procedures and the upload endpoint.
//!
//! DESIGN
//! ======
//! Remote procedure replies are loosely shaped JSON. These types pin down the
//! fields the UI actually reads; everything else is ignored, and optional
//! fields default instead of failing the parse.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A competition team.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    #[serde(alias = "team_id")]
    pub id: Uuid,
    #[serde(alias = "team_name")]
    pub name: String,
    /// Join code shared with teammates.
    #[serde(default, alias = "team_code")]
    pub code: Option<String>,
    #[serde(default)]
    pub member_count: Option<i64>,
    #[serde(default)]
    pub max_members: Option<i64>,
    #[serde(default, alias = "creator_id")]
    pub created_by: Option<Uuid>,
}

/// Membership created by a successful join.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMembership {
    pub team_id: Uuid,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Media-host metadata for an uploaded image, as returned by `/api/upload`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub secure_url: String,
    pub public_id: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub resource_type: String,
    pub created_at: String,
    pub bytes: u64,
}

/// `/api/upload` reply envelope.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum UploadReply {
    Success { success: bool, data: UploadedImage },
    Failure { error: String },
}
