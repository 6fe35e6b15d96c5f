use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Rank, RequestStatus, SocialPlatform};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteCode {
    pub code: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_email: Option<String>,
}

impl InviteCode {
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.used_at.is_none()
    }
}

/// Who consumed an invite code, copied onto the code when it is used.
#[derive(Debug, Clone, Default)]
pub struct InviteSnapshot {
    pub name: String,
    pub instagram: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequest {
    pub id: String,
    pub invite_code: String,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiktok: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
    pub rank: Rank,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A member record with credentials stripped, safe to hand back to clients.
#[derive(Debug, Clone, Serialize)]
pub struct MemberProfile {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiktok: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
    pub rank: Rank,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl From<JoinRequest> for MemberProfile {
    fn from(req: JoinRequest) -> Self {
        Self {
            id: req.id,
            name: req.name,
            username: req.username,
            email: req.email,
            instagram: req.instagram,
            tiktok: req.tiktok,
            car: req.car,
            bio: req.bio,
            profile_pic: req.profile_pic,
            rank: req.rank,
            status: req.status,
            created_at: req.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Garage {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub owner_name: String,
    pub year: i32,
    pub make: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub widgets: Value,
    pub appearance: Value,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GarageComment {
    pub id: String,
    pub garage_id: String,
    pub user_id: String,
    pub username: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialPost {
    pub id: String,
    pub platform: SocialPlatform,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}
