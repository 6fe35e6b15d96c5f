use serde::{Deserialize, Serialize};

use crate::types::{Garage, GarageComment, InviteCode, JoinRequest, MemberProfile, SocialPost};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub rank: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ValidateParams {
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListRequestsParams {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
}

#[derive(Debug, Serialize)]
pub struct GeneratedInvite {
    pub code: String,
    pub link: String,
}

#[derive(Debug, Serialize)]
pub struct InviteList {
    pub invites: Vec<InviteCode>,
}

#[derive(Debug, Serialize)]
pub struct RequestList {
    pub requests: Vec<JoinRequest>,
}

#[derive(Debug, Serialize)]
pub struct UserBody {
    pub user: MemberProfile,
}

#[derive(Debug, Serialize)]
pub struct GarageBody {
    pub garage: Garage,
}

#[derive(Debug, Serialize)]
pub struct GarageList {
    pub garages: Vec<Garage>,
}

#[derive(Debug, Serialize)]
pub struct CommentBody {
    pub comment: GarageComment,
}

#[derive(Debug, Serialize)]
pub struct CommentList {
    pub comments: Vec<GarageComment>,
}

#[derive(Debug, Serialize)]
pub struct PostBody {
    pub post: SocialPost,
}

#[derive(Debug, Serialize)]
pub struct PostList {
    pub posts: Vec<SocialPost>,
}
