mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
///
/// Uniqueness (invite codes, usernames, one garage per member) is enforced by
/// the backing schema. Implementations report those violations as
/// [`crate::error::Error::Conflict`] or [`crate::error::Error::InviteCodeCollision`]
/// so callers never have to rely on a read-then-write pre-check.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Invite code operations
    fn create_invite_code(&self, invite: &InviteCode) -> Result<()>;
    fn get_invite_code(&self, code: &str) -> Result<Option<InviteCode>>;
    fn list_invite_codes(&self) -> Result<Vec<InviteCode>>;
    /// Marks an available code as used. Returns false if the code is missing or already used.
    fn mark_invite_code_used(&self, code: &str, snapshot: &InviteSnapshot) -> Result<bool>;
    fn release_invite_code(&self, code: &str) -> Result<bool>;

    // Join request operations
    fn create_join_request(&self, req: &JoinRequest) -> Result<()>;
    fn get_join_request(&self, id: &str) -> Result<Option<JoinRequest>>;
    fn get_join_request_by_username(&self, username: &str) -> Result<Option<JoinRequest>>;
    fn list_join_requests(&self, status: Option<RequestStatus>) -> Result<Vec<JoinRequest>>;
    /// Moves a pending request to `status`. Returns false if no pending request matched.
    fn review_join_request(&self, id: &str, status: RequestStatus) -> Result<bool>;
    fn update_join_request(&self, req: &JoinRequest) -> Result<()>;
    fn delete_join_request(&self, id: &str) -> Result<bool>;

    // Garage operations
    fn create_garage(&self, garage: &Garage) -> Result<()>;
    fn get_garage_by_username(&self, username: &str) -> Result<Option<Garage>>;
    fn get_garage_by_user_id(&self, user_id: &str) -> Result<Option<Garage>>;
    fn list_published_garages(&self) -> Result<Vec<Garage>>;
    fn update_garage(&self, garage: &Garage) -> Result<()>;

    // Garage like operations
    /// Adds the like if absent, removes it otherwise. Returns whether the member now likes the garage.
    fn toggle_garage_like(&self, garage_id: &str, user_id: &str) -> Result<bool>;
    fn count_garage_likes(&self, garage_id: &str) -> Result<i64>;
    fn has_garage_like(&self, garage_id: &str, user_id: &str) -> Result<bool>;

    // Garage comment operations
    fn create_garage_comment(&self, comment: &GarageComment) -> Result<()>;
    fn get_garage_comment(&self, id: &str) -> Result<Option<GarageComment>>;
    fn list_garage_comments(&self, garage_id: &str) -> Result<Vec<GarageComment>>;
    fn delete_garage_comment(&self, id: &str) -> Result<bool>;

    // Social post operations
    fn create_social_post(&self, post: &SocialPost) -> Result<()>;
    fn get_social_post(&self, id: &str) -> Result<Option<SocialPost>>;
    fn list_social_posts(&self) -> Result<Vec<SocialPost>>;
    fn update_social_post(&self, post: &SocialPost) -> Result<()>;
    fn delete_social_post(&self, id: &str) -> Result<bool>;
}
